//! Headless canvas that tessellates into a triangle list
//!
//! Every primitive becomes triangles in screen space, ready to upload as a
//! vertex buffer. Text is kept as positioned runs for a glyph pass.

use std::f32::consts::PI;

use bytemuck::{Pod, Zeroable};
use glam::{Affine2, Vec2};

use super::canvas::{Canvas, TextAlign, TextStyle};
use crate::sim::Color;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }
}

/// Text placed in screen space
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub text: String,
    pub position: Vec2,
    pub font: &'static str,
    pub color: [f32; 4],
    pub align: TextAlign,
}

#[derive(Debug, Clone, Copy)]
struct DrawState {
    transform: Affine2,
    alpha: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
            alpha: 1.0,
        }
    }
}

const DEFAULT_CIRCLE_SEGMENTS: u32 = 24;

pub struct ShapeBatch {
    width: f32,
    height: f32,
    vertices: Vec<Vertex>,
    text: Vec<TextRun>,
    state: DrawState,
    stack: Vec<DrawState>,
    clear_color: [f32; 4],
    circle_segments: u32,
}

impl ShapeBatch {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            vertices: Vec::new(),
            text: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
            clear_color: [0.0; 4],
            circle_segments: DEFAULT_CIRCLE_SEGMENTS,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    /// Vertex data as raw bytes for a GPU upload
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn text(&self) -> &[TextRun] {
        &self.text
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn circle_segments(&self) -> u32 {
        self.circle_segments
    }

    /// Number of unmatched saves
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn point(&self, x: f32, y: f32) -> Vec2 {
        self.state.transform.transform_point2(Vec2::new(x, y))
    }

    fn quad(&mut self, x: f32, y: f32, w: f32, h: f32, color: [f32; 4]) {
        let a = self.point(x, y);
        let b = self.point(x + w, y);
        let c = self.point(x + w, y + h);
        let d = self.point(x, y + h);

        // Two triangles
        self.vertices.push(Vertex::at(a, color));
        self.vertices.push(Vertex::at(b, color));
        self.vertices.push(Vertex::at(c, color));

        self.vertices.push(Vertex::at(c, color));
        self.vertices.push(Vertex::at(d, color));
        self.vertices.push(Vertex::at(a, color));
    }
}

impl Canvas for ShapeBatch {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn save(&mut self) {
        self.stack.push(self.state);
    }

    fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    fn translate(&mut self, x: f32, y: f32) {
        self.state.transform = self.state.transform * Affine2::from_translation(Vec2::new(x, y));
    }

    fn rotate(&mut self, radians: f32) {
        self.state.transform = self.state.transform * Affine2::from_angle(radians);
    }

    fn set_alpha(&mut self, alpha: f32) {
        self.state.alpha = alpha.clamp(0.0, 1.0);
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color) {
        let color = color.to_rgba(self.state.alpha);
        self.quad(x, y, w, h, color);
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color) {
        let color = color.to_rgba(self.state.alpha);
        let center = self.point(x, y);
        let segments = self.circle_segments;
        self.vertices.reserve((segments * 3) as usize);

        for i in 0..segments {
            let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
            let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

            // Triangle from center to edge
            let edge1 = self.point(x + radius * theta1.cos(), y + radius * theta1.sin());
            let edge2 = self.point(x + radius * theta2.cos(), y + radius * theta2.sin());
            self.vertices.push(Vertex::at(center, color));
            self.vertices.push(Vertex::at(edge1, color));
            self.vertices.push(Vertex::at(edge2, color));
        }
    }

    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let color = self.clear_color;
        self.quad(x, y, w, h, color);
    }

    fn clear(&mut self) {
        self.vertices.clear();
        self.text.clear();
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle) {
        let position = self.point(x, y);
        self.text.push(TextRun {
            text: text.to_string(),
            position,
            font: style.font,
            color: style.color.to_rgba(self.state.alpha),
            align: style.align,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::palette;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: [f32; 2], b: [f32; 2]) -> bool {
        (a[0] - b[0]).abs() < 1e-4 && (a[1] - b[1]).abs() < 1e-4
    }

    #[test]
    fn test_rect_is_two_triangles() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.fill_rect(10.0, 20.0, 4.0, 2.0, palette::PLAYER);
        let v = batch.vertices();
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[2].position, [14.0, 22.0]);
        assert_eq!(v[0].color, [1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_translate_then_rotate() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.save();
        batch.translate(100.0, 50.0);
        batch.rotate(FRAC_PI_2);
        batch.fill_rect(0.0, 0.0, 10.0, 1.0, palette::ENEMY);
        batch.restore();

        // Local +x lands on screen +y after a quarter turn
        let v = batch.vertices();
        assert!(close(v[0].position, [100.0, 50.0]));
        assert!(close(v[1].position, [100.0, 60.0]));
        assert_eq!(batch.depth(), 0);
    }

    #[test]
    fn test_restore_resets_alpha_and_transform() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.save();
        batch.translate(5.0, 5.0);
        batch.set_alpha(0.25);
        batch.restore();
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, palette::PLAYER);
        assert_eq!(batch.vertices()[0].position, [0.0, 0.0]);
        assert_eq!(batch.vertices()[0].color[3], 1.0);

        // Unbalanced restore is ignored
        batch.restore();
        assert_eq!(batch.depth(), 0);
    }

    #[test]
    fn test_circle_fan() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.fill_circle(50.0, 50.0, 10.0, palette::SHIELD);
        let v = batch.vertices();
        assert_eq!(v.len(), DEFAULT_CIRCLE_SEGMENTS as usize * 3);
        assert_eq!(v[0].position, [50.0, 50.0]);
        assert!(close(v[1].position, [60.0, 50.0]));
    }

    #[test]
    fn test_clear_rect_uses_clear_color_regardless_of_alpha() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.set_alpha(0.5);
        batch.clear_rect(1.0, 1.0, 1.0, 1.0);
        assert!(batch.vertices().iter().all(|v| v.color == [0.0; 4]));
    }

    #[test]
    fn test_vertex_bytes_layout() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, palette::PLAYER);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
        assert_eq!(batch.vertex_bytes().len(), 6 * 24);
    }

    #[test]
    fn test_clear_drops_everything() {
        let mut batch = ShapeBatch::new(400.0, 600.0);
        batch.fill_rect(0.0, 0.0, 1.0, 1.0, palette::PLAYER);
        let style = TextStyle {
            font: "bold 30px Arial",
            color: palette::SCORE,
            align: TextAlign::End,
        };
        batch.fill_text("10", 0.0, 0.0, &style);
        batch.clear();
        assert!(batch.vertices().is_empty());
        assert!(batch.text().is_empty());
        assert_eq!((batch.width(), batch.height()), (400.0, 600.0));
    }
}
