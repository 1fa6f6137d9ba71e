//! Drawing surface abstraction
//!
//! Mirrors the small slice of the Canvas 2D API the painters need. Transform
//! and alpha are part of the saved state, exactly like the browser context.

use crate::local_rotation;
use crate::sim::{Color, Entity};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Start,
    Center,
    End,
}

impl TextAlign {
    pub fn as_css(self) -> &'static str {
        match self {
            TextAlign::Start => "start",
            TextAlign::Center => "center",
            TextAlign::End => "end",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS font shorthand
    pub font: &'static str,
    pub color: Color,
    pub align: TextAlign,
}

/// Immediate-mode 2D drawing target
pub trait Canvas {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Push transform and alpha
    fn save(&mut self);
    /// Pop transform and alpha
    fn restore(&mut self);
    fn translate(&mut self, x: f32, y: f32);
    /// Rotate by `radians`, clockwise on screen
    fn rotate(&mut self, radians: f32);
    fn set_alpha(&mut self, alpha: f32);

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Color);
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: Color);
    /// Punch a transparent hole
    fn clear_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    /// Wipe the whole surface
    fn clear(&mut self);
    fn fill_text(&mut self, text: &str, x: f32, y: f32, style: &TextStyle);
}

/// Run `paint` in the entity's local frame: origin at its position, +y along its heading
pub fn with_local_frame(
    canvas: &mut dyn Canvas,
    entity: &Entity,
    paint: impl FnOnce(&mut dyn Canvas),
) {
    canvas.save();
    canvas.translate(entity.pos.x, entity.pos.y);
    canvas.rotate(local_rotation(entity.angle));
    paint(canvas);
    canvas.restore();
}
