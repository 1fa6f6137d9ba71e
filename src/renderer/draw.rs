//! Per-kind painters
//!
//! Each entity kind has one painter in [`PAINTERS`], indexed by its tag. All
//! painters draw in the entity's local frame.

use std::f32::consts::FRAC_PI_4;

use super::canvas::{Canvas, TextAlign, TextStyle, with_local_frame};
use crate::sim::explosion::ShardShape;
use crate::sim::{Entity, EntityKind, GameState, GiftKind, KindTag, palette};

/// Painter signature; the world is passed for kinds that show global state
pub type Painter = fn(&mut dyn Canvas, &Entity, &GameState);

/// Painter table, indexed by [`KindTag::index`]
pub static PAINTERS: [Painter; KindTag::COUNT] = [
    paint_player,
    paint_tank_in_frame,
    paint_bullet,
    paint_gift,
    paint_burn,
    paint_shard,
    paint_score,
];

const SHIELD_ALPHA: f32 = 0.1;
const SHIELD_RINGS: [f32; 3] = [2.0, 1.5, 1.0];

const SCORE_STYLE: TextStyle = TextStyle {
    font: "bold 30px Arial",
    color: palette::SCORE,
    align: TextAlign::End,
};

/// Clear the surface and draw every entity, last-spawned first
pub fn render_world(canvas: &mut dyn Canvas, state: &GameState) {
    canvas.clear();
    for entity in state.entities.iter().rev() {
        draw_entity(canvas, entity, state);
    }
}

pub fn draw_entity(canvas: &mut dyn Canvas, entity: &Entity, state: &GameState) {
    PAINTERS[entity.tag().index()](canvas, entity, state);
}

/// Hull square plus a gun barrel pointing along the heading
fn tank_body(canvas: &mut dyn Canvas, entity: &Entity) {
    let s = entity.size;
    canvas.fill_rect(-s / 2.0, -s / 2.0, s, s, entity.color);
    let pipe = s / 7.0;
    canvas.fill_rect(-pipe / 2.0, 0.0, pipe, s, entity.color);
}

fn paint_tank_in_frame(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    with_local_frame(canvas, entity, |c| tank_body(c, entity));
}

fn paint_player(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    let shielded = entity
        .as_player()
        .is_some_and(|p| p.effect_kind() == Some(GiftKind::Shield));
    with_local_frame(canvas, entity, |c| {
        if shielded {
            c.save();
            c.set_alpha(SHIELD_ALPHA);
            for scale in SHIELD_RINGS {
                c.fill_circle(0.0, 0.0, entity.size * scale, palette::SHIELD);
            }
            c.restore();
        }
        tank_body(c, entity);
    });
}

fn paint_bullet(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    let h = entity.size;
    let w = 3.0 * h / 5.0;
    with_local_frame(canvas, entity, |c| {
        c.fill_rect(-w / 2.0, -h / 2.0, w, h, entity.color);
    });
}

fn paint_gift(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    let s = entity.size;
    with_local_frame(canvas, entity, |c| {
        c.rotate(FRAC_PI_4);
        c.fill_rect(-s / 2.0, -s / 2.0, s, s, entity.color);
    });
}

fn paint_burn(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    let EntityKind::Burn(burn) = &entity.kind else {
        return;
    };
    with_local_frame(canvas, entity, |c| {
        tank_body(c, entity);
        for hole in &burn.masks {
            c.clear_rect(hole.x, hole.y, 1.0, 1.0);
        }
    });
}

fn paint_shard(canvas: &mut dyn Canvas, entity: &Entity, _state: &GameState) {
    let EntityKind::Shard(shard) = &entity.kind else {
        return;
    };
    let s = entity.size;
    with_local_frame(canvas, entity, |c| {
        c.set_alpha(shard.opacity);
        match shard.shape {
            ShardShape::Square => c.fill_rect(-s / 2.0, -s / 2.0, s, s, entity.color),
            ShardShape::Circle => c.fill_circle(0.0, 0.0, s, entity.color),
        }
    });
}

fn paint_score(canvas: &mut dyn Canvas, entity: &Entity, state: &GameState) {
    with_local_frame(canvas, entity, |c| {
        c.fill_text(&state.score.to_string(), 0.0, 0.0, &SCORE_STYLE);
    });
}
