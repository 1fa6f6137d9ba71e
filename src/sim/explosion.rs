//! Explosion effects left behind by destroyed tanks
//!
//! Three styles:
//! - `Burn`: the hull stays in place while random pixels are punched out of it
//! - `Squares`: four square pieces fly apart and fade
//! - `Circles`: sixteen small round pieces fly apart and fade

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, rand_floor};
use super::state::GameState;
use crate::consts::{BURN_MASKS_PER_TICK, BURN_MASK_LIMIT, FADE_PER_TICK};

/// Which effect a destroyed tank produced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExplosionStyle {
    Burn,
    Squares,
    Circles,
}

impl ExplosionStyle {
    pub fn random(rng: &mut Pcg32) -> Self {
        match rng.random_range(0..3) {
            0 => ExplosionStyle::Burn,
            1 => ExplosionStyle::Squares,
            _ => ExplosionStyle::Circles,
        }
    }

    /// Number of effect entities this style spawns
    pub fn piece_count(self) -> usize {
        match self {
            ExplosionStyle::Burn => 1,
            ExplosionStyle::Squares => 4,
            ExplosionStyle::Circles => 16,
        }
    }

    fn spread(self) -> f32 {
        360.0 / self.piece_count() as f32
    }
}

/// Burn-through payload: hull-local points already punched out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Burn {
    pub masks: Vec<Vec2>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShardShape {
    Square,
    Circle,
}

/// Flying piece payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Shard {
    pub shape: ShardShape,
    pub opacity: f32,
}

/// Spawn a random explosion for `tank` into the world
pub fn explode(state: &mut GameState, tank: &Entity) -> ExplosionStyle {
    let base_angle = rand_floor(&mut state.rng, 0.0, 360.0);
    let style = ExplosionStyle::random(&mut state.rng);

    match style {
        ExplosionStyle::Burn => {
            let id = state.next_entity_id();
            let mut hull = Entity::new(
                id,
                tank.pos,
                tank.size,
                0.0,
                tank.color,
                EntityKind::Burn(Burn::default()),
            );
            hull.angle = tank.angle;
            state.entities.push(hull);
        }
        ExplosionStyle::Squares | ExplosionStyle::Circles => {
            let (shape, size, speed) = if style == ExplosionStyle::Squares {
                (ShardShape::Square, tank.size / 2.0, 3.0 * tank.speed)
            } else {
                (ShardShape::Circle, tank.size / 8.0, (3.0 * tank.speed).max(2.0))
            };
            for k in 0..style.piece_count() {
                let id = state.next_entity_id();
                let mut piece = Entity::new(
                    id,
                    tank.pos,
                    size,
                    speed,
                    tank.color,
                    EntityKind::Shard(Shard {
                        shape,
                        opacity: 1.0,
                    }),
                );
                piece.angle = tank.angle + base_angle + k as f32 * style.spread();
                state.entities.push(piece);
            }
        }
    }

    style
}

/// Punch another batch of holes into the hull
pub fn advance_burn(entity: &mut Entity, _now: f64, rng: &mut Pcg32) {
    let size = entity.size;
    let EntityKind::Burn(burn) = &mut entity.kind else {
        return;
    };
    for _ in 0..BURN_MASKS_PER_TICK {
        let point = if rng.random::<f32>() < 0.2 {
            // Along the gun barrel
            Vec2::new(
                rand_floor(rng, 0.0, size / 7.0) - size / 7.0,
                rand_floor(rng, 0.0, size / 2.0) + size / 2.0,
            )
        } else {
            Vec2::new(
                rand_floor(rng, -size / 2.0, size / 2.0),
                rand_floor(rng, -size / 2.0, size / 2.0),
            )
        };
        burn.masks.push(point);
    }
}

pub fn burn_expired(entity: &Entity) -> bool {
    let spent = match &entity.kind {
        EntityKind::Burn(burn) => burn.masks.len() > BURN_MASK_LIMIT,
        _ => false,
    };
    spent || entity.is_out_of_bounds_fully()
}

/// Fly outward and fade
pub fn advance_shard(entity: &mut Entity, _now: f64, _rng: &mut Pcg32) {
    entity.forward();
    if let EntityKind::Shard(shard) = &mut entity.kind {
        shard.opacity = (shard.opacity - FADE_PER_TICK).max(0.0);
    }
}

pub fn shard_expired(entity: &Entity) -> bool {
    let faded = match &entity.kind {
        EntityKind::Shard(shard) => shard.opacity <= 0.0,
        _ => false,
    };
    faded || entity.is_out_of_bounds_fully()
}
