//! Player and enemy bullets

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, palette, rand_floor};
use crate::consts::{BULLET_SIZE, BULLET_SPEED, PLAYFIELD_WIDTH};

/// Who fired a bullet; decides which collision rules apply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletOwner {
    Player,
    Enemy,
}

/// Bullet leaving the player's tank, inheriting its position, heading, and color
pub fn player_bullet(id: u32, tank: &Entity) -> Entity {
    let mut bullet = Entity::new(
        id,
        tank.pos,
        BULLET_SIZE,
        BULLET_SPEED,
        tank.color,
        EntityKind::Bullet(BulletOwner::Player),
    );
    bullet.angle = tank.angle;
    bullet
}

/// Enemy bullet fired from `source`.
///
/// Without a source tank the bullet drops straight down from a random spot on
/// the top edge.
pub fn enemy_bullet(id: u32, source: Option<&Entity>, rng: &mut Pcg32) -> Entity {
    let (pos, angle) = match source {
        Some(tank) => (tank.pos, tank.angle),
        None => (
            Vec2::new(rand_floor(rng, 0.0, PLAYFIELD_WIDTH), -BULLET_SIZE / 2.0),
            0.0,
        ),
    };
    let mut bullet = Entity::new(
        id,
        pos,
        BULLET_SIZE,
        BULLET_SPEED,
        palette::ENEMY,
        EntityKind::Bullet(BulletOwner::Enemy),
    );
    bullet.angle = angle;
    bullet
}

/// Pick a random live enemy tank to shoot from
pub fn pick_shooter<'a>(entities: &'a [Entity], rng: &mut Pcg32) -> Option<&'a Entity> {
    let tanks: Vec<&Entity> = entities.iter().filter(|e| e.is_enemy_tank()).collect();
    if tanks.is_empty() {
        return None;
    }
    Some(tanks[rng.random_range(0..tanks.len())])
}
