//! Player and enemy tanks
//!
//! Timed behavior (volley shots, effect expiry, enemy turns) is stored as
//! deadlines on the tank and evaluated against the world clock each tick.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, palette, rand_floor};
use super::gift::GiftKind;
use super::projectile;
use super::state::GameState;
use crate::consts::*;

/// Effect granted by the last collected gift
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveEffect {
    pub kind: GiftKind,
    /// Clock time (ms) at which the effect lapses
    pub expires_at: f64,
}

/// Remaining shots of a delayed five-shot volley
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volley {
    pub remaining: u32,
    pub next_shot_at: f64,
}

/// Player tank state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerTank {
    pub effect: Option<ActiveEffect>,
    /// Clock time of the last accepted fire command
    pub last_fire_at: Option<f64>,
    pub volley: Option<Volley>,
}

impl PlayerTank {
    pub fn effect_kind(&self) -> Option<GiftKind> {
        self.effect.map(|e| e.kind)
    }

    pub fn is_shielded(&self) -> bool {
        self.effect_kind() == Some(GiftKind::Shield)
    }

    /// Whether a fire command at `now` would be accepted
    pub fn can_fire(&self, now: f64) -> bool {
        match self.last_fire_at {
            Some(last) => now - last >= FIRE_COOLDOWN_MS,
            None => true,
        }
    }
}

/// In-progress heading correction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotation {
    /// Degrees still to turn; steps drive this toward zero
    pub remaining: f32,
    pub next_step_at: f64,
}

/// Enemy tank state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnemyTank {
    pub rotation: Option<Rotation>,
}

impl EnemyTank {
    pub fn is_rotating(&self) -> bool {
        self.rotation.is_some()
    }
}

/// Player tank centered near the bottom edge, facing up
pub fn spawn_player(id: u32) -> Entity {
    let pos = Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT - TANK_SIZE * 2.0);
    let mut tank = Entity::new(
        id,
        pos,
        TANK_SIZE,
        0.0,
        palette::PLAYER,
        EntityKind::PlayerTank(PlayerTank::default()),
    );
    tank.angle = 180.0;
    tank
}

/// Enemy tank entering from a random spot on the top edge
pub fn spawn_enemy(id: u32, rng: &mut Pcg32) -> Entity {
    let speed = (rng.random::<f32>() * 0.8).max(0.4);
    let angle = rand_floor(rng, -10.0, 10.0);
    let half = TANK_SIZE / 2.0;
    let x = rand_floor(rng, half, PLAYFIELD_WIDTH - half);
    let mut tank = Entity::new(
        id,
        Vec2::new(x, -half),
        TANK_SIZE,
        speed,
        palette::ENEMY,
        EntityKind::EnemyTank(EnemyTank::default()),
    );
    tank.angle = angle;
    tank
}

/// Begin turning an enemy tank by `delta` degrees, taking the first step now
pub fn start_rotation(tank: &mut Entity, delta: f32, now: f64) {
    let EntityKind::EnemyTank(enemy) = &mut tank.kind else {
        return;
    };
    enemy.rotation = Some(Rotation {
        remaining: delta,
        next_step_at: now,
    });
    step_rotation(tank, now);
}

/// Apply every rotation step due at `now`
fn step_rotation(tank: &mut Entity, now: f64) {
    let EntityKind::EnemyTank(enemy) = &mut tank.kind else {
        return;
    };
    while let Some(rot) = enemy.rotation.as_mut() {
        if rot.remaining.abs() < f32::EPSILON {
            enemy.rotation = None;
            break;
        }
        if rot.next_step_at > now {
            break;
        }
        let step = if rot.remaining >= 0.0 {
            -ENEMY_TURN_STEP
        } else {
            ENEMY_TURN_STEP
        };
        tank.angle += step;
        rot.remaining += step;
        rot.next_step_at += ENEMY_TURN_INTERVAL_MS;
    }
}

/// Per-tick enemy update: pending turn steps, maybe a new maneuver, then move
pub fn advance_enemy(tank: &mut Entity, now: f64, rng: &mut Pcg32) {
    step_rotation(tank, now);

    let rotating = tank.as_enemy().is_some_and(EnemyTank::is_rotating);
    if !rotating && rng.random_bool(ENEMY_TURN_CHANCE) {
        let delta = rand_floor(rng, -90.0, 90.0);
        start_rotation(tank, delta, now);
    }

    tank.forward();
}

/// Shift the player left unless that would cross the playfield edge
pub fn move_left(state: &mut GameState) {
    shift_player(state, -PLAYER_MOVE_STEP);
}

/// Shift the player right unless that would cross the playfield edge
pub fn move_right(state: &mut GameState) {
    shift_player(state, PLAYER_MOVE_STEP);
}

fn shift_player(state: &mut GameState, dx: f32) {
    let tank = state.player_mut();
    let target = tank.pos + Vec2::new(dx, 0.0);
    if tank.is_out_of_bounds_partially_at(target) {
        return;
    }
    tank.pos = target;
}

/// Fire according to the active effect.
///
/// Returns false if the previous accepted fire was less than a second ago.
pub fn fire(state: &mut GameState) -> bool {
    let now = state.clock_ms;
    let Some(player) = state.player().as_player() else {
        return false;
    };
    if !player.can_fire(now) {
        return false;
    }

    match player.effect_kind() {
        Some(GiftKind::TripleShot) => {
            for offset in [0.0, -TRIPLE_SHOT_DEVIATION, TRIPLE_SHOT_DEVIATION] {
                let id = state.next_entity_id();
                let mut bullet = projectile::player_bullet(id, state.player());
                bullet.angle += offset;
                state.entities.push(bullet);
            }
        }
        Some(GiftKind::FiveShot) => {
            shoot_one(state);
            if let Some(player) = state.player_mut().as_player_mut() {
                player.volley = Some(Volley {
                    remaining: FIVE_SHOT_COUNT - 1,
                    next_shot_at: now + FIVE_SHOT_DELAY_MS,
                });
            }
        }
        Some(GiftKind::Shield) | None => shoot_one(state),
    }

    if let Some(player) = state.player_mut().as_player_mut() {
        player.last_fire_at = Some(now);
    }
    log::debug!("player fired at {:.0}ms", now);
    true
}

fn shoot_one(state: &mut GameState) {
    let id = state.next_entity_id();
    let bullet = projectile::player_bullet(id, state.player());
    state.entities.push(bullet);
}

/// Apply a collected gift to the player.
///
/// Replaces any current effect and its expiry. Non-gift entities are ignored.
pub fn activate_gift(state: &mut GameState, item: &Entity) -> bool {
    let Some(gift) = item.as_gift() else {
        return false;
    };
    let expires_at = state.clock_ms + gift.duration_ms;
    let tank = state.player_mut();
    let EntityKind::PlayerTank(player) = &mut tank.kind else {
        return false;
    };
    player.effect = Some(ActiveEffect {
        kind: gift.kind,
        expires_at,
    });
    tank.color = item.color;
    log::debug!("{:?} active until {:.0}ms", gift.kind, expires_at);
    true
}

/// Drop the active effect and restore the default color
pub fn expire_gift(state: &mut GameState) {
    let tank = state.player_mut();
    if let EntityKind::PlayerTank(player) = &mut tank.kind {
        player.effect = None;
        tank.color = palette::PLAYER;
    }
}

/// Fire due volley shots and lapse an expired effect
pub fn update_player(state: &mut GameState) {
    let now = state.clock_ms;

    loop {
        let Some(volley) = state.player().as_player().and_then(|p| p.volley) else {
            break;
        };
        if volley.next_shot_at > now {
            break;
        }
        shoot_one(state);
        if let Some(player) = state.player_mut().as_player_mut() {
            player.volley = (volley.remaining > 1).then(|| Volley {
                remaining: volley.remaining - 1,
                next_shot_at: volley.next_shot_at + FIVE_SHOT_DELAY_MS,
            });
        }
    }

    let expired = state
        .player()
        .as_player()
        .and_then(|p| p.effect)
        .is_some_and(|effect| effect.expires_at <= now);
    if expired {
        expire_gift(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::gift;
    use crate::sim::projectile::BulletOwner;
    use rand::SeedableRng;

    fn player_bullets(state: &GameState) -> usize {
        state
            .entities
            .iter()
            .filter(|e| e.is_bullet_from(BulletOwner::Player))
            .count()
    }

    fn give(state: &mut GameState, kind: GiftKind) {
        let id = state.next_entity_id();
        let item = gift::spawn_gift(id, kind, Some(Vec2::new(50.0, 50.0)), &mut state.rng);
        assert!(activate_gift(state, &item));
    }

    #[test]
    fn test_fire_rate_limited() {
        let mut state = GameState::new(7);
        assert!(fire(&mut state));
        state.clock_ms += 999.0;
        assert!(!fire(&mut state));
        assert_eq!(player_bullets(&state), 1);

        state.clock_ms += 1.0;
        assert!(fire(&mut state));
        assert_eq!(player_bullets(&state), 2);
    }

    #[test]
    fn test_triple_shot_spread() {
        let mut state = GameState::new(7);
        give(&mut state, GiftKind::TripleShot);
        assert!(fire(&mut state));

        let mut angles: Vec<f32> = state
            .entities
            .iter()
            .filter(|e| e.is_bullet_from(BulletOwner::Player))
            .map(|e| e.angle)
            .collect();
        angles.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(angles, vec![175.0, 180.0, 185.0]);
    }

    #[test]
    fn test_five_shot_volley_is_spaced() {
        let mut state = GameState::new(7);
        give(&mut state, GiftKind::FiveShot);
        assert!(fire(&mut state));
        assert_eq!(player_bullets(&state), 1);

        state.clock_ms += 250.0;
        update_player(&mut state);
        assert_eq!(player_bullets(&state), 3);

        state.clock_ms += 1000.0;
        update_player(&mut state);
        assert_eq!(player_bullets(&state), 5);
        assert!(state.player().as_player().unwrap().volley.is_none());
    }

    #[test]
    fn test_activate_replaces_effect_and_expiry() {
        let mut state = GameState::new(7);
        give(&mut state, GiftKind::TripleShot);
        state.clock_ms = 2000.0;
        give(&mut state, GiftKind::Shield);

        let player = state.player().as_player().unwrap();
        let effect = player.effect.unwrap();
        assert_eq!(effect.kind, GiftKind::Shield);
        assert_eq!(effect.expires_at, 2000.0 + GIFT_DEFAULT_DURATION_MS);
        assert_eq!(state.player().color, palette::SHIELD);

        // The triple-shot deadline (10s) no longer applies
        state.clock_ms = 7000.0;
        update_player(&mut state);
        assert!(state.player().as_player().unwrap().effect.is_none());
        assert_eq!(state.player().color, palette::PLAYER);
    }

    #[test]
    fn test_activate_ignores_non_gift() {
        let mut state = GameState::new(7);
        let id = state.next_entity_id();
        let enemy = spawn_enemy(id, &mut state.rng);
        assert!(!activate_gift(&mut state, &enemy));
        assert!(state.player().as_player().unwrap().effect.is_none());
    }

    #[test]
    fn test_player_stops_at_edges() {
        let mut state = GameState::new(7);
        for _ in 0..1000 {
            move_left(&mut state);
        }
        assert_eq!(state.player().pos.x, TANK_SIZE / 2.0 + 0.5);
        assert!(!state.player().is_out_of_bounds_partially());

        for _ in 0..1000 {
            move_right(&mut state);
        }
        assert!(state.player().pos.x + TANK_SIZE / 2.0 <= PLAYFIELD_WIDTH);
    }

    #[test]
    fn test_rotation_steps_to_completion() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut tank = spawn_enemy(1, &mut rng);
        tank.angle = 0.0;
        start_rotation(&mut tank, 1.0, 0.0);
        assert_eq!(tank.angle, -0.25);
        assert!(tank.as_enemy().unwrap().is_rotating());

        step_rotation(&mut tank, 30.0);
        assert_eq!(tank.angle, -1.0);
        step_rotation(&mut tank, 40.0);
        assert!(!tank.as_enemy().unwrap().is_rotating());
    }

    #[test]
    fn test_negative_rotation_turns_positive() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut tank = spawn_enemy(1, &mut rng);
        tank.angle = 10.0;
        start_rotation(&mut tank, -2.0, 0.0);
        step_rotation(&mut tank, 100.0);
        assert_eq!(tank.angle, 12.0);
        assert!(!tank.as_enemy().unwrap().is_rotating());
    }

    #[test]
    fn test_enemy_spawn_ranges() {
        let mut rng = Pcg32::seed_from_u64(11);
        for id in 0..200 {
            let tank = spawn_enemy(id, &mut rng);
            assert!(tank.angle >= -10.0 && tank.angle < 10.0);
            assert!(tank.pos.x >= TANK_SIZE / 2.0 - 1.0);
            assert!(tank.pos.x < PLAYFIELD_WIDTH - TANK_SIZE / 2.0);
            assert_eq!(tank.pos.y, -TANK_SIZE / 2.0);
            assert!(tank.speed >= 0.4 && tank.speed <= 0.8);
            assert!(!tank.is_expired());
        }
    }
}
