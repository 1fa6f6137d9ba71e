//! Collision detection and response
//!
//! Every entity is treated as a circle of diameter `size`. The resolver scans
//! the entities live at the start of the pass, records removals, and applies
//! them in one filter step before spawning explosions and applying gifts.

use super::entity::Entity;
use super::explosion;
use super::gift::GiftKind;
use super::projectile::BulletOwner;
use super::state::{GameEvent, GameState, PLAYER_INDEX};
use super::tank;
use crate::consts::KILL_SCORE;

/// Center distance between two entities
#[inline]
pub fn distance(a: &Entity, b: &Entity) -> f32 {
    a.pos.distance(b.pos)
}

/// True when the two bounding circles overlap
#[inline]
pub fn collides(a: &Entity, b: &Entity) -> bool {
    distance(a, b) < a.half_size() + b.half_size()
}

/// What a collision pass decided, by index into the pre-pass entity list
#[derive(Debug, Default)]
struct PassOutcome {
    doomed: Vec<bool>,
    destroyed_tanks: Vec<usize>,
    collected_gifts: Vec<usize>,
    lethal: bool,
}

/// Resolve all collisions for this tick.
///
/// A destroyed enemy tank stays collidable for the rest of the pass: every
/// player bullet overlapping it scores and explodes. A consumed bullet cannot
/// hit a second tank, and the player cannot collide with anything already
/// removed. Gifts picked up during the pass replace the effect that later
/// hazard checks see.
pub fn resolve_collisions(state: &mut GameState) {
    let outcome = scan(&state.entities);

    let destroyed: Vec<Entity> = outcome
        .destroyed_tanks
        .iter()
        .map(|&i| state.entities[i].clone())
        .collect();
    let collected: Vec<Entity> = outcome
        .collected_gifts
        .iter()
        .map(|&i| state.entities[i].clone())
        .collect();

    state.remove_flagged(&outcome.doomed);

    for enemy in &destroyed {
        state.score += KILL_SCORE;
        let style = explosion::explode(state, enemy);
        log::debug!("enemy {} destroyed ({:?}), score {}", enemy.id, style, state.score);
        state.events.push(GameEvent::EnemyDestroyed {
            pos: enemy.pos,
            style,
        });
    }

    for item in &collected {
        if tank::activate_gift(state, item) {
            if let Some(gift) = item.as_gift() {
                state.events.push(GameEvent::GiftCollected(gift.kind));
            }
        }
    }

    if outcome.lethal {
        state.game_over();
    }
}

fn scan(entities: &[Entity]) -> PassOutcome {
    let n = entities.len();
    let mut outcome = PassOutcome {
        doomed: vec![false; n],
        ..Default::default()
    };

    // Enemy tanks against player bullets
    for a in (0..n).rev() {
        if !entities[a].is_enemy_tank() {
            continue;
        }
        for b in (0..n).rev() {
            if outcome.doomed[b] || !entities[b].is_bullet_from(BulletOwner::Player) {
                continue;
            }
            if collides(&entities[a], &entities[b]) {
                outcome.doomed[a] = true;
                outcome.doomed[b] = true;
                outcome.destroyed_tanks.push(a);
            }
        }
    }

    // Player against hazards and gifts
    let Some(player) = entities.get(PLAYER_INDEX) else {
        return outcome;
    };
    let mut shielded = player.as_player().is_some_and(|p| p.is_shielded());
    for b in (0..n).rev() {
        if b == PLAYER_INDEX || outcome.doomed[b] {
            continue;
        }
        let other = &entities[b];
        let hazard = other.is_enemy_tank() || other.is_bullet_from(BulletOwner::Enemy);
        if hazard && !shielded && collides(player, other) {
            outcome.lethal = true;
            break;
        }
        let Some(gift) = other.as_gift() else {
            continue;
        };
        if collides(player, other) {
            outcome.doomed[b] = true;
            outcome.collected_gifts.push(b);
            shielded = gift.kind == GiftKind::Shield;
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::entity::{EntityKind, palette};
    use crate::sim::gift;
    use glam::Vec2;
    use crate::sim::projectile;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn circle(x: f32, y: f32, size: f32) -> Entity {
        Entity::new(0, Vec2::new(x, y), size, 0.0, palette::ENEMY, EntityKind::ScoreBoard)
    }

    /// Running world with only the reserved slots
    fn empty_world() -> GameState {
        let mut state = GameState::new(42);
        state.entities.truncate(2);
        state.resume();
        state
    }

    fn add_enemy(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut enemy = tank::spawn_enemy(id, &mut state.rng);
        enemy.pos = pos;
        state.entities.push(enemy);
        id
    }

    fn add_player_bullet(state: &mut GameState, pos: Vec2) -> u32 {
        let id = state.next_entity_id();
        let mut bullet = projectile::player_bullet(id, state.player());
        bullet.pos = pos;
        state.entities.push(bullet);
        id
    }

    #[test]
    fn test_touching_is_not_colliding() {
        let a = circle(0.0, 0.0, 10.0);
        assert!(collides(&a, &circle(9.9, 0.0, 10.0)));
        assert!(!collides(&a, &circle(10.0, 0.0, 10.0)));
    }

    #[test]
    fn test_player_hit_by_enemy_bullet_ends_run() {
        let mut state = empty_world();
        state.player_mut().pos = Vec2::new(200.0, 560.0);
        let id = state.next_entity_id();
        let mut bullet = projectile::enemy_bullet(id, None, &mut state.rng);
        bullet.pos = Vec2::new(200.0, 560.0);
        state.entities.push(bullet);

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.spawner.is_active());
        assert!(state.events.contains(&GameEvent::GameOver { score: 0 }));
    }

    #[test]
    fn test_bullet_destroys_enemy_tank() {
        let mut state = empty_world();
        let enemy = add_enemy(&mut state, Vec2::new(100.0, 50.0));
        let bullet = add_player_bullet(&mut state, Vec2::new(100.0, 50.0));

        resolve_collisions(&mut state);
        assert_eq!(state.score, 10);
        assert!(state.entities.iter().all(|e| e.id != enemy && e.id != bullet));
        let debris = state
            .entities
            .iter()
            .filter(|e| matches!(e.kind, EntityKind::Burn(_) | EntityKind::Shard(_)))
            .count();
        assert!(debris == 1 || debris == 4 || debris == 16);
        assert!(matches!(
            state.events.as_slice(),
            [GameEvent::EnemyDestroyed { .. }]
        ));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_every_bullet_on_a_dying_tank_scores() {
        let mut state = empty_world();
        add_enemy(&mut state, Vec2::new(100.0, 50.0));
        for _ in 0..3 {
            add_player_bullet(&mut state, Vec2::new(100.0, 52.0));
        }

        resolve_collisions(&mut state);
        assert_eq!(state.score, 30);
        assert_eq!(state.count_where(|e| e.is_bullet_from(BulletOwner::Player)), 0);
        assert_eq!(state.count_where(Entity::is_enemy_tank), 0);
        assert_eq!(state.events.len(), 3);
        assert!(
            state
                .events
                .iter()
                .all(|e| matches!(e, GameEvent::EnemyDestroyed { .. }))
        );
    }

    #[test]
    fn test_consumed_bullet_hits_only_one_tank() {
        let mut state = empty_world();
        add_enemy(&mut state, Vec2::new(100.0, 50.0));
        add_enemy(&mut state, Vec2::new(104.0, 50.0));
        add_player_bullet(&mut state, Vec2::new(102.0, 50.0));

        resolve_collisions(&mut state);
        assert_eq!(state.score, 10);
        assert_eq!(state.count_where(Entity::is_enemy_tank), 1);
    }

    #[test]
    fn test_player_ignores_tank_destroyed_this_pass() {
        let mut state = empty_world();
        let pos = state.player().pos;
        add_enemy(&mut state, pos);
        add_player_bullet(&mut state, pos);

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.score, 10);
    }

    #[test]
    fn test_shield_blocks_lethal_hit() {
        let mut state = empty_world();
        let id = state.next_entity_id();
        let shield = gift::spawn_gift(id, GiftKind::Shield, Some(Vec2::ZERO), &mut state.rng);
        tank::activate_gift(&mut state, &shield);

        let pos = state.player().pos;
        add_enemy(&mut state, pos);
        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::Running);
        assert_eq!(state.count_where(Entity::is_enemy_tank), 1);
    }

    fn add_enemy_bullet(state: &mut GameState, pos: Vec2) {
        let id = state.next_entity_id();
        let mut bullet = projectile::enemy_bullet(id, None, &mut state.rng);
        bullet.pos = pos;
        state.entities.push(bullet);
    }

    fn add_gift(state: &mut GameState, kind: GiftKind, pos: Vec2) {
        let id = state.next_entity_id();
        let item = gift::spawn_gift(id, kind, Some(pos), &mut state.rng);
        state.entities.push(item);
    }

    #[test]
    fn test_newer_shield_gift_saves_from_older_bullet() {
        let mut state = empty_world();
        let pos = state.player().pos;
        add_enemy_bullet(&mut state, pos);
        add_gift(&mut state, GiftKind::Shield, pos);

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::Running);
        assert!(state.player().as_player().unwrap().is_shielded());
        assert_eq!(state.events, vec![GameEvent::GiftCollected(GiftKind::Shield)]);
    }

    #[test]
    fn test_newer_gift_replaces_shield_before_older_bullet() {
        let mut state = empty_world();
        let id = state.next_entity_id();
        let shield = gift::spawn_gift(id, GiftKind::Shield, Some(Vec2::ZERO), &mut state.rng);
        tank::activate_gift(&mut state, &shield);

        let pos = state.player().pos;
        add_enemy_bullet(&mut state, pos);
        add_gift(&mut state, GiftKind::FiveShot, pos);

        resolve_collisions(&mut state);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_player_collects_gift() {
        let mut state = empty_world();
        let pos = state.player().pos;
        let id = state.next_entity_id();
        let item = gift::spawn_gift(id, GiftKind::FiveShot, Some(pos), &mut state.rng);
        state.entities.push(item);

        resolve_collisions(&mut state);
        assert!(state.entities.iter().all(|e| e.id != id));
        let player = state.player().as_player().unwrap();
        assert_eq!(player.effect_kind(), Some(GiftKind::FiveShot));
        assert_eq!(state.events, vec![GameEvent::GiftCollected(GiftKind::FiveShot)]);
    }

    #[test]
    fn test_enemy_bullets_do_not_hit_enemy_tanks() {
        let mut state = empty_world();
        add_enemy(&mut state, Vec2::new(100.0, 100.0));
        let id = state.next_entity_id();
        let mut bullet = projectile::enemy_bullet(id, None, &mut state.rng);
        bullet.pos = Vec2::new(100.0, 100.0);
        state.entities.push(bullet);

        let before = state.entities.len();
        resolve_collisions(&mut state);
        assert_eq!(state.entities.len(), before);
        assert_eq!(state.score, 0);
    }

    proptest! {
        #[test]
        fn collision_is_symmetric(
            ax in 0.0f32..400.0, ay in 0.0f32..600.0, asz in 1.0f32..30.0,
            bx in 0.0f32..400.0, by in 0.0f32..600.0, bsz in 1.0f32..30.0,
        ) {
            let a = circle(ax, ay, asz);
            let b = circle(bx, by, bsz);
            prop_assert_eq!(collides(&a, &b), collides(&b, &a));
        }
    }
}
