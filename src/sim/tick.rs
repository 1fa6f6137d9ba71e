//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::collision::resolve_collisions;
use super::spawner;
use super::state::{GameState, RESERVED_SLOTS};
use super::tank;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
    /// Fire key held
    pub fire: bool,
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt_ms: f32) {
    if !state.is_running() {
        return;
    }

    state.time_ticks += 1;
    state.clock_ms += f64::from(dt_ms);

    spawner::run(state);

    if input.left {
        tank::move_left(state);
    }
    if input.right {
        tank::move_right(state);
    }
    if input.fire {
        tank::fire(state);
    }
    tank::update_player(state);

    let now = state.clock_ms;
    let GameState { entities, rng, .. } = &mut *state;
    for entity in entities.iter_mut() {
        entity.advance(now, rng);
    }

    let expired: Vec<bool> = state
        .entities
        .iter()
        .enumerate()
        .map(|(i, e)| i >= RESERVED_SLOTS && e.is_expired())
        .collect();
    state.remove_flagged(&expired);

    resolve_collisions(state);
}
