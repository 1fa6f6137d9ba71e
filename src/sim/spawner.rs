//! Fixed-interval spawning of enemy tanks, enemy bullets, and gifts

use super::gift::{self, GiftKind};
use super::projectile;
use super::state::GameState;
use super::tank;
use crate::consts::{ENEMY_BULLET_INTERVAL_MS, ENEMY_TANK_INTERVAL_MS, GIFT_INTERVAL_MS};

/// Repeating deadline on the world clock
#[derive(Debug, Clone, PartialEq)]
pub struct IntervalTimer {
    period_ms: f64,
    next_due_at: Option<f64>,
}

impl IntervalTimer {
    pub const fn new(period_ms: f64) -> Self {
        Self {
            period_ms,
            next_due_at: None,
        }
    }

    /// Arm the timer; its first firing is one period after `now`.
    ///
    /// Starting an armed timer changes nothing.
    pub fn start(&mut self, now: f64) {
        if self.next_due_at.is_none() {
            self.next_due_at = Some(now + self.period_ms);
        }
    }

    pub fn stop(&mut self) {
        self.next_due_at = None;
    }

    pub fn is_armed(&self) -> bool {
        self.next_due_at.is_some()
    }

    pub fn next_due_at(&self) -> Option<f64> {
        self.next_due_at
    }

    /// Number of firings due at `now`, advancing the deadline past them
    pub fn poll(&mut self, now: f64) -> u32 {
        let Some(mut due) = self.next_due_at else {
            return 0;
        };
        let mut fired = 0;
        while due <= now {
            fired += 1;
            due += self.period_ms;
        }
        self.next_due_at = Some(due);
        fired
    }
}

/// Firings collected from one poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpawnBatch {
    pub enemy_tanks: u32,
    pub enemy_bullets: u32,
    pub gifts: u32,
}

/// The three spawn timers, started and stopped together
#[derive(Debug, Clone, PartialEq)]
pub struct Spawner {
    enemy_tanks: IntervalTimer,
    enemy_bullets: IntervalTimer,
    gifts: IntervalTimer,
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spawner {
    pub const fn new() -> Self {
        Self {
            enemy_tanks: IntervalTimer::new(ENEMY_TANK_INTERVAL_MS),
            enemy_bullets: IntervalTimer::new(ENEMY_BULLET_INTERVAL_MS),
            gifts: IntervalTimer::new(GIFT_INTERVAL_MS),
        }
    }

    pub fn start(&mut self, now: f64) {
        self.enemy_tanks.start(now);
        self.enemy_bullets.start(now);
        self.gifts.start(now);
    }

    pub fn stop(&mut self) {
        self.enemy_tanks.stop();
        self.enemy_bullets.stop();
        self.gifts.stop();
    }

    pub fn is_active(&self) -> bool {
        self.enemy_tanks.is_armed()
    }

    #[cfg(test)]
    pub(crate) fn timers(&self) -> [&IntervalTimer; 3] {
        [&self.enemy_tanks, &self.enemy_bullets, &self.gifts]
    }

    pub fn poll(&mut self, now: f64) -> SpawnBatch {
        SpawnBatch {
            enemy_tanks: self.enemy_tanks.poll(now),
            enemy_bullets: self.enemy_bullets.poll(now),
            gifts: self.gifts.poll(now),
        }
    }
}

/// Spawn everything whose timer came due this tick
pub fn run(state: &mut GameState) {
    let batch = state.spawner.poll(state.clock_ms);

    for _ in 0..batch.enemy_tanks {
        let id = state.next_entity_id();
        let enemy = tank::spawn_enemy(id, &mut state.rng);
        log::debug!("enemy tank {} at x={:.0}", id, enemy.pos.x);
        state.entities.push(enemy);
    }

    for _ in 0..batch.enemy_bullets {
        let id = state.next_entity_id();
        let shooter = projectile::pick_shooter(&state.entities, &mut state.rng);
        let bullet = projectile::enemy_bullet(id, shooter, &mut state.rng);
        state.entities.push(bullet);
    }

    for _ in 0..batch.gifts {
        let id = state.next_entity_id();
        let kind = GiftKind::random(&mut state.rng);
        let item = gift::spawn_gift(id, kind, None, &mut state.rng);
        log::debug!("{:?} gift {} dropped", kind, id);
        state.entities.push(item);
    }
}
