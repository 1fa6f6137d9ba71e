//! Game state and world ownership
//!
//! The world is one owned struct passed explicitly to tick, input, and render.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::entity::{Entity, EntityKind, palette};
use super::explosion::ExplosionStyle;
use super::gift::GiftKind;
use super::spawner::Spawner;
use super::tank;
use crate::consts::PLAYFIELD_WIDTH;

/// Slot of the player tank in the entity list
pub const PLAYER_INDEX: usize = 0;
/// Slot of the score display in the entity list
pub const SCORE_INDEX: usize = 1;
/// Slots that are never filtered out
pub const RESERVED_SLOTS: usize = 2;

/// Size of the score display's bounding square
const SCORE_BOARD_SIZE: f32 = 30.0;

/// Current phase of the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Spawners and tick active
    Running,
    /// Halted, can be resumed
    Stopped,
    /// Run ended by a lethal collision
    GameOver,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    EnemyDestroyed {
        pos: Vec2,
        style: ExplosionStyle,
    },
    GiftCollected(GiftKind),
    GameOver {
        score: u64,
    },
}

/// Complete game state (deterministic for a given seed and input sequence)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Simulation clock in milliseconds; advances only while running
    pub clock_ms: f64,
    pub phase: GamePhase,
    /// Live entities; slot 0 is the player tank, slot 1 the score display
    pub entities: Vec<Entity>,
    pub spawner: Spawner,
    /// Events produced since the last drain
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Fresh world: player tank, score display, and one enemy, not yet running
    pub fn new(seed: u64) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            score: 0,
            time_ticks: 0,
            clock_ms: 0.0,
            phase: GamePhase::Stopped,
            entities: Vec::new(),
            spawner: Spawner::new(),
            events: Vec::new(),
            next_id: 1,
        };

        let id = state.next_entity_id();
        state.entities.push(tank::spawn_player(id));

        let id = state.next_entity_id();
        state.entities.push(Entity::new(
            id,
            Vec2::new(PLAYFIELD_WIDTH - 40.0, 60.0),
            SCORE_BOARD_SIZE,
            0.0,
            palette::SCORE,
            EntityKind::ScoreBoard,
        ));

        let id = state.next_entity_id();
        let enemy = tank::spawn_enemy(id, &mut state.rng);
        state.entities.push(enemy);

        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn player(&self) -> &Entity {
        &self.entities[PLAYER_INDEX]
    }

    pub fn player_mut(&mut self) -> &mut Entity {
        &mut self.entities[PLAYER_INDEX]
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Start ticking and arm the spawners. No effect while running or after game over.
    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Stopped {
            return false;
        }
        self.phase = GamePhase::Running;
        self.spawner.start(self.clock_ms);
        true
    }

    /// Stop ticking and disarm the spawners
    pub fn halt(&mut self) -> bool {
        self.spawner.stop();
        if self.phase != GamePhase::Running {
            return false;
        }
        self.phase = GamePhase::Stopped;
        true
    }

    /// End the run after a lethal hit
    pub fn game_over(&mut self) {
        self.spawner.stop();
        self.phase = GamePhase::GameOver;
        self.events.push(GameEvent::GameOver { score: self.score });
        log::info!("Game over with score {}", self.score);
    }

    /// Remove entities at the flagged positions in one pass.
    ///
    /// Reserved slots are kept regardless of their flag.
    pub fn remove_flagged(&mut self, flags: &[bool]) {
        let mut index = 0;
        self.entities.retain(|_| {
            let keep = index < RESERVED_SLOTS || !flags.get(index).copied().unwrap_or(false);
            index += 1;
            keep
        });
    }

    /// Take all pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Count of live entities of a kind
    pub fn count_where(&self, pred: impl Fn(&Entity) -> bool) -> usize {
        self.entities.iter().filter(|&e| pred(e)).count()
    }
}
