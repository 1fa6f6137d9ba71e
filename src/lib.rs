//! Tank Defense - A top-down arcade shooter on a fixed playfield
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, spawning, collisions, game state)
//! - `renderer`: Drawing surface abstraction and per-entity painters
//! - `audio`: Keyed sound bank over a pluggable playback backend
//! - `input`: Held-key bookkeeping sampled once per tick
//! - `session`: Start/stop/resume control surface and frame driver
//! - `settings`: Player preferences

pub mod audio;
pub mod input;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Resume, Session};
pub use settings::Settings;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep in milliseconds (60 Hz, one animation frame)
    pub const SIM_DT_MS: f32 = 1000.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta fed into the accumulator (ms)
    pub const MAX_FRAME_MS: f32 = 100.0;

    /// Playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Tank defaults
    pub const TANK_SIZE: f32 = 15.0;
    pub const PLAYER_MOVE_STEP: f32 = 2.0;
    /// Minimum time between two accepted fire commands
    pub const FIRE_COOLDOWN_MS: f64 = 1000.0;
    /// Heading offset of the side bullets in a triple shot (degrees)
    pub const TRIPLE_SHOT_DEVIATION: f32 = 5.0;
    pub const FIVE_SHOT_COUNT: u32 = 5;
    pub const FIVE_SHOT_DELAY_MS: f64 = 100.0;

    /// Enemy maneuvers
    pub const ENEMY_TURN_CHANCE: f64 = 0.001;
    pub const ENEMY_TURN_STEP: f32 = 0.25;
    pub const ENEMY_TURN_INTERVAL_MS: f64 = 10.0;

    /// Bullet defaults
    pub const BULLET_SIZE: f32 = 4.0;
    pub const BULLET_SPEED: f32 = 5.0;

    /// Gift defaults
    pub const GIFT_SIZE: f32 = 10.0;
    pub const GIFT_DEFAULT_DURATION_MS: f64 = 5000.0;
    pub const TRIPLE_SHOT_DURATION_MS: f64 = 10000.0;

    /// Explosion tuning
    pub const FADE_PER_TICK: f32 = 0.04;
    pub const BURN_MASKS_PER_TICK: usize = 20;
    pub const BURN_MASK_LIMIT: usize = 400;

    /// Spawner cadence
    pub const ENEMY_TANK_INTERVAL_MS: f64 = 1000.0;
    pub const ENEMY_BULLET_INTERVAL_MS: f64 = 500.0;
    pub const GIFT_INTERVAL_MS: f64 = 3000.0;

    /// Score per destroyed enemy tank
    pub const KILL_SCORE: u64 = 10;

    /// Background music starts this long after a resume
    pub const MUSIC_DELAY_MS: f64 = 1000.0;
    pub const MUSIC_VOLUME: f32 = 0.5;
}

/// Unit direction of travel for a heading in degrees.
///
/// Heading 0 points down the screen (+y), 180 points up.
#[inline]
pub fn heading_vector(angle_deg: f32) -> Vec2 {
    let rad = angle_deg.to_radians();
    Vec2::new(rad.sin(), rad.cos())
}

/// Canvas rotation (radians) that puts an entity into its local frame
#[inline]
pub fn local_rotation(angle_deg: f32) -> f32 {
    -angle_deg.to_radians()
}
