//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity list order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod entity;
pub mod explosion;
pub mod gift;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod tank;
pub mod tick;

pub use collision::{collides, resolve_collisions};
pub use entity::{BEHAVIORS, Color, Entity, EntityKind, KindTag, palette};
pub use explosion::{ExplosionStyle, ShardShape};
pub use gift::GiftKind;
pub use projectile::BulletOwner;
pub use spawner::{IntervalTimer, Spawner};
pub use state::{GameEvent, GamePhase, GameState, PLAYER_INDEX, SCORE_INDEX};
pub use tick::{TickInput, tick};
