//! Entity record shared by every game object
//!
//! One record type carries the common spatial state plus a kind payload.
//! Kind-specific motion and expiry go through [`BEHAVIORS`], indexed by
//! [`KindTag`].

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::explosion::{self, Burn, Shard};
use super::gift::Gift;
use super::projectile::BulletOwner;
use super::tank::{self, EnemyTank, PlayerTank};
use crate::consts::{PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};
use crate::heading_vector;

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as u8,
            g: ((rgb >> 8) & 0xFF) as u8,
            b: (rgb & 0xFF) as u8,
        }
    }

    /// CSS color string (`#rrggbb`)
    pub fn to_css(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalized RGBA for vertex colors
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            alpha,
        ]
    }
}

/// Colors for game elements
pub mod palette {
    use super::Color;

    pub const PLAYER: Color = Color::hex(0xFFFFFF);
    pub const ENEMY: Color = Color::hex(0xFF4C4B);
    pub const TRIPLE_SHOT: Color = Color::hex(0x5D44FE);
    pub const FIVE_SHOT: Color = Color::hex(0xFFC638);
    pub const SHIELD: Color = Color::hex(0x61FFBC);
    pub const SCORE: Color = Color::hex(0x4D525E);
}

/// Discriminant used to index per-kind function tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KindTag {
    PlayerTank,
    EnemyTank,
    Bullet,
    Gift,
    Burn,
    Shard,
    ScoreBoard,
}

impl KindTag {
    pub const COUNT: usize = 7;

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Kind-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum EntityKind {
    PlayerTank(PlayerTank),
    EnemyTank(EnemyTank),
    Bullet(BulletOwner),
    Gift(Gift),
    /// Masked burn-through of a destroyed tank
    Burn(Burn),
    /// Fading square or circle piece of a destroyed tank
    Shard(Shard),
    /// Score display
    ScoreBoard,
}

impl EntityKind {
    pub fn tag(&self) -> KindTag {
        match self {
            EntityKind::PlayerTank(_) => KindTag::PlayerTank,
            EntityKind::EnemyTank(_) => KindTag::EnemyTank,
            EntityKind::Bullet(_) => KindTag::Bullet,
            EntityKind::Gift(_) => KindTag::Gift,
            EntityKind::Burn(_) => KindTag::Burn,
            EntityKind::Shard(_) => KindTag::Shard,
            EntityKind::ScoreBoard => KindTag::ScoreBoard,
        }
    }
}

/// A game object
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: u32,
    pub pos: Vec2,
    /// Heading in degrees, measured from the vertical axis
    pub angle: f32,
    /// Bounding square/circle diameter
    pub size: f32,
    /// Displacement per tick
    pub speed: f32,
    pub color: Color,
    pub kind: EntityKind,
}

/// Per-kind behavior table entry
pub struct Behavior {
    /// Per-tick motion and timed state
    pub advance: fn(&mut Entity, f64, &mut Pcg32),
    pub is_expired: fn(&Entity) -> bool,
}

/// Behavior table, indexed by [`KindTag::index`]
pub static BEHAVIORS: [Behavior; KindTag::COUNT] = [
    // PlayerTank: moved only by input
    Behavior {
        advance: hold_still,
        is_expired: Entity::is_out_of_bounds_fully,
    },
    // EnemyTank
    Behavior {
        advance: tank::advance_enemy,
        is_expired: Entity::is_out_of_bounds_fully,
    },
    // Bullet
    Behavior {
        advance: move_forward,
        is_expired: Entity::is_out_of_bounds_fully,
    },
    // Gift
    Behavior {
        advance: move_forward,
        is_expired: Entity::is_out_of_bounds_fully,
    },
    // Burn
    Behavior {
        advance: explosion::advance_burn,
        is_expired: explosion::burn_expired,
    },
    // Shard
    Behavior {
        advance: explosion::advance_shard,
        is_expired: explosion::shard_expired,
    },
    // ScoreBoard
    Behavior {
        advance: hold_still,
        is_expired: Entity::is_out_of_bounds_fully,
    },
];

fn hold_still(_entity: &mut Entity, _now: f64, _rng: &mut Pcg32) {}

fn move_forward(entity: &mut Entity, _now: f64, _rng: &mut Pcg32) {
    entity.forward();
}

impl Entity {
    pub fn new(id: u32, pos: Vec2, size: f32, speed: f32, color: Color, kind: EntityKind) -> Self {
        debug_assert!(size > 0.0, "entity size must be positive");
        Self {
            id,
            pos,
            angle: 0.0,
            size,
            speed,
            color,
            kind,
        }
    }

    #[inline]
    pub fn tag(&self) -> KindTag {
        self.kind.tag()
    }

    #[inline]
    pub fn behavior(&self) -> &'static Behavior {
        &BEHAVIORS[self.tag().index()]
    }

    /// Move `speed` along the heading
    pub fn forward(&mut self) {
        self.pos += heading_vector(self.angle) * self.speed;
    }

    /// Move `speed` against the heading
    pub fn backward(&mut self) {
        self.pos -= heading_vector(self.angle) * self.speed;
    }

    /// Run this kind's per-tick update
    pub fn advance(&mut self, now: f64, rng: &mut Pcg32) {
        (self.behavior().advance)(self, now, rng);
    }

    pub fn is_expired(&self) -> bool {
        (self.behavior().is_expired)(self)
    }

    #[inline]
    pub fn half_size(&self) -> f32 {
        self.size / 2.0
    }

    /// Bounding box crosses a playfield edge at `pos`
    pub fn is_out_of_bounds_partially_at(&self, pos: Vec2) -> bool {
        let r = self.half_size();
        pos.x - r < 0.0
            || pos.x + r > PLAYFIELD_WIDTH
            || pos.y - r < 0.0
            || pos.y + r > PLAYFIELD_HEIGHT
    }

    pub fn is_out_of_bounds_partially(&self) -> bool {
        self.is_out_of_bounds_partially_at(self.pos)
    }

    /// Bounding box lies entirely outside the playfield at `pos`
    pub fn is_out_of_bounds_fully_at(&self, pos: Vec2) -> bool {
        let r = self.half_size();
        pos.x + r < 0.0
            || pos.x - r > PLAYFIELD_WIDTH
            || pos.y + r < 0.0
            || pos.y - r > PLAYFIELD_HEIGHT
    }

    pub fn is_out_of_bounds_fully(&self) -> bool {
        self.is_out_of_bounds_fully_at(self.pos)
    }

    pub fn is_player_tank(&self) -> bool {
        matches!(self.kind, EntityKind::PlayerTank(_))
    }

    pub fn is_enemy_tank(&self) -> bool {
        matches!(self.kind, EntityKind::EnemyTank(_))
    }

    pub fn is_bullet_from(&self, owner: BulletOwner) -> bool {
        matches!(self.kind, EntityKind::Bullet(o) if o == owner)
    }

    pub fn as_gift(&self) -> Option<&Gift> {
        match &self.kind {
            EntityKind::Gift(gift) => Some(gift),
            _ => None,
        }
    }

    pub fn as_player(&self) -> Option<&PlayerTank> {
        match &self.kind {
            EntityKind::PlayerTank(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_player_mut(&mut self) -> Option<&mut PlayerTank> {
        match &mut self.kind {
            EntityKind::PlayerTank(player) => Some(player),
            _ => None,
        }
    }

    pub fn as_enemy(&self) -> Option<&EnemyTank> {
        match &self.kind {
            EntityKind::EnemyTank(enemy) => Some(enemy),
            _ => None,
        }
    }
}

/// Random integer-valued float in `[min, max)`
pub(crate) fn rand_floor(rng: &mut Pcg32, min: f32, max: f32) -> f32 {
    (rng.random::<f32>() * (max - min) + min).floor()
}
