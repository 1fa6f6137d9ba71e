//! Power-up gifts drifting down from the top edge

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::entity::{Color, Entity, EntityKind, palette, rand_floor};
use crate::consts::{GIFT_DEFAULT_DURATION_MS, GIFT_SIZE, PLAYFIELD_WIDTH, TRIPLE_SHOT_DURATION_MS};

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GiftKind {
    /// Three bullets fanned out per shot
    TripleShot,
    /// Five bullets fired in quick succession
    FiveShot,
    /// Immunity to enemy tanks and bullets
    Shield,
}

impl GiftKind {
    pub const ALL: [GiftKind; 3] = [GiftKind::TripleShot, GiftKind::FiveShot, GiftKind::Shield];

    pub fn color(self) -> Color {
        match self {
            GiftKind::TripleShot => palette::TRIPLE_SHOT,
            GiftKind::FiveShot => palette::FIVE_SHOT,
            GiftKind::Shield => palette::SHIELD,
        }
    }

    pub fn duration_ms(self) -> f64 {
        match self {
            GiftKind::TripleShot => TRIPLE_SHOT_DURATION_MS,
            GiftKind::FiveShot | GiftKind::Shield => GIFT_DEFAULT_DURATION_MS,
        }
    }

    pub fn random(rng: &mut Pcg32) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }
}

/// Gift payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gift {
    pub kind: GiftKind,
    pub duration_ms: f64,
}

/// Gift entity at `pos`, or at a random spot on the top edge
pub fn spawn_gift(id: u32, kind: GiftKind, pos: Option<Vec2>, rng: &mut Pcg32) -> Entity {
    let speed = rng.random::<f32>().max(0.5);
    let half = GIFT_SIZE / 2.0;
    let pos = pos.unwrap_or_else(|| Vec2::new(rand_floor(rng, half, PLAYFIELD_WIDTH - half), -half));
    Entity::new(
        id,
        pos,
        GIFT_SIZE,
        speed,
        kind.color(),
        EntityKind::Gift(Gift {
            kind,
            duration_ms: kind.duration_ms(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_gift_durations() {
        assert_eq!(GiftKind::TripleShot.duration_ms(), 10000.0);
        assert_eq!(GiftKind::FiveShot.duration_ms(), 5000.0);
        assert_eq!(GiftKind::Shield.duration_ms(), 5000.0);
    }

    #[test]
    fn test_gift_drifts_down_from_top() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut gift = spawn_gift(1, GiftKind::Shield, None, &mut rng);
        assert_eq!(gift.pos.y, -GIFT_SIZE / 2.0);
        assert!(gift.speed >= 0.5 && gift.speed < 1.0);
        assert_eq!(gift.color, palette::SHIELD);

        let y = gift.pos.y;
        gift.forward();
        assert!(gift.pos.y > y);
    }

    #[test]
    fn test_random_kind_covers_all() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..100 {
            seen.insert(GiftKind::random(&mut rng));
        }
        assert_eq!(seen.len(), 3);
    }
}
