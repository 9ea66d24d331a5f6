//! Enemy spawning and approach AI
//!
//! Enemies walk straight at the player along x and burn the player every tick
//! they stay in contact.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Facing;
use crate::consts::*;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnemyKind {
    /// Fragile, fast, cheap
    Fire,
    /// Tough, slow, valuable
    Candle,
}

impl EnemyKind {
    /// Base speed in percent of stage width per tick
    pub fn base_speed(&self) -> f32 {
        match self {
            EnemyKind::Fire => 0.3,
            EnemyKind::Candle => 0.15,
        }
    }

    pub fn max_health(&self) -> u32 {
        match self {
            EnemyKind::Fire => 1,
            EnemyKind::Candle => 3,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Fire => 10,
            EnemyKind::Candle => 25,
        }
    }

    /// Damage dealt per tick of contact
    pub fn contact_damage(&self) -> f32 {
        match self {
            EnemyKind::Fire => 1.0,
            EnemyKind::Candle => 2.0,
        }
    }
}

/// A walking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub x: f32,
    pub speed: f32,
    kind: EnemyKind,
    pub health: u32,
    pub max_health: u32,
    pub facing: Facing,
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, x: f32, speed: f32) -> Self {
        let max_health = kind.max_health();
        Self {
            id,
            x,
            speed,
            kind,
            health: max_health,
            max_health,
            // Spawns at an edge, so it starts out facing the stage
            facing: if x < 50.0 { Facing::Right } else { Facing::Left },
        }
    }

    /// Type is fixed at creation
    #[inline]
    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    /// Walk one step toward `target_x`
    pub fn approach(&mut self, target_x: f32) {
        let dx = target_x - self.x;
        if dx == 0.0 {
            return;
        }
        let step = self.speed.min(dx.abs());
        self.x += step * dx.signum();
        self.facing = Facing::from_sign(dx);
    }

    /// Take one hit. Returns true if this killed the enemy.
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }

    pub fn touches(&self, player_x: f32, range: f32) -> bool {
        (self.x - player_x).abs() < range
    }
}

/// Milliseconds between spawns at a given level
pub fn spawn_interval_ms(level: u32) -> u32 {
    let reduction = 400u32.saturating_mul(level.saturating_sub(1));
    2000u32.saturating_sub(reduction).max(800)
}

/// Probability that a spawn is a candle at a given level
pub fn candle_chance(level: u32) -> f64 {
    (0.1 + 0.1 * level.saturating_sub(1) as f64).min(1.0)
}

/// Roll the type, side and speed of a new enemy
pub fn roll_enemy<R: Rng>(rng: &mut R, id: u32, level: u32, speed_jitter: f32) -> Enemy {
    let kind = if rng.random_bool(candle_chance(level)) {
        EnemyKind::Candle
    } else {
        EnemyKind::Fire
    };
    let x = if rng.random_bool(0.5) {
        SPAWN_LEFT_X
    } else {
        SPAWN_RIGHT_X
    };
    let jitter = if speed_jitter > 0.0 {
        rng.random_range(0.0..speed_jitter)
    } else {
        0.0
    };
    Enemy::new(id, kind, x, kind.base_speed() + jitter)
}
