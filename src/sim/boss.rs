//! End-of-level boss
//!
//! Stats scale with the level and with how many times the boss rush has
//! looped. There is no cap on the loop count, so every scaled quantity is
//! computed in floating point and saturated on conversion.

use serde::{Deserialize, Serialize};

use super::state::Facing;

/// Boss health for a level and loop count
pub fn boss_health(level: u32, loop_count: u32) -> u32 {
    let base = 50.0 + 25.0 * level.saturating_sub(1) as f64;
    let scale = 1.0 + loop_count as f64 * 0.5;
    // Float-to-int `as` saturates at u32::MAX
    ((base * scale).floor() as u32).max(1)
}

/// Loop-driven aggression multiplier for speed and damage
#[inline]
pub fn aggression(loop_count: u32) -> f32 {
    1.0 + loop_count as f32 * 0.3
}

/// Boss movement per boss step
pub fn boss_speed(loop_count: u32) -> f32 {
    0.15 * aggression(loop_count)
}

/// Boss contact damage per boss step
pub fn boss_damage(loop_count: u32) -> f32 {
    3.0 * aggression(loop_count)
}

/// The single live boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub x: f32,
    pub health: u32,
    pub max_health: u32,
    pub facing: Facing,
    /// Boss steps left before the next contact hit may land
    pub attack_cooldown: u32,
    pub speed: f32,
    pub damage: f32,
}

impl Boss {
    pub fn spawn(id: u32, level: u32, loop_count: u32, start_x: f32) -> Self {
        let health = boss_health(level, loop_count);
        Self {
            id,
            x: start_x,
            health,
            max_health: health,
            facing: Facing::Left,
            attack_cooldown: 0,
            speed: boss_speed(loop_count),
            damage: boss_damage(loop_count),
        }
    }

    /// One boss step: close in on the player, then report contact damage
    /// (if any) for this step.
    pub fn step(&mut self, player_x: f32, contact_range: f32, cooldown_steps: u32) -> Option<f32> {
        let dx = player_x - self.x;
        if dx != 0.0 {
            self.x += self.speed.min(dx.abs()) * dx.signum();
            self.facing = Facing::from_sign(dx);
        }

        if self.attack_cooldown > 0 {
            self.attack_cooldown -= 1;
            return None;
        }
        if (self.x - player_x).abs() < contact_range {
            self.attack_cooldown = cooldown_steps;
            return Some(self.damage);
        }
        None
    }

    /// Take one hit. Returns true if this killed the boss.
    pub fn hit(&mut self) -> bool {
        self.health = self.health.saturating_sub(1);
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_scaling() {
        assert_eq!(boss_health(1, 0), 50);
        assert_eq!(boss_health(2, 0), 75);
        assert_eq!(boss_health(3, 0), 100);
        assert_eq!(boss_health(1, 1), 75);
        assert_eq!(boss_health(3, 2), 200);
    }

    #[test]
    fn test_health_saturates_on_huge_loops() {
        assert_eq!(boss_health(u32::MAX, u32::MAX), u32::MAX);
    }

    #[test]
    fn test_aggression_scaling() {
        assert!((boss_speed(0) - 0.15).abs() < 1e-6);
        assert!((boss_speed(1) - 0.195).abs() < 1e-6);
        assert!((boss_damage(0) - 3.0).abs() < 1e-6);
        assert!((boss_damage(2) - 4.8).abs() < 1e-5);
    }

    #[test]
    fn test_step_approaches_and_hits() {
        let mut boss = Boss::spawn(1, 1, 0, 85.0);
        assert!(boss.step(50.0, 8.0, 0).is_none());
        assert!((boss.x - 84.85).abs() < 1e-4);
        assert_eq!(boss.facing, Facing::Left);

        boss.x = 55.0;
        let damage = boss.step(50.0, 8.0, 0);
        assert_eq!(damage, Some(3.0));
    }

    #[test]
    fn test_cooldown_spaces_hits() {
        let mut boss = Boss::spawn(1, 1, 0, 52.0);
        assert!(boss.step(50.0, 8.0, 2).is_some());
        assert!(boss.step(50.0, 8.0, 2).is_none());
        assert!(boss.step(50.0, 8.0, 2).is_none());
        assert!(boss.step(50.0, 8.0, 2).is_some());
    }

    #[test]
    fn test_health_never_increases() {
        let mut boss = Boss::spawn(1, 1, 0, 85.0);
        let mut last = boss.health;
        while !boss.hit() {
            assert!(boss.health < last);
            last = boss.health;
        }
        assert_eq!(boss.health, 0);
        assert!(!boss.hit());
        assert_eq!(boss.health, 0);
    }
}
