//! Player knight and its motion model
//!
//! Motion is a per-tick acceleration/friction integrator: held directions add
//! acceleration, velocity is capped by posture, friction always decays it, and
//! any axis with no held key snaps to zero so the knight never coasts.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::input::Directions;
use super::state::Facing;
use crate::consts::*;
use crate::tuning::Tuning;

/// Standing or crouching (toggled, not held)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Posture {
    #[default]
    Standing,
    Crouching,
}

/// What the knight is doing this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Action {
    #[default]
    Idle,
    Moving,
    Attacking,
}

/// Combined action/posture state used to pick a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlayerAnim {
    Idle,
    Run,
    Attack,
    CrouchIdle,
    CrouchWalk,
    CrouchAttack,
}

impl PlayerAnim {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerAnim::Idle => "idle",
            PlayerAnim::Run => "run",
            PlayerAnim::Attack => "attack",
            PlayerAnim::CrouchIdle => "crouch-idle",
            PlayerAnim::CrouchWalk => "crouch-walk",
            PlayerAnim::CrouchAttack => "crouch-attack",
        }
    }
}

/// The player's knight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerState {
    /// Position in percent of the stage (x) and play-area units (y)
    pub pos: Vec2,
    pub vel: Vec2,
    pub facing: Facing,
    pub posture: Posture,
    pub action: Action,
    pub health: f32,
}

impl PlayerState {
    pub fn new(health: f32) -> Self {
        Self {
            pos: Vec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel: Vec2::ZERO,
            facing: Facing::Right,
            posture: Posture::Standing,
            action: Action::Idle,
            health,
        }
    }

    #[inline]
    pub fn is_attacking(&self) -> bool {
        self.action == Action::Attacking
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.posture == Posture::Crouching
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn toggle_crouch(&mut self) {
        self.posture = match self.posture {
            Posture::Standing => Posture::Crouching,
            Posture::Crouching => Posture::Standing,
        };
    }

    /// Enter the attack lock. Returns false if already attacking.
    pub fn begin_attack(&mut self) -> bool {
        if self.is_attacking() {
            return false;
        }
        self.action = Action::Attacking;
        self.vel = Vec2::ZERO;
        true
    }

    /// Leave the attack lock
    pub fn end_attack(&mut self) {
        if self.is_attacking() {
            self.action = Action::Idle;
        }
    }

    /// Apply damage, never dropping below zero
    pub fn take_damage(&mut self, amount: f32) {
        self.health = (self.health - amount).max(0.0);
    }

    /// Advance one tick of movement from the held directions
    pub fn step(&mut self, dirs: Directions, tuning: &Tuning) {
        let crouching = self.is_crouching();
        let cap = tuning.speed_cap(crouching);
        let accel = tuning.accel_for(crouching);
        let vertical = tuning.vertical_movement;

        if self.is_attacking() {
            // Locked in place for the whole swing
            self.vel = Vec2::ZERO;
        } else {
            if dirs.left {
                self.vel.x -= accel;
            }
            if dirs.right {
                self.vel.x += accel;
            }
            if vertical {
                if dirs.up {
                    self.vel.y += accel;
                }
                if dirs.down {
                    self.vel.y -= accel;
                }
            }

            self.vel = self.vel.clamp(Vec2::splat(-cap), Vec2::splat(cap));
            self.vel *= tuning.friction;

            if !dirs.left && !dirs.right {
                self.vel.x = 0.0;
            }
            if !vertical || (!dirs.up && !dirs.down) {
                self.vel.y = 0.0;
            }

            self.pos += self.vel;
            self.pos.x = self.pos.x.clamp(PLAY_AREA_MIN_X, PLAY_AREA_MAX_X);
            if vertical {
                self.pos.y = self.pos.y.clamp(PLAY_AREA_MIN_Y, PLAY_AREA_MAX_Y);
            }
        }

        if self.vel.x > tuning.facing_deadzone {
            self.facing = Facing::Right;
        } else if self.vel.x < -tuning.facing_deadzone {
            self.facing = Facing::Left;
        }

        if !self.is_attacking() {
            self.action = if dirs.any() { Action::Moving } else { Action::Idle };
        }
    }

    /// Sprite state: attacking > crouch-walk > crouch-idle > moving > idle
    pub fn anim(&self) -> PlayerAnim {
        match (self.action, self.posture) {
            (Action::Attacking, Posture::Crouching) => PlayerAnim::CrouchAttack,
            (Action::Attacking, Posture::Standing) => PlayerAnim::Attack,
            (Action::Moving, Posture::Crouching) => PlayerAnim::CrouchWalk,
            (Action::Idle, Posture::Crouching) => PlayerAnim::CrouchIdle,
            (Action::Moving, Posture::Standing) => PlayerAnim::Run,
            (Action::Idle, Posture::Standing) => PlayerAnim::Idle,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn right() -> Directions {
        Directions {
            right: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_accelerates_and_faces_right() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        player.facing = Facing::Left;

        player.step(right(), &tuning);

        // (0 + 0.25) * 0.85
        assert!((player.vel.x - 0.2125).abs() < 1e-5);
        assert!((player.pos.x - 50.2125).abs() < 1e-4);
        assert_eq!(player.facing, Facing::Right);
        assert_eq!(player.action, Action::Moving);
    }

    #[test]
    fn test_speed_settles_below_cap() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        for _ in 0..200 {
            player.step(right(), &tuning);
            assert!(player.vel.x <= tuning.speed_cap(false));
        }
        // Fixed point of v = (v + a) * f
        let settled = tuning.accel * tuning.friction / (1.0 - tuning.friction);
        assert!((player.vel.x - settled).abs() < 1e-3 || player.pos.x == PLAY_AREA_MAX_X);
    }

    #[test]
    fn test_release_snaps_to_zero() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        for _ in 0..10 {
            player.step(right(), &tuning);
        }
        assert!(player.vel.x > 0.0);
        player.step(Directions::default(), &tuning);
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.action, Action::Idle);
    }

    #[test]
    fn test_crouch_is_slower() {
        let tuning = Tuning::default();
        let mut standing = PlayerState::new(100.0);
        let mut crouching = PlayerState::new(100.0);
        crouching.toggle_crouch();
        for _ in 0..30 {
            standing.step(right(), &tuning);
            crouching.step(right(), &tuning);
        }
        assert!(crouching.vel.x < standing.vel.x);
        assert!(crouching.vel.x <= tuning.speed_cap(true));
        assert_eq!(crouching.anim(), PlayerAnim::CrouchWalk);
    }

    #[test]
    fn test_attack_locks_movement() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        player.step(right(), &tuning);
        assert!(player.begin_attack());
        assert!(!player.begin_attack());

        let x = player.pos.x;
        player.step(right(), &tuning);
        assert_eq!(player.pos.x, x);
        assert_eq!(player.vel, Vec2::ZERO);
        assert_eq!(player.anim(), PlayerAnim::Attack);

        player.end_attack();
        player.step(right(), &tuning);
        assert!(player.pos.x > x);
    }

    #[test]
    fn test_vertical_movement_toggle() {
        let mut tuning = Tuning::default();
        let up = Directions {
            up: true,
            ..Default::default()
        };

        let mut player = PlayerState::new(100.0);
        player.step(up, &tuning);
        assert!(player.pos.y > PLAYER_START_Y);

        tuning.vertical_movement = false;
        let mut player = PlayerState::new(100.0);
        player.step(up, &tuning);
        assert_eq!(player.pos.y, PLAYER_START_Y);
        assert_eq!(player.vel.y, 0.0);
    }

    #[test]
    fn test_clamped_to_left_edge() {
        let tuning = Tuning::default();
        let mut player = PlayerState::new(100.0);
        let left = Directions {
            left: true,
            ..Default::default()
        };
        for _ in 0..500 {
            player.step(left, &tuning);
        }
        assert_eq!(player.pos.x, PLAY_AREA_MIN_X);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_anim_priority() {
        let mut player = PlayerState::new(100.0);
        assert_eq!(player.anim(), PlayerAnim::Idle);
        player.toggle_crouch();
        assert_eq!(player.anim(), PlayerAnim::CrouchIdle);
        player.begin_attack();
        assert_eq!(player.anim(), PlayerAnim::CrouchAttack);
        assert_eq!(player.anim().as_str(), "crouch-attack");
    }

    #[test]
    fn test_damage_floors_at_zero() {
        let mut player = PlayerState::new(3.0);
        player.take_damage(5.0);
        assert_eq!(player.health, 0.0);
        assert!(player.is_dead());
    }
}
