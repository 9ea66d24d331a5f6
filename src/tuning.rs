//! Game balance table
//!
//! Every gameplay constant lives here so the simulation has exactly one
//! code path. The browser host may overlay a JSON document on top of the
//! defaults; unknown fields are ignored and missing fields keep defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{PLAY_AREA_MAX_X, PLAY_AREA_MIN_X};

/// Errors raised while loading a tuning overlay
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("tuning field `{field}` is invalid: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Gameplay constants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player motion ===
    /// Velocity gained per tick while a direction is held
    pub accel: f32,
    /// Multiplicative velocity decay per tick (0 < friction < 1)
    pub friction: f32,
    /// Speed cap while standing
    pub max_speed: f32,
    /// Scales both accel and max speed while crouching
    pub crouch_factor: f32,
    /// Minimum |vx| before facing follows velocity
    pub facing_deadzone: f32,
    /// Allow up/down movement inside the play area
    pub vertical_movement: bool,
    /// Starting (and maximum) player health
    pub start_health: f32,

    // === Combat ===
    /// Melee reach, in percent of stage width
    pub attack_range: f32,
    /// How long the attack lock holds the player in place
    pub attack_lock_ms: u32,
    /// Score popup lifetime
    pub popup_lifetime_ms: u32,
    /// Pause between a boss kill and the resulting transition
    pub boss_defeat_delay_ms: u32,

    // === Level flow ===
    /// Length of the `playing` phase of a level
    pub level_duration_secs: u32,

    // === Enemies ===
    /// Distance at which enemies deal contact damage
    pub enemy_contact_range: f32,
    /// Upper bound of the random speed bonus given to each spawn
    pub enemy_speed_jitter: f32,

    // === Boss ===
    pub boss_start_x: f32,
    /// Distance at which the boss deals contact damage
    pub boss_contact_range: f32,
    /// Boss steps to wait between contact hits (0 = every step)
    pub boss_attack_cooldown_steps: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            accel: 0.25,
            friction: 0.85,
            max_speed: 1.8,
            crouch_factor: 0.5,
            facing_deadzone: 0.05,
            vertical_movement: true,
            start_health: 100.0,

            attack_range: 13.0,
            attack_lock_ms: 350,
            popup_lifetime_ms: 800,
            boss_defeat_delay_ms: 500,

            level_duration_secs: 60,

            enemy_contact_range: 5.0,
            enemy_speed_jitter: 0.1,

            boss_start_x: 85.0,
            boss_contact_range: 8.0,
            boss_attack_cooldown_steps: 0,
        }
    }
}

impl Tuning {
    /// Parse a JSON overlay and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values that would break the motion or timing invariants
    pub fn validate(&self) -> Result<(), TuningError> {
        let floats = [
            ("accel", self.accel),
            ("friction", self.friction),
            ("max_speed", self.max_speed),
            ("crouch_factor", self.crouch_factor),
            ("facing_deadzone", self.facing_deadzone),
            ("start_health", self.start_health),
            ("attack_range", self.attack_range),
            ("enemy_contact_range", self.enemy_contact_range),
            ("enemy_speed_jitter", self.enemy_speed_jitter),
            ("boss_start_x", self.boss_start_x),
            ("boss_contact_range", self.boss_contact_range),
        ];
        if let Some((field, _)) = floats.into_iter().find(|(_, v)| !v.is_finite()) {
            return Err(TuningError::Invalid {
                field,
                reason: "must be a finite number",
            });
        }

        if !(self.friction > 0.0 && self.friction < 1.0) {
            return Err(TuningError::Invalid {
                field: "friction",
                reason: "must be strictly between 0 and 1",
            });
        }
        if self.accel <= 0.0 {
            return Err(TuningError::Invalid {
                field: "accel",
                reason: "must be positive",
            });
        }
        if self.max_speed <= 0.0 {
            return Err(TuningError::Invalid {
                field: "max_speed",
                reason: "must be positive",
            });
        }
        if !(self.crouch_factor > 0.0 && self.crouch_factor <= 1.0) {
            return Err(TuningError::Invalid {
                field: "crouch_factor",
                reason: "must be in (0, 1]",
            });
        }
        if self.start_health <= 0.0 {
            return Err(TuningError::Invalid {
                field: "start_health",
                reason: "must be positive",
            });
        }
        if self.level_duration_secs == 0 {
            return Err(TuningError::Invalid {
                field: "level_duration_secs",
                reason: "must be at least one second",
            });
        }

        let non_negative = [
            ("facing_deadzone", self.facing_deadzone),
            ("attack_range", self.attack_range),
            ("enemy_contact_range", self.enemy_contact_range),
            ("enemy_speed_jitter", self.enemy_speed_jitter),
            ("boss_contact_range", self.boss_contact_range),
        ];
        if let Some((field, _)) = non_negative.into_iter().find(|(_, v)| *v < 0.0) {
            return Err(TuningError::Invalid {
                field,
                reason: "must not be negative",
            });
        }

        if !(PLAY_AREA_MIN_X..=PLAY_AREA_MAX_X).contains(&self.boss_start_x) {
            return Err(TuningError::Invalid {
                field: "boss_start_x",
                reason: "must lie inside the play area",
            });
        }
        Ok(())
    }

    /// Effective speed cap for a posture
    pub fn speed_cap(&self, crouching: bool) -> f32 {
        if crouching {
            self.max_speed * self.crouch_factor
        } else {
            self.max_speed
        }
    }

    /// Effective acceleration for a posture
    pub fn accel_for(&self, crouching: bool) -> f32 {
        if crouching {
            self.accel * self.crouch_factor
        } else {
            self.accel
        }
    }

    /// Load the overlay from the page's `<script id="tuning">` element (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let json = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match json {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overlay");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning overlay: {e}");
                    Self::default()
                }
            },
            None => {
                log::info!("Using default tuning");
                Self::default()
            }
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
