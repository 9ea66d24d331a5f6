//! Ember Knight - A side-scrolling knight brawler
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, combat, spawning, game state)
//! - `tuning`: Data-driven game balance

pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Simulation rate (player/enemy ticks per second)
    pub const TICK_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICK_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Horizontal play area, in percent of stage width
    pub const PLAY_AREA_MIN_X: f32 = 5.0;
    pub const PLAY_AREA_MAX_X: f32 = 95.0;
    /// Vertical play area (only used when vertical movement is enabled)
    pub const PLAY_AREA_MIN_Y: f32 = 0.0;
    pub const PLAY_AREA_MAX_Y: f32 = 87.0;

    /// Player spawn point
    pub const PLAYER_START_X: f32 = 50.0;
    pub const PLAYER_START_Y: f32 = 60.0;

    /// Enemy spawn points (left and right edges)
    pub const SPAWN_LEFT_X: f32 = 5.0;
    pub const SPAWN_RIGHT_X: f32 = 95.0;

    /// Countdown granularity (1 Hz)
    pub const COUNTDOWN_INTERVAL_MS: u32 = 1000;
    /// Boss AI cadence (20 Hz)
    pub const BOSS_STEP_INTERVAL_MS: u32 = 50;

    /// Level after which a boss kill loops back to level 1
    pub const FINAL_LEVEL: u32 = 3;
}

/// Convert a millisecond duration to whole simulation ticks (rounding up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    let hz = consts::TICK_HZ as u64;
    (ms as u64 * hz).div_ceil(1000)
}
