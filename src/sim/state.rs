//! Game session and core simulation types
//!
//! The session owns every live entity; the presentation layer only ever sees
//! a [`Snapshot`].

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::boss::Boss;
use super::enemy::{Enemy, EnemyKind};
use super::player::{PlayerAnim, PlayerState};
use super::schedule::{ScheduledEvent, Scheduler};
use crate::consts::*;
use crate::ms_to_ticks;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GamePhase {
    /// Title screen, waiting for start
    Menu,
    /// Level timer running, enemies spawning
    Playing,
    /// Boss fight
    Boss,
    /// Boss beaten, waiting for confirm to start the next level
    LevelComplete,
    /// Player died
    GameOver,
}

impl GamePhase {
    /// Phases in which the player and entities are simulated
    pub fn is_active(&self) -> bool {
        matches!(self, GamePhase::Playing | GamePhase::Boss)
    }
}

/// Which way an entity is looking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Facing {
    Left,
    #[default]
    Right,
}

impl Facing {
    /// Facing for a signed x offset (zero counts as right)
    pub fn from_sign(dx: f32) -> Self {
        if dx < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// Is `target_x` strictly in front of an entity at `from_x`
    pub fn is_in_front(&self, from_x: f32, target_x: f32) -> bool {
        match self {
            Facing::Right => target_x > from_x,
            Facing::Left => target_x < from_x,
        }
    }
}

/// Floating "+N" shown where something died
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScorePopup {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub points: u64,
}

/// Things that happened during a tick, for audio and effects
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum GameEvent {
    LevelStarted { level: u32 },
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyKilled { id: u32, kind: EnemyKind, x: f32, points: u64 },
    PlayerDamaged { amount: f32 },
    BossSpawned { id: u32, health: u32 },
    BossHit { id: u32, health: u32 },
    BossDefeated { id: u32, x: f32, points: u64 },
    BossLoop { loop_count: u32 },
    LevelComplete { level: u32 },
    GameOver { score: u64 },
}

/// Complete game session (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    rng: Pcg32,
    /// Balance table
    pub tuning: Tuning,
    /// Current phase
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    /// Times the boss rush has looped back past the final level
    pub boss_loop_count: u32,
    /// Seconds left before the boss appears
    pub time_remaining: u32,
    /// Score
    pub score: u64,
    /// Simulation tick counter (the logical clock)
    pub time_ticks: u64,
    /// Tick at which the next enemy spawns
    pub next_spawn_tick: u64,
    /// Tick at which the level countdown next decrements
    pub next_countdown_tick: u64,
    /// Player knight
    pub player: PlayerState,
    /// Live enemies (sorted by id)
    pub enemies: Vec<Enemy>,
    /// At most one boss
    pub boss: Option<Boss>,
    /// Live score popups (sorted by id)
    pub popups: Vec<ScorePopup>,
    /// Events from the most recent tick
    pub events: Vec<GameEvent>,
    /// Delayed actions
    pub schedule: Scheduler,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new session at the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            player: PlayerState::new(tuning.start_health),
            time_remaining: tuning.level_duration_secs,
            tuning,
            phase: GamePhase::Menu,
            level: 1,
            boss_loop_count: 0,
            score: 0,
            time_ticks: 0,
            next_spawn_tick: 0,
            next_countdown_tick: 0,
            enemies: Vec::new(),
            boss: None,
            popups: Vec::new(),
            events: Vec::new(),
            schedule: Scheduler::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn rng(&mut self) -> &mut Pcg32 {
        &mut self.rng
    }

    /// Cancel every pending timer and drop transient entities
    pub fn teardown(&mut self) {
        self.schedule.cancel_all();
        self.player.end_attack();
        self.enemies.clear();
        self.boss = None;
        self.popups.clear();
    }

    /// Reset score, health, level and loop count, then start level 1
    pub fn reset_session(&mut self) {
        self.teardown();
        self.score = 0;
        self.level = 1;
        self.boss_loop_count = 0;
        self.player = PlayerState::new(self.tuning.start_health);
        self.begin_level();
    }

    /// Enter `playing` for the current level with a fresh timer and spawner
    pub fn begin_level(&mut self) {
        self.time_remaining = self.tuning.level_duration_secs;
        self.next_countdown_tick = self.time_ticks + ms_to_ticks(COUNTDOWN_INTERVAL_MS);
        self.next_spawn_tick =
            self.time_ticks + ms_to_ticks(super::enemy::spawn_interval_ms(self.level));
        self.phase = GamePhase::Playing;
        log::info!("Level {} started (loop {})", self.level, self.boss_loop_count);
        self.events.push(GameEvent::LevelStarted { level: self.level });
    }

    /// Spawn the boss for the current level and loop count
    pub fn spawn_boss(&mut self) {
        let id = self.next_entity_id();
        let boss = Boss::spawn(id, self.level, self.boss_loop_count, self.tuning.boss_start_x);
        log::info!(
            "Boss spawned: level={}, loop={}, health={}",
            self.level,
            self.boss_loop_count,
            boss.health
        );
        self.events.push(GameEvent::BossSpawned {
            id,
            health: boss.health,
        });
        self.boss = Some(boss);
    }

    /// Award points and float a popup at the kill site
    pub fn award(&mut self, x: f32, points: u64) {
        self.score = self.score.saturating_add(points);
        let id = self.next_entity_id();
        self.popups.push(ScorePopup {
            id,
            x,
            y: self.player.pos.y,
            points,
        });
        let due = self.time_ticks + ms_to_ticks(self.tuning.popup_lifetime_ms);
        self.schedule
            .schedule(due, ScheduledEvent::ExpirePopup { popup_id: id });
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.popups.sort_by_key(|p| p.id);
    }

    /// Read-only view for the presentation layer
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            phase: self.phase,
            level: self.level,
            boss_loop_count: self.boss_loop_count,
            score: self.score,
            time_remaining: self.time_remaining,
            health: self.player.health,
            player: PlayerView {
                x: self.player.pos.x,
                y: self.player.pos.y,
                vx: self.player.vel.x,
                vy: self.player.vel.y,
                facing: self.player.facing,
                anim: self.player.anim(),
            },
            enemies: self.enemies.clone(),
            boss: self.boss.clone(),
            popups: self.popups.clone(),
            events: self.events.clone(),
        }
    }
}

/// Player fields the presentation layer needs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    pub anim: PlayerAnim,
}

/// Per-tick output of the simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    pub level: u32,
    pub boss_loop_count: u32,
    pub score: u64,
    pub time_remaining: u32,
    pub health: f32,
    pub player: PlayerView,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub popups: Vec<ScorePopup>,
    pub events: Vec<GameEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_starts_at_menu() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.health, 100.0);
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_award_schedules_popup_expiry() {
        let mut state = GameState::new(1, Tuning::default());
        state.award(55.0, 10);
        assert_eq!(state.score, 10);
        assert_eq!(state.popups.len(), 1);
        let id = state.popups[0].id;
        assert!(state.schedule.is_pending(ScheduledEvent::ExpirePopup { popup_id: id }));
    }

    #[test]
    fn test_score_saturates() {
        let mut state = GameState::new(1, Tuning::default());
        state.score = u64::MAX - 5;
        state.award(10.0, 100);
        assert_eq!(state.score, u64::MAX);
    }

    #[test]
    fn test_facing_front_check() {
        assert!(Facing::Right.is_in_front(50.0, 55.0));
        assert!(!Facing::Right.is_in_front(50.0, 45.0));
        assert!(Facing::Left.is_in_front(50.0, 45.0));
        assert!(!Facing::Left.is_in_front(50.0, 50.0));
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut state = GameState::new(1, Tuning::default());
        state.reset_session();
        let json = serde_json::to_string(&state.snapshot()).unwrap();
        assert!(json.contains("\"phase\":\"playing\""));
        assert!(json.contains("\"anim\":\"idle\""));
        assert!(json.contains("level-started"));
    }
}
