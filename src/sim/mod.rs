//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies

pub mod boss;
pub mod combat;
pub mod enemy;
pub mod input;
pub mod player;
pub mod schedule;
pub mod state;
pub mod tick;

pub use boss::Boss;
pub use combat::{AttackResult, in_reach, resolve_attack};
pub use enemy::{Enemy, EnemyKind};
pub use input::{Directions, InputAction, InputTracker, TickInput};
pub use player::{Action, PlayerAnim, PlayerState, Posture};
pub use schedule::{ScheduledEvent, Scheduler};
pub use state::{Facing, GameEvent, GamePhase, GameState, PlayerView, ScorePopup, Snapshot};
pub use tick::tick;
