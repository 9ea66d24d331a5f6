//! Keyboard state tracking
//!
//! Raw key identifiers are normalized into logical actions here, so the rest
//! of the simulation never inspects key strings. Movement keys are level
//! triggered (held set); attack, crouch and confirm are edge triggered and
//! only fire on the press that adds them to the held set.

use std::collections::BTreeSet;

/// Logical controls, independent of the physical binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum InputAction {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Attack,
    CrouchToggle,
    Confirm,
}

impl InputAction {
    /// Map a normalized (lowercase) key identifier to an action.
    /// Arrow keys and WASD are aliases for the same movement set.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "arrowleft" | "a" => Some(InputAction::MoveLeft),
            "arrowright" | "d" => Some(InputAction::MoveRight),
            "arrowup" | "w" => Some(InputAction::MoveUp),
            "arrowdown" | "s" => Some(InputAction::MoveDown),
            " " | "space" | "spacebar" => Some(InputAction::Attack),
            "c" => Some(InputAction::CrouchToggle),
            "enter" => Some(InputAction::Confirm),
            _ => None,
        }
    }

    /// Edge-triggered actions fire once per press
    pub fn is_edge_triggered(self) -> bool {
        matches!(
            self,
            InputAction::Attack | InputAction::CrouchToggle | InputAction::Confirm
        )
    }
}

/// Held directions for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
}

impl Directions {
    pub fn any(&self) -> bool {
        self.left || self.right || self.up || self.down
    }
}

/// Tracks held keys and collects edge presses between ticks
#[derive(Debug, Clone, Default)]
pub struct InputTracker {
    /// Currently held keys (lowercased). Unknown keys are kept but never matched.
    held: BTreeSet<String>,
    attack_pressed: bool,
    /// Crouch presses since the last tick; only the parity matters
    crouch_presses: u32,
    confirm_pressed: bool,
}

impl InputTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a key press. Auto-repeat presses of an already held key are
    /// not new edges.
    pub fn key_down(&mut self, key: &str) {
        let key = key.to_lowercase();
        let fresh = self.held.insert(key.clone());
        if !fresh {
            return;
        }
        match InputAction::from_key(&key) {
            Some(InputAction::Attack) => self.attack_pressed = true,
            Some(InputAction::CrouchToggle) => {
                self.crouch_presses = self.crouch_presses.wrapping_add(1)
            }
            Some(InputAction::Confirm) => self.confirm_pressed = true,
            _ => {}
        }
    }

    /// Record a key release
    pub fn key_up(&mut self, key: &str) {
        self.held.remove(&key.to_lowercase());
    }

    /// Drop every held key (window blur, tab hidden)
    pub fn release_all(&mut self) {
        self.held.clear();
    }

    /// Is any key bound to `action` currently held
    pub fn is_held(&self, action: InputAction) -> bool {
        self.held
            .iter()
            .any(|k| InputAction::from_key(k) == Some(action))
    }

    pub fn directions(&self) -> Directions {
        Directions {
            left: self.is_held(InputAction::MoveLeft),
            right: self.is_held(InputAction::MoveRight),
            up: self.is_held(InputAction::MoveUp),
            down: self.is_held(InputAction::MoveDown),
        }
    }

    /// Build the input for the next tick and consume pending edges
    pub fn take_tick_input(&mut self) -> TickInput {
        let input = TickInput {
            directions: self.directions(),
            attack: self.attack_pressed,
            crouch_toggle: self.crouch_presses % 2 == 1,
            confirm: self.confirm_pressed,
        };
        self.attack_pressed = false;
        self.crouch_presses = 0;
        self.confirm_pressed = false;
        input
    }
}

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement directions
    pub directions: Directions,
    /// Attack pressed since the previous tick
    pub attack: bool,
    /// Crouch toggle pressed since the previous tick
    pub crouch_toggle: bool,
    /// Confirm/start pressed since the previous tick
    pub confirm: bool,
}
