//! Input Capture and Normalization
//!
//! Host key state is resolved through each player's key-binding table into
//! a packed per-tick `InputFrame`. Movement is level-sensitive (read every
//! tick); shoot is edge-sensitive, which the player tracks itself.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Deserialize};

use crate::game::config::ConfigError;

/// Raw input code supplied by the host's keyboard layer.
pub type KeyCode = u32;

// =============================================================================
// ACTIONS
// =============================================================================

/// Logical player action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    /// Jump
    Up,
    /// Reserved (bound but not used by the simulation)
    Down,
    /// Move left
    Left,
    /// Move right
    Right,
    /// Fire a bullet
    Shoot,
}

impl Action {
    /// Every action, in binding-table order.
    pub const ALL: [Action; 5] = [
        Action::Up,
        Action::Down,
        Action::Left,
        Action::Right,
        Action::Shoot,
    ];

    /// Bit used for this action in `InputFrame::flags`.
    #[inline]
    pub const fn flag(self) -> u8 {
        match self {
            Action::Up => InputFrame::FLAG_UP,
            Action::Down => InputFrame::FLAG_DOWN,
            Action::Left => InputFrame::FLAG_LEFT,
            Action::Right => InputFrame::FLAG_RIGHT,
            Action::Shoot => InputFrame::FLAG_SHOOT,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::Up => "up",
            Action::Down => "down",
            Action::Left => "left",
            Action::Right => "right",
            Action::Shoot => "shoot",
        };
        f.write_str(name)
    }
}

// =============================================================================
// INPUT FRAME
// =============================================================================

/// Actions held during a single tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InputFrame {
    /// Action flags (packed bits):
    /// - Bit 0: up
    /// - Bit 1: down
    /// - Bit 2: left
    /// - Bit 3: right
    /// - Bit 4: shoot
    pub flags: u8,
}

impl InputFrame {
    /// Up flag bit
    pub const FLAG_UP: u8 = 0x01;
    /// Down flag bit
    pub const FLAG_DOWN: u8 = 0x02;
    /// Left flag bit
    pub const FLAG_LEFT: u8 = 0x04;
    /// Right flag bit
    pub const FLAG_RIGHT: u8 = 0x08;
    /// Shoot flag bit
    pub const FLAG_SHOOT: u8 = 0x10;

    /// Create an empty frame.
    pub const fn new() -> Self {
        Self { flags: 0 }
    }

    /// Create a frame with the given actions held.
    pub fn with(actions: &[Action]) -> Self {
        let mut frame = Self::new();
        for action in actions {
            frame.set(*action, true);
        }
        frame
    }

    /// Check if an action is held.
    #[inline]
    pub fn pressed(&self, action: Action) -> bool {
        self.flags & action.flag() != 0
    }

    /// Set or clear an action.
    #[inline]
    pub fn set(&mut self, action: Action, pressed: bool) {
        if pressed {
            self.flags |= action.flag();
        } else {
            self.flags &= !action.flag();
        }
    }

    /// Check if nothing is held.
    #[inline]
    pub fn is_idle(&self) -> bool {
        self.flags == 0
    }
}

// =============================================================================
// KEY BINDINGS
// =============================================================================

/// Mapping of logical actions to raw key codes for one player.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings(BTreeMap<Action, KeyCode>);

impl KeyBindings {
    /// Bind all five actions.
    pub fn new(up: KeyCode, down: KeyCode, left: KeyCode, right: KeyCode, shoot: KeyCode) -> Self {
        let mut map = BTreeMap::new();
        map.insert(Action::Up, up);
        map.insert(Action::Down, down);
        map.insert(Action::Left, left);
        map.insert(Action::Right, right);
        map.insert(Action::Shoot, shoot);
        Self(map)
    }

    /// Key bound to an action.
    pub fn key(&self, action: Action) -> Option<KeyCode> {
        self.0.get(&action).copied()
    }

    /// Rebind one action.
    pub fn bind(&mut self, action: Action, key: KeyCode) {
        self.0.insert(action, key);
    }

    /// Remove a binding.
    pub fn unbind(&mut self, action: Action) {
        self.0.remove(&action);
    }

    /// All key codes in use.
    pub fn keys(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.0.values().copied()
    }

    /// Check that every action is bound and no key serves two actions.
    pub fn validate(&self, player: &str) -> Result<(), ConfigError> {
        for action in Action::ALL {
            if !self.0.contains_key(&action) {
                return Err(ConfigError::UnmappedAction {
                    player: player.to_string(),
                    action,
                });
            }
        }

        let mut seen: BTreeMap<KeyCode, Action> = BTreeMap::new();
        for (action, key) in &self.0 {
            if let Some(first) = seen.insert(*key, *action) {
                return Err(ConfigError::DuplicateBinding {
                    player: player.to_string(),
                    key: *key,
                    first,
                    second: *action,
                });
            }
        }

        Ok(())
    }

    /// Resolve host key state into an input frame.
    pub fn resolve<F>(&self, is_pressed: F) -> InputFrame
    where
        F: Fn(KeyCode) -> bool,
    {
        let mut frame = InputFrame::new();
        for (action, key) in &self.0 {
            if is_pressed(*key) {
                frame.set(*action, true);
            }
        }
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn bindings() -> KeyBindings {
        KeyBindings::new(1, 2, 3, 4, 5)
    }

    #[test]
    fn test_frame_flags() {
        let mut frame = InputFrame::with(&[Action::Left, Action::Shoot]);
        assert!(frame.pressed(Action::Left));
        assert!(frame.pressed(Action::Shoot));
        assert!(!frame.pressed(Action::Right));

        frame.set(Action::Left, false);
        frame.set(Action::Shoot, false);
        assert!(frame.is_idle());
    }

    #[test]
    fn test_resolve_pressed_keys() {
        let held: BTreeSet<KeyCode> = [3, 5, 99].into_iter().collect();
        let frame = bindings().resolve(|k| held.contains(&k));

        assert_eq!(frame, InputFrame::with(&[Action::Left, Action::Shoot]));
    }

    #[test]
    fn test_validate_unmapped_action() {
        let mut b = bindings();
        b.unbind(Action::Shoot);

        match b.validate("p1") {
            Err(ConfigError::UnmappedAction { player, action }) => {
                assert_eq!(player, "p1");
                assert_eq!(action, Action::Shoot);
            }
            other => panic!("expected unmapped action, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_duplicate_key() {
        let mut b = bindings();
        b.bind(Action::Right, 3);

        assert!(matches!(
            b.validate("p1"),
            Err(ConfigError::DuplicateBinding { key: 3, .. })
        ));
        assert!(bindings().validate("p1").is_ok());
    }

    #[test]
    fn test_bindings_from_json() {
        let json = r#"{"up": 10, "down": 11, "left": 12, "right": 13, "shoot": 14}"#;
        let b: KeyBindings = serde_json::from_str(json).unwrap();
        assert_eq!(b.key(Action::Shoot), Some(14));
        assert!(b.validate("p").is_ok());
    }
}
