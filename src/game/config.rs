//! Match Configuration
//!
//! Immutable settings passed explicitly into arena construction. Everything
//! can be loaded from JSON; missing arena fields fall back to the defaults
//! below. Validation runs once, before the first tick.

use std::path::Path;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::vec2::Vector2;
use crate::game::input::{Action, KeyBindings, KeyCode};
use crate::game::player::Direction;

/// Configuration errors. All are fatal at match setup.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for this schema
    #[error("failed to parse config: {0}")]
    Json(#[from] serde_json::Error),

    /// Arena has no area
    #[error("invalid arena dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    /// Tick rate of zero
    #[error("tick rate must be positive")]
    InvalidTickRate,

    /// Animation rate that yields no whole ticks per frame
    #[error("animation fps {animation_fps} must be between 1 and tick rate {tick_rate}")]
    InvalidAnimationFps { animation_fps: u32, tick_rate: u32 },

    /// Friction must oppose motion
    #[error("friction coefficient must be negative, got {0}")]
    NonNegativeFriction(f64),

    /// Jumps go up (negative y)
    #[error("jump height must be negative, got {0}")]
    NonNegativeJumpHeight(f64),

    /// The void must sit below the visible screen
    #[error("void height {void_height} must not be above the arena floor {height}")]
    InvalidVoidHeight { void_height: f64, height: u32 },

    /// Player name is empty
    #[error("player {index} has an empty name")]
    EmptyName { index: usize },

    /// A logical action has no key
    #[error("player {player:?} has no key bound to {action}")]
    UnmappedAction { player: String, action: Action },

    /// One key bound to two actions of the same player
    #[error("player {player:?} binds key {key} to both {first} and {second}")]
    DuplicateBinding {
        player: String,
        key: KeyCode,
        first: Action,
        second: Action,
    },

    /// One key bound for both players
    #[error("key {key} is bound for both players")]
    SharedKey { key: KeyCode },
}

// =============================================================================
// ARENA CONFIG
// =============================================================================

/// Placement of one platform.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlatformLayout {
    /// Centre of the composed platform surface
    pub center: Vector2,
    /// Number of tiles laid side by side
    pub tile_count: u32,
}

/// Distance below the arena floor of the default void threshold.
pub const VOID_MARGIN: f64 = 200.0;

/// Physics, tuning and layout constants for one arena.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in pixels (bullets are culled outside [0, width])
    pub width: u32,
    /// Arena height in pixels
    pub height: u32,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Visible animation frames per second
    pub animation_fps: u32,
    /// Downward acceleration per tick
    pub gravity: f64,
    /// Horizontal acceleration while a move key is held
    pub acceleration: f64,
    /// Drag coefficient (negative), applied as `a.x += v.x * friction`
    pub friction: f64,
    /// Horizontal speeds below this snap to zero
    pub stop_speed: f64,
    /// Vertical velocity set by a jump (negative is up)
    pub jump_height: f64,
    /// Pixels the sprite's feet sink into a platform when landing
    pub player_offset: f64,
    /// Players below this y respawn; unset means `height + VOID_MARGIN`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub void_height: Option<f64>,
    /// Muzzle speed of a bullet fired from rest
    pub bullet_speed: f64,
    /// Bullet spawn offset from the shooter's position (x mirrored when facing left)
    pub bullet_offset: Vector2,
    /// Extra y offset for bullets fired while running
    pub bullet_running_offset_y: f64,
    /// Muzzle flash position on the player frame
    pub muzzle_flash_offset: (i32, i32),
    /// Extra y offset for the muzzle flash in the running pose
    pub muzzle_flash_running_offset_y: i32,
    /// Fraction of bullet velocity transferred to the victim
    pub knockback_multiplier: f64,
    /// Velocity kick applied to the shooter, opposite the facing direction
    pub recoil: f64,
    /// Platforms in enumeration (collision priority) order
    pub platforms: Vec<PlatformLayout>,
}

impl ArenaConfig {
    /// Simulation ticks per visible animation frame.
    #[inline]
    pub fn ticks_per_animation_frame(&self) -> u32 {
        (self.tick_rate / self.animation_fps.max(1)).max(1)
    }

    /// Void threshold, defaulting to `VOID_MARGIN` below the arena floor.
    #[inline]
    pub fn void_height(&self) -> f64 {
        self.void_height.unwrap_or(self.height as f64 + VOID_MARGIN)
    }

    /// Check internal consistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidDimensions {
                width: self.width,
                height: self.height,
            });
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::InvalidTickRate);
        }
        if self.animation_fps == 0 || self.animation_fps > self.tick_rate {
            return Err(ConfigError::InvalidAnimationFps {
                animation_fps: self.animation_fps,
                tick_rate: self.tick_rate,
            });
        }
        if self.friction >= 0.0 {
            return Err(ConfigError::NonNegativeFriction(self.friction));
        }
        if self.jump_height >= 0.0 {
            return Err(ConfigError::NonNegativeJumpHeight(self.jump_height));
        }
        let void_height = self.void_height();
        if void_height < self.height as f64 {
            return Err(ConfigError::InvalidVoidHeight {
                void_height,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        let width = 1280;
        let height = 720;
        Self {
            width,
            height,
            tick_rate: 60,
            animation_fps: 10,
            gravity: 0.3,
            acceleration: 0.85,
            friction: -0.25,
            stop_speed: 0.4,
            jump_height: -8.0,
            player_offset: 9.0,
            void_height: None,
            bullet_speed: 22.0,
            bullet_offset: Vector2::new(24.0, -20.0),
            bullet_running_offset_y: -2.0,
            muzzle_flash_offset: (38, 20),
            muzzle_flash_running_offset_y: -2,
            knockback_multiplier: 0.4,
            recoil: 1.5,
            platforms: vec![
                PlatformLayout { center: Vector2::new(640.0, 600.0), tile_count: 28 },
                PlatformLayout { center: Vector2::new(300.0, 430.0), tile_count: 8 },
                PlatformLayout { center: Vector2::new(980.0, 430.0), tile_count: 8 },
                PlatformLayout { center: Vector2::new(640.0, 270.0), tile_count: 6 },
            ],
        }
    }
}

// =============================================================================
// PLAYER CONFIG
// =============================================================================

/// Per-player identity and controls.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Display name
    pub name: String,
    /// Sprite colour, used to look up frame sets
    pub color: String,
    /// Respawn position
    pub spawn_point: Vector2,
    /// Facing direction after (re)spawn
    pub spawn_direction: Direction,
    /// Key bindings
    pub bindings: KeyBindings,
}

/// Default key codes (SDL keycode values).
pub mod default_keys {
    use crate::game::input::KeyCode;

    /// Arrow up
    pub const UP: KeyCode = 1073741906;
    /// Arrow down
    pub const DOWN: KeyCode = 1073741905;
    /// Arrow left
    pub const LEFT: KeyCode = 1073741904;
    /// Arrow right
    pub const RIGHT: KeyCode = 1073741903;
    /// Right ctrl
    pub const RCTRL: KeyCode = 1073742052;
    /// W
    pub const W: KeyCode = b'w' as KeyCode;
    /// S
    pub const S: KeyCode = b's' as KeyCode;
    /// A
    pub const A: KeyCode = b'a' as KeyCode;
    /// D
    pub const D: KeyCode = b'd' as KeyCode;
    /// Space
    pub const SPACE: KeyCode = b' ' as KeyCode;
}

// =============================================================================
// MATCH CONFIG
// =============================================================================

/// Everything needed to start a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Arena settings
    #[serde(default)]
    pub arena: ArenaConfig,
    /// Exactly two players
    pub players: [PlayerConfig; 2],
}

impl MatchConfig {
    /// Parse from a JSON string and validate.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: MatchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON file and validate.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Check arena settings and both players' bindings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.arena.validate()?;

        for (index, player) in self.players.iter().enumerate() {
            if player.name.trim().is_empty() {
                return Err(ConfigError::EmptyName { index });
            }
            player.bindings.validate(&player.name)?;
        }

        let [first, second] = &self.players;
        for key in first.bindings.keys() {
            if second.bindings.keys().any(|k| k == key) {
                return Err(ConfigError::SharedKey { key });
            }
        }

        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        let arena = ArenaConfig::default();
        let players = [
            PlayerConfig {
                name: "Player 1".to_string(),
                color: "green".to_string(),
                spawn_point: Vector2::new(arena.width as f64 - 300.0, 0.0),
                spawn_direction: Direction::Left,
                bindings: KeyBindings::new(
                    default_keys::UP,
                    default_keys::DOWN,
                    default_keys::LEFT,
                    default_keys::RIGHT,
                    default_keys::RCTRL,
                ),
            },
            PlayerConfig {
                name: "Player 2".to_string(),
                color: "red".to_string(),
                spawn_point: Vector2::new(300.0, 0.0),
                spawn_direction: Direction::Right,
                bindings: KeyBindings::new(
                    default_keys::W,
                    default_keys::S,
                    default_keys::A,
                    default_keys::D,
                    default_keys::SPACE,
                ),
            },
        ];
        Self { arena, players }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MatchConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arena.ticks_per_animation_frame(), 6);
    }

    #[test]
    fn test_animation_fps_bounds() {
        let mut arena = ArenaConfig::default();
        arena.animation_fps = 0;
        assert!(matches!(arena.validate(), Err(ConfigError::InvalidAnimationFps { .. })));

        arena.animation_fps = 61;
        assert!(matches!(arena.validate(), Err(ConfigError::InvalidAnimationFps { .. })));

        arena.animation_fps = 60;
        assert!(arena.validate().is_ok());
        assert_eq!(arena.ticks_per_animation_frame(), 1);
    }

    #[test]
    fn test_physics_sign_checks() {
        let mut arena = ArenaConfig::default();
        arena.friction = 0.1;
        assert!(matches!(arena.validate(), Err(ConfigError::NonNegativeFriction(_))));

        let mut arena = ArenaConfig::default();
        arena.jump_height = 8.0;
        assert!(matches!(arena.validate(), Err(ConfigError::NonNegativeJumpHeight(_))));

        let mut arena = ArenaConfig::default();
        arena.void_height = Some(100.0);
        assert!(matches!(arena.validate(), Err(ConfigError::InvalidVoidHeight { .. })));
    }

    #[test]
    fn test_void_default_follows_height() {
        let mut value = serde_json::to_value(MatchConfig::default()).unwrap();
        value["arena"] = serde_json::json!({ "height": 1080 });

        let config = MatchConfig::from_json_str(&value.to_string()).unwrap();
        assert_eq!(config.arena.height, 1080);
        assert_eq!(config.arena.void_height(), 1080.0 + VOID_MARGIN);
        assert_eq!(ArenaConfig::default().void_height(), 920.0);

        // An explicit threshold wins
        value["arena"] = serde_json::json!({ "height": 1080, "void_height": 1500.0 });
        let config = MatchConfig::from_json_str(&value.to_string()).unwrap();
        assert_eq!(config.arena.void_height(), 1500.0);
    }

    #[test]
    fn test_shared_key_rejected() {
        let mut config = MatchConfig::default();
        config.players[1].bindings.bind(Action::Shoot, default_keys::RCTRL);
        assert!(matches!(config.validate(), Err(ConfigError::SharedKey { .. })));
    }

    #[test]
    fn test_from_json_partial_arena() {
        let json = r#"{
            "arena": { "width": 800, "height": 600, "void_height": 900.0, "platforms": [] },
            "players": [
                {
                    "name": "Ann", "color": "blue",
                    "spawn_point": { "x": 100.0, "y": 0.0 }, "spawn_direction": "right",
                    "bindings": { "up": 1, "down": 2, "left": 3, "right": 4, "shoot": 5 }
                },
                {
                    "name": "Bo", "color": "red",
                    "spawn_point": { "x": 700.0, "y": 0.0 }, "spawn_direction": "left",
                    "bindings": { "up": 6, "down": 7, "left": 8, "right": 9, "shoot": 10 }
                }
            ]
        }"#;

        let config = MatchConfig::from_json_str(json).unwrap();
        assert_eq!(config.arena.width, 800);
        assert_eq!(config.arena.bullet_speed, 22.0);
        assert!(config.arena.platforms.is_empty());
        assert_eq!(config.players[1].spawn_direction, Direction::Left);
    }

    #[test]
    fn test_from_json_missing_binding_is_fatal() {
        let json = r#"{
            "players": [
                {
                    "name": "Ann", "color": "blue",
                    "spawn_point": { "x": 100.0, "y": 0.0 }, "spawn_direction": "right",
                    "bindings": { "up": 1, "down": 2, "left": 3, "right": 4 }
                },
                {
                    "name": "Bo", "color": "red",
                    "spawn_point": { "x": 700.0, "y": 0.0 }, "spawn_direction": "left",
                    "bindings": { "up": 6, "down": 7, "left": 8, "right": 9, "shoot": 10 }
                }
            ]
        }"#;

        assert!(matches!(
            MatchConfig::from_json_str(json),
            Err(ConfigError::UnmappedAction { action: Action::Shoot, .. })
        ));
    }

    #[test]
    fn test_from_path_missing_file() {
        assert!(matches!(
            MatchConfig::from_path("/nonexistent/gun-mayhem.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
