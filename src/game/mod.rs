//! Game Logic Module
//!
//! All simulation code. Deterministic for fixed config and inputs.
//!
//! ## Module Structure
//!
//! - `config`: Arena and player settings, JSON loading, validation
//! - `input`: Logical actions, key bindings, per-tick input frames
//! - `animation`: Frame cursors, cadence dividers, visual states
//! - `assets`: Decoded frame contract and sprite sheet slicing
//! - `platform`: Static tiled platforms
//! - `player`: Input-driven physics actors
//! - `bullet`: Projectiles
//! - `scoreboard`: Per-player death counter with animated icon
//! - `collision`: Rectangle + mask collision tests
//! - `events`: Game events for audio and replay
//! - `audio`: Sound handles and the host audio sink
//! - `arena`: Match state and the authoritative tick

pub mod config;
pub mod input;
pub mod animation;
pub mod assets;
pub mod platform;
pub mod player;
pub mod bullet;
pub mod scoreboard;
pub mod collision;
pub mod events;
pub mod audio;
pub mod arena;

// Re-export key types
pub use arena::{replay_match, Arena, ArenaError, DrawCommand, TickResult};
pub use config::{ArenaConfig, ConfigError, MatchConfig, PlayerConfig};
pub use events::{GameEvent, GameEventData};
pub use input::{Action, InputFrame, KeyBindings};
pub use player::{Direction, Player, PlayerId};
