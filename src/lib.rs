//! # Gun Mayhem Core
//!
//! Deterministic simulation for a two-player platform shooter: move, jump,
//! shoot and knock the other player off the platforms into the void.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    GUN MAYHEM CORE                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── vec2.rs     - 2D f64 vector                             │
//! │  ├── surface.rs  - RGBA surfaces and rectangles              │
//! │  ├── mask.rs     - Pixel collision masks                     │
//! │  └── hash.rs     - State hashing for verification            │
//! │                                                              │
//! │  game/           - Game logic (deterministic)                │
//! │  ├── config.rs   - Arena and player settings                 │
//! │  ├── input.rs    - Key bindings and input frames             │
//! │  ├── animation.rs- Frame cursors and cadence                 │
//! │  ├── assets.rs   - Frame contract, sprite sheets             │
//! │  ├── player.rs   - Physics actors                            │
//! │  ├── bullet.rs   - Projectiles                               │
//! │  ├── platform.rs - Static platforms                          │
//! │  ├── scoreboard.rs - Death counters                          │
//! │  ├── collision.rs- Mask collision                            │
//! │  ├── events.rs   - Per-tick events                           │
//! │  ├── audio.rs    - Sound sink contract                       │
//! │  └── arena.rs    - Authoritative tick                        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! The simulation never reads clocks, never draws random numbers and
//! visits entities in list order. Float operations run in a fixed order,
//! so identical config and inputs produce bit-identical state on the same
//! platform. `Arena::compute_hash` makes this checkable.
//!
//! ## Host responsibilities
//!
//! Decoding images and sounds, polling the keyboard, presenting frames and
//! playing audio stay outside. The host supplies `ArenaAssets`, feeds one
//! `InputFrame` per player per tick, draws `Arena::draw_list` and forwards
//! each tick's events to an `AudioSink`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod core;
pub mod game;

// Re-export commonly used types
pub use core::vec2::Vector2;
pub use core::surface::{Rect, Surface};
pub use game::arena::{replay_match, Arena, ArenaError, TickResult};
pub use game::assets::ArenaAssets;
pub use game::config::MatchConfig;
pub use game::input::InputFrame;
pub use game::player::PlayerId;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
