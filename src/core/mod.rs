//! Core deterministic primitives.
//!
//! Value types shared by every entity: vectors, pixel surfaces, collision
//! masks and the state hasher used for replay checks.

pub mod vec2;
pub mod surface;
pub mod mask;
pub mod hash;

// Re-export core types
pub use vec2::Vector2;
pub use surface::{Rect, Rgba, Surface};
pub use mask::Mask;
pub use hash::{compute_state_hash, StateHash, StateHasher};
