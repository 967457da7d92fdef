//! Animation State Machine
//!
//! Frame cursors and cadence dividers for player sprites.
//!
//! Cursors are owned values: a consumer that needs the same sequence (the
//! scoreboard icon) clones its own cursor instead of sharing one, so each
//! consumer advances at its own cadence.

use std::sync::Arc;

use serde::{Serialize, Deserialize};

use crate::core::surface::Surface;

/// Shared, immutable animation frame.
pub type Frame = Arc<Surface>;

// =============================================================================
// FRAME CYCLE
// =============================================================================

/// Endless cursor over a fixed, non-empty frame sequence.
#[derive(Clone, Debug)]
pub struct FrameCycle {
    frames: Arc<[Frame]>,
    index: usize,
}

impl FrameCycle {
    /// Create a cursor at the first frame. Returns `None` for an empty sequence.
    pub fn new(frames: impl Into<Arc<[Frame]>>) -> Option<Self> {
        let frames = frames.into();
        if frames.is_empty() {
            return None;
        }
        Some(Self { frames, index: 0 })
    }

    /// Return the frame under the cursor and step to the next one.
    pub fn advance(&mut self) -> Frame {
        let frame = Arc::clone(&self.frames[self.index]);
        self.index = (self.index + 1) % self.frames.len();
        frame
    }

    /// Index of the frame the next `advance` returns.
    #[inline]
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of frames in the sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

// =============================================================================
// TICK DIVIDER
// =============================================================================

/// Counts `0..period` repeatedly; fires on 0.
///
/// Decouples visual cadence from the simulation tick rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickDivider {
    period: u32,
    phase: u32,
}

impl TickDivider {
    /// Create a divider. A period of 0 is treated as 1.
    pub fn new(period: u32) -> Self {
        Self {
            period: period.max(1),
            phase: 0,
        }
    }

    /// Advance one step. Returns true if the divider read 0.
    pub fn tick(&mut self) -> bool {
        let fire = self.phase == 0;
        self.phase = (self.phase + 1) % self.period;
        fire
    }

    /// Current phase.
    #[inline]
    pub fn phase(&self) -> u32 {
        self.phase
    }

    /// Period in ticks.
    #[inline]
    pub fn period(&self) -> u32 {
        self.period
    }
}

// =============================================================================
// ANIMATION SET
// =============================================================================

/// A player's frame cursors.
#[derive(Clone, Debug)]
pub struct AnimationSet {
    /// Idle loop
    pub idle: FrameCycle,
    /// Run loop
    pub run: FrameCycle,
    /// Jump pair: `[ascending, descending]`
    pub jump: [Frame; 2],
}

/// Visual state of a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimationState {
    /// In the air, moving up (or at the apex)
    AirborneAscending,
    /// In the air, moving down
    AirborneDescending,
    /// On a platform, not accelerating along the direction of motion
    GroundedIdle,
    /// On a platform, accelerating along the direction of motion
    GroundedRunning,
}

impl AnimationState {
    /// Pick the state from physics flags.
    pub fn select(standing: bool, falling: bool, running: bool) -> Self {
        match (standing, falling, running) {
            (false, false, _) => AnimationState::AirborneAscending,
            (false, true, _) => AnimationState::AirborneDescending,
            (true, _, true) => AnimationState::GroundedRunning,
            (true, _, false) => AnimationState::GroundedIdle,
        }
    }

    /// Check if the state is on a platform.
    #[inline]
    pub fn is_grounded(self) -> bool {
        matches!(self, AnimationState::GroundedIdle | AnimationState::GroundedRunning)
    }
}

/// Running test: acceleration and velocity share a sign and are both nonzero.
///
/// While decelerating the signs differ, so the player shows idle.
#[inline]
pub fn is_running(acceleration_x: f64, velocity_x: f64) -> bool {
    acceleration_x * velocity_x > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(n: u32) -> Vec<Frame> {
        (1..=n).map(|w| Arc::new(Surface::new(w, 1))).collect()
    }

    #[test]
    fn test_cycle_wraps() {
        let mut cycle = FrameCycle::new(frames(3)).unwrap();
        let widths: Vec<u32> = (0..7).map(|_| cycle.advance().width()).collect();
        assert_eq!(widths, vec![1, 2, 3, 1, 2, 3, 1]);
    }

    #[test]
    fn test_cycle_rejects_empty() {
        assert!(FrameCycle::new(Vec::<Frame>::new()).is_none());
    }

    #[test]
    fn test_cloned_cycle_is_independent() {
        let mut original = FrameCycle::new(frames(4)).unwrap();
        original.advance();
        let mut copy = original.clone();

        // Advancing the copy leaves the original untouched
        copy.advance();
        copy.advance();
        assert_eq!(original.position(), 1);
        assert_eq!(copy.position(), 3);
        assert_eq!(original.advance().width(), 2);
    }

    #[test]
    fn test_divider_fires_once_per_period() {
        let mut divider = TickDivider::new(6);
        let fired: Vec<bool> = (0..13).map(|_| divider.tick()).collect();
        let fire_ticks: Vec<usize> = fired
            .iter()
            .enumerate()
            .filter(|(_, f)| **f)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(fire_ticks, vec![0, 6, 12]);
    }

    #[test]
    fn test_divider_zero_period() {
        let mut divider = TickDivider::new(0);
        assert!(divider.tick());
        assert!(divider.tick());
    }

    #[test]
    fn test_state_selection() {
        use AnimationState::*;
        assert_eq!(AnimationState::select(false, false, true), AirborneAscending);
        assert_eq!(AnimationState::select(false, true, false), AirborneDescending);
        assert_eq!(AnimationState::select(true, false, true), GroundedRunning);
        assert_eq!(AnimationState::select(true, false, false), GroundedIdle);
    }

    #[test]
    fn test_running_requires_same_sign() {
        assert!(is_running(0.85, 2.0));
        assert!(is_running(-0.85, -2.0));
        // Decelerating
        assert!(!is_running(-0.5, 2.0));
        // Stationary
        assert!(!is_running(0.85, 0.0));
        assert!(!is_running(0.0, 3.0));
    }
}
