//! Audio Collaborator Contract
//!
//! Named sound handles and the fire-and-forget sink the host implements.

use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::game::events::GameEvent;

/// Named sound effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEffect {
    /// Bullet fired
    Shoot,
    /// Bullet struck another player
    Hit,
    /// Jump
    Jump,
    /// Footstep while running
    Step,
    /// Fell into the void
    Death,
    /// Background loop
    Ambience,
}

/// Audio output supplied by the host.
///
/// Calls never block and return nothing.
pub trait AudioSink {
    /// Play a sound once.
    fn play(&mut self, effect: SoundEffect);

    /// Start a sound on repeat.
    fn play_looping(&mut self, effect: SoundEffect);
}

/// Sink that drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _effect: SoundEffect) {}

    fn play_looping(&mut self, _effect: SoundEffect) {}
}

/// Sink that remembers what it was asked to play.
#[derive(Clone, Debug, Default)]
pub struct RecordingAudio {
    /// One-shot sounds, in order
    pub played: Vec<SoundEffect>,
    /// Looping sounds, in order
    pub looping: Vec<SoundEffect>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect) {
        self.played.push(effect);
    }

    fn play_looping(&mut self, effect: SoundEffect) {
        self.looping.push(effect);
    }
}

/// Play the sound of every event, in order.
pub fn play_events<S: AudioSink + ?Sized>(sink: &mut S, events: &[GameEvent]) {
    for event in events {
        if let Some(effect) = event.sound() {
            trace!(tick = event.tick, ?effect, "play");
            sink.play(effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::events::GameEventData;
    use crate::game::player::PlayerId;

    #[test]
    fn test_play_events_skips_silent() {
        let events = vec![
            GameEvent {
                tick: 1,
                data: GameEventData::Fired { player_id: PlayerId::new(0), bullet_velocity: 22.0 },
            },
            GameEvent {
                tick: 1,
                data: GameEventData::BulletExpired { author_id: PlayerId::new(0) },
            },
            GameEvent {
                tick: 2,
                data: GameEventData::Footstep { player_id: PlayerId::new(1) },
            },
        ];

        let mut sink = RecordingAudio::default();
        play_events(&mut sink, &events);
        assert_eq!(sink.played, vec![SoundEffect::Shoot, SoundEffect::Step]);
        assert!(sink.looping.is_empty());
    }
}
