//! Game Events
//!
//! Side effects produced during a tick. The simulation never touches the
//! audio device; it records what happened and the host turns events into
//! sounds (see `audio`).

use serde::{Serialize, Deserialize};

use crate::game::audio::SoundEffect;
use crate::game::player::PlayerId;

/// Game event data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameEventData {
    /// Player left a platform by jumping
    Jumped {
        player_id: PlayerId,
    },

    /// Player fired a bullet
    Fired {
        player_id: PlayerId,
        bullet_velocity: f64,
    },

    /// Run cycle reached a footstep
    Footstep {
        player_id: PlayerId,
    },

    /// A bullet struck a player and was removed
    BulletHit {
        victim_id: PlayerId,
        author_id: PlayerId,
        /// Horizontal velocity added to the victim (0 for self-hits)
        knockback: f64,
    },

    /// A bullet left the arena
    BulletExpired {
        author_id: PlayerId,
    },

    /// Player fell into the void and respawned
    Respawned {
        player_id: PlayerId,
        respawn_count: u32,
    },
}

/// A game event with timing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    /// Tick when event occurred
    pub tick: u32,

    /// Event data
    pub data: GameEventData,
}

impl GameEvent {
    /// Player the event is about.
    pub fn player_id(&self) -> PlayerId {
        match &self.data {
            GameEventData::Jumped { player_id }
            | GameEventData::Fired { player_id, .. }
            | GameEventData::Footstep { player_id }
            | GameEventData::Respawned { player_id, .. } => *player_id,
            GameEventData::BulletHit { victim_id, .. } => *victim_id,
            GameEventData::BulletExpired { author_id } => *author_id,
        }
    }

    /// Check if a bullet struck its own author.
    pub fn is_self_hit(&self) -> bool {
        matches!(
            self.data,
            GameEventData::BulletHit { victim_id, author_id, .. } if victim_id == author_id
        )
    }

    /// Sound the host should play for this event, if any.
    pub fn sound(&self) -> Option<SoundEffect> {
        match &self.data {
            GameEventData::Jumped { .. } => Some(SoundEffect::Jump),
            GameEventData::Fired { .. } => Some(SoundEffect::Shoot),
            GameEventData::Footstep { .. } => Some(SoundEffect::Step),
            GameEventData::BulletHit { .. } if self.is_self_hit() => None,
            GameEventData::BulletHit { .. } => Some(SoundEffect::Hit),
            GameEventData::BulletExpired { .. } => None,
            GameEventData::Respawned { .. } => Some(SoundEffect::Death),
        }
    }
}

/// Events collected during one tick.
#[derive(Debug, Default)]
pub struct EventLog {
    tick: u32,
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Start collecting for a tick.
    pub fn new(tick: u32) -> Self {
        Self {
            tick,
            events: Vec::new(),
        }
    }

    /// Record an event at the current tick.
    pub fn push(&mut self, data: GameEventData) {
        self.events.push(GameEvent {
            tick: self.tick,
            data,
        });
    }

    /// Events recorded so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Take the recorded events.
    pub fn into_events(self) -> Vec<GameEvent> {
        self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_sounds() {
        let p0 = PlayerId::new(0);
        let p1 = PlayerId::new(1);
        let mut log = EventLog::new(7);
        log.push(GameEventData::Jumped { player_id: p0 });
        log.push(GameEventData::BulletHit { victim_id: p1, author_id: p0, knockback: 8.8 });
        log.push(GameEventData::BulletHit { victim_id: p0, author_id: p0, knockback: 0.0 });
        log.push(GameEventData::BulletExpired { author_id: p1 });
        log.push(GameEventData::Respawned { player_id: p1, respawn_count: 1 });

        let sounds: Vec<Option<SoundEffect>> = log.events().iter().map(|e| e.sound()).collect();
        assert_eq!(
            sounds,
            vec![
                Some(SoundEffect::Jump),
                Some(SoundEffect::Hit),
                None,
                None,
                Some(SoundEffect::Death),
            ]
        );
        assert!(log.events().iter().all(|e| e.tick == 7));
    }

    #[test]
    fn test_event_player() {
        let event = GameEvent {
            tick: 0,
            data: GameEventData::BulletHit {
                victim_id: PlayerId::new(1),
                author_id: PlayerId::new(0),
                knockback: 1.0,
            },
        };
        assert_eq!(event.player_id(), PlayerId::new(1));
        assert!(!event.is_self_hit());
    }
}
