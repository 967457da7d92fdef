//! Scoreboards
//!
//! One per player: an animated idle icon beside the player's name and death
//! count. The icon runs on its own copy of the player's idle cursor and its
//! own divider so it never speeds up the player's animation.

use std::sync::Arc;

use crate::game::animation::{Frame, FrameCycle, TickDivider};
use crate::game::config::ArenaConfig;
use crate::game::player::{Player, PlayerId};

/// Per-player score display.
#[derive(Clone, Debug)]
pub struct Scoreboard {
    player: PlayerId,
    anchor: (i32, i32),
    icon_animation: FrameCycle,
    animation_tick: TickDivider,
    icon: Frame,
    name: String,
    deaths: u32,
}

/// What the text-rendering collaborator draws for a scoreboard.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreboardView<'a> {
    /// First line
    pub name: &'a str,
    /// Second line, `Deaths: N`
    pub deaths_label: String,
    /// Icon drawn at the anchor; text sits to its right
    pub icon: &'a Frame,
    /// Top-left corner
    pub anchor: (i32, i32),
}

impl Scoreboard {
    /// Create a scoreboard for `player` with its top-left at `anchor`.
    pub fn new(player: &Player, anchor: (i32, i32), config: &ArenaConfig) -> Self {
        let mut icon_animation = player.idle_cursor();
        let mut animation_tick = TickDivider::new(config.ticks_per_animation_frame());
        animation_tick.tick();
        let icon = icon_animation.advance();

        Self {
            player: player.id(),
            anchor,
            icon_animation,
            animation_tick,
            icon,
            name: player.name().to_string(),
            deaths: player.respawn_count(),
        }
    }

    /// Player this scoreboard displays.
    #[inline]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Top-left corner.
    #[inline]
    pub fn anchor(&self) -> (i32, i32) {
        self.anchor
    }

    /// Current icon frame.
    #[inline]
    pub fn icon(&self) -> &Frame {
        &self.icon
    }

    /// Death count as of the last update.
    #[inline]
    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Re-read the player and advance the icon on its own cadence.
    pub fn update(&mut self, player: &Player) {
        if self.animation_tick.tick() {
            self.icon = self.icon_animation.advance();
        }
        if self.name != player.name() {
            self.name = player.name().to_string();
        }
        self.deaths = player.respawn_count();
    }

    /// Render inputs for the current state.
    pub fn view(&self) -> ScoreboardView<'_> {
        ScoreboardView {
            name: &self.name,
            deaths_label: format!("Deaths: {}", self.deaths),
            icon: &self.icon,
            anchor: self.anchor,
        }
    }

    /// Shared handle to the icon, for draw lists.
    pub fn icon_handle(&self) -> Frame {
        Arc::clone(&self.icon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::Surface;
    use crate::game::config::MatchConfig;
    use crate::game::events::EventLog;
    use crate::game::input::InputFrame;
    use crate::game::player::tests::animation;

    fn setup() -> (Player, ArenaConfig) {
        let config = MatchConfig::default();
        let flash = Arc::new(Surface::new(2, 2));
        let player = Player::new(PlayerId::new(1), &config.players[1], animation(), flash, &config.arena);
        (player, config.arena)
    }

    #[test]
    fn test_initial_view() {
        let (player, config) = setup();
        let board = Scoreboard::new(&player, (20, 20), &config);
        let view = board.view();

        assert_eq!(view.name, "Player 2");
        assert_eq!(view.deaths_label, "Deaths: 0");
        assert_eq!(view.anchor, (20, 20));
        // Player took idle frame 0 at creation; the copy continues from frame 1
        assert_eq!(view.icon.width(), 41);
    }

    #[test]
    fn test_reads_deaths_live() {
        let (mut player, config) = setup();
        let mut board = Scoreboard::new(&player, (0, 0), &config);

        player.respawn(&mut EventLog::new(0));
        player.respawn(&mut EventLog::new(0));
        board.update(&player);
        assert_eq!(board.deaths(), 2);
        assert_eq!(board.view().deaths_label, "Deaths: 2");
    }

    #[test]
    fn test_icon_does_not_consume_player_cursor() {
        let (mut player, config) = setup();
        let mut board = Scoreboard::new(&player, (0, 0), &config);
        let period = config.ticks_per_animation_frame();

        for _ in 0..(period * 4) {
            board.update(&player);
        }

        // Player's own idle advance still yields frame 1
        player.standing = true;
        player.update(InputFrame::new(), &config, &mut EventLog::new(0));
        assert_eq!(player.image().width(), 41);
    }

    #[test]
    fn test_icon_cadence() {
        let (player, config) = setup();
        let mut board = Scoreboard::new(&player, (0, 0), &config);
        let period = config.ticks_per_animation_frame();

        // Constructor consumed phase 0; the next advance is a full period later
        for _ in 0..(period - 1) {
            board.update(&player);
            assert_eq!(board.icon().width(), 41);
        }
        board.update(&player);
        assert_eq!(board.icon().width(), 40);
    }
}
