//! Arena Tick
//!
//! Owns every entity of a match and advances them in a fixed order:
//!
//! 1. Players: shoot (edge-triggered), input, physics, animation
//! 2. Bullets: move, cull outside `[0, width]`
//! 3. Platform collisions per player (first platform in list order wins)
//! 4. Bullet collisions per player (first bullet in list order wins)
//! 5. Void check per player
//! 6. Scoreboards
//!
//! Reordering any of these changes gameplay and breaks replays.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};

use crate::core::hash::{compute_state_hash, StateHash};
use crate::core::surface::Rect;
use crate::game::animation::Frame;
use crate::game::assets::{ArenaAssets, AssetError};
use crate::game::audio::{AudioSink, SoundEffect};
use crate::game::bullet::{Bullet, BulletSprites};
use crate::game::collision::{first_bullet_collision, first_platform_collision};
use crate::game::config::{ArenaConfig, ConfigError, MatchConfig};
use crate::game::events::{EventLog, GameEvent, GameEventData};
use crate::game::input::{InputFrame, KeyCode};
use crate::game::platform::Platform;
use crate::game::player::{Player, PlayerId};
use crate::game::scoreboard::Scoreboard;

/// Match setup errors.
#[derive(Debug, Error)]
pub enum ArenaError {
    /// Configuration rejected
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Assets do not satisfy the frame contract
    #[error("invalid assets: {0}")]
    Asset(#[from] AssetError),
}

/// Result of a tick.
#[derive(Debug, Default)]
pub struct TickResult {
    /// Events generated this tick
    pub events: Vec<GameEvent>,
    /// Tick number just simulated
    pub tick: u32,
}

/// One image to draw at one place.
#[derive(Clone, Debug, PartialEq)]
pub struct DrawCommand {
    /// Image handle
    pub image: Frame,
    /// Destination rectangle
    pub rect: Rect,
}

/// Vertical position of the scoreboards.
const SCOREBOARD_MARGIN: i32 = 20;

/// A running match.
#[derive(Clone, Debug)]
pub struct Arena {
    config: ArenaConfig,
    tick: u32,
    players: Vec<Player>,
    platforms: Vec<Platform>,
    bullets: Vec<Bullet>,
    scoreboards: Vec<Scoreboard>,
    bullet_sprites: BulletSprites,
}

impl Arena {
    /// Validate the configuration and build the match.
    ///
    /// Fails if any player's colour has no frame set or a frame set breaks
    /// the contract (empty loops, jump pair not of size 2).
    pub fn new(config: MatchConfig, assets: &ArenaAssets) -> Result<Self, ArenaError> {
        config.validate()?;
        let MatchConfig { arena, players: player_configs } = config;

        let platforms: Vec<Platform> = arena
            .platforms
            .iter()
            .map(|layout| Platform::new(&assets.platform_tile, layout.center, layout.tile_count))
            .collect();

        let mut players = Vec::with_capacity(player_configs.len());
        for (index, player_config) in player_configs.iter().enumerate() {
            let animation = assets.animation_for(&player_config.color)?;
            players.push(Player::new(
                PlayerId::new(index as u8),
                player_config,
                animation,
                Arc::clone(&assets.muzzle_flash),
                &arena,
            ));
        }

        let column = arena.width as i32 / players.len().max(1) as i32;
        let scoreboards = players
            .iter()
            .enumerate()
            .map(|(index, player)| {
                let anchor = (SCOREBOARD_MARGIN + column * index as i32, SCOREBOARD_MARGIN);
                Scoreboard::new(player, anchor, &arena)
            })
            .collect();

        info!(
            width = arena.width,
            height = arena.height,
            platforms = platforms.len(),
            players = players.len(),
            "arena ready"
        );

        Ok(Self {
            bullet_sprites: BulletSprites::new(&assets.bullet),
            config: arena,
            tick: 0,
            players,
            platforms,
            bullets: Vec::new(),
            scoreboards,
        })
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Arena settings.
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Ticks simulated so far.
    pub fn current_tick(&self) -> u32 {
        self.tick
    }

    /// Players in id order.
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Look up a player.
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(id.index())
    }

    /// Platforms in collision order.
    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// Live bullets in firing order.
    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    /// One scoreboard per player.
    pub fn scoreboards(&self) -> &[Scoreboard] {
        &self.scoreboards
    }

    /// Player with the fewest deaths, or None on a tie.
    pub fn leader(&self) -> Option<PlayerId> {
        let fewest = self.players.iter().map(Player::respawn_count).min()?;
        let mut leaders = self.players.iter().filter(|p| p.respawn_count() == fewest);
        let leader = leaders.next()?;
        match leaders.next() {
            Some(_) => None,
            None => Some(leader.id()),
        }
    }

    // =========================================================================
    // Host integration
    // =========================================================================

    /// Resolve host key state into one input frame per player.
    pub fn poll_inputs<F>(&self, is_pressed: F) -> BTreeMap<PlayerId, InputFrame>
    where
        F: Fn(KeyCode) -> bool,
    {
        self.players
            .iter()
            .map(|player| (player.id(), player.read_input(&is_pressed)))
            .collect()
    }

    /// Start the background loop.
    pub fn start_ambience<S: AudioSink + ?Sized>(&self, sink: &mut S) {
        sink.play_looping(SoundEffect::Ambience);
    }

    /// Everything to draw this frame: platforms, players, bullets, scoreboard icons.
    pub fn draw_list(&self) -> Vec<DrawCommand> {
        let mut commands = Vec::with_capacity(
            self.platforms.len() + self.players.len() + self.bullets.len() + self.scoreboards.len(),
        );

        for platform in &self.platforms {
            commands.push(DrawCommand { image: Arc::clone(platform.image()), rect: platform.rect() });
        }
        for player in &self.players {
            commands.push(DrawCommand { image: Arc::clone(player.image()), rect: player.rect() });
        }
        for bullet in &self.bullets {
            commands.push(DrawCommand { image: Arc::clone(bullet.image()), rect: bullet.rect() });
        }
        for board in &self.scoreboards {
            let icon = board.icon_handle();
            let (x, y) = board.anchor();
            let rect = Rect::new(x, y, icon.width(), icon.height());
            commands.push(DrawCommand { image: icon, rect });
        }

        commands
    }

    // =========================================================================
    // Tick
    // =========================================================================

    /// Run one simulation tick.
    ///
    /// Players missing from `inputs` act as if nothing is pressed.
    ///
    /// # Determinism
    ///
    /// - Entities are visited in list order, never by hash
    /// - Float operations run in a fixed order
    /// - No clocks, no randomness
    pub fn tick(&mut self, inputs: &BTreeMap<PlayerId, InputFrame>) -> TickResult {
        self.tick += 1;
        let mut events = EventLog::new(self.tick);

        // 1. Players
        self.update_players(inputs, &mut events);

        // 2. Bullets
        self.update_bullets(&mut events);

        // 3. Player vs platform
        self.resolve_platform_collisions();

        // 4. Player vs bullet
        self.resolve_bullet_collisions(&mut events);

        // 5. Void
        self.check_void(&mut events);

        // 6. Scoreboards
        self.update_scoreboards();

        TickResult {
            events: events.into_events(),
            tick: self.tick,
        }
    }

    fn update_players(&mut self, inputs: &BTreeMap<PlayerId, InputFrame>, events: &mut EventLog) {
        for player in &mut self.players {
            let input = inputs.get(&player.id()).copied().unwrap_or_default();

            if player.shoot_pressed(input) {
                let bullet = player.shoot(&self.bullet_sprites, &self.config, events);
                debug!(tick = self.tick, player = player.id().0, velocity = bullet.velocity.x, "shot");
                self.bullets.push(bullet);
            }

            player.update(input, &self.config, events);
        }
    }

    fn update_bullets(&mut self, events: &mut EventLog) {
        let width = self.config.width as f64;
        self.bullets.retain_mut(|bullet| {
            let alive = bullet.update(width);
            if !alive {
                events.push(GameEventData::BulletExpired { author_id: bullet.author() });
            }
            alive
        });
    }

    fn resolve_platform_collisions(&mut self) {
        for player in &mut self.players {
            match first_platform_collision(player, &self.platforms) {
                Some(index) => {
                    if player.falling {
                        player.land_on(self.platforms[index].top(), &self.config);
                    }
                }
                None => player.standing = false,
            }
        }
    }

    fn resolve_bullet_collisions(&mut self, events: &mut EventLog) {
        for player in &mut self.players {
            let Some(index) = first_bullet_collision(player, &self.bullets) else {
                continue;
            };
            let bullet = self.bullets.remove(index);

            let knockback = if bullet.author() == player.id() {
                0.0
            } else {
                player.apply_knockback(bullet.velocity.x, &self.config)
            };
            debug!(
                tick = self.tick,
                victim = player.id().0,
                author = bullet.author().0,
                knockback,
                "bullet hit"
            );
            events.push(GameEventData::BulletHit {
                victim_id: player.id(),
                author_id: bullet.author(),
                knockback,
            });
        }
    }

    fn check_void(&mut self, events: &mut EventLog) {
        for player in &mut self.players {
            if player.in_void(&self.config) {
                player.respawn(events);
                debug!(
                    tick = self.tick,
                    player = player.id().0,
                    deaths = player.respawn_count(),
                    "fell into the void"
                );
            }
        }
    }

    fn update_scoreboards(&mut self) {
        for board in &mut self.scoreboards {
            if let Some(player) = self.players.get(board.player().index()) {
                board.update(player);
            }
        }
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Hash of the simulation state.
    ///
    /// Two arenas fed the same config and inputs hash equal at every tick.
    pub fn compute_hash(&self) -> StateHash {
        compute_state_hash(self.tick, |hasher| {
            hasher.update_u32(self.players.len() as u32);
            for player in &self.players {
                player.hash_into(hasher);
            }

            hasher.update_u32(self.bullets.len() as u32);
            for bullet in &self.bullets {
                hasher.update_u8(bullet.author().0);
                hasher.update_vec2(bullet.position);
                hasher.update_vec2(bullet.velocity);
            }

            for board in &self.scoreboards {
                hasher.update_u32(board.deaths());
            }
        })
    }
}

/// Replay a match from recorded inputs.
///
/// Returns the final arena and every event, in order.
pub fn replay_match(
    config: MatchConfig,
    assets: &ArenaAssets,
    player_inputs: &BTreeMap<PlayerId, Vec<InputFrame>>,
    tick_count: u32,
) -> Result<(Arena, Vec<GameEvent>), ArenaError> {
    let mut arena = Arena::new(config, assets)?;
    let mut all_events = Vec::new();

    for t in 0..tick_count {
        let tick_inputs: BTreeMap<PlayerId, InputFrame> = player_inputs
            .iter()
            .map(|(player_id, frames)| {
                (*player_id, frames.get(t as usize).copied().unwrap_or_default())
            })
            .collect();

        let result = arena.tick(&tick_inputs);
        all_events.extend(result.events);
    }

    Ok((arena, all_events))
}
