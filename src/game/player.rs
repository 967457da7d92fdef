//! Players
//!
//! Input-driven physics actors. Per tick a player:
//!
//! ```text
//! acceleration = (0, gravity)
//!   -> jump (if standing) / move left|right
//!   -> friction:   a.x += v.x * friction
//!   -> velocity:   v += a          (|v.x| < stop_speed snaps to 0)
//!   -> position:   p += v - 0.5 * a
//!   -> falling = v.y > 0
//!   -> animation frame + muzzle flash + mirror
//! ```
//!
//! The step order is part of the gameplay feel and of replay determinism;
//! keep it exactly as written.

use std::sync::Arc;

use serde::{Serialize, Deserialize};

#[cfg(feature = "debug-tracing")]
use tracing::trace;

use crate::core::hash::StateHasher;
use crate::core::mask::Mask;
use crate::core::surface::Rect;
use crate::core::vec2::Vector2;
use crate::game::animation::{
    is_running, AnimationSet, AnimationState, Frame, FrameCycle, TickDivider,
};
use crate::game::bullet::{Bullet, BulletSprites};
use crate::game::config::{ArenaConfig, PlayerConfig};
use crate::game::events::{EventLog, GameEventData};
use crate::game::input::{Action, InputFrame, KeyBindings, KeyCode};

// =============================================================================
// PLAYER ID
// =============================================================================

/// Index of a player in the arena's player list.
///
/// Bullets store this instead of a reference, so a bullet never keeps its
/// author alive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create from a raw index.
    pub const fn new(index: u8) -> Self {
        Self(index)
    }

    /// Position in the player list.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

// =============================================================================
// DIRECTION
// =============================================================================

/// Facing direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Facing left (sprites are mirrored)
    Left,
    /// Facing right
    Right,
}

impl Direction {
    /// -1.0 for left, 1.0 for right.
    #[inline]
    pub fn sign(self) -> f64 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }
}

// =============================================================================
// PLAYER
// =============================================================================

/// A controllable combatant.
#[derive(Clone, Debug)]
pub struct Player {
    id: PlayerId,
    name: String,
    color: String,
    bindings: KeyBindings,

    /// Midbottom of the sprite
    pub position: Vector2,
    /// Velocity in pixels per tick
    pub velocity: Vector2,
    /// Acceleration applied this tick (rebuilt every tick)
    pub acceleration: Vector2,
    /// Facing direction
    pub direction: Direction,

    spawn_point: Vector2,
    spawn_direction: Direction,

    /// Moving down (v.y > 0)
    pub falling: bool,
    /// Resting on a platform; only then can the player jump
    pub standing: bool,
    /// Muzzle flash pending for the next composed frame
    pub shooting: bool,
    shoot_held: bool,

    respawn_count: u32,

    animation: AnimationSet,
    animation_tick: TickDivider,
    step_tick: TickDivider,
    muzzle_flash: Frame,

    image: Frame,
    mask: Mask,
}

impl Player {
    /// Create a player at its spawn point.
    pub fn new(
        id: PlayerId,
        config: &PlayerConfig,
        mut animation: AnimationSet,
        muzzle_flash: Frame,
        arena: &ArenaConfig,
    ) -> Self {
        let image = animation.idle.advance();
        let mask = Mask::from_surface(&image);
        let ticks_per_frame = arena.ticks_per_animation_frame();

        Self {
            id,
            name: config.name.clone(),
            color: config.color.clone(),
            bindings: config.bindings.clone(),
            position: config.spawn_point,
            velocity: Vector2::ZERO,
            acceleration: Vector2::ZERO,
            direction: config.spawn_direction,
            spawn_point: config.spawn_point,
            spawn_direction: config.spawn_direction,
            falling: true,
            standing: false,
            shooting: false,
            shoot_held: false,
            respawn_count: 0,
            animation,
            animation_tick: TickDivider::new(ticks_per_frame),
            step_tick: TickDivider::new(ticks_per_frame),
            muzzle_flash,
            image,
            mask,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Player ID.
    #[inline]
    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Display name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sprite colour.
    #[inline]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// Number of deaths so far (lower is better).
    #[inline]
    pub fn respawn_count(&self) -> u32 {
        self.respawn_count
    }

    /// Respawn position.
    #[inline]
    pub fn spawn_point(&self) -> Vector2 {
        self.spawn_point
    }

    /// Facing direction after respawn.
    #[inline]
    pub fn spawn_direction(&self) -> Direction {
        self.spawn_direction
    }

    /// Currently displayed frame.
    #[inline]
    pub fn image(&self) -> &Frame {
        &self.image
    }

    /// Collision mask of the displayed frame.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Bounding rectangle (midbottom at the position).
    pub fn rect(&self) -> Rect {
        Rect::from_midbottom(self.position, self.image.width(), self.image.height())
    }

    /// Independent copy of the idle cursor, for another consumer.
    pub fn idle_cursor(&self) -> FrameCycle {
        self.animation.idle.clone()
    }

    /// Resolve host key state through this player's bindings.
    pub fn read_input<F>(&self, is_pressed: F) -> InputFrame
    where
        F: Fn(KeyCode) -> bool,
    {
        self.bindings.resolve(is_pressed)
    }

    /// Current visual state.
    pub fn animation_state(&self) -> AnimationState {
        AnimationState::select(self.standing, self.falling, self.is_running())
    }

    /// Accelerating along the direction of motion.
    #[inline]
    pub fn is_running(&self) -> bool {
        is_running(self.acceleration.x, self.velocity.x)
    }

    // =========================================================================
    // Actions
    // =========================================================================

    /// Jump if standing. No-op in the air.
    pub fn jump(&mut self, config: &ArenaConfig, events: &mut EventLog) -> bool {
        if !self.standing {
            return false;
        }
        self.velocity.y = config.jump_height;
        self.standing = false;
        events.push(GameEventData::Jumped { player_id: self.id });
        true
    }

    /// Accelerate right and face right.
    pub fn move_right(&mut self, config: &ArenaConfig) {
        self.acceleration.x = config.acceleration;
        self.direction = Direction::Right;
    }

    /// Accelerate left and face left.
    pub fn move_left(&mut self, config: &ArenaConfig) {
        self.acceleration.x = -config.acceleration;
        self.direction = Direction::Left;
    }

    /// Edge-detect the shoot action. True only on the tick it goes down.
    pub fn shoot_pressed(&mut self, input: InputFrame) -> bool {
        let held = input.pressed(Action::Shoot);
        let edge = held && !self.shoot_held;
        self.shoot_held = held;
        edge
    }

    /// Fire a bullet: flag the muzzle flash and apply recoil.
    pub fn shoot(
        &mut self,
        sprites: &BulletSprites,
        config: &ArenaConfig,
        events: &mut EventLog,
    ) -> Bullet {
        let bullet = Bullet::fire(
            self.id,
            self.position,
            self.velocity.x,
            self.direction,
            sprites,
            config,
        );
        self.shooting = true;
        self.velocity.x -= self.direction.sign() * config.recoil;
        events.push(GameEventData::Fired {
            player_id: self.id,
            bullet_velocity: bullet.velocity.x,
        });
        bullet
    }

    // =========================================================================
    // Per-tick update
    // =========================================================================

    /// Apply input, integrate physics and pick the next frame.
    pub fn update(&mut self, input: InputFrame, config: &ArenaConfig, events: &mut EventLog) {
        self.handle_input(input, config, events);
        self.apply_friction(config);
        self.update_velocity(config);
        self.update_position();
        self.update_image(events, config);

        #[cfg(feature = "debug-tracing")]
        trace!(
            player = self.id.0,
            x = self.position.x,
            y = self.position.y,
            vx = self.velocity.x,
            vy = self.velocity.y,
            standing = self.standing,
            "player update"
        );
    }

    fn handle_input(&mut self, input: InputFrame, config: &ArenaConfig, events: &mut EventLog) {
        self.acceleration = Vector2::new(0.0, config.gravity);
        if input.pressed(Action::Up) {
            self.jump(config, events);
        }
        if input.pressed(Action::Right) {
            self.move_right(config);
        } else if input.pressed(Action::Left) {
            self.move_left(config);
        }
    }

    /// Drag proportional to speed; caps horizontal speed without a clamp.
    fn apply_friction(&mut self, config: &ArenaConfig) {
        self.acceleration.x += self.velocity.x * config.friction;
    }

    fn update_velocity(&mut self, config: &ArenaConfig) {
        self.velocity += self.acceleration;

        // Stops the asymptotic creep of the drag model
        if self.velocity.x.abs() < config.stop_speed {
            self.velocity.x = 0.0;
        }
    }

    fn update_position(&mut self) {
        // Δd = v₂ - ½a with Δt = 1 tick
        self.position += self.velocity - 0.5 * self.acceleration;
        self.falling = self.velocity.y > 0.0;
    }

    fn update_image(&mut self, events: &mut EventLog, config: &ArenaConfig) {
        if !self.standing {
            let [ascending, descending] = &self.animation.jump;
            let frame = if self.falling { descending } else { ascending };
            self.image = Arc::clone(frame);
        } else if self.animation_tick.tick() {
            if self.is_running() {
                self.image = self.animation.run.advance();
                if self.step_tick.tick() {
                    events.push(GameEventData::Footstep { player_id: self.id });
                }
            } else {
                self.image = self.animation.idle.advance();
            }
        } else {
            return;
        }

        self.composite_muzzle_flash(config);
        self.flip_if_facing_left();
        self.mask = Mask::from_surface(&self.image);
    }

    /// Draw the pending muzzle flash onto a copy of the current frame.
    fn composite_muzzle_flash(&mut self, config: &ArenaConfig) {
        if !self.shooting {
            return;
        }

        let mut frame = (*self.image).clone();
        let (x, mut y) = config.muzzle_flash_offset;
        if self.standing && self.is_running() {
            y += config.muzzle_flash_running_offset_y;
        }
        frame.blit(&self.muzzle_flash, x, y);

        self.image = Arc::new(frame);
        self.shooting = false;
    }

    fn flip_if_facing_left(&mut self) {
        if self.direction == Direction::Left {
            self.image = Arc::new(self.image.flipped_horizontal());
        }
    }

    // =========================================================================
    // Collision responses
    // =========================================================================

    /// Snap onto a platform top.
    pub fn land_on(&mut self, platform_top: i32, config: &ArenaConfig) {
        self.velocity.y = 0.0;
        self.standing = true;
        self.position.y = platform_top as f64 + config.player_offset;
    }

    /// Push sideways from a bullet strike. Returns the velocity added.
    pub fn apply_knockback(&mut self, bullet_velocity_x: f64, config: &ArenaConfig) -> f64 {
        let knockback = bullet_velocity_x * config.knockback_multiplier;
        self.velocity.x += knockback;
        knockback
    }

    /// Below the void threshold.
    #[inline]
    pub fn in_void(&self, config: &ArenaConfig) -> bool {
        self.position.y > config.void_height()
    }

    /// Reset to the spawn point and count a death.
    ///
    /// `standing`/`falling` are left for the next tick's physics to recompute.
    pub fn respawn(&mut self, events: &mut EventLog) {
        self.position = self.spawn_point;
        self.direction = self.spawn_direction;
        self.velocity = Vector2::ZERO;
        self.respawn_count += 1;
        events.push(GameEventData::Respawned {
            player_id: self.id,
            respawn_count: self.respawn_count,
        });
    }

    /// Feed simulation state into a hasher.
    pub fn hash_into(&self, hasher: &mut StateHasher) {
        hasher.update_u8(self.id.0);
        hasher.update_str(&self.name);
        hasher.update_str(&self.color);
        hasher.update_vec2(self.position);
        hasher.update_vec2(self.velocity);
        hasher.update_vec2(self.acceleration);
        hasher.update_bool(self.direction == Direction::Left);
        hasher.update_bool(self.falling);
        hasher.update_bool(self.standing);
        hasher.update_bool(self.shooting);
        hasher.update_bool(self.shoot_held);
        hasher.update_u32(self.respawn_count);
        hasher.update_u32(self.animation.idle.position() as u32);
        hasher.update_u32(self.animation.run.position() as u32);
        hasher.update_u32(self.animation_tick.phase());
        hasher.update_u32(self.step_tick.phase());
    }
}
