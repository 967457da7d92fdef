//! Bullet Ballistics
//!
//! Bullets fly in a straight horizontal line with no gravity and are
//! removed once they leave `[0, arena_width]` or hit a player.

use std::sync::Arc;

use crate::core::mask::Mask;
use crate::core::surface::{Rect, Surface};
use crate::core::vec2::Vector2;
use crate::game::animation::Frame;
use crate::game::config::ArenaConfig;
use crate::game::player::{Direction, PlayerId};

/// Bullet image in both orientations, with masks.
///
/// Built once per match so each bullet only picks an orientation.
#[derive(Clone, Debug)]
pub struct BulletSprites {
    right: (Frame, Arc<Mask>),
    left: (Frame, Arc<Mask>),
}

impl BulletSprites {
    /// Prepare both orientations of a right-facing bullet image.
    pub fn new(image: &Frame) -> Self {
        let flipped: Surface = image.flipped_horizontal();
        let right_mask = Mask::from_surface(image);
        let left_mask = Mask::from_surface(&flipped);
        Self {
            right: (Arc::clone(image), Arc::new(right_mask)),
            left: (Arc::new(flipped), Arc::new(left_mask)),
        }
    }

    fn oriented(&self, moving_left: bool) -> (Frame, Arc<Mask>) {
        let (image, mask) = if moving_left { &self.left } else { &self.right };
        (Arc::clone(image), Arc::clone(mask))
    }
}

/// A live projectile.
#[derive(Clone, Debug)]
pub struct Bullet {
    /// Centre of the bullet
    pub position: Vector2,
    /// Velocity (y is always 0)
    pub velocity: Vector2,
    author: PlayerId,
    image: Frame,
    mask: Arc<Mask>,
}

impl Bullet {
    /// Fire a bullet from a shooter.
    ///
    /// Muzzle speed is added in the facing direction to the shooter's own
    /// horizontal velocity. The spawn offset is mirrored for leftward bullets
    /// and raised when the bullet outruns `bullet_speed` (shooter running
    /// toward where they aim).
    pub fn fire(
        author: PlayerId,
        shooter_position: Vector2,
        shooter_velocity_x: f64,
        direction: Direction,
        sprites: &BulletSprites,
        config: &ArenaConfig,
    ) -> Self {
        let velocity_x = direction.sign() * config.bullet_speed + shooter_velocity_x;

        let mut x_offset = config.bullet_offset.x;
        let mut y_offset = config.bullet_offset.y;
        if velocity_x.abs() > config.bullet_speed {
            y_offset += config.bullet_running_offset_y;
        }
        let moving_left = velocity_x < 0.0;
        if moving_left {
            x_offset = -x_offset;
        }

        let (image, mask) = sprites.oriented(moving_left);
        Self {
            position: Vector2::new(shooter_position.x + x_offset, shooter_position.y + y_offset),
            velocity: Vector2::new(velocity_x, 0.0),
            author,
            image,
            mask,
        }
    }

    /// Player who fired this bullet.
    #[inline]
    pub fn author(&self) -> PlayerId {
        self.author
    }

    /// Image (already oriented).
    #[inline]
    pub fn image(&self) -> &Frame {
        &self.image
    }

    /// Collision mask.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Bounding rectangle, centred on the position.
    pub fn rect(&self) -> Rect {
        Rect::from_center(self.position, self.image.width(), self.image.height())
    }

    /// Move one tick. Returns false once the bullet is outside `[0, arena_width]`.
    pub fn update(&mut self, arena_width: f64) -> bool {
        self.position.x += self.velocity.x;
        self.in_bounds(arena_width)
    }

    /// Check if the bullet is still within the arena horizontally.
    #[inline]
    pub fn in_bounds(&self, arena_width: f64) -> bool {
        (0.0..=arena_width).contains(&self.position.x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sprites() -> BulletSprites {
        // Asymmetric image: only the right column is solid
        let mut image = Surface::new(4, 2);
        image.set_pixel(3, 0, [255, 255, 0, 255]);
        image.set_pixel(3, 1, [255, 255, 0, 255]);
        BulletSprites::new(&Arc::new(image))
    }

    fn fire(direction: Direction, shooter_vx: f64, config: &ArenaConfig) -> Bullet {
        Bullet::fire(
            PlayerId::new(0),
            Vector2::new(500.0, 300.0),
            shooter_vx,
            direction,
            &sprites(),
            config,
        )
    }

    #[test]
    fn test_muzzle_velocity_from_rest() {
        let config = ArenaConfig::default();
        assert_eq!(fire(Direction::Right, 0.0, &config).velocity, Vector2::new(22.0, 0.0));
        assert_eq!(fire(Direction::Left, 0.0, &config).velocity, Vector2::new(-22.0, 0.0));
    }

    #[test]
    fn test_velocity_composition_is_directional() {
        let config = ArenaConfig::default();
        assert_eq!(fire(Direction::Right, 3.0, &config).velocity.x, 25.0);
        assert_eq!(fire(Direction::Left, 3.0, &config).velocity.x, -19.0);
        assert_eq!(fire(Direction::Left, -3.0, &config).velocity.x, -25.0);
    }

    #[test]
    fn test_spawn_offset() {
        let config = ArenaConfig::default();
        let (ox, oy) = (config.bullet_offset.x, config.bullet_offset.y);

        let right = fire(Direction::Right, 0.0, &config);
        assert_eq!(right.position, Vector2::new(500.0 + ox, 300.0 + oy));

        let left = fire(Direction::Left, 0.0, &config);
        assert_eq!(left.position, Vector2::new(500.0 - ox, 300.0 + oy));

        // Running in the facing direction raises the muzzle
        let running = fire(Direction::Right, 3.0, &config);
        assert_eq!(running.position.y, 300.0 + oy + config.bullet_running_offset_y);
    }

    #[test]
    fn test_left_bullet_is_flipped() {
        let config = ArenaConfig::default();
        let right = fire(Direction::Right, 0.0, &config);
        let left = fire(Direction::Left, 0.0, &config);

        assert!(right.mask().get(3, 0));
        assert!(!right.mask().get(0, 0));
        assert!(left.mask().get(0, 0));
        assert!(!left.mask().get(3, 0));
        assert_eq!(left.image().alpha(0, 1), 255);
    }

    #[test]
    fn test_fifty_tick_flight_and_cull() {
        let mut config = ArenaConfig::default();
        config.width = 1280;
        let mut bullet = Bullet::fire(
            PlayerId::new(1),
            Vector2::new(0.0, 300.0),
            3.0,
            Direction::Right,
            &sprites(),
            &config,
        );
        assert_eq!(bullet.velocity.x, 25.0);

        let start = bullet.position.x;
        for _ in 0..50 {
            assert!(bullet.update(config.width as f64));
        }
        assert_eq!(bullet.position.x - start, 1250.0);
        assert!(bullet.position.x <= 1280.0);

        // Next tick takes it past the right edge
        assert!(!bullet.update(config.width as f64));
        assert!(bullet.position.x > 1280.0);
        assert_eq!(bullet.author(), PlayerId::new(1));
    }

    #[test]
    fn test_left_edge_cull() {
        let config = ArenaConfig::default();
        let mut bullet = fire(Direction::Left, 0.0, &config);
        bullet.position.x = 10.0;
        assert!(!bullet.update(config.width as f64));
    }
}
