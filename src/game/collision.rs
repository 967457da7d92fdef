//! Collision Detection
//!
//! Pixel-accurate collision between players, platforms and bullets.
//! A cheap rectangle test runs first; only overlapping rectangles pay for
//! the mask comparison.

use crate::core::mask::Mask;
use crate::core::surface::Rect;
use crate::game::bullet::Bullet;
use crate::game::platform::Platform;
use crate::game::player::Player;

/// Check if two placed masks share an opaque pixel.
#[inline]
pub fn masks_collide(a_rect: Rect, a_mask: &Mask, b_rect: Rect, b_mask: &Mask) -> bool {
    if !a_rect.overlaps(&b_rect) {
        return false;
    }
    a_mask.overlaps(b_mask, (b_rect.x - a_rect.x, b_rect.y - a_rect.y))
}

/// Check if a player touches a platform.
pub fn player_hits_platform(player: &Player, platform: &Platform) -> bool {
    masks_collide(player.rect(), player.mask(), platform.rect(), platform.mask())
}

/// Check if a bullet touches a player. The author is not exempt.
pub fn player_hits_bullet(player: &Player, bullet: &Bullet) -> bool {
    masks_collide(player.rect(), player.mask(), bullet.rect(), bullet.mask())
}

/// Index of the first platform the player touches, in list order.
pub fn first_platform_collision(player: &Player, platforms: &[Platform]) -> Option<usize> {
    platforms.iter().position(|platform| player_hits_platform(player, platform))
}

/// Index of the first bullet touching the player, in list order.
pub fn first_bullet_collision(player: &Player, bullets: &[Bullet]) -> Option<usize> {
    bullets.iter().position(|bullet| player_hits_bullet(player, bullet))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::surface::Surface;

    /// 4x4 mask with only the bottom-right pixel solid.
    fn corner_mask() -> Mask {
        let mut surface = Surface::new(4, 4);
        surface.set_pixel(3, 3, [255, 255, 255, 255]);
        Mask::from_surface(&surface)
    }

    #[test]
    fn test_disjoint_rects_never_collide() {
        let mask = Mask::full(4, 4);
        assert!(!masks_collide(Rect::new(0, 0, 4, 4), &mask, Rect::new(4, 0, 4, 4), &mask));
    }

    #[test]
    fn test_transparent_overlap_is_not_collision() {
        let corner = corner_mask();
        let full = Mask::full(4, 4);

        // Rects overlap at the top-left of `corner`, which is transparent
        assert!(!masks_collide(Rect::new(0, 0, 4, 4), &corner, Rect::new(-2, -2, 4, 4), &full));
        // Shifted so the solid corner is covered
        assert!(masks_collide(Rect::new(0, 0, 4, 4), &corner, Rect::new(2, 2, 4, 4), &full));
    }

    #[test]
    fn test_collision_is_symmetric() {
        let corner = corner_mask();
        let full = Mask::full(4, 4);
        let a = Rect::new(10, 10, 4, 4);
        let b = Rect::new(13, 13, 4, 4);
        assert_eq!(
            masks_collide(a, &corner, b, &full),
            masks_collide(b, &full, a, &corner)
        );
    }

    #[test]
    fn test_empty_sets_have_no_collision() {
        use crate::game::config::MatchConfig;
        use crate::game::player::{tests::animation, PlayerId};
        use std::sync::Arc;

        let config = MatchConfig::default();
        let flash = Arc::new(Surface::new(1, 1));
        let player = Player::new(PlayerId::new(0), &config.players[0], animation(), flash, &config.arena);

        assert_eq!(first_platform_collision(&player, &[]), None);
        assert_eq!(first_bullet_collision(&player, &[]), None);
    }
}
