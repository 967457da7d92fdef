//! Platforms
//!
//! Static surfaces built once at match start by tiling one image.

use std::sync::Arc;

use crate::core::mask::Mask;
use crate::core::surface::{Rect, Surface};
use crate::core::vec2::Vector2;
use crate::game::animation::Frame;

/// A static collidable platform.
#[derive(Clone, Debug)]
pub struct Platform {
    tile: Frame,
    image: Frame,
    rect: Rect,
    mask: Mask,
    tile_count: u32,
}

impl Platform {
    /// Tile `tile` `tile_count` times and centre the result on `center`.
    ///
    /// Only opaque pixels of the tiles collide.
    pub fn new(tile: &Frame, center: Vector2, tile_count: u32) -> Self {
        let image = Surface::tiled_horizontal(tile, tile_count);
        let rect = Rect::from_center(center, image.width(), image.height());
        let mask = Mask::from_surface(&image);
        Self {
            tile: Arc::clone(tile),
            image: Arc::new(image),
            rect,
            mask,
            tile_count,
        }
    }

    /// Source tile the image was composed from.
    #[inline]
    pub fn tile(&self) -> &Frame {
        &self.tile
    }

    /// Composed image.
    #[inline]
    pub fn image(&self) -> &Frame {
        &self.image
    }

    /// Bounding rectangle.
    #[inline]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Collision mask.
    #[inline]
    pub fn mask(&self) -> &Mask {
        &self.mask
    }

    /// Number of tiles.
    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.tile_count
    }

    /// Top edge, where landing players are snapped.
    #[inline]
    pub fn top(&self) -> i32 {
        self.rect.top()
    }
}
