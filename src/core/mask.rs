//! Pixel Collision Masks
//!
//! Opacity bitmasks derived from surfaces. Two masks collide only if at
//! least one opaque pixel of each lands on the same spot, which is stricter
//! than a bounding-rectangle overlap.

use bitvec::prelude::*;

use super::surface::Surface;

/// Pixels with alpha strictly above this value are solid.
pub const ALPHA_THRESHOLD: u8 = 127;

/// Row-major opacity bitmask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    bits: BitVec<u64, Lsb0>,
}

impl Mask {
    /// Empty mask (no solid pixels).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: bitvec![u64, Lsb0; 0; (width as usize) * (height as usize)],
        }
    }

    /// Mask with every pixel solid.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            bits: bitvec![u64, Lsb0; 1; (width as usize) * (height as usize)],
        }
    }

    /// Derive a mask from a surface's alpha channel.
    pub fn from_surface(surface: &Surface) -> Self {
        let mut mask = Self::new(surface.width(), surface.height());
        for y in 0..surface.height() {
            for x in 0..surface.width() {
                if surface.alpha(x, y) > ALPHA_THRESHOLD {
                    mask.set(x, y, true);
                }
            }
        }
        mask
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + x as usize
    }

    /// Check a single pixel (false if out of bounds).
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }
        self.bits[self.index(x, y)]
    }

    /// Set a single pixel. Out-of-bounds writes are ignored.
    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        if x < self.width && y < self.height {
            let i = self.index(x, y);
            self.bits.set(i, solid);
        }
    }

    /// Number of solid pixels.
    pub fn count(&self) -> usize {
        self.bits.count_ones()
    }

    /// Check overlap with `other` placed at `offset` relative to this mask's
    /// top-left corner.
    pub fn overlaps(&self, other: &Mask, offset: (i32, i32)) -> bool {
        let (dx, dy) = offset;

        // Overlapping region in this mask's coordinates
        let x0 = dx.max(0);
        let y0 = dy.max(0);
        let x1 = (self.width as i32).min(dx + other.width as i32);
        let y1 = (self.height as i32).min(dy + other.height as i32);

        if x0 >= x1 || y0 >= y1 {
            return false;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                if self.get(x as u32, y as u32)
                    && other.get((x - dx) as u32, (y - dy) as u32)
                {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_surface_threshold() {
        let mut s = Surface::new(3, 1);
        s.set_pixel(0, 0, [1, 2, 3, 127]);
        s.set_pixel(1, 0, [1, 2, 3, 128]);
        s.set_pixel(2, 0, [1, 2, 3, 255]);

        let mask = Mask::from_surface(&s);
        assert!(!mask.get(0, 0));
        assert!(mask.get(1, 0));
        assert!(mask.get(2, 0));
        assert_eq!(mask.count(), 2);
    }

    #[test]
    fn test_overlap_full_masks() {
        let a = Mask::full(10, 10);
        let b = Mask::full(4, 4);

        assert!(a.overlaps(&b, (8, 8)));
        assert!(a.overlaps(&b, (-3, -3)));
        assert!(!a.overlaps(&b, (10, 0)));
        assert!(!a.overlaps(&b, (-4, 0)));
    }

    #[test]
    fn test_overlap_requires_solid_pixels() {
        // Hollow square: only the border is solid
        let mut ring = Mask::new(5, 5);
        for i in 0..5 {
            ring.set(i, 0, true);
            ring.set(i, 4, true);
            ring.set(0, i, true);
            ring.set(4, i, true);
        }
        let dot = Mask::full(1, 1);

        // Bounding boxes overlap but the centre is empty
        assert!(!ring.overlaps(&dot, (2, 2)));
        assert!(ring.overlaps(&dot, (0, 2)));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let mut a = Mask::new(6, 3);
        a.set(5, 2, true);
        let mut b = Mask::new(4, 4);
        b.set(1, 0, true);

        assert!(a.overlaps(&b, (4, 2)));
        assert!(b.overlaps(&a, (-4, -2)));
        assert!(!a.overlaps(&b, (3, 2)));
    }

    #[test]
    fn test_empty_mask_never_collides() {
        let empty = Mask::new(8, 8);
        assert!(!empty.overlaps(&Mask::full(8, 8), (0, 0)));
    }
}
