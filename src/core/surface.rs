//! Drawable Surfaces
//!
//! A minimal RGBA pixel buffer standing in for the presentation layer's
//! image handle. The simulation only needs to copy, composite, mirror and
//! tile images and read their alpha for collision masks; decoding and
//! display are left to the host.

use serde::{Serialize, Deserialize};

use super::vec2::Vector2;

/// One RGBA pixel.
pub type Rgba = [u8; 4];

/// Fully transparent pixel.
pub const TRANSPARENT: Rgba = [0, 0, 0, 0];

// =============================================================================
// RECT
// =============================================================================

/// Integer pixel rectangle (top-left origin, y grows downward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Left edge
    pub x: i32,
    /// Top edge
    pub y: i32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size.
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of the given size whose bottom edge midpoint sits on `anchor`.
    ///
    /// Fractional coordinates are floored.
    pub fn from_midbottom(anchor: Vector2, width: u32, height: u32) -> Self {
        let cx = anchor.x.floor() as i32;
        let bottom = anchor.y.floor() as i32;
        Self {
            x: cx - (width / 2) as i32,
            y: bottom - height as i32,
            width,
            height,
        }
    }

    /// Rectangle of the given size centred on `anchor` (floored).
    pub fn from_center(anchor: Vector2, width: u32, height: u32) -> Self {
        let cx = anchor.x.floor() as i32;
        let cy = anchor.y.floor() as i32;
        Self {
            x: cx - (width / 2) as i32,
            y: cy - (height / 2) as i32,
            width,
            height,
        }
    }

    /// Top edge.
    #[inline]
    pub fn top(&self) -> i32 {
        self.y
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Left edge.
    #[inline]
    pub fn left(&self) -> i32 {
        self.x
    }

    /// Right edge (exclusive).
    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Check if two rectangles share at least one pixel.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

// =============================================================================
// SURFACE
// =============================================================================

/// An RGBA image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Surface {
    /// Create a fully transparent surface.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, TRANSPARENT)
    }

    /// Create a surface filled with one colour.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; (width * height) as usize],
        }
    }

    /// Wrap decoded row-major pixel data.
    ///
    /// Returns `None` if `pixels` does not hold exactly `width * height` entries.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<Rgba>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(Self { width, height, pixels })
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

    /// Bounding rectangle at the origin.
    pub fn rect(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }

    /// Get a pixel (None if out of bounds).
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y * self.width + x) as usize])
    }

    /// Set a pixel. Out-of-bounds writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if x < self.width && y < self.height {
            self.pixels[(y * self.width + x) as usize] = color;
        }
    }

    /// Alpha of a pixel (0 if out of bounds).
    #[inline]
    pub fn alpha(&self, x: u32, y: u32) -> u8 {
        self.pixel(x, y).map_or(0, |p| p[3])
    }

    /// Composite `src` over this surface with its top-left at (`x`, `y`).
    pub fn blit(&mut self, src: &Surface, x: i32, y: i32) {
        self.blit_area(src, src.rect(), x, y);
    }

    /// Composite the `area` of `src` over this surface at (`x`, `y`).
    ///
    /// Both the source area and the destination are clipped.
    pub fn blit_area(&mut self, src: &Surface, area: Rect, x: i32, y: i32) {
        for sy in 0..area.height as i32 {
            for sx in 0..area.width as i32 {
                let (src_x, src_y) = (area.x + sx, area.y + sy);
                let (dst_x, dst_y) = (x + sx, y + sy);
                if src_x < 0 || src_y < 0 || dst_x < 0 || dst_y < 0 {
                    continue;
                }
                let Some(top) = src.pixel(src_x as u32, src_y as u32) else {
                    continue;
                };
                let Some(bottom) = self.pixel(dst_x as u32, dst_y as u32) else {
                    continue;
                };
                self.set_pixel(dst_x as u32, dst_y as u32, alpha_over(top, bottom));
            }
        }
    }

    /// Copy of this surface mirrored left-to-right.
    pub fn flipped_horizontal(&self) -> Surface {
        let mut pixels = Vec::with_capacity(self.pixels.len());
        for row in self.pixels.chunks(self.width.max(1) as usize) {
            pixels.extend(row.iter().rev());
        }
        Surface {
            width: self.width,
            height: self.height,
            pixels,
        }
    }

    /// Lay `tile` out `count` times side by side on a transparent surface.
    pub fn tiled_horizontal(tile: &Surface, count: u32) -> Surface {
        let mut surface = Surface::new(tile.width * count, tile.height);
        let mut x = 0;
        for _ in 0..count {
            surface.blit(tile, x, 0);
            x += tile.width as i32;
        }
        surface
    }

    /// Copy of `area` with every pixel matching `key` (RGB) made transparent.
    pub fn subsurface_keyed(&self, area: Rect, key: [u8; 3]) -> Surface {
        let mut frame = Surface::new(area.width, area.height);
        frame.blit_area(self, area, 0, 0);
        for pixel in frame.pixels.iter_mut() {
            if pixel[..3] == key {
                *pixel = TRANSPARENT;
            }
        }
        frame
    }
}

/// Straight-alpha "over" operator.
fn alpha_over(top: Rgba, bottom: Rgba) -> Rgba {
    match top[3] {
        255 => top,
        0 => bottom,
        a => {
            let a = a as u32;
            let inv = 255 - a;
            let out_a = a + (bottom[3] as u32 * inv) / 255;
            let mut out = [0u8; 4];
            for c in 0..3 {
                let num = top[c] as u32 * a + (bottom[c] as u32 * bottom[3] as u32 * inv) / 255;
                out[c] = if out_a == 0 { 0 } else { (num / out_a) as u8 };
            }
            out[3] = out_a as u8;
            out
        }
    }
}
