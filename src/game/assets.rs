//! Asset Contract
//!
//! The simulation never decodes files. The host hands over decoded
//! surfaces; this module checks they satisfy what the core assumes
//! (non-empty idle/run loops, exactly two jump frames) and slices sprite
//! sheets using a sidecar atlas of named frame rectangles.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Serialize, Deserialize};
use thiserror::Error;

use crate::core::surface::{Rect, Rgba, Surface};
use crate::game::animation::{AnimationSet, Frame, FrameCycle};

/// Asset errors. All are fatal at match setup.
#[derive(Debug, Error)]
pub enum AssetError {
    /// No frame set for a configured colour
    #[error("no sprites loaded for colour {0:?}")]
    MissingColor(String),

    /// Idle or run loop without frames
    #[error("{color} {sequence} animation has no frames")]
    EmptySequence { color: String, sequence: &'static str },

    /// Jump pair of the wrong size
    #[error("{color} jump animation needs exactly 2 frames, got {count}")]
    JumpFrameCount { color: String, count: usize },

    /// Atlas lookup failed
    #[error("sprite atlas has no frame named {0:?}")]
    MissingFrame(String),

    /// Atlas rectangle does not fit the sheet
    #[error("frame {name:?} lies outside the {width}x{height} sheet")]
    FrameOutOfBounds { name: String, width: u32, height: u32 },

    /// Atlas file is not valid JSON
    #[error("failed to parse sprite atlas: {0}")]
    Atlas(#[from] serde_json::Error),
}

// =============================================================================
// DECODED ASSETS
// =============================================================================

/// Decoded frames for one player colour.
#[derive(Clone, Debug, Default)]
pub struct PlayerSprites {
    /// Idle loop (at least one frame)
    pub idle: Vec<Frame>,
    /// Run loop (at least one frame)
    pub run: Vec<Frame>,
    /// `[ascending, descending]`
    pub jump: Vec<Frame>,
}

impl PlayerSprites {
    /// Build fresh animation cursors, checking frame counts.
    pub fn animation_set(&self, color: &str) -> Result<AnimationSet, AssetError> {
        let idle = FrameCycle::new(self.idle.clone()).ok_or_else(|| AssetError::EmptySequence {
            color: color.to_string(),
            sequence: "idle",
        })?;
        let run = FrameCycle::new(self.run.clone()).ok_or_else(|| AssetError::EmptySequence {
            color: color.to_string(),
            sequence: "run",
        })?;
        let jump = match self.jump.as_slice() {
            [up, down] => [Arc::clone(up), Arc::clone(down)],
            other => {
                return Err(AssetError::JumpFrameCount {
                    color: color.to_string(),
                    count: other.len(),
                })
            }
        };

        Ok(AnimationSet { idle, run, jump })
    }
}

/// Everything the arena draws, keyed by semantic name.
#[derive(Clone, Debug)]
pub struct ArenaAssets {
    /// Frame sets per player colour
    pub players: BTreeMap<String, PlayerSprites>,
    /// Shared muzzle flash overlay
    pub muzzle_flash: Frame,
    /// Bullet image (facing right)
    pub bullet: Frame,
    /// One platform tile
    pub platform_tile: Frame,
}

impl ArenaAssets {
    /// Animation cursors for a colour.
    pub fn animation_for(&self, color: &str) -> Result<AnimationSet, AssetError> {
        self.players
            .get(color)
            .ok_or_else(|| AssetError::MissingColor(color.to_string()))?
            .animation_set(color)
    }
}

// =============================================================================
// PLACEHOLDERS
// =============================================================================

/// Side length of a placeholder player frame.
pub const PLACEHOLDER_FRAME_SIZE: u32 = 48;

impl ArenaAssets {
    /// Flat-colour stand-ins for headless runs and tests.
    ///
    /// Each colour gets a 48x48 frame set with an opaque body on a
    /// transparent border: 2 idle frames, 4 run frames and the jump pair.
    pub fn placeholder(colors: &[(&str, Rgba)]) -> Self {
        let players = colors
            .iter()
            .map(|(name, rgba)| (name.to_string(), placeholder_sprites(*rgba)))
            .collect();

        Self {
            players,
            muzzle_flash: Arc::new(Surface::filled(6, 6, [255, 220, 80, 255])),
            bullet: Arc::new(Surface::filled(10, 4, [250, 250, 210, 255])),
            platform_tile: Arc::new(Surface::filled(32, 16, [90, 70, 50, 255])),
        }
    }
}

fn placeholder_sprites(color: Rgba) -> PlayerSprites {
    let body = |shift: i32| -> Frame {
        let mut frame = Surface::new(PLACEHOLDER_FRAME_SIZE, PLACEHOLDER_FRAME_SIZE);
        let torso = Surface::filled(20, 40, color);
        frame.blit(&torso, 14 + shift, 8);
        Arc::new(frame)
    };

    PlayerSprites {
        idle: vec![body(0), body(1)],
        run: (0..4).map(|i| body(i - 2)).collect(),
        jump: vec![body(0), body(0)],
    }
}

// =============================================================================
// SPRITE SHEETS
// =============================================================================

/// Sidecar description of a sprite sheet: named frame rectangles.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameAtlas {
    /// Frame name -> rectangle on the sheet
    pub frames: BTreeMap<String, Rect>,
}

impl FrameAtlas {
    /// Parse an atlas from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, AssetError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a frame rectangle.
    pub fn get(&self, name: &str) -> Result<Rect, AssetError> {
        self.frames
            .get(name)
            .copied()
            .ok_or_else(|| AssetError::MissingFrame(name.to_string()))
    }

    /// Names of the form `{prefix}_{n}`, ordered by `n`.
    pub fn sequence(&self, prefix: &str) -> Vec<&str> {
        let mut numbered: Vec<(u32, &str)> = self
            .frames
            .keys()
            .filter_map(|name| {
                let index = name.strip_prefix(prefix)?.strip_prefix('_')?.parse::<u32>().ok()?;
                Some((index, name.as_str()))
            })
            .collect();
        numbered.sort_unstable();
        numbered.into_iter().map(|(_, name)| name).collect()
    }
}

/// A decoded sprite sheet.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    sheet: Surface,
    colorkey: Option<[u8; 3]>,
}

impl SpriteSheet {
    /// Colour treated as transparent unless told otherwise.
    pub const DEFAULT_COLORKEY: [u8; 3] = [0, 0, 0];

    /// Wrap a sheet using the default colour key.
    pub fn new(sheet: Surface) -> Self {
        Self {
            sheet,
            colorkey: Some(Self::DEFAULT_COLORKEY),
        }
    }

    /// Use a different colour key, or none to rely on the sheet's alpha.
    pub fn with_colorkey(mut self, colorkey: Option<[u8; 3]>) -> Self {
        self.colorkey = colorkey;
        self
    }

    /// Cut one frame out of the sheet.
    pub fn frame(&self, name: &str, rect: Rect) -> Result<Frame, AssetError> {
        let fits = rect.x >= 0
            && rect.y >= 0
            && rect.right() <= self.sheet.width() as i32
            && rect.bottom() <= self.sheet.height() as i32;
        if !fits {
            return Err(AssetError::FrameOutOfBounds {
                name: name.to_string(),
                width: self.sheet.width(),
                height: self.sheet.height(),
            });
        }

        let frame = match self.colorkey {
            Some(key) => self.sheet.subsurface_keyed(rect, key),
            None => {
                let mut frame = Surface::new(rect.width, rect.height);
                frame.blit_area(&self.sheet, rect, 0, 0);
                frame
            }
        };
        Ok(Arc::new(frame))
    }

    /// Cut a named frame.
    pub fn named(&self, atlas: &FrameAtlas, name: &str) -> Result<Frame, AssetError> {
        self.frame(name, atlas.get(name)?)
    }

    /// Cut every `{prefix}_{n}` frame in order.
    pub fn sequence(&self, atlas: &FrameAtlas, prefix: &str) -> Result<Vec<Frame>, AssetError> {
        atlas
            .sequence(prefix)
            .into_iter()
            .map(|name| self.named(atlas, name))
            .collect()
    }

    /// Cut the `idle_*`, `run_*` and `jump_*` sequences for one colour.
    pub fn player_sprites(&self, atlas: &FrameAtlas) -> Result<PlayerSprites, AssetError> {
        Ok(PlayerSprites {
            idle: self.sequence(atlas, "idle")?,
            run: self.sequence(atlas, "run")?,
            jump: self.sequence(atlas, "jump")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(w: u32) -> Frame {
        Arc::new(Surface::filled(w, 4, [9, 9, 9, 255]))
    }

    fn sprites() -> PlayerSprites {
        PlayerSprites {
            idle: vec![frame(1), frame(2)],
            run: vec![frame(3)],
            jump: vec![frame(4), frame(5)],
        }
    }

    #[test]
    fn test_animation_set_valid() {
        let set = sprites().animation_set("green").unwrap();
        assert_eq!(set.idle.len(), 2);
        assert_eq!(set.run.len(), 1);
        assert_eq!(set.jump[1].width(), 5);
    }

    #[test]
    fn test_animation_set_rejects_bad_counts() {
        let mut s = sprites();
        s.run.clear();
        assert!(matches!(
            s.animation_set("green"),
            Err(AssetError::EmptySequence { sequence: "run", .. })
        ));

        let mut s = sprites();
        s.jump.push(frame(6));
        assert!(matches!(
            s.animation_set("green"),
            Err(AssetError::JumpFrameCount { count: 3, .. })
        ));
    }

    #[test]
    fn test_missing_color() {
        let assets = ArenaAssets {
            players: BTreeMap::new(),
            muzzle_flash: frame(1),
            bullet: frame(1),
            platform_tile: frame(1),
        };
        assert!(matches!(assets.animation_for("blue"), Err(AssetError::MissingColor(_))));
    }

    #[test]
    fn test_placeholder_assets_are_complete() {
        let assets = ArenaAssets::placeholder(&[("green", [0, 200, 0, 255])]);
        let set = assets.animation_for("green").unwrap();
        assert_eq!(set.idle.len(), 2);
        assert_eq!(set.run.len(), 4);

        let frame = &set.jump[0];
        assert_eq!(frame.width(), PLACEHOLDER_FRAME_SIZE);
        // Transparent border, opaque feet on the bottom row
        assert_eq!(frame.alpha(0, 0), 0);
        assert_eq!(frame.alpha(24, PLACEHOLDER_FRAME_SIZE - 1), 255);
    }

    #[test]
    fn test_atlas_sequence_order() {
        let json = r#"{"frames": {
            "idle_10": {"x": 0, "y": 0, "width": 2, "height": 2},
            "idle_2": {"x": 2, "y": 0, "width": 2, "height": 2},
            "idle_1": {"x": 4, "y": 0, "width": 2, "height": 2},
            "idler_0": {"x": 0, "y": 0, "width": 1, "height": 1},
            "run_0": {"x": 0, "y": 2, "width": 2, "height": 2}
        }}"#;
        let atlas = FrameAtlas::from_json_str(json).unwrap();
        assert_eq!(atlas.sequence("idle"), vec!["idle_1", "idle_2", "idle_10"]);
        assert_eq!(atlas.sequence("jump"), Vec::<&str>::new());
    }

    #[test]
    fn test_sheet_slicing() {
        let mut sheet = Surface::filled(4, 2, [0, 0, 0, 255]);
        sheet.set_pixel(1, 0, [200, 10, 10, 255]);
        sheet.set_pixel(2, 1, [10, 200, 10, 255]);

        let mut atlas = FrameAtlas::default();
        atlas.frames.insert("idle_0".into(), Rect::new(0, 0, 2, 2));
        atlas.frames.insert("run_0".into(), Rect::new(2, 0, 2, 2));
        atlas.frames.insert("jump_0".into(), Rect::new(0, 0, 1, 1));
        atlas.frames.insert("jump_1".into(), Rect::new(1, 0, 1, 1));

        let sheet = SpriteSheet::new(sheet);
        let sprites = sheet.player_sprites(&atlas).unwrap();

        // Black is keyed out
        assert_eq!(sprites.idle[0].alpha(0, 0), 0);
        assert_eq!(sprites.idle[0].pixel(1, 0), Some([200, 10, 10, 255]));
        assert_eq!(sprites.run[0].pixel(0, 1), Some([10, 200, 10, 255]));
        assert!(sprites.animation_set("green").is_ok());
    }

    #[test]
    fn test_sheet_frame_out_of_bounds() {
        let sheet = SpriteSheet::new(Surface::new(4, 4));
        assert!(matches!(
            sheet.frame("big", Rect::new(2, 2, 4, 4)),
            Err(AssetError::FrameOutOfBounds { .. })
        ));

        let atlas = FrameAtlas::default();
        assert!(matches!(sheet.named(&atlas, "nope"), Err(AssetError::MissingFrame(_))));
    }
}
