//! Color atlas: assigns every distinct voxel color one texel of a square
//! texture and answers UV lookups for the mesher.
//!
//! Colors are placed row-major in registration order: the i-th color lands on
//! texel `(i % size, i / size)`. The built [`ColorAtlas`] is immutable and is
//! shared between mesh builds behind an `Arc`.

use std::path::Path;

use glam::{UVec2, Vec2};
use rustc_hash::FxHashMap;
use thiserror::Error;
use warfest_voxel::{Chunk, Color};

use crate::lookup::UvLookup;

/// Inset, in texels, applied to the corners returned by
/// [`ColorAtlas::uv_quad`] so bilinear filtering never reaches a neighbor.
pub const UV_INSET: f32 = 0.2;

// ---------------------------------------------------------------------------
// AtlasError
// ---------------------------------------------------------------------------

/// Errors returned during atlas construction and export.
#[derive(Debug, Error)]
pub enum AtlasError {
    /// Every texel already holds a color.
    #[error("atlas is full (max {max} colors)")]
    AtlasFull {
        /// Maximum number of colors the atlas can hold.
        max: u32,
    },

    /// The atlas side length must be at least one texel.
    #[error("invalid atlas size {0}")]
    InvalidSize(u32),

    /// Failed to encode or write the atlas image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

// ---------------------------------------------------------------------------
// ColorAtlasBuilder
// ---------------------------------------------------------------------------

/// Accumulates colors before the atlas is frozen.
pub struct ColorAtlasBuilder {
    size: u32,
    /// Maps color → slot index.
    slots: FxHashMap<Color, u32>,
    /// Colors in slot order.
    colors: Vec<Color>,
}

impl ColorAtlasBuilder {
    /// Creates a builder for a `size × size` texel atlas.
    pub fn new(size: u32) -> Result<Self, AtlasError> {
        if size == 0 || size.checked_mul(size).is_none() {
            return Err(AtlasError::InvalidSize(size));
        }
        Ok(Self {
            size,
            slots: FxHashMap::default(),
            colors: Vec::new(),
        })
    }

    /// Maximum number of colors this atlas can hold.
    pub fn capacity(&self) -> u32 {
        self.size * self.size
    }

    /// Registers `color` in the next free slot and returns the slot index.
    ///
    /// Registering a color twice returns the existing index.
    pub fn add_color(&mut self, color: Color) -> Result<u32, AtlasError> {
        if let Some(&slot) = self.slots.get(&color) {
            return Ok(slot);
        }
        let slot = self.colors.len() as u32;
        if slot >= self.capacity() {
            return Err(AtlasError::AtlasFull {
                max: self.capacity(),
            });
        }

        self.slots.insert(color, slot);
        self.colors.push(color);
        Ok(slot)
    }

    /// Registers every color yielded by `colors`.
    pub fn add_colors<I>(&mut self, colors: I) -> Result<(), AtlasError>
    where
        I: IntoIterator<Item = Color>,
    {
        for color in colors {
            self.add_color(color)?;
        }
        Ok(())
    }

    /// Registers the color of every solid voxel in `chunk`.
    pub fn add_chunk_colors(&mut self, chunk: &Chunk) -> Result<(), AtlasError> {
        self.add_colors(chunk.solid_colors())
    }

    /// Number of registered colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Freezes the atlas.
    pub fn build(self) -> ColorAtlas {
        tracing::debug!(
            size = self.size,
            colors = self.colors.len(),
            "color atlas built"
        );
        ColorAtlas {
            size: self.size,
            slots: self.slots,
            colors: self.colors,
        }
    }
}

// ---------------------------------------------------------------------------
// ColorAtlas
// ---------------------------------------------------------------------------

/// Immutable color → texel mapping.
#[derive(Clone, Debug)]
pub struct ColorAtlas {
    size: u32,
    slots: FxHashMap<Color, u32>,
    colors: Vec<Color>,
}

impl ColorAtlas {
    /// Side length in texels.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Number of registered colors.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: Color) -> bool {
        self.slots.contains_key(&color)
    }

    /// Registered colors in slot order.
    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    /// Texel holding `color`, with `y = 0` on the bottom row.
    pub fn texel(&self, color: Color) -> Option<UVec2> {
        self.slots
            .get(&color)
            .map(|&slot| UVec2::new(slot % self.size, slot / self.size))
    }

    /// UV of the center of the texel holding `color`.
    pub fn uv(&self, color: Color) -> Option<Vec2> {
        let texel = self.texel(color)?;
        Some((texel.as_vec2() + Vec2::splat(0.5)) / self.size as f32)
    }

    /// The four inset corner UVs of the texel holding `color`, ordered
    /// (min, min), (min, max), (max, max), (max, min).
    pub fn uv_quad(&self, color: Color) -> Option<[Vec2; 4]> {
        let texel = self.texel(color)?.as_vec2();
        let size = self.size as f32;
        let lo = (texel + Vec2::splat(UV_INSET)) / size;
        let hi = (texel + Vec2::splat(1.0 - UV_INSET)) / size;
        Some([
            Vec2::new(lo.x, lo.y),
            Vec2::new(lo.x, hi.y),
            Vec2::new(hi.x, hi.y),
            Vec2::new(hi.x, lo.y),
        ])
    }

    /// Renders the atlas texture, one pixel per color. Unused texels are
    /// transparent black. Image rows are flipped so texel row 0 is the
    /// bottom row of the image, matching the UV origin.
    pub fn image(&self) -> image::RgbaImage {
        let mut img = image::RgbaImage::new(self.size, self.size);
        for (slot, color) in self.colors.iter().enumerate() {
            let slot = slot as u32;
            let (x, y) = (slot % self.size, slot / self.size);
            img.put_pixel(x, self.size - 1 - y, image::Rgba(color.to_array()));
        }
        img
    }

    /// Writes the atlas texture as a PNG file.
    pub fn save_png(&self, path: &Path) -> Result<(), AtlasError> {
        self.image()
            .save_with_format(path, image::ImageFormat::Png)?;
        tracing::info!("Atlas texture saved to {}", path.display());
        Ok(())
    }
}

impl UvLookup for ColorAtlas {
    fn uv_for(&self, color: Color) -> Option<Vec2> {
        self.uv(color)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
