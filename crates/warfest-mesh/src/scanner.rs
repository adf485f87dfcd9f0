//! Face scanning: finds the next visible, unmerged solid face on a layer.

use warfest_voxel::{Chunk, Direction};

use crate::voxel_rect::VoxelRect;

/// Plane positions already merged into a rectangle on the current layer.
///
/// Dense bitmap over the plane's `size_x × size_y` extent, cleared between
/// layers.
#[derive(Clone, Debug)]
pub struct UsedPositions {
    width: usize,
    height: usize,
    used: Vec<bool>,
}

impl UsedPositions {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            used: vec![false; width * height],
        }
    }

    /// Sized for the plane of `dir` on `chunk`.
    pub fn for_plane(chunk: &Chunk, dir: Direction) -> Self {
        Self::new(chunk.size_x_on_plane(dir), chunk.size_y_on_plane(dir))
    }

    pub fn contains(&self, x: usize, y: usize) -> bool {
        debug_assert!(x < self.width && y < self.height);
        self.used[y * self.width + x]
    }

    /// Marks every position of `rect`'s footprint.
    pub fn mark_rect(&mut self, rect: &VoxelRect) {
        for y in rect.y..rect.y + rect.height {
            let row = y * self.width;
            self.used[row + rect.x..row + rect.x + rect.width].fill(true);
        }
    }

    /// Number of marked positions.
    pub fn count(&self) -> usize {
        self.used.iter().filter(|&&u| u).count()
    }

    pub fn clear(&mut self) {
        self.used.fill(false);
    }
}

/// Returns `true` if the face at plane position `(x, y, layer)` is exposed.
///
/// Layer 0 sits on the chunk boundary and is always exposed. Deeper faces are
/// exposed only when the cell one layer further out is air.
pub fn is_face_visible(chunk: &Chunk, x: usize, y: usize, layer: usize, dir: Direction) -> bool {
    layer == 0 || !chunk.solid_at(x, y, layer - 1, dir)
}

/// Scans the layer in raster order for the first unused solid cell with a
/// visible face.
///
/// Rows run from `start.1`; the first row starts at column `start.0`, later
/// rows at column 0. Returns `None` once the layer is exhausted.
pub fn next_visible_unused_position(
    used: &UsedPositions,
    start: (usize, usize),
    layer: usize,
    chunk: &Chunk,
    dir: Direction,
) -> Option<(usize, usize)> {
    let size_x = chunk.size_x_on_plane(dir);
    let size_y = chunk.size_y_on_plane(dir);
    let mut first_column = start.0;

    for y in start.1..size_y {
        for x in first_column..size_x {
            if !used.contains(x, y)
                && chunk.solid_at(x, y, layer, dir)
                && is_face_visible(chunk, x, y, layer, dir)
            {
                return Some((x, y));
            }
        }
        first_column = 0;
    }

    None
}
