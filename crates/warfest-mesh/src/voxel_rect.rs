//! Rectangles of merged voxel faces.

/// An axis-aligned rectangle of merged faces on one layer of a plane.
///
/// Produced in plane-local coordinates by the greedy builder, then remapped
/// to canonical chunk axes before quad assembly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VoxelRect {
    pub x: usize,
    pub y: usize,
    pub layer: usize,
    pub width: usize,
    pub height: usize,
}

impl VoxelRect {
    pub fn new(x: usize, y: usize, layer: usize, width: usize, height: usize) -> Self {
        Self {
            x,
            y,
            layer,
            width,
            height,
        }
    }

    /// Number of voxel faces covered.
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Returns `true` if `(x, y)` lies inside the footprint.
    pub fn contains(&self, x: usize, y: usize) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }

    /// Iterates every `(x, y)` of the footprint, row by row.
    pub fn positions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}
