//! Dense voxel chunk with per-direction plane accessors.
//!
//! Voxels are stored in a flat array with x varying fastest. The mesher never
//! addresses the grid in canonical coordinates directly; it goes through
//! [`Chunk::voxel_at`], which projects plane-local `(x, y, layer)` coordinates
//! through the [`DirectionPlane`](crate::DirectionPlane) table.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::Color;
use crate::direction::Direction;
use crate::voxel::Voxel;

/// Upper bound on the number of cells a single chunk may hold.
pub const MAX_CHUNK_VOLUME: usize = 1 << 24;

/// Errors raised by chunk construction and edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChunkError {
    /// A dimension is zero or the volume exceeds [`MAX_CHUNK_VOLUME`].
    #[error("invalid chunk dimensions {0:?}")]
    InvalidDimensions([usize; 3]),
    /// A coordinate lies outside the chunk.
    #[error("voxel ({x}, {y}, {z}) is outside chunk of size {size:?}")]
    OutOfBounds {
        x: usize,
        y: usize,
        z: usize,
        size: [usize; 3],
    },
}

/// A fixed-size 3D block of voxels, the unit of mesh (re)generation.
///
/// Deserialization goes through [`ChunkRepr`] so a `size` that disagrees
/// with the stored voxels is rejected instead of producing a chunk that
/// indexes out of range.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ChunkRepr")]
pub struct Chunk {
    /// Extents along X, Y and Z.
    size: [usize; 3],
    /// Dense voxel storage, `x + y * sx + z * sx * sy`.
    voxels: Vec<Voxel>,
    /// Monotonically increasing version counter, incremented on each mutation.
    version: u64,
}

/// Unchecked serialized form of a [`Chunk`].
#[derive(Deserialize)]
struct ChunkRepr {
    size: [usize; 3],
    voxels: Vec<Voxel>,
    #[serde(default)]
    version: u64,
}

impl TryFrom<ChunkRepr> for Chunk {
    type Error = ChunkError;

    fn try_from(repr: ChunkRepr) -> Result<Self, Self::Error> {
        let volume = checked_volume(repr.size)?;
        if volume != repr.voxels.len() {
            return Err(ChunkError::InvalidDimensions(repr.size));
        }
        Ok(Self {
            size: repr.size,
            voxels: repr.voxels,
            version: repr.version,
        })
    }
}

/// Cell count for `size`, rejecting zero and oversize volumes.
fn checked_volume(size: [usize; 3]) -> Result<usize, ChunkError> {
    size[0]
        .checked_mul(size[1])
        .and_then(|v| v.checked_mul(size[2]))
        .filter(|&v| v > 0 && v <= MAX_CHUNK_VOLUME)
        .ok_or(ChunkError::InvalidDimensions(size))
}

impl Chunk {
    /// Creates a chunk of the given size filled with air.
    pub fn new(size_x: usize, size_y: usize, size_z: usize) -> Result<Self, ChunkError> {
        Self::filled(size_x, size_y, size_z, Voxel::AIR)
    }

    /// Creates a chunk of the given size filled with `voxel`.
    pub fn filled(
        size_x: usize,
        size_y: usize,
        size_z: usize,
        voxel: Voxel,
    ) -> Result<Self, ChunkError> {
        let size = [size_x, size_y, size_z];
        let volume = checked_volume(size)?;

        Ok(Self {
            size,
            voxels: vec![voxel; volume],
            version: 0,
        })
    }

    /// Returns `[size_x, size_y, size_z]`.
    pub fn dimensions(&self) -> [usize; 3] {
        self.size
    }

    pub fn size_x(&self) -> usize {
        self.size[0]
    }

    pub fn size_y(&self) -> usize {
        self.size[1]
    }

    pub fn size_z(&self) -> usize {
        self.size[2]
    }

    /// Total number of cells.
    pub fn volume(&self) -> usize {
        self.voxels.len()
    }

    /// Returns `true` if `(x, y, z)` lies inside the chunk.
    pub fn in_bounds(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.size[0] && y < self.size[1] && z < self.size[2]
    }

    /// Returns the voxel at canonical `(x, y, z)`.
    ///
    /// Out-of-bounds reads return [`Voxel::AIR`] with a warning log.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Voxel {
        if !self.in_bounds(x, y, z) {
            tracing::warn!("Chunk::get out of bounds: ({}, {}, {})", x, y, z);
            return Voxel::AIR;
        }
        self.voxels[self.linear_index(x, y, z)]
    }

    /// Sets the voxel at canonical `(x, y, z)`.
    pub fn set(&mut self, x: usize, y: usize, z: usize, voxel: Voxel) -> Result<(), ChunkError> {
        if !self.in_bounds(x, y, z) {
            return Err(ChunkError::OutOfBounds {
                x,
                y,
                z,
                size: self.size,
            });
        }
        let index = self.linear_index(x, y, z);
        self.voxels[index] = voxel;
        self.version += 1;
        Ok(())
    }

    /// Fills every voxel in the chunk.
    pub fn fill(&mut self, voxel: Voxel) {
        self.voxels.fill(voxel);
        self.version += 1;
    }

    /// Fills the inclusive box `min..=max`.
    ///
    /// A box with `min > max` on any axis is empty: nothing is written and
    /// the version is left unchanged.
    pub fn fill_box(
        &mut self,
        min: [usize; 3],
        max: [usize; 3],
        voxel: Voxel,
    ) -> Result<(), ChunkError> {
        if (0..3).any(|axis| min[axis] > max[axis]) {
            return Ok(());
        }
        if !self.in_bounds(max[0], max[1], max[2]) {
            return Err(ChunkError::OutOfBounds {
                x: max[0],
                y: max[1],
                z: max[2],
                size: self.size,
            });
        }
        for z in min[2]..=max[2] {
            for y in min[1]..=max[1] {
                for x in min[0]..=max[0] {
                    let index = self.linear_index(x, y, z);
                    self.voxels[index] = voxel;
                }
            }
        }
        self.version += 1;
        Ok(())
    }

    /// Returns the current version counter.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of solid voxels.
    pub fn solid_count(&self) -> usize {
        self.voxels.iter().filter(|v| v.is_solid()).count()
    }

    /// Distinct colors of solid voxels, in storage order of first appearance.
    pub fn solid_colors(&self) -> Vec<Color> {
        let mut colors: Vec<Color> = Vec::new();
        for voxel in self.voxels.iter().filter(|v| v.is_solid()) {
            if !colors.contains(&voxel.color()) {
                colors.push(voxel.color());
            }
        }
        colors
    }

    // -- Plane projection -------------------------------------------------

    /// Extent of plane-local `x` for `dir`.
    pub fn size_x_on_plane(&self, dir: Direction) -> usize {
        dir.plane().extents(self.size).0
    }

    /// Extent of plane-local `y` for `dir`.
    pub fn size_y_on_plane(&self, dir: Direction) -> usize {
        dir.plane().extents(self.size).1
    }

    /// Number of layers for `dir`.
    pub fn size_z_on_plane(&self, dir: Direction) -> usize {
        dir.plane().extents(self.size).2
    }

    /// Returns the voxel at plane-local `(x, y, layer)` for `dir`.
    ///
    /// Coordinates must lie inside the plane extents.
    pub fn voxel_at(&self, x: usize, y: usize, layer: usize, dir: Direction) -> Voxel {
        let [cx, cy, cz] = dir.plane().to_chunk(x, y, layer, self.size);
        self.voxels[self.linear_index(cx, cy, cz)]
    }

    /// Shorthand for `voxel_at(..).is_solid()`.
    pub fn solid_at(&self, x: usize, y: usize, layer: usize, dir: Direction) -> bool {
        self.voxel_at(x, y, layer, dir).is_solid()
    }

    fn linear_index(&self, x: usize, y: usize, z: usize) -> usize {
        debug_assert!(self.in_bounds(x, y, z));
        x + y * self.size[0] + z * self.size[0] * self.size[1]
    }
}
