//! Voxel storage: colored voxels, dense chunks, and the per-direction plane
//! projections the mesher scans through.

pub mod chunk;
pub mod color;
pub mod direction;
pub mod voxel;

pub use chunk::{Chunk, ChunkError};
pub use color::{Color, ColorParseError};
pub use direction::{Axis, Direction, DirectionError, DirectionPlane};
pub use voxel::Voxel;
