//! Mesh build error types.

use warfest_voxel::{Color, Direction};

/// Errors that abort a chunk mesh build.
///
/// None of these are transient: each one points at a broken precondition
/// upstream, so a failed build is reported and never retried.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MeshError {
    /// A face color has no atlas entry. Every color in a chunk must be
    /// registered before the chunk is meshed.
    #[error("color {color} at ({x}, {y}) layer {layer} facing {direction:?} is not in the atlas")]
    UnregisteredColor {
        color: Color,
        direction: Direction,
        x: usize,
        y: usize,
        layer: usize,
    },

    /// A mesh buffer breaks its length or index invariants.
    #[error("corrupt mesh data: {0}")]
    Corrupt(String),
}
