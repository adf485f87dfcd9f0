//! The six face directions and the plane projection each one scans through.
//!
//! Every direction is described by a single [`DirectionPlane`] table entry.
//! The chunk accessor, the rectangle remapper and the quad vertex builder all
//! read from that table, so the six projections cannot drift apart.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A canonical chunk axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Axis {
    X = 0,
    Y = 1,
    Z = 2,
}

impl Axis {
    /// Index into `[x, y, z]` arrays.
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One of the six directions a voxel face can point.
///
/// Canonical axes: east is +X, up is +Y, north is +Z.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    /// +Z.
    North = 0,
    /// -Z.
    South = 1,
    /// -X.
    West = 2,
    /// +X.
    East = 3,
    /// +Y.
    Up = 4,
    /// -Y.
    Down = 5,
}

/// Raised when a raw value does not name one of the six directions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectionError {
    #[error("unknown face direction index {0}")]
    Unknown(u8),
}

/// Projection of the chunk onto the face plane of one direction.
///
/// Local coordinates are `(x, y, layer)`: `x` runs along `u_axis`, `y` along
/// `v_axis` and `layer` along `normal_axis`. Layer 0 is always the outermost
/// slice on the side the face points to, so the neighbor that can hide a
/// face at `layer` sits at `layer - 1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionPlane {
    /// Canonical axis carrying local `x`.
    pub u_axis: Axis,
    /// Canonical axis carrying local `y`.
    pub v_axis: Axis,
    /// Canonical axis carrying `layer`.
    pub normal_axis: Axis,
    /// Local `x` runs against `u_axis`.
    pub mirror_u: bool,
    /// Local `y` runs against `v_axis`.
    pub mirror_v: bool,
    /// `layer` runs against `normal_axis`.
    pub mirror_layer: bool,
    /// Offset of the face from the voxel center along `normal_axis`.
    pub face_offset: f32,
    /// Quad corners in emission order as `(far_u, far_v)`. The order fixes
    /// the winding: `cross(c1 - c0, c2 - c0)` points out of the face.
    pub corners: [(bool, bool); 4],
}

const WINDING_UV: [(bool, bool); 4] = [(false, false), (false, true), (true, true), (true, false)];
const WINDING_MIRRORED_UV: [(bool, bool); 4] =
    [(true, false), (true, true), (false, true), (false, false)];

static PLANES: [DirectionPlane; 6] = [
    // North
    DirectionPlane {
        u_axis: Axis::X,
        v_axis: Axis::Y,
        normal_axis: Axis::Z,
        mirror_u: true,
        mirror_v: false,
        mirror_layer: true,
        face_offset: 0.5,
        corners: WINDING_MIRRORED_UV,
    },
    // South
    DirectionPlane {
        u_axis: Axis::X,
        v_axis: Axis::Y,
        normal_axis: Axis::Z,
        mirror_u: false,
        mirror_v: false,
        mirror_layer: false,
        face_offset: -0.5,
        corners: WINDING_UV,
    },
    // West
    DirectionPlane {
        u_axis: Axis::Z,
        v_axis: Axis::Y,
        normal_axis: Axis::X,
        mirror_u: true,
        mirror_v: false,
        mirror_layer: false,
        face_offset: -0.5,
        corners: WINDING_MIRRORED_UV,
    },
    // East
    DirectionPlane {
        u_axis: Axis::Z,
        v_axis: Axis::Y,
        normal_axis: Axis::X,
        mirror_u: false,
        mirror_v: false,
        mirror_layer: true,
        face_offset: 0.5,
        corners: WINDING_UV,
    },
    // Up
    DirectionPlane {
        u_axis: Axis::X,
        v_axis: Axis::Z,
        normal_axis: Axis::Y,
        mirror_u: false,
        mirror_v: false,
        mirror_layer: true,
        face_offset: 0.5,
        corners: [(false, true), (true, true), (true, false), (false, false)],
    },
    // Down
    DirectionPlane {
        u_axis: Axis::X,
        v_axis: Axis::Z,
        normal_axis: Axis::Y,
        mirror_u: false,
        mirror_v: true,
        mirror_layer: false,
        face_offset: -0.5,
        corners: [(false, false), (true, false), (true, true), (false, true)],
    },
];

impl Direction {
    /// All six directions in meshing order.
    pub const ALL: [Direction; 6] = [
        Self::North,
        Self::South,
        Self::West,
        Self::East,
        Self::Up,
        Self::Down,
    ];

    /// Returns the direction index (0..=5).
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the projection table entry for this direction.
    pub fn plane(self) -> &'static DirectionPlane {
        &PLANES[self as usize]
    }

    /// Outward unit normal in canonical axes.
    pub const fn normal(self) -> [i32; 3] {
        match self {
            Self::North => [0, 0, 1],
            Self::South => [0, 0, -1],
            Self::West => [-1, 0, 0],
            Self::East => [1, 0, 0],
            Self::Up => [0, 1, 0],
            Self::Down => [0, -1, 0],
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }
}

impl TryFrom<u8> for Direction {
    type Error = DirectionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Direction::ALL
            .get(value as usize)
            .copied()
            .ok_or(DirectionError::Unknown(value))
    }
}

impl DirectionPlane {
    /// Chunk extents as seen from this plane: `(size_x, size_y, size_z)`
    /// where `size_z` is the number of layers.
    pub fn extents(&self, dims: [usize; 3]) -> (usize, usize, usize) {
        (
            dims[self.u_axis.index()],
            dims[self.v_axis.index()],
            dims[self.normal_axis.index()],
        )
    }

    /// Maps plane-local `(x, y, layer)` to canonical `[x, y, z]`.
    ///
    /// The mapping is a bijection between the plane's extents and the chunk.
    pub fn to_chunk(&self, x: usize, y: usize, layer: usize, dims: [usize; 3]) -> [usize; 3] {
        let (size_u, size_v, size_n) = self.extents(dims);
        debug_assert!(x < size_u && y < size_v && layer < size_n);

        let mut coords = [0usize; 3];
        coords[self.u_axis.index()] = if self.mirror_u { size_u - 1 - x } else { x };
        coords[self.v_axis.index()] = if self.mirror_v { size_v - 1 - y } else { y };
        coords[self.normal_axis.index()] = if self.mirror_layer {
            size_n - 1 - layer
        } else {
            layer
        };
        coords
    }
}
