//! The voxel cell value.

use serde::{Deserialize, Serialize};

use crate::color::Color;

/// A single grid cell: air, or a solid cube of one color.
///
/// Equality compares solidity and color, so two solid voxels are
/// mergeable exactly when they compare equal.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Voxel {
    color: Color,
    solid: bool,
}

impl Voxel {
    /// Empty space. Its color is never looked at.
    pub const AIR: Voxel = Voxel {
        color: Color::rgba(0, 0, 0, 0),
        solid: false,
    };

    /// A solid voxel of the given color.
    pub const fn solid(color: Color) -> Self {
        Self { color, solid: true }
    }

    pub const fn color(self) -> Color {
        self.color
    }

    pub const fn is_solid(self) -> bool {
        self.solid
    }

    pub const fn is_air(self) -> bool {
        !self.solid
    }
}

impl From<Color> for Voxel {
    fn from(color: Color) -> Self {
        Voxel::solid(color)
    }
}
