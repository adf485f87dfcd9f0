//! Color atlas: one texel per voxel color in a shared texture, plus the UV
//! lookup contract the mesher consumes.

mod atlas;
mod lookup;

pub use atlas::{AtlasError, ColorAtlas, ColorAtlasBuilder, UV_INSET};
pub use lookup::UvLookup;
