//! The lookup contract between the mesher and whatever owns the atlas.

use std::collections::HashMap;
use std::hash::BuildHasher;
use std::sync::Arc;

use glam::Vec2;
use warfest_voxel::Color;

/// Read-only color → UV mapping.
///
/// Implementations must be pure: the same color always yields the same UV,
/// and lookups never mutate shared state, so one instance can serve many
/// concurrent mesh builds. `None` means the color was never registered.
pub trait UvLookup {
    fn uv_for(&self, color: Color) -> Option<Vec2>;
}

impl<S: BuildHasher> UvLookup for HashMap<Color, Vec2, S> {
    fn uv_for(&self, color: Color) -> Option<Vec2> {
        self.get(&color).copied()
    }
}

impl<T: UvLookup + ?Sized> UvLookup for &T {
    fn uv_for(&self, color: Color) -> Option<Vec2> {
        (**self).uv_for(color)
    }
}

impl<T: UvLookup + ?Sized> UvLookup for Arc<T> {
    fn uv_for(&self, color: Color) -> Option<Vec2> {
        (**self).uv_for(color)
    }
}
