//! Greedy rectangle building: merges coplanar, same-colored visible faces of
//! one layer into rectangles.
//!
//! The builder is first-fit. Starting from the next cell the scanner finds,
//! it takes the longest run along local x, then as many following rows as
//! match that run completely. It never backtracks, so the decomposition is
//! fully determined by the raster scan order.

use warfest_voxel::{Chunk, Direction, Voxel};

use crate::scanner::{UsedPositions, is_face_visible, next_visible_unused_position};
use crate::voxel_rect::VoxelRect;

/// A cell can join a rectangle started on `voxel` when it is unmerged,
/// holds the same voxel, and its face is visible.
fn joins_rect(
    chunk: &Chunk,
    used: &UsedPositions,
    x: usize,
    y: usize,
    layer: usize,
    dir: Direction,
    voxel: Voxel,
) -> bool {
    !used.contains(x, y)
        && chunk.voxel_at(x, y, layer, dir) == voxel
        && is_face_visible(chunk, x, y, layer, dir)
}

/// Length of the run of matching cells along local x starting at `pos`.
///
/// Always at least 1: the start cell itself.
pub fn line_size(
    chunk: &Chunk,
    used: &UsedPositions,
    pos: (usize, usize),
    layer: usize,
    dir: Direction,
    voxel: Voxel,
) -> usize {
    let size_x = chunk.size_x_on_plane(dir);
    let (x0, y) = pos;

    let mut count = 1;
    while x0 + count < size_x && joins_rect(chunk, used, x0 + count, y, layer, dir, voxel) {
        count += 1;
    }
    count
}

/// Number of consecutive rows, starting with the row of `pos`, whose cells
/// `[pos.0, pos.0 + width)` all match.
///
/// A partially matching row ends the rectangle. Always at least 1.
pub fn compatible_lines(
    chunk: &Chunk,
    used: &UsedPositions,
    pos: (usize, usize),
    width: usize,
    layer: usize,
    dir: Direction,
    voxel: Voxel,
) -> usize {
    let size_y = chunk.size_y_on_plane(dir);
    let (x0, y0) = pos;

    let mut count = 1;
    while y0 + count < size_y {
        let y = y0 + count;
        let row_matches = (x0..x0 + width).all(|x| joins_rect(chunk, used, x, y, layer, dir, voxel));
        if !row_matches {
            break;
        }
        count += 1;
    }
    count
}

/// Grows the rectangle starting at `pos` and marks its footprint as used.
///
/// `pos` must hold an unused solid voxel with a visible face.
pub fn grow_rect(
    chunk: &Chunk,
    used: &mut UsedPositions,
    pos: (usize, usize),
    layer: usize,
    dir: Direction,
) -> VoxelRect {
    let voxel = chunk.voxel_at(pos.0, pos.1, layer, dir);
    debug_assert!(voxel.is_solid());

    let width = line_size(chunk, used, pos, layer, dir, voxel);
    let height = compatible_lines(chunk, used, pos, width, layer, dir, voxel);

    let rect = VoxelRect::new(pos.0, pos.1, layer, width, height);
    used.mark_rect(&rect);
    rect
}

/// Decomposes one layer of one direction into rectangles, appending them to
/// `out` in discovery order. `used` must be sized for the plane and empty.
pub(crate) fn scan_layer(
    chunk: &Chunk,
    dir: Direction,
    layer: usize,
    used: &mut UsedPositions,
    out: &mut Vec<VoxelRect>,
) {
    let mut pos = (0, 0);
    while let Some(next) = next_visible_unused_position(used, pos, layer, chunk, dir) {
        out.push(grow_rect(chunk, used, next, layer, dir));
        pos = next;
    }
}

/// Decomposes one layer of one direction into rectangles, in plane-local
/// coordinates and raster discovery order.
pub fn build_face(chunk: &Chunk, dir: Direction, layer: usize) -> Vec<VoxelRect> {
    let mut used = UsedPositions::for_plane(chunk, dir);
    let mut rects = Vec::new();
    scan_layer(chunk, dir, layer, &mut used, &mut rects);
    rects
}
