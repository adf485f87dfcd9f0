//! Plane remapping: moves rectangles from plane-local to canonical chunk axes.

use warfest_voxel::{Chunk, Direction};

use crate::voxel_rect::VoxelRect;

/// Re-expresses a plane-local rectangle in the chunk's canonical axes.
///
/// The result's `x`/`y` run along the plane's `u_axis`/`v_axis` and `layer`
/// is the coordinate along `normal_axis`, each counted from the canonical
/// origin. A mirrored local axis flips the rectangle's start to the opposite
/// edge of the chunk. South has no mirrored axis and maps to itself.
pub fn to_chunk_space(rect: &VoxelRect, dir: Direction, chunk: &Chunk) -> VoxelRect {
    let plane = dir.plane();
    let (size_x, size_y, size_z) = plane.extents(chunk.dimensions());

    VoxelRect {
        x: if plane.mirror_u {
            size_x - rect.x - rect.width
        } else {
            rect.x
        },
        y: if plane.mirror_v {
            size_y - rect.y - rect.height
        } else {
            rect.y
        },
        layer: if plane.mirror_layer {
            size_z - rect.layer - 1
        } else {
            rect.layer
        },
        width: rect.width,
        height: rect.height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk() -> Chunk {
        // Plane extents: south/north (4, 5, 6), west/east (6, 5, 4),
        // up/down (4, 6, 5).
        Chunk::new(4, 5, 6).unwrap()
    }

    #[test]
    fn test_south_is_identity() {
        let rect = VoxelRect::new(1, 2, 3, 2, 1);
        assert_eq!(to_chunk_space(&rect, Direction::South, &chunk()), rect);
    }

    #[test]
    fn test_north_mirrors_x_and_layer() {
        let rect = VoxelRect::new(1, 2, 0, 2, 1);
        assert_eq!(
            to_chunk_space(&rect, Direction::North, &chunk()),
            VoxelRect::new(1, 2, 5, 2, 1)
        );
    }

    #[test]
    fn test_west_mirrors_x() {
        let rect = VoxelRect::new(0, 1, 2, 3, 2);
        assert_eq!(
            to_chunk_space(&rect, Direction::West, &chunk()),
            VoxelRect::new(3, 1, 2, 3, 2)
        );
    }

    #[test]
    fn test_east_mirrors_layer() {
        let rect = VoxelRect::new(0, 1, 0, 3, 2);
        assert_eq!(
            to_chunk_space(&rect, Direction::East, &chunk()),
            VoxelRect::new(0, 1, 3, 3, 2)
        );
    }

    #[test]
    fn test_up_mirrors_layer() {
        let rect = VoxelRect::new(1, 1, 1, 1, 1);
        assert_eq!(
            to_chunk_space(&rect, Direction::Up, &chunk()),
            VoxelRect::new(1, 1, 3, 1, 1)
        );
    }

    #[test]
    fn test_down_mirrors_y() {
        let rect = VoxelRect::new(1, 0, 2, 2, 4);
        assert_eq!(
            to_chunk_space(&rect, Direction::Down, &chunk()),
            VoxelRect::new(1, 2, 2, 2, 4)
        );
    }

    #[test]
    fn test_remapped_cells_match_plane_projection() {
        // Every cell of a remapped rectangle must be the same canonical cell
        // the plane accessor reaches for the original rectangle.
        let chunk = chunk();
        let dims = chunk.dimensions();
        for dir in Direction::ALL {
            let plane = dir.plane();
            let rect = VoxelRect::new(1, 1, 1, 2, 3);
            let remapped = to_chunk_space(&rect, dir, &chunk);

            let mut expected: Vec<[usize; 3]> = rect
                .positions()
                .map(|(x, y)| plane.to_chunk(x, y, rect.layer, dims))
                .collect();
            let mut actual: Vec<[usize; 3]> = remapped
                .positions()
                .map(|(u, v)| {
                    let mut c = [0; 3];
                    c[plane.u_axis.index()] = u;
                    c[plane.v_axis.index()] = v;
                    c[plane.normal_axis.index()] = remapped.layer;
                    c
                })
                .collect();
            expected.sort();
            actual.sort();
            assert_eq!(actual, expected, "{dir:?}");
        }
    }
}
