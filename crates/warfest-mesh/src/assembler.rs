//! Quad assembly: turns rectangles into vertices, triangles and UVs.

use glam::Vec3;
use warfest_atlas::UvLookup;
use warfest_voxel::{Chunk, Direction};

use crate::error::MeshError;
use crate::mesh_data::MeshData;
use crate::remap::to_chunk_space;
use crate::voxel_rect::VoxelRect;

/// Corner positions of the quad covering a chunk-space rectangle.
///
/// In-plane edges sit half a voxel outside the first and last covered voxel
/// centers, and the quad is pushed half a voxel along the face normal so it
/// lies on the cubes' outer face. Corner order comes from the direction's
/// plane table and fixes the winding.
pub fn quad_vertices(rect: &VoxelRect, dir: Direction) -> [Vec3; 4] {
    let plane = dir.plane();
    let start_u = rect.x as f32 - 0.5;
    let end_u = (rect.x + rect.width) as f32 - 0.5;
    let start_v = rect.y as f32 - 0.5;
    let end_v = (rect.y + rect.height) as f32 - 0.5;
    let depth = rect.layer as f32 + plane.face_offset;

    plane.corners.map(|(far_u, far_v)| {
        let mut position = [0.0_f32; 3];
        position[plane.u_axis.index()] = if far_u { end_u } else { start_u };
        position[plane.v_axis.index()] = if far_v { end_v } else { start_v };
        position[plane.normal_axis.index()] = depth;
        Vec3::from_array(position)
    })
}

/// Appends the quad for a plane-local rectangle to `mesh`.
///
/// The UV comes from the color of the rectangle's originating cell. When the
/// atlas has no entry for that color nothing is appended and the build must
/// stop.
pub fn emit(
    rect: &VoxelRect,
    dir: Direction,
    chunk: &Chunk,
    atlas: &impl UvLookup,
    mesh: &mut MeshData,
) -> Result<(), MeshError> {
    let color = chunk.voxel_at(rect.x, rect.y, rect.layer, dir).color();
    let uv = atlas
        .uv_for(color)
        .ok_or(MeshError::UnregisteredColor {
            color,
            direction: dir,
            x: rect.x,
            y: rect.y,
            layer: rect.layer,
        })?;

    let chunk_rect = to_chunk_space(rect, dir, chunk);
    mesh.push_quad(quad_vertices(&chunk_rect, dir), uv);
    Ok(())
}
