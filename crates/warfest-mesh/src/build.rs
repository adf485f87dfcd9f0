//! Chunk mesh builds: runs scan, merge, remap and assembly over every layer
//! of every direction.

use warfest_atlas::UvLookup;
use warfest_voxel::{Chunk, Direction};

use crate::assembler::emit;
use crate::error::MeshError;
use crate::greedy::scan_layer;
use crate::mesh_data::MeshData;
use crate::scanner::UsedPositions;
use crate::voxel_rect::VoxelRect;

/// Meshes every layer of one direction into `mesh`.
fn build_direction_into(
    chunk: &Chunk,
    dir: Direction,
    atlas: &impl UvLookup,
    mesh: &mut MeshData,
) -> Result<(), MeshError> {
    let mut used = UsedPositions::for_plane(chunk, dir);
    let mut rects: Vec<VoxelRect> = Vec::new();

    for layer in 0..chunk.size_z_on_plane(dir) {
        used.clear();
        rects.clear();
        scan_layer(chunk, dir, layer, &mut used, &mut rects);
        for rect in &rects {
            emit(rect, dir, chunk, atlas, mesh)?;
        }
    }
    Ok(())
}

/// Builds the faces of one direction.
pub fn build_direction(
    chunk: &Chunk,
    dir: Direction,
    atlas: &impl UvLookup,
) -> Result<MeshData, MeshError> {
    let mut mesh = MeshData::new();
    build_direction_into(chunk, dir, atlas, &mut mesh)?;
    Ok(mesh)
}

/// Builds the full mesh of a chunk.
///
/// Directions are processed in [`Direction::ALL`] order and layers from the
/// outside in, so the vertex order is deterministic. The first color missing
/// from `atlas` aborts the build.
pub fn build_mesh(chunk: &Chunk, atlas: &impl UvLookup) -> Result<MeshData, MeshError> {
    let mut mesh = MeshData::new();
    for dir in Direction::ALL {
        build_direction_into(chunk, dir, atlas, &mut mesh)?;
    }

    tracing::debug!(
        quads = mesh.quad_count(),
        vertices = mesh.vertices.len(),
        solid = chunk.solid_count(),
        "chunk meshed"
    );
    Ok(mesh)
}

/// Same output as [`build_mesh`], with the six directions built on scoped
/// threads.
///
/// Each direction only reads the chunk and the atlas, so no locking is
/// needed. Partial meshes are appended in [`Direction::ALL`] order.
pub fn build_mesh_parallel<A>(chunk: &Chunk, atlas: &A) -> Result<MeshData, MeshError>
where
    A: UvLookup + Sync,
{
    let parts = std::thread::scope(|scope| {
        let handles = Direction::ALL.map(|dir| scope.spawn(move || build_direction(chunk, dir, atlas)));
        handles.map(|handle| {
            handle
                .join()
                .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
        })
    });

    let mut mesh = MeshData::new();
    for part in parts {
        mesh.append(part?);
    }

    tracing::debug!(
        quads = mesh.quad_count(),
        vertices = mesh.vertices.len(),
        "chunk meshed in parallel"
    );
    Ok(mesh)
}
