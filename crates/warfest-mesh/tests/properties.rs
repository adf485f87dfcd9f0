//! Whole-chunk properties of greedy meshing, checked over seeded random
//! chunks and a few hand-built shapes.

use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use warfest_atlas::{ColorAtlas, ColorAtlasBuilder};
use warfest_mesh::{
    CollisionMesh, MeshSlot, RenderMesh, VoxelRect, build_face, build_mesh, is_face_visible,
};
use warfest_voxel::{Chunk, Color, Direction, Voxel};

const PALETTE: [Color; 3] = [Color::RED, Color::GREEN, Color::BLUE];

fn random_chunk(rng: &mut Xoshiro256StarStar, max_side: usize) -> Chunk {
    let sx = rng.gen_range(1..=max_side);
    let sy = rng.gen_range(1..=max_side);
    let sz = rng.gen_range(1..=max_side);
    let mut chunk = Chunk::new(sx, sy, sz).unwrap();
    for z in 0..sz {
        for y in 0..sy {
            for x in 0..sx {
                if rng.gen_bool(0.6) {
                    let color = PALETTE[rng.gen_range(0..PALETTE.len())];
                    chunk.set(x, y, z, Voxel::solid(color)).unwrap();
                }
            }
        }
    }
    chunk
}

fn palette_atlas() -> ColorAtlas {
    let mut builder = ColorAtlasBuilder::new(4).unwrap();
    builder.add_colors(PALETTE).unwrap();
    builder.build()
}

/// Whether cell `(x, y)` of a layer may be part of a rectangle started on
/// `voxel`, ignoring which rectangle claims it.
fn joinable(chunk: &Chunk, dir: Direction, layer: usize, x: usize, y: usize, voxel: Voxel) -> bool {
    x < chunk.size_x_on_plane(dir)
        && y < chunk.size_y_on_plane(dir)
        && chunk.voxel_at(x, y, layer, dir) == voxel
        && is_face_visible(chunk, x, y, layer, dir)
}

fn every_layer(chunk: &Chunk) -> impl Iterator<Item = (Direction, usize)> + '_ {
    Direction::ALL
        .into_iter()
        .flat_map(move |dir| (0..chunk.size_z_on_plane(dir)).map(move |layer| (dir, layer)))
}

#[test]
fn test_rectangles_partition_visible_faces() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(0x5eed);
    for _ in 0..60 {
        let chunk = random_chunk(&mut rng, 6);
        for (dir, layer) in every_layer(&chunk) {
            let (sx, sy) = (chunk.size_x_on_plane(dir), chunk.size_y_on_plane(dir));
            let mut cover = vec![0u32; sx * sy];
            for rect in build_face(&chunk, dir, layer) {
                assert_eq!(rect.layer, layer);
                for (x, y) in rect.positions() {
                    cover[y * sx + x] += 1;
                }
            }
            for y in 0..sy {
                for x in 0..sx {
                    let visible =
                        chunk.solid_at(x, y, layer, dir) && is_face_visible(&chunk, x, y, layer, dir);
                    let expected = u32::from(visible);
                    assert_eq!(cover[y * sx + x], expected, "{dir:?} layer {layer} at ({x}, {y})");
                }
            }
        }
    }
}

#[test]
fn test_rectangles_are_uniform_and_cannot_grow() {
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    for _ in 0..60 {
        let chunk = random_chunk(&mut rng, 6);
        for (dir, layer) in every_layer(&chunk) {
            let rects = build_face(&chunk, dir, layer);
            for (i, rect) in rects.iter().enumerate() {
                let voxel = chunk.voxel_at(rect.x, rect.y, layer, dir);
                assert!(
                    rect.positions()
                        .all(|(x, y)| joinable(&chunk, dir, layer, x, y, voxel))
                );

                let earlier = &rects[..i];
                let free = |x: usize, y: usize| {
                    joinable(&chunk, dir, layer, x, y, voxel)
                        && !earlier.iter().any(|r| r.contains(x, y))
                };

                let right = rect.x + rect.width;
                let can_widen = (rect.y..rect.y + rect.height).all(|y| free(right, y));
                assert!(!can_widen, "{dir:?} layer {layer}: {rect:?} could be wider");

                let below = rect.y + rect.height;
                let can_heighten = (rect.x..rect.x + rect.width).all(|x| free(x, below));
                assert!(!can_heighten, "{dir:?} layer {layer}: {rect:?} could be taller");
            }
        }
    }
}

#[test]
fn test_mesh_counts_follow_rectangle_count() {
    let atlas = palette_atlas();
    let mut rng = Xoshiro256StarStar::seed_from_u64(7);
    for _ in 0..30 {
        let chunk = random_chunk(&mut rng, 8);
        let rects: usize = every_layer(&chunk)
            .map(|(dir, layer)| build_face(&chunk, dir, layer).len())
            .sum();

        let mesh = build_mesh(&chunk, &atlas).unwrap();
        assert_eq!(mesh.vertices.len(), 4 * rects);
        assert_eq!(mesh.triangles.len(), 6 * rects);
        assert_eq!(mesh.uv.len(), 4 * rects);
        assert!(mesh.validate().is_ok());
    }
}

#[test]
fn test_uniform_chunk_is_one_rect_per_direction() {
    let chunk = Chunk::filled(5, 3, 4, Voxel::solid(Color::GREEN)).unwrap();
    for dir in Direction::ALL {
        let rects = build_face(&chunk, dir, 0);
        assert_eq!(
            rects,
            vec![VoxelRect::new(
                0,
                0,
                0,
                chunk.size_x_on_plane(dir),
                chunk.size_y_on_plane(dir)
            )]
        );
        for layer in 1..chunk.size_z_on_plane(dir) {
            assert!(build_face(&chunk, dir, layer).is_empty());
        }
    }
    assert_eq!(build_mesh(&chunk, &palette_atlas()).unwrap().quad_count(), 6);
}

#[test]
fn test_checkerboard_has_one_rect_per_visible_face() {
    let mut chunk = Chunk::new(4, 4, 4).unwrap();
    for z in 0..4 {
        for y in 0..4 {
            for x in 0..4 {
                if (x + y + z) % 2 == 0 {
                    chunk.set(x, y, z, Voxel::solid(Color::RED)).unwrap();
                }
            }
        }
    }

    let rects: Vec<VoxelRect> = every_layer(&chunk)
        .flat_map(|(dir, layer)| build_face(&chunk, dir, layer))
        .collect();
    assert!(rects.iter().all(|r| r.area() == 1));
    assert_eq!(rects.len(), 6 * chunk.solid_count());
}

#[test]
fn test_interior_voxel_adds_no_faces() {
    let atlas = palette_atlas();
    let shell = Chunk::filled(3, 3, 3, Voxel::solid(Color::RED)).unwrap();
    let mut recolored = shell.clone();
    recolored.set(1, 1, 1, Voxel::solid(Color::BLUE)).unwrap();

    let shell_mesh = build_mesh(&shell, &atlas).unwrap();
    assert_eq!(build_mesh(&recolored, &atlas).unwrap(), shell_mesh);
}

#[test]
fn test_red_slab_down_face() {
    let atlas = palette_atlas();
    let chunk = Chunk::filled(2, 1, 2, Voxel::solid(Color::RED)).unwrap();

    assert_eq!(
        build_face(&chunk, Direction::Down, 0),
        vec![VoxelRect::new(0, 0, 0, 2, 2)]
    );

    let down = warfest_mesh::build_direction(&chunk, Direction::Down, &atlas).unwrap();
    assert_eq!(down.vertices.len(), 4);
    assert_eq!(down.triangles.len(), 6);
    let red = atlas.uv(Color::RED).unwrap();
    assert_eq!(down.uv, vec![red; 4]);
}

#[test]
fn test_render_and_collision_meshes_match() {
    let atlas = palette_atlas();
    let mut rng = Xoshiro256StarStar::seed_from_u64(99);
    for version in 0..10 {
        let chunk = random_chunk(&mut rng, 8);
        let data = build_mesh(&chunk, &atlas).unwrap();

        let render = RenderMesh::from(&data);
        let collision = CollisionMesh::from(&data);
        assert_eq!(render.positions, collision.positions);
        assert_eq!(render.indices, collision.indices);

        let mut slot = MeshSlot::new();
        slot.install(version, Ok(data)).unwrap();
        assert_eq!(slot.render(), Some(&render));
        assert_eq!(slot.collision(), Some(&collision));
    }
}

#[test]
fn test_parallel_build_matches_sequential_on_random_chunks() {
    let atlas = palette_atlas();
    let mut rng = Xoshiro256StarStar::seed_from_u64(1234);
    for _ in 0..10 {
        let chunk = random_chunk(&mut rng, 10);
        assert_eq!(
            warfest_mesh::build_mesh_parallel(&chunk, &atlas).unwrap(),
            build_mesh(&chunk, &atlas).unwrap()
        );
    }
}
