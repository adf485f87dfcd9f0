//! Demo binary that generates a small voxel world, meshes it on the
//! background pipeline, and reports what the greedy mesher produced.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI flags.
//! Run with `cargo run -p warfest-demo -- --chunks 16 --seed 7`.

mod world;

use std::collections::BTreeMap;
use std::error::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use tracing::{error, info, warn};
use warfest_atlas::{ColorAtlas, ColorAtlasBuilder};
use warfest_config::{CliArgs, Config};
use warfest_mesh::{
    BuildStrategy, ChunkId, InstallOutcome, MeshSlot, MeshingPipeline, MeshingResult, MeshingTask,
};
use warfest_voxel::{Chunk, Voxel};

use crate::world::WorldGenerator;

/// A generated chunk together with its installed meshes.
struct DemoChunk {
    chunk: Chunk,
    slot: MeshSlot,
    /// Version whose build failed; not retried until the chunk changes.
    failed_version: Option<u64>,
}

impl DemoChunk {
    fn needs_remesh(&self) -> bool {
        let version = self.chunk.version();
        self.slot.state().needs_remesh(version) && self.failed_version != Some(version)
    }
}

#[derive(Default)]
struct MeshTotals {
    quads: usize,
    vertices: usize,
    triangles: usize,
    faces: usize,
}

fn build_atlas(config: &Config) -> Result<ColorAtlas, Box<dyn Error>> {
    let mut builder = ColorAtlasBuilder::new(config.atlas.size)?;
    builder.add_colors(config.demo.palette_colors()?)?;
    let atlas = builder.build();
    info!(
        colors = atlas.len(),
        size = atlas.size(),
        "Built color atlas"
    );
    Ok(atlas)
}

/// Submits every stale, idle chunk. Returns how many were queued.
fn submit_stale(pipeline: &MeshingPipeline, chunks: &mut BTreeMap<ChunkId, DemoChunk>) -> usize {
    let mut submitted = 0;
    for (id, entry) in chunks.iter_mut() {
        if !entry.needs_remesh() {
            continue;
        }
        if !pipeline.submit(MeshingTask::snapshot(*id, &entry.chunk)) {
            break;
        }
        entry.slot.mark_pending();
        submitted += 1;
    }
    submitted
}

fn install(chunks: &mut BTreeMap<ChunkId, DemoChunk>, result: MeshingResult) {
    let Some(entry) = chunks.get_mut(&result.chunk_id) else {
        warn!(chunk = result.chunk_id.0, "Result for unknown chunk");
        return;
    };
    match entry.slot.install(result.version, result.mesh) {
        Ok(InstallOutcome::Installed) => {
            let render = entry.slot.render();
            info!(
                chunk = result.chunk_id.0,
                version = result.version,
                vertices = render.map_or(0, |r| r.vertex_count()),
                triangles = render.map_or(0, |r| r.triangle_count()),
                "Installed chunk mesh"
            );
        }
        Ok(InstallOutcome::Stale) => {
            info!(chunk = result.chunk_id.0, version = result.version, "Discarded stale mesh");
        }
        Err(e) => {
            entry.failed_version = Some(result.version);
            error!(chunk = result.chunk_id.0, "Meshing failed: {e}");
        }
    }
}

/// Meshes every stale chunk, respecting the pipeline budget.
fn mesh_all(pipeline: &MeshingPipeline, chunks: &mut BTreeMap<ChunkId, DemoChunk>) {
    let start = Instant::now();
    loop {
        let queued = submit_stale(pipeline, chunks);
        if queued > 0 {
            tracing::debug!(queued, "Submitted meshing tasks");
        }

        let results = pipeline.drain_results();
        let drained = results.len();
        for result in results {
            install(chunks, result);
        }

        let waiting = chunks.values().any(DemoChunk::needs_remesh);
        if drained == 0 && pipeline.in_flight_count() == 0 && !waiting {
            break;
        }
        if drained == 0 {
            std::thread::sleep(Duration::from_millis(1));
        }
    }
    info!(elapsed_ms = start.elapsed().as_millis() as u64, "Meshing pass finished");
}

fn report(chunks: &BTreeMap<ChunkId, DemoChunk>) {
    let mut totals = MeshTotals::default();
    for entry in chunks.values() {
        let Some(render) = entry.slot.render() else {
            continue;
        };
        totals.quads += render.vertex_count() / 4;
        totals.vertices += render.vertex_count();
        totals.triangles += render.triangle_count();
        totals.faces += visible_face_count(&entry.chunk);
    }

    let ratio = if totals.quads == 0 {
        0.0
    } else {
        totals.faces as f64 / totals.quads as f64
    };
    info!(
        chunks = chunks.len(),
        quads = totals.quads,
        vertices = totals.vertices,
        triangles = totals.triangles,
        unmerged_faces = totals.faces,
        merge_ratio = ratio,
        "World meshed"
    );
}

/// Number of exposed voxel faces before merging.
fn visible_face_count(chunk: &Chunk) -> usize {
    warfest_voxel::Direction::ALL
        .into_iter()
        .flat_map(|dir| (0..chunk.size_z_on_plane(dir)).map(move |layer| (dir, layer)))
        .map(|(dir, layer)| {
            warfest_mesh::build_face(chunk, dir, layer)
                .iter()
                .map(|rect| rect.area())
                .sum::<usize>()
        })
        .sum()
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = CliArgs::parse();

    // Resolve config directory
    let config_dir = args.config.clone().unwrap_or_else(Config::default_dir);

    // Load or create config, then apply CLI overrides
    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    warfest_log::init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));

    config.validate()?;

    let atlas = Arc::new(build_atlas(&config)?);

    let cores = num_cpus::get().max(1);
    let workers = config.mesher.worker_count.min(cores);
    if workers < config.mesher.worker_count {
        warn!(requested = config.mesher.worker_count, cores, "Capping meshing workers to core count");
    }
    let strategy = if config.mesher.parallel_directions {
        BuildStrategy::ParallelDirections
    } else {
        BuildStrategy::Sequential
    };
    let mut pipeline = MeshingPipeline::with_strategy(
        workers,
        config.mesher.task_budget,
        Arc::clone(&atlas),
        strategy,
    );

    let mut generator = WorldGenerator::new(
        config.demo.seed,
        config.demo.palette_colors()?,
        config.demo.chunk_dimensions(),
    );
    let mut chunks = BTreeMap::new();
    for index in 0..config.demo.chunk_count {
        let chunk = generator.generate(index)?;
        info!(chunk = index, solid = chunk.solid_count(), "Generated chunk");
        chunks.insert(
            ChunkId(u64::from(index)),
            DemoChunk {
                chunk,
                slot: MeshSlot::new(),
                failed_version: None,
            },
        );
    }

    mesh_all(&pipeline, &mut chunks);
    report(&chunks);

    // Dig a shaft through the first chunk and remesh only what changed.
    if let Some(entry) = chunks.get_mut(&ChunkId(0)) {
        let [sx, sy, sz] = entry.chunk.dimensions();
        let (cx, cz) = (sx / 2, sz / 2);
        entry
            .chunk
            .fill_box([cx, 0, cz], [cx, sy - 1, cz], Voxel::AIR)?;
        info!(
            version = entry.chunk.version(),
            stale = entry.slot.state().is_stale(entry.chunk.version()),
            "Edited chunk 0"
        );
        mesh_all(&pipeline, &mut chunks);
        report(&chunks);
    }

    pipeline.shutdown();

    if let Some(path) = &config.atlas.export_path {
        atlas.save_png(path)?;
        info!("Exported atlas to {}", path.display());
    }

    Ok(())
}
