//! Background meshing pipeline: chunk snapshots go to a pool of worker
//! threads over channels, finished meshes come back without blocking the
//! caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use warfest_atlas::UvLookup;
use warfest_voxel::Chunk;

use crate::build::{build_mesh, build_mesh_parallel};
use crate::error::MeshError;
use crate::mesh_data::MeshData;

/// Caller-chosen identifier used to match results to chunks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChunkId(pub u64);

/// A self-contained meshing job.
///
/// The chunk is an immutable snapshot, so workers never touch live world
/// data.
#[derive(Clone, Debug)]
pub struct MeshingTask {
    pub chunk_id: ChunkId,
    pub chunk: Arc<Chunk>,
    /// Chunk version at snapshot time.
    pub version: u64,
}

impl MeshingTask {
    /// Snapshots `chunk` at its current version.
    pub fn snapshot(chunk_id: ChunkId, chunk: &Chunk) -> Self {
        Self {
            chunk_id,
            version: chunk.version(),
            chunk: Arc::new(chunk.clone()),
        }
    }
}

/// Outcome of one [`MeshingTask`].
#[derive(Debug)]
pub struct MeshingResult {
    pub chunk_id: ChunkId,
    pub version: u64,
    pub mesh: Result<MeshData, MeshError>,
}

/// How a worker builds one chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BuildStrategy {
    /// [`build_mesh`] on the worker thread.
    #[default]
    Sequential,
    /// [`build_mesh_parallel`]: the worker fans the six directions out to
    /// scoped threads.
    ParallelDirections,
}

/// Meshing pipeline backed by a fixed pool of worker threads.
///
/// Callers create [`MeshingTask`]s, [`submit`](Self::submit) them, and
/// collect [`MeshingResult`]s with [`drain_results`](Self::drain_results).
/// The atlas is shared read-only by all workers.
pub struct MeshingPipeline {
    /// Sends tasks to the worker pool. `None` once the pipeline is shut down.
    task_sender: Option<crossbeam_channel::Sender<MeshingTask>>,
    /// Receives completed meshes from workers.
    result_receiver: crossbeam_channel::Receiver<MeshingResult>,
    /// Worker thread handles, joined on shutdown.
    worker_handles: Vec<JoinHandle<()>>,
    /// Maximum number of queued or running tasks.
    budget: usize,
    /// Number of tasks queued or being built by a worker.
    in_flight: Arc<AtomicUsize>,
}

impl MeshingPipeline {
    /// Spawns `worker_count` workers that build sequentially.
    pub fn new<L>(worker_count: usize, budget: usize, atlas: Arc<L>) -> Self
    where
        L: UvLookup + Send + Sync + 'static,
    {
        Self::with_strategy(worker_count, budget, atlas, BuildStrategy::Sequential)
    }

    pub fn with_strategy<L>(
        worker_count: usize,
        budget: usize,
        atlas: Arc<L>,
        strategy: BuildStrategy,
    ) -> Self
    where
        L: UvLookup + Send + Sync + 'static,
    {
        let worker_count = worker_count.max(1);
        let budget = budget.max(1);
        let (task_tx, task_rx) = crossbeam_channel::bounded::<MeshingTask>(budget);
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            let atlas = Arc::clone(&atlas);
            let flight = Arc::clone(&in_flight);

            handles.push(std::thread::spawn(move || {
                while let Ok(task) = rx.recv() {
                    let mesh = match strategy {
                        BuildStrategy::Sequential => build_mesh(&task.chunk, atlas.as_ref()),
                        BuildStrategy::ParallelDirections => {
                            build_mesh_parallel(&task.chunk, atlas.as_ref())
                        }
                    };
                    tracing::trace!(worker, chunk = task.chunk_id.0, ok = mesh.is_ok(), "task done");

                    let _ = tx.send(MeshingResult {
                        chunk_id: task.chunk_id,
                        version: task.version,
                        mesh,
                    });
                    flight.fetch_sub(1, Ordering::Relaxed);
                }
            }));
        }

        tracing::debug!(worker_count, budget, ?strategy, "meshing pipeline started");

        Self {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            budget,
            in_flight,
        }
    }

    /// Queues a task. Returns `false` if the budget is exhausted or the
    /// pipeline has been shut down.
    pub fn submit(&self, task: MeshingTask) -> bool {
        let Some(sender) = &self.task_sender else {
            return false;
        };
        if self.in_flight.load(Ordering::Relaxed) >= self.budget {
            return false;
        }
        self.in_flight.fetch_add(1, Ordering::Relaxed);
        if sender.send(task).is_err() {
            self.in_flight.fetch_sub(1, Ordering::Relaxed);
            return false;
        }
        true
    }

    /// Collects every finished result without blocking.
    pub fn drain_results(&self) -> Vec<MeshingResult> {
        self.result_receiver.try_iter().collect()
    }

    /// Number of tasks queued or being built.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Closes the task channel and joins every worker. Tasks already queued
    /// are still built and their results can be drained afterwards.
    pub fn shutdown(&mut self) {
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            if handle.join().is_err() {
                tracing::error!("meshing worker panicked");
            }
        }
    }
}

impl Drop for MeshingPipeline {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::{Duration, Instant};

    use glam::Vec2;
    use warfest_voxel::{Color, Voxel};

    use super::*;

    fn test_atlas() -> Arc<HashMap<Color, Vec2>> {
        Arc::new(HashMap::from([(Color::RED, Vec2::new(0.5, 0.5))]))
    }

    fn red_chunk() -> Chunk {
        Chunk::filled(4, 4, 4, Voxel::solid(Color::RED)).unwrap()
    }

    fn wait_for(pipeline: &MeshingPipeline, count: usize) -> Vec<MeshingResult> {
        let mut received = Vec::new();
        let start = Instant::now();
        while received.len() < count {
            received.extend(pipeline.drain_results());
            assert!(start.elapsed().as_secs() < 10, "Timed out waiting for mesh results");
            std::thread::sleep(Duration::from_millis(1));
        }
        received
    }

    #[test]
    fn test_meshing_task_produces_valid_mesh() {
        let pipeline = MeshingPipeline::new(2, 8, test_atlas());
        assert!(pipeline.submit(MeshingTask::snapshot(ChunkId(7), &red_chunk())));

        let results = wait_for(&pipeline, 1);
        assert_eq!(results[0].chunk_id, ChunkId(7));
        let mesh = results[0].mesh.as_ref().unwrap();
        assert_eq!(mesh.quad_count(), 6);
    }

    #[test]
    fn test_concurrent_tasks_do_not_interfere() {
        let pipeline = MeshingPipeline::new(4, 16, test_atlas());
        let ids: Vec<ChunkId> = (0..8).map(ChunkId).collect();
        for id in &ids {
            assert!(pipeline.submit(MeshingTask::snapshot(*id, &red_chunk())));
        }

        let received = wait_for(&pipeline, 8);
        let mut received_ids: Vec<_> = received.iter().map(|r| r.chunk_id).collect();
        received_ids.sort();
        assert_eq!(received_ids, ids);
    }

    #[test]
    fn test_result_carries_snapshot_version() {
        let pipeline = MeshingPipeline::new(1, 4, test_atlas());
        let mut chunk = red_chunk();
        chunk.set(0, 0, 0, Voxel::AIR).unwrap();
        chunk.set(1, 0, 0, Voxel::AIR).unwrap();
        let task = MeshingTask::snapshot(ChunkId(0), &chunk);
        assert_eq!(task.version, chunk.version());

        assert!(pipeline.submit(task));
        let results = wait_for(&pipeline, 1);
        assert_eq!(results[0].version, chunk.version());
    }

    #[test]
    fn test_build_errors_are_delivered() {
        let pipeline = MeshingPipeline::new(1, 4, test_atlas());
        let blue = Chunk::filled(2, 2, 2, Voxel::solid(Color::BLUE)).unwrap();
        assert!(pipeline.submit(MeshingTask::snapshot(ChunkId(1), &blue)));

        let results = wait_for(&pipeline, 1);
        assert!(matches!(
            results[0].mesh,
            Err(MeshError::UnregisteredColor { .. })
        ));
    }

    #[test]
    fn test_parallel_strategy_matches_sequential() {
        let pipeline = MeshingPipeline::with_strategy(
            1,
            4,
            test_atlas(),
            BuildStrategy::ParallelDirections,
        );
        let chunk = red_chunk();
        assert!(pipeline.submit(MeshingTask::snapshot(ChunkId(0), &chunk)));

        let results = wait_for(&pipeline, 1);
        let expected = build_mesh(&chunk, test_atlas().as_ref()).unwrap();
        assert_eq!(results[0].mesh.as_ref().unwrap(), &expected);
    }

    #[test]
    fn test_budget_limits_active_tasks() {
        let pipeline = MeshingPipeline::new(1, 2, test_atlas());
        let chunk = red_chunk();

        let submitted = (0..10)
            .filter(|&i| pipeline.submit(MeshingTask::snapshot(ChunkId(i), &chunk)))
            .count();
        assert!(submitted <= 4, "Budget should limit submissions, got {submitted}");
    }

    #[test]
    fn test_submit_after_shutdown_fails() {
        let mut pipeline = MeshingPipeline::new(2, 4, test_atlas());
        pipeline.shutdown();
        assert!(!pipeline.submit(MeshingTask::snapshot(ChunkId(0), &red_chunk())));
        assert_eq!(pipeline.in_flight_count(), 0);
    }
}
