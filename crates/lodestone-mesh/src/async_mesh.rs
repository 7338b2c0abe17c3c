//! Asynchronous meshing pipeline: runs chunk meshing on a worker pool using
//! snapshot tasks, and delivers results through a channel.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use lodestone_block::BlockComponentData;

use crate::chunk_mesh::ChunkMeshBuffers;
use crate::error::MeshError;
use crate::mesher::ChunkMesher;
use crate::neighborhood::{ChunkCoord, ChunkNeighbors};
use crate::resource_pack::ResourcePack;

/// A self-contained meshing task that can run on any thread.
///
/// Block data is shared through [`Arc`], so building a task never copies
/// voxels and workers never touch live world data.
pub struct MeshingTask {
    pub coord: ChunkCoord,
    pub center: Arc<BlockComponentData>,
    pub north: Option<Arc<BlockComponentData>>,
    pub east: Option<Arc<BlockComponentData>>,
    pub south: Option<Arc<BlockComponentData>>,
    pub west: Option<Arc<BlockComponentData>>,
    /// Chunk state the snapshot was taken at.
    pub data_version: u64,
}

impl MeshingTask {
    /// A task with no neighbours.
    pub fn new(coord: ChunkCoord, center: Arc<BlockComponentData>, data_version: u64) -> Self {
        Self {
            coord,
            center,
            north: None,
            east: None,
            south: None,
            west: None,
            data_version,
        }
    }

    fn run<R: ResourcePack + ?Sized>(&self, pack: &R) -> Result<ChunkMeshBuffers, MeshError> {
        let neighbors = ChunkNeighbors {
            north: self.north.as_deref(),
            east: self.east.as_deref(),
            south: self.south.as_deref(),
            west: self.west.as_deref(),
        };
        ChunkMesher::new(pack).build(&self.center, &neighbors)
    }
}

/// The result of a completed meshing task.
pub struct MeshingResult {
    pub coord: ChunkCoord,
    pub data_version: u64,
    pub buffers: Result<ChunkMeshBuffers, MeshError>,
}

/// Asynchronous meshing pipeline backed by a thread pool.
///
/// The caller submits [`MeshingTask`]s and collects [`MeshingResult`]s with
/// [`drain_results`](Self::drain_results). The resource pack is the only
/// state shared between workers.
pub struct MeshingPipeline {
    task_sender: Option<crossbeam_channel::Sender<MeshingTask>>,
    result_receiver: crossbeam_channel::Receiver<MeshingResult>,
    worker_handles: Vec<JoinHandle<()>>,
    /// Maximum number of queued or running tasks.
    budget: usize,
    in_flight: Arc<AtomicUsize>,
}

impl MeshingPipeline {
    /// Spawns `worker_count` meshing threads sharing `resource_pack`.
    ///
    /// `budget` caps the number of tasks queued or running at once, which
    /// bounds the memory held by snapshots.
    pub fn new<R>(worker_count: usize, budget: usize, resource_pack: Arc<R>) -> Self
    where
        R: ResourcePack + ?Sized + 'static,
    {
        let (task_tx, task_rx) = crossbeam_channel::bounded::<MeshingTask>(budget.max(1));
        let (result_tx, result_rx) = crossbeam_channel::unbounded();
        let in_flight = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::with_capacity(worker_count);
        for worker in 0..worker_count {
            let rx = task_rx.clone();
            let tx = result_tx.clone();
            let pack = Arc::clone(&resource_pack);
            let flight = Arc::clone(&in_flight);

            let spawned = std::thread::Builder::new()
                .name(format!("lodestone-mesher-{worker}"))
                .spawn(move || {
                    while let Ok(task) = rx.recv() {
                        let buffers = task.run(&*pack);
                        if let Err(err) = &buffers {
                            tracing::warn!("meshing chunk {} failed: {}", task.coord, err);
                        }
                        let _ = tx.send(MeshingResult {
                            coord: task.coord,
                            data_version: task.data_version,
                            buffers,
                        });
                        flight.fetch_sub(1, Ordering::Relaxed);
                    }
                });
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => tracing::error!("failed to spawn meshing worker {}: {}", worker, err),
            }
        }
        tracing::debug!(
            "meshing pipeline started with {} workers, budget {}",
            handles.len(),
            budget
        );

        Self {
            task_sender: Some(task_tx),
            result_receiver: result_rx,
            worker_handles: handles,
            budget,
            in_flight,
        }
    }

    /// Submits a task. Returns `false` if the budget is exhausted or the
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

    /// Collects every result completed so far without blocking.
    pub fn drain_results(&self) -> Vec<MeshingResult> {
        self.result_receiver.try_iter().collect()
    }

    /// Number of tasks queued or running.
    pub fn in_flight_count(&self) -> usize {
        self.in_flight.load(Ordering::Relaxed)
    }

    /// Number of worker threads running.
    pub fn worker_count(&self) -> usize {
        self.worker_handles.len()
    }

    /// Stops accepting tasks, lets workers finish queued ones and joins them.
    pub fn shutdown(&mut self) {
        // Closing the channel makes every worker's recv fail once it is drained.
        self.task_sender.take();
        for handle in self.worker_handles.drain(..) {
            let _ = handle.join();
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
    use super::*;
    use crate::block_mesh::{BlockMesh, BlockMeshTransparency};
    use crate::resource_pack::{
        BlockModelLoader, FULL_ATLAS_BOUNDS, ModelLoadError, ResourcePackCache,
    };
    use lodestone_block::{
        BlockPalette, BlockStack, BlockState, IndexArray3D, SectionArrayMap, SectionShape,
    };
    use rustc_hash::FxHashMap;
    use std::time::{Duration, Instant};

    type TestLoader = fn(&BlockStack) -> Result<BlockMesh, ModelLoadError>;

    fn loader(stack: &BlockStack) -> Result<BlockMesh, ModelLoadError> {
        match stack.base().base_name.as_str() {
            "air" => Ok(BlockMesh::empty()),
            "stone" => Ok(BlockMesh::cube("stone", BlockMeshTransparency::FullOpaque, [1.0; 3])),
            other => Err(ModelLoadError::new(format!("unknown block {other}"))),
        }
    }

    fn pack() -> Arc<ResourcePackCache<TestLoader>> {
        Arc::new(ResourcePackCache::new(
            loader as TestLoader,
            FxHashMap::default(),
            FULL_ATLAS_BOUNDS,
        ))
    }

    fn chunk(fill: u32) -> Arc<BlockComponentData> {
        let shape = SectionShape::new(4, 4, 4);
        let palette = BlockPalette::from_stacks(
            ["air", "stone", "bedrock"].map(|n| BlockStack::single(BlockState::new("minecraft", n))),
        );
        let mut grid = SectionArrayMap::new(shape);
        grid.insert(0, IndexArray3D::new(shape, fill).unwrap()).unwrap();
        Arc::new(BlockComponentData::new(palette, grid))
    }

    fn wait_for(pipeline: &MeshingPipeline, count: usize) -> Vec<MeshingResult> {
        let mut received = Vec::new();
        let start = Instant::now();
        while received.len() < count {
            received.extend(pipeline.drain_results());
            assert!(start.elapsed().as_secs() < 10, "timed out waiting for mesh results");
            std::thread::sleep(Duration::from_millis(1));
        }
        received
    }

    #[test]
    fn test_task_produces_mesh() {
        let pipeline = MeshingPipeline::new(2, 8, pack());
        assert!(pipeline.submit(MeshingTask::new(ChunkCoord::new(3, 4), chunk(1), 7)));

        let results = wait_for(&pipeline, 1);
        assert_eq!(results[0].coord, ChunkCoord::new(3, 4));
        assert_eq!(results[0].data_version, 7);
        let buffers = results[0].buffers.as_ref().unwrap();
        assert_eq!(buffers.opaque_vertex_count(), 6 * 16 * 6);
    }

    #[test]
    fn test_concurrent_tasks_do_not_interfere() {
        let pipeline = MeshingPipeline::new(4, 16, pack());
        let coords: Vec<ChunkCoord> = (0..8).map(|i| ChunkCoord::new(i, 0)).collect();
        for coord in &coords {
            assert!(pipeline.submit(MeshingTask::new(*coord, chunk(1), 1)));
        }

        let received = wait_for(&pipeline, 8);
        let mut received_coords: Vec<_> = received.iter().map(|r| r.coord).collect();
        received_coords.sort();
        assert_eq!(received_coords, coords);
        let first = received[0].buffers.as_ref().unwrap();
        for result in &received {
            assert_eq!(result.buffers.as_ref().unwrap(), first);
        }
    }

    #[test]
    fn test_neighbours_cull_shared_faces() {
        let pipeline = MeshingPipeline::new(1, 4, pack());
        let mut task = MeshingTask::new(ChunkCoord::new(0, 0), chunk(1), 1);
        task.east = Some(chunk(1));
        task.west = Some(chunk(1));
        assert!(pipeline.submit(task));

        let results = wait_for(&pipeline, 1);
        let buffers = results[0].buffers.as_ref().unwrap();
        assert_eq!(buffers.opaque_vertex_count(), 4 * 16 * 6);
    }

    #[test]
    fn test_failures_are_delivered() {
        let pipeline = MeshingPipeline::new(1, 4, pack());
        assert!(pipeline.submit(MeshingTask::new(ChunkCoord::new(0, 0), chunk(2), 1)));
        let results = wait_for(&pipeline, 1);
        assert!(matches!(
            results[0].buffers,
            Err(MeshError::ModelResolution { .. })
        ));
    }

    /// Blocks every model load until the gate sender is dropped.
    struct GatedLoader {
        gate: crossbeam_channel::Receiver<()>,
    }

    impl BlockModelLoader for GatedLoader {
        fn load(&self, stack: &BlockStack) -> Result<BlockMesh, ModelLoadError> {
            let _ = self.gate.recv();
            loader(stack)
        }
    }

    #[test]
    fn test_budget_limits_active_tasks() {
        let (open, gate) = crossbeam_channel::bounded::<()>(0);
        let pack = Arc::new(ResourcePackCache::new(
            GatedLoader { gate },
            FxHashMap::default(),
            FULL_ATLAS_BOUNDS,
        ));
        let pipeline = MeshingPipeline::new(1, 2, pack);

        // The worker holds the first task inside the loader, the second waits
        // in the queue, so the budget is exhausted.
        let mut submitted = 0;
        for i in 0..10 {
            if pipeline.submit(MeshingTask::new(ChunkCoord::new(i, 0), chunk(1), 1)) {
                submitted += 1;
            }
        }
        assert_eq!(submitted, 2);
        assert_eq!(pipeline.in_flight_count(), 2);

        drop(open);
        let results = wait_for(&pipeline, 2);
        assert!(results.iter().all(|r| r.buffers.is_ok()));

        let start = Instant::now();
        while pipeline.in_flight_count() > 0 {
            assert!(start.elapsed().as_secs() < 10, "in-flight count never drained");
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(pipeline.submit(MeshingTask::new(ChunkCoord::new(20, 0), chunk(1), 2)));
        assert_eq!(wait_for(&pipeline, 1)[0].data_version, 2);
    }

    #[test]
    fn test_submit_after_shutdown_is_rejected() {
        let mut pipeline = MeshingPipeline::new(1, 2, pack());
        pipeline.shutdown();
        assert_eq!(pipeline.worker_count(), 0);
        assert!(!pipeline.submit(MeshingTask::new(ChunkCoord::new(0, 0), chunk(1), 1)));
    }
}
