//! Meshes a generated world on the background pipeline and reports the
//! resulting geometry.

mod models;
mod world;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use lodestone_atlas::AtlasConfig;
use lodestone_block::SectionShape;
use lodestone_config::{CliArgs, Config, default_config_dir};
use lodestone_log::init_logging;
use lodestone_mesh::{
    ChunkCoord, ChunkMeshBuffers, LevelBounds, MeshingPipeline, ResourcePack, ResourcePackCache,
    empty_chunk_geometry, error_chunk_geometry, pending_chunk_geometry,
};
use tracing::{error, info, warn};

use crate::models::{build_atlas, load_block_model};
use crate::world::World;

const DEFAULT_RADIUS: u32 = 4;
const DEFAULT_SECTIONS: u32 = 4;

#[derive(Default)]
struct MeshStats {
    chunks: usize,
    failed: usize,
    stale: usize,
    opaque_vertices: usize,
    translucent_vertices: usize,
    bytes: usize,
}

impl MeshStats {
    fn record(&mut self, buffers: &ChunkMeshBuffers) {
        self.chunks += 1;
        self.opaque_vertices += buffers.opaque_vertex_count();
        self.translucent_vertices += buffers.translucent_vertex_count();
        self.bytes += buffers.byte_len();
    }
}

/// Submits every chunk that needs a mesh and waits for all results.
fn mesh_dirty_chunks<R: ResourcePack + ?Sized>(
    world: &mut World,
    pipeline: &MeshingPipeline,
    pack: &R,
    bounds: LevelBounds,
    stats: &mut MeshStats,
) {
    let mut queue = world.chunks_needing_remesh();
    queue.reverse();
    let mut placeholder_bytes = 0;

    while !queue.is_empty() || pipeline.in_flight_count() > 0 {
        while let Some(coord) = queue.pop() {
            let Some(task) = world.meshing_task(coord) else {
                continue;
            };
            if !pipeline.submit(task) {
                queue.push(coord);
                break;
            }
            if let Some(state) = world.state_mut(coord) {
                state.mark_pending();
            }
            if world.state(coord).is_some_and(|s| s.geometry_state().is_none()) {
                // Shown until the real mesh arrives.
                let pending = pending_chunk_geometry(pack, bounds, coord.cx, coord.cz);
                placeholder_bytes += pending.byte_len();
            }
        }

        let results = pipeline.drain_results();
        if results.is_empty() {
            std::thread::sleep(Duration::from_millis(1));
            continue;
        }
        for result in results {
            let current = world
                .state_mut(result.coord)
                .is_some_and(|state| state.set_geometry(result.data_version));
            if !current {
                stats.stale += 1;
                continue;
            }
            match result.buffers {
                Ok(buffers) => stats.record(&buffers),
                Err(err) => {
                    warn!("chunk {} has no mesh: {}", result.coord, err);
                    let fallback =
                        error_chunk_geometry(pack, bounds, result.coord.cx, result.coord.cz);
                    stats.failed += 1;
                    stats.record(&fallback);
                }
            }
        }
    }
    tracing::debug!("pending placeholders used {} bytes", placeholder_bytes);
}

fn run(args: &CliArgs, config: &Config) -> Result<(), String> {
    let started = Instant::now();

    let atlas = build_atlas(AtlasConfig {
        border: config.atlas.border,
        max_size: config.atlas.max_size,
    })
    .map_err(|e| format!("failed to build texture atlas: {e}"))?;
    info!(
        "Texture atlas: {} textures in {}x{}",
        atlas.texture_count(),
        atlas.size(),
        atlas.size()
    );

    let [u0, v0, u1, v1] = config.resource_pack.default_texture_bounds;
    let pack = Arc::new(ResourcePackCache::with_atlas(
        load_block_model,
        atlas.bounds.clone(),
        &config.resource_pack.missing_texture,
        (u0, v0, u1, v1),
    ));

    let radius = args.radius.unwrap_or(DEFAULT_RADIUS) as i64;
    let sections = args.sections.unwrap_or(DEFAULT_SECTIONS).max(1);
    let mut world = World::generate(radius, sections, SectionShape::STANDARD)
        .map_err(|e| format!("failed to generate world: {e}"))?;
    info!(
        "Generated {} chunks ({} sections each) in {:?}",
        world.chunk_count(),
        sections,
        started.elapsed()
    );

    let bounds = LevelBounds::new(config.placeholder.floor_y, config.placeholder.ceiling_y);
    let mut pipeline = MeshingPipeline::new(
        config.meshing.resolved_worker_count(),
        config.meshing.task_budget.max(1),
        Arc::clone(&pack),
    );
    info!(
        "Meshing with {} workers, budget {}",
        pipeline.worker_count(),
        config.meshing.task_budget
    );
    if pipeline.worker_count() == 0 {
        return Err("no meshing workers could be started".to_string());
    }

    let mut stats = MeshStats::default();
    let mesh_start = Instant::now();
    mesh_dirty_chunks(&mut world, &pipeline, &*pack, bounds, &mut stats);
    info!(
        "Meshed {} chunks in {:?}: {} opaque + {} translucent vertices, {} KiB",
        stats.chunks,
        mesh_start.elapsed(),
        stats.opaque_vertices,
        stats.translucent_vertices,
        stats.bytes / 1024
    );

    // The ring just outside the generated square has no chunks.
    let ring = radius + 1;
    let mut empty_bytes = 0;
    for i in -ring..=ring {
        for coord in [
            ChunkCoord::new(i, -ring),
            ChunkCoord::new(i, ring),
            ChunkCoord::new(-ring, i),
            ChunkCoord::new(ring, i),
        ] {
            empty_bytes += empty_chunk_geometry(&*pack, bounds, coord.cx, coord.cz).byte_len();
        }
    }
    info!("Empty chunk grid geometry: {} bytes", empty_bytes);

    // An edit on the west edge of the origin chunk also dirties its west neighbour.
    let origin = ChunkCoord::new(0, 0);
    let dirty = world
        .set_block(origin, 0, 30, 8, "glass")
        .map_err(|e| format!("edit failed: {e}"))?;
    info!("Block edit at {} requires {} remeshes", origin, dirty.len());
    let mut remesh = MeshStats::default();
    mesh_dirty_chunks(&mut world, &pipeline, &*pack, bounds, &mut remesh);
    info!(
        "Remeshed {} chunks ({} stale results dropped)",
        remesh.chunks, remesh.stale
    );

    pipeline.shutdown();
    if stats.failed + remesh.failed > 0 {
        warn!("{} chunks fell back to error geometry", stats.failed + remesh.failed);
    }
    info!(
        "Done in {:?}: {} block models cached",
        started.elapsed(),
        pack.cached_model_count()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(default_config_dir)
        .unwrap_or_else(|| PathBuf::from("lodestone"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    init_logging(Some(&log_dir), cfg!(debug_assertions), Some(&config));
    info!("Config directory: {}", config_dir.display());

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("{}", message);
            ExitCode::FAILURE
        }
    }
}
