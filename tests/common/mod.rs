//! Shared setup for the integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use cgmath::Point3;
use voxel_chunk_engine::{
    core::injection_system::MtInjectionSystem,
    engine_state::{
        config::{ConcurrencyStrategy, EngineConfig},
        pipeline::{ChunkPipeline, PipelineStage},
        player_state::{PlayerState, PlayerView},
        rendering::buffers::{BufferDevice, HostBufferDevice},
        voxels::{
            chunk::{Chunk, ChunkState},
            terrain::{flat::FlatGenerator, TerrainGenerator},
            world::World,
        },
    },
};

/// 4x4x8 chunks, one ring of cache and view, stages run inline.
pub fn small_config(cache_range: u8, view_range: u8) -> EngineConfig {
    EngineConfig {
        chunk_width: 4,
        chunk_length: 4,
        chunk_height: 8,
        cache_range,
        view_range,
        concurrency: ConcurrencyStrategy::Inline,
        worker_threads: 2,
        ..EngineConfig::default()
    }
}

/// A pipeline over an empty world with a one-layer rock floor.
pub fn flat_pipeline(config: EngineConfig) -> (Arc<ChunkPipeline>, Arc<HostBufferDevice>) {
    let world = Arc::new(World::new(Arc::new(config)));
    let device = Arc::new(HostBufferDevice::new());
    let pipeline = Arc::new(ChunkPipeline::new(
        world,
        Arc::new(FlatGenerator::default()),
        device.clone(),
    ));
    (pipeline, device)
}

/// Runs generate, light and build on a fresh chunk.
pub fn run_to_ready(pipeline: &ChunkPipeline, chunk: &Chunk) {
    for stage in PipelineStage::ALL {
        pipeline.run(chunk, stage);
    }
    assert_eq!(chunk.state(), ChunkState::Ready);
}

/// An injector with a flat generator, a host buffer device and a player.
pub fn injector_with(
    config: &EngineConfig,
    position: Point3<f32>,
) -> (MtInjectionSystem, PlayerState, Arc<HostBufferDevice>) {
    let device = Arc::new(HostBufferDevice::new());
    let player = PlayerState::new(Arc::new(config.clone()), position);

    let injector = MtInjectionSystem::new();
    injector.insert::<Arc<dyn TerrainGenerator>>(Arc::new(FlatGenerator::default()));
    injector.insert::<Arc<dyn BufferDevice>>(device.clone());
    injector.insert::<Arc<dyn PlayerView>>(Arc::new(player.clone()));

    (injector, player, device)
}
