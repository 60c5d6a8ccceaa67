//! # Voxel Chunk Engine Demo
//!
//! Headless driver for the chunk pipeline. Builds an engine around a Perlin
//! terrain generator, walks a player through the world for a few seconds and
//! logs what the pipeline produced.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release -- [config.json] [--gpu]
//! ```
//!
//! With `--gpu` mesh buffers are uploaded to a `wgpu::Device` instead of being
//! kept in CPU memory.

use std::{sync::Arc, thread, time::Duration};

use anyhow::{anyhow, Context};
use cgmath::Point3;
use web_time::Instant;

use voxel_chunk_engine::{
    core::injection_system::MtInjectionSystem,
    engine_state::{
        player_state::{PlayerState, PlayerView},
        rendering::buffers::{BufferDevice, HostBufferDevice, WgpuBufferDevice},
        voxels::terrain::{perlin::PerlinGenerator, TerrainGenerator},
    },
    init_logging, EngineConfig, EngineState,
};

const RUN_TIME: Duration = Duration::from_secs(4);
const STEP_TIME: Duration = Duration::from_millis(250);
const STEP_DISTANCE: f32 = 4.0;

fn main() -> anyhow::Result<()> {
    init_logging();

    let mut config_path = None;
    let mut use_gpu = false;
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--gpu" => use_gpu = true,
            _ => config_path = Some(arg),
        }
    }

    let config = match config_path {
        Some(path) => EngineConfig::load(&path)
            .with_context(|| format!("failed to load config from {path}"))?,
        None => EngineConfig::default(),
    };

    let device: Arc<dyn BufferDevice> = if use_gpu {
        Arc::new(create_wgpu_device()?)
    } else {
        Arc::new(HostBufferDevice::new())
    };

    let start_position = Point3::new(0.5, config.chunk_height as f32, 0.5);
    let player = PlayerState::new(Arc::new(config.clone()), start_position);

    let injector = MtInjectionSystem::new();
    injector.insert::<Arc<dyn TerrainGenerator>>(Arc::new(PerlinGenerator::new(config.seed)));
    injector.insert::<Arc<dyn BufferDevice>>(device);
    injector.insert::<Arc<dyn PlayerView>>(Arc::new(player.clone()));

    let mut engine = EngineState::new(config, &injector)?;
    engine.start();

    let started = Instant::now();
    let mut position = start_position;
    while started.elapsed() < RUN_TIME {
        thread::sleep(STEP_TIME);
        position.x += STEP_DISTANCE;
        player.set_position(position);

        log::info!(
            "{:.2}s player at ({:.1}, {:.1}), {} chunks drawable, {}",
            started.elapsed().as_secs_f32(),
            position.x,
            position.z,
            engine.draw_list(|_| true).len(),
            engine.stats()
        );
    }

    engine.stop();

    let draw_list = engine.draw_list(|_| true);
    let indices: u32 = draw_list.iter().map(|item| item.index_count).sum();
    log::info!(
        "Finished: {} chunks loaded, {} drawable, {} indices, {}",
        engine.world().chunks().count(),
        draw_list.len(),
        indices,
        engine.stats()
    );

    Ok(())
}

fn create_wgpu_device() -> anyhow::Result<WgpuBufferDevice> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::PRIMARY,
        flags: wgpu::InstanceFlags::empty(),
        backend_options: wgpu::BackendOptions::from_env_or_default(),
    });

    pollster::block_on(async move {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .map_err(|err| anyhow!("no suitable GPU adapter: {err}"))?;

        log::info!("Using adapter {}", adapter.get_info().name);

        let (device, _queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                label: Some("chunk buffer device"),
                memory_hints: wgpu::MemoryHints::MemoryUsage,
                trace: wgpu::Trace::Off,
            })
            .await
            .context("failed to create GPU device")?;

        Ok::<_, anyhow::Error>(WgpuBufferDevice::new(Arc::new(device)))
    })
}
