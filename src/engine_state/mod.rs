//! # Engine State Module
//!
//! Wires the chunk pipeline together and runs it.
//!
//! ## Key Components
//!
//! * `EngineState` - Owns the world, the pipeline and the sweep thread
//! * `chunk_cache` - Classifies chunks around the player and dispatches stages
//! * `pipeline` - The generate, light and build stages
//! * `lighting` - Sun and colour light flood fill
//! * `rendering` - Mesh building, vertex format and buffer backends
//! * `task_management` - Worker pool and scheduling strategies
//! * `voxels` - Blocks, the toroidal block grid, chunks and the world
//!
//! ## Architecture
//!
//! `EngineState::new` resolves its collaborators from an [`MtInjectionSystem`]:
//! an `Arc<dyn TerrainGenerator>`, an `Arc<dyn BufferDevice>` and an
//! `Arc<dyn PlayerView>`. A missing collaborator or an invalid configuration
//! stops startup with an [`EngineError`].
//!
//! After `start()`, one background thread runs the classify and dispatch sweep
//! in a loop, yielding whenever a sweep finds nothing to do. The render side
//! calls `draw_list()` whenever it likes; it only ever sees immutable
//! [`DrawItem`] snapshots.
//!
//! ## Performance Considerations
//!
//! * The sweep never blocks on a stage unless the inline scheduler is used
//! * Generation and lighting serialize on the grid write lock
//! * Meshing and drawing only take read locks

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    thread::{self, JoinHandle},
};

use crate::core::injection_system::MtInjectionSystem;

use chunk_cache::{range_box, ChunkCacheManager, SweepReport};
use config::EngineConfig;
use error::EngineError;
use pipeline::{ChunkPipeline, PipelineStatsSnapshot};
use player_state::PlayerView;
use rendering::{buffers::BufferDevice, DrawItem};
use task_management::scheduler::create_scheduler;
use voxels::{bounds::Aabb, terrain::TerrainGenerator, world::World};

pub mod chunk_cache;
pub mod config;
pub mod error;
pub mod lighting;
pub mod pipeline;
pub mod player_state;
pub mod rendering;
pub mod task_management;
pub mod voxels;

/// The main state container for the chunk pipeline.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use cgmath::Point3;
/// use voxel_chunk_engine::core::injection_system::MtInjectionSystem;
/// use voxel_chunk_engine::engine_state::{
///     config::{ConcurrencyStrategy, EngineConfig},
///     player_state::{PlayerState, PlayerView},
///     rendering::buffers::{BufferDevice, HostBufferDevice},
///     voxels::terrain::{flat::FlatGenerator, TerrainGenerator},
///     EngineState,
/// };
///
/// let config = EngineConfig {
///     chunk_height: 16,
///     cache_range: 1,
///     view_range: 1,
///     concurrency: ConcurrencyStrategy::Inline,
///     ..EngineConfig::default()
/// };
///
/// let injector = MtInjectionSystem::new();
/// injector.insert::<Arc<dyn TerrainGenerator>>(Arc::new(FlatGenerator::default()));
/// injector.insert::<Arc<dyn BufferDevice>>(Arc::new(HostBufferDevice::new()));
/// injector.insert::<Arc<dyn PlayerView>>(Arc::new(PlayerState::new(
///     Arc::new(config.clone()),
///     Point3::new(8.0, 8.0, 8.0),
/// )));
///
/// let mut engine = EngineState::new(config, &injector).unwrap();
/// for _ in 0..8 {
///     engine.tick();
/// }
/// assert_eq!(engine.draw_list(|_| true).len(), 9);
/// ```
pub struct EngineState {
    config: Arc<EngineConfig>,
    pipeline: Arc<ChunkPipeline>,
    player: Arc<dyn PlayerView>,
    manager: Option<ChunkCacheManager>,
    running: Arc<AtomicBool>,
    sweep_thread: Option<JoinHandle<ChunkCacheManager>>,
}

impl EngineState {
    /// Validates the configuration, resolves the collaborators and creates the
    /// initial chunks.
    ///
    /// # Errors
    /// - any configuration error from [`EngineConfig::validate`]
    /// - [`EngineError::MissingCollaborator`] if the generator, buffer device or
    ///   player view was not registered
    pub fn new(config: EngineConfig, injector: &MtInjectionSystem) -> Result<Self, EngineError> {
        config.validate()?;
        let config = Arc::new(config);

        let generator = Arc::clone(&*injector.get::<Arc<dyn TerrainGenerator>>()?);
        let device = Arc::clone(&*injector.get::<Arc<dyn BufferDevice>>()?);
        let player = Arc::clone(&*injector.get::<Arc<dyn PlayerView>>()?);

        let world = Arc::new(World::new(config.clone()));
        let pipeline = Arc::new(ChunkPipeline::new(world, generator, device));
        let scheduler = create_scheduler(&config, pipeline.clone());
        let manager =
            ChunkCacheManager::new(config.clone(), pipeline.clone(), player.clone(), scheduler)?;

        log::info!(
            "Engine state created: {}x{}x{} chunks, {} world",
            config.chunk_width,
            config.chunk_length,
            config.chunk_height,
            if config.infinite { "infinite" } else { "finite" }
        );

        Ok(Self {
            config,
            pipeline,
            player,
            manager: Some(manager),
            running: Arc::new(AtomicBool::new(false)),
            sweep_thread: None,
        })
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The world the pipeline maintains.
    pub fn world(&self) -> &Arc<World> {
        self.pipeline.world()
    }

    /// Current stage counters.
    pub fn stats(&self) -> PipelineStatsSnapshot {
        self.pipeline.stats().snapshot()
    }

    /// Whether the sweep thread is running.
    pub fn is_running(&self) -> bool {
        self.sweep_thread.is_some()
    }

    /// Spawns the sweep thread.
    ///
    /// # Returns
    /// `false` if the thread was already running
    pub fn start(&mut self) -> bool {
        let Some(mut manager) = self.manager.take() else {
            return false;
        };

        self.running.store(true, Ordering::Release);
        let running = self.running.clone();
        self.sweep_thread = Some(thread::spawn(move || {
            log::info!("Chunk sweep thread started");
            while running.load(Ordering::Acquire) {
                if !manager.tick().did_work() {
                    thread::yield_now();
                }
            }
            log::info!("Chunk sweep thread stopped");
            manager
        }));
        true
    }

    /// Signals the sweep thread and waits for it to finish its current sweep.
    ///
    /// The engine can be started again afterwards.
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::Release);
        if let Some(handle) = self.sweep_thread.take() {
            match handle.join() {
                Ok(manager) => self.manager = Some(manager),
                Err(_) => log::warn!("Chunk sweep thread panicked"),
            }
        }
    }

    /// Runs one sweep on the calling thread.
    ///
    /// # Returns
    /// `None` while the sweep thread is running
    pub fn tick(&mut self) -> Option<SweepReport> {
        self.manager.as_mut().map(ChunkCacheManager::tick)
    }

    /// Snapshots every drawable chunk inside the view range that passes `cull`.
    ///
    /// Chunks the player has left behind in the cache ring keep their mesh
    /// until they are evicted or rebuilt, but are not drawn.
    ///
    /// # Arguments
    /// * `cull` - Returns `true` for bounding boxes that should be drawn
    ///
    /// # Returns
    /// An empty list while the player has no valid chunk
    pub fn draw_list(&self, cull: impl Fn(&Aabb) -> bool) -> Vec<DrawItem> {
        let Some(player_chunk) = self.player.current_chunk() else {
            return Vec::new();
        };
        let view = range_box(&self.config, player_chunk, self.config.view_range);

        self.world()
            .chunks()
            .values()
            .iter()
            .filter_map(|chunk| DrawItem::from_chunk(chunk))
            .filter(|item| view.contains_aabb(&item.bounding_box) && cull(&item.bounding_box))
            .collect()
    }
}

impl Drop for EngineState {
    fn drop(&mut self) {
        self.stop();
        if let Some(manager) = self.manager.as_mut() {
            manager.shutdown();
        }
    }
}
