//! # Chunk Cache Manager
//!
//! Drives the chunk state machine. Every sweep:
//!
//! 1. Builds two boxes around the player's chunk: the **view box**
//!    (`view_range` chunks in each direction) and the **cache box**
//!    (`cache_range` chunks, never smaller).
//! 2. Classifies every registered chunk:
//!    - inside the view box: advanced through every stage
//!    - inside the cache box only: generated and lit, never meshed
//!    - outside both: evicted (marked `AwaitingRemoval`, disposed, removed)
//! 3. In an infinite world, re-centres the grid on the player and creates the
//!    chunks of the cache square that do not exist yet.
//!
//! A finite world creates its chunks once, around chunk `(0, 0)`, and never
//! moves. Until the player's chunk exists the classification step is skipped.

use std::sync::Arc;

use cgmath::Point3;

use super::{
    config::EngineConfig,
    error::EngineError,
    pipeline::{ChunkPipeline, PipelineStage},
    player_state::PlayerView,
    task_management::scheduler::ChunkScheduler,
    voxels::{
        bounds::Aabb,
        chunk::{Chunk, ChunkCoord, ChunkState},
        world::World,
    },
};

/// Where a chunk sits relative to the player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkRange {
    /// Inside the view box.
    View,
    /// Inside the cache box but not the view box.
    Cache,
    /// Outside the cache box.
    Outside,
}

/// What one sweep did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Whether the player's chunk was available for classification
    pub classified: bool,
    /// Stages handed to the scheduler
    pub submitted: usize,
    /// Chunks evicted
    pub evicted: usize,
    /// Chunks created
    pub created: usize,
}

impl SweepReport {
    /// Whether the sweep changed or scheduled anything.
    pub fn did_work(&self) -> bool {
        self.submitted > 0 || self.evicted > 0 || self.created > 0
    }
}

/// Block-space box covering `range` chunks around `center`, full height.
pub fn range_box(config: &EngineConfig, center: ChunkCoord, range: u8) -> Aabb {
    let range = range as i32;
    Aabb::new(
        Point3::new(
            ((center.x - range) * config.width()) as f32,
            0.0,
            ((center.z - range) * config.length()) as f32,
        ),
        Point3::new(
            ((center.x + range + 1) * config.width()) as f32,
            config.height() as f32,
            ((center.z + range + 1) * config.length()) as f32,
        ),
    )
}

/// Classifies and advances the chunks around the player.
pub struct ChunkCacheManager {
    config: Arc<EngineConfig>,
    pipeline: Arc<ChunkPipeline>,
    player: Arc<dyn PlayerView>,
    scheduler: Box<dyn ChunkScheduler>,
    center: ChunkCoord,
}

impl ChunkCacheManager {
    /// Creates the manager and the initial chunks.
    ///
    /// An infinite world starts centred on the player's chunk, a finite one on
    /// chunk `(0, 0)`.
    ///
    /// # Errors
    /// Returns [`EngineError::ViewRangeExceedsCacheRange`] (or any other
    /// configuration error) if the configuration is invalid.
    pub fn new(
        config: Arc<EngineConfig>,
        pipeline: Arc<ChunkPipeline>,
        player: Arc<dyn PlayerView>,
        scheduler: Box<dyn ChunkScheduler>,
    ) -> Result<Self, EngineError> {
        config.validate()?;

        let center = if config.infinite {
            player.current_chunk().unwrap_or(ChunkCoord::new(0, 0))
        } else {
            ChunkCoord::new(0, 0)
        };

        let mut manager = Self {
            config,
            pipeline,
            player,
            scheduler,
            center,
        };
        manager.world().recenter(center);
        let created = manager.create_missing_chunks();
        log::info!(
            "Chunk cache ready around chunk ({}, {}): {} chunks, cache range {}, view range {}",
            center.x,
            center.z,
            created,
            manager.config.cache_range,
            manager.config.view_range
        );

        Ok(manager)
    }

    /// The world the manager maintains.
    pub fn world(&self) -> &Arc<World> {
        self.pipeline.world()
    }

    /// The chunk the cache square is centred on.
    pub fn center(&self) -> ChunkCoord {
        self.center
    }

    /// Classifies a chunk against boxes centred on `center`.
    pub fn classify(&self, chunk: &Chunk, center: ChunkCoord) -> ChunkRange {
        let bounds = chunk.bounding_box();
        if range_box(&self.config, center, self.config.view_range).contains_aabb(&bounds) {
            ChunkRange::View
        } else if range_box(&self.config, center, self.config.cache_range).contains_aabb(&bounds) {
            ChunkRange::Cache
        } else {
            ChunkRange::Outside
        }
    }

    /// Runs one classification and dispatch sweep.
    pub fn tick(&mut self) -> SweepReport {
        let mut report = SweepReport::default();

        let player_chunk = self
            .player
            .current_chunk()
            .filter(|coord| self.world().chunks().contains_key(*coord));

        match player_chunk {
            Some(center) => {
                report.classified = true;
                for chunk in self.world().chunks().values() {
                    self.process_chunk(chunk, center, &mut report);
                }
            }
            None => log::trace!("Player chunk not available yet; skipping classification"),
        }

        if self.config.infinite {
            if let Some(center) = self.player.current_chunk() {
                if center != self.center {
                    log::debug!(
                        "Cache re-centred from ({}, {}) to ({}, {})",
                        self.center.x,
                        self.center.z,
                        center.x,
                        center.z
                    );
                    self.center = center;
                    self.world().recenter(center);
                }
            }
            report.created = self.create_missing_chunks();
        }

        self.scheduler.pump();
        report
    }

    /// Stops the scheduler's worker threads.
    pub fn shutdown(&mut self) {
        self.scheduler.shutdown();
    }

    fn process_chunk(&mut self, chunk: Arc<Chunk>, center: ChunkCoord, report: &mut SweepReport) {
        let state = chunk.state();
        if state == ChunkState::AwaitingRemoval {
            return;
        }

        let stage = match self.classify(&chunk, center) {
            ChunkRange::View => PipelineStage::for_state(state),
            ChunkRange::Cache => match state {
                ChunkState::AwaitingGenerate => Some(PipelineStage::Generate),
                ChunkState::AwaitingLighting => Some(PipelineStage::Light),
                _ => None,
            },
            ChunkRange::Outside => {
                if self.world().remove_chunk_at(chunk.coord()).is_some() {
                    self.pipeline.stats().record_eviction();
                    report.evicted += 1;
                    log::debug!("Evicted chunk {:?}", chunk.coord());
                }
                None
            }
        };

        if let Some(stage) = stage {
            if self.scheduler.submit(chunk, stage) {
                report.submitted += 1;
            }
        }
    }

    fn create_missing_chunks(&self) -> usize {
        let range = self.config.cache_range as i32;
        let mut created = 0;
        for x in self.center.x - range..=self.center.x + range {
            for z in self.center.z - range..=self.center.z + range {
                if self.world().add_chunk_at(ChunkCoord::new(x, z)).is_some() {
                    created += 1;
                }
            }
        }

        if created > 0 {
            log::debug!("Created {} chunks", created);
        }
        created
    }
}
