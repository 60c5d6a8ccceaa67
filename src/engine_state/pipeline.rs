//! # Chunk Pipeline
//!
//! The three stages a chunk goes through, bundled behind one entry point:
//!
//! | Stage      | Runs on                                     | Leaves as          |
//! |------------|---------------------------------------------|--------------------|
//! | `Generate` | `AwaitingGenerate`                          | `AwaitingLighting` |
//! | `Light`    | `AwaitingLighting`, `AwaitingRelighting`    | `AwaitingBuild`    |
//! | `Build`    | `AwaitingBuild`, `AwaitingRebuild`          | `Ready`            |
//!
//! A stage called on a chunk in any other state, or on a disposed chunk, is a
//! silent no-op reported as [`StageOutcome::Skipped`]. That check is what keeps
//! the busy sweep loop from processing a chunk twice.
//!
//! When a chunk finishes lighting, its `Ready` neighbours are moved to
//! `AwaitingRebuild`: the new light may have leaked into them.

use std::{
    fmt,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use web_time::Instant;

use super::{
    lighting::LightingEngine,
    rendering::{buffers::BufferDevice, meshing::MeshBuilder},
    voxels::{
        chunk::{Chunk, ChunkState},
        terrain::TerrainGenerator,
        world::World,
    },
};

/// Result of running a stage on a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage ran.
    Completed,
    /// The chunk was disposed or not in a state the stage accepts.
    Skipped,
}

/// One of the three pipeline stages.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PipelineStage {
    /// Terrain generation.
    Generate,
    /// Light seeding and propagation.
    Light,
    /// Meshing and upload.
    Build,
}

impl PipelineStage {
    /// Every stage, in pipeline order.
    pub const ALL: [PipelineStage; 3] = [
        PipelineStage::Generate,
        PipelineStage::Light,
        PipelineStage::Build,
    ];

    /// The stage that advances a chunk in `state`, if any.
    pub fn for_state(state: ChunkState) -> Option<Self> {
        match state {
            ChunkState::AwaitingGenerate => Some(PipelineStage::Generate),
            ChunkState::AwaitingLighting | ChunkState::AwaitingRelighting => {
                Some(PipelineStage::Light)
            }
            ChunkState::AwaitingBuild | ChunkState::AwaitingRebuild => Some(PipelineStage::Build),
            _ => None,
        }
    }
}

/// Running totals, readable from any thread.
#[derive(Debug, Default)]
pub struct PipelineStats {
    generated: AtomicU64,
    lit: AtomicU64,
    built: AtomicU64,
    evicted: AtomicU64,
    skipped: AtomicU64,
}

/// Point-in-time copy of [`PipelineStats`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineStatsSnapshot {
    /// Chunks generated
    pub generated: u64,
    /// Lighting passes, first lighting and relights
    pub lit: u64,
    /// Builds, first builds and rebuilds
    pub built: u64,
    /// Chunks evicted from the cache
    pub evicted: u64,
    /// Stage calls that were no-ops
    pub skipped: u64,
}

impl PipelineStats {
    /// Copies the counters.
    pub fn snapshot(&self) -> PipelineStatsSnapshot {
        PipelineStatsSnapshot {
            generated: self.generated.load(Ordering::Relaxed),
            lit: self.lit.load(Ordering::Relaxed),
            built: self.built.load(Ordering::Relaxed),
            evicted: self.evicted.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
        }
    }

    /// Counts an eviction.
    pub fn record_eviction(&self) {
        self.evicted.fetch_add(1, Ordering::Relaxed);
    }

    fn record(&self, stage: PipelineStage, outcome: StageOutcome) {
        let counter = match (outcome, stage) {
            (StageOutcome::Skipped, _) => &self.skipped,
            (StageOutcome::Completed, PipelineStage::Generate) => &self.generated,
            (StageOutcome::Completed, PipelineStage::Light) => &self.lit,
            (StageOutcome::Completed, PipelineStage::Build) => &self.built,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

impl fmt::Display for PipelineStatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "generated {}, lit {}, built {}, evicted {}, skipped {}",
            self.generated, self.lit, self.built, self.evicted, self.skipped
        )
    }
}

/// The generate, light and build stages over one world.
pub struct ChunkPipeline {
    world: Arc<World>,
    generator: Arc<dyn TerrainGenerator>,
    lighting: LightingEngine,
    mesh_builder: MeshBuilder,
    stats: PipelineStats,
}

impl ChunkPipeline {
    /// Wires the stages to a world and its collaborators.
    ///
    /// # Arguments
    /// * `world` - World whose grid and registry the stages work on
    /// * `generator` - Terrain generator used by the generate stage
    /// * `device` - Buffer device used by the build stage
    pub fn new(
        world: Arc<World>,
        generator: Arc<dyn TerrainGenerator>,
        device: Arc<dyn BufferDevice>,
    ) -> Self {
        Self {
            lighting: LightingEngine::new(world.clone()),
            mesh_builder: MeshBuilder::new(world.clone(), device),
            world,
            generator,
            stats: PipelineStats::default(),
        }
    }

    /// The world the pipeline works on.
    pub fn world(&self) -> &Arc<World> {
        &self.world
    }

    /// Stage counters.
    pub fn stats(&self) -> &PipelineStats {
        &self.stats
    }

    /// Runs one stage on a chunk.
    pub fn run(&self, chunk: &Chunk, stage: PipelineStage) -> StageOutcome {
        let outcome = match stage {
            PipelineStage::Generate => self.generate(chunk),
            PipelineStage::Light => self.light(chunk),
            PipelineStage::Build => self.build(chunk),
        };
        self.stats.record(stage, outcome);
        outcome
    }

    /// Runs whichever stage the chunk's current state calls for.
    pub fn advance(&self, chunk: &Chunk) -> StageOutcome {
        match PipelineStage::for_state(chunk.state()) {
            Some(stage) => self.run(chunk, stage),
            None => StageOutcome::Skipped,
        }
    }

    fn generate(&self, chunk: &Chunk) -> StageOutcome {
        if chunk.is_disposed()
            || !chunk
                .state_cell()
                .transition(ChunkState::AwaitingGenerate, ChunkState::Generating)
        {
            log::trace!(
                "Skipped generation of chunk {:?} in state {:?}",
                chunk.coord(),
                chunk.state()
            );
            return StageOutcome::Skipped;
        }

        let start = Instant::now();
        {
            let mut grid = self.world.grid().get_mut();
            self.generator.generate(chunk, &mut grid);
        }

        if !chunk
            .state_cell()
            .transition(ChunkState::Generating, ChunkState::AwaitingLighting)
        {
            log::debug!(
                "Chunk {:?} changed to {:?} while generating",
                chunk.coord(),
                chunk.state()
            );
        }

        log::debug!(
            "Generated chunk {:?} with {} terrain in {:?}",
            chunk.coord(),
            self.generator.name(),
            start.elapsed()
        );
        StageOutcome::Completed
    }

    fn light(&self, chunk: &Chunk) -> StageOutcome {
        let outcome = self.lighting.process(chunk);
        if outcome == StageOutcome::Completed {
            for coord in chunk.coord().cardinal_neighbours() {
                if let Some(neighbour) = self.world.get_chunk_at(coord) {
                    if neighbour.state_cell().request_rebuild() {
                        log::trace!("Chunk {:?} queued for rebuild", coord);
                    }
                }
            }
        }
        outcome
    }

    fn build(&self, chunk: &Chunk) -> StageOutcome {
        self.mesh_builder.process(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_awaiting_state_maps_to_a_stage() {
        assert_eq!(
            PipelineStage::for_state(ChunkState::AwaitingGenerate),
            Some(PipelineStage::Generate)
        );
        assert_eq!(
            PipelineStage::for_state(ChunkState::AwaitingRelighting),
            Some(PipelineStage::Light)
        );
        assert_eq!(
            PipelineStage::for_state(ChunkState::AwaitingRebuild),
            Some(PipelineStage::Build)
        );
        assert_eq!(PipelineStage::for_state(ChunkState::Ready), None);
        assert_eq!(PipelineStage::for_state(ChunkState::Lighting), None);
        assert_eq!(PipelineStage::for_state(ChunkState::AwaitingRemoval), None);
    }
}
