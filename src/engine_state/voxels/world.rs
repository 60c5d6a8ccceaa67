//! # World Module
//!
//! This module provides the `World` struct, which ties the block grid to the chunk
//! registry. It is the single entry point for block reads and edits from outside
//! the pipeline and the place where chunks are created and evicted.
//!
//! ## Architecture
//!
//! - `grid`: the toroidal [`BlockGrid`] shared through an [`MtResource`]
//! - `chunks`: the [`ChunkRegistry`] deciding which chunk owns which grid slots
//!
//! ## Thread Safety
//!
//! `World` is shared as `Arc<World>` by the sweep thread, the stage workers and the
//! caller. Generation and lighting hold the grid write lock for a whole pass;
//! meshing and reads take the read lock.

use std::sync::Arc;

use crate::core::MtResource;
use crate::engine_state::config::EngineConfig;

use super::{
    block::Block,
    block_grid::BlockGrid,
    chunk::{Chunk, ChunkCoord, ChunkState},
    chunk_registry::ChunkRegistry,
};

/// The block grid plus the chunks that own it.
pub struct World {
    config: Arc<EngineConfig>,
    grid: MtResource<BlockGrid>,
    chunks: ChunkRegistry,
}

impl World {
    /// Creates an empty world with a grid sized for the configured cache square.
    pub fn new(config: Arc<EngineConfig>) -> Self {
        let grid = MtResource::new(BlockGrid::new(&config));
        World {
            config,
            grid,
            chunks: ChunkRegistry::new(),
        }
    }

    /// Engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The shared block grid.
    pub fn grid(&self) -> &MtResource<BlockGrid> {
        &self.grid
    }

    /// The chunk registry.
    pub fn chunks(&self) -> &ChunkRegistry {
        &self.chunks
    }

    /// Adds a new chunk at the specified chunk coordinates if one doesn't already
    /// exist.
    ///
    /// # Returns
    /// The new chunk, or `None` if the coordinate was already taken
    pub fn add_chunk_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks
            .insert_if_absent(coord, || Chunk::new(coord, &self.config))
    }

    /// Retrieves the chunk at the specified chunk coordinates.
    pub fn get_chunk_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.chunks.get(coord)
    }

    /// Retrieves the chunk owning the world-space block column `(x, z)`.
    pub fn chunk_at_block(&self, x: i32, z: i32) -> Option<Arc<Chunk>> {
        self.chunks
            .get(ChunkCoord::containing_block(&self.config, x, z))
    }

    /// Evicts a chunk: marks it `AwaitingRemoval`, disposes it and removes it from
    /// the registry.
    ///
    /// Stages still running on the chunk see the state change or the disposed
    /// flag and drop their results.
    pub fn remove_chunk_at(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        let chunk = self.chunks.remove(coord)?;
        chunk.state_cell().store(ChunkState::AwaitingRemoval);
        chunk.dispose();
        Some(chunk)
    }

    /// Reads a copy of the block at a world position. Outside the cache this is
    /// [`Block::EMPTY`].
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Block {
        self.grid.get().block_at(x, y, z)
    }

    /// Writes a block and schedules relighting around it.
    ///
    /// The owning chunk and its four cardinal neighbours are moved to
    /// `AwaitingRelighting` when they are past generation. Writes with no owning
    /// chunk, or outside the cache, are dropped.
    ///
    /// # Returns
    /// `true` if the block was written
    pub fn set_block_at(&self, x: i32, y: i32, z: i32, block: Block) -> bool {
        let Some(owner) = self.chunk_at_block(x, z) else {
            log::trace!("Dropped block write at ({x}, {y}, {z}): no owning chunk");
            return false;
        };

        if !self.grid.get_mut().set_block_at(x, y, z, block) {
            log::trace!("Dropped block write at ({x}, {y}, {z}): outside the cache");
            return false;
        }

        let coord = owner.coord();
        let mut relit = usize::from(owner.state_cell().request_relight());
        for neighbour in coord.cardinal_neighbours() {
            if let Some(chunk) = self.chunks.get(neighbour) {
                relit += usize::from(chunk.state_cell().request_relight());
            }
        }

        log::debug!(
            "Block at ({x}, {y}, {z}) set to {:?}; {relit} chunk(s) marked for relighting",
            block.get_type()
        );
        true
    }

    /// Moves the grid's cache window so it is centred on `center`.
    pub fn recenter(&self, center: ChunkCoord) {
        self.grid
            .get_mut()
            .recenter(&self.config, center.x, center.z);
    }
}
