//! # Engine Configuration
//!
//! Startup configuration for the chunk pipeline. The configuration is read once,
//! validated, and then shared as `Arc<EngineConfig>` with every component that
//! needs chunk dimensions or ranges. Nothing reads it through a global and nothing
//! changes it after the engine is built.
//!
//! ## File Format
//!
//! JSON, every field optional:
//!
//! ```json
//! {
//!     "chunk_width": 16,
//!     "chunk_length": 16,
//!     "chunk_height": 128,
//!     "cache_range": 4,
//!     "view_range": 3,
//!     "infinite": true,
//!     "concurrency": "staged",
//!     "worker_threads": 4,
//!     "seed": 0
//! }
//! ```
//!
//! Powers of two are recommended for the chunk dimensions; nothing depends on it.

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

use super::error::EngineError;

/// Light value of a block in direct sunlight.
pub const MAX_SUN_VALUE: u8 = 16;

/// Largest block grid the engine will allocate.
pub const MAX_GRID_BLOCKS: u64 = i32::MAX as u64;

/// How pipeline stages are executed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyStrategy {
    /// Every stage runs on the sweep thread as soon as it is submitted.
    Inline,
    /// One dedicated thread per stage (generate, light, build).
    Staged,
    /// A pool of `worker_threads` threads, any stage on any thread.
    TaskPool,
}

/// Chunk pipeline configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Chunk size along X in blocks.
    pub chunk_width: u8,
    /// Chunk size along Z in blocks.
    pub chunk_length: u8,
    /// Chunk size along Y in blocks; also the world height.
    pub chunk_height: u8,
    /// Radius in chunks around the player that is generated and lit.
    pub cache_range: u8,
    /// Radius in chunks around the player that is also meshed.
    pub view_range: u8,
    /// Whether new chunks are created as the player moves.
    pub infinite: bool,
    /// Stage execution strategy.
    pub concurrency: ConcurrencyStrategy,
    /// Worker count for [`ConcurrencyStrategy::TaskPool`].
    pub worker_threads: usize,
    /// Seed handed to the bundled terrain generators.
    pub seed: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunk_width: 16,
            chunk_length: 16,
            chunk_height: 128,
            cache_range: 4,
            view_range: 3,
            infinite: true,
            concurrency: ConcurrencyStrategy::Staged,
            worker_threads: 4,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Parses and validates a configuration from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self, EngineError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a configuration file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON configuration file
    ///
    /// # Returns
    /// The validated configuration, or the first error encountered
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        let contents = fs::read_to_string(path.as_ref())?;
        log::info!("Loaded engine configuration from {}", path.as_ref().display());
        Self::from_json_str(&contents)
    }

    /// Checks the invariants the rest of the engine relies on.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.chunk_width == 0 || self.chunk_length == 0 || self.chunk_height == 0 {
            return Err(EngineError::InvalidChunkDimensions {
                width: self.chunk_width,
                length: self.chunk_length,
                height: self.chunk_height,
            });
        }

        if self.view_range > self.cache_range {
            return Err(EngineError::ViewRangeExceedsCacheRange {
                view_range: self.view_range,
                cache_range: self.cache_range,
            });
        }

        if self.concurrency == ConcurrencyStrategy::TaskPool && self.worker_threads == 0 {
            return Err(EngineError::InvalidWorkerCount(self.worker_threads));
        }

        let blocks = self.grid_block_count();
        if blocks > MAX_GRID_BLOCKS {
            return Err(EngineError::GridTooLarge {
                blocks,
                limit: MAX_GRID_BLOCKS,
            });
        }

        Ok(())
    }

    /// Chunk width as a signed block count.
    pub fn width(&self) -> i32 {
        self.chunk_width as i32
    }

    /// Chunk length as a signed block count.
    pub fn length(&self) -> i32 {
        self.chunk_length as i32
    }

    /// World height as a signed block count.
    pub fn height(&self) -> i32 {
        self.chunk_height as i32
    }

    /// Highest valid Y coordinate.
    pub fn max_height_index(&self) -> i32 {
        self.height() - 1
    }

    /// Number of chunks along one side of the cache square.
    pub fn cache_span_in_chunks(&self) -> i32 {
        2 * self.cache_range as i32 + 1
    }

    /// Width of the block cache in blocks.
    pub fn cache_width_in_blocks(&self) -> i32 {
        self.cache_span_in_chunks() * self.width()
    }

    /// Length of the block cache in blocks.
    pub fn cache_length_in_blocks(&self) -> i32 {
        self.cache_span_in_chunks() * self.length()
    }

    /// Number of blocks in the grid backing the cache square.
    ///
    /// Computed in `u64` so every `u8` combination fits.
    pub fn grid_block_count(&self) -> u64 {
        self.cache_width_in_blocks() as u64
            * self.cache_length_in_blocks() as u64
            * self.height() as u64
    }
}
