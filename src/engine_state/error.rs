//! # Engine Errors
//!
//! Fatal startup errors for the chunk pipeline. Runtime problems never surface
//! here: a chunk in the wrong state, a read outside the cache or a write with no
//! owning chunk are silent skips, reported through
//! [`StageOutcome`](crate::engine_state::pipeline::StageOutcome) and the log.

use std::{fmt, io};

/// Everything that can stop the engine from starting.
#[derive(Debug)]
pub enum EngineError {
    /// One of the chunk dimensions is zero.
    InvalidChunkDimensions {
        /// Configured width in blocks
        width: u8,
        /// Configured length in blocks
        length: u8,
        /// Configured height in blocks
        height: u8,
    },
    /// The view range must fit inside the cache range.
    ViewRangeExceedsCacheRange {
        /// Configured view range in chunks
        view_range: u8,
        /// Configured cache range in chunks
        cache_range: u8,
    },
    /// A task pool without workers would never make progress.
    InvalidWorkerCount(usize),
    /// The cache square holds more blocks than the grid can address.
    GridTooLarge {
        /// Blocks the configuration asks for
        blocks: u64,
        /// Largest grid the engine allocates
        limit: u64,
    },
    /// A required collaborator was never registered.
    MissingCollaborator(&'static str),
    /// The configuration file could not be read.
    ConfigIo(io::Error),
    /// The configuration file is not valid JSON for `EngineConfig`.
    ConfigParse(serde_json::Error),
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidChunkDimensions {
                width,
                length,
                height,
            } => write!(
                f,
                "chunk dimensions must be non-zero, got {width}x{length}x{height}"
            ),
            Self::ViewRangeExceedsCacheRange {
                view_range,
                cache_range,
            } => write!(
                f,
                "view range {view_range} must not exceed cache range {cache_range}"
            ),
            Self::InvalidWorkerCount(count) => {
                write!(f, "task pool needs at least one worker thread, got {count}")
            }
            Self::GridTooLarge { blocks, limit } => write!(
                f,
                "block grid of {blocks} blocks exceeds the limit of {limit}"
            ),
            Self::MissingCollaborator(name) => {
                write!(f, "required collaborator {name} was not registered")
            }
            Self::ConfigIo(error) => write!(f, "could not read engine configuration: {error}"),
            Self::ConfigParse(error) => write!(f, "invalid engine configuration: {error}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ConfigIo(error) => Some(error),
            Self::ConfigParse(error) => Some(error),
            _ => None,
        }
    }
}

impl From<io::Error> for EngineError {
    fn from(error: io::Error) -> Self {
        Self::ConfigIo(error)
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(error: serde_json::Error) -> Self {
        Self::ConfigParse(error)
    }
}
