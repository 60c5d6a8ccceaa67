#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel Chunk Engine
//!
//! The chunk lifecycle pipeline of a voxel engine: a toroidal block grid around
//! the player, a per-chunk state machine, flood-fill sun and colour lighting and
//! a quad-soup mesh builder with averaged corner lighting.
//!
//! ## Key Modules
//!
//! * `core` - Shared-resource and collaborator-registry primitives
//! * `engine_state` - The pipeline itself: world, lighting, meshing, scheduling
//!
//! ## Architecture
//!
//! The crate does not render, generate terrain or move a player by itself. Those
//! are collaborators registered with an
//! [`MtInjectionSystem`](core::injection_system::MtInjectionSystem) before the
//! [`EngineState`](engine_state::EngineState) is built:
//! * a terrain generator (`TerrainGenerator`)
//! * a buffer device (`BufferDevice`), in CPU memory or on a `wgpu::Device`
//! * a player view (`PlayerView`)
//!
//! ## Usage
//!
//! ```no_run
//! voxel_chunk_engine::init_logging();
//! log::info!("ready");
//! ```
//!
//! ## Performance Considerations
//!
//! * One flat block array for the whole cache, addressed with wrap-around
//! * Explicit worklist light propagation, no recursion
//! * Stages run inline, on one thread per stage, or on a worker pool

pub mod core;
pub mod engine_state;

pub use engine_state::{config::EngineConfig, error::EngineError, EngineState};

/// Initializes `env_logger` writing to stdout, filtered by `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let result = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init();

    if result.is_ok() {
        log::info!("Logger initialized");
    }
}
