//! # Task System Core Traits
//!
//! This module defines the fundamental building blocks of the task system and the
//! one task the chunk pipeline publishes.
//!
//! ## Core Components
//! - `Task`: Represents a unit of work that can be executed on a worker thread
//! - `TaskResult`: Represents the result of a completed task
//! - `ChunkStageTask`: Runs one pipeline stage on one chunk
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` is called by whoever pumps the manager
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - `TaskResult` must be `Send` to be transferred back
//! - All shared state must be properly synchronized

use std::sync::Arc;

use crate::engine_state::{
    pipeline::{ChunkPipeline, PipelineStage, StageOutcome},
    voxels::chunk::Chunk,
};

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own everything they need; nothing is borrowed from the publishing
/// thread.
pub trait Task: Send {
    /// Processes the task and returns a result.
    ///
    /// # Returns
    /// A boxed `TaskResult` handed back to the publishing side.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The result of processing a `Task`.
pub trait TaskResult: Send {
    /// Handles the result on the thread that pumps the task manager.
    fn handle_result(self: Box<Self>);
}

/// Runs one pipeline stage on one chunk.
pub struct ChunkStageTask {
    pipeline: Arc<ChunkPipeline>,
    chunk: Arc<Chunk>,
    stage: PipelineStage,
}

impl ChunkStageTask {
    /// Creates a task for `stage` on `chunk`.
    pub fn new(pipeline: Arc<ChunkPipeline>, chunk: Arc<Chunk>, stage: PipelineStage) -> Self {
        Self {
            pipeline,
            chunk,
            stage,
        }
    }
}

impl Task for ChunkStageTask {
    fn process(&self) -> Box<dyn TaskResult + Send> {
        let outcome = self.pipeline.run(&self.chunk, self.stage);
        Box::new(ChunkStageResult {
            chunk: self.chunk.clone(),
            stage: self.stage,
            outcome,
        })
    }
}

/// Outcome of a [`ChunkStageTask`].
pub struct ChunkStageResult {
    chunk: Arc<Chunk>,
    stage: PipelineStage,
    outcome: StageOutcome,
}

impl TaskResult for ChunkStageResult {
    fn handle_result(self: Box<Self>) {
        self.chunk.clear_queued();
        log::trace!(
            "{:?} of chunk {:?} finished: {:?}",
            self.stage,
            self.chunk.coord(),
            self.outcome
        );
    }
}
