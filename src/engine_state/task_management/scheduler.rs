//! # Chunk Schedulers
//!
//! The sweep loop decides *which* stage a chunk needs; a [`ChunkScheduler`]
//! decides *where* it runs. All strategies share one interface,
//! `submit(chunk, stage)`, and the strategy is picked from
//! [`ConcurrencyStrategy`] at startup.
//!
//! - [`InlineScheduler`]: runs the stage on the sweep thread
//! - [`StagedScheduler`]: one thread per stage, each fed by its own channel
//! - [`TaskPoolScheduler`]: any stage on any worker of a [`TaskManager`]
//!
//! The threaded strategies claim a chunk with [`Chunk::try_mark_queued`] before
//! queueing it, so the busy sweep loop cannot queue the same chunk twice. The
//! claim is released once the stage has run.

use std::{
    sync::{
        mpsc::{channel, Sender},
        Arc,
    },
    thread::{self, JoinHandle},
};

use super::{task::ChunkStageTask, TaskManager};
use crate::engine_state::{
    config::{ConcurrencyStrategy, EngineConfig},
    pipeline::{ChunkPipeline, PipelineStage},
    voxels::chunk::Chunk,
};

/// Runs pipeline stages for the sweep loop.
pub trait ChunkScheduler: Send {
    /// Requests `stage` for `chunk`.
    ///
    /// # Returns
    /// `true` if the stage ran or was queued, `false` if the chunk already has
    /// a stage pending
    fn submit(&mut self, chunk: Arc<Chunk>, stage: PipelineStage) -> bool;

    /// Called once per sweep to move work along.
    fn pump(&mut self) {}

    /// Stops any worker threads. Pending work is dropped.
    fn shutdown(&mut self) {}

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Builds the scheduler selected by `config.concurrency`.
pub fn create_scheduler(
    config: &EngineConfig,
    pipeline: Arc<ChunkPipeline>,
) -> Box<dyn ChunkScheduler> {
    let scheduler: Box<dyn ChunkScheduler> = match config.concurrency {
        ConcurrencyStrategy::Inline => Box::new(InlineScheduler::new(pipeline)),
        ConcurrencyStrategy::Staged => Box::new(StagedScheduler::new(pipeline)),
        ConcurrencyStrategy::TaskPool => {
            Box::new(TaskPoolScheduler::new(pipeline, config.worker_threads))
        }
    };
    log::info!("Using {} chunk scheduler", scheduler.name());
    scheduler
}

/// Runs every stage immediately on the calling thread.
pub struct InlineScheduler {
    pipeline: Arc<ChunkPipeline>,
}

impl InlineScheduler {
    /// Creates an inline scheduler.
    pub fn new(pipeline: Arc<ChunkPipeline>) -> Self {
        Self { pipeline }
    }
}

impl ChunkScheduler for InlineScheduler {
    fn submit(&mut self, chunk: Arc<Chunk>, stage: PipelineStage) -> bool {
        self.pipeline.run(&chunk, stage);
        true
    }

    fn name(&self) -> &'static str {
        "inline"
    }
}

struct StageWorker {
    sender: Option<Sender<Arc<Chunk>>>,
    handle: Option<JoinHandle<()>>,
}

/// One dedicated thread per pipeline stage.
///
/// Stages of different chunks overlap; stages of one chunk stay ordered because
/// each stage only accepts the state the previous one leaves behind.
pub struct StagedScheduler {
    workers: Vec<StageWorker>,
}

impl StagedScheduler {
    /// Spawns the generate, light and build threads.
    pub fn new(pipeline: Arc<ChunkPipeline>) -> Self {
        let workers = PipelineStage::ALL
            .into_iter()
            .map(|stage| {
                let (sender, receiver) = channel::<Arc<Chunk>>();
                let pipeline = pipeline.clone();
                let handle = thread::spawn(move || {
                    while let Ok(chunk) = receiver.recv() {
                        pipeline.run(&chunk, stage);
                        chunk.clear_queued();
                    }
                    log::debug!("{:?} stage thread stopped", stage);
                });

                StageWorker {
                    sender: Some(sender),
                    handle: Some(handle),
                }
            })
            .collect();

        Self { workers }
    }

    fn worker_index(stage: PipelineStage) -> usize {
        match stage {
            PipelineStage::Generate => 0,
            PipelineStage::Light => 1,
            PipelineStage::Build => 2,
        }
    }
}

impl ChunkScheduler for StagedScheduler {
    fn submit(&mut self, chunk: Arc<Chunk>, stage: PipelineStage) -> bool {
        if !chunk.try_mark_queued() {
            return false;
        }

        let worker = &self.workers[Self::worker_index(stage)];
        let sent = match &worker.sender {
            Some(sender) => sender.send(chunk.clone()).is_ok(),
            None => false,
        };

        if !sent {
            chunk.clear_queued();
            log::warn!("{:?} stage thread is gone; dropped chunk {:?}", stage, chunk.coord());
        }
        sent
    }

    fn shutdown(&mut self) {
        for worker in &mut self.workers {
            worker.sender = None;
        }
        for worker in &mut self.workers {
            if let Some(handle) = worker.handle.take() {
                if handle.join().is_err() {
                    log::warn!("A stage thread panicked");
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "staged"
    }
}

impl Drop for StagedScheduler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Any stage on any worker of a round-robin task pool.
pub struct TaskPoolScheduler {
    pipeline: Arc<ChunkPipeline>,
    manager: TaskManager,
}

impl TaskPoolScheduler {
    /// Spawns `workers` pool threads.
    pub fn new(pipeline: Arc<ChunkPipeline>, workers: usize) -> Self {
        Self {
            pipeline,
            manager: TaskManager::new(workers),
        }
    }
}

impl ChunkScheduler for TaskPoolScheduler {
    fn submit(&mut self, chunk: Arc<Chunk>, stage: PipelineStage) -> bool {
        if !chunk.try_mark_queued() {
            return false;
        }

        self.manager.publish_task(Box::new(ChunkStageTask::new(
            self.pipeline.clone(),
            chunk,
            stage,
        )));
        true
    }

    fn pump(&mut self) {
        self.manager.process_completed_tasks();
        self.manager.process_queued_tasks();
    }

    fn shutdown(&mut self) {
        self.manager.shutdown();
    }

    fn name(&self) -> &'static str {
        "task pool"
    }
}
