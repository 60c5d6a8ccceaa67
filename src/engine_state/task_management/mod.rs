//! # Task Management System
//!
//! This module runs pipeline stages off the sweep thread.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: a pool of worker threads, each fed through its own channel
//! - `Task` / `TaskResult`: a unit of work and what it hands back
//! - `scheduler`: the [`ChunkScheduler`](scheduler::ChunkScheduler) strategies
//!   built on top (inline, thread per stage, task pool)
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager hands them to workers round-robin, one in flight per worker
//! 3. Tasks that find every worker busy wait in a FIFO queue
//! 4. `process_completed_tasks()` collects results and calls their handlers
//! 5. `process_queued_tasks()` moves waiting tasks to workers that freed up
//!
//! ## Performance Considerations
//! - **Task Granularity**: one stage of one chunk per task
//! - **Blocking**: stages take the grid lock, so lighting and generation
//!   serialize while meshing runs in parallel

pub mod scheduler;
pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use task::{Task, TaskResult};

/// A communication channel between the publishing thread and one worker.
#[derive(Debug)]
struct TaskChannel {
    task_sender: Option<Sender<Box<dyn Task + Send>>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: Option<JoinHandle<()>>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// Dropping the manager closes every channel and joins the workers once they
/// finish the task they are running.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        log::info!(
            "Starting {} task workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: Some(task_tx),
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                worker: Some(worker),
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Tasks waiting for a free worker.
    pub fn queued_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Tasks handed to workers whose results were not collected yet.
    pub fn in_flight_count(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.in_flight_count() == 0
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the worker is gone, giving the task back
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        let channel = &mut self.channels[channel_idx];
        let Some(sender) = &channel.task_sender else {
            return Err(task);
        };

        match sender.send(task) {
            Ok(_) => {
                channel.num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds the next worker channel, round-robin from the last used one, that
    /// can accept a task.
    fn find_available_channel(&self) -> Option<usize> {
        let len = self.channels.len();
        (0..len)
            .map(|offset| (self.current_channel + offset) % len)
            .find(|&index| self.channels[index].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(()) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    log::warn!("Task worker {} is gone; queueing task", channel_idx);
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks to free workers, oldest first, until either runs out.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };

            match self.try_send_task(task, channel_idx) {
                Ok(()) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Collects every finished result and runs its handler.
    ///
    /// # Returns
    /// The number of results handled
    pub fn process_completed_tasks(&mut self) -> usize {
        let mut handled = 0;
        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
                result.handle_result();
                handled += 1;
            }
        }
        handled
    }

    /// Closes every channel and joins the workers. Queued tasks are dropped.
    pub fn shutdown(&mut self) {
        self.queued_tasks.clear();
        for channel in &mut self.channels {
            channel.task_sender = None;
        }
        for channel in &mut self.channels {
            if let Some(worker) = channel.worker.take() {
                if worker.join().is_err() {
                    log::warn!("A task worker panicked");
                }
            }
        }
        self.process_completed_tasks();
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
