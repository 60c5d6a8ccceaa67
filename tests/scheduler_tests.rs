//! The threaded schedulers driving the sweep loop to a fully built view square.

mod common;

use std::{thread, time::Duration};

use cgmath::Point3;
use common::{injector_with, small_config};
use voxel_chunk_engine::{
    engine_state::{config::ConcurrencyStrategy, voxels::chunk::ChunkState},
    EngineConfig, EngineState,
};
use web_time::Instant;

const TIMEOUT: Duration = Duration::from_secs(20);

fn wait_until(mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + TIMEOUT;
    while Instant::now() < deadline {
        if done() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

fn settled_states(engine: &EngineState) -> Option<(usize, usize)> {
    let states: Vec<ChunkState> = engine
        .world()
        .chunks()
        .values()
        .iter()
        .map(|chunk| chunk.state())
        .collect();
    let ready = states.iter().filter(|state| **state == ChunkState::Ready).count();
    let lit_only = states
        .iter()
        .filter(|state| **state == ChunkState::AwaitingBuild)
        .count();
    (ready + lit_only == states.len()).then_some((ready, lit_only))
}

fn run_threaded(concurrency: ConcurrencyStrategy) {
    let config = EngineConfig {
        concurrency,
        ..small_config(2, 1)
    };
    let (injector, _player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();

    assert!(engine.start());
    assert!(!engine.start());
    assert!(engine.is_running());
    assert!(engine.tick().is_none());

    assert!(wait_until(|| settled_states(&engine) == Some((9, 16))));
    assert_eq!(engine.draw_list(|_| true).len(), 9);
    engine.stop();
    assert!(!engine.is_running());
    assert_eq!(engine.stats().generated, 25);
}

#[test]
fn staged_scheduler_builds_the_view_square() {
    run_threaded(ConcurrencyStrategy::Staged);
}

#[test]
fn task_pool_scheduler_builds_the_view_square() {
    run_threaded(ConcurrencyStrategy::TaskPool);
}

#[test]
fn engine_restarts_after_stop() {
    let config = small_config(1, 1);
    let (injector, player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();

    engine.start();
    assert!(wait_until(|| engine.draw_list(|_| true).len() == 9));
    engine.stop();

    player.set_position(Point3::new(-2.0, 4.0, 2.0));
    assert!(engine.tick().is_some());
    assert_eq!(engine.stats().evicted, 3);
    assert!(engine.start());
    assert!(wait_until(|| engine.draw_list(|_| true).len() == 9));
    engine.stop();

    assert!(engine.draw_list(|_| true).iter().all(|item| item.coord.x <= 0));
}
