//! Classification, eviction and startup of the chunk cache.

mod common;

use std::{collections::HashSet, sync::Arc};

use cgmath::Point3;
use common::{injector_with, small_config};
use voxel_chunk_engine::{
    core::injection_system::MtInjectionSystem,
    engine_state::{
        config::EngineConfig,
        rendering::buffers::{BufferDevice, HostBufferDevice},
        voxels::{
            chunk::{ChunkCoord, ChunkState},
            terrain::{flat::FlatGenerator, TerrainGenerator},
        },
    },
    EngineError, EngineState,
};

fn coords(engine: &EngineState) -> HashSet<ChunkCoord> {
    engine
        .world()
        .chunks()
        .values()
        .iter()
        .map(|chunk| chunk.coord())
        .collect()
}

fn square(center: ChunkCoord, range: i32) -> HashSet<ChunkCoord> {
    let mut square = HashSet::new();
    for x in center.x - range..=center.x + range {
        for z in center.z - range..=center.z + range {
            square.insert(ChunkCoord::new(x, z));
        }
    }
    square
}

#[test]
fn startup_creates_the_cache_square() {
    let config = small_config(2, 1);
    let (injector, _player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let engine = EngineState::new(config, &injector).unwrap();

    assert_eq!(coords(&engine), square(ChunkCoord::new(0, 0), 2));
    assert!(engine
        .world()
        .chunks()
        .values()
        .iter()
        .all(|chunk| chunk.state() == ChunkState::AwaitingGenerate));
}

#[test]
fn only_the_view_square_is_meshed() {
    let config = small_config(2, 1);
    let (injector, _player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();

    for _ in 0..10 {
        engine.tick();
    }

    let drawn: HashSet<ChunkCoord> = engine
        .draw_list(|_| true)
        .iter()
        .map(|item| item.coord)
        .collect();
    assert_eq!(drawn, square(ChunkCoord::new(0, 0), 1));

    for chunk in engine.world().chunks().values() {
        if !drawn.contains(&chunk.coord()) {
            assert_eq!(chunk.state(), ChunkState::AwaitingBuild);
        }
    }
}

#[test]
fn draw_list_applies_the_cull_predicate() {
    let config = small_config(1, 1);
    let (injector, _player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();
    for _ in 0..8 {
        engine.tick();
    }

    let east_only = engine.draw_list(|bounds| bounds.min.x >= 4.0);
    assert_eq!(east_only.len(), 3);
    assert!(engine.draw_list(|_| false).is_empty());
}

#[test]
fn moving_evicts_the_trailing_edge() {
    let config = small_config(1, 1);
    let (injector, player, device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();
    for _ in 0..8 {
        engine.tick();
    }
    assert_eq!(engine.draw_list(|_| true).len(), 9);
    let live_before = device.live_buffers();

    player.set_position(Point3::new(6.0, 4.0, 2.0));
    let report = engine.tick().unwrap();
    assert!(report.classified);
    assert_eq!(report.evicted, 3);
    assert_eq!(report.created, 3);
    assert_eq!(coords(&engine), square(ChunkCoord::new(1, 0), 1));
    assert_eq!(device.live_buffers(), live_before - 6);

    for _ in 0..10 {
        engine.tick();
    }
    assert_eq!(engine.draw_list(|_| true).len(), 9);
    assert_eq!(engine.stats().evicted, 3);
}

#[test]
fn chunks_left_in_the_cache_ring_are_not_drawn() {
    let config = small_config(2, 1);
    let (injector, player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));
    let mut engine = EngineState::new(config, &injector).unwrap();
    for _ in 0..10 {
        engine.tick();
    }

    player.set_position(Point3::new(6.0, 4.0, 2.0));
    for _ in 0..10 {
        engine.tick();
    }

    let trailing = engine
        .world()
        .chunks()
        .get(ChunkCoord::new(-1, 0))
        .unwrap();
    assert_eq!(trailing.state(), ChunkState::Ready);

    let drawn: HashSet<ChunkCoord> = engine
        .draw_list(|_| true)
        .iter()
        .map(|item| item.coord)
        .collect();
    assert_eq!(drawn, square(ChunkCoord::new(1, 0), 1));
}

#[test]
fn player_outside_a_finite_world_stalls_classification() {
    let config = EngineConfig {
        infinite: false,
        ..small_config(1, 1)
    };
    let (injector, _player, _device) = injector_with(&config, Point3::new(400.0, 4.0, 400.0));
    let mut engine = EngineState::new(config, &injector).unwrap();

    let report = engine.tick().unwrap();
    assert!(!report.classified);
    assert!(!report.did_work());
    assert_eq!(coords(&engine), square(ChunkCoord::new(0, 0), 1));
    assert_eq!(engine.stats().generated, 0);
}

#[test]
fn invalid_ranges_fail_startup() {
    let config = small_config(1, 2);
    let (injector, _player, _device) = injector_with(&config, Point3::new(2.0, 4.0, 2.0));

    assert!(matches!(
        EngineState::new(config, &injector),
        Err(EngineError::ViewRangeExceedsCacheRange {
            view_range: 2,
            cache_range: 1
        })
    ));
}

#[test]
fn missing_collaborator_fails_startup() {
    let config = small_config(1, 1);
    let injector = MtInjectionSystem::new();
    injector.insert::<Arc<dyn TerrainGenerator>>(Arc::new(FlatGenerator::default()));
    injector.insert::<Arc<dyn BufferDevice>>(Arc::new(HostBufferDevice::new()));

    assert!(matches!(
        EngineState::new(config, &injector),
        Err(EngineError::MissingCollaborator(_))
    ));
}
