//! Sun and colour light propagation over the block grid.

mod common;

use std::sync::Arc;

use common::small_config;
use voxel_chunk_engine::engine_state::{
    config::{EngineConfig, MAX_SUN_VALUE},
    lighting::{attenuate, LightChannel, LightingEngine},
    voxels::{
        block::{block_type::BlockType, Block},
        chunk::ChunkCoord,
        terrain::{flat::FlatGenerator, perlin::PerlinGenerator, TerrainGenerator},
        world::World,
    },
};

fn single_chunk_world(config: EngineConfig) -> Arc<World> {
    Arc::new(World::new(Arc::new(config)))
}

#[test]
fn open_sky_over_a_floor() {
    let world = single_chunk_world(small_config(0, 0));
    let chunk = world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();
    let lighting = LightingEngine::new(world.clone());

    let mut grid = world.grid().get_mut();
    FlatGenerator::default().generate(&chunk, &mut grid);
    lighting.light_chunk(&chunk, &mut grid);

    for x in 0..4 {
        for z in 0..4 {
            assert_eq!(grid.block_at(x, 0, z).sun, 0);
            for y in 1..8 {
                assert_eq!(grid.block_at(x, y, z).sun, MAX_SUN_VALUE);
            }
        }
    }
}

#[test]
fn light_leaks_sideways_under_a_roof() {
    let config = EngineConfig {
        chunk_width: 8,
        chunk_length: 1,
        ..small_config(0, 0)
    };
    let world = single_chunk_world(config);
    let chunk = world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();
    let lighting = LightingEngine::new(world.clone());

    let mut grid = world.grid().get_mut();
    FlatGenerator::default().generate(&chunk, &mut grid);
    for x in 0..4 {
        grid.set_block_at(x, 4, 0, Block::new(BlockType::Rock));
    }
    lighting.light_chunk(&chunk, &mut grid);

    let under_roof: Vec<u8> = (0..5).map(|x| grid.block_at(x, 2, 0).sun).collect();
    assert_eq!(under_roof, vec![9, 10, 12, 14, 16]);
    assert_eq!(grid.block_at(1, 4, 0).sun, 0);
    assert_eq!(grid.block_at(1, 5, 0).sun, MAX_SUN_VALUE);
}

#[test]
fn lit_grid_is_a_fixpoint() {
    let config = EngineConfig {
        chunk_width: 8,
        chunk_length: 8,
        chunk_height: 32,
        ..small_config(0, 0)
    };
    let world = single_chunk_world(config);
    let chunk = world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();
    let lighting = LightingEngine::new(world.clone());

    let mut grid = world.grid().get_mut();
    PerlinGenerator::new(7).generate(&chunk, &mut grid);
    lighting.light_chunk(&chunk, &mut grid);

    let neighbours = [(1, 0, 0), (-1, 0, 0), (0, 0, 1), (0, 0, -1), (0, -1, 0)];
    for x in 0..8 {
        for z in 0..8 {
            for y in 0..32 {
                let block = grid.block_at(x, y, z);
                assert!(block.sun <= MAX_SUN_VALUE);
                if block.exists() {
                    assert_eq!(block.sun, 0, "solid block at ({x}, {y}, {z}) is lit");
                    continue;
                }

                for (dx, dy, dz) in neighbours {
                    let (nx, ny, nz) = (x + dx, y + dy, z + dz);
                    if !grid.in_bounds(nx, ny, nz) {
                        continue;
                    }
                    let neighbour = grid.block_at(nx, ny, nz);
                    if !neighbour.exists() {
                        assert!(
                            neighbour.sun >= attenuate(block.sun),
                            "({nx}, {ny}, {nz}) darker than its source at ({x}, {y}, {z})"
                        );
                    }
                }
            }
        }
    }
}

#[test]
fn placed_light_never_rises() {
    let world = single_chunk_world(small_config(0, 0));
    world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();

    let mut grid = world.grid().get_mut();
    assert!(LightingEngine::propagate_from(
        &mut grid,
        LightChannel::Red,
        2,
        2,
        2,
        MAX_SUN_VALUE
    ));

    assert_eq!(grid.block_at(2, 2, 2).r, 16);
    assert_eq!(grid.block_at(3, 2, 2).r, 14);
    assert_eq!(grid.block_at(2, 1, 2).r, 14);
    assert_eq!(grid.block_at(2, 0, 2).r, 12);
    for x in 0..4 {
        for z in 0..4 {
            for y in 3..8 {
                assert_eq!(grid.block_at(x, y, z).r, 0);
            }
        }
    }
    assert_eq!(grid.block_at(2, 2, 2).g, 0);
}

#[test]
fn placed_light_is_rejected_where_it_cannot_go() {
    let world = single_chunk_world(small_config(0, 0));
    world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();

    let mut grid = world.grid().get_mut();
    grid.set_block_at(1, 1, 1, Block::new(BlockType::Rock));

    assert!(!LightingEngine::propagate_from(&mut grid, LightChannel::Blue, 1, 1, 1, 10));
    assert!(!LightingEngine::propagate_from(&mut grid, LightChannel::Blue, -1, 1, 1, 10));
    assert!(!LightingEngine::propagate_from(&mut grid, LightChannel::Blue, 1, 9, 1, 10));

    assert!(LightingEngine::propagate_from(&mut grid, LightChannel::Blue, 0, 1, 0, 10));
    assert!(!LightingEngine::propagate_from(&mut grid, LightChannel::Blue, 0, 1, 0, 8));
    assert!(LightingEngine::propagate_from(&mut grid, LightChannel::Blue, 0, 1, 0, 200));
    assert_eq!(grid.block_at(0, 1, 0).b, MAX_SUN_VALUE);
}

#[test]
fn relighting_clears_placed_colour() {
    let world = single_chunk_world(small_config(0, 0));
    let chunk = world.add_chunk_at(ChunkCoord::new(0, 0)).unwrap();
    let lighting = LightingEngine::new(world.clone());

    let mut grid = world.grid().get_mut();
    FlatGenerator::default().generate(&chunk, &mut grid);
    LightingEngine::propagate_from(&mut grid, LightChannel::Green, 1, 3, 1, 12);
    assert_eq!(grid.block_at(1, 3, 1).g, 12);

    lighting.light_chunk(&chunk, &mut grid);
    assert_eq!(grid.block_at(1, 3, 1).g, 0);
    assert_eq!(grid.block_at(2, 3, 1).g, 0);
}
