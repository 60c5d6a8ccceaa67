//! # Terrain Generation
//!
//! The pipeline treats terrain generation as an external capability: anything
//! implementing [`TerrainGenerator`] can fill a chunk. Three generators ship with
//! the crate:
//!
//! - [`flat::FlatGenerator`]: a solid floor, useful for tests and benchmarks
//! - [`perlin::PerlinGenerator`]: a 2D Perlin height map with grass, dirt and
//!   rock strata and a water level
//! - [`random::RandomGenerator`]: sparse random blocks over a solid floor
//!
//! Generators run with the grid write lock held and must write every block of
//! the chunk's columns. The grid is toroidal, so the slots still hold whatever
//! chunk used them last.

use super::{
    block::{block_type::BlockType, Block},
    block_grid::BlockGrid,
    chunk::Chunk,
};

pub mod flat;
pub mod perlin;
pub mod random;

/// Fills the blocks of one chunk.
pub trait TerrainGenerator: Send + Sync {
    /// Writes every block of `chunk`'s columns into `grid`.
    fn generate(&self, chunk: &Chunk, grid: &mut BlockGrid);

    /// Short name for logging.
    fn name(&self) -> &'static str;
}

/// Calls `block_for(x, y, z)` for every block of the chunk and writes the result.
pub fn fill_chunk(
    chunk: &Chunk,
    grid: &mut BlockGrid,
    mut block_for: impl FnMut(i32, i32, i32) -> BlockType,
) {
    let origin = chunk.world_position();
    for x in origin.x..origin.x + chunk.width() {
        for z in origin.z..origin.z + chunk.length() {
            for y in 0..chunk.height() {
                grid.fast_set_block_at(x, y, z, Block::new(block_for(x, y, z)));
            }
        }
    }
}
