//! Random terrain.

use super::{fill_chunk, TerrainGenerator};
use crate::engine_state::voxels::{block::block_type::BlockType, block_grid::BlockGrid, chunk::Chunk};

/// Fraction of blocks above the floor that stay empty.
pub const SPARSENESS: f64 = 0.9;

/// Sparse random blocks of random solid types over a one-block floor.
///
/// Blocks are only placed in the lower half of the world. Each chunk draws from
/// its own generator seeded with the world seed and the chunk coordinate, so a
/// chunk looks the same every time it is generated.
#[derive(Clone, Debug)]
pub struct RandomGenerator {
    seed: u32,
}

impl RandomGenerator {
    /// Creates a generator for the given world seed.
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    fn chunk_seed(&self, chunk: &Chunk) -> u64 {
        let coord = chunk.coord();
        ((self.seed as u64) << 32)
            ^ ((coord.x as u32 as u64) << 16)
            ^ (coord.z as u32 as u64).rotate_left(40)
    }
}

impl TerrainGenerator for RandomGenerator {
    fn generate(&self, chunk: &Chunk, grid: &mut BlockGrid) {
        let mut rng = fastrand::Rng::with_seed(self.chunk_seed(chunk));
        let ceiling = chunk.height() / 2;

        fill_chunk(chunk, grid, |_, y, _| {
            if y == 0 {
                BlockType::Rock
            } else if y < ceiling && rng.f64() >= SPARSENESS {
                BlockType::random_solid(&mut rng)
            } else {
                BlockType::None
            }
        });
    }

    fn name(&self) -> &'static str {
        "random"
    }
}
