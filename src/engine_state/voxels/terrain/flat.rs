//! Flat terrain.

use super::{fill_chunk, TerrainGenerator};
use crate::engine_state::voxels::{block::block_type::BlockType, block_grid::BlockGrid, chunk::Chunk};

/// Fills the lowest `thickness` layers with one block type and leaves the rest
/// empty.
#[derive(Clone, Debug)]
pub struct FlatGenerator {
    thickness: i32,
    block_type: BlockType,
}

impl FlatGenerator {
    /// Creates a generator for a floor of `thickness` layers of `block_type`.
    pub fn new(thickness: i32, block_type: BlockType) -> Self {
        Self {
            thickness,
            block_type,
        }
    }
}

impl Default for FlatGenerator {
    fn default() -> Self {
        Self::new(1, BlockType::Rock)
    }
}

impl TerrainGenerator for FlatGenerator {
    fn generate(&self, chunk: &Chunk, grid: &mut BlockGrid) {
        fill_chunk(chunk, grid, |_, y, _| {
            if y < self.thickness {
                self.block_type
            } else {
                BlockType::None
            }
        });
    }

    fn name(&self) -> &'static str {
        "flat"
    }
}
