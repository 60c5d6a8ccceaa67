//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world and the
//! per-type properties the pipeline needs: solidity, transparency and the texture
//! tiles used when a face is emitted.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use super::{block_side::BlockSide, BlockTypeSize};

/// Enumerates all possible block types in the voxel world.
///
/// `None` is air. `Maximum` is a sentinel that marks the number of real types and
/// is never stored in the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum BlockType {
    /// Empty space.
    None = 0,
    /// Plain dirt.
    Dirt,
    /// Dirt with a grass top.
    Grass,
    /// Molten rock.
    Lava,
    /// Tree canopy.
    Leaves,
    /// Decorative flower.
    RedFlower,
    /// Bedrock and stone layers.
    Rock,
    /// Beach sand.
    Sand,
    /// Snow cap.
    Snow,
    /// Tree trunk.
    Tree,
    /// Water; transparent to faces of other blocks.
    Water,
    /// Sentinel, one past the last real type.
    Maximum,
}

/// Texture atlas tile per block type and face, in [`BlockSide::all`] order:
/// `[RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]`.
static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u32; 6]; BlockType::Maximum as usize] = [
    [0, 0, 0, 0, 0, 0],       // None
    [2, 2, 2, 2, 2, 2],       // Dirt
    [3, 3, 1, 2, 3, 3],       // Grass
    [4, 4, 4, 4, 4, 4],       // Lava
    [5, 5, 5, 5, 5, 5],       // Leaves
    [6, 6, 6, 6, 6, 6],       // RedFlower
    [7, 7, 7, 7, 7, 7],       // Rock
    [8, 8, 8, 8, 8, 8],       // Sand
    [9, 9, 10, 2, 9, 9],      // Snow
    [11, 11, 12, 12, 11, 11], // Tree
    [13, 13, 13, 13, 13, 13], // Water
];

impl BlockType {
    /// Converts a stored `BlockTypeSize` back into a `BlockType`.
    ///
    /// Unknown values and the `Maximum` sentinel read as `None`, matching the
    /// "unknown is air" rule used everywhere else in the grid.
    pub fn from_int(btype: BlockTypeSize) -> Self {
        match BlockType::from_u8(btype) {
            Some(BlockType::Maximum) | None => BlockType::None,
            Some(block_type) => block_type,
        }
    }

    /// Whether blocks of this type occupy space.
    pub fn exists(self) -> bool {
        self != BlockType::None
    }

    /// Whether faces of neighbouring blocks stay visible through this type.
    pub fn is_transparent(self) -> bool {
        matches!(self, BlockType::None | BlockType::Water)
    }

    /// Atlas tile for the given face of this block type.
    pub fn texture_index(self, side: BlockSide) -> u32 {
        match self {
            BlockType::Maximum => 0,
            block_type => BLOCK_TYPE_TO_TEXTURE_INDICES[block_type as usize][side as usize],
        }
    }

    /// Picks a random solid type, used by the random terrain generator.
    pub fn random_solid(rng: &mut fastrand::Rng) -> Self {
        BlockType::from_int(rng.u8(1..BlockType::Maximum as u8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_and_unknown_values_read_as_air() {
        assert_eq!(BlockType::from_int(BlockType::Maximum as u8), BlockType::None);
        assert_eq!(BlockType::from_int(200), BlockType::None);
        assert_eq!(BlockType::from_int(BlockType::Water as u8), BlockType::Water);
    }

    #[test]
    fn grass_uses_a_distinct_top_texture() {
        assert_ne!(
            BlockType::Grass.texture_index(BlockSide::TOP),
            BlockType::Grass.texture_index(BlockSide::RIGHT)
        );
    }

    #[test]
    fn random_solid_never_yields_air() {
        let mut rng = fastrand::Rng::with_seed(7);
        for _ in 0..256 {
            assert!(BlockType::random_solid(&mut rng).exists());
        }
    }
}
