//! Perlin height-map terrain.

use noise::{NoiseFn, Perlin};

use super::{fill_chunk, TerrainGenerator};
use crate::engine_state::voxels::{block::block_type::BlockType, block_grid::BlockGrid, chunk::Chunk};

/// Scaling factor applied to world coordinates when sampling Perlin noise.
pub const PERLIN_SCALE_FACTOR: f64 = 0.02;
/// Terrain height at a noise sample of 0, as a fraction of the world height.
pub const BASE_HEIGHT_RATIO: f64 = 0.35;
/// Height swing for a noise sample of +-1, as a fraction of the world height.
pub const AMPLITUDE_RATIO: f64 = 0.2;
/// Water fills empty blocks up to this fraction of the world height.
pub const WATER_LEVEL_RATIO: f64 = 0.3;
/// Surfaces above this fraction of the world height are snow.
pub const SNOW_LINE_RATIO: f64 = 0.5;
/// Dirt layers between the surface block and rock.
pub const DIRT_DEPTH: i32 = 3;

/// Rolling terrain from 2D Perlin noise.
///
/// Columns are rock, then [`DIRT_DEPTH`] layers of dirt, then a surface block:
/// sand at or below the water level, snow above the snow line, grass
/// elsewhere. Empty blocks at or below the water level are water.
pub struct PerlinGenerator {
    perlin: Perlin,
}

impl PerlinGenerator {
    /// Creates a generator; equal seeds give equal terrain.
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Surface height of the column `(x, z)` for a world of `height` blocks.
    pub fn surface_height(&self, x: i32, z: i32, height: i32) -> i32 {
        let sample = self
            .perlin
            .get([x as f64 * PERLIN_SCALE_FACTOR, z as f64 * PERLIN_SCALE_FACTOR]);
        let world_height = height as f64;
        let surface = world_height * BASE_HEIGHT_RATIO + sample * world_height * AMPLITUDE_RATIO;
        (surface as i32).clamp(0, height - 1)
    }
}

impl TerrainGenerator for PerlinGenerator {
    fn generate(&self, chunk: &Chunk, grid: &mut BlockGrid) {
        let height = chunk.height();
        let water_level = (height as f64 * WATER_LEVEL_RATIO) as i32;
        let snow_line = (height as f64 * SNOW_LINE_RATIO) as i32;
        let mut column = (i32::MIN, i32::MIN, 0);

        fill_chunk(chunk, grid, |x, y, z| {
            if (column.0, column.1) != (x, z) {
                column = (x, z, self.surface_height(x, z, height));
            }
            let surface = column.2;

            if y > surface {
                if y <= water_level {
                    BlockType::Water
                } else {
                    BlockType::None
                }
            } else if y == surface {
                if surface <= water_level {
                    BlockType::Sand
                } else if surface > snow_line {
                    BlockType::Snow
                } else {
                    BlockType::Grass
                }
            } else if y >= surface - DIRT_DEPTH {
                BlockType::Dirt
            } else {
                BlockType::Rock
            }
        });
    }

    fn name(&self) -> &'static str {
        "perlin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_seeds_give_equal_heights() {
        let a = PerlinGenerator::new(11);
        let b = PerlinGenerator::new(11);

        for x in -20..20 {
            assert_eq!(a.surface_height(x, 3 * x, 128), b.surface_height(x, 3 * x, 128));
        }
    }

    #[test]
    fn heights_stay_inside_the_world() {
        let generator = PerlinGenerator::new(3);

        for x in -50..50 {
            let height = generator.surface_height(x * 7, x * 13, 16);
            assert!((0..16).contains(&height));
        }
    }
}
