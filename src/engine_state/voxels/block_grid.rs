//! # Block Grid
//!
//! Flat storage for every block inside the cache square around the player.
//!
//! ## Architecture
//! The grid is a single `Vec<Block>` of
//! `cache_width * cache_length * chunk_height` entries. World X/Z coordinates are
//! wrapped into the cache with `rem_euclid` before flattening, so the storage is a
//! torus: once a chunk leaves the cache square and another enters, the newcomer
//! reuses the same slots. Which world chunk currently owns a slot is decided by
//! the chunk registry, never by the grid.
//!
//! Index layout: `wrap_x * x_step + wrap_z * z_step + y` with
//! `x_step = cache_length * height` and `z_step = height`, so a column is
//! contiguous in memory.
//!
//! ## Performance Considerations
//! - `fast_*` accessors skip the cache bounds check for callers that already
//!   proved membership (a chunk writing its own columns)
//! - Index based accessors let the lighting worklist avoid recomputing the wrap

use super::block::Block;
use crate::engine_state::config::EngineConfig;

/// The block-space rectangle currently backed by the grid.
///
/// `min` is inclusive and `max` exclusive on both axes. Y is always
/// `0..height`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridBounds {
    /// Lowest X inside the cache.
    pub min_x: i32,
    /// Lowest Z inside the cache.
    pub min_z: i32,
    /// One past the highest X inside the cache.
    pub max_x: i32,
    /// One past the highest Z inside the cache.
    pub max_z: i32,
}

impl GridBounds {
    /// Cache square centred on chunk `(chunk_x, chunk_z)`.
    pub fn around_chunk(config: &EngineConfig, chunk_x: i32, chunk_z: i32) -> Self {
        let range = config.cache_range as i32;
        Self {
            min_x: (chunk_x - range) * config.width(),
            min_z: (chunk_z - range) * config.length(),
            max_x: (chunk_x + range + 1) * config.width(),
            max_z: (chunk_z + range + 1) * config.length(),
        }
    }

    /// Whether the X/Z column lies inside the cache.
    pub fn contains_column(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x < self.max_x && z >= self.min_z && z < self.max_z
    }
}

/// Toroidal block storage for the cache square.
pub struct BlockGrid {
    blocks: Vec<Block>,
    cache_width: i32,
    cache_length: i32,
    height: i32,
    x_step: usize,
    z_step: usize,
    bounds: GridBounds,
}

impl BlockGrid {
    /// Allocates an empty grid sized for the configured cache square, centred on
    /// chunk `(0, 0)`.
    ///
    /// The configuration must have passed [`EngineConfig::validate`], which
    /// caps the block count at
    /// [`MAX_GRID_BLOCKS`](crate::engine_state::config::MAX_GRID_BLOCKS).
    pub fn new(config: &EngineConfig) -> Self {
        let cache_width = config.cache_width_in_blocks();
        let cache_length = config.cache_length_in_blocks();
        let height = config.height();
        let len = config.grid_block_count() as usize;

        log::debug!(
            "Allocating block grid {}x{}x{} ({} blocks)",
            cache_width,
            cache_length,
            height,
            len
        );

        Self {
            blocks: vec![Block::EMPTY; len],
            cache_width,
            cache_length,
            height,
            x_step: cache_length as usize * height as usize,
            z_step: height as usize,
            bounds: GridBounds::around_chunk(config, 0, 0),
        }
    }

    /// Flattened index of a world coordinate.
    ///
    /// X and Z wrap around the cache; `y` must already be in `0..height`.
    #[inline]
    pub fn index(&self, x: i32, y: i32, z: i32) -> usize {
        let wrap_x = x.rem_euclid(self.cache_width) as usize;
        let wrap_z = z.rem_euclid(self.cache_length) as usize;
        wrap_x * self.x_step + wrap_z * self.z_step + y as usize
    }

    /// Whether a world coordinate lies inside the cache square and the world
    /// height.
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32, z: i32) -> bool {
        y >= 0 && y < self.height && self.bounds.contains_column(x, z)
    }

    /// Bounds-checked read. Anything outside the cache reads as
    /// [`Block::EMPTY`].
    pub fn block_at(&self, x: i32, y: i32, z: i32) -> Block {
        if self.in_bounds(x, y, z) {
            self.blocks[self.index(x, y, z)]
        } else {
            Block::EMPTY
        }
    }

    /// Bounds-checked write. Returns `false` and leaves the grid untouched when
    /// the coordinate is outside the cache.
    pub fn set_block_at(&mut self, x: i32, y: i32, z: i32, block: Block) -> bool {
        if !self.in_bounds(x, y, z) {
            return false;
        }
        let index = self.index(x, y, z);
        self.blocks[index] = block;
        true
    }

    /// Read without the cache bounds check.
    #[inline]
    pub fn fast_block_at(&self, x: i32, y: i32, z: i32) -> Block {
        self.blocks[self.index(x, y, z)]
    }

    /// Write without the cache bounds check.
    #[inline]
    pub fn fast_set_block_at(&mut self, x: i32, y: i32, z: i32, block: Block) {
        let index = self.index(x, y, z);
        self.blocks[index] = block;
    }

    /// Mutable access to a block by flattened index.
    #[inline]
    pub fn block_mut_at_index(&mut self, index: usize) -> &mut Block {
        &mut self.blocks[index]
    }

    /// Moves the cache square so it is centred on chunk `(chunk_x, chunk_z)`.
    ///
    /// Storage is not touched; slots that now belong to a different chunk are
    /// overwritten when that chunk is generated.
    pub fn recenter(&mut self, config: &EngineConfig, chunk_x: i32, chunk_z: i32) {
        let bounds = GridBounds::around_chunk(config, chunk_x, chunk_z);
        if bounds != self.bounds {
            log::trace!("Block grid recentred on chunk ({}, {})", chunk_x, chunk_z);
            self.bounds = bounds;
        }
    }

    /// The rectangle currently backed by the grid.
    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    /// World height in blocks.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Cache size along X in blocks.
    pub fn cache_width(&self) -> i32 {
        self.cache_width
    }

    /// Cache size along Z in blocks.
    pub fn cache_length(&self) -> i32 {
        self.cache_length
    }

    /// Total number of block slots.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the grid has no slots. Never true for a validated configuration.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    fn small_config() -> EngineConfig {
        EngineConfig {
            chunk_width: 4,
            chunk_length: 2,
            chunk_height: 8,
            cache_range: 1,
            view_range: 1,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn steps_are_derived_from_configuration() {
        let grid = BlockGrid::new(&small_config());

        assert_eq!(grid.cache_width(), 12);
        assert_eq!(grid.cache_length(), 6);
        assert_eq!(grid.len(), 12 * 6 * 8);
        assert_eq!(grid.index(1, 0, 0), 6 * 8);
        assert_eq!(grid.index(0, 0, 1), 8);
        assert_eq!(grid.index(0, 3, 0), 3);
    }

    #[test]
    fn addressing_wraps_in_both_directions() {
        let grid = BlockGrid::new(&small_config());

        for x in -30..30 {
            for z in -15..15 {
                let expected = grid.index(x, 2, z);
                for k in -2..=2 {
                    for m in -2..=2 {
                        assert_eq!(grid.index(x + k * 12, 2, z + m * 6), expected);
                    }
                }
            }
        }
    }

    #[test]
    fn negative_coordinates_stay_inside_storage() {
        let grid = BlockGrid::new(&small_config());

        assert_eq!(grid.index(-1, 0, -1), 11 * 48 + 5 * 8);
        assert!(grid.index(-12345, 7, -999) < grid.len());
    }

    #[test]
    fn reads_outside_cache_are_empty_and_writes_are_dropped() {
        let mut grid = BlockGrid::new(&small_config());
        let rock = Block::new(BlockType::Rock);

        // Cache around chunk (0, 0) spans x in -4..8 and z in -2..4.
        assert!(grid.set_block_at(-4, 0, -2, rock));
        assert_eq!(grid.block_at(-4, 0, -2), rock);

        assert!(!grid.set_block_at(8, 0, 0, rock));
        assert_eq!(grid.block_at(8, 0, 0), Block::EMPTY);
        assert_eq!(grid.block_at(0, -1, 0), Block::EMPTY);
        assert_eq!(grid.block_at(0, 8, 0), Block::EMPTY);

        // The aliased slot of (8, 0, 0) is (-4, 0, 0), which was never written.
        assert_eq!(grid.fast_block_at(8, 0, 0), Block::EMPTY);
    }

    #[test]
    fn recenter_moves_the_readable_window() {
        let config = small_config();
        let mut grid = BlockGrid::new(&config);
        grid.fast_set_block_at(9, 1, 0, Block::new(BlockType::Sand));

        assert_eq!(grid.block_at(9, 1, 0), Block::EMPTY);
        grid.recenter(&config, 1, 0);
        assert_eq!(grid.block_at(9, 1, 0).get_type(), BlockType::Sand);
        assert_eq!(
            grid.bounds(),
            GridBounds {
                min_x: 0,
                min_z: -2,
                max_x: 12,
                max_z: 4
            }
        );
    }
}
