//! # Chunk Module
//!
//! A chunk is a `width x height x length` column of blocks and the unit of
//! generation, lighting, meshing and culling. The blocks themselves live in the
//! shared [`BlockGrid`]; a chunk only carries metadata:
//!
//! - its relative position and the derived world position
//! - its pipeline state ([`ChunkState`])
//! - vertical occupancy hints that bound the mesh scan
//! - its bounding box, tightened after every build
//! - its mesh and the buffers uploaded from it
//!
//! ## Thread Safety
//!
//! Chunks are shared as `Arc<Chunk>` between the sweep thread, stage workers and
//! the renderer. The state is atomic, the mesh sits behind an `RwLock` and the
//! height hints and bounding box behind a `Mutex`. Disposal flips an atomic flag
//! exactly once; every stage checks it before touching the chunk.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard,
};

use cgmath::Point3;

use super::{block_grid::BlockGrid, bounds::Aabb};
use crate::engine_state::{config::EngineConfig, rendering::meshing::mesh::ChunkMesh};

pub mod chunk_state;

pub use chunk_state::{AtomicChunkState, ChunkState};

/// Relative chunk position, in chunks.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    /// Position along X in chunks
    pub x: i32,
    /// Position along Z in chunks
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a coordinate.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Chunk containing the world-space block column `(x, z)`.
    pub fn containing_block(config: &EngineConfig, x: i32, z: i32) -> Self {
        Self {
            x: x.div_euclid(config.width()),
            z: z.div_euclid(config.length()),
        }
    }

    /// Chunk containing a world-space position.
    pub fn containing_position(config: &EngineConfig, position: Point3<f32>) -> Self {
        Self::containing_block(config, position.x.floor() as i32, position.z.floor() as i32)
    }

    /// The four chunks sharing a side with this one: +X, -X, +Z, -Z.
    pub fn cardinal_neighbours(self) -> [ChunkCoord; 4] {
        [
            ChunkCoord::new(self.x + 1, self.z),
            ChunkCoord::new(self.x - 1, self.z),
            ChunkCoord::new(self.x, self.z + 1),
            ChunkCoord::new(self.x, self.z - 1),
        ]
    }
}

/// Vertical occupancy hints, as offsets from the chunk floor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeightHints {
    /// Highest Y holding a solid block.
    pub highest_solid: i32,
    /// One below the lowest Y holding an empty block. May be `-1`.
    pub lowest_empty: i32,
}

struct ChunkGeometry {
    hints: HeightHints,
    bounding_box: Aabb,
}

/// Metadata for one chunk of the world.
pub struct Chunk {
    coord: ChunkCoord,
    world_position: Point3<i32>,
    width: i32,
    length: i32,
    height: i32,
    state: AtomicChunkState,
    geometry: Mutex<ChunkGeometry>,
    mesh: RwLock<ChunkMesh>,
    disposed: AtomicBool,
    queued: AtomicBool,
}

impl Chunk {
    /// Creates a chunk in `AwaitingGenerate` with an empty mesh.
    ///
    /// # Arguments
    /// * `coord` - Relative position of the chunk
    /// * `config` - Engine configuration providing the chunk dimensions
    ///
    /// # Returns
    /// A new `Chunk` whose bounding box spans its full volume
    pub fn new(coord: ChunkCoord, config: &EngineConfig) -> Self {
        let (width, length, height) = (config.width(), config.length(), config.height());
        let world_position = Point3::new(coord.x * width, 0, coord.z * length);
        let min = Point3::new(world_position.x as f32, 0.0, world_position.z as f32);
        let max = Point3::new(
            (world_position.x + width) as f32,
            height as f32,
            (world_position.z + length) as f32,
        );

        Self {
            coord,
            world_position,
            width,
            length,
            height,
            state: AtomicChunkState::new(ChunkState::AwaitingGenerate),
            geometry: Mutex::new(ChunkGeometry {
                hints: HeightHints {
                    highest_solid: 0,
                    lowest_empty: config.max_height_index(),
                },
                bounding_box: Aabb::new(min, max),
            }),
            mesh: RwLock::new(ChunkMesh::new()),
            disposed: AtomicBool::new(false),
            queued: AtomicBool::new(false),
        }
    }

    /// Relative position in chunks.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// World position of the chunk's lowest corner, in blocks.
    pub fn world_position(&self) -> Point3<i32> {
        self.world_position
    }

    /// Chunk size along X.
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Chunk size along Z.
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Chunk size along Y.
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Current pipeline state.
    pub fn state(&self) -> ChunkState {
        self.state.load()
    }

    /// The atomic state cell, for stage entry and exit transitions.
    pub fn state_cell(&self) -> &AtomicChunkState {
        &self.state
    }

    /// Current bounding box.
    pub fn bounding_box(&self) -> Aabb {
        self.geometry().bounding_box
    }

    /// Current height hints.
    pub fn height_hints(&self) -> HeightHints {
        self.geometry().hints
    }

    /// Whether the world-space column `(x, z)` belongs to this chunk.
    pub fn is_in_bounds(&self, x: i32, z: i32) -> bool {
        x >= self.world_position.x
            && x < self.world_position.x + self.width
            && z >= self.world_position.z
            && z < self.world_position.z + self.length
    }

    /// Rescans every column of the chunk and recomputes the height hints.
    ///
    /// `highest_solid` is the highest Y holding a solid block and
    /// `lowest_empty` one below the lowest Y holding an empty block, so
    /// `lowest_empty <= highest_solid + 1` always holds afterwards. The bounding
    /// box is tightened to the occupied range.
    pub fn calculate_height_indexes(&self, grid: &BlockGrid) {
        let mut highest_solid = 0;
        let mut lowest_empty = self.height - 1;

        for x in self.world_position.x..self.world_position.x + self.width {
            for z in self.world_position.z..self.world_position.z + self.length {
                for y in 0..self.height {
                    if grid.fast_block_at(x, y, z).exists() {
                        highest_solid = highest_solid.max(y);
                    } else {
                        lowest_empty = lowest_empty.min(y);
                    }
                }
            }
        }

        lowest_empty -= 1;

        let mut geometry = self.geometry();
        geometry.hints = HeightHints {
            highest_solid,
            lowest_empty,
        };
        geometry.bounding_box.min.y = lowest_empty.max(0) as f32;
        geometry.bounding_box.max.y = (highest_solid + 1) as f32;
    }

    /// Shared access to the mesh.
    pub fn mesh(&self) -> RwLockReadGuard<'_, ChunkMesh> {
        self.mesh.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access to the mesh.
    pub fn mesh_mut(&self) -> RwLockWriteGuard<'_, ChunkMesh> {
        self.mesh.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Whether [`Chunk::dispose`] has run.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::Acquire)
    }

    /// Releases the buffers and empties the mesh lists.
    ///
    /// Only the first call does anything.
    ///
    /// # Returns
    /// `true` if this call disposed the chunk
    pub fn dispose(&self) -> bool {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return false;
        }

        self.mesh_mut().clear();
        log::debug!("Disposed chunk ({}, {})", self.coord.x, self.coord.z);
        true
    }

    /// Claims the chunk for a scheduler queue.
    ///
    /// # Returns
    /// `false` if a stage for this chunk is already queued or running
    pub fn try_mark_queued(&self) -> bool {
        !self.queued.swap(true, Ordering::AcqRel)
    }

    /// Releases the claim taken by [`Chunk::try_mark_queued`].
    pub fn clear_queued(&self) {
        self.queued.store(false, Ordering::Release);
    }

    fn geometry(&self) -> std::sync::MutexGuard<'_, ChunkGeometry> {
        self.geometry.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chunk")
            .field("coord", &self.coord)
            .field("state", &self.state())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::{block_type::BlockType, Block};

    fn config() -> EngineConfig {
        EngineConfig {
            chunk_width: 4,
            chunk_length: 4,
            chunk_height: 8,
            cache_range: 1,
            view_range: 1,
            ..EngineConfig::default()
        }
    }

    #[test]
    fn new_chunk_spans_its_full_volume() {
        let chunk = Chunk::new(ChunkCoord::new(-1, 2), &config());

        assert_eq!(chunk.state(), ChunkState::AwaitingGenerate);
        assert_eq!(chunk.world_position(), Point3::new(-4, 0, 8));
        assert_eq!(chunk.bounding_box().min, Point3::new(-4.0, 0.0, 8.0));
        assert_eq!(chunk.bounding_box().max, Point3::new(0.0, 8.0, 12.0));
        assert!(chunk.is_in_bounds(-4, 11));
        assert!(!chunk.is_in_bounds(0, 8));
    }

    #[test]
    fn coords_are_derived_with_floor_division() {
        let config = config();

        assert_eq!(ChunkCoord::containing_block(&config, -1, 3), ChunkCoord::new(-1, 0));
        assert_eq!(ChunkCoord::containing_block(&config, 4, -4), ChunkCoord::new(1, -1));
        assert_eq!(
            ChunkCoord::containing_position(&config, Point3::new(-0.5, 60.0, 7.9)),
            ChunkCoord::new(-1, 1)
        );
    }

    #[test]
    fn height_indexes_bound_the_occupied_range() {
        let config = config();
        let mut grid = BlockGrid::new(&config);
        let chunk = Chunk::new(ChunkCoord::new(0, 0), &config);

        for x in 0..4 {
            for z in 0..4 {
                for y in 0..3 {
                    grid.fast_set_block_at(x, y, z, Block::new(BlockType::Rock));
                }
            }
        }
        grid.fast_set_block_at(2, 5, 2, Block::new(BlockType::Tree));

        chunk.calculate_height_indexes(&grid);
        let hints = chunk.height_hints();

        assert_eq!(hints.highest_solid, 5);
        assert_eq!(hints.lowest_empty, 2);
        assert!(hints.lowest_empty <= hints.highest_solid + 1);
        assert_eq!(chunk.bounding_box().min.y, 2.0);
        assert_eq!(chunk.bounding_box().max.y, 6.0);
    }

    #[test]
    fn empty_chunk_hints_start_below_the_floor() {
        let config = config();
        let grid = BlockGrid::new(&config);
        let chunk = Chunk::new(ChunkCoord::new(0, 0), &config);

        chunk.calculate_height_indexes(&grid);

        assert_eq!(
            chunk.height_hints(),
            HeightHints {
                highest_solid: 0,
                lowest_empty: -1
            }
        );
        assert_eq!(chunk.bounding_box().min.y, 0.0);
    }

    #[test]
    fn dispose_runs_once() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), &config());

        assert!(chunk.dispose());
        assert!(!chunk.dispose());
        assert!(chunk.is_disposed());
    }

    #[test]
    fn queued_claim_is_exclusive() {
        let chunk = Chunk::new(ChunkCoord::new(0, 0), &config());

        assert!(chunk.try_mark_queued());
        assert!(!chunk.try_mark_queued());
        chunk.clear_queued();
        assert!(chunk.try_mark_queued());
    }
}
