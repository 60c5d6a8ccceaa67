//! # Mesh Builder
//!
//! Turns a lit chunk into a quad-soup triangle mesh and uploads it.
//!
//! ## Architecture
//! - `face`: per-direction corner tables, winding and corner light sampling
//! - `mesh`: the per-chunk `ChunkMesh` holding lists and buffers
//!
//! ## Algorithm
//! For every solid block between the chunk's height hints, each of the six faces
//! is emitted if the neighbour across it does not exist, or if the neighbour is
//! water and the block is not. Two water blocks never share a face. Every face
//! adds 4 vertices and 6 indices; vertices are never shared between faces.
//!
//! ## Performance Considerations
//! - The scan is bounded vertically by the height hints computed right before it
//! - The grid read lock is held while scanning and released before uploading

use std::sync::Arc;

use cgmath::Point3;
use web_time::Instant;

use crate::engine_state::{
    pipeline::StageOutcome,
    rendering::{buffers::BufferDevice, Vertex},
    voxels::{
        block::{block_side::BlockSide, Block},
        block_grid::BlockGrid,
        chunk::{Chunk, ChunkState},
        world::World,
    },
};

pub mod face;
pub mod mesh;

use face::{corner_lights, FaceTemplate, CORNER_TEX_COORDS};

/// CPU-side output of one build.
#[derive(Debug, Default)]
pub struct MeshData {
    /// Four vertices per emitted face
    pub vertices: Vec<Vertex>,
    /// Six indices per emitted face
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Number of emitted faces.
    pub fn face_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Whether the face of `block` towards `neighbour` is visible.
pub fn is_face_visible(block: Block, neighbour: Block) -> bool {
    let neighbour_type = neighbour.get_type();
    neighbour_type.is_transparent() && neighbour_type != block.get_type()
}

/// Per-chunk meshing stage.
pub struct MeshBuilder {
    world: Arc<World>,
    device: Arc<dyn BufferDevice>,
}

impl MeshBuilder {
    /// Creates a mesh builder uploading through `device`.
    pub fn new(world: Arc<World>, device: Arc<dyn BufferDevice>) -> Self {
        Self { world, device }
    }

    /// Runs the build stage for one chunk.
    ///
    /// Does nothing unless the chunk is `AwaitingBuild` or `AwaitingRebuild` and
    /// not disposed. The chunk leaves as `Ready` unless its state changed while
    /// building; a chunk disposed mid-build drops the new buffers.
    pub fn process(&self, chunk: &Chunk) -> StageOutcome {
        if chunk.is_disposed() {
            log::trace!("Skipped build of disposed chunk {:?}", chunk.coord());
            return StageOutcome::Skipped;
        }

        if chunk
            .state_cell()
            .transition_from_any(
                &[ChunkState::AwaitingBuild, ChunkState::AwaitingRebuild],
                ChunkState::Building,
            )
            .is_none()
        {
            log::trace!(
                "Skipped build of chunk {:?} in state {:?}",
                chunk.coord(),
                chunk.state()
            );
            return StageOutcome::Skipped;
        }

        let start = Instant::now();
        let data = {
            let grid = self.world.grid().get();
            chunk.calculate_height_indexes(&grid);
            Self::build_geometry(chunk, &grid)
        };
        let face_count = data.face_count();

        if !self.install(chunk, data) {
            log::warn!(
                "Chunk {:?} was disposed while building; dropped its mesh",
                chunk.coord()
            );
            return StageOutcome::Skipped;
        }

        if !chunk
            .state_cell()
            .transition(ChunkState::Building, ChunkState::Ready)
        {
            log::debug!(
                "Chunk {:?} changed to {:?} while building",
                chunk.coord(),
                chunk.state()
            );
        }

        log::debug!(
            "Built chunk {:?} ({} faces) in {:?}",
            chunk.coord(),
            face_count,
            start.elapsed()
        );
        StageOutcome::Completed
    }

    /// Emits the visible faces of a chunk.
    ///
    /// Scans the chunk's columns between its height hints, so
    /// [`Chunk::calculate_height_indexes`] must have run against the same grid
    /// contents.
    pub fn build_geometry(chunk: &Chunk, grid: &BlockGrid) -> MeshData {
        let origin = chunk.world_position();
        let hints = chunk.height_hints();
        let min_y = hints.lowest_empty.max(0);
        let max_y = hints.highest_solid.min(chunk.height() - 1);
        let mut data = MeshData::default();

        for x in origin.x..origin.x + chunk.width() {
            for z in origin.z..origin.z + chunk.length() {
                for y in min_y..=max_y {
                    let block = grid.fast_block_at(x, y, z);
                    if !block.exists() {
                        continue;
                    }

                    let position = Point3::new(x, y, z);
                    for side in BlockSide::all() {
                        let normal = side.normal();
                        let neighbour = grid.block_at(x + normal.x, y + normal.y, z + normal.z);
                        if is_face_visible(block, neighbour) {
                            Self::emit_face(grid, &mut data, block, position, side);
                        }
                    }
                }
            }
        }

        data
    }

    fn emit_face(
        grid: &BlockGrid,
        data: &mut MeshData,
        block: Block,
        position: Point3<i32>,
        side: BlockSide,
    ) {
        let template = FaceTemplate::of(side);
        let lights = corner_lights(grid, position, template);
        let normal = template.normal();
        let texture_index = block.get_type().texture_index(side);
        let base = data.vertices.len() as u32;

        for corner in 0..4 {
            data.vertices.push(Vertex::new(
                template.corner_position(position, corner),
                normal,
                CORNER_TEX_COORDS[corner],
                texture_index,
                lights[corner].sun,
            ));
        }

        data.indices
            .extend(template.indices.iter().map(|index| base + index));
    }

    /// Uploads the mesh and stores it on the chunk.
    ///
    /// # Returns
    /// `false` if the chunk was disposed, in which case nothing is stored
    fn install(&self, chunk: &Chunk, data: MeshData) -> bool {
        let buffers = if data.vertices.is_empty() || data.indices.is_empty() {
            None
        } else {
            let coord = chunk.coord();
            Some((
                self.device.create_vertex_buffer(
                    &format!("Chunk ({}, {}) Vertex Buffer", coord.x, coord.z),
                    bytemuck::cast_slice(&data.vertices),
                ),
                self.device.create_index_buffer(
                    &format!("Chunk ({}, {}) Index Buffer", coord.x, coord.z),
                    bytemuck::cast_slice(&data.indices),
                ),
            ))
        };

        let mut mesh = chunk.mesh_mut();
        if chunk.is_disposed() {
            return false;
        }

        mesh.vertices = data.vertices;
        mesh.indices = data.indices;
        match buffers {
            Some((vertex_buffer, index_buffer)) => {
                mesh.vertex_buffer = Some(vertex_buffer);
                mesh.index_buffer = Some(index_buffer);
            }
            None => mesh.release_buffers(),
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::block_type::BlockType;

    #[test]
    fn water_hides_only_water_faces() {
        let water = Block::new(BlockType::Water);
        let sand = Block::new(BlockType::Sand);

        assert!(!is_face_visible(water, water));
        assert!(is_face_visible(water, Block::EMPTY));
        assert!(is_face_visible(sand, water));
        assert!(!is_face_visible(water, sand));
        assert!(!is_face_visible(sand, sand));
    }
}
