//! Rendering side of the chunk pipeline.
//!
//! This module owns everything between a lit chunk and a draw call: the vertex
//! format, the mesh builder, the buffer backends and the per-frame draw snapshot
//! handed to an external renderer.

use std::sync::Arc;

use crate::engine_state::voxels::{
    bounds::Aabb,
    chunk::{Chunk, ChunkCoord, ChunkState},
};

pub mod buffers;
pub mod meshing;
mod vertex;

pub use vertex::Vertex;

use buffers::GpuBuffer;

/// Everything a renderer needs to draw one chunk.
///
/// The item holds its own buffer handles, so a chunk evicted mid-frame keeps its
/// buffers alive until the renderer drops the item.
#[derive(Clone, Debug)]
pub struct DrawItem {
    /// Chunk the geometry belongs to
    pub coord: ChunkCoord,
    /// Uploaded vertices
    pub vertex_buffer: Arc<dyn GpuBuffer>,
    /// Uploaded indices
    pub index_buffer: Arc<dyn GpuBuffer>,
    /// Number of indices to draw
    pub index_count: u32,
    /// Tight bounds of the geometry, for culling
    pub bounding_box: Aabb,
}

impl DrawItem {
    /// Snapshots a chunk for drawing.
    ///
    /// # Returns
    /// `None` unless the chunk is `Ready`, not disposed and has both buffers
    pub fn from_chunk(chunk: &Chunk) -> Option<Self> {
        if chunk.state() != ChunkState::Ready || chunk.is_disposed() {
            return None;
        }

        let mesh = chunk.mesh();
        Some(DrawItem {
            coord: chunk.coord(),
            vertex_buffer: mesh.vertex_buffer.clone()?,
            index_buffer: mesh.index_buffer.clone()?,
            index_count: mesh.index_count(),
            bounding_box: chunk.bounding_box(),
        })
    }
}
