//! Per-chunk mesh storage.

use std::sync::Arc;

use crate::engine_state::rendering::{buffers::GpuBuffer, Vertex};

/// Geometry owned by one chunk.
///
/// The CPU lists are the last build's output; the buffers are their uploaded
/// copies. Either buffer is `None` when the last build produced no geometry.
#[derive(Debug, Default)]
pub struct ChunkMesh {
    /// Vertex list of the last build
    pub vertices: Vec<Vertex>,
    /// Index list of the last build
    pub indices: Vec<u32>,
    /// Uploaded vertices
    pub vertex_buffer: Option<Arc<dyn GpuBuffer>>,
    /// Uploaded indices
    pub index_buffer: Option<Arc<dyn GpuBuffer>>,
}

impl ChunkMesh {
    /// Creates an empty mesh with no buffers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether both buffers are present.
    pub fn has_buffers(&self) -> bool {
        self.vertex_buffer.is_some() && self.index_buffer.is_some()
    }

    /// Number of indices to draw.
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Drops both buffer handles.
    pub fn release_buffers(&mut self) {
        self.vertex_buffer = None;
        self.index_buffer = None;
    }

    /// Drops buffers and empties the CPU lists.
    pub fn clear(&mut self) {
        self.release_buffers();
        self.vertices.clear();
        self.indices.clear();
    }
}
