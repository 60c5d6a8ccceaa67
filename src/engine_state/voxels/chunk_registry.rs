//! # Chunk Registry
//!
//! Maps relative chunk coordinates to the chunks currently alive. The registry is
//! the authority on which world chunk owns a slot of the toroidal block grid.
//!
//! The map sits behind an `RwLock`. [`ChunkRegistry::values`] returns a snapshot,
//! so the sweep thread can iterate while another thread inserts or removes.

use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use super::chunk::{Chunk, ChunkCoord};

/// Thread-safe `(x, z) -> Chunk` map.
#[derive(Default)]
pub struct ChunkRegistry {
    chunks: RwLock<HashMap<ChunkCoord, Arc<Chunk>>>,
}

impl ChunkRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up the chunk at `coord`.
    pub fn get(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.read().get(&coord).cloned()
    }

    /// Stores `chunk` under its own coordinate, returning the chunk it replaced.
    pub fn insert(&self, chunk: Arc<Chunk>) -> Option<Arc<Chunk>> {
        self.write().insert(chunk.coord(), chunk)
    }

    /// Inserts a chunk built by `create` unless `coord` is already taken.
    ///
    /// # Returns
    /// The new chunk, or `None` if one already existed
    pub fn insert_if_absent(
        &self,
        coord: ChunkCoord,
        create: impl FnOnce() -> Chunk,
    ) -> Option<Arc<Chunk>> {
        let mut chunks = self.write();
        if chunks.contains_key(&coord) {
            return None;
        }
        let chunk = Arc::new(create());
        chunks.insert(coord, chunk.clone());
        Some(chunk)
    }

    /// Removes and returns the chunk at `coord`.
    pub fn remove(&self, coord: ChunkCoord) -> Option<Arc<Chunk>> {
        self.write().remove(&coord)
    }

    /// Whether a chunk exists at `coord`.
    pub fn contains_key(&self, coord: ChunkCoord) -> bool {
        self.read().contains_key(&coord)
    }

    /// Number of chunks.
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Snapshot of every chunk, in no particular order.
    pub fn values(&self) -> Vec<Arc<Chunk>> {
        self.read().values().cloned().collect()
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashMap<ChunkCoord, Arc<Chunk>>> {
        self.chunks.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashMap<ChunkCoord, Arc<Chunk>>> {
        self.chunks.write().unwrap_or_else(PoisonError::into_inner)
    }
}
