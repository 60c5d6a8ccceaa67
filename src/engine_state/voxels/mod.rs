//! # Voxel World
//!
//! Block storage and the chunks that partition it.
//!
//! ## Architecture
//!
//! * **Block**: Five bytes per voxel: a type plus sun, red, green and blue light
//! * **BlockGrid**: One flat array covering every cached chunk, addressed with
//!   wrap-around so the cache can follow the player without copying blocks
//! * **Chunk**: A column of the grid with a lifecycle state, height hints and a mesh
//! * **ChunkRegistry**: Thread-safe map from chunk coordinate to chunk
//! * **World**: Ties the grid and the registry together and handles block edits
//! * **Terrain**: Pluggable generators that fill a chunk's column of the grid
//!
//! ## Performance Considerations
//!
//! * Grid addressing is a multiply-add plus a Euclidean remainder per axis
//! * Block edits only flag chunks for relighting; the pipeline does the work later
//!
//! ## Thread Safety
//!
//! * The grid sits behind one `RwLock`; generation and lighting write, meshing reads
//! * Chunk state is an atomic and every transition is a compare-and-swap
//! * The registry hands out `Arc<Chunk>` handles, so eviction never frees a chunk
//!   that a stage is still working on

pub mod block;
pub mod block_grid;
pub mod bounds;
pub mod chunk;
pub mod chunk_registry;
pub mod terrain;
pub mod world;
