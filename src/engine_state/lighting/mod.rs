//! # Lighting Engine
//!
//! Computes the sun and red/green/blue light values of the block grid, one chunk at
//! a time.
//!
//! ## Algorithm
//!
//! 1. **Seed** (per column of the chunk, top to bottom): every block above the
//!    first solid block gets sun [`MAX_SUN_VALUE`], everything from that block
//!    down gets 0. Red, green and blue are reset to 0.
//! 2. **Propagate** (per channel): every non-solid block of the chunk holding
//!    more than 1 floods its value into the grid. Each step attenuates the value to
//!    `value * 9 / 10` and visits the neighbours in the order +X, -X, +Z, -Z, -Y.
//!    Light never spreads upwards. A neighbour is skipped if it is below the
//!    world, outside the cache, solid, or already at least as bright. A value of
//!    1 never spreads further.
//!
//! Propagation is not confined to the chunk: light leaks into neighbouring chunks
//! as far as the cache allows.
//!
//! ## Performance Considerations
//!
//! - The flood fill uses an explicit FIFO worklist, so its depth is independent
//!   of the stack size
//! - The caller holds the grid write lock for the whole pass; the engine itself
//!   keeps no state and can be shared by any number of worker threads

use std::sync::Arc;

use web_time::Instant;

use crate::engine_state::{
    config::MAX_SUN_VALUE,
    pipeline::StageOutcome,
    voxels::{
        block_grid::BlockGrid,
        chunk::{Chunk, ChunkState},
        world::World,
    },
};

pub mod light_queue;

use light_queue::LightQueue;

/// One of the four light channels stored per block.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LightChannel {
    /// Sunlight, seeded from the sky.
    Sun,
    /// Red local light.
    Red,
    /// Green local light.
    Green,
    /// Blue local light.
    Blue,
}

impl LightChannel {
    /// Every channel, in propagation order.
    pub const ALL: [LightChannel; 4] = [
        LightChannel::Sun,
        LightChannel::Red,
        LightChannel::Green,
        LightChannel::Blue,
    ];
}

/// Neighbour visiting order. Never +Y.
const PROPAGATION_OFFSETS: [(i32, i32, i32); 5] =
    [(1, 0, 0), (-1, 0, 0), (0, 0, 1), (0, 0, -1), (0, -1, 0)];

/// Light value after one propagation step.
#[inline]
pub fn attenuate(value: u8) -> u8 {
    ((value as u16 * 9) / 10) as u8
}

/// Per-chunk lighting stage.
pub struct LightingEngine {
    world: Arc<World>,
}

impl LightingEngine {
    /// Creates a lighting engine working on `world`.
    pub fn new(world: Arc<World>) -> Self {
        Self { world }
    }

    /// Runs the lighting stage for one chunk.
    ///
    /// Does nothing unless the chunk is `AwaitingLighting` or
    /// `AwaitingRelighting` and not disposed. On success the chunk leaves as
    /// `AwaitingBuild`; if its state changed while lighting ran (a new edit, an
    /// eviction) the newer state is kept.
    pub fn process(&self, chunk: &Chunk) -> StageOutcome {
        if chunk.is_disposed() {
            log::trace!("Skipped lighting of disposed chunk {:?}", chunk.coord());
            return StageOutcome::Skipped;
        }

        let Some(previous) = chunk.state_cell().transition_from_any(
            &[ChunkState::AwaitingLighting, ChunkState::AwaitingRelighting],
            ChunkState::Lighting,
        ) else {
            log::trace!(
                "Skipped lighting of chunk {:?} in state {:?}",
                chunk.coord(),
                chunk.state()
            );
            return StageOutcome::Skipped;
        };

        let start = Instant::now();
        let spread = {
            let mut grid = self.world.grid().get_mut();
            self.light_chunk(chunk, &mut grid)
        };

        if !chunk
            .state_cell()
            .transition(ChunkState::Lighting, ChunkState::AwaitingBuild)
        {
            log::debug!(
                "Chunk {:?} changed to {:?} while lighting",
                chunk.coord(),
                chunk.state()
            );
        }

        log::debug!(
            "Lit chunk {:?} (from {:?}, {} worklist pushes) in {:?}",
            chunk.coord(),
            previous,
            spread,
            start.elapsed()
        );
        StageOutcome::Completed
    }

    /// Seeds and propagates all four channels for the chunk's columns.
    ///
    /// # Returns
    /// The number of worklist pushes, seeds included
    pub fn light_chunk(&self, chunk: &Chunk, grid: &mut BlockGrid) -> usize {
        let origin = chunk.world_position();
        let (min_x, max_x) = (origin.x, origin.x + chunk.width());
        let (min_z, max_z) = (origin.z, origin.z + chunk.length());
        let height = grid.height();

        for x in min_x..max_x {
            for z in min_z..max_z {
                seed_column(grid, x, z);
            }
        }

        let mut queue = LightQueue::with_capacity((chunk.width() * chunk.length()) as usize);
        for channel in LightChannel::ALL {
            for x in min_x..max_x {
                for z in min_z..max_z {
                    for y in 0..height {
                        let block = grid.fast_block_at(x, y, z);
                        let value = block.light(channel);
                        if !block.exists() && value > 1 {
                            queue.push(x, y, z, value);
                            flood(grid, &mut queue, channel);
                        }
                    }
                }
            }
        }

        queue.pushed()
    }

    /// Places a light value at a block and floods it into the grid.
    ///
    /// This is the hook for light sources: no block type emits light, so red,
    /// green and blue stay dark unless a caller seeds them here. The value is
    /// clamped to `MAX_SUN_VALUE` and only raises the block's current value.
    /// Values placed this way are not remembered and are cleared by the next
    /// lighting pass over the owning chunk.
    ///
    /// # Returns
    /// `false` if the block is solid, outside the cache or already as bright
    pub fn propagate_from(
        grid: &mut BlockGrid,
        channel: LightChannel,
        x: i32,
        y: i32,
        z: i32,
        value: u8,
    ) -> bool {
        let value = value.min(MAX_SUN_VALUE);
        if !grid.in_bounds(x, y, z) {
            return false;
        }

        let index = grid.index(x, y, z);
        let block = grid.block_mut_at_index(index);
        if block.exists() || block.light(channel) >= value {
            return false;
        }
        block.set_light(channel, value);

        if value > 1 {
            let mut queue = LightQueue::with_capacity(64);
            queue.push(x, y, z, value);
            flood(grid, &mut queue, channel);
        }
        true
    }
}

fn seed_column(grid: &mut BlockGrid, x: i32, z: i32) {
    let mut shaded = false;
    for y in (0..grid.height()).rev() {
        let index = grid.index(x, y, z);
        let block = grid.block_mut_at_index(index);
        if block.exists() {
            shaded = true;
        }
        block.sun = if shaded { 0 } else { MAX_SUN_VALUE };
        block.r = 0;
        block.g = 0;
        block.b = 0;
    }
}

/// Drains the worklist. Every queued node already holds its value in the grid.
fn flood(grid: &mut BlockGrid, queue: &mut LightQueue, channel: LightChannel) {
    while let Some(node) = queue.pop() {
        let attenuated = attenuate(node.value);

        for (dx, dy, dz) in PROPAGATION_OFFSETS {
            let (x, y, z) = (node.x + dx, node.y + dy, node.z + dz);
            if !grid.in_bounds(x, y, z) {
                continue;
            }

            let index = grid.index(x, y, z);
            let target = grid.block_mut_at_index(index);
            if target.exists() || attenuated <= target.light(channel) {
                continue;
            }

            target.set_light(channel, attenuated);
            if attenuated > 1 {
                queue.push(x, y, z, attenuated);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attenuation_sequence_from_full_sun() {
        let mut value = MAX_SUN_VALUE;
        let mut sequence = vec![value];
        while value > 1 {
            value = attenuate(value);
            sequence.push(value);
        }

        assert_eq!(sequence, vec![16, 14, 12, 10, 9, 8, 7, 6, 5, 4, 3, 2, 1]);
    }

    #[test]
    fn one_never_spreads() {
        assert_eq!(attenuate(1), 0);
    }
}
