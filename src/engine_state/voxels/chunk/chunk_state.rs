//! # Chunk State Machine
//!
//! Every chunk walks through the pipeline one stage at a time:
//!
//! ```text
//! AwaitingGenerate -> Generating -> AwaitingLighting -> Lighting
//!     -> AwaitingBuild -> Building -> Ready
//! ```
//!
//! Side edges:
//! - a block edit moves a chunk that is past generation to `AwaitingRelighting`,
//!   which re-enters `Lighting` and leaves through `AwaitingBuild`
//! - a `Ready` chunk whose neighbour finished lighting moves to `AwaitingRebuild`,
//!   which re-enters `Building`
//! - leaving the cache square moves a chunk to `AwaitingRemoval`, which is never
//!   left again
//!
//! The state lives in an `AtomicU8`. Stage entry and exit are compare-and-swap
//! transitions, so a relight request or an eviction that lands while a stage is
//! running is never overwritten by that stage finishing.

use std::sync::atomic::{AtomicU8, Ordering};

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

/// Pipeline state of a chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive)]
#[repr(u8)]
pub enum ChunkState {
    /// Created, blocks not written yet.
    AwaitingGenerate = 0,
    /// The terrain generator is writing blocks.
    Generating,
    /// Blocks written, light not computed yet.
    AwaitingLighting,
    /// The lighting engine is running.
    Lighting,
    /// Lit, no mesh yet (or mesh stale after a relight).
    AwaitingBuild,
    /// The mesh builder is running.
    Building,
    /// Edited after generation, light must be recomputed.
    AwaitingRelighting,
    /// Mesh stale because a neighbour's light changed.
    AwaitingRebuild,
    /// Mesh uploaded and drawable.
    Ready,
    /// Left the cache square; disposed and removed.
    AwaitingRemoval,
}

impl ChunkState {
    /// Whether a block edit should send a chunk in this state back to lighting.
    ///
    /// Chunks that were never lit keep their state; their first lighting pass
    /// will see the edit anyway.
    pub fn accepts_relight(self) -> bool {
        matches!(
            self,
            ChunkState::Lighting
                | ChunkState::AwaitingBuild
                | ChunkState::Building
                | ChunkState::AwaitingRebuild
                | ChunkState::Ready
                | ChunkState::AwaitingRelighting
        )
    }
}

/// Atomic cell holding a [`ChunkState`].
#[derive(Debug)]
pub struct AtomicChunkState {
    state: AtomicU8,
}

impl AtomicChunkState {
    /// Creates a cell in the given state.
    pub fn new(state: ChunkState) -> Self {
        Self {
            state: AtomicU8::new(state as u8),
        }
    }

    /// Current state.
    pub fn load(&self) -> ChunkState {
        // Only valid discriminants are ever stored.
        ChunkState::from_u8(self.state.load(Ordering::Acquire))
            .unwrap_or(ChunkState::AwaitingRemoval)
    }

    /// Unconditionally replaces the state.
    pub fn store(&self, state: ChunkState) {
        self.state.store(state as u8, Ordering::Release);
    }

    /// Moves `from -> to` only if the cell still holds `from`.
    pub fn transition(&self, from: ChunkState, to: ChunkState) -> bool {
        self.state
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Moves to `to` if the current state is one of `allowed`.
    ///
    /// # Returns
    /// The state that was replaced, or `None` if the current state was not
    /// allowed
    pub fn transition_from_any(&self, allowed: &[ChunkState], to: ChunkState) -> Option<ChunkState> {
        let mut current = self.load();
        loop {
            if !allowed.contains(&current) {
                return None;
            }
            match self.state.compare_exchange_weak(
                current as u8,
                to as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return Some(current),
                Err(actual) => {
                    current = ChunkState::from_u8(actual).unwrap_or(ChunkState::AwaitingRemoval)
                }
            }
        }
    }

    /// Requests a relight after a block edit.
    ///
    /// # Returns
    /// `true` if the chunk is now `AwaitingRelighting`
    pub fn request_relight(&self) -> bool {
        let mut current = self.load();
        loop {
            if !current.accepts_relight() {
                return false;
            }
            match self.state.compare_exchange_weak(
                current as u8,
                ChunkState::AwaitingRelighting as u8,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(actual) => {
                    current = ChunkState::from_u8(actual).unwrap_or(ChunkState::AwaitingRemoval)
                }
            }
        }
    }

    /// Requests a mesh rebuild of a drawable chunk.
    pub fn request_rebuild(&self) -> bool {
        self.transition(ChunkState::Ready, ChunkState::AwaitingRebuild)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_only_succeeds_from_the_expected_state() {
        let state = AtomicChunkState::new(ChunkState::AwaitingGenerate);

        assert!(!state.transition(ChunkState::AwaitingLighting, ChunkState::Lighting));
        assert_eq!(state.load(), ChunkState::AwaitingGenerate);
        assert!(state.transition(ChunkState::AwaitingGenerate, ChunkState::Generating));
        assert_eq!(state.load(), ChunkState::Generating);
    }

    #[test]
    fn relight_during_lighting_survives_the_stage_exit() {
        let state = AtomicChunkState::new(ChunkState::Lighting);

        assert!(state.request_relight());
        assert!(!state.transition(ChunkState::Lighting, ChunkState::AwaitingBuild));
        assert_eq!(state.load(), ChunkState::AwaitingRelighting);
    }

    #[test]
    fn relight_is_ignored_before_first_lighting_and_after_removal() {
        for initial in [
            ChunkState::AwaitingGenerate,
            ChunkState::Generating,
            ChunkState::AwaitingLighting,
            ChunkState::AwaitingRemoval,
        ] {
            let state = AtomicChunkState::new(initial);
            assert!(!state.request_relight());
            assert_eq!(state.load(), initial);
        }
    }

    #[test]
    fn transition_from_any_reports_the_replaced_state() {
        let state = AtomicChunkState::new(ChunkState::AwaitingRebuild);
        let allowed = [ChunkState::AwaitingBuild, ChunkState::AwaitingRebuild];

        assert_eq!(
            state.transition_from_any(&allowed, ChunkState::Building),
            Some(ChunkState::AwaitingRebuild)
        );
        assert_eq!(state.transition_from_any(&allowed, ChunkState::Building), None);
    }

    #[test]
    fn rebuild_only_applies_to_ready_chunks() {
        let state = AtomicChunkState::new(ChunkState::AwaitingBuild);
        assert!(!state.request_rebuild());

        state.store(ChunkState::Ready);
        assert!(state.request_rebuild());
        assert_eq!(state.load(), ChunkState::AwaitingRebuild);
    }
}
