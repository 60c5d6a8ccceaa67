//! # Player State
//!
//! The chunk cache follows the player. It only needs two things from whatever
//! owns the player or camera, expressed by [`PlayerView`]: the world position and
//! the chunk the player stands in.

use std::sync::Arc;

use cgmath::Point3;

use crate::core::MtResource;

use super::{config::EngineConfig, voxels::chunk::ChunkCoord};

/// What the chunk cache reads from the player every sweep.
pub trait PlayerView: Send + Sync {
    /// World position in blocks.
    fn position(&self) -> Point3<f32>;

    /// The chunk the player stands in, if known.
    fn current_chunk(&self) -> Option<ChunkCoord>;
}

/// A movable player position.
///
/// Clones share the same position, so the caller can keep one handle to move
/// the player while the engine reads another.
#[derive(Clone)]
pub struct PlayerState {
    config: Arc<EngineConfig>,
    position: MtResource<Point3<f32>>,
}

impl PlayerState {
    /// Places a player at `position`.
    pub fn new(config: Arc<EngineConfig>, position: Point3<f32>) -> Self {
        Self {
            config,
            position: MtResource::new(position),
        }
    }

    /// Moves the player.
    pub fn set_position(&self, position: Point3<f32>) {
        *self.position.get_mut() = position;
    }
}

impl PlayerView for PlayerState {
    fn position(&self) -> Point3<f32> {
        *self.position.get()
    }

    fn current_chunk(&self) -> Option<ChunkCoord> {
        let position = self.position();
        if !(position.x.is_finite() && position.z.is_finite()) {
            return None;
        }
        Some(ChunkCoord::containing_position(&self.config, position))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_see_moves() {
        let config = Arc::new(EngineConfig::default());
        let player = PlayerState::new(config, Point3::new(1.0, 64.0, 1.0));
        let view = player.clone();

        assert_eq!(view.current_chunk(), Some(ChunkCoord::new(0, 0)));
        player.set_position(Point3::new(-20.0, 64.0, 40.0));
        assert_eq!(view.current_chunk(), Some(ChunkCoord::new(-2, 2)));
    }

    #[test]
    fn non_finite_position_has_no_chunk() {
        let config = Arc::new(EngineConfig::default());
        let player = PlayerState::new(config, Point3::new(f32::NAN, 0.0, 0.0));

        assert_eq!(player.current_chunk(), None);
    }
}
