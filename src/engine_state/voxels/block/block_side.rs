//! # Block Side Module
//!
//! This module defines the six faces of a voxel block and the direction each one
//! points in.

use cgmath::Vector3;

/// Represents the six possible faces of a voxel block.
///
/// The discriminants index per-face tables (textures, winding) and match the
/// order returned by [`BlockSide::all`].
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards positive X.
    RIGHT = 0,

    /// The face pointing towards negative X.
    LEFT = 1,

    /// The face pointing towards positive Y.
    TOP = 2,

    /// The face pointing towards negative Y.
    BOTTOM = 3,

    /// The face pointing towards positive Z.
    FRONT = 4,

    /// The face pointing towards negative Z.
    BACK = 5,
}

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    ///
    /// The order is: [RIGHT, LEFT, TOP, BOTTOM, FRONT, BACK]
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// Unit offset from a block to the neighbour this face touches.
    pub fn normal(self) -> Vector3<i32> {
        match self {
            BlockSide::RIGHT => Vector3::new(1, 0, 0),
            BlockSide::LEFT => Vector3::new(-1, 0, 0),
            BlockSide::TOP => Vector3::new(0, 1, 0),
            BlockSide::BOTTOM => Vector3::new(0, -1, 0),
            BlockSide::FRONT => Vector3::new(0, 0, 1),
            BlockSide::BACK => Vector3::new(0, 0, -1),
        }
    }

    /// The face pointing the other way.
    pub fn opposite(self) -> BlockSide {
        match self {
            BlockSide::RIGHT => BlockSide::LEFT,
            BlockSide::LEFT => BlockSide::RIGHT,
            BlockSide::TOP => BlockSide::BOTTOM,
            BlockSide::BOTTOM => BlockSide::TOP,
            BlockSide::FRONT => BlockSide::BACK,
            BlockSide::BACK => BlockSide::FRONT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discriminants_follow_all_order() {
        for (index, side) in BlockSide::all().into_iter().enumerate() {
            assert_eq!(side as usize, index);
        }
    }

    #[test]
    fn opposite_faces_have_opposite_normals() {
        for side in BlockSide::all() {
            assert_eq!(side.normal(), -side.opposite().normal());
        }
    }
}
