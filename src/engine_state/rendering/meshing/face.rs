//! Per-direction face tables and corner lighting.
//!
//! Each face is a quad with corners ordered top-left, top-right, bottom-left,
//! bottom-right as seen from outside the block. `right x up` equals the face
//! normal for every direction, and both triangles of every index pattern are
//! counter-clockwise from outside.

use cgmath::{Point3, Vector3};

use crate::engine_state::{
    config::MAX_SUN_VALUE,
    lighting::LightChannel,
    voxels::{block::block_side::BlockSide, block_grid::BlockGrid},
};

/// Corner order used by every table in this module.
pub const TOP_LEFT: usize = 0;
/// Second corner.
pub const TOP_RIGHT: usize = 1;
/// Third corner.
pub const BOTTOM_LEFT: usize = 2;
/// Fourth corner.
pub const BOTTOM_RIGHT: usize = 3;

/// UVs per corner.
pub const CORNER_TEX_COORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Quad geometry of one face direction.
#[derive(Debug)]
pub struct FaceTemplate {
    /// The face this template describes
    pub side: BlockSide,
    /// Corner offsets from the block origin, TL, TR, BL, BR
    pub corners: [[i32; 3]; 4],
    /// Direction from the left to the right edge
    pub right: [i32; 3],
    /// Direction from the bottom to the top edge
    pub up: [i32; 3],
    /// Two triangles over the four corners
    pub indices: [u32; 6],
}

/// Split along TR-BL.
const SIDE_INDICES: [u32; 6] = [0, 2, 1, 2, 3, 1];
/// Split along TL-BR.
const CAP_INDICES: [u32; 6] = [0, 3, 1, 0, 2, 3];

/// Templates indexed by `BlockSide as usize`.
static FACE_TEMPLATES: [FaceTemplate; 6] = [
    FaceTemplate {
        side: BlockSide::RIGHT,
        corners: [[1, 1, 1], [1, 1, 0], [1, 0, 1], [1, 0, 0]],
        right: [0, 0, -1],
        up: [0, 1, 0],
        indices: SIDE_INDICES,
    },
    FaceTemplate {
        side: BlockSide::LEFT,
        corners: [[0, 1, 0], [0, 1, 1], [0, 0, 0], [0, 0, 1]],
        right: [0, 0, 1],
        up: [0, 1, 0],
        indices: SIDE_INDICES,
    },
    FaceTemplate {
        side: BlockSide::TOP,
        corners: [[0, 1, 0], [1, 1, 0], [0, 1, 1], [1, 1, 1]],
        right: [1, 0, 0],
        up: [0, 0, -1],
        indices: CAP_INDICES,
    },
    FaceTemplate {
        side: BlockSide::BOTTOM,
        corners: [[0, 0, 1], [1, 0, 1], [0, 0, 0], [1, 0, 0]],
        right: [1, 0, 0],
        up: [0, 0, 1],
        indices: CAP_INDICES,
    },
    FaceTemplate {
        side: BlockSide::FRONT,
        corners: [[0, 1, 1], [1, 1, 1], [0, 0, 1], [1, 0, 1]],
        right: [1, 0, 0],
        up: [0, 1, 0],
        indices: SIDE_INDICES,
    },
    FaceTemplate {
        side: BlockSide::BACK,
        corners: [[1, 1, 0], [0, 1, 0], [1, 0, 0], [0, 0, 0]],
        right: [-1, 0, 0],
        up: [0, 1, 0],
        indices: SIDE_INDICES,
    },
];

/// Signs of the right and up steps towards each corner.
const CORNER_SIGNS: [(i32, i32); 4] = [(-1, 1), (1, 1), (-1, -1), (1, -1)];

impl FaceTemplate {
    /// Template of one face direction.
    pub fn of(side: BlockSide) -> &'static FaceTemplate {
        &FACE_TEMPLATES[side as usize]
    }

    /// World position of a corner of the block at `origin`.
    pub fn corner_position(&self, origin: Point3<i32>, corner: usize) -> Point3<f32> {
        let [dx, dy, dz] = self.corners[corner];
        Point3::new(
            (origin.x + dx) as f32,
            (origin.y + dy) as f32,
            (origin.z + dz) as f32,
        )
    }

    /// Face normal as floats.
    pub fn normal(&self) -> Vector3<f32> {
        let normal = self.side.normal();
        Vector3::new(normal.x as f32, normal.y as f32, normal.z as f32)
    }
}

/// Averaged light at one face corner.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CornerLight {
    /// Sunlight normalized to 0.0-1.0
    pub sun: f32,
    /// Local light normalized to 0.0-1.0, RGB
    pub color: [f32; 3],
}

/// Computes the four corner lights of a face.
///
/// Each corner averages the four blocks of the face layer (the layer the normal
/// points into) that touch the corner: the block straight across the face, its
/// neighbour along `right`, its neighbour along `up` and the diagonal one.
pub fn corner_lights(grid: &BlockGrid, block: Point3<i32>, template: &FaceTemplate) -> [CornerLight; 4] {
    let normal = template.side.normal();
    let across = Point3::new(block.x + normal.x, block.y + normal.y, block.z + normal.z);
    let [rx, ry, rz] = template.right;
    let [ux, uy, uz] = template.up;

    CORNER_SIGNS.map(|(sr, su)| {
        let samples = [(0, 0), (sr, 0), (0, su), (sr, su)].map(|(r, u)| {
            grid.block_at(
                across.x + r * rx + u * ux,
                across.y + r * ry + u * uy,
                across.z + r * rz + u * uz,
            )
        });

        let average = |channel: LightChannel| {
            let sum: u32 = samples.iter().map(|b| b.light(channel) as u32).sum();
            sum as f32 / 4.0 / MAX_SUN_VALUE as f32
        };

        CornerLight {
            sun: average(LightChannel::Sun),
            color: [
                average(LightChannel::Red),
                average(LightChannel::Green),
                average(LightChannel::Blue),
            ],
        }
    })
}
