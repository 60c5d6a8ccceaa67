//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, and the block record
//! stored in the grid.

use block_type::BlockType;

use crate::engine_state::lighting::LightChannel;

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// Represents a single voxel block in the world.
///
/// This is a lightweight value type: a block type plus four light channels in the
/// range `0..=16`. Blocks are always copied out of the grid, never borrowed.
///
/// # Memory Layout
/// The `#[repr(C)]` attribute keeps the record at five bytes with no padding, so
/// the whole grid can be viewed as raw bytes.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug, PartialEq, Eq)]
pub struct Block {
    /// The type of this block, encoded as a `BlockTypeSize` for compact storage.
    pub block_type: BlockTypeSize,
    /// Sunlight level.
    pub sun: u8,
    /// Red local light level.
    pub r: u8,
    /// Green local light level.
    pub g: u8,
    /// Blue local light level.
    pub b: u8,
}

impl Block {
    /// Air with no light. Returned for every read outside the cache.
    pub const EMPTY: Block = Block {
        block_type: BlockType::None as BlockTypeSize,
        sun: 0,
        r: 0,
        g: 0,
        b: 0,
    };

    /// Creates a new unlit block of the specified type.
    ///
    /// # Arguments
    /// * `block_type` - The type of block to create
    ///
    /// # Returns
    /// A new `Block` instance with the specified type and all light channels at 0.
    pub fn new(block_type: BlockType) -> Self {
        Block {
            block_type: block_type as BlockTypeSize,
            ..Block::EMPTY
        }
    }

    /// Decoded block type.
    pub fn get_type(&self) -> BlockType {
        BlockType::from_int(self.block_type)
    }

    /// Whether this block occupies space.
    pub fn exists(&self) -> bool {
        self.get_type().exists()
    }

    /// Reads one light channel.
    pub fn light(&self, channel: LightChannel) -> u8 {
        match channel {
            LightChannel::Sun => self.sun,
            LightChannel::Red => self.r,
            LightChannel::Green => self.g,
            LightChannel::Blue => self.b,
        }
    }

    /// Writes one light channel.
    pub fn set_light(&mut self, channel: LightChannel, value: u8) {
        match channel {
            LightChannel::Sun => self.sun = value,
            LightChannel::Red => self.r = value,
            LightChannel::Green => self.g = value,
            LightChannel::Blue => self.b = value,
        }
    }
}

impl Default for Block {
    fn default() -> Self {
        Block::EMPTY
    }
}
