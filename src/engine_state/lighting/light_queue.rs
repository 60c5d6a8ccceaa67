//! FIFO worklist for light flood fills.

use std::collections::VecDeque;

/// A block whose light value still has to spread to its neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct LightNode {
    /// World X
    pub x: i32,
    /// World Y
    pub y: i32,
    /// World Z
    pub z: i32,
    /// Light value held by the block
    pub value: u8,
}

/// Breadth-first worklist of [`LightNode`]s.
///
/// Nodes are visited in push order, so the traversal is deterministic for a
/// given seed order.
#[derive(Debug, Default)]
pub struct LightQueue {
    nodes: VecDeque<LightNode>,
    pushed: usize,
}

impl LightQueue {
    /// Creates a queue with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: VecDeque::with_capacity(capacity),
            pushed: 0,
        }
    }

    /// Appends a node.
    pub fn push(&mut self, x: i32, y: i32, z: i32, value: u8) {
        self.nodes.push_back(LightNode { x, y, z, value });
        self.pushed += 1;
    }

    /// Takes the oldest node.
    pub fn pop(&mut self) -> Option<LightNode> {
        self.nodes.pop_front()
    }

    /// Whether no nodes are pending.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total pushes since creation.
    pub fn pushed(&self) -> usize {
        self.pushed
    }
}
