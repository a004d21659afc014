use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use super::node::{Node, NodeIndex};
use super::ConsistencyViolation;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct OpenNode {
    frequency: u64,
    index: NodeIndex,
}

// Lower frequency first; equal frequencies are resolved in favour of the
// node that was created first.
impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.frequency
            .cmp(&other.frequency)
            .then(self.index.cmp(&other.index))
    }
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The open set of not yet merged nodes.
pub struct MinExtractor {
    heap: BinaryHeap<Reverse<OpenNode>>,
}

impl MinExtractor {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            heap: BinaryHeap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, node: &Node) {
        self.heap.push(Reverse(OpenNode {
            frequency: node.frequency,
            index: node.index,
        }));
    }

    pub fn extract_min(&mut self) -> Result<NodeIndex, ConsistencyViolation> {
        self.heap
            .pop()
            .map(|Reverse(open_node)| open_node.index)
            .ok_or(ConsistencyViolation::ExtractFromEmptyOpenSet)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
