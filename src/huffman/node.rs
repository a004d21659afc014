use super::Symbol;

pub type NodeIndex = usize;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Leaf { symbol: Symbol },
    Inner { left: NodeIndex, right: NodeIndex },
}

#[derive(Clone, Copy, Debug)]
pub struct Node {
    pub frequency: u64,
    pub index: NodeIndex,
    pub kind: NodeKind,
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }
}

/// Arena owning every node of one tree. Nodes are only ever appended, so a
/// node's index is also its creation order.
#[derive(Default)]
pub struct NodePool {
    nodes: Vec<Node>,
}

impl NodePool {
    pub fn with_capacity(leaf_count: usize) -> Self {
        // a full binary tree with n leaves has n - 1 inner nodes
        Self {
            nodes: Vec::with_capacity((2 * leaf_count).saturating_sub(1)),
        }
    }

    pub fn push_leaf(&mut self, symbol: Symbol, frequency: u64) -> Node {
        self.push(frequency, NodeKind::Leaf { symbol })
    }

    pub fn push_inner(&mut self, frequency: u64, left: NodeIndex, right: NodeIndex) -> Node {
        debug_assert!(left < self.nodes.len() && right < self.nodes.len());
        self.push(frequency, NodeKind::Inner { left, right })
    }

    fn push(&mut self, frequency: u64, kind: NodeKind) -> Node {
        let node = Node {
            frequency,
            index: self.nodes.len(),
            kind,
        };
        self.nodes.push(node);
        node
    }

    /// Panics if `index` is not smaller than [`NodePool::len`].
    pub fn get(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }
}
