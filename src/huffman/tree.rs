use bitvec::prelude::*;

use super::min_extractor::MinExtractor;
use super::node::{Node, NodeIndex, NodeKind, NodePool};
use super::{CodingError, ConsistencyViolation, Symbol, SymbolFrequency};
use crate::frequency::FrequencyTable;

pub struct HuffmanTree {
    nodes: NodePool,
    root_index: NodeIndex,
    leaf_count: usize,
}

/// Tracks the merge invariants while the open set is reduced to one root.
struct MergeGuard {
    previous_frequency: u64,
}

impl MergeGuard {
    fn new() -> Self {
        Self {
            previous_frequency: 0,
        }
    }

    fn merged_frequency(
        &mut self,
        first: &Node,
        second: &Node,
    ) -> Result<u64, ConsistencyViolation> {
        let frequency = first.frequency.checked_add(second.frequency).ok_or(
            ConsistencyViolation::FrequencyOverflow {
                left: second.frequency,
                right: first.frequency,
            },
        )?;
        if frequency < self.previous_frequency {
            return Err(ConsistencyViolation::NonMonotonicMerge {
                previous: self.previous_frequency,
                current: frequency,
            });
        }
        self.previous_frequency = frequency;
        Ok(frequency)
    }
}

impl HuffmanTree {
    pub fn new(frequencies: &FrequencyTable) -> Result<HuffmanTree, CodingError> {
        Self::from_symbol_frequencies(&frequencies.symbol_frequencies())
    }

    /// Greedy construction: the two least frequent open nodes are merged
    /// until a single root is left. The node extracted second becomes the
    /// left child (bit 0), the node extracted first the right child (bit 1).
    pub fn from_symbol_frequencies(
        symbols_and_frequencies: &[SymbolFrequency],
    ) -> Result<HuffmanTree, CodingError> {
        let leaf_symbols: Vec<&SymbolFrequency> = symbols_and_frequencies
            .iter()
            .filter(|sf| sf.frequency > 0)
            .collect();
        let mut seen = [false; Symbol::MAX as usize + 1];
        for sf in &leaf_symbols {
            if std::mem::replace(&mut seen[sf.symbol as usize], true) {
                log::error!("Symbol {} occurs twice in the frequency listing", sf.symbol);
                return Err(CodingError::DuplicateSymbol(sf.symbol));
            }
        }
        let leaf_count = leaf_symbols.len();
        if leaf_count == 0 {
            log::debug!("No symbol with nonzero frequency, no tree is built");
            return Err(CodingError::EmptyInput);
        }
        log::debug!("Building huffman tree from {} symbols", leaf_count);

        let mut nodes = NodePool::with_capacity(leaf_count);
        let mut open_set = MinExtractor::with_capacity(leaf_count);
        for sf in leaf_symbols {
            let leaf = nodes.push_leaf(sf.symbol, sf.frequency);
            open_set.insert(&leaf);
        }

        let mut guard = MergeGuard::new();
        while open_set.len() >= 2 {
            let first = *nodes.get(open_set.extract_min()?);
            let second = *nodes.get(open_set.extract_min()?);
            let frequency = guard
                .merged_frequency(&first, &second)
                .inspect_err(|v| log::error!("Aborting tree construction: {}", v))?;
            let node = nodes.push_inner(frequency, second.index, first.index);
            log::trace!(
                "Merged nodes {} (f:{}) and {} (f:{}) into node {} (f:{})",
                second.index,
                second.frequency,
                first.index,
                first.frequency,
                node.index,
                node.frequency
            );
            open_set.insert(&node);
        }
        let root_index = open_set.extract_min()?;
        debug_assert!(open_set.is_empty());

        Ok(HuffmanTree {
            nodes,
            root_index,
            leaf_count,
        })
    }

    pub fn root(&self) -> &Node {
        self.nodes.get(self.root_index)
    }

    /// # Panics
    ///
    /// Panics if `index` does not belong to a node of this tree, i.e. it is
    /// not smaller than [`HuffmanTree::node_count`].
    pub fn node(&self, index: NodeIndex) -> &Node {
        self.nodes.get(index)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn total_frequency(&self) -> u64 {
        self.root().frequency
    }

    /// A tree made of a single leaf, built from input with one distinct symbol.
    pub fn is_degenerate(&self) -> bool {
        self.root().is_leaf()
    }

    /// Number of edges between the root and the leaf of `symbol`.
    pub fn depth_of_symbol(&self, symbol: Symbol) -> Option<usize> {
        let mut node_index_stack = vec![(self.root_index, 0)];
        while let Some((index, depth)) = node_index_stack.pop() {
            match self.nodes.get(index).kind {
                NodeKind::Leaf { symbol: s } if s == symbol => return Some(depth),
                NodeKind::Leaf { .. } => continue,
                NodeKind::Inner { left, right } => {
                    node_index_stack.push((right, depth + 1));
                    node_index_stack.push((left, depth + 1));
                }
            }
        }
        None
    }

    /// Walks the tree bit by bit, restarting at the root after every leaf.
    pub fn decode(&self, bits: &BitSlice<u8, Msb0>) -> Result<Vec<Symbol>, CodingError> {
        if let NodeKind::Leaf { symbol } = self.root().kind {
            if bits.any() {
                return Err(CodingError::DecoderError);
            }
            return Ok(vec![symbol; bits.len()]);
        }

        let mut out = Vec::new();
        let mut current_index = self.root_index;
        for take_right in bits.iter().by_vals() {
            current_index = match self.nodes.get(current_index).kind {
                NodeKind::Inner { left, right } => {
                    if take_right {
                        right
                    } else {
                        left
                    }
                }
                NodeKind::Leaf { .. } => unreachable!("decoding restarts at the root after a leaf"),
            };
            if let NodeKind::Leaf { symbol } = self.nodes.get(current_index).kind {
                out.push(symbol);
                current_index = self.root_index;
            }
        }
        if current_index != self.root_index {
            return Err(CodingError::DecoderError);
        }
        Ok(out)
    }

    /// Decodes the first `bit_count` bits of a byte padded stream.
    pub fn decode_bytes(
        &self,
        bytes: &[u8],
        bit_count: usize,
    ) -> Result<Vec<Symbol>, CodingError> {
        let bits = bytes.view_bits::<Msb0>();
        if bit_count > bits.len() {
            return Err(CodingError::DecoderError);
        }
        self.decode(&bits[..bit_count])
    }
}

#[cfg(test)]
mod test {
    use bitvec::prelude::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    use super::{HuffmanTree, MergeGuard};
    use crate::frequency::FrequencyTable;
    use crate::huffman::node::{NodeKind, NodePool};
    use crate::huffman::{CodingError, ConsistencyViolation, SymbolFrequency};

    fn symbol_frequencies(pairs: &[(u8, u64)]) -> Vec<SymbolFrequency> {
        pairs.iter().copied().map(SymbolFrequency::from).collect()
    }

    fn calculate_depth_for_each_symbol(tree: &HuffmanTree, pairs: &[(u8, u64)]) -> Vec<usize> {
        pairs
            .iter()
            .map(|&(symbol, _)| {
                tree.depth_of_symbol(symbol)
                    .expect("every symbol must have a leaf")
            })
            .collect()
    }

    const TEXTBOOK_FREQUENCIES: &[(u8, u64); 6] = &[
        (b'a', 5),
        (b'b', 9),
        (b'c', 12),
        (b'd', 13),
        (b'e', 16),
        (b'f', 45),
    ];

    #[test]
    fn test_textbook_distribution_depths() {
        let tree =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(TEXTBOOK_FREQUENCIES)).unwrap();
        let depths = calculate_depth_for_each_symbol(&tree, TEXTBOOK_FREQUENCIES);
        let expected_depths = [4, 4, 3, 3, 3, 1];
        for (index, (depth, expected_depth)) in
            depths.into_iter().zip(expected_depths).enumerate()
        {
            assert_eq!(
                depth, expected_depth,
                "Depth at index {} does not match",
                index
            );
        }
        assert_eq!(tree.total_frequency(), 100);
        assert_eq!(tree.leaf_count(), 6);
        assert_eq!(tree.node_count(), 11);
    }

    #[test]
    fn test_second_extracted_becomes_left_child() {
        let tree = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(b'x', 1), (b'y', 1)]))
            .unwrap();
        match tree.root().kind {
            NodeKind::Inner { left, right } => {
                assert_eq!(tree.node(left).kind, NodeKind::Leaf { symbol: b'y' });
                assert_eq!(tree.node(right).kind, NodeKind::Leaf { symbol: b'x' });
            }
            NodeKind::Leaf { .. } => panic!("Two symbols must produce an inner root"),
        }
    }

    #[test]
    fn test_construction_is_deterministic() {
        let pairs = [(3, 7), (9, 7), (1, 7), (200, 2), (4, 2), (5, 14)];
        let render = |tree: &HuffmanTree| -> Vec<(u64, NodeKind)> {
            tree.nodes().map(|n| (n.frequency, n.kind)).collect()
        };
        let first = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&pairs)).unwrap();
        for _ in 0..10 {
            let again = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&pairs)).unwrap();
            assert_eq!(render(&first), render(&again), "Tree shape differs between runs");
        }
    }

    #[test]
    fn test_single_symbol_becomes_root() {
        let tree = HuffmanTree::new(&FrequencyTable::from(b"zzzz".as_slice())).unwrap();
        assert!(tree.is_degenerate());
        assert_eq!(tree.root().kind, NodeKind::Leaf { symbol: b'z' });
        assert_eq!(tree.total_frequency(), 4);
        assert_eq!(tree.depth_of_symbol(b'z'), Some(0));
    }

    #[test]
    fn test_empty_input_builds_no_tree() {
        let result = HuffmanTree::new(&FrequencyTable::new());
        assert!(matches!(result, Err(CodingError::EmptyInput)));
        let result = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(1, 0), (2, 0)]));
        assert!(matches!(result, Err(CodingError::EmptyInput)));
    }

    #[test]
    fn test_zero_frequency_symbols_have_no_leaf() {
        let tree =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(1, 3), (2, 0), (3, 5)]))
                .unwrap();
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth_of_symbol(2), None);
    }

    #[test]
    fn test_merges_are_exact_sums_for_random_tables() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let mut table = FrequencyTable::new();
            let distinct = rng.gen_range(1..=256);
            for _ in 0..distinct {
                table.set_count(rng.gen(), rng.gen_range(0..1_000_000));
            }
            if table.is_empty() {
                continue;
            }
            let tree = HuffmanTree::new(&table).expect("valid table must not fail");
            for node in tree.nodes() {
                if let NodeKind::Inner { left, right } = node.kind {
                    assert_eq!(
                        node.frequency,
                        tree.node(left).frequency + tree.node(right).frequency,
                        "Inner node {} is not the sum of its children",
                        node.index
                    );
                }
            }
            assert_eq!(Some(tree.total_frequency()), table.total());
        }
    }

    #[test]
    fn test_merge_frequencies_never_decrease() {
        let tree = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[
            (1, 17),
            (2, 3),
            (3, 12),
            (4, 3),
            (5, 18),
            (6, 12),
            (7, 13),
        ]))
        .unwrap();
        let merged: Vec<u64> = tree
            .nodes()
            .filter(|n| !n.is_leaf())
            .map(|n| n.frequency)
            .collect();
        assert!(merged.windows(2).all(|w| w[0] <= w[1]), "{:?}", merged);
    }

    #[test]
    fn test_repeated_symbol_is_rejected() {
        let result = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(1, 3), (1, 4)]));
        assert!(matches!(result, Err(CodingError::DuplicateSymbol(1))));
        let result =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(7, 2), (8, 5), (7, 1)]));
        assert!(matches!(result, Err(CodingError::DuplicateSymbol(7))));
    }

    #[test]
    fn test_repeated_symbol_without_count_is_ignored() {
        let tree =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(1, 3), (1, 0), (2, 4)]))
                .unwrap();
        assert_eq!(tree.leaf_count(), 2);
    }

    #[test]
    fn test_smaller_merge_than_previous_is_rejected() {
        let mut pool = NodePool::with_capacity(4);
        let a = pool.push_leaf(1, 4);
        let b = pool.push_leaf(2, 5);
        let c = pool.push_leaf(3, 1);
        let d = pool.push_leaf(4, 2);
        let mut guard = MergeGuard::new();
        assert_eq!(guard.merged_frequency(&a, &b), Ok(9));
        assert_eq!(
            guard.merged_frequency(&c, &d),
            Err(ConsistencyViolation::NonMonotonicMerge {
                previous: 9,
                current: 3
            })
        );
        assert_eq!(guard.merged_frequency(&a, &b), Ok(9));
    }

    #[test]
    #[should_panic]
    fn test_node_outside_of_tree_panics() {
        let tree = HuffmanTree::new(&FrequencyTable::from(b"ab".as_slice())).unwrap();
        tree.node(tree.node_count());
    }

    #[test]
    fn test_frequency_overflow_is_reported() {
        let result = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[
            (1, u64::MAX - 1),
            (2, 2),
        ]));
        assert!(matches!(result, Err(CodingError::InternalConsistency(_))));
    }

    #[test]
    fn test_decode_textbook_bits() {
        let tree =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(TEXTBOOK_FREQUENCIES)).unwrap();
        // f:1 e:000 b:0010 a:0011 d:010 c:011
        let bits = bits![u8, Msb0; 1, 0, 0, 0, 0, 0, 1, 0, 0, 0, 1, 1, 0, 1, 0, 0, 1, 1, 1];
        let decoded = tree.decode(bits).unwrap();
        assert_eq!(decoded, b"febadcf".to_vec());
    }

    #[test]
    fn test_decode_truncated_code_word_fails() {
        let tree =
            HuffmanTree::from_symbol_frequencies(&symbol_frequencies(TEXTBOOK_FREQUENCIES)).unwrap();
        let bits = bits![u8, Msb0; 1, 0, 0];
        assert_eq!(tree.decode(bits), Err(CodingError::DecoderError));
    }

    #[test]
    fn test_decode_degenerate_tree() {
        let tree = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(b'q', 9)])).unwrap();
        assert_eq!(tree.decode(bits![u8, Msb0; 0, 0, 0]).unwrap(), b"qqq".to_vec());
        assert_eq!(
            tree.decode(bits![u8, Msb0; 0, 1]),
            Err(CodingError::DecoderError)
        );
    }

    #[test]
    fn test_decode_bytes_respects_bit_count() {
        let tree = HuffmanTree::from_symbol_frequencies(&symbol_frequencies(&[(b'x', 1), (b'y', 1)]))
            .unwrap();
        // y:0 x:1, padding bits after the third bit are ignored
        let decoded = tree.decode_bytes(&[0b0101_1111], 3).unwrap();
        assert_eq!(decoded, b"yxy".to_vec());
        assert_eq!(
            tree.decode_bytes(&[0], 9),
            Err(CodingError::DecoderError)
        );
    }
}
