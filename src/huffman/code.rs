use std::fmt;

use bitvec::prelude::*;

use super::node::{NodeIndex, NodeKind};
use super::tree::HuffmanTree;
use super::Symbol;
use crate::frequency::FrequencyTable;

const NUMBER_OF_SYMBOLS: usize = Symbol::MAX as usize + 1;

/// Root to leaf path, `0` for a left edge and `1` for a right edge.
pub type Codeword = BitVec<u8, Msb0>;

pub struct CodeTable {
    code_words: [Option<Codeword>; NUMBER_OF_SYMBOLS],
    len: usize,
}

/// Traversal state: the path taken so far and the table being filled.
struct CodeAssigner<'a> {
    tree: &'a HuffmanTree,
    prefix: Codeword,
    table: CodeTable,
}

impl<'a> CodeAssigner<'a> {
    fn new(tree: &'a HuffmanTree) -> Self {
        Self {
            tree,
            prefix: Codeword::new(),
            table: CodeTable::empty(),
        }
    }

    fn assign(mut self) -> CodeTable {
        let root = *self.tree.root();
        match root.kind {
            // a lone leaf still needs one bit to be encodable
            NodeKind::Leaf { symbol } => self.table.insert(symbol, bitvec![u8, Msb0; 0]),
            NodeKind::Inner { .. } => self.visit(root.index),
        }
        self.table
    }

    fn visit(&mut self, index: NodeIndex) {
        match self.tree.node(index).kind {
            NodeKind::Leaf { symbol } => {
                self.table.insert(symbol, self.prefix.clone());
            }
            NodeKind::Inner { left, right } => {
                self.prefix.push(false);
                self.visit(left);
                self.prefix.pop();
                self.prefix.push(true);
                self.visit(right);
                self.prefix.pop();
            }
        }
    }
}

impl CodeTable {
    pub fn new(tree: &HuffmanTree) -> CodeTable {
        let table = CodeAssigner::new(tree).assign();
        log::debug!(
            "Assigned {} code words, longest has {} bits",
            table.len(),
            table.max_code_length()
        );
        table
    }

    fn empty() -> Self {
        Self {
            code_words: [const { None }; NUMBER_OF_SYMBOLS],
            len: 0,
        }
    }

    fn insert(&mut self, symbol: Symbol, code_word: Codeword) {
        let entry = &mut self.code_words[symbol as usize];
        assert!(
            entry.is_none(),
            "symbol {} reached by two different paths",
            symbol
        );
        *entry = Some(code_word);
        self.len += 1;
    }

    pub fn get(&self, symbol: Symbol) -> Option<&Codeword> {
        self.code_words[symbol as usize].as_ref()
    }

    pub fn code_length(&self, symbol: Symbol) -> Option<usize> {
        self.get(symbol).map(|code_word| code_word.len())
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Symbols with their code words in ascending symbol order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Codeword)> {
        (0..=Symbol::MAX)
            .zip(self.code_words.iter())
            .filter_map(|(symbol, code_word)| code_word.as_ref().map(|c| (symbol, c)))
    }

    pub fn max_code_length(&self) -> usize {
        self.iter().map(|(_, c)| c.len()).max().unwrap_or(0)
    }

    /// Size of the input in bits once every symbol is replaced by its code word.
    /// `None` if that size does not fit into a `u64`.
    pub fn encoded_bit_length(&self, frequencies: &FrequencyTable) -> Option<u64> {
        frequencies
            .symbol_frequencies()
            .iter()
            .try_fold(0u64, |bits, sf| {
                let code_length = self.code_length(sf.symbol).unwrap_or(0) as u64;
                bits.checked_add(sf.frequency.checked_mul(code_length)?)
            })
    }

    pub fn average_code_length(&self, frequencies: &FrequencyTable) -> f64 {
        let (weighted, total) = frequencies.symbol_frequencies().iter().fold(
            (0.0, 0.0),
            |(weighted, total): (f64, f64), sf| {
                let code_length = self.code_length(sf.symbol).unwrap_or(0) as f64;
                let frequency = sf.frequency as f64;
                (weighted + frequency * code_length, total + frequency)
            },
        );
        if total == 0.0 {
            0.0
        } else {
            weighted / total
        }
    }
}

/// Formats a code word as a string of `0` and `1`.
pub struct BitString<'a>(pub &'a BitSlice<u8, Msb0>);

impl fmt::Display for BitString<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for bit in self.0.iter().by_vals() {
            write!(f, "{}", if bit { '1' } else { '0' })?;
        }
        Ok(())
    }
}
