use std::fmt::{self, Display};

use crate::frequency::FrequencyTable;

pub mod code;
pub mod encoder;
mod min_extractor;
pub mod node;
pub mod render;
pub mod tree;

pub use code::{CodeTable, Codeword};
pub use encoder::HuffmanEncoder;
pub use node::{Node, NodeIndex, NodeKind};
pub use render::TreeRenderer;
pub use tree::HuffmanTree;

pub type Symbol = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolFrequency {
    pub symbol: Symbol,
    pub frequency: u64,
}

impl From<(Symbol, u64)> for SymbolFrequency {
    fn from(value: (Symbol, u64)) -> Self {
        Self {
            symbol: value.0,
            frequency: value.1,
        }
    }
}

/// Broken invariants during tree construction. Any of these means the
/// resulting tree would be unsound, so the run is aborted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsistencyViolation {
    ExtractFromEmptyOpenSet,
    FrequencyOverflow { left: u64, right: u64 },
    NonMonotonicMerge { previous: u64, current: u64 },
}

#[derive(Debug, PartialEq, Eq)]
pub enum CodingError {
    EmptyInput,
    DuplicateSymbol(Symbol),
    InternalConsistency(ConsistencyViolation),
    UnknownSymbol(Symbol),
    DecoderError,
}

impl Display for ConsistencyViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ExtractFromEmptyOpenSet => {
                write!(f, "attempted to extract a node from an empty open set")
            }
            Self::FrequencyOverflow { left, right } => {
                write!(
                    f,
                    "merging frequencies {} and {} overflows the frequency type",
                    left, right
                )
            }
            Self::NonMonotonicMerge { previous, current } => {
                write!(
                    f,
                    "merged frequency {} is smaller than previous merge {}",
                    current, previous
                )
            }
        }
    }
}

impl Display for CodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "Input contains no symbols, no tree can be built"),
            Self::DuplicateSymbol(symbol) => {
                write!(f, "Symbol {:#04X} is listed more than once", symbol)
            }
            Self::InternalConsistency(violation) => {
                write!(f, "Internal consistency failure: {}", violation)
            }
            Self::UnknownSymbol(symbol) => {
                write!(f, "Symbol {:#04X} has no code word", symbol)
            }
            Self::DecoderError => write!(f, "Bit sequence does not end on a code word boundary"),
        }
    }
}

impl std::error::Error for CodingError {}

impl From<ConsistencyViolation> for CodingError {
    fn from(value: ConsistencyViolation) -> Self {
        Self::InternalConsistency(value)
    }
}

/// Builds the tree and assigns code words in one step. Either both are
/// returned or neither.
pub fn build_code(frequencies: &FrequencyTable) -> Result<(HuffmanTree, CodeTable), CodingError> {
    let tree = HuffmanTree::new(frequencies)?;
    let code_table = CodeTable::new(&tree);
    Ok((tree, code_table))
}
