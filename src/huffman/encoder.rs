use bitvec::prelude::*;

use super::code::CodeTable;
use super::{CodingError, Symbol};

/// Encoded symbols, not padded to a byte boundary.
pub struct Encoded {
    pub bits: BitVec<u8, Msb0>,
}

impl Encoded {
    pub fn bit_len(&self) -> usize {
        self.bits.len()
    }

    /// Bytes of the bit sequence, the last one zero padded.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bits = self.bits.clone();
        bits.set_uninitialized(false);
        bits.into_vec()
    }
}

pub struct HuffmanEncoder<'a> {
    code_table: &'a CodeTable,
}

impl<'a> HuffmanEncoder<'a> {
    pub fn new(code_table: &'a CodeTable) -> Self {
        Self { code_table }
    }

    pub fn encode_sequence(&self, seq: &[Symbol]) -> Result<Encoded, CodingError> {
        let mut bits = BitVec::<u8, Msb0>::new();
        for &symbol in seq {
            let code_word = self
                .code_table
                .get(symbol)
                .ok_or(CodingError::UnknownSymbol(symbol))?;
            bits.extend_from_bitslice(code_word.as_bitslice());
        }
        Ok(Encoded { bits })
    }
}
