use std::fmt;

use crate::frequency::FrequencyTable;
use crate::huffman::code::BitString;
use crate::huffman::render::symbol_label;
use crate::huffman::{CodeTable, HuffmanTree, TreeRenderer};

/// Outcome of analysing one input: its frequencies, tree and code table.
pub struct Report {
    pub name: String,
    pub frequencies: FrequencyTable,
    pub tree: HuffmanTree,
    pub code_table: CodeTable,
    pub show_tree: bool,
    pub round_trip_verified: bool,
}

impl Report {
    pub fn input_bytes(&self) -> u64 {
        self.tree.total_frequency()
    }

    /// `None` if the encoded size does not fit into a `u64`.
    pub fn encoded_bits(&self) -> Option<u64> {
        self.code_table.encoded_bit_length(&self.frequencies)
    }

    pub fn encoded_bytes(&self) -> Option<u64> {
        self.encoded_bits().map(|bits| bits.div_ceil(8))
    }

    fn write_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} bytes, {} distinct symbols",
            self.name,
            self.input_bytes(),
            self.code_table.len()
        )
    }

    fn write_code_table(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>6} {:>12} {:>6}  code word", "symbol", "count", "length")?;
        for (symbol, code_word) in self.code_table.iter() {
            writeln!(
                f,
                "{:>6} {:>12} {:>6}  {}",
                symbol_label(symbol),
                self.frequencies.count(symbol),
                code_word.len(),
                BitString(code_word)
            )?;
        }
        Ok(())
    }

    fn write_statistics(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.encoded_bits(), self.encoded_bytes()) {
            (Some(bits), Some(bytes)) => {
                write!(f, "encoded size: {} bits ({} bytes)", bits, bytes)?
            }
            _ => write!(f, "encoded size: more than {} bits", u64::MAX)?,
        }
        writeln!(
            f,
            ", average code length {:.3} bits/symbol",
            self.code_table.average_code_length(&self.frequencies)
        )?;
        if self.round_trip_verified {
            writeln!(f, "round trip verified")?;
        }
        Ok(())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_summary(f)?;
        self.write_code_table(f)?;
        self.write_statistics(f)?;
        if self.show_tree {
            writeln!(f)?;
            write!(f, "{}", TreeRenderer::new(&self.tree, &self.code_table))?;
        }
        write!(f, "A tree has been constructed successfully.")
    }
}
