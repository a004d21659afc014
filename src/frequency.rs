use std::io::{self, BufReader, Read};

use crate::huffman::{Symbol, SymbolFrequency};

const NUMBER_OF_SYMBOLS: usize = Symbol::MAX as usize + 1;
const READ_BUFFER_SIZE: usize = 8192;

/// Occurrence count for every byte value of one input.
#[derive(Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    symbol_frequencies: [u64; NUMBER_OF_SYMBOLS],
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self {
            symbol_frequencies: [u64::default(); NUMBER_OF_SYMBOLS],
        }
    }

    /// Tallies every byte the reader yields until end of input.
    pub fn from_reader<R: Read>(reader: R) -> io::Result<Self> {
        let mut table = Self::new();
        let mut reader = BufReader::new(reader);
        let mut buffer = [0u8; READ_BUFFER_SIZE];
        loop {
            let bytes_read = match reader.read(&mut buffer) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            table.increment_symbols(&buffer[..bytes_read]);
        }
        Ok(table)
    }

    pub fn increment_symbol(&mut self, symbol: Symbol) {
        self.symbol_frequencies[symbol as usize] += 1;
    }

    pub fn increment_symbols(&mut self, symbols: &[Symbol]) {
        for &symbol in symbols {
            self.increment_symbol(symbol);
        }
    }

    pub fn set_count(&mut self, symbol: Symbol, count: u64) {
        self.symbol_frequencies[symbol as usize] = count;
    }

    pub fn count(&self, symbol: Symbol) -> u64 {
        self.symbol_frequencies[symbol as usize]
    }

    pub fn reset(&mut self) {
        self.symbol_frequencies = [u64::default(); NUMBER_OF_SYMBOLS];
    }

    pub fn distinct_symbols(&self) -> usize {
        self.symbol_frequencies.iter().filter(|&&f| f > 0).count()
    }

    /// Sum of all counts, `None` if it does not fit into a `u64`.
    pub fn total(&self) -> Option<u64> {
        self.symbol_frequencies
            .iter()
            .try_fold(0u64, |sum, &f| sum.checked_add(f))
    }

    pub fn is_empty(&self) -> bool {
        self.symbol_frequencies.iter().all(|&f| f == 0)
    }

    /// Nonzero entries in ascending symbol order.
    pub fn symbol_frequencies(&self) -> Vec<SymbolFrequency> {
        (0..=Symbol::MAX)
            .zip(self.symbol_frequencies.iter().copied())
            .filter(|&(_, f)| f > 0)
            .map(SymbolFrequency::from)
            .collect()
    }
}

impl Default for FrequencyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<Symbol> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = Symbol>>(symbols: T) -> Self {
        let mut table = Self::new();
        for symbol in symbols {
            table.increment_symbol(symbol);
        }
        table
    }
}

impl From<&[Symbol]> for FrequencyTable {
    fn from(value: &[Symbol]) -> Self {
        value.iter().copied().collect()
    }
}

impl From<&[(Symbol, u64)]> for FrequencyTable {
    fn from(value: &[(Symbol, u64)]) -> Self {
        let mut table = Self::new();
        for &(symbol, count) in value {
            table.set_count(symbol, count);
        }
        table
    }
}

impl std::fmt::Debug for FrequencyTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.symbol_frequencies()
                    .into_iter()
                    .map(|sf| (sf.symbol, sf.frequency)),
            )
            .finish()
    }
}
