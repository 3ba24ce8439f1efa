use std::io;

use tracing::debug;

use crate::protocol::constants::{BITS_PER_WORD, PSEUDO_EOF, SYMBOL_COUNT};
use crate::utils::bitio::BitRead;

/// Occurrence count for every byte value plus the pseudo-EOF
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: [u64; SYMBOL_COUNT],
}

impl FrequencyTable {
    /// Scan `input` to its end. The stream is left exhausted and must be
    /// rewound before it is read again.
    pub fn count<R: BitRead>(input: &mut R) -> io::Result<Self> {
        let mut counts = [0u64; SYMBOL_COUNT];
        let mut total = 0u64;

        while let Some(word) = input.read_bits(BITS_PER_WORD)? {
            counts[word as usize] += 1;
            total += 1;
        }
        counts[PSEUDO_EOF as usize] = 1;

        debug!("Counted {} input bytes", total);
        Ok(Self { counts })
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut counts = [0u64; SYMBOL_COUNT];
        for &b in bytes {
            counts[b as usize] += 1;
        }
        counts[PSEUDO_EOF as usize] = 1;
        Self { counts }
    }

    pub fn get(&self, symbol: u16) -> u64 {
        self.counts[symbol as usize]
    }

    /// Symbols with a nonzero count, in ascending symbol order
    pub fn present(&self) -> impl Iterator<Item = (u16, u64)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .filter(|&(_, &c)| c > 0)
            .map(|(s, &c)| (s as u16, c))
    }

    /// Literal bytes counted, excluding the pseudo-EOF
    pub fn total_bytes(&self) -> u64 {
        self.counts[..PSEUDO_EOF as usize].iter().sum()
    }
}
