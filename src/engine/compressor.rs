use std::io::{self, Cursor};

use tracing::{debug, info, trace};

use crate::engine::config::EngineConfig;
use crate::engine::frequency::FrequencyTable;
use crate::engine::header::write_header;
use crate::engine::huffman::{code_string, symbol_name, CodeTable, HuffmanTree};
use crate::metrics::CodecStats;
use crate::protocol::constants::{BITS_PER_INT, BITS_PER_WORD, HUFF_TREE, PSEUDO_EOF};
use crate::protocol::error::{CodecError, Result};
use crate::utils::bitio::{BitInputStream, BitOutputStream, BitRewind, BitWrite};

/// Two passes over `input`: count, rewind, encode. Writes the magic, the
/// tree header and the payload terminated by the pseudo-EOF code, then
/// flushes `out`.
pub fn compress<R, W>(input: &mut R, out: &mut W, config: &EngineConfig) -> Result<CodecStats>
where
    R: BitRewind,
    W: BitWrite,
{
    let freqs = FrequencyTable::count(input)?;
    let tree = HuffmanTree::build(&freqs);
    let codes = tree.code_table();

    if config.summaries() {
        info!(
            "Built tree with {} leaves, longest code {} bits",
            tree.leaf_count(),
            codes.max_len()
        );
    }
    if config.verbose() {
        for (symbol, code) in codes.iter() {
            trace!("{} [{}] => {}", symbol_name(symbol), freqs.get(symbol), code_string(code));
        }
    }

    let start = out.bits_written();
    out.write_bits(BITS_PER_INT, HUFF_TREE)?;
    write_header(tree.root(), out)?;
    let header_bits = out.bits_written() - start - BITS_PER_INT as u64;
    debug!("Wrote {} header bits", header_bits);

    input.reset()?;
    let payload_start = out.bits_written();
    let input_bytes = write_payload(input, out, &codes)?;
    if input_bytes != freqs.total_bytes() {
        return Err(invalid_data(format!(
            "input changed between passes: counted {} bytes, encoded {}",
            freqs.total_bytes(),
            input_bytes
        )));
    }
    let payload_bits = out.bits_written() - payload_start;

    out.flush_bits()?;

    let total_bits = out.bits_written() - start;
    let stats = CodecStats {
        input_bytes,
        output_bytes: total_bits.div_ceil(8),
        header_bits,
        payload_bits,
        leaves: tree.leaf_count(),
        max_code_len: codes.max_len(),
    };
    if config.summaries() {
        info!(
            "Compressed {} bytes to {} ({} payload bits)",
            stats.input_bytes, stats.output_bytes, stats.payload_bits
        );
    }
    Ok(stats)
}

fn write_payload<R, W>(input: &mut R, out: &mut W, codes: &CodeTable) -> Result<u64>
where
    R: BitRewind,
    W: BitWrite,
{
    let mut count = 0u64;

    while let Some(word) = input.read_bits(BITS_PER_WORD)? {
        let code = codes
            .get(word as u16)
            .ok_or_else(|| invalid_data(format!("byte {:#04x} not seen during counting pass", word)))?;
        write_code(out, code)?;
        count += 1;
    }

    let eof = codes
        .get(PSEUDO_EOF)
        .ok_or_else(|| invalid_data("code table has no PSEUDO_EOF".to_string()))?;
    write_code(out, eof)?;

    Ok(count)
}

fn invalid_data(msg: String) -> CodecError {
    CodecError::Io(io::Error::new(io::ErrorKind::InvalidData, msg))
}

fn write_code<W: BitWrite>(out: &mut W, code: &[bool]) -> io::Result<()> {
    for &bit in code {
        out.write_bits(1, bit as u32)?;
    }
    Ok(())
}

/// Compress an in-memory buffer
pub fn compress_bytes(data: &[u8], config: &EngineConfig) -> Result<(Vec<u8>, CodecStats)> {
    let mut input = BitInputStream::new(Cursor::new(data));
    let mut out = BitOutputStream::new(Vec::new());
    let stats = compress(&mut input, &mut out, config)?;
    Ok((out.close()?, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::bitio::BitRead;

    /// Serves `first` until rewound, then `second`
    struct Shifting {
        first: BitInputStream<Cursor<Vec<u8>>>,
        second: BitInputStream<Cursor<Vec<u8>>>,
        rewound: bool,
    }

    impl BitRead for Shifting {
        fn read_bits(&mut self, count: u32) -> io::Result<Option<u32>> {
            if self.rewound {
                self.second.read_bits(count)
            } else {
                self.first.read_bits(count)
            }
        }

        fn bits_read(&self) -> u64 {
            self.first.bits_read() + self.second.bits_read()
        }
    }

    impl BitRewind for Shifting {
        fn reset(&mut self) -> io::Result<()> {
            self.rewound = true;
            Ok(())
        }
    }

    #[test]
    fn literal_scenario_layout() {
        let (bytes, stats) = compress_bytes(&[0x41, 0x41, 0x42], &EngineConfig::default()).unwrap();

        // magic, 32 header bits, then A A B EOF = 0 0 10 11
        assert_eq!(&bytes[..4], &HUFF_TREE.to_be_bytes());
        assert_eq!(&bytes[4..8], &[0b0100_1000, 0b0010_1001, 0b0000_1011, 0b0000_0000]);
        assert_eq!(bytes[8], 0b0010_1100);
        assert_eq!(bytes.len(), 9);

        assert_eq!(stats.input_bytes, 3);
        assert_eq!(stats.output_bytes, 9);
        assert_eq!(stats.header_bits, 32);
        assert_eq!(stats.payload_bits, 6);
        assert_eq!(stats.leaves, 3);
        assert_eq!(stats.max_code_len, 2);
    }

    #[test]
    fn empty_input_writes_magic_header_and_eof() {
        let (bytes, stats) = compress_bytes(&[], &EngineConfig::default()).unwrap();

        // 0 1[0] 1[256] then EOF code "1"
        assert_eq!(stats.header_bits, 21);
        assert_eq!(stats.payload_bits, 1);
        assert_eq!(bytes.len(), 4 + 3);
    }

    #[test]
    fn identical_input_gives_identical_output() {
        let data = b"the quick brown fox jumps over the lazy dog".repeat(20);
        let config = EngineConfig::with_debug(4);
        let (a, _) = compress_bytes(&data, &config).unwrap();
        let (b, _) = compress_bytes(&data, &config).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn skewed_input_shrinks() {
        let mut data = vec![b'a'; 4000];
        data.extend_from_slice(b"bcdefg");
        let (bytes, stats) = compress_bytes(&data, &EngineConfig::default()).unwrap();
        assert!(bytes.len() < data.len() / 4);
        assert!(stats.compression_ratio() < 0.25);
    }

    #[test]
    fn input_growing_between_passes_is_rejected() {
        let mut input = Shifting {
            first: BitInputStream::new(Cursor::new(b"abc".to_vec())),
            second: BitInputStream::new(Cursor::new(b"abcabc".to_vec())),
            rewound: false,
        };
        let mut out = BitOutputStream::new(Vec::new());

        let err = compress(&mut input, &mut out, &EngineConfig::default()).unwrap_err();
        match err {
            CodecError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::InvalidData),
            other => panic!("unexpected error {other}"),
        }
    }
}
