use std::io::Cursor;

use tracing::{debug, error, info};

use crate::engine::config::EngineConfig;
use crate::engine::header::read_header;
use crate::engine::huffman::{HuffmanNode, HuffmanTree};
use crate::metrics::CodecStats;
use crate::protocol::constants::{BITS_PER_INT, BITS_PER_WORD, HUFF_TREE, PSEUDO_EOF};
use crate::protocol::error::{CodecError, Result};
use crate::utils::bitio::{BitInputStream, BitOutputStream, BitRead, BitWrite};

/// Outcome of feeding one payload bit to the [`Decoder`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Still inside the tree
    Continue,
    /// Reached a literal leaf; the walk restarts at the root
    Emit(u8),
    /// Reached the pseudo-EOF leaf
    Accept,
}

/// Bit-at-a-time walk over a decoded tree
pub struct Decoder<'a> {
    root: &'a HuffmanNode,
    current: &'a HuffmanNode,
}

impl<'a> Decoder<'a> {
    pub fn new(tree: &'a HuffmanTree) -> Result<Self> {
        let root = tree.root();
        if let HuffmanNode::Leaf { .. } = root {
            error!("Tree header holds a lone leaf");
            return Err(CodecError::MalformedHeader);
        }
        Ok(Self { root, current: root })
    }

    pub fn step(&mut self, bit: bool) -> Result<Step> {
        let next = self.current.child(bit).ok_or(CodecError::MalformedHeader)?;

        match next {
            HuffmanNode::Internal { .. } => {
                self.current = next;
                Ok(Step::Continue)
            }
            HuffmanNode::Leaf { symbol, .. } => {
                self.current = self.root;
                if *symbol == PSEUDO_EOF {
                    Ok(Step::Accept)
                } else {
                    Ok(Step::Emit(*symbol as u8))
                }
            }
        }
    }
}

/// Read and validate the magic, then the tree header
pub fn read_tree<R: BitRead>(input: &mut R) -> Result<HuffmanTree> {
    let magic = match input.read_bits(BITS_PER_INT)? {
        Some(m) => m,
        None => {
            error!("Input shorter than the format magic");
            return Err(CodecError::MissingMagic);
        }
    };
    if magic != HUFF_TREE {
        error!("illegal header starts with {:#010x}", magic);
        return Err(CodecError::InvalidMagic(magic));
    }

    let root = read_header(input)?;
    Ok(HuffmanTree::from_root(root))
}

/// Inverse of `compress`. Nothing is written to `out` unless the magic
/// and tree header parse.
pub fn decompress<R, W>(input: &mut R, out: &mut W, config: &EngineConfig) -> Result<CodecStats>
where
    R: BitRead,
    W: BitWrite,
{
    let start = input.bits_read();
    let tree = read_tree(input)?;
    let mut decoder = Decoder::new(&tree)?;
    let header_bits = input.bits_read() - start - BITS_PER_INT as u64;
    debug!("Read {} header bits, {} leaves", header_bits, tree.leaf_count());

    let payload_start = input.bits_read();
    let mut decoded = 0u64;

    loop {
        let Some(bit) = input.read_bits(1)? else {
            error!("Payload ended without PSEUDO_EOF after {} bytes", decoded);
            out.flush_bits()?;
            return Err(CodecError::TruncatedPayload { decoded });
        };

        match decoder.step(bit == 1)? {
            Step::Continue => {}
            Step::Emit(byte) => {
                out.write_bits(BITS_PER_WORD, byte as u32)?;
                decoded += 1;
            }
            Step::Accept => break,
        }
    }

    out.flush_bits()?;

    let payload_bits = input.bits_read() - payload_start;
    let stats = CodecStats {
        input_bytes: (input.bits_read() - start).div_ceil(8),
        output_bytes: decoded,
        header_bits,
        payload_bits,
        leaves: tree.leaf_count(),
        max_code_len: tree.depth(),
    };
    if config.summaries() {
        info!(
            "Decompressed {} bytes from {} payload bits",
            stats.output_bytes, stats.payload_bits
        );
    }
    Ok(stats)
}

/// Decompress an in-memory buffer
pub fn decompress_bytes(data: &[u8], config: &EngineConfig) -> Result<(Vec<u8>, CodecStats)> {
    let mut input = BitInputStream::new(Cursor::new(data));
    let mut out = BitOutputStream::new(Vec::new());
    let stats = decompress(&mut input, &mut out, config)?;
    Ok((out.close()?, stats))
}
