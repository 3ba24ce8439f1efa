use std::io;

use tracing::error;

use crate::engine::huffman::HuffmanNode;
use crate::protocol::constants::{ALPH_SIZE, PSEUDO_EOF, SYMBOL_BITS};
use crate::protocol::error::{CodecError, Result};
use crate::utils::bitio::{BitRead, BitWrite};

/// A full tree over 257 leaves is never deeper than this
const MAX_DEPTH: usize = ALPH_SIZE;

/// Pre-order tree header: `0` then both subtrees for an internal node,
/// `1` then the 9-bit symbol for a leaf.
pub fn write_header<W: BitWrite>(node: &HuffmanNode, out: &mut W) -> io::Result<()> {
    match node {
        HuffmanNode::Internal { left, right, .. } => {
            out.write_bits(1, 0)?;
            write_header(left, out)?;
            write_header(right, out)
        }
        HuffmanNode::Leaf { symbol, .. } => {
            out.write_bits(1, 1)?;
            out.write_bits(SYMBOL_BITS, *symbol as u32)
        }
    }
}

/// Rebuild a tree from its pre-order header. Leaves carry zero weight.
pub fn read_header<R: BitRead>(input: &mut R) -> Result<HuffmanNode> {
    read_node(input, 0)
}

fn read_node<R: BitRead>(input: &mut R, depth: usize) -> Result<HuffmanNode> {
    if depth > MAX_DEPTH {
        error!("Tree header nests deeper than {}", MAX_DEPTH);
        return Err(CodecError::MalformedHeader);
    }

    let Some(bit) = input.read_bits(1)? else {
        error!("Input ended inside the tree header at bit {}", input.bits_read());
        return Err(CodecError::MalformedHeader);
    };

    if bit == 0 {
        let left = read_node(input, depth + 1)?;
        let right = read_node(input, depth + 1)?;
        return Ok(HuffmanNode::merge(left, right));
    }

    let Some(value) = input.read_bits(SYMBOL_BITS)? else {
        error!("Input ended inside a leaf symbol at bit {}", input.bits_read());
        return Err(CodecError::MalformedHeader);
    };
    let symbol = value as u16;
    if symbol > PSEUDO_EOF {
        error!("Leaf symbol {} out of range", symbol);
        return Err(CodecError::UnknownSymbol(symbol));
    }

    Ok(HuffmanNode::leaf(symbol, 0))
}
