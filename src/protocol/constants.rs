//! Format constants for the tree-header Huffman stream

/// Bits in one input word (one byte)
pub const BITS_PER_WORD: u32 = 8;

/// Width of the leading magic number
pub const BITS_PER_INT: u32 = 32;

/// Number of literal byte values
pub const ALPH_SIZE: usize = 1 << BITS_PER_WORD;

/// Sentinel symbol terminating the payload
pub const PSEUDO_EOF: u16 = ALPH_SIZE as u16;

/// Literal bytes plus the pseudo-EOF
pub const SYMBOL_COUNT: usize = ALPH_SIZE + 1;

/// Width of a leaf symbol field in the tree header
pub const SYMBOL_BITS: u32 = BITS_PER_WORD + 1;

/// Base magic shared by the header family
pub const HUFF_NUMBER: u32 = 0xface_8200;

/// Magic for a stream carrying a pre-order tree header
pub const HUFF_TREE: u32 = HUFF_NUMBER | 1;

/// Debug levels
pub const DEBUG_LOW: u8 = 1;
pub const DEBUG_HIGH: u8 = 4;
