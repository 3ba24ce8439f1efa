pub mod config;
pub mod frequency;
pub mod huffman;
pub mod header;
pub mod compressor;
pub mod decompressor;

pub use compressor::*;
pub use decompressor::*;
