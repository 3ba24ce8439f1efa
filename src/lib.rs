//! # huffpack
//!
//! Lossless byte-stream compression with a static Huffman code. A
//! compressed stream is a 32-bit magic, the code tree in pre-order, and the
//! payload terminated by the code of a pseudo-EOF symbol.
//!
//! ```rust
//! use huffpack::engine::{compress_bytes, decompress_bytes, config::EngineConfig};
//!
//! let config = EngineConfig::default();
//! let (packed, _) = compress_bytes(b"abracadabra", &config)?;
//! let (restored, _) = decompress_bytes(&packed, &config)?;
//! assert_eq!(restored, b"abracadabra");
//! # Ok::<(), huffpack::protocol::CodecError>(())
//! ```

pub mod config;
pub mod engine;
pub mod metrics;
pub mod protocol;
pub mod session;
pub mod utils;

pub use engine::{compress, compress_bytes, decompress, decompress_bytes};
pub use protocol::{CodecError, Result};
