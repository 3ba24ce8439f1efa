use std::io::Cursor;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{error, info};

use crate::config::ToolConfig;
use crate::engine::huffman::{code_string, symbol_name, HuffmanTree};
use crate::engine::{compress, compress_bytes, decompress, decompress_bytes, read_tree};
use crate::metrics::CodecStats;
use crate::protocol::CodecError;
use crate::utils::bitio::{BitInputStream, BitOutputStream};
use crate::utils::hash::sha256_hex;
use crate::utils::io::{open_input, ScopedOutput};

/// Result of compressing, decompressing and comparing a file in memory
#[derive(Debug, Clone, Serialize)]
pub struct Verification {
    pub original_hash: String,
    pub restored_hash: String,
    pub hash_match: bool,
    pub compressed: CodecStats,
}

/// Tree and code table read from a compressed file's header
#[derive(Debug, Clone, Serialize)]
pub struct Inspection {
    pub leaves: usize,
    pub depth: usize,
    pub codes: Vec<(String, String)>,
    #[serde(skip)]
    pub outline: String,
}

/// File operations driven by one loaded configuration
pub struct Session {
    config: ToolConfig,
}

impl Session {
    pub fn new(config: ToolConfig) -> Self {
        Self { config }
    }

    pub fn compress_file(&self, input: &Path, output: Option<&Path>) -> anyhow::Result<(PathBuf, CodecStats)> {
        let dest = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.compressed_path(input));
        info!("Compressing {:?} -> {:?}", input, dest);

        let mut reader = BitInputStream::new(open_input(input)?);
        let mut scoped = ScopedOutput::create(&dest, self.config.overwrite)?;
        let stats = {
            let mut writer = BitOutputStream::new(scoped.writer());
            let stats = compress(&mut reader, &mut writer, &self.config.engine())?;
            writer.close()?;
            stats
        };
        let dest = scoped.commit()?;

        info!("Compressed {} bytes to {} bytes", stats.input_bytes, stats.output_bytes);
        Ok((dest, stats))
    }

    pub fn decompress_file(&self, input: &Path, output: Option<&Path>) -> anyhow::Result<(PathBuf, CodecStats)> {
        let dest = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.config.restored_path(input));
        info!("Decompressing {:?} -> {:?}", input, dest);

        let mut reader = BitInputStream::new(open_input(input)?);
        let mut scoped = ScopedOutput::create(&dest, self.config.overwrite)?;
        let result = {
            let mut writer = BitOutputStream::new(scoped.writer());
            match decompress(&mut reader, &mut writer, &self.config.engine()) {
                Ok(stats) => writer.close().map(|_| stats).map_err(CodecError::from),
                Err(e) => Err(e),
            }
        };

        match result {
            Ok(stats) => {
                let dest = scoped.commit()?;
                info!("Restored {} bytes", stats.output_bytes);
                Ok((dest, stats))
            }
            Err(e) => {
                error!("Decompression of {:?} failed: {}", input, e);
                Err(e.into())
            }
        }
    }

    /// Compress and decompress `input` in memory and compare digests
    pub fn verify_file(&self, input: &Path) -> anyhow::Result<Verification> {
        let data = std::fs::read(input)?;
        let engine = self.config.engine();

        let (packed, compressed) = compress_bytes(&data, &engine)?;
        let (restored, _) = decompress_bytes(&packed, &engine)?;

        let original_hash = sha256_hex(&data);
        let restored_hash = sha256_hex(&restored);
        let hash_match = original_hash == restored_hash;

        if !hash_match {
            error!("Round trip of {:?} does not reproduce the input", input);
        }
        info!("Verification completed for {:?}: hash_match={}", input, hash_match);

        Ok(Verification {
            original_hash,
            restored_hash,
            hash_match,
            compressed,
        })
    }

    /// Read only the magic and tree header of a compressed file
    pub fn inspect_file(&self, input: &Path) -> anyhow::Result<Inspection> {
        let mut reader = BitInputStream::new(open_input(input)?);
        let tree = read_tree(&mut reader)?;
        Ok(inspect_tree(&tree))
    }
}

pub fn inspect_tree(tree: &HuffmanTree) -> Inspection {
    let codes = tree
        .code_table()
        .iter()
        .map(|(symbol, code)| (symbol_name(symbol), code_string(code)))
        .collect();

    Inspection {
        leaves: tree.leaf_count(),
        depth: tree.depth(),
        codes,
        outline: tree.render(),
    }
}

/// Inspect an in-memory compressed buffer
pub fn inspect_bytes(data: &[u8]) -> anyhow::Result<Inspection> {
    let tree = read_tree(&mut BitInputStream::new(Cursor::new(data)))?;
    Ok(inspect_tree(&tree))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::config::EngineConfig;

    #[test]
    fn inspects_literal_header() {
        let (packed, _) = compress_bytes(b"AAB", &EngineConfig::default()).unwrap();
        let report = inspect_bytes(&packed).unwrap();

        assert_eq!(report.leaves, 3);
        assert_eq!(report.depth, 2);
        assert_eq!(report.codes.len(), 3);
        assert!(report.codes.contains(&("EOF".to_string(), "11".to_string())));
    }

    #[test]
    fn inspect_rejects_plain_file() {
        assert!(inspect_bytes(b"plain text, no magic").is_err());
    }
}
