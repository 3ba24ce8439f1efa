use serde::Serialize;

/// Sizes and tree shape observed during one compress or decompress call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CodecStats {
    pub input_bytes: u64,
    pub output_bytes: u64,
    pub header_bits: u64,
    pub payload_bits: u64,
    pub leaves: usize,
    pub max_code_len: usize,
}

fn ratio(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

impl CodecStats {
    /// Output size over input size
    pub fn compression_ratio(&self) -> f64 {
        ratio(self.output_bytes, self.input_bytes)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Report<'a> {
    pub operation: &'a str,
    pub input: String,
    pub output: String,
    pub ratio: f64,
    #[serde(flatten)]
    pub stats: CodecStats,
}

impl<'a> Report<'a> {
    pub fn new(operation: &'a str, input: impl Into<String>, output: impl Into<String>, stats: CodecStats) -> Self {
        Self {
            operation,
            input: input.into(),
            output: output.into(),
            ratio: stats.compression_ratio(),
            stats,
        }
    }
}
