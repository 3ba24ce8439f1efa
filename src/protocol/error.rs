use std::fmt;
use std::io;

#[derive(Debug)]
pub enum CodecError {
    MissingMagic,
    InvalidMagic(u32),
    MalformedHeader,
    UnknownSymbol(u16),
    TruncatedPayload { decoded: u64 },
    Io(io::Error),
}

impl CodecError {
    /// Magic or tree header could not be parsed
    pub fn is_malformed_header(&self) -> bool {
        matches!(
            self,
            CodecError::MissingMagic
                | CodecError::InvalidMagic(_)
                | CodecError::MalformedHeader
                | CodecError::UnknownSymbol(_)
        )
    }

    pub fn is_truncated(&self) -> bool {
        matches!(self, CodecError::TruncatedPayload { .. })
    }
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodecError::MissingMagic =>
                write!(f, "input too short to hold a format magic"),
            CodecError::InvalidMagic(m) =>
                write!(f, "illegal header starts with {:#010x}", m),
            CodecError::MalformedHeader =>
                write!(f, "tree header ended prematurely"),
            CodecError::UnknownSymbol(s) =>
                write!(f, "tree header leaf carries invalid symbol {}", s),
            CodecError::TruncatedPayload { decoded } =>
                write!(f, "payload ended before PSEUDO_EOF after {} bytes", decoded),
            CodecError::Io(e) =>
                write!(f, "i/o error: {}", e),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CodecError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for CodecError {
    fn from(e: io::Error) -> Self {
        CodecError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, CodecError>;
