use std::io;

/// Format-level failure while reading a ZIP container or one of its entries.
#[derive(Debug, thiserror::Error)]
pub enum ZipError {
    #[error("not a valid ZIP file (no end of central directory record)")]
    NotAZip,

    #[error("invalid {0} signature")]
    BadSignature(&'static str),

    #[error("archive is truncated: {0}")]
    Truncated(#[from] io::Error),

    #[error("entry is larger than addressable memory ({0} bytes)")]
    TooLarge(u64),

    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    #[error("entry is encrypted")]
    Encrypted,

    #[error("CRC-32 mismatch (expected {expected:08x}, got {actual:08x})")]
    ChecksumMismatch { expected: u32, actual: u32 },

    #[error("inflated size {actual} does not match declared size {expected}")]
    SizeMismatch { expected: u64, actual: u64 },
}

pub type ZipResult<T> = std::result::Result<T, ZipError>;
