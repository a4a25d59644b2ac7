//! ZIP archive parsing and entry reading.
//!
//! - [`structures`]: on-disk records (EOCD, ZIP64 records, central directory entries)
//! - [`parser`]: locating and decoding those records from a [`ReadAt`](crate::io::ReadAt) source
//! - [`reader`]: the entry stream handed to the extraction pipeline, with
//!   nested archives flattened
//! - [`cp437`]: the legacy code page of non-UTF-8 entry names
//!
//! ## Supported Features
//!
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE compression methods, CRC-32 verified
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

pub mod cp437;
mod error;
mod parser;
mod reader;
mod structures;

pub use error::{ZipError, ZipResult};
pub use parser::ZipParser;
pub use reader::{ArchiveEntry, ArchiveReader, Entries};
pub use structures::*;

/// Suffix identifying archives, both on disk and as nested entries.
pub const ARCHIVE_EXTENSION: &str = ".zip";
