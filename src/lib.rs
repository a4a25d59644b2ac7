//! # zipfold
//!
//! Recursively unpacks ZIP archives found under a directory tree into a
//! single deduplicated output tree.
//!
//! Every extracted file lands at `<output>/<A>/<AB>/<name>`, where `A` and
//! `AB` are the uppercased first one and two characters of its name.
//! Identical content is written once. When the same name arrives with
//! different content, the path becomes a directory of numbered variants
//! (`1-<name>`, `2-<name>`, ...). The output tree is the only state: a
//! second run over the same input finds everything already in place.
//!
//! ## Pipeline
//!
//! - [`walker`]: sorted depth-first walk of the input directory
//! - [`zip`]: central directory parsing and the entry stream, nested
//!   `.zip` entries flattened
//! - [`normalize`]: CP437 to ISO-8859-1 filename repair
//! - [`placement`]: bucket path computation and name sanitizing
//! - [`dedup`]: duplicate and variant resolution, split into a read-only
//!   plan and its application
//!
//! ## Example
//!
//! ```no_run
//! use zipfold::{Config, Walker};
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::new("downloads", "modules").dry_run(true);
//!     let summary = Walker::new(&config).run()?;
//!     println!("{summary}");
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod error;
pub mod io;
pub mod normalize;
pub mod placement;
pub mod walker;
pub mod zip;

pub use cli::Cli;
pub use config::Config;
pub use dedup::Decision;
pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt};
pub use walker::{Summary, Walker};
pub use zip::{ArchiveEntry, ArchiveReader};
