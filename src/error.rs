use std::io;
use std::path::PathBuf;

use crate::dedup::PromotionStage;
use crate::zip::ZipError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("malformed archive '{archive}': {source}")]
    MalformedArchive {
        archive: String,
        #[source]
        source: ZipError,
    },

    #[error("cannot read entry '{entry}' of '{archive}': {source}")]
    Entry {
        archive: String,
        entry: String,
        #[source]
        source: ZipError,
    },

    #[error("rejected entry name '{name}': {reason}")]
    AnomalousEntryName { name: String, reason: &'static str },

    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("promoting '{path}' to a variant directory failed at {stage}; original is at '{location}': {source}")]
    Promotion {
        path: PathBuf,
        stage: PromotionStage,
        location: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot read input directory '{path}': {source}")]
    InputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output directory '{path}': {source}")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
