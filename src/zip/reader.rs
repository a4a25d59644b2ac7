use chrono::{Local, NaiveDateTime, TimeZone};
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::ARCHIVE_EXTENSION;
use super::parser::ZipParser;
use super::structures::CentralEntry;

/// A decoded file from an archive, nested archives already flattened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Name as decoded from the archive (CP437 or UTF-8).
    pub name: String,
    pub content: Vec<u8>,
    /// `None` when the archive stores an impossible DOS date.
    pub modified_at: Option<NaiveDateTime>,
}

impl ArchiveEntry {
    /// Modification time as POSIX seconds. DOS timestamps carry no zone,
    /// so they are read as local time; a local time skipped by a DST
    /// change falls back to UTC.
    pub fn timestamp(&self) -> Option<i64> {
        let naive = self.modified_at?;
        Some(
            Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|t| t.timestamp())
                .unwrap_or_else(|| naive.and_utc().timestamp()),
        )
    }
}

/// Opens an archive and iterates its entries depth-first, expanding any
/// entry whose name ends in `.zip` in place of the entry itself.
pub struct ArchiveReader;

impl ArchiveReader {
    /// Parse the central directory of `source`. `label` names the archive
    /// in log lines and errors.
    pub fn open(label: impl Into<String>, source: Arc<dyn ReadAt>) -> Result<Entries> {
        let frame = Frame::open(label.into(), source)?;
        Ok(Entries { stack: vec![frame] })
    }
}

struct Frame {
    label: String,
    parser: ZipParser<dyn ReadAt>,
    pending: std::vec::IntoIter<CentralEntry>,
}

impl Frame {
    fn open(label: String, source: Arc<dyn ReadAt>) -> Result<Self> {
        let parser = ZipParser::new(source);
        let entries = parser
            .list_entries()
            .map_err(|source| Error::MalformedArchive {
                archive: label.clone(),
                source,
            })?;
        tracing::info!(archive = %label, entries = entries.len(), "reading archive");
        Ok(Self {
            label,
            parser,
            pending: entries.into_iter(),
        })
    }
}

/// Lazy entry sequence produced by [`ArchiveReader::open`].
///
/// Errors are per item: an unreadable entry or a malformed nested archive
/// is yielded as `Err` and iteration resumes with the next sibling.
pub struct Entries {
    stack: Vec<Frame>,
}

impl Iterator for Entries {
    type Item = Result<ArchiveEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;
            let Some(entry) = frame.pending.next() else {
                self.stack.pop();
                continue;
            };
            if entry.is_directory() {
                continue;
            }

            let name = entry.name();
            tracing::info!(archive = %frame.label, entry = %name, "extracting");

            let content = match frame.parser.read_entry(&entry) {
                Ok(content) => content,
                Err(source) => {
                    return Some(Err(Error::Entry {
                        archive: frame.label.clone(),
                        entry: name,
                        source,
                    }));
                }
            };

            if name.ends_with(ARCHIVE_EXTENSION) {
                match Frame::open(name, Arc::new(content)) {
                    Ok(nested) => self.stack.push(nested),
                    Err(e) => return Some(Err(e)),
                }
                continue;
            }

            return Some(Ok(ArchiveEntry {
                name,
                content,
                modified_at: entry.modified(),
            }));
        }
    }
}
