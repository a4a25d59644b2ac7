//! Depth-first traversal of the input tree, feeding every archive entry
//! through name normalization, placement and duplicate resolution.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::Config;
use crate::dedup::{self, Decision};
use crate::error::{Error, Result};
use crate::io::LocalFileReader;
use crate::normalize::normalize;
use crate::placement;
use crate::zip::{ARCHIVE_EXTENSION, ArchiveEntry, ArchiveReader};

/// Counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub directories: usize,
    pub archives: usize,
    pub entries: usize,
    pub written: usize,
    pub variants: usize,
    pub duplicates: usize,
    pub ignored: usize,
    pub errors: usize,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} directories, {} archives, {} entries: {} written, {} new variants, {} duplicates, {} ignored files, {} errors",
            self.directories,
            self.archives,
            self.entries,
            self.written,
            self.variants,
            self.duplicates,
            self.ignored,
            self.errors
        )
    }
}

pub struct Walker<'a> {
    config: &'a Config,
    summary: Summary,
}

impl<'a> Walker<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            summary: Summary::default(),
        }
    }

    /// Process the whole input tree.
    ///
    /// Only an unreadable input root or an output root that cannot be
    /// created fail the run; everything else is logged and counted.
    pub fn run(mut self) -> Result<Summary> {
        let config = self.config;
        let input = &config.input_dir;
        let meta = fs::metadata(input).map_err(|source| Error::InputDirectory {
            path: input.clone(),
            source,
        })?;
        if !meta.is_dir() {
            return Err(Error::InputDirectory {
                path: input.clone(),
                source: std::io::Error::other("not a directory"),
            });
        }

        if !config.dry_run {
            let output = &config.output_dir;
            fs::create_dir_all(output).map_err(|source| Error::OutputDirectory {
                path: output.clone(),
                source,
            })?;
        }

        let mut stack = vec![input.clone()];
        while let Some(path) = stack.pop() {
            match fs::metadata(&path) {
                Ok(meta) if meta.is_dir() => {
                    if path == *input {
                        // The root must be listable.
                        let children = list_sorted(&path).map_err(|source| {
                            Error::InputDirectory {
                                path: path.clone(),
                                source,
                            }
                        })?;
                        self.enter_directory(&path, children, &mut stack);
                    } else {
                        match list_sorted(&path) {
                            Ok(children) => self.enter_directory(&path, children, &mut stack),
                            Err(e) => self.report(&Error::io(&path, e)),
                        }
                    }
                }
                Ok(meta) if meta.is_file() && is_archive(&path) => self.process_archive(&path),
                Ok(_) => {
                    tracing::info!(path = %path.display(), "ignoring file");
                    self.summary.ignored += 1;
                }
                Err(e) => self.report(&Error::io(&path, e)),
            }
        }

        tracing::info!(summary = %self.summary, "done");
        Ok(self.summary)
    }

    fn enter_directory(&mut self, dir: &Path, children: Vec<PathBuf>, stack: &mut Vec<PathBuf>) {
        tracing::info!(path = %dir.display(), "reading directory");
        self.summary.directories += 1;
        // Reversed so the smallest name is popped first.
        stack.extend(children.into_iter().rev());
    }

    fn process_archive(&mut self, path: &Path) {
        self.summary.archives += 1;

        let reader = match LocalFileReader::open(path) {
            Ok(reader) => reader,
            Err(e) => return self.report(&Error::io(path, e)),
        };
        let entries = match ArchiveReader::open(path.display().to_string(), Arc::new(reader)) {
            Ok(entries) => entries,
            Err(e) => return self.report(&e),
        };

        for entry in entries {
            match entry {
                Ok(entry) => {
                    self.summary.entries += 1;
                    if let Err(e) = self.process_entry(&entry) {
                        self.report(&e);
                    }
                }
                Err(e) => self.report(&e),
            }
        }
    }

    fn process_entry(&mut self, entry: &ArchiveEntry) -> Result<()> {
        let name = normalize(&entry.name);
        if name != entry.name.as_str() {
            tracing::info!(from = %entry.name, to = %name, "encoding fix");
        }

        let placement = placement::resolve(&self.config.output_dir, &name)?;
        let decision = dedup::plan(&placement.path, &entry.content)?;

        if !decision.writes() {
            tracing::info!(entry = %name, "skipping: {decision}");
            self.summary.duplicates += 1;
            return Ok(());
        }
        tracing::info!(entry = %name, bytes = entry.content.len(), "{decision}");

        let timestamp = entry.timestamp();
        if timestamp.is_none() {
            tracing::warn!(entry = %name, "invalid timestamp in archive; keeping write time");
        }

        if !self.config.dry_run {
            placement.ensure_bucket()?;
            dedup::apply(&decision, &entry.content, timestamp)?;
        }

        self.summary.written += 1;
        if !matches!(decision, Decision::WriteUnique { .. }) {
            self.summary.variants += 1;
        }
        Ok(())
    }

    fn report(&mut self, error: &Error) {
        tracing::error!("{error}");
        self.summary.errors += 1;
    }
}

fn is_archive(path: &Path) -> bool {
    path.file_name().is_some_and(|name| {
        name.as_encoded_bytes()
            .ends_with(ARCHIVE_EXTENSION.as_bytes())
    })
}

/// Directory children ordered by file name bytes.
fn list_sorted(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut children = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    children.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(children)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn archive_extension_is_case_sensitive() {
        assert!(is_archive(Path::new("/in/pack.zip")));
        assert!(!is_archive(Path::new("/in/PACK.ZIP")));
        assert!(!is_archive(Path::new("/in/zip")));
        assert!(!is_archive(Path::new("/in/notes.txt")));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_archive_names_are_recognized() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = Path::new("/in");
        assert!(is_archive(&dir.join(OsStr::from_bytes(b"pack\xe9.zip"))));
        assert!(!is_archive(&dir.join(OsStr::from_bytes(b"pack\xe9.ZIP"))));
    }

    #[test]
    fn listing_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.zip", "a", "C.zip", "a.zip"] {
            fs::write(dir.path().join(name), b"").unwrap();
        }
        let names: Vec<_> = list_sorted(dir.path())
            .unwrap()
            .into_iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, ["C.zip", "a", "a.zip", "b.zip"]);
    }

    #[test]
    fn missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::new(dir.path().join("missing"), dir.path().join("out"));
        assert!(matches!(
            Walker::new(&config).run(),
            Err(Error::InputDirectory { .. })
        ));
    }
}
