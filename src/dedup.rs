//! Duplicate resolution against the existing output tree.
//!
//! [`plan`] only probes the filesystem and returns a [`Decision`];
//! [`apply`] carries it out. Dry runs stop after `plan`.
//!
//! A path holds either a single file, or, once a second distinct content
//! with the same name shows up, a directory of variants named
//! `1-<name>`, `2-<name>`, ... in first-seen order with no gaps.

use std::ffi::OsString;
use std::fmt;
use std::fs::{self, File};
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use filetime::FileTime;
use uuid::Uuid;

use crate::error::{Error, Result};

/// Existing files are compared against incoming content in blocks of this size.
pub const COMPARE_BLOCK_SIZE: usize = 4096;

/// What to do with incoming content at a destination path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Nothing exists at `path` yet.
    WriteUnique { path: PathBuf },
    /// `path` is a file with identical content.
    SkipExact { path: PathBuf },
    /// `path` is a file with different content: it moves to `original`
    /// (variant 1) and the incoming content goes to `target` (variant 2).
    Promote {
        path: PathBuf,
        original: PathBuf,
        target: PathBuf,
    },
    /// `path` is a variant directory already holding this content.
    SkipVariant { index: u32, path: PathBuf },
    /// `path` is a variant directory without this content.
    WriteVariant { index: u32, path: PathBuf },
}

impl Decision {
    /// Whether carrying out the decision writes new content.
    pub fn writes(&self) -> bool {
        matches!(
            self,
            Decision::WriteUnique { .. } | Decision::Promote { .. } | Decision::WriteVariant { .. }
        )
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::WriteUnique { path } => write!(f, "write {}", path.display()),
            Decision::SkipExact { path } => write!(f, "duplicate of {}", path.display()),
            Decision::Promote {
                path,
                original,
                target,
            } => write!(
                f,
                "move {} -> {}, write {}",
                path.display(),
                original.display(),
                target.display()
            ),
            Decision::SkipVariant { index, path } => {
                write!(f, "duplicate of variant {index} at {}", path.display())
            }
            Decision::WriteVariant { index, path } => {
                write!(f, "write variant {index} at {}", path.display())
            }
        }
    }
}

/// Decide where `content` belongs given what already exists at `path`.
///
/// Read-only. Fails if an existing candidate cannot be inspected.
pub fn plan(path: &Path, content: &[u8]) -> Result<Decision> {
    let meta = match fs::metadata(path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Ok(Decision::WriteUnique {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if meta.is_file() {
        if same_content(path, content)? {
            return Ok(Decision::SkipExact {
                path: path.to_path_buf(),
            });
        }
        return Ok(Decision::Promote {
            path: path.to_path_buf(),
            original: variant_path(path, 1),
            target: variant_path(path, 2),
        });
    }

    if meta.is_dir() {
        return scan_variants(path, content);
    }

    Err(Error::io(
        path,
        io::Error::other("neither a regular file nor a directory"),
    ))
}

/// Walk `1-<name>`, `2-<name>`, ... until a match or the first free index.
fn scan_variants(dir: &Path, content: &[u8]) -> Result<Decision> {
    let mut index = 1;
    loop {
        let candidate = variant_path(dir, index);
        match fs::metadata(&candidate) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Ok(Decision::WriteVariant {
                    index,
                    path: candidate,
                });
            }
            Err(e) => return Err(Error::io(candidate, e)),
            Ok(_) => {
                if same_content(&candidate, content)? {
                    return Ok(Decision::SkipVariant {
                        index,
                        path: candidate,
                    });
                }
            }
        }
        index += 1;
    }
}

/// `<dir>/<index>-<file name of dir>`
pub fn variant_path(dir: &Path, index: u32) -> PathBuf {
    let mut name = OsString::from(format!("{index}-"));
    name.push(dir.file_name().unwrap_or_default());
    dir.join(name)
}

/// Size check, then block-wise comparison stopping at the first mismatch.
pub fn same_content(path: &Path, content: &[u8]) -> Result<bool> {
    let mut file = File::open(path).map_err(|e| Error::io(path, e))?;
    let meta = file.metadata().map_err(|e| Error::io(path, e))?;
    if !meta.is_file() || meta.len() != content.len() as u64 {
        return Ok(false);
    }

    let mut block = [0u8; COMPARE_BLOCK_SIZE];
    for (i, expected) in content.chunks(COMPARE_BLOCK_SIZE).enumerate() {
        let stored = &mut block[..expected.len()];
        file.read_exact(stored).map_err(|e| Error::io(path, e))?;
        if stored != expected {
            tracing::debug!(path = %path.display(), block = i, "content differs");
            return Ok(false);
        }
    }
    Ok(true)
}

/// Carry out a decision from [`plan`]. Written files get `timestamp`
/// (POSIX seconds) as both access and modification time.
pub fn apply(decision: &Decision, content: &[u8], timestamp: Option<i64>) -> Result<()> {
    match decision {
        Decision::SkipExact { .. } | Decision::SkipVariant { .. } => Ok(()),
        Decision::WriteUnique { path } => write_file(path, content, timestamp),
        Decision::Promote { path, target, .. } => {
            Promotion::new(path).run()?;
            write_file(target, content, timestamp)
        }
        Decision::WriteVariant { path, .. } => write_file(path, content, timestamp),
    }
}

/// Write through a temp sibling and rename, so `path` never holds a
/// partial file.
fn write_file(path: &Path, content: &[u8], timestamp: Option<i64>) -> Result<()> {
    let tmp = path.with_file_name(format!(".{}.zipfold-tmp", Uuid::new_v4()));

    let written = fs::write(&tmp, content).and_then(|()| match timestamp {
        Some(secs) => {
            let time = FileTime::from_unix_time(secs, 0);
            filetime::set_file_times(&tmp, time, time)
        }
        None => Ok(()),
    });
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(Error::io(tmp, e));
    }

    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        Error::io(path, e)
    })
}

/// Progress of turning a file into a variant directory containing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromotionStage {
    /// The original file is still at the destination path.
    FileExists,
    /// The original sits under a temp name in the bucket directory.
    TempMoved,
    /// The variant directory exists; the original is still under the temp name.
    DirCreated,
    /// The original is `1-<name>` inside the variant directory.
    VariantPlaced,
}

impl fmt::Display for PromotionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PromotionStage::FileExists => "file-exists",
            PromotionStage::TempMoved => "temp-moved",
            PromotionStage::DirCreated => "dir-created",
            PromotionStage::VariantPlaced => "variant-placed",
        })
    }
}

/// The temp name starts with a dot and carries a UUID, so it can never be
/// mistaken for an `<index>-<name>` variant or a real entry.
struct Promotion<'a> {
    path: &'a Path,
    temp: PathBuf,
    stage: PromotionStage,
}

impl<'a> Promotion<'a> {
    fn new(path: &'a Path) -> Self {
        let temp = path.with_file_name(format!(".{}.zipfold-promote", Uuid::new_v4()));
        Self {
            path,
            temp,
            stage: PromotionStage::FileExists,
        }
    }

    /// Where the original file currently lives.
    fn location(&self) -> PathBuf {
        match self.stage {
            PromotionStage::FileExists => self.path.to_path_buf(),
            PromotionStage::TempMoved | PromotionStage::DirCreated => self.temp.clone(),
            PromotionStage::VariantPlaced => variant_path(self.path, 1),
        }
    }

    fn step(&mut self) -> io::Result<()> {
        self.stage = match self.stage {
            PromotionStage::FileExists => {
                fs::rename(self.path, &self.temp)?;
                PromotionStage::TempMoved
            }
            PromotionStage::TempMoved => {
                fs::create_dir(self.path)?;
                PromotionStage::DirCreated
            }
            PromotionStage::DirCreated => {
                fs::rename(&self.temp, variant_path(self.path, 1))?;
                PromotionStage::VariantPlaced
            }
            PromotionStage::VariantPlaced => PromotionStage::VariantPlaced,
        };
        Ok(())
    }

    fn run(mut self) -> Result<()> {
        while self.stage != PromotionStage::VariantPlaced {
            if let Err(source) = self.step() {
                return Err(Error::Promotion {
                    path: self.path.to_path_buf(),
                    stage: self.stage,
                    location: self.location(),
                    source,
                });
            }
            tracing::debug!(
                path = %self.path.display(),
                stage = %self.stage,
                location = %self.location().display(),
                "promotion step"
            );
        }
        Ok(())
    }
}
