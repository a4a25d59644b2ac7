//! Destination paths: `<root>/<FIRST>/<FIRST TWO>/<name>`, bucket segments
//! uppercased.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Where an entry lands before duplicate resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    /// `<root>/<A>/<AB>`
    pub bucket: PathBuf,
    /// `<bucket>/<file name>`
    pub path: PathBuf,
}

impl Placement {
    /// Create the bucket directories if they are missing.
    pub fn ensure_bucket(&self) -> Result<()> {
        fs::create_dir_all(&self.bucket).map_err(|e| Error::io(&self.bucket, e))
    }
}

/// Compute the placement of a (normalized) entry name under `root`.
///
/// Directory segments inside the name are dropped; names that are empty,
/// absolute or that climb with `..` are rejected.
pub fn resolve(root: &Path, name: &str) -> Result<Placement> {
    let file_name = sanitize(name)?;

    let first: String = file_name.chars().take(1).collect();
    let first_two: String = file_name.chars().take(2).collect();
    let bucket = root
        .join(bucket_segment(&first))
        .join(bucket_segment(&first_two));
    let path = bucket.join(file_name);

    Ok(Placement { bucket, path })
}

fn sanitize(name: &str) -> Result<&str> {
    let reject = |reason| {
        Err(Error::AnomalousEntryName {
            name: name.to_string(),
            reason,
        })
    };

    if name.is_empty() {
        return reject("empty name");
    }
    if name.contains('\0') {
        return reject("contains NUL");
    }
    if name.starts_with(['/', '\\']) || has_drive_prefix(name) {
        return reject("absolute path");
    }

    let mut file_name = None;
    for segment in name.split(['/', '\\']) {
        match segment {
            ".." => return reject("parent directory reference"),
            "" | "." => {}
            s => file_name = Some(s),
        }
    }
    match file_name {
        Some(file_name) => Ok(file_name),
        None => reject("no file name"),
    }
}

fn has_drive_prefix(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

fn bucket_segment(prefix: &str) -> String {
    let upper = prefix.to_uppercase();
    if upper.chars().all(|c| c == '.') {
        upper.replace('.', "_")
    } else {
        upper
    }
}
