#![allow(dead_code)]

use byteorder::{LittleEndian, WriteBytesExt};
use flate2::Crc;
use flate2::Compression;
use flate2::write::DeflateEncoder;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const FLAG_UTF8: u16 = 1 << 11;

struct FixtureEntry {
    raw_name: Vec<u8>,
    flags: u16,
    data: Vec<u8>,
    deflate: bool,
    date: u16,
    time: u16,
    /// Sizes declared in the central directory through a ZIP64 extra field.
    zip64: Option<(Option<u64>, u64)>,
}

/// Minimal ZIP writer for test fixtures.
pub struct ZipBuilder {
    entries: Vec<FixtureEntry>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn stored(self, name: &str, data: &[u8]) -> Self {
        self.push(name.as_bytes(), utf8_flag(name), data, false)
    }

    pub fn deflated(self, name: &str, data: &[u8]) -> Self {
        self.push(name.as_bytes(), utf8_flag(name), data, true)
    }

    /// Entry with exact name bytes and flags.
    pub fn raw(self, raw_name: &[u8], flags: u16, data: &[u8]) -> Self {
        self.push(raw_name, flags, data, false)
    }

    /// Set the DOS timestamp of the last added entry.
    pub fn dated(mut self, date: (u16, u16, u16), time: (u16, u16, u16)) -> Self {
        let entry = self.entries.last_mut().expect("no entry to date");
        let (year, month, day) = date;
        let (hour, minute, second) = time;
        entry.date = ((year - 1980) << 9) | (month << 5) | day;
        entry.time = (hour << 11) | (minute << 5) | (second / 2);
        self
    }

    /// Overwrite the DOS date field of the last entry with raw bits.
    pub fn raw_date(mut self, date: u16) -> Self {
        self.entries.last_mut().expect("no entry to date").date = date;
        self
    }

    /// Declare ZIP64 sizes for the last entry in the central directory.
    /// `None` keeps the real compressed size.
    pub fn zip64_sizes(mut self, compressed: Option<u64>, uncompressed: u64) -> Self {
        self.entries.last_mut().expect("no entry to size").zip64 = Some((compressed, uncompressed));
        self
    }

    fn push(mut self, raw_name: &[u8], flags: u16, data: &[u8], deflate: bool) -> Self {
        self.entries.push(FixtureEntry {
            raw_name: raw_name.to_vec(),
            flags,
            data: data.to_vec(),
            deflate,
            // 2001-02-03 04:05:06
            date: (21 << 9) | (2 << 5) | 3,
            time: (4 << 11) | (5 << 5) | 3,
            zip64: None,
        });
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut out = Vec::new();
        let mut central = Vec::new();

        for entry in &self.entries {
            let mut crc = Crc::new();
            crc.update(&entry.data);
            let (method, payload) = if entry.deflate {
                let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
                encoder.write_all(&entry.data).unwrap();
                (8u16, encoder.finish().unwrap())
            } else {
                (0u16, entry.data.clone())
            };
            let lfh_offset = out.len() as u32;

            out.write_all(b"PK\x03\x04").unwrap();
            out.write_u16::<LittleEndian>(20).unwrap();
            out.write_u16::<LittleEndian>(entry.flags).unwrap();
            out.write_u16::<LittleEndian>(method).unwrap();
            out.write_u16::<LittleEndian>(entry.time).unwrap();
            out.write_u16::<LittleEndian>(entry.date).unwrap();
            out.write_u32::<LittleEndian>(crc.sum()).unwrap();
            out.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
            out.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            out.write_u16::<LittleEndian>(entry.raw_name.len() as u16).unwrap();
            out.write_u16::<LittleEndian>(0).unwrap();
            out.write_all(&entry.raw_name).unwrap();
            out.write_all(&payload).unwrap();

            central.write_all(b"PK\x01\x02").unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(20).unwrap();
            central.write_u16::<LittleEndian>(entry.flags).unwrap();
            central.write_u16::<LittleEndian>(method).unwrap();
            central.write_u16::<LittleEndian>(entry.time).unwrap();
            central.write_u16::<LittleEndian>(entry.date).unwrap();
            central.write_u32::<LittleEndian>(crc.sum()).unwrap();
            let mut extra = Vec::new();
            if let Some((compressed, uncompressed)) = entry.zip64 {
                central.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
                central.write_u32::<LittleEndian>(0xFFFFFFFF).unwrap();
                extra.write_u16::<LittleEndian>(0x0001).unwrap();
                extra.write_u16::<LittleEndian>(16).unwrap();
                extra.write_u64::<LittleEndian>(uncompressed).unwrap();
                extra
                    .write_u64::<LittleEndian>(compressed.unwrap_or(payload.len() as u64))
                    .unwrap();
            } else {
                central.write_u32::<LittleEndian>(payload.len() as u32).unwrap();
                central.write_u32::<LittleEndian>(entry.data.len() as u32).unwrap();
            }
            central.write_u16::<LittleEndian>(entry.raw_name.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(extra.len() as u16).unwrap();
            central.write_u16::<LittleEndian>(0).unwrap(); // comment
            central.write_u16::<LittleEndian>(0).unwrap(); // disk
            central.write_u16::<LittleEndian>(0).unwrap(); // internal attrs
            central.write_u32::<LittleEndian>(0).unwrap(); // external attrs
            central.write_u32::<LittleEndian>(lfh_offset).unwrap();
            central.write_all(&entry.raw_name).unwrap();
            central.write_all(&extra).unwrap();
        }

        let cd_offset = out.len() as u32;
        out.write_all(&central).unwrap();

        out.write_all(b"PK\x05\x06").unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u16::<LittleEndian>(self.entries.len() as u16).unwrap();
        out.write_u32::<LittleEndian>(central.len() as u32).unwrap();
        out.write_u32::<LittleEndian>(cd_offset).unwrap();
        out.write_u16::<LittleEndian>(0).unwrap();
        out
    }
}

fn utf8_flag(name: &str) -> u16 {
    if name.is_ascii() { 0 } else { FLAG_UTF8 }
}

/// Write `bytes` to `path`, creating parent directories.
pub fn write(path: impl AsRef<Path>, bytes: &[u8]) {
    let path = path.as_ref();
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, bytes).unwrap();
}

/// Every path under `root` (relative), with file contents; directories map to `None`.
pub fn snapshot(root: &Path) -> BTreeMap<PathBuf, Option<Vec<u8>>> {
    let mut map = BTreeMap::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries {
            let path = entry.unwrap().path();
            let rel = path.strip_prefix(root).unwrap().to_path_buf();
            if path.is_dir() {
                map.insert(rel, None);
                stack.push(path);
            } else {
                map.insert(rel, Some(fs::read(&path).unwrap()));
            }
        }
    }
    map
}

/// Relative paths of regular files under `root`.
pub fn files(root: &Path) -> Vec<PathBuf> {
    snapshot(root)
        .into_iter()
        .filter_map(|(path, content)| content.map(|_| path))
        .collect()
}
