//! Description file discovery and decoding
//!
//! Stat description files are dumped from the game's `metadata/statdescriptions`
//! directory. Files at the root are matched by extension; directories are
//! expanded one level, except those prefixed with `_` (such as
//! `_specific_skill_stat_descriptions`), which are left out.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

use crate::{Error, Result};

/// Default extension of stat description files
pub const DESCRIPTION_EXTENSION: &str = "csd";

/// A decoded description file
#[derive(Debug, Clone)]
pub struct DescriptionFile {
    pub path: PathBuf,
    pub content: String,
}

/// Listing of description files below a root directory
#[derive(Debug, Clone)]
pub struct DescriptionSource {
    root: PathBuf,
    files: Vec<PathBuf>,
}

impl DescriptionSource {
    /// List description files below `root`
    ///
    /// Underscore-prefixed directories are excluded here, so everything
    /// listed is parsed.
    pub fn open<P: AsRef<Path>>(root: P, extension: &str) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(Error::MissingFile(root));
        }

        let mut files = Vec::new();

        for entry in sorted_children(&root)? {
            let name = entry.file_name().to_string_lossy();

            if entry.file_type().is_dir() {
                if name.starts_with('_') {
                    debug!("Skipping excluded directory {}", entry.path().display());
                    continue;
                }

                for child in sorted_children(entry.path())? {
                    if child.file_type().is_file() {
                        files.push(child.into_path());
                    } else {
                        debug!("Skipping nested directory {}", child.path().display());
                    }
                }
            } else if has_extension(entry.path(), extension) {
                files.push(entry.into_path());
            }
        }

        Ok(Self { root, files })
    }

    /// Root directory this source was listed from
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// All listed files, in parse order
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Read and decode each listed file in order
    pub fn read_all(&self) -> impl Iterator<Item = Result<DescriptionFile>> + '_ {
        self.files.iter().map(|path| read_description(path))
    }
}

fn sorted_children(dir: &Path) -> Result<Vec<walkdir::DirEntry>> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .map(|entry| entry.map_err(|e| Error::Io(e.into())))
        .collect()
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

/// Read a single UTF-16 description file
pub fn read_description(path: &Path) -> Result<DescriptionFile> {
    if !path.exists() {
        return Err(Error::MissingFile(path.to_path_buf()));
    }

    let bytes = fs::read(path)?;
    let content = decode_utf16(&bytes).ok_or_else(|| Error::Utf16(path.to_path_buf()))?;

    Ok(DescriptionFile {
        path: path.to_path_buf(),
        content,
    })
}

/// Decode UTF-16 bytes, honouring a byte order mark (little-endian without one)
pub fn decode_utf16(bytes: &[u8]) -> Option<String> {
    let (big_endian, body) = match bytes {
        [0xFE, 0xFF, rest @ ..] => (true, rest),
        [0xFF, 0xFE, rest @ ..] => (false, rest),
        _ => (false, bytes),
    };

    if body.len() % 2 != 0 {
        return None;
    }

    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| {
            if big_endian {
                u16::from_be_bytes([pair[0], pair[1]])
            } else {
                u16::from_le_bytes([pair[0], pair[1]])
            }
        })
        .collect();

    String::from_utf16(&units).ok()
}

#[cfg(test)]
pub(crate) fn encode_utf16le(text: &str) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xFE];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    bytes
}
