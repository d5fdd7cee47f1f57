//! Exclusion rules: which discovered paths are countable.
//!
//! A path is excluded when any directory marker is a substring of the full
//! path, when its file extension is in the excluded set, or when a probe of
//! its first kilobyte detects binary content. The probe fails safe: a file
//! the probe cannot read is treated as excluded rather than aborting the run.

use std::collections::BTreeSet;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Extensions excluded when no explicit configuration is supplied.
const DEFAULT_EXTENSIONS: &[&str] = &[
    ".png", ".jpg", ".jpeg", ".gif", ".zip", ".gz", ".tar", ".pyc", ".so", ".pdf", ".log",
    ".lock",
];

/// Directory markers excluded when no explicit configuration is supplied.
const DEFAULT_DIR_MARKERS: &[&str] = &["__pycache__", "venv"];

/// Bytes read by the binary-content probe.
const PROBE_LEN: usize = 1024;

/// Exclusion predicates applied to candidate paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    /// Excluded file extensions, each stored with its leading dot
    extensions: BTreeSet<String>,
    /// Strings that mark a path as excluded when they occur anywhere in it
    dir_markers: BTreeSet<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXTENSIONS.iter().copied(),
            DEFAULT_DIR_MARKERS.iter().copied(),
        )
    }
}

impl ExclusionRules {
    /// Build rules from extension and directory-marker iterators.
    ///
    /// Extensions are normalized to carry a leading dot.
    pub fn new<E, D, S, T>(extensions: E, dir_markers: D) -> Self
    where
        E: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| normalize_extension(e.as_ref()))
                .collect(),
            dir_markers: dir_markers
                .into_iter()
                .map(|m| m.as_ref().to_string())
                .collect(),
        }
    }

    /// Rules that exclude nothing (binary probing still applies).
    pub fn none() -> Self {
        Self {
            extensions: BTreeSet::new(),
            dir_markers: BTreeSet::new(),
        }
    }

    /// Load extension rules from a one-entry-per-line list file, falling back
    /// to the built-in defaults when the file is missing or unreadable.
    pub fn from_list_file(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let extensions: Vec<String> = contents
                    .lines()
                    .map(str::trim)
                    .filter(|l| !l.is_empty())
                    .map(normalize_extension)
                    .collect();
                Self::new(extensions, DEFAULT_DIR_MARKERS.iter().copied())
            }
            Err(e) => {
                debug!(path = %path.display(), error = %e, "exclusion list unreadable, using defaults");
                Self::default()
            }
        }
    }

    /// Add an excluded extension.
    pub fn add_extension(&mut self, ext: &str) {
        self.extensions.insert(normalize_extension(ext));
    }

    /// Add an excluded directory marker.
    pub fn add_dir_marker(&mut self, marker: &str) {
        self.dir_markers.insert(marker.to_string());
    }

    /// Excluded extensions, in sorted order.
    pub fn extensions(&self) -> impl Iterator<Item = &str> {
        self.extensions.iter().map(String::as_str)
    }

    /// Excluded directory markers, in sorted order.
    pub fn dir_markers(&self) -> impl Iterator<Item = &str> {
        self.dir_markers.iter().map(String::as_str)
    }

    /// Whether `path` is excluded from counting.
    ///
    /// Deterministic for a fixed rule set and filesystem state.
    pub fn excluded(&self, path: &Path) -> bool {
        let full = path.to_string_lossy();
        if self
            .dir_markers
            .iter()
            .any(|marker| full.contains(marker.as_str()))
        {
            return true;
        }

        if let Some(ext) = extension_of(path) {
            if self.extensions.contains(&ext) {
                return true;
            }
        }

        is_binary(path)
    }

    /// Keep only countable paths. Output order follows input order.
    pub fn filter(&self, paths: Vec<PathBuf>) -> Vec<PathBuf> {
        paths.into_iter().filter(|p| !self.excluded(p)).collect()
    }
}

/// Extension of `path`'s filename (text after the final dot), with the dot.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
}

fn normalize_extension(ext: &str) -> String {
    if ext.starts_with('.') {
        ext.to_string()
    } else {
        format!(".{ext}")
    }
}

/// Allow-listed text bytes: BEL, BS, TAB, LF, FF, CR, ESC, and all of
/// 0x20..=0xFF except DEL.
fn is_text_byte(byte: u8) -> bool {
    matches!(byte, 0x07 | 0x08 | 0x09 | 0x0A | 0x0C | 0x0D | 0x1B)
        || (byte >= 0x20 && byte != 0x7F)
}

/// Probe the first kilobyte of `path` for bytes outside the text allow-list.
///
/// I/O failure during the probe classifies the file as binary (fail-safe).
pub fn is_binary(path: &Path) -> bool {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "binary probe open failed, excluding");
            return true;
        }
    };

    let mut buf = [0u8; PROBE_LEN];
    let read = match file.read(&mut buf) {
        Ok(n) => n,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "binary probe read failed, excluding");
            return true;
        }
    };

    buf[..read].iter().any(|&b| !is_text_byte(b))
}
