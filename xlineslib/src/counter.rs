//! Per-file line counting.
//!
//! Counts line-delimited records in a single text file. Decode failures
//! (non-text content) are distinguished from other I/O failures because the
//! engine treats them differently: a decode failure becomes a record with an
//! unknown count, while any other I/O failure drops the path from the run.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure modes for counting a single file.
#[derive(Error, Debug)]
pub enum CountError {
    /// File exists but is not decodable as text
    #[error("not a text file: {0}")]
    Decode(PathBuf),

    /// File could not be opened or read
    #[error("failed to read file '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// Count the lines in `path`.
///
/// With `include_whitespace` set, every line-delimited record counts. With it
/// unset, records that are exactly empty are skipped; a line containing only
/// spaces still counts.
pub fn count_lines(path: &Path, include_whitespace: bool) -> Result<u64, CountError> {
    let contents = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::InvalidData {
            CountError::Decode(path.to_path_buf())
        } else {
            CountError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let count = if include_whitespace {
        contents.lines().count()
    } else {
        contents.lines().filter(|line| !line.is_empty()).count()
    };

    Ok(count as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_count_lines_with_whitespace() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("five.txt");
        fs::write(&file, "one\ntwo\n\nfour\nfive\n").unwrap();

        assert_eq!(count_lines(&file, true).unwrap(), 5);
    }

    #[test]
    fn test_count_lines_without_whitespace() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("five.txt");
        fs::write(&file, "one\ntwo\n\nfour\nfive\n").unwrap();

        // only the exactly-empty line is excluded
        assert_eq!(count_lines(&file, false).unwrap(), 4);
    }

    #[test]
    fn test_spaces_only_line_still_counts() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("spaces.txt");
        fs::write(&file, "a\n   \nb\n").unwrap();

        assert_eq!(count_lines(&file, false).unwrap(), 3);
    }

    #[test]
    fn test_empty_file_counts_zero() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("empty.txt");
        fs::write(&file, "").unwrap();

        assert_eq!(count_lines(&file, true).unwrap(), 0);
        assert_eq!(count_lines(&file, false).unwrap(), 0);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("partial.txt");
        fs::write(&file, "one\ntwo").unwrap();

        assert_eq!(count_lines(&file, true).unwrap(), 2);
    }

    #[test]
    fn test_binary_content_is_decode_error() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("blob.bin");
        fs::write(&file, [0x00u8, 0xFF, 0xFE, 0x01]).unwrap();

        match count_lines(&file, true) {
            Err(CountError::Decode(p)) => assert_eq!(p, file),
            other => panic!("expected decode error, got {:?}", other.map_err(|e| e.to_string())),
        }
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("gone.txt");

        assert!(matches!(
            count_lines(&file, true),
            Err(CountError::Io { .. })
        ));
    }
}
