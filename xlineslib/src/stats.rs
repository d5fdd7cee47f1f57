//! Result data structures: per-path records and aggregate totals.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One counting result produced by a worker.
///
/// `line_count` is `None` when the file was found but could not be decoded
/// as text. Such records are reported as failures, never as zero counts.
/// A record is immutable once created; it travels through the result queue
/// exactly once and is owned by the aggregator after being dequeued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathRecord {
    /// Filesystem path the count applies to
    pub path: PathBuf,
    /// Number of lines, or `None` for a decode failure
    pub line_count: Option<u64>,
}

impl PathRecord {
    /// Create a record for a successfully counted file.
    pub fn counted(path: impl Into<PathBuf>, lines: u64) -> Self {
        Self {
            path: path.into(),
            line_count: Some(lines),
        }
    }

    /// Create a record for a file that could not be decoded as text.
    pub fn failed(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            line_count: None,
        }
    }

    /// Whether this record carries a usable count.
    pub fn is_counted(&self) -> bool {
        self.line_count.is_some()
    }
}

/// Aggregate totals derived from a result collection.
///
/// Always recomputed from the records, never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    /// Sum of all present line counts
    pub total_lines: u64,
    /// Number of records with a present count
    pub total_objects: u64,
}

impl Totals {
    /// Derive totals by summing valid counts and counting countable records.
    pub fn from_records(records: &[PathRecord]) -> Self {
        let mut totals = Totals::default();
        for record in records {
            if let Some(lines) = record.line_count {
                totals.total_lines += lines;
                totals.total_objects += 1;
            }
        }
        totals
    }
}

/// Sort records by path, byte-wise, for deterministic presentation.
pub fn sort_by_path(records: &mut [PathRecord]) {
    records.sort_by(|a, b| a.path.as_os_str().cmp(b.path.as_os_str()));
}

/// Records whose file could not be decoded ("counted but unknown").
pub fn failed_records(records: &[PathRecord]) -> Vec<&PathRecord> {
    records.iter().filter(|r| !r.is_counted()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_skip_failed_records() {
        let records = vec![
            PathRecord::counted("a.txt", 10),
            PathRecord::failed("b.bin"),
            PathRecord::counted("c.txt", 5),
        ];

        let totals = Totals::from_records(&records);
        assert_eq!(totals.total_lines, 15);
        assert_eq!(totals.total_objects, 2);
    }

    #[test]
    fn test_totals_empty() {
        let totals = Totals::from_records(&[]);
        assert_eq!(totals.total_lines, 0);
        assert_eq!(totals.total_objects, 0);
    }

    #[test]
    fn test_sort_by_path_is_bytewise() {
        let mut records = vec![
            PathRecord::counted("b/a.txt", 1),
            PathRecord::counted("a/z.txt", 2),
            PathRecord::counted("a/b.txt", 3),
        ];
        sort_by_path(&mut records);

        let order: Vec<_> = records.iter().map(|r| r.path.clone()).collect();
        assert_eq!(
            order,
            vec![
                PathBuf::from("a/b.txt"),
                PathBuf::from("a/z.txt"),
                PathBuf::from("b/a.txt"),
            ]
        );
    }

    #[test]
    fn test_failed_records() {
        let records = vec![
            PathRecord::counted("a.txt", 10),
            PathRecord::failed("b.bin"),
        ];

        let failed = failed_records(&records);
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].path, PathBuf::from("b.bin"));
    }
}
