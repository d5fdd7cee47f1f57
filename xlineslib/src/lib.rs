//! # xlineslib
//!
//! A line-counting engine for filesystem trees. Given a set of origin paths,
//! it discovers files, drops excluded and binary objects, and counts lines
//! concurrently across a small capped pool of workers, streaming per-path
//! results back through a shared queue.
//!
//! ## Overview
//!
//! The pipeline has four stages, each usable on its own:
//!
//! - [`resolver`]: expand files/directories into a flat, deduplicated,
//!   sorted path list, with each object tagged once as file or directory.
//! - [`exclusions`]: remove paths by extension, by directory marker, or by a
//!   binary-content probe of the first kilobyte.
//! - [`partition`]: split the filtered list into balanced, order-preserving
//!   partitions, one per worker, with a hard concurrency ceiling that bounds
//!   disk-I/O contention.
//! - [`engine`]: run the workers, drain their results incrementally without
//!   waiting for full completion, join everything, and return a
//!   deterministic path-sorted result set.
//!
//! Counting failures stay local to their path: a file that is not text is
//! reported with an unknown count, any other unreadable file is omitted,
//! and the run always completes.
//!
//! ## Example
//!
//! ```rust
//! use std::fs;
//! use tempfile::tempdir;
//! use xlineslib::{count_origins, EngineOptions, ExclusionRules, PathStyle, Totals};
//!
//! let dir = tempdir().unwrap();
//! fs::write(dir.path().join("a.txt"), "one\ntwo\n").unwrap();
//! fs::write(dir.path().join("b.txt"), "three\n").unwrap();
//!
//! let records = count_origins(
//!     &[dir.path().to_path_buf()],
//!     &ExclusionRules::default(),
//!     PathStyle::Absolute,
//!     &EngineOptions::new(),
//! )
//! .unwrap();
//!
//! let totals = Totals::from_records(&records);
//! assert_eq!(totals.total_objects, 2);
//! assert_eq!(totals.total_lines, 3);
//! ```

pub mod counter;
pub mod engine;
pub mod error;
pub mod exclusions;
pub mod partition;
pub mod resolver;
pub mod stats;

pub use counter::{count_lines, CountError};
pub use engine::{count_origins, count_paths, EngineOptions};
pub use error::XlinesError;
pub use exclusions::{is_binary, ExclusionRules};
pub use partition::{available_parallelism, effective_workers, split, MAX_WORKERS};
pub use resolver::{locate_files, PathStyle, Target};
pub use stats::{failed_records, sort_by_path, PathRecord, Totals};

/// Result type for xlineslib operations
pub type Result<T> = std::result::Result<T, XlinesError>;
