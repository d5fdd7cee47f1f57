//! The concurrent counting engine.
//!
//! Paths are split into balanced partitions, one capped worker per
//! partition. Each worker counts its partition independently and streams
//! `PathRecord`s back over a shared channel; the aggregator drains the
//! channel incrementally while workers are still running, so the channel
//! never has to hold the full result set at once. All workers are joined
//! before the engine returns, and the final collection is sorted by path so
//! output is deterministic regardless of scheduling.
//!
//! The channel is unbounded; the eager drain loop keeps its residency low.
//! A pathological file count could still grow it if the consumer falls
//! behind, which is accepted: records are always eventually drained.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, RecvTimeoutError, Sender};
use tracing::{debug, info, trace, warn};

use crate::counter::{count_lines, CountError};
use crate::error::XlinesError;
use crate::exclusions::ExclusionRules;
use crate::partition::{effective_workers, split, MAX_WORKERS};
use crate::resolver::{locate_files, PathStyle, Target};
use crate::stats::{sort_by_path, PathRecord};
use crate::Result;

/// Bounded interval for each liveness wait in the drain loop.
const DRAIN_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for a counting run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Ceiling on concurrent workers; clamped to [`MAX_WORKERS`]
    pub worker_cap: usize,
    /// Count blank lines as lines
    pub include_whitespace: bool,
    /// When set, the sorted result set is also serialized to this path
    pub debug_artifact: Option<PathBuf>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            worker_cap: MAX_WORKERS,
            include_whitespace: true,
            debug_artifact: None,
        }
    }
}

impl EngineOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker cap.
    pub fn workers(mut self, cap: usize) -> Self {
        self.worker_cap = cap;
        self
    }

    /// Set whether blank lines count.
    pub fn whitespace(mut self, include: bool) -> Self {
        self.include_whitespace = include;
        self
    }

    /// Also write the raw result set to `path` as JSON.
    pub fn debug_artifact(mut self, path: impl Into<PathBuf>) -> Self {
        self.debug_artifact = Some(path.into());
        self
    }
}

/// Count every target concurrently and return the consolidated result set.
///
/// Targets should already be filtered; exclusion handling is the caller's
/// concern. Per-path failures never abort the run: a decode failure
/// yields a record with an unknown count, any other I/O failure drops the
/// path. Only a configuration fault (zero worker cap) fails before work
/// begins. The returned records are sorted by path.
pub fn count_paths(targets: Vec<Target>, options: &EngineOptions) -> Result<Vec<PathRecord>> {
    if options.worker_cap == 0 {
        return Err(XlinesError::InvalidWorkerCount(0));
    }
    if targets.is_empty() {
        return Ok(Vec::new());
    }

    let workers = effective_workers(options.worker_cap, targets.len());
    let partitions = split(&targets, workers);
    debug!(
        targets = targets.len(),
        workers,
        "starting counting workers"
    );

    // The queue handle is threaded through every spawn explicitly; workers
    // hold clones of the sender, the aggregator holds the sole receiver.
    let (sender, receiver) = unbounded();
    let mut handles: Vec<JoinHandle<()>> = Vec::with_capacity(workers);

    for (id, partition) in partitions.into_iter().enumerate() {
        if partition.is_empty() {
            continue;
        }
        let sender = sender.clone();
        let include_whitespace = options.include_whitespace;
        let handle = thread::Builder::new()
            .name(format!("counter-{id}"))
            .spawn(move || worker_loop(id, partition, include_whitespace, sender))?;
        handles.push(handle);
    }
    drop(sender);

    let mut records = Vec::new();

    // Per worker, in start order: wait with a short timeout, drain whatever
    // is available while it is still alive, then join and take one final
    // non-blocking pass for records emitted just before exit. Interleaving
    // drains with liveness checks keeps a slow first worker from backing up
    // the queue while later workers are producing.
    for handle in handles {
        drain_while_alive(&handle, &receiver, &mut records);
        if handle.join().is_err() {
            warn!("counting worker panicked; its unprocessed paths are omitted");
        }
        drain_available(&receiver, &mut records);
    }
    drain_available(&receiver, &mut records);
    trace!(records = records.len(), "queue fully drained");

    sort_by_path(&mut records);

    if let Some(path) = &options.debug_artifact {
        write_artifact(path, &records)?;
    }

    Ok(records)
}

/// Resolve, filter, and count a set of origin paths.
///
/// Convenience pipeline over [`locate_files`], [`ExclusionRules::filter`],
/// and [`count_paths`].
pub fn count_origins(
    origins: &[PathBuf],
    rules: &ExclusionRules,
    style: PathStyle,
    options: &EngineOptions,
) -> Result<Vec<PathRecord>> {
    let mut candidates = Vec::new();
    for origin in origins {
        candidates.extend(locate_files(origin, style)?);
    }
    candidates.sort();
    candidates.dedup();

    let targets = rules
        .filter(candidates)
        .into_iter()
        .map(Target::File)
        .collect();

    count_paths(targets, options)
}

/// Block on the queue in bounded intervals while `handle` is running,
/// opportunistically draining everything already available.
fn drain_while_alive(
    handle: &JoinHandle<()>,
    receiver: &Receiver<PathRecord>,
    records: &mut Vec<PathRecord>,
) {
    while !handle.is_finished() {
        match receiver.recv_timeout(DRAIN_POLL_INTERVAL) {
            Ok(record) => {
                records.push(record);
                drain_available(receiver, records);
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }
}

/// Take every record currently in the queue without blocking.
fn drain_available(receiver: &Receiver<PathRecord>, records: &mut Vec<PathRecord>) {
    while let Ok(record) = receiver.try_recv() {
        records.push(record);
    }
}

/// One worker: count every target in the partition, streaming records back.
fn worker_loop(
    id: usize,
    partition: Vec<Target>,
    include_whitespace: bool,
    sender: Sender<PathRecord>,
) {
    debug!(worker = id, targets = partition.len(), "worker starting");

    for target in partition {
        match target {
            Target::File(path) => emit_count(&path, include_whitespace, &sender),
            // A raw directory reference is flattened one level; recursion
            // is the resolver's job upstream.
            Target::Directory(path) => {
                let entries = match fs::read_dir(&path) {
                    Ok(entries) => entries,
                    Err(e) => {
                        debug!(worker = id, path = %path.display(), error = %e, "skipping unreadable directory");
                        continue;
                    }
                };
                for entry in entries.flatten() {
                    let child = entry.path();
                    if child.is_file() {
                        emit_count(&child, include_whitespace, &sender);
                    }
                }
            }
        }
    }

    debug!(worker = id, "worker finished");
}

/// Count one file and push the outcome.
///
/// Decode failures become records with an unknown count; any other I/O
/// failure drops the path silently and the partition continues.
fn emit_count(path: &Path, include_whitespace: bool, sender: &Sender<PathRecord>) {
    let record = match count_lines(path, include_whitespace) {
        Ok(lines) => PathRecord::counted(path.to_path_buf(), lines),
        Err(CountError::Decode(_)) => PathRecord::failed(path.to_path_buf()),
        Err(CountError::Io { source, .. }) => {
            debug!(path = %path.display(), error = %source, "skipping unreadable path");
            return;
        }
    };

    // A send can only fail if the aggregator abandoned the run; the record
    // is dropped with it.
    let _ = sender.send(record);
}

/// Serialize the sorted result set to `path` as the debug side artifact.
fn write_artifact(path: &Path, records: &[PathRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json).map_err(|source| XlinesError::Artifact {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), records = records.len(), "wrote result artifact");
    Ok(())
}
