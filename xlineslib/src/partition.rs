//! Work partitioning: balanced, order-preserving splits of the path list.

/// Hard ceiling on concurrent counting workers.
///
/// Bounds disk-I/O contention rather than CPU contention, so it applies
/// regardless of how many cores are available.
pub const MAX_WORKERS: usize = 4;

/// Split `items` into `n` balanced contiguous partitions.
///
/// The first `len % n` partitions receive one extra element. Concatenating
/// the partitions in order reproduces the input exactly: no element is
/// duplicated or dropped, and relative order is preserved within and across
/// partitions. When `n > items.len()`, trailing partitions are empty.
///
/// `n` must be positive; the engine validates the worker cap before calling.
pub fn split<T: Clone>(items: &[T], n: usize) -> Vec<Vec<T>> {
    assert!(n > 0, "partition count must be positive");

    let quotient = items.len() / n;
    let remainder = items.len() % n;

    let mut partitions = Vec::with_capacity(n);
    let mut start = 0;
    for i in 0..n {
        let size = quotient + usize::from(i < remainder);
        partitions.push(items[start..start + size].to_vec());
        start += size;
    }
    partitions
}

/// Parallelism available on this host.
///
/// Single seam for the platform query so the cap policy stays in one place.
pub fn available_parallelism() -> usize {
    num_cpus::get().max(1)
}

/// Number of workers to actually spawn for `path_count` paths under `cap`.
///
/// Clamped by the available parallelism, the hard [`MAX_WORKERS`] ceiling,
/// and the path count, so no worker starts with an empty partition when
/// avoidable. Always at least 1.
pub fn effective_workers(cap: usize, path_count: usize) -> usize {
    available_parallelism()
        .min(cap)
        .min(MAX_WORKERS)
        .min(path_count)
        .max(1)
}
