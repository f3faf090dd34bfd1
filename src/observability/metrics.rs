//! Metrics registry
//!
//! Counters only, monotonic, reset only on process start. Relaxed atomics:
//! counters are read for reporting, never for control flow.

use std::sync::atomic::{AtomicU64, Ordering};

/// Operational counters
#[derive(Debug, Default)]
pub struct MetricsRegistry {
    /// Queries that produced a result
    queries_executed: AtomicU64,
    /// Queries rejected before touching the store
    queries_rejected: AtomicU64,
    /// Plans driven by a secondary index
    index_scans: AtomicU64,
    /// Plans falling back to a full set scan
    full_scans: AtomicU64,
    /// Records read from the store
    records_scanned: AtomicU64,
    /// Records handed to callers
    records_returned: AtomicU64,
    /// Swallowed duplicate-create / drop-missing conditions
    index_conflicts: AtomicU64,
    /// Catalog snapshots installed
    catalog_refreshes: AtomicU64,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_queries_executed(&self) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_queries_rejected(&self) {
        self.queries_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_index_scans(&self) {
        self.index_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_full_scans(&self) {
        self.full_scans.fetch_add(1, Ordering::Relaxed);
    }

    pub fn add_records_scanned(&self, n: u64) {
        self.records_scanned.fetch_add(n, Ordering::Relaxed);
    }

    pub fn add_records_returned(&self, n: u64) {
        self.records_returned.fetch_add(n, Ordering::Relaxed);
    }

    pub fn increment_index_conflicts(&self) {
        self.index_conflicts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_catalog_refreshes(&self) {
        self.catalog_refreshes.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed.load(Ordering::Relaxed),
            queries_rejected: self.queries_rejected.load(Ordering::Relaxed),
            index_scans: self.index_scans.load(Ordering::Relaxed),
            full_scans: self.full_scans.load(Ordering::Relaxed),
            records_scanned: self.records_scanned.load(Ordering::Relaxed),
            records_returned: self.records_returned.load(Ordering::Relaxed),
            index_conflicts: self.index_conflicts.load(Ordering::Relaxed),
            catalog_refreshes: self.catalog_refreshes.load(Ordering::Relaxed),
        }
    }
}

/// Plain copy of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_rejected: u64,
    pub index_scans: u64,
    pub full_scans: u64,
    pub records_scanned: u64,
    pub records_returned: u64,
    pub index_conflicts: u64,
    pub catalog_refreshes: u64,
}
