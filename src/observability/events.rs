//! Observable events
//!
//! Events are explicit and typed. Each has a stable upper-snake name that
//! is emitted as the `event` field of the log record.

use std::fmt;

/// Observable events in query derivation and execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Query lifecycle
    /// Part tree compiled into a plan
    QueryPlanned,
    /// Query executed and results handed out
    QueryExecuted,
    /// Query rejected before touching the store
    QueryRejected,

    // Plan shape
    /// A secondary index drives the query
    IndexScanSelected,
    /// No eligible index, full set scan with residual filter
    FullScanFallback,

    // Index administration
    /// Index created
    IndexCreated,
    /// Index dropped
    IndexDropped,
    /// Duplicate create swallowed
    IndexCreateConflict,
    /// Drop of a missing index swallowed
    IndexDropMissing,
    /// Index catalog snapshot replaced
    IndexCatalogRefreshed,
    /// Index catalog refresh failed, previous snapshot kept
    IndexCatalogRefreshFailed,
    /// Periodic catalog refresh started
    IndexRefresherStarted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",

            Event::IndexScanSelected => "INDEX_SCAN_SELECTED",
            Event::FullScanFallback => "FULL_SCAN_FALLBACK",

            Event::IndexCreated => "INDEX_CREATED",
            Event::IndexDropped => "INDEX_DROPPED",
            Event::IndexCreateConflict => "INDEX_CREATE_CONFLICT",
            Event::IndexDropMissing => "INDEX_DROP_MISSING",
            Event::IndexCatalogRefreshed => "INDEX_CATALOG_REFRESHED",
            Event::IndexCatalogRefreshFailed => "INDEX_CATALOG_REFRESH_FAILED",
            Event::IndexRefresherStarted => "INDEX_REFRESHER_STARTED",
        }
    }

    /// Returns true for events that indicate a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Event::QueryRejected | Event::IndexCatalogRefreshFailed
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
