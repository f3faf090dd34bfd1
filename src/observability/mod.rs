//! Observability
//!
//! - Structured events, emitted through `tracing`
//! - Monotonic counters
//!
//! Observability is read-only: logging never alters execution and never
//! fails a query.
//!
//! # Usage
//!
//! ```ignore
//! use partquery::observability::{log_event_with_fields, metrics, Event};
//!
//! log_event_with_fields(Event::FullScanFallback, &[("set", "person")]);
//! metrics().increment_full_scans();
//! ```

mod events;
mod logger;
mod metrics;

use std::sync::OnceLock;

pub use events::Event;
pub use logger::{log, log_event, log_event_with_fields, render_fields, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Process-wide metrics registry
pub fn metrics() -> &'static MetricsRegistry {
    static REGISTRY: OnceLock<MetricsRegistry> = OnceLock::new();
    REGISTRY.get_or_init(MetricsRegistry::new)
}
