//! Query executor
//!
//! Executes query plans against a store client.
//!
//! Execution flow:
//! 1. Open a cursor: the driving index range, or a scan of the whole set
//! 2. Push the filter tree down as the store-side record filter
//! 3. Sort (materializing the matching set) when a sort is given
//! 4. Cut the requested window
//!
//! No caching between invocations and no locks held across store calls.

use std::sync::Arc;

use crate::error::{QueryError, QueryResult};
use crate::observability::{log_event_with_fields, metrics, Event, MetricsRegistry};
use crate::planner::QueryPlan;
use crate::store::{Record, RecordCursor, RecordFilter, StoreClient};

use super::result::{Page, PageRequest, Slice};
use super::sorter::ResultSorter;

/// Lazy, single-pass sequence of matching records.
///
/// Ends when the store cursor is exhausted, the limit is reached, or after
/// yielding the first error.
pub struct Results {
    cursor: RecordCursor,
    remaining: Option<usize>,
    failed: bool,
    metrics: &'static MetricsRegistry,
}

impl Results {
    fn new(cursor: RecordCursor, limit: Option<usize>, metrics: &'static MetricsRegistry) -> Self {
        Self {
            cursor,
            remaining: limit,
            failed: false,
            metrics,
        }
    }
}

impl Iterator for Results {
    type Item = QueryResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.remaining == Some(0) {
            return None;
        }
        match self.cursor.next()? {
            Ok(record) => {
                if let Some(remaining) = self.remaining.as_mut() {
                    *remaining -= 1;
                }
                self.metrics.add_records_returned(1);
                Some(Ok(record))
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
        }
    }
}

/// Query executor over a store client
#[derive(Clone)]
pub struct QueryExecutor {
    client: Arc<dyn StoreClient>,
    metrics: &'static MetricsRegistry,
}

impl QueryExecutor {
    /// Executor reporting to the process-wide registry
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            metrics: metrics(),
        }
    }

    pub fn with_metrics(mut self, metrics: &'static MetricsRegistry) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn client(&self) -> &Arc<dyn StoreClient> {
        &self.client
    }

    /// Opens the store cursor of a plan with the filter tree pushed down
    pub fn cursor(&self, plan: &QueryPlan) -> QueryResult<RecordCursor> {
        let filter = counting_filter(plan.residual_filter(), self.metrics);
        let cursor = match &plan.index_scan {
            Some(scan) => {
                self.metrics.increment_index_scans();
                self.client
                    .query_by_index(&scan.index, &scan.range, Some(filter))?
            }
            None => {
                self.metrics.increment_full_scans();
                self.client.scan(&plan.namespace, &plan.set, Some(filter))?
            }
        };
        Ok(cursor)
    }

    /// Lazy sequence of up to `limit` matching records.
    ///
    /// With a non-empty sorter the matching set is read whole and sorted
    /// first; a store failure then fails the call instead of the sequence.
    pub fn find_all(
        &self,
        plan: &QueryPlan,
        sorter: &ResultSorter,
        limit: Option<usize>,
    ) -> QueryResult<Results> {
        let cursor: RecordCursor = if sorter.is_empty() {
            self.cursor(plan)?
        } else {
            let records = self.sorted(plan, sorter, limit)?;
            Box::new(records.into_iter().map(Ok))
        };
        self.executed(plan, "find_all", None);
        Ok(Results::new(cursor, limit, self.metrics))
    }

    /// `size` records starting at `offset`, within the first `limit`
    /// matching records.
    ///
    /// Whether more records follow the window is not checked, so the slice
    /// never reports a next slice.
    pub fn find_slice(
        &self,
        plan: &QueryPlan,
        sorter: &ResultSorter,
        offset: usize,
        size: usize,
        limit: Option<usize>,
    ) -> QueryResult<Slice> {
        let content: Vec<Record> = if sorter.is_empty() {
            self.cursor(plan)?
                .take(limit.unwrap_or(usize::MAX))
                .skip(offset)
                .take(size)
                .collect::<Result<_, _>>()?
        } else {
            self.sorted(plan, sorter, limit)?
                .into_iter()
                .skip(offset)
                .take(size)
                .collect()
        };
        // skipped records are not returned
        self.metrics.add_records_returned(content.len() as u64);
        self.executed(plan, "slice", Some(content.len()));
        Ok(Slice {
            content,
            offset,
            size,
        })
    }

    /// Page of `request` plus the total count of matching records, the
    /// count capped at `limit`.
    ///
    /// The matching set is read whole, sorted when a sort is given, and
    /// cut in process.
    pub fn find_page(
        &self,
        plan: &QueryPlan,
        sorter: &ResultSorter,
        request: &PageRequest,
        limit: Option<usize>,
    ) -> QueryResult<Page> {
        let records = self.sorted(plan, sorter, limit)?;
        let total_elements = records.len();
        let content: Vec<Record> = records
            .into_iter()
            .skip(request.offset())
            .take(request.size)
            .collect();
        self.metrics.add_records_returned(content.len() as u64);
        self.executed(plan, "page", Some(content.len()));
        Ok(Page {
            content,
            page: request.page,
            size: request.size,
            total_elements,
        })
    }

    /// Counting by arbitrary criteria is not implemented against the store
    pub fn count(&self, method: &str) -> QueryResult<u64> {
        self.metrics.increment_queries_rejected();
        log_event_with_fields(Event::QueryRejected, &[("method", method), ("shape", "count")]);
        Err(QueryError::unsupported_operation(method))
    }

    fn sorted(
        &self,
        plan: &QueryPlan,
        sorter: &ResultSorter,
        limit: Option<usize>,
    ) -> QueryResult<Vec<Record>> {
        let mut records = self
            .cursor(plan)?
            .collect::<Result<Vec<_>, _>>()?;
        sorter.sort(&mut records);
        if let Some(limit) = limit {
            records.truncate(limit);
        }
        Ok(records)
    }

    fn executed(&self, plan: &QueryPlan, shape: &str, returned: Option<usize>) {
        self.metrics.increment_queries_executed();
        let returned = returned.map_or_else(|| "lazy".to_string(), |n| n.to_string());
        log_event_with_fields(
            Event::QueryExecuted,
            &[
                ("set", &plan.set),
                ("scan", plan.scan_type().as_str()),
                ("shape", shape),
                ("returned", &returned),
            ],
        );
    }
}

/// Wraps the filter so every record the store evaluates is counted
fn counting_filter(
    filter: Option<RecordFilter>,
    metrics: &'static MetricsRegistry,
) -> RecordFilter {
    Arc::new(move |record: &Record| {
        metrics.add_records_scanned(1);
        filter.as_ref().map_or(true, |f| f(record))
    })
}
