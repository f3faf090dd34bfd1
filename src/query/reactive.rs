//! Reactive part tree queries
//!
//! Same derivation as [`PartTreeQuery`], with results delivered as a
//! `futures` stream. Store calls block, so each query runs on tokio's
//! blocking pool and hands records over a bounded channel. Dropping the
//! stream stops the producer at its next record.
//!
//! Must be called from within a tokio runtime.

use futures_util::stream::{self, BoxStream, StreamExt};
use tokio::sync::mpsc;

use super::part_tree::PartTreeQuery;
use crate::error::{QueryError, QueryResult};
use crate::executor::{Page, PageRequest, Slice};
use crate::part::{PartTree, Sort};
use crate::store::{Record, StoreError};

const CHANNEL_CAPACITY: usize = 64;

/// Stream of query results; a derivation error is the only item
pub type RecordStream = BoxStream<'static, QueryResult<Record>>;

#[derive(Clone)]
pub struct ReactivePartTreeQuery {
    inner: PartTreeQuery,
}

impl ReactivePartTreeQuery {
    pub fn new(inner: PartTreeQuery) -> Self {
        Self { inner }
    }

    pub fn blocking(&self) -> &PartTreeQuery {
        &self.inner
    }

    /// Matching records as a stream. The stream ends after the first error.
    pub fn find_all(&self, tree: PartTree, sort: Sort) -> RecordStream {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let query = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let results = match query.find_all(&tree, &sort) {
                Ok(results) => results,
                Err(e) => {
                    let _ = tx.blocking_send(Err(e));
                    return;
                }
            };
            for item in results {
                // receiver dropped: the caller stopped listening
                if tx.blocking_send(item).is_err() {
                    return;
                }
            }
        });

        stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|item| (item, rx))
        })
        .boxed()
    }

    pub async fn find_slice(
        &self,
        tree: PartTree,
        offset: usize,
        size: usize,
        sort: Sort,
    ) -> QueryResult<Slice> {
        let query = self.inner.clone();
        blocking(move || query.find_slice(&tree, offset, size, &sort)).await
    }

    pub async fn find_page(&self, tree: PartTree, request: PageRequest) -> QueryResult<Page> {
        let query = self.inner.clone();
        blocking(move || query.find_page(&tree, &request)).await
    }

    /// Always fails, like [`PartTreeQuery::count`]
    pub async fn count(&self, tree: PartTree) -> QueryResult<u64> {
        self.inner.count(&tree)
    }
}

async fn blocking<T, F>(f: F) -> QueryResult<T>
where
    F: FnOnce() -> QueryResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| QueryError::Store(StoreError::io(format!("query task failed: {}", e))))?
}
