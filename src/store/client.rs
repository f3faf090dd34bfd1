//! Store client contract

use std::sync::Arc;

use super::errors::StoreResult;
use super::index::{IndexDescriptor, IndexRange};
use super::record::Record;
use crate::value::Value;

/// Forward-only cursor of records. An `Err` item ends the sequence.
pub type RecordCursor = Box<dyn Iterator<Item = StoreResult<Record>> + Send>;

/// Record filter pushed down to the store
pub type RecordFilter = Arc<dyn Fn(&Record) -> bool + Send + Sync>;

/// What the query engine needs from a store
pub trait StoreClient: Send + Sync {
    /// Scans a whole set, applying `filter` store-side when given
    fn scan(
        &self,
        namespace: &str,
        set: &str,
        filter: Option<RecordFilter>,
    ) -> StoreResult<RecordCursor>;

    /// Reads the records whose entries in `index` fall in `range`, applying
    /// `filter` store-side when given. A record is returned at most once.
    fn query_by_index(
        &self,
        index: &IndexDescriptor,
        range: &IndexRange,
        filter: Option<RecordFilter>,
    ) -> StoreResult<RecordCursor>;

    /// Fails with `IndexAlreadyExists` when the name is taken
    fn create_index(&self, index: &IndexDescriptor) -> StoreResult<()>;

    /// Fails with `IndexNotFound` when no such index exists
    fn drop_index(&self, namespace: &str, name: &str) -> StoreResult<()>;

    fn list_indexes(&self, namespace: &str) -> StoreResult<Vec<IndexDescriptor>>;

    fn put(&self, namespace: &str, set: &str, record: Record) -> StoreResult<()>;

    fn get(&self, namespace: &str, set: &str, key: &Value) -> StoreResult<Option<Record>>;

    /// Returns whether a record was removed
    fn delete(&self, namespace: &str, set: &str, key: &Value) -> StoreResult<bool>;
}
