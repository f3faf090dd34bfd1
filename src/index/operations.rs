//! Idempotent index administration
//!
//! Duplicate creates and drops of missing indexes are conditions, not
//! errors: concurrent creators race on the same name and each may see
//! `IndexAlreadyExists`. Those conditions are logged, counted and
//! swallowed here.
//!
//! Once the store has applied a change, a failed catalog refresh is logged
//! and the change still reports success. The next refresh catches up.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use super::refresher::IndexRefresher;
use crate::observability::{log, log_event_with_fields, metrics, Event, Severity};
use crate::store::{IndexDescriptor, StoreClient, StoreError, StoreResult};

/// Creates and drops indexes, refreshing the catalog afterwards
pub struct IndexOperations {
    client: Arc<dyn StoreClient>,
    refresher: Option<Arc<IndexRefresher>>,
    swallowed: AtomicU64,
}

impl IndexOperations {
    pub fn new(client: Arc<dyn StoreClient>) -> Self {
        Self {
            client,
            refresher: None,
            swallowed: AtomicU64::new(0),
        }
    }

    /// Refresh the catalog after every successful change
    pub fn with_refresher(mut self, refresher: Arc<IndexRefresher>) -> Self {
        self.refresher = Some(refresher);
        self
    }

    /// Creates an index; an existing index of the same name is success
    pub fn create_index(&self, index: &IndexDescriptor) -> StoreResult<()> {
        match self.client.create_index(index) {
            Ok(()) => {
                log_event_with_fields(
                    Event::IndexCreated,
                    &[("index", &index.name), ("set", &index.set), ("bin", &index.bin)],
                );
                self.refresh(&index.name);
                Ok(())
            }
            Err(e) if e.is_index_condition() => {
                self.swallow(Event::IndexCreateConflict, &index.name, &e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Drops an index; a missing index is success
    pub fn drop_index(&self, namespace: &str, name: &str) -> StoreResult<()> {
        match self.client.drop_index(namespace, name) {
            Ok(()) => {
                log_event_with_fields(Event::IndexDropped, &[("index", name)]);
                self.refresh(name);
                Ok(())
            }
            Err(e) if e.is_index_condition() => {
                self.swallow(Event::IndexDropMissing, name, &e);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    pub fn index_exists(&self, namespace: &str, name: &str) -> StoreResult<bool> {
        Ok(self
            .client
            .list_indexes(namespace)?
            .iter()
            .any(|i| i.name == name))
    }

    /// Conditions swallowed by this instance
    pub fn swallowed_conditions(&self) -> u64 {
        self.swallowed.load(Ordering::Relaxed)
    }

    fn swallow(&self, event: Event, name: &str, condition: &StoreError) {
        self.swallowed.fetch_add(1, Ordering::Relaxed);
        metrics().increment_index_conflicts();
        log(
            Severity::Warn,
            event,
            &[("index", name), ("condition", condition.code())],
        );
    }

    fn refresh(&self, name: &str) {
        let Some(refresher) = &self.refresher else {
            return;
        };
        if let Err(e) = refresher.refresh_indexes() {
            log(
                Severity::Warn,
                Event::IndexCatalogRefreshFailed,
                &[("index", name), ("error", &e.to_string())],
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexCatalog;
    use crate::store::{
        IndexRange, IndexType, MemoryStore, Record, RecordCursor, RecordFilter,
    };
    use crate::value::Value;

    fn age_index() -> IndexDescriptor {
        IndexDescriptor::new("age_idx", "test", "person", "age", IndexType::Numeric)
    }

    #[test]
    fn test_duplicate_create_is_swallowed() {
        let ops = IndexOperations::new(Arc::new(MemoryStore::new(["test"])));
        ops.create_index(&age_index()).unwrap();
        ops.create_index(&age_index()).unwrap();
        assert_eq!(ops.swallowed_conditions(), 1);
        assert!(ops.index_exists("test", "age_idx").unwrap());
    }

    #[test]
    fn test_drop_missing_is_swallowed() {
        let ops = IndexOperations::new(Arc::new(MemoryStore::new(["test"])));
        ops.drop_index("test", "nope").unwrap();
        assert_eq!(ops.swallowed_conditions(), 1);
    }

    #[test]
    fn test_other_errors_propagate() {
        let ops = IndexOperations::new(Arc::new(MemoryStore::new(["test"])));
        let mut index = age_index();
        index.namespace = "missing".into();
        let err = ops.create_index(&index).unwrap_err();
        assert_eq!(err, StoreError::UnknownNamespace("missing".into()));
    }

    #[test]
    fn test_create_refreshes_catalog() {
        let store: Arc<dyn StoreClient> = Arc::new(MemoryStore::new(["test"]));
        let catalog = Arc::new(IndexCatalog::new());
        let refresher = Arc::new(IndexRefresher::new(store.clone(), "test", catalog.clone()));
        let ops = IndexOperations::new(store).with_refresher(refresher);

        ops.create_index(&age_index()).unwrap();
        assert_eq!(catalog.indexes_for("person").len(), 1);
        ops.drop_index("test", "age_idx").unwrap();
        assert!(catalog.indexes_for("person").is_empty());
    }

    /// Applies index changes but cannot list them back
    struct UnlistableStore(MemoryStore);

    impl StoreClient for UnlistableStore {
        fn scan(&self, ns: &str, set: &str, filter: Option<RecordFilter>) -> StoreResult<RecordCursor> {
            self.0.scan(ns, set, filter)
        }

        fn query_by_index(
            &self,
            index: &IndexDescriptor,
            range: &IndexRange,
            filter: Option<RecordFilter>,
        ) -> StoreResult<RecordCursor> {
            self.0.query_by_index(index, range, filter)
        }

        fn create_index(&self, index: &IndexDescriptor) -> StoreResult<()> {
            self.0.create_index(index)
        }

        fn drop_index(&self, namespace: &str, name: &str) -> StoreResult<()> {
            self.0.drop_index(namespace, name)
        }

        fn list_indexes(&self, _: &str) -> StoreResult<Vec<IndexDescriptor>> {
            Err(StoreError::io("info command timed out"))
        }

        fn put(&self, ns: &str, set: &str, record: Record) -> StoreResult<()> {
            self.0.put(ns, set, record)
        }

        fn get(&self, ns: &str, set: &str, key: &Value) -> StoreResult<Option<Record>> {
            self.0.get(ns, set, key)
        }

        fn delete(&self, ns: &str, set: &str, key: &Value) -> StoreResult<bool> {
            self.0.delete(ns, set, key)
        }
    }

    #[test]
    fn test_failed_refresh_after_change_is_not_an_error() {
        let store: Arc<dyn StoreClient> = Arc::new(UnlistableStore(MemoryStore::new(["test"])));
        let catalog = Arc::new(IndexCatalog::new());
        let refresher = Arc::new(IndexRefresher::new(store.clone(), "test", catalog.clone()));
        let ops = IndexOperations::new(store).with_refresher(refresher);

        assert_eq!(ops.create_index(&age_index()), Ok(()));
        assert!(catalog.indexes_for("person").is_empty());
        // the index was created; a second create is a swallowed condition
        assert_eq!(ops.create_index(&age_index()), Ok(()));
        assert_eq!(ops.swallowed_conditions(), 1);

        assert_eq!(ops.drop_index("test", "age_idx"), Ok(()));
        assert_eq!(ops.swallowed_conditions(), 1);
    }
}
