//! Index catalog
//!
//! The catalog is a snapshot of existing secondary indexes, grouped by set.
//! Snapshots are immutable; a refresh builds a new one and swaps it in, so
//! a query compiled against one snapshot never observes a partial update.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::store::{CollectionType, CtxStep, IndexDescriptor, IndexType};

/// Immutable view of the indexes of one namespace
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    by_set: HashMap<String, Vec<IndexDescriptor>>,
}

impl CatalogSnapshot {
    pub fn new(indexes: impl IntoIterator<Item = IndexDescriptor>) -> Self {
        let mut by_set: HashMap<String, Vec<IndexDescriptor>> = HashMap::new();
        for index in indexes {
            by_set.entry(index.set.clone()).or_default().push(index);
        }
        for indexes in by_set.values_mut() {
            indexes.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Self { by_set }
    }

    /// Indexes on `set`, ordered by name
    pub fn indexes_for(&self, set: &str) -> &[IndexDescriptor] {
        self.by_set.get(set).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First index (by name) matching every attribute
    pub fn find(
        &self,
        set: &str,
        bin: &str,
        index_type: IndexType,
        collection: CollectionType,
        ctx: &[CtxStep],
    ) -> Option<&IndexDescriptor> {
        self.indexes_for(set).iter().find(|i| {
            i.bin == bin && i.index_type == index_type && i.collection == collection && i.ctx == ctx
        })
    }

    pub fn len(&self) -> usize {
        self.by_set.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared holder of the current snapshot
#[derive(Debug, Default)]
pub struct IndexCatalog {
    current: RwLock<Arc<CatalogSnapshot>>,
}

impl IndexCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog starting from the given indexes
    pub fn with_indexes(indexes: impl IntoIterator<Item = IndexDescriptor>) -> Self {
        Self {
            current: RwLock::new(Arc::new(CatalogSnapshot::new(indexes))),
        }
    }

    /// The current snapshot. Readers keep it for the whole compilation.
    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        // the guarded value is swapped whole, never left half-written
        match self.current.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    /// Swaps in a new snapshot
    pub fn replace(&self, snapshot: CatalogSnapshot) {
        let snapshot = Arc::new(snapshot);
        match self.current.write() {
            Ok(mut guard) => *guard = snapshot,
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    pub fn indexes_for(&self, set: &str) -> Vec<IndexDescriptor> {
        self.snapshot().indexes_for(set).to_vec()
    }
}
