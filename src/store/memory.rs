//! In-process reference store
//!
//! Namespaces hold sets of records keyed by record key. Secondary indexes
//! are maintained on every write. Cursors are live: they fix the candidate
//! keys when opened and read each record when it is reached, so records
//! deleted mid-iteration are skipped and updates are observed.

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use super::client::{RecordCursor, RecordFilter, StoreClient};
use super::errors::{StoreError, StoreResult};
use super::index::{IndexDescriptor, IndexRange};
use super::index_tree::IndexTree;
use super::record::Record;
use crate::value::Value;

#[derive(Debug)]
struct SecondaryIndex {
    descriptor: IndexDescriptor,
    tree: IndexTree,
}

impl SecondaryIndex {
    fn add(&mut self, record: &Record) {
        if let Some(bin) = record.bin(&self.descriptor.bin) {
            for entry in self.descriptor.entries(bin) {
                self.tree.insert(entry.clone(), record.key().clone());
            }
        }
    }

    fn remove(&mut self, record: &Record) {
        if let Some(bin) = record.bin(&self.descriptor.bin) {
            for entry in self.descriptor.entries(bin) {
                self.tree.remove(entry, record.key());
            }
        }
    }
}

#[derive(Debug, Default)]
struct Namespace {
    sets: HashMap<String, BTreeMap<Value, Record>>,
    indexes: BTreeMap<String, SecondaryIndex>,
}

impl Namespace {
    fn indexes_on<'a>(&'a mut self, set: &'a str) -> impl Iterator<Item = &'a mut SecondaryIndex> {
        self.indexes
            .values_mut()
            .filter(move |idx| idx.descriptor.set == set)
    }
}

type Shared = Arc<RwLock<HashMap<String, Namespace>>>;

/// In-memory [`StoreClient`]
#[derive(Debug, Clone)]
pub struct MemoryStore {
    namespaces: Shared,
}

impl MemoryStore {
    /// Creates a store serving the given namespaces
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let namespaces = namespaces
            .into_iter()
            .map(|ns| (ns.into(), Namespace::default()))
            .collect();
        Self {
            namespaces: Arc::new(RwLock::new(namespaces)),
        }
    }

    /// Number of records in a set
    pub fn len(&self, namespace: &str, set: &str) -> StoreResult<usize> {
        let guard = self.namespaces.read()?;
        let ns = guard
            .get(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        Ok(ns.sets.get(set).map_or(0, BTreeMap::len))
    }

    fn cursor(
        &self,
        namespace: &str,
        set: &str,
        keys: Vec<Value>,
        filter: Option<RecordFilter>,
    ) -> RecordCursor {
        Box::new(LiveCursor {
            namespaces: Arc::clone(&self.namespaces),
            namespace: namespace.to_string(),
            set: set.to_string(),
            keys: keys.into(),
            filter,
            done: false,
        })
    }
}

impl StoreClient for MemoryStore {
    fn scan(
        &self,
        namespace: &str,
        set: &str,
        filter: Option<RecordFilter>,
    ) -> StoreResult<RecordCursor> {
        let keys = {
            let guard = self.namespaces.read()?;
            let ns = guard
                .get(namespace)
                .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
            ns.sets
                .get(set)
                .map(|records| records.keys().cloned().collect())
                .unwrap_or_default()
        };
        Ok(self.cursor(namespace, set, keys, filter))
    }

    fn query_by_index(
        &self,
        index: &IndexDescriptor,
        range: &IndexRange,
        filter: Option<RecordFilter>,
    ) -> StoreResult<RecordCursor> {
        let keys = {
            let guard = self.namespaces.read()?;
            let ns = guard
                .get(&index.namespace)
                .ok_or_else(|| StoreError::UnknownNamespace(index.namespace.clone()))?;
            let secondary = ns
                .indexes
                .get(&index.name)
                .ok_or_else(|| StoreError::IndexNotFound(index.name.clone()))?;
            secondary.tree.lookup(range)
        };
        Ok(self.cursor(&index.namespace, &index.set, keys, filter))
    }

    fn create_index(&self, index: &IndexDescriptor) -> StoreResult<()> {
        let mut guard = self.namespaces.write()?;
        let ns = guard
            .get_mut(&index.namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(index.namespace.clone()))?;
        if ns.indexes.contains_key(&index.name) {
            return Err(StoreError::IndexAlreadyExists(index.name.clone()));
        }

        let mut secondary = SecondaryIndex {
            descriptor: index.clone(),
            tree: IndexTree::new(),
        };
        if let Some(records) = ns.sets.get(&index.set) {
            for record in records.values() {
                secondary.add(record);
            }
        }
        ns.indexes.insert(index.name.clone(), secondary);
        Ok(())
    }

    fn drop_index(&self, namespace: &str, name: &str) -> StoreResult<()> {
        let mut guard = self.namespaces.write()?;
        let ns = guard
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        ns.indexes
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| StoreError::IndexNotFound(name.to_string()))
    }

    fn list_indexes(&self, namespace: &str) -> StoreResult<Vec<IndexDescriptor>> {
        let guard = self.namespaces.read()?;
        let ns = guard
            .get(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        Ok(ns.indexes.values().map(|i| i.descriptor.clone()).collect())
    }

    fn put(&self, namespace: &str, set: &str, record: Record) -> StoreResult<()> {
        let mut guard = self.namespaces.write()?;
        let ns = guard
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;

        let previous = ns
            .sets
            .entry(set.to_string())
            .or_default()
            .insert(record.key().clone(), record.clone());
        for index in ns.indexes_on(set) {
            if let Some(previous) = &previous {
                index.remove(previous);
            }
            index.add(&record);
        }
        Ok(())
    }

    fn get(&self, namespace: &str, set: &str, key: &Value) -> StoreResult<Option<Record>> {
        let guard = self.namespaces.read()?;
        let ns = guard
            .get(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;
        Ok(ns.sets.get(set).and_then(|records| records.get(key)).cloned())
    }

    fn delete(&self, namespace: &str, set: &str, key: &Value) -> StoreResult<bool> {
        let mut guard = self.namespaces.write()?;
        let ns = guard
            .get_mut(namespace)
            .ok_or_else(|| StoreError::UnknownNamespace(namespace.to_string()))?;

        let removed = ns.sets.get_mut(set).and_then(|records| records.remove(key));
        match removed {
            Some(record) => {
                for index in ns.indexes_on(set) {
                    index.remove(&record);
                }
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

/// Reads each candidate record when reached; the lock is held only for the
/// single lookup
struct LiveCursor {
    namespaces: Shared,
    namespace: String,
    set: String,
    keys: VecDeque<Value>,
    filter: Option<RecordFilter>,
    done: bool,
}

impl LiveCursor {
    fn read(&self, key: &Value) -> StoreResult<Option<Record>> {
        let guard = self.namespaces.read()?;
        Ok(guard
            .get(&self.namespace)
            .and_then(|ns| ns.sets.get(&self.set))
            .and_then(|records| records.get(key))
            .cloned())
    }
}

impl Iterator for LiveCursor {
    type Item = StoreResult<Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(key) = self.keys.pop_front() {
            match self.read(&key) {
                Ok(Some(record)) => {
                    if self.filter.as_ref().map_or(true, |f| f(&record)) {
                        return Some(Ok(record));
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }
        None
    }
}
