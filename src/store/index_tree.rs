//! BTreeMap-backed secondary index
//!
//! Maps index entries to the keys of the records that contain them. Entry
//! order is the store value ordering, so numeric ranges are contiguous.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Bound;

use super::index::IndexRange;
use crate::value::Value;

/// Entries of one secondary index
#[derive(Debug, Default)]
pub struct IndexTree {
    tree: BTreeMap<Value, BTreeSet<Value>>,
}

impl IndexTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `record_key` under `entry`
    pub fn insert(&mut self, entry: Value, record_key: Value) {
        self.tree.entry(entry).or_default().insert(record_key);
    }

    /// Removes `record_key` from `entry`, dropping the entry once empty
    pub fn remove(&mut self, entry: &Value, record_key: &Value) {
        if let Some(keys) = self.tree.get_mut(entry) {
            keys.remove(record_key);
            if keys.is_empty() {
                self.tree.remove(entry);
            }
        }
    }

    /// Record keys under entries in `range`, each key once, in entry order
    pub fn lookup(&self, range: &IndexRange) -> Vec<Value> {
        let (lower, upper) = match range {
            IndexRange::Equal(v) => (Bound::Included(v.clone()), Bound::Included(v.clone())),
            IndexRange::Between { lo, hi } => {
                if lo > hi {
                    return Vec::new();
                }
                (
                    Bound::Included(Value::Int(*lo)),
                    Bound::Included(Value::Int(*hi)),
                )
            }
        };

        let mut seen = BTreeSet::new();
        let mut keys = Vec::new();
        for record_keys in self.tree.range((lower, upper)).map(|(_, k)| k) {
            for key in record_keys {
                if seen.insert(key.clone()) {
                    keys.push(key.clone());
                }
            }
        }
        keys
    }

    /// Returns the number of distinct entries
    pub fn entry_count(&self) -> usize {
        self.tree.len()
    }
}
