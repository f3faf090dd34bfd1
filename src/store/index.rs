//! Secondary index descriptors and ranges

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Indexed value type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndexType {
    String,
    Numeric,
}

impl IndexType {
    pub fn as_str(&self) -> &'static str {
        match self {
            IndexType::String => "STRING",
            IndexType::Numeric => "NUMERIC",
        }
    }

    /// Whether a value can be an entry of an index of this type
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (IndexType::String, Value::String(_)) | (IndexType::Numeric, Value::Int(_))
        )
    }
}

/// Which members of the bin value are indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CollectionType {
    /// The value itself
    #[default]
    Default,
    /// Each list element
    List,
    /// Each map key
    MapKeys,
    /// Each map value
    MapValues,
}

impl CollectionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Default => "DEFAULT",
            CollectionType::List => "LIST",
            CollectionType::MapKeys => "MAPKEYS",
            CollectionType::MapValues => "MAPVALUES",
        }
    }
}

/// One step into a nested collection before indexing
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CtxStep {
    /// Value at a map key
    MapKey(String),
    /// List element by position; negative counts from the end
    ListIndex(i64),
}

impl CtxStep {
    /// Applies the step to a value
    pub fn apply<'v>(&self, value: &'v Value) -> Option<&'v Value> {
        match self {
            CtxStep::MapKey(key) => value.get(key),
            CtxStep::ListIndex(index) => {
                let items = value.as_list()?;
                let len = items.len() as i64;
                let pos = if *index < 0 { len + index } else { *index };
                if (0..len).contains(&pos) {
                    items.get(pos as usize)
                } else {
                    None
                }
            }
        }
    }
}

impl fmt::Display for CtxStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CtxStep::MapKey(key) => write!(f, "mapKey({})", key),
            CtxStep::ListIndex(index) => write!(f, "listIndex({})", index),
        }
    }
}

/// A secondary index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexDescriptor {
    pub name: String,
    pub namespace: String,
    pub set: String,
    pub bin: String,
    pub index_type: IndexType,
    #[serde(default)]
    pub collection: CollectionType,
    #[serde(default)]
    pub ctx: Vec<CtxStep>,
}

impl IndexDescriptor {
    pub fn new(
        name: impl Into<String>,
        namespace: impl Into<String>,
        set: impl Into<String>,
        bin: impl Into<String>,
        index_type: IndexType,
    ) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            set: set.into(),
            bin: bin.into(),
            index_type,
            collection: CollectionType::Default,
            ctx: Vec::new(),
        }
    }

    pub fn with_collection(mut self, collection: CollectionType) -> Self {
        self.collection = collection;
        self
    }

    pub fn with_ctx(mut self, ctx: Vec<CtxStep>) -> Self {
        self.ctx = ctx;
        self
    }

    /// Values a bin value contributes to this index
    pub fn entries<'v>(&self, bin_value: &'v Value) -> Vec<&'v Value> {
        let mut value = bin_value;
        for step in &self.ctx {
            match step.apply(value) {
                Some(next) => value = next,
                None => return Vec::new(),
            }
        }
        let members: Vec<&Value> = match self.collection {
            CollectionType::Default => vec![value],
            CollectionType::List => value.as_list().map(|l| l.iter().collect()).unwrap_or_default(),
            CollectionType::MapKeys => value.as_map().map(|m| m.keys().collect()).unwrap_or_default(),
            CollectionType::MapValues => {
                value.as_map().map(|m| m.values().collect()).unwrap_or_default()
            }
        };
        members
            .into_iter()
            .filter(|v| self.index_type.accepts(v))
            .collect()
    }
}

impl fmt::Display for IndexDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ON {}.{}({}) {} {}",
            self.name,
            self.namespace,
            self.set,
            self.bin,
            self.index_type.as_str(),
            self.collection.as_str()
        )?;
        if !self.ctx.is_empty() {
            let steps: Vec<String> = self.ctx.iter().map(ToString::to_string).collect();
            write!(f, " CTX [{}]", steps.join(", "))?;
        }
        Ok(())
    }
}

/// Key range of an index query
#[derive(Debug, Clone, PartialEq)]
pub enum IndexRange {
    /// Entries equal to the value
    Equal(Value),
    /// Numeric entries in `lo..=hi`
    Between { lo: i64, hi: i64 },
}

impl IndexRange {
    pub fn contains(&self, entry: &Value) -> bool {
        match (self, entry) {
            (IndexRange::Equal(v), entry) => v == entry,
            (IndexRange::Between { lo, hi }, Value::Int(i)) => lo <= i && i <= hi,
            _ => false,
        }
    }
}

impl fmt::Display for IndexRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndexRange::Equal(v) => write!(f, "= {}", v),
            IndexRange::Between { lo, hi } => write!(f, "[{}, {}]", lo, hi),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entries_by_collection() {
        let ints = Value::list([Value::from(1), Value::from("x"), Value::from(3)]);
        let idx = IndexDescriptor::new("i", "test", "person", "ints", IndexType::Numeric)
            .with_collection(CollectionType::List);
        assert_eq!(idx.entries(&ints), vec![&Value::Int(1), &Value::Int(3)]);

        let map = Value::map([("key1", 0), ("key2", 1)]);
        let keys = IndexDescriptor::new("k", "test", "person", "intMap", IndexType::String)
            .with_collection(CollectionType::MapKeys);
        assert_eq!(keys.entries(&map).len(), 2);
        let values = IndexDescriptor::new("v", "test", "person", "intMap", IndexType::Numeric)
            .with_collection(CollectionType::MapValues);
        assert_eq!(values.entries(&map), vec![&Value::Int(0), &Value::Int(1)]);
    }

    #[test]
    fn test_entries_with_ctx() {
        let friend = Value::map([(
            "address",
            Value::map([("zipCode", "C0123")]),
        )]);
        let idx = IndexDescriptor::new("z", "test", "person", "friend", IndexType::String)
            .with_collection(CollectionType::MapValues)
            .with_ctx(vec![CtxStep::MapKey("address".into())]);
        assert_eq!(idx.entries(&friend), vec![&Value::from("C0123")]);
    }

    #[test]
    fn test_list_index_step() {
        let list = Value::list([10, 20, 30]);
        assert_eq!(CtxStep::ListIndex(0).apply(&list), Some(&Value::Int(10)));
        assert_eq!(CtxStep::ListIndex(-1).apply(&list), Some(&Value::Int(30)));
        assert_eq!(CtxStep::ListIndex(3).apply(&list), None);
    }

    #[test]
    fn test_range_contains() {
        let range = IndexRange::Between { lo: 500, hi: 600 };
        assert!(range.contains(&Value::Int(500)));
        assert!(range.contains(&Value::Int(600)));
        assert!(!range.contains(&Value::Int(601)));
        assert!(!range.contains(&Value::from("550")));
    }
}
