//! Resolved property paths

use std::fmt;

use crate::metadata::FieldKind;
use crate::store::Record;
use crate::value::Value;

/// One hop of a resolved path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldHop {
    /// Declared field name
    pub name: String,
    /// Store bin (top-level hop) or map key inside the parent composite
    pub bin: String,
    pub kind: FieldKind,
}

/// Non-empty chain of field hops from a root type to a leaf field.
///
/// Every hop except the last is a composite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPath {
    root_type: String,
    hops: Vec<FieldHop>,
}

impl PropertyPath {
    pub(crate) fn new(root_type: impl Into<String>, hops: Vec<FieldHop>) -> Self {
        debug_assert!(!hops.is_empty());
        Self {
            root_type: root_type.into(),
            hops,
        }
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    pub fn hops(&self) -> &[FieldHop] {
        &self.hops
    }

    pub fn first(&self) -> &FieldHop {
        &self.hops[0]
    }

    pub fn leaf(&self) -> &FieldHop {
        &self.hops[self.hops.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Whether the path descends into a composite
    pub fn is_nested(&self) -> bool {
        self.hops.len() > 1
    }

    /// Top-level store bin
    pub fn bin(&self) -> &str {
        &self.first().bin
    }

    /// Keys from the top-level bin down to the leaf, excluding the bin
    pub fn nested_keys(&self) -> impl Iterator<Item = &str> {
        self.hops[1..].iter().map(|h| h.bin.as_str())
    }

    /// Whether the path is exactly the id field
    pub fn is_id(&self) -> bool {
        self.hops.len() == 1 && self.first().kind == FieldKind::Id
    }

    /// Reads the value the path points at; a path to the id field reads
    /// the record key
    pub fn read<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        if self.is_id() {
            return Some(record.key());
        }
        let mut value = record.bin(self.bin())?;
        for key in self.nested_keys() {
            value = value.get(key)?;
        }
        Some(value)
    }

    /// Dotted property names, `friend.address.zipCode`
    pub fn dot_path(&self) -> String {
        self.hops
            .iter()
            .map(|h| h.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.root_type, self.dot_path())
    }
}
