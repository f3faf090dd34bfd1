//! Result sorting for query execution
//!
//! Sorts records by resolved property paths using the store ordering,
//! deterministically.

use std::cmp::Ordering;

use crate::error::QueryResult;
use crate::part::{Direction, Sort};
use crate::resolver::{PathResolver, PropertyPath};
use crate::store::Record;
use crate::value::{compare, Value};

/// One resolved sort key
#[derive(Debug, Clone, PartialEq)]
pub struct SortKey {
    pub path: PropertyPath,
    pub direction: Direction,
    pub ignore_case: bool,
}

/// Sorts records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSorter {
    keys: Vec<SortKey>,
}

impl ResultSorter {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Resolves every order of `sort` against the root type
    pub fn resolve(resolver: &PathResolver, sort: &Sort) -> QueryResult<Self> {
        let keys = sort
            .orders()
            .iter()
            .map(|order| {
                Ok(SortKey {
                    path: resolver.resolve_dotted(&order.property)?,
                    direction: order.direction,
                    ignore_case: order.ignore_case,
                })
            })
            .collect::<QueryResult<Vec<_>>>()?;
        Ok(Self { keys })
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Sorts records in place. Sort is stable: ties keep store order.
    pub fn sort(&self, records: &mut [Record]) {
        if self.keys.is_empty() {
            return;
        }
        records.sort_by(|a, b| self.compare(a, b));
    }

    fn compare(&self, a: &Record, b: &Record) -> Ordering {
        for key in &self.keys {
            let ordering = Self::compare_values(key.path.read(a), key.path.read(b), key.ignore_case);
            let ordering = match key.direction {
                Direction::Asc => ordering,
                Direction::Desc => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }

    /// Absent values order first
    fn compare_values(a: Option<&Value>, b: Option<&Value>, ignore_case: bool) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(Value::String(a)), Some(Value::String(b))) if ignore_case => {
                a.to_lowercase().cmp(&b.to_lowercase())
            }
            (Some(a), Some(b)) => compare(a, b),
        }
    }
}
