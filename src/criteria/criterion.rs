//! Single-field criteria and their evaluation

use std::cmp::Ordering;
use std::fmt;

use super::pattern::Pattern;
use crate::part::{Keyword, MapCriteria};
use crate::resolver::PropertyPath;
use crate::store::Record;
use crate::value::{compare, TypeRank, Value};

/// Which part of the field value an operation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// The whole value
    Value,
    /// Each element of a list; any element satisfying the operation matches
    AnyElement,
    /// The entry at one map key; a missing key reads as nil
    MapEntry(Value),
    /// Each map key
    MapKeys,
    /// Each map value
    MapValues,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Value => "value",
            Target::AnyElement => "any_element",
            Target::MapEntry(_) => "map_entry",
            Target::MapKeys => "map_keys",
            Target::MapValues => "map_values",
        }
    }
}

/// Comparison applied to the targeted value
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Equals(Value),
    /// Requires a present value
    NotEquals(Value),
    GreaterThan(Value),
    GreaterThanOrEqual(Value),
    LessThan(Value),
    LessThanOrEqual(Value),
    /// Inclusive on both ends
    Between(Value, Value),
    In(Vec<Value>),
    Matches(Pattern),
    /// String present and not matching
    NotMatches(Pattern),
    IsTrue,
    IsFalse,
    IsNull,
    IsNotNull,
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Equals(_) => "eq",
            Operation::NotEquals(_) => "ne",
            Operation::GreaterThan(_) => "gt",
            Operation::GreaterThanOrEqual(_) => "gte",
            Operation::LessThan(_) => "lt",
            Operation::LessThanOrEqual(_) => "lte",
            Operation::Between(_, _) => "between",
            Operation::In(_) => "in",
            Operation::Matches(_) => "matches",
            Operation::NotMatches(_) => "not_matches",
            Operation::IsTrue => "is_true",
            Operation::IsFalse => "is_false",
            Operation::IsNull => "is_null",
            Operation::IsNotNull => "is_not_null",
        }
    }

    pub fn is_range(&self) -> bool {
        matches!(
            self,
            Operation::GreaterThan(_)
                | Operation::GreaterThanOrEqual(_)
                | Operation::LessThan(_)
                | Operation::LessThanOrEqual(_)
                | Operation::Between(_, _)
        )
    }

    /// Negative operations hold for a collection only when no member
    /// violates them
    fn is_negative(&self) -> bool {
        matches!(self, Operation::NotEquals(_) | Operation::NotMatches(_))
    }

    /// Evaluates against a value; `None` is an absent field
    pub fn test(&self, value: Option<&Value>) -> bool {
        let value = value.filter(|v| !v.is_nil());
        match self {
            Operation::IsNull => value.is_none(),
            Operation::IsNotNull => value.is_some(),
            _ => match value {
                Some(v) => self.test_present(v),
                None => false,
            },
        }
    }

    fn test_present(&self, v: &Value) -> bool {
        match self {
            Operation::Equals(a) => v == a,
            Operation::NotEquals(a) => v != a,
            Operation::GreaterThan(a) => ordered(v, a).is_some_and(Ordering::is_gt),
            Operation::GreaterThanOrEqual(a) => ordered(v, a).is_some_and(Ordering::is_ge),
            Operation::LessThan(a) => ordered(v, a).is_some_and(Ordering::is_lt),
            Operation::LessThanOrEqual(a) => ordered(v, a).is_some_and(Ordering::is_le),
            Operation::Between(lo, hi) => {
                ordered(v, lo).is_some_and(Ordering::is_ge)
                    && ordered(v, hi).is_some_and(Ordering::is_le)
            }
            Operation::In(items) => items.contains(v),
            Operation::Matches(p) => v.as_str().is_some_and(|s| p.is_match(s)),
            Operation::NotMatches(p) => v.as_str().is_some_and(|s| !p.is_match(s)),
            Operation::IsTrue => matches!(v, Value::Bool(true)),
            Operation::IsFalse => matches!(v, Value::Bool(false)),
            Operation::IsNull => false,
            Operation::IsNotNull => true,
        }
    }
}

/// Store ordering between values of the same type; values of different
/// types are not comparable
fn ordered(v: &Value, arg: &Value) -> Option<Ordering> {
    (TypeRank::of(v) == TypeRank::of(arg)).then(|| compare(v, arg))
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Equals(a) => write!(f, "= {}", a),
            Operation::NotEquals(a) => write!(f, "!= {}", a),
            Operation::GreaterThan(a) => write!(f, "> {}", a),
            Operation::GreaterThanOrEqual(a) => write!(f, ">= {}", a),
            Operation::LessThan(a) => write!(f, "< {}", a),
            Operation::LessThanOrEqual(a) => write!(f, "<= {}", a),
            Operation::Between(lo, hi) => write!(f, "BETWEEN {} AND {}", lo, hi),
            Operation::In(items) => write!(f, "IN {}", Value::List(items.clone())),
            Operation::Matches(p) => write!(f, "MATCHES {}", p),
            Operation::NotMatches(p) => write!(f, "NOT MATCHES {}", p),
            Operation::IsTrue => write!(f, "IS TRUE"),
            Operation::IsFalse => write!(f, "IS FALSE"),
            Operation::IsNull => write!(f, "IS NULL"),
            Operation::IsNotNull => write!(f, "IS NOT NULL"),
        }
    }
}

/// One compiled part: resolved path, target and operation
#[derive(Debug, Clone, PartialEq)]
pub struct Criterion {
    pub(crate) path: PropertyPath,
    pub(crate) keyword: Keyword,
    pub(crate) ignore_case: bool,
    pub(crate) target: Target,
    pub(crate) operation: Operation,
    pub(crate) map_criteria: Option<MapCriteria>,
}

impl Criterion {
    pub fn path(&self) -> &PropertyPath {
        &self.path
    }

    pub fn keyword(&self) -> Keyword {
        self.keyword
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }

    pub fn map_criteria(&self) -> Option<MapCriteria> {
        self.map_criteria
    }

    /// Reads the field value the path points at
    pub fn extract<'r>(&self, record: &'r Record) -> Option<&'r Value> {
        self.path.read(record)
    }

    /// Evaluates the criterion against a record
    pub fn matches(&self, record: &Record) -> bool {
        self.matches_value(self.extract(record))
    }

    /// Evaluates the criterion against an extracted field value
    pub fn matches_value(&self, value: Option<&Value>) -> bool {
        let op = &self.operation;
        let value = value.filter(|v| !v.is_nil());
        match &self.target {
            Target::Value => op.test(value),
            Target::AnyElement => match value.and_then(Value::as_list) {
                Some(items) => any_or_all(op, items.iter()),
                None => false,
            },
            Target::MapEntry(key) => match value.and_then(Value::as_map) {
                Some(entries) => match entries.get(key) {
                    Some(entry) => op.test(Some(entry)),
                    // nil entry differs from any argument
                    None => op.is_negative() || op.test(None),
                },
                None => false,
            },
            Target::MapKeys => match value.and_then(Value::as_map) {
                Some(entries) => any_or_all(op, entries.keys()),
                None => false,
            },
            Target::MapValues => match value.and_then(Value::as_map) {
                Some(entries) => any_or_all(op, entries.values()),
                None => false,
            },
        }
    }
}

fn any_or_all<'a>(op: &Operation, mut members: impl Iterator<Item = &'a Value>) -> bool {
    if op.is_negative() {
        members.all(|m| op.test(Some(m)))
    } else {
        members.any(|m| op.test(Some(m)))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path.dot_path())?;
        match &self.target {
            Target::Value => {}
            Target::AnyElement => write!(f, "[*]")?,
            Target::MapEntry(key) => write!(f, "[{}]", key)?,
            Target::MapKeys => write!(f, ".keys()")?,
            Target::MapValues => write!(f, ".values()")?,
        }
        write!(f, " {}", self.operation)
    }
}
