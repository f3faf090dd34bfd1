//! Criteria
//!
//! A [`Criterion`] is a compiled part: the resolved path, which part of the
//! field value is targeted (whole value, any list element, one map entry,
//! map keys or map values) and the [`Operation`] applied to it.
//!
//! # Operator semantics
//!
//! - Equality is structural. NOT_EQUALS requires the field to be present.
//! - Range operators use the store ordering and never compare values of
//!   different types. BETWEEN is inclusive on both ends.
//! - A scalar argument against a list field applies to each element; a
//!   list argument compares the whole list.
//! - LIKE is a full-value regex match; substring predicates escape their
//!   argument. Ignore-case folds case for both.

mod builder;
mod criterion;
mod pattern;

pub use builder::CriteriaBuilder;
pub use criterion::{Criterion, Operation, Target};
pub use pattern::{Pattern, PatternKind};
