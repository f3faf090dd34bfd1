//! Predicate compiler
//!
//! Turns the criteria of a part tree into an immutable [`QueryPlan`]:
//!
//! - a [`FilterExpr`] folded left to right in declaration order, so
//!   `A OR B AND C` evaluates as `(A OR B) AND C`
//! - at most one driving [`IndexScan`], chosen from the catalog snapshot
//!
//! # Index Selection
//!
//! Only criteria that must hold for the whole tree to hold (those after the
//! last OR) are considered, left to right; the first with a matching index
//! wins. The driving criterion stays in the filter and is re-verified per
//! record.
//!
//! Compilation never fails for lack of an index.

mod compiler;
mod explain;
mod filter;
mod plan;

pub use compiler::PredicateCompiler;
pub use explain::ExplainPlan;
pub use filter::FilterExpr;
pub use plan::{IndexScan, QueryPlan, ScanType};
