//! Query executor and pager
//!
//! Consumes compiled plans and produces one of the result shapes:
//!
//! - lazy sequence ([`Results`]): single forward pass over a live store
//!   cursor, stops at the limit or after the first store error
//! - bounded slice ([`Slice`]): a window at an offset, no total count
//! - counted page ([`Page`]): a window plus the total matching count
//!
//! Count queries are rejected with `UnsupportedOperation`.
//!
//! Sorting materializes the matching set and orders it with the store's
//! value ordering; the memory cost is bounded by the set scope.

#[allow(clippy::module_inception)]
mod executor;
mod result;
mod sorter;

pub use executor::{QueryExecutor, Results};
pub use result::{Page, PageRequest, Slice, DEFAULT_PAGE_SIZE};
pub use sorter::{ResultSorter, SortKey};
