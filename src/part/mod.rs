//! Part tree model
//!
//! Parts are the atomic predicates of a derived query method, for example
//! `FirstNameStartsWith("D")` or `IntMapGreaterThan("key2", 0)`. A
//! [`PartTree`] holds the parts of one method joined by AND/OR strictly in
//! declaration order.
//!
//! The keyword vocabulary with arities and aliases lives in [`Keyword`].

mod keyword;
#[allow(clippy::module_inception)]
mod part;
mod sort;
mod tree;

pub use keyword::Keyword;
pub use part::{MapCriteria, Part};
pub use sort::{Direction, Order, Sort};
pub use tree::{Join, PartTree, PartTreeBuilder, Subject};
