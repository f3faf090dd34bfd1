//! Repository-facing queries
//!
//! [`PartTreeQuery`] runs one part tree end to end:
//!
//! 1. resolve every part's property against the entity metadata
//! 2. build the criteria
//! 3. compile them against the current index catalog snapshot
//! 4. execute in the requested [`ResultShape`]
//!
//! [`ReactivePartTreeQuery`] delivers the same results as a stream.
//!
//! # Example
//!
//! ```ignore
//! let tree = PartTree::find("Person", "findByLastNameStartsWithOrderByAgeAsc")
//!     .part(Part::parse("LastNameStartsWith", vec!["Mo".into()])?)
//!     .order_by(Sort::asc("age"))
//!     .build();
//! let page = query.find_page(&tree, &PageRequest::of(0, 1))?;
//! ```

mod part_tree;
mod reactive;

pub use part_tree::{PartTreeQuery, PreparedQuery, QueryOutput, ResultShape};
pub use reactive::{ReactivePartTreeQuery, RecordStream};
