//! Store client boundary
//!
//! The query engine talks to the store only through [`StoreClient`]: set
//! scans, secondary-index range queries, index administration and plain
//! record reads and writes. Connection handling and the wire protocol sit
//! behind the trait.
//!
//! [`MemoryStore`] is an in-process implementation used by the tests and
//! by embedders that want the engine without a server.

mod client;
mod errors;
mod index;
mod index_tree;
mod memory;
mod record;

pub use client::{RecordCursor, RecordFilter, StoreClient};
pub use errors::{StoreError, StoreResult};
pub use index::{CollectionType, CtxStep, IndexDescriptor, IndexRange, IndexType};
pub use index_tree::IndexTree;
pub use memory::MemoryStore;
pub use record::Record;
