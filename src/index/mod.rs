//! Index catalog and administration
//!
//! - [`IndexCatalog`]: the set of existing secondary indexes the predicate
//!   compiler consults, held as an immutable snapshot that refreshes swap
//!   out whole
//! - [`IndexRefresher`]: rebuilds the snapshot from the store, on demand or
//!   periodically on tokio
//! - [`IndexOperations`]: create/drop that treat duplicate-create and
//!   drop-missing as success
//!
//! Queries may see a stale catalog. A missing index only means the query
//! falls back to a full scan with a residual filter, which is still
//! correct.

mod catalog;
mod operations;
mod refresher;

pub use catalog::{CatalogSnapshot, IndexCatalog};
pub use operations::IndexOperations;
pub use refresher::IndexRefresher;
