//! Entity metadata
//!
//! Field layouts of entity types: which fields exist, in what order, which
//! store bin each lives in, which one is the id and which ones link to a
//! nested composite type. The query engine only reads metadata, through
//! [`MetadataProvider`].
//!
//! Type graphs may be cyclic (`Person.friend: Person`); links are by type
//! name and never followed eagerly.

mod registry;
mod types;

pub use registry::{MetadataProvider, TypeRegistry};
pub use types::{EntityMetadata, FieldDescriptor, FieldKind};
