//! partquery - derived queries for a schema-less key-value/document store
//!
//! Compiles method-name-shaped query descriptions (`findByAddressZipCode`,
//! `findByIntsGreaterThan`, `findByStringMapContaining`) into store plans
//! and runs them as lazy sequences, bounded slices or counted pages.
//!
//! Pipeline: [`part`] trees are resolved by the [`resolver`] against
//! [`metadata`], turned into [`criteria`], compiled by the [`planner`]
//! against the [`index`] catalog and run by the [`executor`] over a
//! [`store`] client. [`query`] ties the stages together.

pub mod config;
pub mod criteria;
pub mod error;
pub mod executor;
pub mod index;
pub mod metadata;
pub mod observability;
pub mod part;
pub mod planner;
pub mod query;
pub mod resolver;
pub mod store;
pub mod value;

pub use config::{ConfigError, QueryConfig};
pub use error::{QueryError, QueryResult};
pub use executor::{Page, PageRequest, Slice};
pub use part::{Keyword, MapCriteria, Order, Part, PartTree, Sort};
pub use query::{PartTreeQuery, ReactivePartTreeQuery};
pub use value::Value;
