//! Property path resolution
//!
//! Resolves the property token of a part (`FriendAddressZipCode`) into the
//! chain of fields it names (`friend` -> `address` -> `zipCode`).
//!
//! # Algorithm
//!
//! Greedy longest-prefix match over a per-type trie of capitalized field
//! names, descending into composite types and backtracking to shorter
//! matches on failure. Types are nodes of a static graph, so cyclic links
//! (`Person.friend: Person`) are legal; depth is bounded only by the token
//! length, since every hop consumes at least one character.

#[allow(clippy::module_inception)]
mod resolver;
mod path;
mod trie;

pub use path::{FieldHop, PropertyPath};
pub use resolver::PathResolver;
