//! Greedy path resolution with backtracking

use std::collections::{HashMap, VecDeque};

use super::path::{FieldHop, PropertyPath};
use super::trie::{capitalize, FieldTrie};
use crate::error::{QueryError, QueryResult};
use crate::metadata::{FieldDescriptor, MetadataProvider};

const SEGMENT_SEPARATOR: char = '_';

struct TypeNode {
    fields: Vec<FieldDescriptor>,
    trie: FieldTrie,
}

/// Resolves path tokens against the static shape of a root type.
///
/// Tries for the root and every type reachable from it through composite
/// links are built once, on construction. Resolution is read-only after
/// that, so one resolver serves concurrent callers.
pub struct PathResolver {
    root_type: String,
    types: HashMap<String, TypeNode>,
}

impl PathResolver {
    /// Builds tries for `root_type` and every type reachable from it
    pub fn new<M: MetadataProvider + ?Sized>(metadata: &M, root_type: &str) -> QueryResult<Self> {
        let mut types = HashMap::new();
        let mut pending = VecDeque::from([root_type.to_string()]);

        while let Some(type_name) = pending.pop_front() {
            if types.contains_key(&type_name) {
                continue;
            }
            let fields = metadata.fields_of(&type_name)?.to_vec();
            for field in &fields {
                if let Some(nested) = field.nested_type() {
                    if !types.contains_key(nested) {
                        pending.push_back(nested.to_string());
                    }
                }
            }
            let trie = FieldTrie::build(&fields);
            types.insert(type_name, TypeNode { fields, trie });
        }

        Ok(Self {
            root_type: root_type.to_string(),
            types,
        })
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    /// Resolves a concatenated PascalCase token such as
    /// `FriendAddressZipCode`.
    ///
    /// At each hop the longest field name that prefixes the remaining token
    /// is tried first; a composite field recurses into its type, and a
    /// failed descent backtracks to the next shorter match. `_` forces a
    /// hop boundary.
    pub fn resolve(&self, token: &str) -> QueryResult<PropertyPath> {
        let unresolvable = || QueryError::unresolvable(token, &self.root_type);
        if token.is_empty()
            || token.starts_with(SEGMENT_SEPARATOR)
            || token.ends_with(SEGMENT_SEPARATOR)
        {
            return Err(unresolvable());
        }

        // `lastName` and `address_zipCode` name the same fields as
        // `LastName` and `Address_ZipCode`
        let normalized = token
            .split(SEGMENT_SEPARATOR)
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(&SEGMENT_SEPARATOR.to_string());

        let mut hops = Vec::new();
        if self.descend(&self.root_type, &normalized, 0, &mut hops) {
            Ok(PropertyPath::new(&self.root_type, hops))
        } else {
            Err(unresolvable())
        }
    }

    fn descend(&self, type_name: &str, token: &str, pos: usize, hops: &mut Vec<FieldHop>) -> bool {
        let Some(node) = self.types.get(type_name) else {
            return false;
        };

        for (len, idx) in node.trie.prefixes(&token[pos..]).into_iter().rev() {
            let field = &node.fields[idx];
            let end = pos + len;
            if end == token.len() {
                hops.push(hop(field));
                return true;
            }

            let Some(nested) = field.nested_type() else {
                continue;
            };
            let next = if token[end..].starts_with(SEGMENT_SEPARATOR) {
                end + SEGMENT_SEPARATOR.len_utf8()
            } else {
                end
            };

            hops.push(hop(field));
            if self.descend(nested, token, next, hops) {
                return true;
            }
            hops.pop();
        }
        false
    }

    /// Resolves a dotted sort property such as `address.zipCode`. Each
    /// segment matches a field name exactly, falling back to a
    /// case-insensitive match.
    pub fn resolve_dotted(&self, dotted: &str) -> QueryResult<PropertyPath> {
        let unresolvable = || QueryError::unresolvable(dotted, &self.root_type);
        let mut hops = Vec::new();
        let mut type_name = self.root_type.as_str();
        let mut segments = dotted.split('.').peekable();

        while let Some(segment) = segments.next() {
            let node = self.types.get(type_name).ok_or_else(unresolvable)?;
            let field = node
                .fields
                .iter()
                .find(|f| f.name == segment)
                .or_else(|| {
                    node.fields
                        .iter()
                        .find(|f| f.name.eq_ignore_ascii_case(segment))
                })
                .ok_or_else(unresolvable)?;
            hops.push(hop(field));

            if segments.peek().is_some() {
                type_name = field.nested_type().ok_or_else(unresolvable)?;
            }
        }
        Ok(PropertyPath::new(&self.root_type, hops))
    }
}

fn hop(field: &FieldDescriptor) -> FieldHop {
    FieldHop {
        name: field.name.clone(),
        bin: field.store_bin().to_string(),
        kind: field.kind.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{EntityMetadata, FieldDescriptor, FieldKind, TypeRegistry};

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                EntityMetadata::new("Person")
                    .field(FieldDescriptor::id("id"))
                    .field(FieldDescriptor::scalar("firstName"))
                    .field(FieldDescriptor::scalar("age"))
                    .field(FieldDescriptor::composite("address", "Address"))
                    .field(FieldDescriptor::scalar("addressZip"))
                    .field(FieldDescriptor::composite("friend", "Person"))
                    .field(FieldDescriptor::composite("bestFriend", "Person"))
                    .field(FieldDescriptor::list("ints").with_bin("i")),
            )
            .with(
                EntityMetadata::new("Address")
                    .field(FieldDescriptor::scalar("street"))
                    .field(FieldDescriptor::scalar("zipCode"))
                    .field(FieldDescriptor::scalar("zip")),
            )
    }

    fn names(path: &PropertyPath) -> Vec<&str> {
        path.hops().iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_single_hop() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver.resolve("FirstName").unwrap();
        assert_eq!(names(&path), ["firstName"]);
        assert_eq!(path.bin(), "firstName");
        assert!(!path.is_nested());

        // leading lower case is accepted
        assert_eq!(resolver.resolve("firstName").unwrap(), path);
    }

    #[test]
    fn test_store_bin_is_carried() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver.resolve("Ints").unwrap();
        assert_eq!(path.bin(), "i");
        assert_eq!(path.leaf().kind, FieldKind::List);
    }

    #[test]
    fn test_nested_composite() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver.resolve("AddressZipCode").unwrap();
        assert_eq!(names(&path), ["address", "zipCode"]);
        assert_eq!(path.dot_path(), "address.zipCode");
        assert_eq!(path.nested_keys().collect::<Vec<_>>(), ["zipCode"]);
    }

    #[test]
    fn test_longest_match_then_backtrack() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();

        // `addressZip` is the full token
        let path = resolver.resolve("AddressZip").unwrap();
        assert_eq!(names(&path), ["addressZip"]);

        // `addressZip` is a scalar and cannot continue into `Code`;
        // backtracks to `address` + `zipCode`
        let path = resolver.resolve("AddressZipCode").unwrap();
        assert_eq!(names(&path), ["address", "zipCode"]);
    }

    #[test]
    fn test_separator_forces_boundary() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver.resolve("Address_Zip").unwrap();
        assert_eq!(names(&path), ["address", "zip"]);
        assert_eq!(resolver.resolve("address_zip").unwrap(), path);

        assert!(resolver.resolve("Address_").is_err());
        assert!(resolver.resolve("_Address").is_err());
    }

    #[test]
    fn test_cyclic_type_graph() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver
            .resolve("FriendBestFriendFriendFriendAddressZipCode")
            .unwrap();
        assert_eq!(
            names(&path),
            ["friend", "bestFriend", "friend", "friend", "address", "zipCode"]
        );
    }

    #[test]
    fn test_unresolvable_names_path() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let err = resolver.resolve("FriendShoeSize").unwrap_err();
        assert_eq!(err.code(), "PQ_PROPERTY_UNRESOLVABLE");
        assert!(err.to_string().contains("FriendShoeSize"));

        // scalar cannot be traversed
        assert!(resolver.resolve("AgeZipCode").is_err());
    }

    #[test]
    fn test_resolve_dotted() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        let path = resolver.resolve_dotted("friend.address.zipCode").unwrap();
        assert_eq!(names(&path), ["friend", "address", "zipCode"]);

        let path = resolver.resolve_dotted("FirstName").unwrap();
        assert_eq!(names(&path), ["firstName"]);

        assert!(resolver.resolve_dotted("age.years").is_err());
    }

    #[test]
    fn test_id_path() {
        let resolver = PathResolver::new(&registry(), "Person").unwrap();
        assert!(resolver.resolve("Id").unwrap().is_id());
    }
}
