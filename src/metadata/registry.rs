//! Metadata provider contract and the in-memory type registry

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::types::{EntityMetadata, FieldDescriptor};
use crate::error::{QueryError, QueryResult};

/// Read-only access to entity field layouts
pub trait MetadataProvider: Send + Sync {
    /// Looks up an entity type
    fn entity(&self, type_name: &str) -> Option<&EntityMetadata>;

    /// Declared fields of `type_name`, in declaration order
    fn fields_of(&self, type_name: &str) -> QueryResult<&[FieldDescriptor]> {
        self.require(type_name).map(|e| e.fields())
    }

    fn id_field_of(&self, type_name: &str) -> QueryResult<Option<&FieldDescriptor>> {
        self.require(type_name).map(|e| e.id_field())
    }

    fn set_name_of(&self, type_name: &str) -> QueryResult<&str> {
        self.require(type_name).map(|e| e.set_name())
    }

    fn require(&self, type_name: &str) -> QueryResult<&EntityMetadata> {
        self.entity(type_name)
            .ok_or_else(|| QueryError::UnknownType(type_name.to_string()))
    }
}

#[derive(Deserialize)]
struct RegistryFile {
    types: Vec<EntityMetadata>,
}

/// In-memory registry of entity types
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: HashMap<String, EntityMetadata>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) an entity type
    pub fn register(&mut self, entity: EntityMetadata) {
        self.types.insert(entity.type_name.clone(), entity);
    }

    /// Builder-style [`TypeRegistry::register`]
    pub fn with(mut self, entity: EntityMetadata) -> Self {
        self.register(entity);
        self
    }

    /// Loads a registry from a JSON file of the form
    /// `{"types": [{"name": "Person", "set": "person", "fields": [...]}]}`
    pub fn load(path: &Path) -> QueryResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            QueryError::invalid_arguments(format!(
                "Failed to read type registry {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> QueryResult<Self> {
        let file: RegistryFile = serde_json::from_str(content).map_err(|e| {
            QueryError::invalid_arguments(format!("Malformed type registry: {}", e))
        })?;
        let mut registry = Self::new();
        for entity in file.types {
            registry.register(entity);
        }
        registry.validate()?;
        Ok(registry)
    }

    /// Checks that every composite field names a registered type and that
    /// no type declares more than one id field
    pub fn validate(&self) -> QueryResult<()> {
        for entity in self.types.values() {
            for field in entity.fields() {
                if let Some(nested) = field.nested_type() {
                    if !self.types.contains_key(nested) {
                        return Err(QueryError::UnknownType(nested.to_string()));
                    }
                }
            }
            if entity.fields().iter().filter(|f| f.is_id()).count() > 1 {
                return Err(QueryError::invalid_arguments(format!(
                    "type '{}' declares more than one id field",
                    entity.type_name
                )));
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl MetadataProvider for TypeRegistry {
    fn entity(&self, type_name: &str) -> Option<&EntityMetadata> {
        self.types.get(type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::FieldKind;
    use crate::resolver::PathResolver;

    fn registry() -> TypeRegistry {
        TypeRegistry::new()
            .with(
                EntityMetadata::new("Person")
                    .with_set("person")
                    .field(FieldDescriptor::id("id"))
                    .field(FieldDescriptor::scalar("firstName"))
                    .field(FieldDescriptor::composite("address", "Address")),
            )
            .with(EntityMetadata::new("Address").field(FieldDescriptor::scalar("zipCode")))
    }

    #[test]
    fn test_provider_lookups() {
        let registry = registry();
        assert_eq!(registry.set_name_of("Person").unwrap(), "person");
        assert_eq!(registry.set_name_of("Address").unwrap(), "Address");
        assert_eq!(registry.fields_of("Person").unwrap().len(), 3);
        assert_eq!(registry.id_field_of("Person").unwrap().unwrap().name, "id");
        assert!(registry.id_field_of("Address").unwrap().is_none());
    }

    #[test]
    fn test_unknown_type() {
        let err = registry().fields_of("Car").unwrap_err();
        assert_eq!(err.code(), "PQ_UNKNOWN_TYPE");
    }

    #[test]
    fn test_from_json() {
        let registry = TypeRegistry::from_json(
            r#"{"types": [
                {"name": "Person", "set": "person", "fields": [
                    {"name": "id", "kind": "id"},
                    {"name": "ints", "kind": "list"},
                    {"name": "friend", "kind": {"composite": "Person"}},
                    {"name": "lastName", "kind": "scalar", "bin": "ln"}
                ]}
            ]}"#,
        )
        .unwrap();

        let fields = registry.fields_of("Person").unwrap();
        assert_eq!(fields[2].kind, FieldKind::Composite("Person".into()));
        assert_eq!(fields[3].store_bin(), "ln");
        assert_eq!(fields[1].store_bin(), "ints");
    }

    #[test]
    fn test_expiration_flag_is_carried_through() {
        let registry = TypeRegistry::from_json(
            r#"{"types": [
                {"name": "Session", "fields": [
                    {"name": "id", "kind": "id"},
                    {"name": "ttl", "kind": "scalar", "bin": "exp", "expiration": true}
                ]}
            ]}"#,
        )
        .unwrap();

        let fields = registry.fields_of("Session").unwrap();
        assert!(!fields[0].is_expiration());
        assert!(fields[1].is_expiration());
        assert_eq!(fields[1], FieldDescriptor::scalar("ttl").with_bin("exp").as_expiration());

        let resolver = PathResolver::new(&registry, "Session").unwrap();
        assert_eq!(resolver.resolve("Ttl").unwrap().bin(), "exp");
    }

    #[test]
    fn test_dangling_composite_is_rejected() {
        let err = TypeRegistry::from_json(
            r#"{"types": [{"name": "Person", "fields": [
                {"name": "car", "kind": {"composite": "Car"}}
            ]}]}"#,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PQ_UNKNOWN_TYPE");
    }
}
