//! Field and entity descriptors

use serde::{Deserialize, Serialize};

/// Declared value kind of a field
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// String, number, boolean or temporal value
    Scalar,
    /// List of scalars
    List,
    /// Map with scalar keys
    Map,
    /// Nested structured value of the named type, stored as a map
    Composite(String),
    /// Record key
    Id,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Scalar => "scalar",
            FieldKind::List => "list",
            FieldKind::Map => "map",
            FieldKind::Composite(_) => "composite",
            FieldKind::Id => "id",
        }
    }

    /// Nested type name for composite fields
    pub fn nested_type(&self) -> Option<&str> {
        match self {
            FieldKind::Composite(type_name) => Some(type_name),
            _ => None,
        }
    }

    /// Whether values of this kind are stored as maps
    pub fn is_map_like(&self) -> bool {
        matches!(self, FieldKind::Map | FieldKind::Composite(_))
    }
}

/// A declared field of an entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    /// Property name as declared (`zipCode`)
    pub name: String,
    /// Store bin name; defaults to the property name
    #[serde(default)]
    pub bin: Option<String>,
    pub kind: FieldKind,
    /// Record time-to-live field. Carried for the record mapper, which
    /// writes it as the record TTL; query derivation resolves it like any
    /// other field of its kind.
    #[serde(default)]
    pub expiration: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            bin: None,
            kind,
            expiration: false,
        }
    }

    pub fn id(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Id)
    }

    pub fn scalar(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Scalar)
    }

    pub fn list(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::List)
    }

    pub fn map(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Map)
    }

    pub fn composite(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Composite(type_name.into()))
    }

    /// Overrides the store bin name
    pub fn with_bin(mut self, bin: impl Into<String>) -> Self {
        self.bin = Some(bin.into());
        self
    }

    pub fn as_expiration(mut self) -> Self {
        self.expiration = true;
        self
    }

    pub fn store_bin(&self) -> &str {
        self.bin.as_deref().unwrap_or(&self.name)
    }

    pub fn is_id(&self) -> bool {
        self.kind == FieldKind::Id
    }

    pub fn is_expiration(&self) -> bool {
        self.expiration
    }

    pub fn nested_type(&self) -> Option<&str> {
        self.kind.nested_type()
    }
}

/// Field layout of one entity type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMetadata {
    #[serde(rename = "name")]
    pub type_name: String,
    /// Store set; defaults to the type name
    #[serde(default)]
    pub set: Option<String>,
    pub fields: Vec<FieldDescriptor>,
}

impl EntityMetadata {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            set: None,
            fields: Vec::new(),
        }
    }

    pub fn with_set(mut self, set: impl Into<String>) -> Self {
        self.set = Some(set.into());
        self
    }

    /// Appends a field; declaration order is preserved
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    pub fn set_name(&self) -> &str {
        self.set.as_deref().unwrap_or(&self.type_name)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn id_field(&self) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.is_id())
    }

    pub fn field_named(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}
