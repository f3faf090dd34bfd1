//! Shared person fixture for the integration tests

#![allow(dead_code)]

use std::sync::Arc;

use partquery::index::{IndexCatalog, IndexOperations, IndexRefresher};
use partquery::metadata::{EntityMetadata, FieldDescriptor, TypeRegistry};
use partquery::part::{Part, PartTree};
use partquery::store::{
    CollectionType, IndexDescriptor, IndexType, MemoryStore, Record, StoreClient,
};
use partquery::{PartTreeQuery, QueryConfig, QueryResult, Sort, Value};
use serde_json::json;

pub const NAMESPACE: &str = "test";
pub const SET: &str = "person";

// =============================================================================
// Metadata
// =============================================================================

pub fn person_type() -> EntityMetadata {
    EntityMetadata::new("Person")
        .with_set(SET)
        .field(FieldDescriptor::id("id"))
        .field(FieldDescriptor::scalar("firstName"))
        .field(FieldDescriptor::scalar("lastName"))
        .field(FieldDescriptor::scalar("age"))
        .field(FieldDescriptor::scalar("isActive"))
        .field(FieldDescriptor::list("strings"))
        .field(FieldDescriptor::list("ints"))
        .field(FieldDescriptor::map("stringMap"))
        .field(FieldDescriptor::map("intMap"))
        .field(FieldDescriptor::composite("address", "Address"))
        .field(FieldDescriptor::composite("friend", "Person"))
        .field(FieldDescriptor::composite("bestFriend", "Person"))
}

pub fn address_type() -> EntityMetadata {
    EntityMetadata::new("Address")
        .field(FieldDescriptor::scalar("street"))
        .field(FieldDescriptor::scalar("apartment"))
        .field(FieldDescriptor::scalar("zipCode"))
        .field(FieldDescriptor::scalar("city"))
}

pub fn registry() -> TypeRegistry {
    TypeRegistry::new()
        .with(person_type())
        .with(address_type())
}

// =============================================================================
// Records
// =============================================================================

pub fn carter_address() -> Value {
    Value::from(json!({
        "street": "Foo Street 2", "apartment": 2, "zipCode": "C0124", "city": "C0123"
    }))
}

pub fn persons() -> Vec<Record> {
    let docs = vec![
        ("dave", json!({
            "firstName": "Dave", "lastName": "Matthews", "age": 42, "isActive": true,
            "strings": ["str1", "str2"],
            "address": {"street": "Foo Street 1", "apartment": 1, "zipCode": "C0123", "city": "Bar"}
        })),
        ("donny", json!({
            "firstName": "Donny", "lastName": "Macintire", "age": 39, "isActive": false,
            "strings": ["str1", "str2", "str3"],
            "stringMap": {"key1": "val1"}
        })),
        ("oliver", json!({
            "firstName": "Oliver August", "lastName": "Matthews", "age": 14,
            "ints": [425, 550, 990]
        })),
        ("alicia", json!({
            "firstName": "Alicia", "lastName": "Keys", "age": 30,
            "ints": [550, 600, 990]
        })),
        ("carter", json!({
            "firstName": "Carter", "lastName": "Beauford", "age": 49,
            "intMap": {"key1": 0, "key2": 1},
            "address": {"street": "Foo Street 2", "apartment": 2, "zipCode": "C0124", "city": "C0123"}
        })),
        ("boyd", json!({
            "firstName": "Boyd", "lastName": "Tinsley", "age": 45,
            "stringMap": {"key1": "val1", "key2": "val2"},
            "address": {}
        })),
        ("stefan", json!({"firstName": "Stefan", "lastName": "Lessard", "age": 34})),
        ("leroi", json!({"firstName": "Leroi", "lastName": "Moore", "age": 44})),
        ("leroi2", json!({"firstName": "Leroi", "lastName": "Moore", "age": 25})),
        ("matias", json!({"firstName": "Matias", "lastName": "Craft", "age": 24})),
        ("douglas", json!({"firstName": "Douglas", "lastName": "Ford", "age": 25})),
    ];
    docs.into_iter()
        .map(|(key, doc)| Record::from_json(key, &doc).unwrap())
        .collect()
}

// =============================================================================
// Indexes
// =============================================================================

fn index(name: &str, bin: &str, index_type: IndexType) -> IndexDescriptor {
    IndexDescriptor::new(name, NAMESPACE, SET, bin, index_type)
}

pub fn person_indexes() -> Vec<IndexDescriptor> {
    vec![
        index("person_first_name_idx", "firstName", IndexType::String),
        index("person_last_name_idx", "lastName", IndexType::String),
        index("person_age_idx", "age", IndexType::Numeric),
        index("person_ints_idx", "ints", IndexType::Numeric).with_collection(CollectionType::List),
        index("person_strings_idx", "strings", IndexType::String)
            .with_collection(CollectionType::List),
        index("person_string_map_keys_idx", "stringMap", IndexType::String)
            .with_collection(CollectionType::MapKeys),
        index("person_string_map_values_idx", "stringMap", IndexType::String)
            .with_collection(CollectionType::MapValues),
        index("person_int_map_values_idx", "intMap", IndexType::Numeric)
            .with_collection(CollectionType::MapValues),
        index("person_address_values_idx", "address", IndexType::String)
            .with_collection(CollectionType::MapValues),
    ]
}

// =============================================================================
// Fixture
// =============================================================================

pub struct Fixture {
    pub store: Arc<MemoryStore>,
    pub catalog: Arc<IndexCatalog>,
    pub refresher: Arc<IndexRefresher>,
    pub query: PartTreeQuery,
}

impl Fixture {
    pub fn with_config(config: QueryConfig) -> Self {
        let store = Arc::new(MemoryStore::new([NAMESPACE]));
        for record in persons() {
            store.put(NAMESPACE, SET, record).unwrap();
        }
        let catalog = Arc::new(IndexCatalog::new());
        let refresher = Arc::new(IndexRefresher::new(
            store.clone(),
            NAMESPACE,
            catalog.clone(),
        ));
        let query = PartTreeQuery::new(
            Arc::new(registry()),
            store.clone(),
            catalog.clone(),
            config,
        );
        Self {
            store,
            catalog,
            refresher,
            query,
        }
    }

    pub fn index_operations(&self) -> IndexOperations {
        IndexOperations::new(self.store.clone()).with_refresher(self.refresher.clone())
    }

    /// Creates every person index and refreshes the catalog
    pub fn indexed() -> Self {
        let fixture = Self::default();
        let ops = fixture.index_operations();
        for index in person_indexes() {
            ops.create_index(&index).unwrap();
        }
        fixture
    }

    /// Sorted keys of the records the tree matches
    pub fn keys(&self, tree: &PartTree) -> Vec<String> {
        let mut keys = keys(
            &self
                .query
                .find_all(tree, &Sort::unsorted())
                .unwrap()
                .collect::<QueryResult<Vec<_>>>()
                .unwrap(),
        );
        keys.sort();
        keys
    }
}

impl Default for Fixture {
    fn default() -> Self {
        Self::with_config(QueryConfig::new(NAMESPACE))
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// `findBy<source>` over Person
pub fn find_by(source: &str, args: Vec<Value>) -> PartTree {
    PartTree::find("Person", format!("findBy{}", source))
        .part(Part::parse(source, args).unwrap())
        .build()
}

pub fn keys(records: &[Record]) -> Vec<String> {
    records
        .iter()
        .filter_map(|r| r.key().as_str().map(str::to_string))
        .collect()
}

pub fn sorted(keys: &[&str]) -> Vec<String> {
    let mut keys: Vec<String> = keys.iter().map(|k| k.to_string()).collect();
    keys.sort();
    keys
}
