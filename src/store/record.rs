//! Raw store records

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;

use super::errors::{StoreError, StoreResult};
use crate::value::Value;

/// A record: key plus named bins
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    key: Value,
    bins: BTreeMap<String, Value>,
}

impl Record {
    pub fn new(key: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            bins: BTreeMap::new(),
        }
    }

    /// Builds a record from a JSON object; `null` members are not stored
    pub fn from_json(key: impl Into<Value>, doc: &serde_json::Value) -> StoreResult<Self> {
        let members = doc
            .as_object()
            .ok_or_else(|| StoreError::Mapping("record document must be an object".into()))?;
        let mut record = Self::new(key);
        for (name, value) in members {
            if !value.is_null() {
                record.set_bin(name.clone(), Value::from_json(value));
            }
        }
        Ok(record)
    }

    /// Builder-style [`Record::set_bin`]
    pub fn with_bin(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_bin(name, value);
        self
    }

    /// Sets a bin; nil removes it
    pub fn set_bin(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        let name = name.into();
        match value.into() {
            Value::Nil => {
                self.bins.remove(&name);
            }
            value => {
                self.bins.insert(name, value);
            }
        }
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn bin(&self, name: &str) -> Option<&Value> {
        self.bins.get(name)
    }

    pub fn bins(&self) -> &BTreeMap<String, Value> {
        &self.bins
    }

    /// Bins as a JSON object, with the key under `id_field` when given
    pub fn to_json(&self, id_field: Option<&str>) -> serde_json::Value {
        let mut members: serde_json::Map<String, serde_json::Value> = self
            .bins
            .iter()
            .map(|(name, value)| (name.clone(), value.to_json()))
            .collect();
        if let Some(id_field) = id_field {
            members.insert(id_field.to_string(), self.key.to_json());
        }
        serde_json::Value::Object(members)
    }

    /// Maps the record into a typed entity or projection, with the key
    /// under `id`. Fields of `T` missing from the record must be optional
    /// or defaulted.
    pub fn to_entity<T: DeserializeOwned>(&self) -> StoreResult<T> {
        self.to_entity_as("id")
    }

    /// Like [`Record::to_entity`], with the key under `id_field`
    pub fn to_entity_as<T: DeserializeOwned>(&self, id_field: &str) -> StoreResult<T> {
        serde_json::from_value(self.to_json(Some(id_field)))
            .map_err(|e| StoreError::Mapping(e.to_string()))
    }
}
