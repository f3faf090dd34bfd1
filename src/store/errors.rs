//! Store client errors
//!
//! Error codes:
//! - PQ_STORE_INDEX_EXISTS
//! - PQ_STORE_INDEX_NOT_FOUND
//! - PQ_STORE_UNKNOWN_NAMESPACE
//! - PQ_STORE_IO
//! - PQ_STORE_MAPPING
//!
//! `IndexAlreadyExists` and `IndexNotFound` are conditions, swallowed by the
//! index administration glue. The rest are surfaced uninterpreted.

use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store client errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Index already exists: {0}")]
    IndexAlreadyExists(String),

    #[error("Index not found: {0}")]
    IndexNotFound(String),

    #[error("Unknown namespace: {0}")]
    UnknownNamespace(String),

    #[error("Store I/O failed: {0}")]
    Io(String),

    #[error("Record mapping failed: {0}")]
    Mapping(String),
}

impl StoreError {
    pub fn io(reason: impl Into<String>) -> Self {
        StoreError::Io(reason.into())
    }

    pub fn code(&self) -> &'static str {
        match self {
            StoreError::IndexAlreadyExists(_) => "PQ_STORE_INDEX_EXISTS",
            StoreError::IndexNotFound(_) => "PQ_STORE_INDEX_NOT_FOUND",
            StoreError::UnknownNamespace(_) => "PQ_STORE_UNKNOWN_NAMESPACE",
            StoreError::Io(_) => "PQ_STORE_IO",
            StoreError::Mapping(_) => "PQ_STORE_MAPPING",
        }
    }

    /// Conditions that index administration swallows
    pub fn is_index_condition(&self) -> bool {
        matches!(
            self,
            StoreError::IndexAlreadyExists(_) | StoreError::IndexNotFound(_)
        )
    }
}

impl<T> From<std::sync::PoisonError<T>> for StoreError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        StoreError::io("store lock poisoned")
    }
}
