//! Query error taxonomy
//!
//! Error codes:
//! - PQ_PROPERTY_UNRESOLVABLE
//! - PQ_UNSUPPORTED_OPERATOR
//! - PQ_UNSUPPORTED_OPERATION
//! - PQ_INVALID_ARGUMENTS
//! - PQ_UNKNOWN_TYPE
//! - PQ_STORE_FAILED
//! - PQ_CONFIG_INVALID
//!
//! Resolution and compilation errors are structural and never retried. Store
//! errors are surfaced as reported by the store client.

use thiserror::Error;

use crate::config::ConfigError;
use crate::part::Keyword;
use crate::store::StoreError;

/// Result type for query derivation and execution
pub type QueryResult<T> = Result<T, QueryError>;

/// Errors raised while deriving or executing a query
#[derive(Debug, Error)]
pub enum QueryError {
    /// No grouping of the path tokens matches a field chain
    #[error("No property '{path}' found for type '{type_name}'")]
    UnresolvableProperty { path: String, type_name: String },

    /// Keyword outside the supported vocabulary
    #[error("Unsupported keyword '{keyword}'")]
    UnsupportedOperator { keyword: Keyword },

    /// Query shape not implemented against the store
    #[error("Query method {method} not supported.")]
    UnsupportedOperation { method: String },

    /// Arguments do not fit the keyword or the resolved field
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// Type is unknown to the metadata provider
    #[error("Unknown type '{0}'")]
    UnknownType(String),

    /// Store I/O failure, surfaced uninterpreted
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Invalid configuration
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl QueryError {
    pub fn unresolvable(path: impl Into<String>, type_name: impl Into<String>) -> Self {
        QueryError::UnresolvableProperty {
            path: path.into(),
            type_name: type_name.into(),
        }
    }

    pub fn unsupported_operator(keyword: Keyword) -> Self {
        QueryError::UnsupportedOperator { keyword }
    }

    /// `method` is rendered as `Type.methodName`
    pub fn unsupported_operation(method: impl Into<String>) -> Self {
        QueryError::UnsupportedOperation {
            method: method.into(),
        }
    }

    pub fn invalid_arguments(reason: impl Into<String>) -> Self {
        QueryError::InvalidArguments(reason.into())
    }

    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::UnresolvableProperty { .. } => "PQ_PROPERTY_UNRESOLVABLE",
            QueryError::UnsupportedOperator { .. } => "PQ_UNSUPPORTED_OPERATOR",
            QueryError::UnsupportedOperation { .. } => "PQ_UNSUPPORTED_OPERATION",
            QueryError::InvalidArguments(_) => "PQ_INVALID_ARGUMENTS",
            QueryError::UnknownType(_) => "PQ_UNKNOWN_TYPE",
            QueryError::Store(_) => "PQ_STORE_FAILED",
            QueryError::Config(_) => "PQ_CONFIG_INVALID",
        }
    }

    /// Whether the query was rejected before touching the store
    pub fn is_structural(&self) -> bool {
        !matches!(self, QueryError::Store(_))
    }

    /// No error is retried here; transient-fault handling belongs to the
    /// store client.
    pub fn is_retryable(&self) -> bool {
        false
    }
}
