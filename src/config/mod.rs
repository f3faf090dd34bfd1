//! Query engine configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! {
//!   "namespace": "test",
//!   "scans_enabled": true,
//!   "index_refresh_interval_secs": 0,
//!   "default_page_size": 20
//! }
//! ```
//!
//! Only `namespace` is required.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::executor::{PageRequest, DEFAULT_PAGE_SIZE};
use crate::observability::{log_event_with_fields, Event};

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Query engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Store namespace queried (required)
    pub namespace: String,

    /// Whether plans without a driving index may scan the whole set
    #[serde(default = "default_scans_enabled")]
    pub scans_enabled: bool,

    /// Seconds between index catalog refreshes, 0 disables the refresher
    #[serde(default)]
    pub index_refresh_interval_secs: u64,

    /// Page size used when a page request does not name one
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
}

fn default_scans_enabled() -> bool {
    true
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl QueryConfig {
    /// Configuration for `namespace` with defaults elsewhere
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            scans_enabled: default_scans_enabled(),
            index_refresh_interval_secs: 0,
            default_page_size: default_page_size(),
        }
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        let config = Self::from_json(&content)?;
        log_event_with_fields(
            Event::ConfigLoaded,
            &[
                ("namespace", &config.namespace),
                ("path", &path.display().to_string()),
            ],
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> Result<Self, ConfigError> {
        let config: QueryConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("namespace must not be empty".into()));
        }
        if self.default_page_size == 0 {
            return Err(ConfigError::Invalid("default_page_size must be > 0".into()));
        }
        Ok(())
    }

    pub fn with_scans_enabled(mut self, enabled: bool) -> Self {
        self.scans_enabled = enabled;
        self
    }

    pub fn with_index_refresh_interval_secs(mut self, secs: u64) -> Self {
        self.index_refresh_interval_secs = secs;
        self
    }

    /// Period of the background catalog refresh, `None` when disabled
    pub fn index_refresh_interval(&self) -> Option<Duration> {
        match self.index_refresh_interval_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }

    /// Page `page` at the configured default size
    pub fn page(&self, page: usize) -> PageRequest {
        PageRequest::of(page, self.default_page_size)
    }
}
