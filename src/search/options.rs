//! Search options

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Options for a single search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// The search query string
    pub query: String,
    /// Custom timeout in seconds
    pub timeout_limit: Option<f64>,
}

impl SearchOptions {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            timeout_limit: None,
        }
    }

    /// Set timeout
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_limit = Some(seconds);
        self
    }

    /// Timeout for this search, falling back to `default`
    pub fn effective_timeout(&self, default: Duration) -> Duration {
        self.timeout_limit
            .and_then(|t| Duration::try_from_secs_f64(t).ok())
            .unwrap_or(default)
    }

    /// Check if query is empty
    pub fn is_empty(&self) -> bool {
        self.query.trim().is_empty()
    }
}
