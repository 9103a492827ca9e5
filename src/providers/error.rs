//! Provider error taxonomy

use thiserror::Error;

/// Errors raised by documentation providers
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    /// Connection-level failure
    #[error("request to {provider} failed: {message}")]
    Transport { provider: String, message: String },

    #[error("request to {provider} timed out")]
    Timeout { provider: String },

    /// Non-success HTTP status
    #[error("{provider} returned HTTP {status} for {url}")]
    Status {
        provider: String,
        url: String,
        status: u16,
    },

    /// Unexpected or unparsable payload
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Backend category without a syntax type
    #[error("unmapped syntax category '{0}'")]
    UnmappedCategory(String),

    /// Enrichment called with an element from another provider
    #[error("element '{element}' was provided by {owner}, but must be provided by {expected}")]
    NotOwned {
        element: String,
        owner: String,
        expected: String,
    },

    /// Property that the provider does not have
    #[error("{property} is not applicable to {provider}")]
    NotApplicable {
        property: &'static str,
        provider: String,
    },
}

impl ProviderError {
    pub fn malformed(provider: &str, error: impl std::fmt::Display) -> Self {
        Self::Malformed(format!("{}: {}", provider, error))
    }
}
