//! Provider traits and types

use super::error::ProviderError;
use crate::results::{ProviderRef, SyntaxElement};
use crate::search::SearchOptions;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;

/// HTTP request to be made by a provider
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// URL to request
    pub url: String,
    /// Request headers
    pub headers: Vec<(String, String)>,
    /// Query parameters, in order
    pub params: Vec<(String, String)>,
    /// Values hidden when the request is logged or reported
    secrets: Vec<String>,
}

impl ApiRequest {
    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            headers: Vec::new(),
            params: Vec::new(),
            secrets: Vec::new(),
        }
    }

    /// Add a header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Add a query parameter
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Mark a value that must not show up in logs or errors
    pub fn secret(mut self, value: impl Into<String>) -> Self {
        let value = value.into();
        if !value.is_empty() {
            self.secrets.push(value);
        }
        self
    }

    /// URL without its query string, with secrets masked
    pub fn redacted_url(&self) -> String {
        let base = self.url.split('?').next().unwrap_or_default();
        self.secrets
            .iter()
            .fold(base.to_string(), |url, secret| url.replace(secret.as_str(), "***"))
    }
}

/// Backend identifier that may be sent as a number or a string
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RawId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(id) => write!(f, "{}", id),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// A source of syntax documentation
#[async_trait]
pub trait Provider: Send + Sync {
    /// Provider name, used for attribution and logging
    fn name(&self) -> &str;

    /// Icon shown next to this provider's elements
    fn icon_url(&self) -> Result<&str, ProviderError>;

    /// Whether `element` was produced by this provider
    fn owns(&self, element: &SyntaxElement) -> bool;

    /// Search the backend, best match first
    async fn perform_search(
        &self,
        options: &SearchOptions,
    ) -> Result<Vec<SyntaxElement>, ProviderError>;

    /// Load the details of one element that are not part of search results.
    ///
    /// Fails with [`ProviderError::NotOwned`] when the element belongs to
    /// another provider. Does nothing when the examples are already loaded.
    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError>;
}

/// Reject elements produced by a different provider instance
pub(crate) fn ensure_owned(
    owner: &ProviderRef,
    element: &SyntaxElement,
) -> Result<(), ProviderError> {
    if element.provider.id() == owner.id() {
        Ok(())
    } else {
        Err(ProviderError::NotOwned {
            element: element.name.clone(),
            owner: element.provider.name().to_string(),
            expected: owner.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_url_masks_path_secret() {
        let request = ApiRequest::get("http://localhost/v1/k%2Fey/docs/search/give").secret("k%2Fey");
        assert_eq!(request.redacted_url(), "http://localhost/v1/***/docs/search/give");
    }

    #[test]
    fn test_redacted_url_drops_query() {
        let request = ApiRequest::get("http://localhost/api/documentation/addons?api_key=abc")
            .param("api_key", "abc")
            .secret("abc");
        assert_eq!(request.redacted_url(), "http://localhost/api/documentation/addons");
    }
}
