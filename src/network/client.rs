//! HTTP client for making requests to documentation backends

use super::user_agent::{accept_json, default_user_agent};
use crate::config::OutgoingSettings;
use crate::providers::{ApiRequest, ProviderError};
use anyhow::Result;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// HTTP client wrapper shared by all providers
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let timeout = settings.request_timeout_duration();
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            default_timeout: timeout,
            user_agent: settings
                .user_agent
                .clone()
                .unwrap_or_else(default_user_agent),
        })
    }

    /// Execute a GET request and decode the JSON body.
    ///
    /// Transport failures, non-2xx statuses and undecodable bodies all map to
    /// a [`ProviderError`] attributed to `provider`.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        provider: &str,
        request: ApiRequest,
    ) -> std::result::Result<T, ProviderError> {
        let mut req_builder = self
            .client
            .get(&request.url)
            .timeout(self.default_timeout)
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json());

        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        debug!("{} GET {}", provider, request.redacted_url());

        let response = req_builder
            .send()
            .await
            .map_err(|e| Self::transport_error(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: provider.to_string(),
                url: request.redacted_url(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| Self::transport_error(provider, e))?;

        serde_json::from_str(&text).map_err(|e| ProviderError::malformed(provider, e))
    }

    fn transport_error(provider: &str, error: reqwest::Error) -> ProviderError {
        if error.is_timeout() {
            ProviderError::Timeout {
                provider: provider.to_string(),
            }
        } else {
            ProviderError::Transport {
                provider: provider.to_string(),
                message: error.without_url().to_string(),
            }
        }
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
