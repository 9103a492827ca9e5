//! Settings structures for skdocs configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Main settings structure, loaded from `settings.yml`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub search: SearchSettings,
    pub outgoing: OutgoingSettings,
    pub providers: Vec<ProviderConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            search: SearchSettings::default(),
            outgoing: OutgoingSettings::default(),
            providers: default_providers(),
        }
    }
}

impl Settings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse settings from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let settings: Settings = serde_yaml::from_str(content)?;
        Ok(settings)
    }

    /// Merge with environment variables (SKDOCS_* prefix)
    pub fn merge_env(&mut self) {
        self.merge_vars(|key| std::env::var(key).ok());
    }

    fn merge_vars(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(val) = var("SKDOCS_TIMEOUT") {
            if let Ok(timeout) = val.parse() {
                self.search.timeout = timeout;
            }
        }
        if let Some(val) = var("SKDOCS_MAX_RESULTS") {
            if let Ok(max_results) = val.parse() {
                self.search.max_results = max_results;
            }
        }

        for (key, engine) in [
            ("SKDOCS_SKRIPTHUB_TOKEN", "skripthub"),
            ("SKDOCS_SKUNITY_KEY", "skunity"),
            ("SKDOCS_SKRIPTMC_KEY", "skriptmc"),
        ] {
            if let Some(val) = var(key) {
                for config in self.providers.iter_mut().filter(|c| c.engine == engine) {
                    config.api_key = Some(val.clone());
                }
            }
        }
    }

    /// Get provider config by name
    pub fn get_provider(&self, name: &str) -> Option<&ProviderConfig> {
        self.providers.iter().find(|p| p.name == name)
    }

    /// Get all enabled providers, in priority order
    pub fn enabled_providers(&self) -> Vec<&ProviderConfig> {
        self.providers.iter().filter(|p| !p.disabled).collect()
    }
}

/// Combined search settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Maximum number of accumulated results
    pub max_results: usize,
    /// Timeout shared by all providers of a search, in seconds
    pub timeout: f64,
    /// Query providers one after another instead of concurrently
    pub sequential: bool,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            max_results: crate::search::DEFAULT_MAX_RESULTS,
            timeout: crate::search::DEFAULT_TIMEOUT.as_secs_f64(),
            sequential: false,
        }
    }
}

impl SearchSettings {
    /// Shared search timeout, falling back to the default when the
    /// configured value is negative, not a number or too large
    pub fn timeout_duration(&self) -> Duration {
        seconds_or(self.timeout, crate::search::DEFAULT_TIMEOUT, "search.timeout")
    }
}

/// Outgoing request settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutgoingSettings {
    /// Per-request timeout in seconds
    pub request_timeout: f64,
    /// User agent string (none = skdocs default)
    pub user_agent: Option<String>,
    /// Pool max size
    pub pool_maxsize: usize,
}

impl Default for OutgoingSettings {
    fn default() -> Self {
        Self {
            request_timeout: 5.0,
            user_agent: None,
            pool_maxsize: 20,
        }
    }
}

impl OutgoingSettings {
    /// Per-request timeout, falling back to the default when the configured
    /// value is negative, not a number or too large
    pub fn request_timeout_duration(&self) -> Duration {
        seconds_or(
            self.request_timeout,
            Duration::from_secs(5),
            "outgoing.request_timeout",
        )
    }
}

fn seconds_or(seconds: f64, default: Duration, key: &str) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| {
        warn!("Invalid {} {}, using {:?}", key, seconds, default);
        default
    })
}

/// Individual provider configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name (unique identifier)
    pub name: String,
    /// Provider implementation to use
    pub engine: String,
    /// Whether provider is disabled
    pub disabled: bool,
    /// API key or token if required
    pub api_key: Option<String>,
    /// Overrides the backend host
    pub base_url: Option<String>,
    /// Corpus staleness window in seconds, for providers that cache
    pub cache_ttl: Option<u64>,
}

impl ProviderConfig {
    fn named(engine: &str) -> Self {
        Self {
            name: engine.to_string(),
            engine: engine.to_string(),
            ..Default::default()
        }
    }
}

/// Default provider order
fn default_providers() -> Vec<ProviderConfig> {
    ["skripthub", "skunity", "skriptlang", "skriptmc"]
        .into_iter()
        .map(ProviderConfig::named)
        .collect()
}
