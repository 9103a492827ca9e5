//! Provider loader for building the combined provider from configuration

use super::traits::Provider;
use super::{skripthub, skriptlang, skriptmc, skunity};
use crate::config::{ProviderConfig, Settings};
use crate::network::HttpClient;
use crate::search::CombinedProvider;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Loader for initializing providers from configuration
pub struct ProviderLoader;

impl ProviderLoader {
    /// Build a combined provider from settings, keeping the configured
    /// priority order. Providers that cannot be created are skipped.
    pub fn load(settings: &Settings, client: HttpClient) -> Result<CombinedProvider> {
        let mut providers: Vec<Arc<dyn Provider>> = Vec::new();

        for config in &settings.providers {
            if config.disabled {
                info!("Skipping disabled provider: {}", config.name);
                continue;
            }

            match Self::create_provider(config, client.clone()) {
                Ok(provider) => {
                    info!("Loaded provider: {} ({})", config.name, config.engine);
                    providers.push(provider);
                }
                Err(e) => {
                    warn!("Failed to load provider {}: {}", config.name, e);
                }
            }
        }

        info!("Loaded {} providers", providers.len());

        Ok(CombinedProvider::new(providers)
            .with_max_results(settings.search.max_results)
            .with_timeout(settings.search.timeout_duration())
            .with_sequential(settings.search.sequential))
    }

    /// Create a provider instance from its config
    fn create_provider(config: &ProviderConfig, client: HttpClient) -> Result<Arc<dyn Provider>> {
        let staleness = config.cache_ttl.map(Duration::from_secs);

        let provider: Arc<dyn Provider> = match config.engine.as_str() {
            "skripthub" => {
                let mut provider = skripthub::SkriptHub::new(client, Self::require_key(config)?);
                if let Some(base_url) = &config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Arc::new(provider)
            }
            "skunity" => {
                let mut provider = skunity::SkUnity::new(client, Self::require_key(config)?);
                if let Some(base_url) = &config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                Arc::new(provider)
            }
            "skriptlang" => {
                let mut provider = skriptlang::SkriptLang::new(client);
                if let Some(base_url) = &config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                if let Some(staleness) = staleness {
                    provider = provider.with_staleness(staleness);
                }
                Arc::new(provider)
            }
            "skriptmc" => {
                let mut provider = skriptmc::SkriptMc::new(client, Self::require_key(config)?);
                if let Some(base_url) = &config.base_url {
                    provider = provider.with_base_url(base_url);
                }
                if let Some(staleness) = staleness {
                    provider = provider.with_staleness(staleness);
                }
                Arc::new(provider)
            }
            other => {
                return Err(anyhow::anyhow!("Unknown provider engine: {}", other));
            }
        };

        Ok(provider)
    }

    fn require_key(config: &ProviderConfig) -> Result<&str> {
        config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("Missing api_key for {}", config.engine))
    }

    /// Get list of available provider engines
    pub fn available_providers() -> Vec<&'static str> {
        vec!["skripthub", "skunity", "skriptlang", "skriptmc"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(combined: &CombinedProvider) -> Vec<&str> {
        combined.providers().iter().map(|p| p.name()).collect()
    }

    #[test]
    fn test_default_settings_skip_keyed_providers() {
        let combined = ProviderLoader::load(&Settings::default(), HttpClient::new().unwrap()).unwrap();
        assert_eq!(names(&combined), vec!["SkriptLang"]);
        assert_eq!(combined.max_results(), 25);
    }

    #[test]
    fn test_load_keeps_configured_order() {
        let mut settings = Settings::default();
        for config in settings.providers.iter_mut() {
            config.api_key = Some("key".to_string());
        }
        settings.providers.reverse();

        let combined = ProviderLoader::load(&settings, HttpClient::new().unwrap()).unwrap();
        assert_eq!(
            names(&combined),
            vec!["Skript-MC", "SkriptLang", "skUnity", "Skript Hub"]
        );
    }

    #[test]
    fn test_unknown_and_disabled_skipped() {
        let mut settings = Settings::default();
        settings.providers = vec![
            ProviderConfig {
                name: "mystery".to_string(),
                engine: "mystery".to_string(),
                ..Default::default()
            },
            ProviderConfig {
                name: "lang".to_string(),
                engine: "skriptlang".to_string(),
                disabled: true,
                ..Default::default()
            },
            ProviderConfig {
                name: "hub".to_string(),
                engine: "skripthub".to_string(),
                api_key: Some("token".to_string()),
                ..Default::default()
            },
        ];

        let combined = ProviderLoader::load(&settings, HttpClient::new().unwrap()).unwrap();
        assert_eq!(names(&combined), vec!["Skript Hub"]);
    }

    #[test]
    fn test_oversized_timeout_does_not_fail_load() {
        let mut settings = Settings::default();
        settings.search.timeout = 1e20;
        settings.outgoing.request_timeout = 1e20;

        let client = HttpClient::with_settings(&settings.outgoing).unwrap();
        let combined = ProviderLoader::load(&settings, client).unwrap();
        assert_eq!(names(&combined), vec!["SkriptLang"]);
    }

    #[test]
    fn test_available_providers() {
        assert_eq!(ProviderLoader::available_providers().len(), 4);
    }
}
