//! Skript-MC documentation provider
//!
//! The French community documentation exposes its full syntax list and an
//! addon table, both authenticated with an `api_key` query parameter. There
//! is no search endpoint, so the closest syntax name is picked locally by
//! edit distance.

use super::error::ProviderError;
use super::traits::*;
use crate::cache::CorpusCache;
use crate::network::HttpClient;
use crate::results::{
    html_to_text, map_category, non_empty_trimmed, normalize_version, split_lines, unescape_html,
    ProviderRef, SyntaxElement,
};
use crate::search::{nearest_element, SearchOptions};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SyntaxRow {
    id: RawId,
    name: String,
    #[serde(default)]
    content: Option<String>,
    pattern: String,
    #[serde(default)]
    example: Option<String>,
    category: String,
    #[serde(default)]
    addon: Option<String>,
    #[serde(default)]
    return_type: Option<String>,
    #[serde(default)]
    event_values: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct AddonRow {
    name: String,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    dependency: Option<String>,
}

/// Addon table indexed by lowercased name
struct AddonTable(HashMap<String, AddonRow>);

impl AddonTable {
    fn new(rows: Vec<AddonRow>) -> Self {
        Self(
            rows.into_iter()
                .map(|row| (row.name.trim().to_lowercase(), row))
                .collect(),
        )
    }

    fn lookup(&self, name: &str) -> Option<&AddonRow> {
        self.0.get(&name.trim().to_lowercase())
    }
}

/// Skript-MC provider
pub struct SkriptMc {
    client: HttpClient,
    handle: ProviderRef,
    key: String,
    base_url: String,
    corpus: CorpusCache<Vec<SyntaxElement>>,
}

impl SkriptMc {
    pub const NAME: &'static str = "Skript-MC";
    pub const ICON_URL: &'static str = "https://skript-mc.fr/images/logo.png";
    pub const DEFAULT_BASE_URL: &'static str = "https://skript-mc.fr";

    pub fn new(client: HttpClient, key: impl Into<String>) -> Self {
        Self {
            client,
            handle: ProviderRef::new(Self::NAME),
            key: key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            corpus: CorpusCache::default(),
        }
    }

    /// Point the provider at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change how long a downloaded corpus is reused
    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.corpus = CorpusCache::new(staleness);
        self
    }

    fn request(&self, resource: &str) -> ApiRequest {
        ApiRequest::get(format!("{}/api/documentation/{}", self.base_url, resource))
            .param("api_key", self.key.as_str())
            .secret(self.key.as_str())
    }

    fn link(addon: &str, id: &str) -> String {
        format!(
            "https://skript-mc.fr/documentation/{}/{}",
            urlencoding::encode(&addon.trim().to_lowercase()),
            urlencoding::encode(id)
        )
    }

    fn convert_row(&self, row: SyntaxRow, addons: &AddonTable) -> Result<SyntaxElement, ProviderError> {
        let syntax_type = map_category(&row.category)?;
        let id = row.id.to_string();
        let addon_name = row.addon.unwrap_or_else(|| "Skript".to_string());
        let link = Self::link(&addon_name, &id);

        let (addon, version, plugins) = match addons.lookup(&addon_name) {
            Some(addon) => (
                addon.name.clone(),
                normalize_version(addon.version.as_deref()),
                addon.dependency.clone().map(|plugin| vec![plugin]),
            ),
            None => (addon_name, None, None),
        };

        let patterns = split_lines(&row.pattern)
            .iter()
            .map(|line| unescape_html(line).trim().to_string())
            .collect();
        let examples = row
            .example
            .map(|example| html_to_text(&example))
            .filter(|example| !example.is_empty())
            .into_iter()
            .collect();

        let element = SyntaxElement::new(id, self.handle.clone(), row.name, syntax_type, patterns, link)?
            .with_description(html_to_text(row.content.as_deref().unwrap_or_default()))
            .with_addon(Some(addon), version)
            .with_required_plugins(plugins)
            .with_return_type(row.return_type)
            .with_event_values(
                row.event_values
                    .as_deref()
                    .map(|values| non_empty_trimmed(split_lines(values))),
            )
            .with_examples(examples);

        Ok(element)
    }

    /// Download both tables and resolve each syntax against the addon table
    async fn fetch_corpus(&self) -> Result<Vec<SyntaxElement>, ProviderError> {
        let (rows, addons) = tokio::try_join!(
            self.client
                .get_json::<Vec<SyntaxRow>>(Self::NAME, self.request("syntaxes")),
            self.client
                .get_json::<Vec<AddonRow>>(Self::NAME, self.request("addons")),
        )?;
        let addons = AddonTable::new(addons);

        let elements = rows
            .into_iter()
            .map(|row| self.convert_row(row, &addons))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("{} corpus refreshed with {} elements", Self::NAME, elements.len());
        Ok(elements)
    }

    async fn corpus(&self) -> Result<Arc<Vec<SyntaxElement>>, ProviderError> {
        self.corpus.get_or_fetch(self.fetch_corpus()).await
    }
}

#[async_trait]
impl Provider for SkriptMc {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn icon_url(&self) -> Result<&str, ProviderError> {
        Ok(Self::ICON_URL)
    }

    fn owns(&self, element: &SyntaxElement) -> bool {
        element.provider == self.handle
    }

    async fn perform_search(
        &self,
        options: &SearchOptions,
    ) -> Result<Vec<SyntaxElement>, ProviderError> {
        if options.is_empty() {
            return Ok(Vec::new());
        }

        let corpus = self.corpus().await?;
        Ok(nearest_element(&options.query, &corpus)
            .map(|(element, distance)| {
                debug!("{} nearest match {} at distance {}", Self::NAME, element.name, distance);
                element.clone()
            })
            .into_iter()
            .collect())
    }

    /// Examples are part of the corpus, so only ownership is checked
    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError> {
        ensure_owned(&self.handle, element)
    }
}
