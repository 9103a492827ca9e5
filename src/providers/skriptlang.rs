//! SkriptLang documentation provider
//!
//! The official documentation has no search endpoint. The whole corpus is
//! downloaded, cached for the staleness window, and ranked locally.

use super::error::ProviderError;
use super::traits::*;
use crate::cache::CorpusCache;
use crate::network::HttpClient;
use crate::results::{
    html_to_text, map_category, normalize_version, unescape_html, ProviderRef, SyntaxElement,
};
use crate::search::{rank_by_match_level, SearchOptions};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SyntaxRow {
    id: String,
    name: String,
    #[serde(default)]
    description: Option<Vec<String>>,
    patterns: Vec<String>,
    #[serde(default)]
    examples: Option<Vec<String>>,
    #[serde(default)]
    since: Option<Vec<String>>,
    #[serde(default)]
    return_type: Option<String>,
    #[serde(default)]
    event_values: Option<Vec<String>>,
    #[serde(default)]
    cancellable: Option<bool>,
    #[serde(default)]
    requirements: Option<Requirements>,
}

#[derive(Debug, Default, Deserialize)]
struct Requirements {
    #[serde(default)]
    plugins: Vec<String>,
    #[serde(default)]
    minecraft: Option<String>,
}

/// SkriptLang provider
pub struct SkriptLang {
    client: HttpClient,
    handle: ProviderRef,
    base_url: String,
    corpus: CorpusCache<Vec<SyntaxElement>>,
}

impl SkriptLang {
    pub const NAME: &'static str = "SkriptLang";
    pub const ICON_URL: &'static str = "https://docs.skriptlang.org/assets/icon.png";
    pub const DEFAULT_BASE_URL: &'static str = "https://docs.skriptlang.org";
    const ADDON: &'static str = "Skript";

    pub fn new(client: HttpClient) -> Self {
        Self {
            client,
            handle: ProviderRef::new(Self::NAME),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            corpus: CorpusCache::default(),
        }
    }

    /// Point the provider at another documentation host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Change how long a downloaded corpus is reused
    pub fn with_staleness(mut self, staleness: Duration) -> Self {
        self.corpus = CorpusCache::new(staleness);
        self
    }

    fn link(id: &str) -> String {
        format!(
            "https://docs.skriptlang.org/docs.html?search=#{}",
            urlencoding::encode(id)
        )
    }

    fn convert_row(&self, category: &str, row: SyntaxRow) -> Result<SyntaxElement, ProviderError> {
        let syntax_type = map_category(category)?;
        let link = Self::link(&row.id);
        let requirements = row.requirements.unwrap_or_default();
        let since = row.since.unwrap_or_default();
        let examples = row
            .examples
            .filter(|lines| !lines.is_empty())
            .map(|lines| vec![unescape_html(&lines.join("\n"))])
            .unwrap_or_default();

        let element = SyntaxElement::new(
            row.id,
            self.handle.clone(),
            row.name,
            syntax_type,
            row.patterns.iter().map(|p| unescape_html(p)).collect(),
            link,
        )?
        .with_description(html_to_text(
            &row.description.unwrap_or_default().join("\n"),
        ))
        .with_addon(
            Some(Self::ADDON.to_string()),
            normalize_version(since.first().map(String::as_str)),
        )
        .with_minecraft_version(normalize_version(requirements.minecraft.as_deref()))
        .with_required_plugins(Some(requirements.plugins).filter(|p| !p.is_empty()))
        .with_return_type(row.return_type)
        .with_event_values(row.event_values)
        .with_cancellable(row.cancellable)
        .with_examples(examples);

        Ok(element)
    }

    /// Download and convert the full corpus. Top-level members that are not
    /// arrays (such as the Skript version) are ignored.
    async fn fetch_corpus(&self) -> Result<Vec<SyntaxElement>, ProviderError> {
        let request = ApiRequest::get(format!("{}/docs.json", self.base_url));
        let body: Map<String, Value> = self.client.get_json(Self::NAME, request).await?;

        let mut elements = Vec::new();
        for (category, rows) in body {
            let Value::Array(rows) = rows else {
                continue;
            };
            for row in rows {
                let row: SyntaxRow =
                    serde_json::from_value(row).map_err(|e| ProviderError::malformed(Self::NAME, e))?;
                elements.push(self.convert_row(&category, row)?);
            }
        }

        debug!("{} corpus refreshed with {} elements", Self::NAME, elements.len());
        Ok(elements)
    }

    async fn corpus(&self) -> Result<Arc<Vec<SyntaxElement>>, ProviderError> {
        self.corpus.get_or_fetch(self.fetch_corpus()).await
    }
}

#[async_trait]
impl Provider for SkriptLang {
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
        Ok(rank_by_match_level(&options.query, &corpus))
    }

    /// Examples are part of the corpus, so only ownership is checked
    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError> {
        ensure_owned(&self.handle, element)
    }
}
