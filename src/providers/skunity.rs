//! skUnity documentation provider
//!
//! The skUnity API takes the API key as a path segment and ranks search
//! results server-side.

use super::error::ProviderError;
use super::traits::*;
use crate::network::HttpClient;
use crate::results::{
    html_to_text, map_category, normalize_version, split_escaped_lines, split_lines, unescape_html,
    ProviderRef, SyntaxElement,
};
use crate::search::SearchOptions;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    result: T,
}

#[derive(Debug, Deserialize)]
struct SyntaxRow {
    id: RawId,
    name: String,
    #[serde(default)]
    desc: Option<String>,
    pattern: String,
    #[serde(default)]
    addon: Option<String>,
    #[serde(default)]
    version: Option<String>,
    doc: String,
    #[serde(default)]
    plugin: Option<Vec<String>>,
    #[serde(default)]
    returntype: Option<String>,
    #[serde(default)]
    eventvalues: Option<String>,
}

/// skUnity provider
pub struct SkUnity {
    client: HttpClient,
    handle: ProviderRef,
    key: String,
    base_url: String,
}

impl SkUnity {
    pub const NAME: &'static str = "skUnity";
    pub const ICON_URL: &'static str = "https://i.imgur.com/Ci6jjhv.png";
    pub const DEFAULT_BASE_URL: &'static str = "https://api.skunity.com";

    pub fn new(client: HttpClient, key: impl Into<String>) -> Self {
        Self {
            client,
            handle: ProviderRef::new(Self::NAME),
            key: key.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Build `{base}/v1/{key}/docs/{action}/{argument}`
    fn docs_url(&self, action: &str, argument: &str) -> String {
        format!(
            "{}/v1/{}/docs/{}/{}",
            self.base_url,
            urlencoding::encode(&self.key),
            action,
            urlencoding::encode(argument)
        )
    }

    fn request(&self, action: &str, argument: &str) -> ApiRequest {
        ApiRequest::get(self.docs_url(action, argument))
            .secret(urlencoding::encode(&self.key))
            .secret(self.key.as_str())
    }

    fn link(id: &str) -> String {
        format!(
            "https://docs.skunity.com/syntax/search/id:{}",
            urlencoding::encode(id)
        )
    }

    fn convert_row(&self, row: SyntaxRow) -> Result<SyntaxElement, ProviderError> {
        let syntax_type = map_category(&row.doc)?;
        let id = row.id.to_string();
        let link = Self::link(&id);

        let element = SyntaxElement::new(
            id,
            self.handle.clone(),
            row.name,
            syntax_type,
            split_escaped_lines(&row.pattern),
            link,
        )?
        .with_description(html_to_text(row.desc.as_deref().unwrap_or_default()))
        .with_addon(row.addon, normalize_version(row.version.as_deref()))
        .with_required_plugins(row.plugin)
        .with_return_type(row.returntype)
        .with_event_values(row.eventvalues.as_deref().map(split_lines));

        Ok(element)
    }

    /// Examples arrive as a mapping of objects with an `example` field. A
    /// list means the backend has no structured examples for the element.
    fn parse_examples(result: Value) -> Result<Option<Vec<String>>, ProviderError> {
        match result {
            Value::Array(_) => Ok(None),
            Value::Object(map) => Ok(Some(
                map.values()
                    .filter_map(|example| example.get("example").and_then(Value::as_str))
                    .filter(|example| !example.is_empty())
                    .map(unescape_html)
                    .collect(),
            )),
            other => Err(ProviderError::malformed(
                Self::NAME,
                format!("unexpected examples payload: {}", other),
            )),
        }
    }
}

#[async_trait]
impl Provider for SkUnity {
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
        let request = self.request("search", &options.query);
        let envelope: Envelope<Vec<SyntaxRow>> = self.client.get_json(Self::NAME, request).await?;
        debug!("{} returned {} rows", Self::NAME, envelope.result.len());

        envelope
            .result
            .into_iter()
            .map(|row| self.convert_row(row))
            .collect()
    }

    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError> {
        ensure_owned(&self.handle, element)?;
        if element.examples().is_loaded() {
            return Ok(());
        }

        let request = self.request("getExamplesByID", &element.id);
        let envelope: Envelope<Value> = self.client.get_json(Self::NAME, request).await?;

        match Self::parse_examples(envelope.result)? {
            Some(examples) => {
                element.fill_examples(examples);
            }
            None => debug!("{} has no structured examples for {}", Self::NAME, element.id),
        }
        Ok(())
    }
}
