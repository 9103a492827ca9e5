//! Skript Hub documentation provider
//!
//! Uses the Skript Hub REST API, which ranks results server-side and
//! authenticates with a `Token` authorization header.

use super::error::ProviderError;
use super::traits::*;
use crate::network::HttpClient;
use crate::results::{
    map_category, non_empty_trimmed, normalize_version, split_escaped_lines, ProviderRef,
    SyntaxElement,
};
use crate::search::SearchOptions;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SyntaxRow {
    id: RawId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    syntax_pattern: String,
    #[serde(default)]
    addon: Option<String>,
    #[serde(default)]
    compatible_addon_version: Option<String>,
    #[serde(default)]
    compatible_minecraft_version: Option<String>,
    syntax_type: String,
    #[serde(default)]
    required_plugins: Option<Vec<PluginRow>>,
    #[serde(default)]
    return_type: Option<String>,
    #[serde(default)]
    event_values: Option<String>,
    #[serde(default)]
    event_cancellable: Option<bool>,
    link: String,
}

#[derive(Debug, Deserialize)]
struct PluginRow {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ExampleRow {
    example_code: String,
}

/// Skript Hub provider
pub struct SkriptHub {
    client: HttpClient,
    handle: ProviderRef,
    token: String,
    base_url: String,
}

impl SkriptHub {
    pub const NAME: &'static str = "Skript Hub";
    pub const ICON_URL: &'static str = "https://i.imgur.com/YkzJ97l.png";
    pub const DEFAULT_BASE_URL: &'static str = "https://skripthub.net";

    pub fn new(client: HttpClient, token: impl Into<String>) -> Self {
        Self {
            client,
            handle: ProviderRef::new(Self::NAME),
            token: token.into(),
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Point the provider at another API host
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request(&self, path: &str) -> ApiRequest {
        ApiRequest::get(format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Token {}", self.token))
            .secret(self.token.as_str())
    }

    /// Event values come as one comma separated string
    fn event_values(raw: Option<&str>) -> Option<Vec<String>> {
        raw.map(|values| non_empty_trimmed(values.split(", ")))
    }

    fn convert_row(&self, row: SyntaxRow) -> Result<SyntaxElement, ProviderError> {
        let syntax_type = map_category(&row.syntax_type)?;
        let patterns = split_escaped_lines(&row.syntax_pattern);

        let element = SyntaxElement::new(
            row.id.to_string(),
            self.handle.clone(),
            row.title,
            syntax_type,
            patterns,
            row.link,
        )?
        .with_description(row.description.unwrap_or_default())
        .with_addon(
            row.addon,
            normalize_version(row.compatible_addon_version.as_deref()),
        )
        .with_minecraft_version(normalize_version(
            row.compatible_minecraft_version.as_deref(),
        ))
        .with_required_plugins(
            row.required_plugins
                .map(|plugins| plugins.into_iter().map(|p| p.name).collect()),
        )
        .with_return_type(row.return_type)
        .with_event_values(Self::event_values(row.event_values.as_deref()))
        .with_cancellable(row.event_cancellable);

        Ok(element)
    }
}

#[async_trait]
impl Provider for SkriptHub {
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
        let request = self
            .request("/api/v1/syntax/")
            .param("search", options.query.as_str());

        let rows: Vec<SyntaxRow> = self.client.get_json(Self::NAME, request).await?;
        debug!("{} returned {} rows", Self::NAME, rows.len());

        rows.into_iter().map(|row| self.convert_row(row)).collect()
    }

    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError> {
        ensure_owned(&self.handle, element)?;
        if element.examples().is_loaded() {
            return Ok(());
        }

        let request = self
            .request("/api/v1/syntaxexample/")
            .param("syntax", element.id.as_str());
        let body: Value = self.client.get_json(Self::NAME, request).await?;

        if !body.is_array() {
            debug!("{} has no structured examples for {}", Self::NAME, element.id);
            return Ok(());
        }

        let rows: Vec<ExampleRow> =
            serde_json::from_value(body).map_err(|e| ProviderError::malformed(Self::NAME, e))?;
        element.fill_examples(rows.into_iter().map(|row| row.example_code).collect());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::SyntaxType;
    use serde_json::json;

    fn provider() -> SkriptHub {
        SkriptHub::new(HttpClient::new().unwrap(), "secret")
    }

    fn row() -> serde_json::Value {
        json!({
            "id": 42,
            "title": "On Damage",
            "description": "Called when an entity receives damage.",
            "syntax_pattern": "[on] damag(e|ing) [of %entitydata%]\n[on] damage &amp; heal",
            "addon": "Skript",
            "compatible_addon_version": "UNKNOWN 2.2",
            "compatible_minecraft_version": "unknown",
            "syntax_type": "event",
            "required_plugins": [{"name": "Vault"}],
            "return_type": null,
            "event_values": "event-entity, attacker, , victim",
            "event_cancellable": true,
            "link": "https://skripthub.net/docs/?id=42"
        })
    }

    #[test]
    fn test_convert_row() {
        let provider = provider();
        let row: SyntaxRow = serde_json::from_value(row()).unwrap();
        let element = provider.convert_row(row).unwrap();

        assert_eq!(element.id, "42");
        assert_eq!(element.syntax_type, SyntaxType::Event);
        assert_eq!(
            element.patterns,
            vec!["[on] damag(e|ing) [of %entitydata%]", "[on] damage & heal"]
        );
        assert_eq!(element.required_addon_version.as_deref(), Some("2.2"));
        assert_eq!(element.required_minecraft_version, None);
        assert_eq!(element.required_plugins, Some(vec!["Vault".to_string()]));
        assert_eq!(
            element.event_values,
            Some(vec![
                "event-entity".to_string(),
                "attacker".to_string(),
                "victim".to_string()
            ])
        );
        assert_eq!(element.cancellable, Some(true));
        assert!(provider.owns(&element));
        assert!(!element.examples().is_loaded());
    }

    #[test]
    fn test_escaped_break_stays_in_pattern() {
        let provider = provider();
        let mut value = row();
        value["syntax_pattern"] = json!("send %text% &lt;br&gt; to %player%\nsend %text%");
        let row: SyntaxRow = serde_json::from_value(value).unwrap();
        assert_eq!(
            provider.convert_row(row).unwrap().patterns,
            vec!["send %text% <br> to %player%", "send %text%"]
        );
    }

    #[test]
    fn test_type_category_maps_to_classinfo() {
        let provider = provider();
        let mut value = row();
        value["syntax_type"] = json!("type");
        let row: SyntaxRow = serde_json::from_value(value).unwrap();
        assert_eq!(
            provider.convert_row(row).unwrap().syntax_type,
            SyntaxType::Classinfo
        );
    }

    #[test]
    fn test_unmapped_category_fails() {
        let provider = provider();
        let mut value = row();
        value["syntax_type"] = json!("macro");
        let row: SyntaxRow = serde_json::from_value(value).unwrap();
        assert!(matches!(
            provider.convert_row(row),
            Err(ProviderError::UnmappedCategory(_))
        ));
    }

    #[test]
    fn test_request_uses_token_header() {
        let provider = provider().with_base_url("http://localhost:1234/");
        let request = provider.request("/api/v1/syntax/");
        assert_eq!(request.url, "http://localhost:1234/api/v1/syntax/");
        assert!(request
            .headers
            .contains(&("Authorization".to_string(), "Token secret".to_string())));
    }
}
