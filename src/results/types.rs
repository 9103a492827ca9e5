//! Syntax element type definitions

use crate::providers::ProviderError;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

/// Identity token of the provider instance that produced an element.
///
/// The token does not own the provider. Two providers built from the same
/// configuration still get distinct tokens.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderRef {
    id: Uuid,
    name: Arc<str>,
}

impl ProviderRef {
    /// Create a fresh token for a provider instance
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }

    /// Display name of the provider
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Instance identifier
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Serialize for ProviderRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.name)
    }
}

/// Kind of syntax construct
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyntaxType {
    Condition,
    Effect,
    Expression,
    Event,
    Classinfo,
    Structure,
    Section,
    Function,
}

impl SyntaxType {
    pub const ALL: [SyntaxType; 8] = [
        Self::Condition,
        Self::Effect,
        Self::Expression,
        Self::Event,
        Self::Classinfo,
        Self::Structure,
        Self::Section,
        Self::Function,
    ];

    /// Enumeration member name, e.g. `EFFECT`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Condition => "CONDITION",
            Self::Effect => "EFFECT",
            Self::Expression => "EXPRESSION",
            Self::Event => "EVENT",
            Self::Classinfo => "CLASSINFO",
            Self::Structure => "STRUCTURE",
            Self::Section => "SECTION",
            Self::Function => "FUNCTION",
        }
    }

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::Condition => "Condition",
            Self::Effect => "Effect",
            Self::Expression => "Expression",
            Self::Event => "Event",
            Self::Classinfo => "Type",
            Self::Structure => "Structure",
            Self::Section => "Section",
            Self::Function => "Function",
        }
    }
}

impl fmt::Display for SyntaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SyntaxType {
    type Err = ProviderError;

    /// Exact, case-insensitive lookup of a member name
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_uppercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == upper)
            .ok_or_else(|| ProviderError::UnmappedCategory(s.to_string()))
    }
}

/// Lazily loaded usage examples of an element
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "examples")]
pub enum Examples {
    /// Not fetched yet
    #[default]
    NotLoaded,
    /// Fetched; may be empty when the backend has none
    Loaded(Vec<String>),
}

impl Examples {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }

    /// Loaded examples, `None` when not fetched yet
    pub fn as_slice(&self) -> Option<&[String]> {
        match self {
            Self::NotLoaded => None,
            Self::Loaded(examples) => Some(examples),
        }
    }
}

/// A normalized unit of syntax documentation
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxElement {
    /// Backend-local identifier
    pub id: String,
    /// Provider that produced this element
    pub provider: ProviderRef,
    /// Display name
    pub name: String,
    /// Plain-text description
    pub description: String,
    /// Syntax patterns, canonical pattern first
    pub patterns: Vec<String>,
    examples: Examples,
    pub required_addon: Option<String>,
    pub required_addon_version: Option<String>,
    pub required_minecraft_version: Option<String>,
    #[serde(rename = "type")]
    pub syntax_type: SyntaxType,
    pub required_plugins: Option<Vec<String>>,
    pub return_type: Option<String>,
    /// Values available inside an event
    pub event_values: Option<Vec<String>>,
    /// Whether an event can be cancelled
    pub cancellable: Option<bool>,
    /// Documentation page
    pub link: String,
}

impl SyntaxElement {
    /// Create a new element; fails when no pattern is left after dropping
    /// blank lines.
    pub fn new(
        id: impl Into<String>,
        provider: ProviderRef,
        name: impl Into<String>,
        syntax_type: SyntaxType,
        patterns: Vec<String>,
        link: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let id = id.into();
        let patterns: Vec<String> = patterns
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        if patterns.is_empty() {
            return Err(ProviderError::Malformed(format!(
                "{} element {} has no patterns",
                provider.name(),
                id
            )));
        }

        Ok(Self {
            id,
            provider,
            name: name.into(),
            description: String::new(),
            patterns,
            examples: Examples::NotLoaded,
            required_addon: None,
            required_addon_version: None,
            required_minecraft_version: None,
            syntax_type,
            required_plugins: None,
            return_type: None,
            event_values: None,
            cancellable: None,
            link: link.into(),
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_addon(mut self, addon: Option<String>, version: Option<String>) -> Self {
        self.required_addon = addon;
        self.required_addon_version = version;
        self
    }

    pub fn with_minecraft_version(mut self, version: Option<String>) -> Self {
        self.required_minecraft_version = version;
        self
    }

    pub fn with_required_plugins(mut self, plugins: Option<Vec<String>>) -> Self {
        self.required_plugins = plugins;
        self
    }

    pub fn with_return_type(mut self, return_type: Option<String>) -> Self {
        self.return_type = return_type;
        self
    }

    pub fn with_event_values(mut self, values: Option<Vec<String>>) -> Self {
        self.event_values = values;
        self
    }

    pub fn with_cancellable(mut self, cancellable: Option<bool>) -> Self {
        self.cancellable = cancellable;
        self
    }

    /// Examples already known when the row is converted
    pub(crate) fn with_examples(mut self, examples: Vec<String>) -> Self {
        self.examples = Examples::Loaded(examples);
        self
    }

    pub fn examples(&self) -> &Examples {
        &self.examples
    }

    /// Store fetched examples. Only the first call has an effect.
    pub(crate) fn fill_examples(&mut self, examples: Vec<String>) -> bool {
        if self.examples.is_loaded() {
            return false;
        }
        self.examples = Examples::Loaded(examples);
        true
    }

    /// Key used to detect the same construct across providers
    pub fn detailed_name(&self) -> String {
        let name = self
            .name
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
            .to_lowercase();
        let addon = self
            .required_addon
            .as_deref()
            .map(str::trim)
            .filter(|addon| !addon.is_empty())
            .unwrap_or("skript")
            .to_lowercase();

        format!("{} {} ({})", addon, self.syntax_type.as_str().to_lowercase(), name)
    }
}

/// Provider response timing information
#[derive(Debug, Clone, Serialize)]
pub struct Timing {
    /// Provider name
    pub provider: String,
    /// Response time in milliseconds
    pub time_ms: u64,
    /// Number of elements returned
    pub result_count: usize,
}

/// Provider failure categories
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Timeout,
    NetworkError,
    HttpError(u16),
    ParseError,
    UnmappedCategory,
    Unknown,
}

impl From<&ProviderError> for FailureKind {
    fn from(error: &ProviderError) -> Self {
        match error {
            ProviderError::Timeout { .. } => Self::Timeout,
            ProviderError::Transport { .. } => Self::NetworkError,
            ProviderError::Status { status, .. } => Self::HttpError(*status),
            ProviderError::Malformed(_) => Self::ParseError,
            ProviderError::UnmappedCategory(_) => Self::UnmappedCategory,
            ProviderError::NotOwned { .. } | ProviderError::NotApplicable { .. } => Self::Unknown,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "Request timed out"),
            Self::NetworkError => write!(f, "Network error"),
            Self::HttpError(code) => write!(f, "HTTP error: {}", code),
            Self::ParseError => write!(f, "Failed to parse response"),
            Self::UnmappedCategory => write!(f, "Unmapped syntax category"),
            Self::Unknown => write!(f, "Unknown error"),
        }
    }
}

/// A provider that failed during a combined search
#[derive(Debug, Clone, Serialize)]
pub struct UnresponsiveProvider {
    pub name: String,
    pub kind: FailureKind,
    /// Full error message
    pub cause: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(provider: &ProviderRef, name: &str, addon: Option<&str>) -> SyntaxElement {
        SyntaxElement::new(
            "1",
            provider.clone(),
            name,
            SyntaxType::Effect,
            vec!["broadcast %objects%".to_string()],
            "https://example.com/1",
        )
        .unwrap()
        .with_addon(addon.map(String::from), None)
    }

    #[test]
    fn test_empty_patterns_rejected() {
        let provider = ProviderRef::new("test");
        let result = SyntaxElement::new(
            "1",
            provider,
            "Broadcast",
            SyntaxType::Effect,
            vec!["".to_string(), "  ".to_string()],
            "https://example.com/1",
        );
        assert!(matches!(result, Err(ProviderError::Malformed(_))));
    }

    #[test]
    fn test_detailed_name_collides_across_providers() {
        let a = element(&ProviderRef::new("a"), "Broadcast", Some("Skript"));
        let b = element(&ProviderRef::new("b"), "broadcast ", None);
        assert_eq!(a.detailed_name(), b.detailed_name());

        let c = element(&ProviderRef::new("b"), "Broadcast", Some("SkBee"));
        assert_ne!(a.detailed_name(), c.detailed_name());
    }

    #[test]
    fn test_examples_fill_once() {
        let mut e = element(&ProviderRef::new("a"), "Broadcast", None);
        assert_eq!(e.examples().as_slice(), None);

        assert!(e.fill_examples(vec![]));
        assert_eq!(e.examples().as_slice(), Some(&[] as &[String]));

        assert!(!e.fill_examples(vec!["broadcast \"hi\"".to_string()]));
        assert_eq!(e.examples(), &Examples::Loaded(vec![]));
    }

    #[test]
    fn test_syntax_type_from_str() {
        assert_eq!("effect".parse::<SyntaxType>().unwrap(), SyntaxType::Effect);
        assert_eq!(
            " CLASSINFO ".parse::<SyntaxType>().unwrap(),
            SyntaxType::Classinfo
        );
        assert!("loop".parse::<SyntaxType>().is_err());
    }

    #[test]
    fn test_provider_refs_are_distinct() {
        let a = ProviderRef::new("skUnity");
        let b = ProviderRef::new("skUnity");
        assert_ne!(a, b);
        assert_eq!(a.name(), b.name());
    }
}
