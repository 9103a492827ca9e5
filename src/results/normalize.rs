//! Text normalization shared by the provider adapters

use once_cell::sync::Lazy;
use regex::Regex;

static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)<br\s*/?>|\r?\n").expect("valid line break regex"));

static NUMERIC_ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]+)|([0-9]+));").expect("valid entity regex"));

static HTML_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"</?[a-zA-Z][^>]*>").expect("valid tag regex"));

/// Trailing parenthetical alternate name, e.g. `Give (Donner)`
static ALTERNATE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(.*?)\s*\(([^()]*)\)\s*$").expect("valid alternate name regex"));

const UNKNOWN_VERSION: &str = "unknown";

/// Unescape HTML entities
pub fn unescape_html(s: &str) -> String {
    let decoded = NUMERIC_ENTITY.replace_all(s, |caps: &regex::Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse().ok(),
            _ => None,
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    // `&amp;` last so that `&amp;lt;` stays `&lt;`
    decoded
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}

/// Split a multi-line field on newlines and `<br>` markers
pub fn split_lines(s: &str) -> Vec<String> {
    LINE_BREAK.split(s).map(|line| line.to_string()).collect()
}

/// Split on line breaks, then unescape each line. Escaped markup such as
/// `&lt;br&gt;` stays literal text.
pub fn split_escaped_lines(s: &str) -> Vec<String> {
    LINE_BREAK.split(s).map(unescape_html).collect()
}

/// Convert an HTML fragment to plain text with newlines
pub fn html_to_text(s: &str) -> String {
    let lines = split_lines(s)
        .into_iter()
        .map(|line| unescape_html(&HTML_TAG.replace_all(&line, "")))
        .collect::<Vec<_>>();
    lines.join("\n").trim().to_string()
}

/// Normalize "unknown" version sentinels.
///
/// `"unknown"` in any case becomes `None`, a value prefixed with it loses the
/// prefix, anything else is returned as is.
pub fn normalize_version(version: Option<&str>) -> Option<String> {
    let version = version?;
    let trimmed = version.trim();
    let lowered = trimmed.to_lowercase();

    if lowered == UNKNOWN_VERSION {
        None
    } else if lowered.starts_with(UNKNOWN_VERSION) {
        let rest = trimmed
            .get(UNKNOWN_VERSION.len()..)
            .unwrap_or_default()
            .trim();
        if rest.is_empty() {
            None
        } else {
            Some(rest.to_string())
        }
    } else {
        Some(version.to_string())
    }
}

/// Split a name into its primary part and an optional trailing alternate
pub fn split_alternate_name(name: &str) -> (&str, Option<&str>) {
    match ALTERNATE_NAME.captures(name) {
        Some(caps) => {
            let primary = caps.get(1).map(|m| m.as_str()).unwrap_or(name);
            let alternate = caps.get(2).map(|m| m.as_str().trim());
            (primary, alternate.filter(|alt| !alt.is_empty()))
        }
        None => (name, None),
    }
}

/// Drop blank entries and surrounding whitespace
pub fn non_empty_trimmed<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}
