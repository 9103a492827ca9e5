//! Mapping of backend category names onto [`SyntaxType`]

use super::types::SyntaxType;
use crate::providers::ProviderError;

/// Category names that the generic rule cannot resolve
const SPECIAL_CASES: &[(&str, SyntaxType)] = &[
    ("type", SyntaxType::Classinfo),
    ("types", SyntaxType::Classinfo),
    ("class", SyntaxType::Classinfo),
    ("classes", SyntaxType::Classinfo),
    // Skript-MC
    ("évènement", SyntaxType::Event),
    ("évènements", SyntaxType::Event),
    ("événement", SyntaxType::Event),
    ("événements", SyntaxType::Event),
    ("evenement", SyntaxType::Event),
    ("evenements", SyntaxType::Event),
    ("effet", SyntaxType::Effect),
    ("effets", SyntaxType::Effect),
    ("fonction", SyntaxType::Function),
    ("fonctions", SyntaxType::Function),
];

/// Map a backend category to a syntax type.
///
/// The special case table is consulted first. Otherwise the name is looked up
/// as is, then with a trailing plural `s` removed.
pub fn map_category(category: &str) -> Result<SyntaxType, ProviderError> {
    let normalized = category.trim().to_lowercase();

    if let Some((_, syntax_type)) = SPECIAL_CASES.iter().find(|(name, _)| *name == normalized) {
        return Ok(*syntax_type);
    }

    if let Ok(syntax_type) = normalized.parse::<SyntaxType>() {
        return Ok(syntax_type);
    }

    normalized
        .strip_suffix('s')
        .and_then(|singular| singular.parse::<SyntaxType>().ok())
        .ok_or_else(|| ProviderError::UnmappedCategory(category.to_string()))
}
