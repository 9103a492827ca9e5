//! Client-side ranking for providers without a query endpoint

use crate::results::{split_alternate_name, SyntaxElement};

/// How well an element matches a query, lower is better
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MatchLevel {
    /// Case-insensitive name equality
    ExactName = 0,
    /// Query found in both name and description
    NameAndDescription = 1,
    NameOnly = 2,
    DescriptionOnly = 3,
}

/// Classify a candidate; `None` means it does not match at all.
///
/// `query` must already be lowercased.
pub fn match_level(query: &str, name: &str, description: &str) -> Option<MatchLevel> {
    let name = name.to_lowercase();
    if name == query {
        return Some(MatchLevel::ExactName);
    }

    let in_name = name.contains(query);
    let in_description = description.to_lowercase().contains(query);

    match (in_name, in_description) {
        (true, true) => Some(MatchLevel::NameAndDescription),
        (true, false) => Some(MatchLevel::NameOnly),
        (false, true) => Some(MatchLevel::DescriptionOnly),
        (false, false) => None,
    }
}

/// Rank elements by match level. Ties keep corpus order.
pub fn rank_by_match_level(query: &str, elements: &[SyntaxElement]) -> Vec<SyntaxElement> {
    let query = query.trim().to_lowercase();

    let mut matches: Vec<(MatchLevel, &SyntaxElement)> = elements
        .iter()
        .filter_map(|element| {
            match_level(&query, &element.name, &element.description).map(|level| (level, element))
        })
        .collect();

    matches.sort_by_key(|(level, _)| *level);
    matches.into_iter().map(|(_, element)| element.clone()).collect()
}

/// Edit distance between a query and an element name.
///
/// A trailing parenthetical alternate name, as in `Give (Donner)`, is
/// compared separately and the smaller distance is returned. `query` must
/// already be lowercased.
pub fn name_distance(query: &str, name: &str) -> usize {
    let (primary, alternate) = split_alternate_name(name);
    let primary_distance = strsim::levenshtein(query, &primary.to_lowercase());

    match alternate {
        Some(alternate) => {
            primary_distance.min(strsim::levenshtein(query, &alternate.to_lowercase()))
        }
        None => primary_distance,
    }
}

/// The element whose name is closest to the query, first one on ties.
///
/// An empty query yields `None` without comparing anything.
pub fn nearest_element<'a>(
    query: &str,
    elements: &'a [SyntaxElement],
) -> Option<(&'a SyntaxElement, usize)> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let mut best: Option<(&SyntaxElement, usize)> = None;
    for element in elements {
        let distance = name_distance(&query, &element.name);
        if best.map_or(true, |(_, best_distance)| distance < best_distance) {
            best = Some((element, distance));
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ProviderRef, SyntaxType};

    fn element(provider: &ProviderRef, name: &str, description: &str) -> SyntaxElement {
        SyntaxElement::new(
            name,
            provider.clone(),
            name,
            SyntaxType::Effect,
            vec![name.to_lowercase()],
            "https://example.com",
        )
        .unwrap()
        .with_description(description)
    }

    #[test]
    fn test_match_levels() {
        assert_eq!(match_level("wait", "Wait", "pauses"), Some(MatchLevel::ExactName));
        assert_eq!(
            match_level("wait", "Wait Until", "wait for it"),
            Some(MatchLevel::NameAndDescription)
        );
        assert_eq!(match_level("wait", "Wait Until", "pauses"), Some(MatchLevel::NameOnly));
        assert_eq!(
            match_level("wait", "Broadcast", "Wait message"),
            Some(MatchLevel::DescriptionOnly)
        );
        assert_eq!(match_level("wait", "Kill", "kills"), None);
    }

    #[test]
    fn test_exact_name_ranks_before_description_match() {
        let provider = ProviderRef::new("p");
        let corpus = vec![
            element(&provider, "broadcast", "wait message to all"),
            element(&provider, "kill", "kills an entity"),
            element(&provider, "wait", "pauses execution"),
        ];

        let ranked = rank_by_match_level("Wait", &corpus);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["wait", "broadcast"]);
    }

    #[test]
    fn test_ranking_is_stable() {
        let provider = ProviderRef::new("p");
        let corpus = vec![
            element(&provider, "Set Block", "sets"),
            element(&provider, "Block Data", "data"),
            element(&provider, "block", "exact"),
        ];

        let ranked = rank_by_match_level("block", &corpus);
        let names: Vec<_> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["block", "Set Block", "Block Data"]);
    }

    #[test]
    fn test_alternate_name_distance() {
        assert_eq!(name_distance("donner", "Give (Donner)"), 0);
        assert_eq!(name_distance("give", "Give (Donner)"), 0);
        assert_eq!(name_distance("gives", "Give"), 1);
    }

    #[test]
    fn test_nearest_element() {
        let provider = ProviderRef::new("p");
        let corpus = vec![
            element(&provider, "Kill (Tuer)", ""),
            element(&provider, "Give (Donner)", ""),
            element(&provider, "Gave", ""),
        ];

        let (best, distance) = nearest_element("donner", &corpus).unwrap();
        assert_eq!(best.name, "Give (Donner)");
        assert_eq!(distance, 0);

        // "give" is 0 away from Give and 1 away from Gave
        assert_eq!(nearest_element("give", &corpus).unwrap().0.name, "Give (Donner)");
        assert!(nearest_element("  ", &corpus).is_none());
        assert!(nearest_element("give", &[]).is_none());
    }
}
