//! Result container for aggregating and deduplicating syntax elements

use super::types::*;
use std::collections::HashSet;

/// Accumulator for one combined search.
///
/// Elements are kept in insertion order. The first element to claim a
/// detailed name wins and later duplicates are dropped.
#[derive(Debug, Clone)]
pub struct ResultContainer {
    /// Accepted elements, in merge order
    elements: Vec<SyntaxElement>,
    /// Detailed names already claimed
    claimed: HashSet<String>,
    /// Providers that failed
    unresponsive_providers: Vec<UnresponsiveProvider>,
    /// Provider timings
    timings: Vec<Timing>,
    /// Maximum number of elements to accumulate
    max_results: usize,
}

impl ResultContainer {
    /// Create a new empty container
    pub fn new(max_results: usize) -> Self {
        Self {
            elements: Vec::new(),
            claimed: HashSet::new(),
            unresponsive_providers: Vec::new(),
            timings: Vec::new(),
            max_results,
        }
    }

    /// Add an element unless its detailed name is already claimed
    pub fn add_result(&mut self, element: SyntaxElement) -> bool {
        if self.claimed.insert(element.detailed_name()) {
            self.elements.push(element);
            true
        } else {
            false
        }
    }

    /// Add elements in order, returning how many were accepted
    pub fn extend_results(&mut self, elements: impl IntoIterator<Item = SyntaxElement>) -> usize {
        elements
            .into_iter()
            .map(|element| self.add_result(element))
            .filter(|accepted| *accepted)
            .count()
    }

    /// Whether the accumulation limit has been reached
    pub fn is_full(&self) -> bool {
        self.elements.len() >= self.max_results
    }

    /// Record a failed provider
    pub fn add_unresponsive(&mut self, provider: UnresponsiveProvider) {
        self.unresponsive_providers.push(provider);
    }

    /// Record provider timing
    pub fn add_timing(&mut self, timing: Timing) {
        self.timings.push(timing);
    }

    /// Get failed providers
    pub fn get_unresponsive(&self) -> &[UnresponsiveProvider] {
        &self.unresponsive_providers
    }

    /// Get timings
    pub fn get_timings(&self) -> &[Timing] {
        &self.timings
    }

    /// Number of accumulated elements, before truncation
    pub fn result_count(&self) -> usize {
        self.elements.len()
    }

    /// Final elements, truncated to one less than the maximum so the caller
    /// can append a "show more" entry.
    pub fn into_results(self) -> Vec<SyntaxElement> {
        let mut elements = self.elements;
        elements.truncate(self.max_results.saturating_sub(1));
        elements
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn element(provider: &ProviderRef, id: &str, name: &str) -> SyntaxElement {
        SyntaxElement::new(
            id,
            provider.clone(),
            name,
            SyntaxType::Effect,
            vec![name.to_lowercase()],
            format!("https://example.com/{}", id),
        )
        .unwrap()
    }

    #[test]
    fn test_first_claim_wins() {
        let first = ProviderRef::new("first");
        let second = ProviderRef::new("second");
        let mut container = ResultContainer::new(25);

        assert!(container.add_result(element(&first, "1", "Broadcast")));
        assert!(!container.add_result(element(&second, "9", "broadcast")));
        assert!(container.add_result(element(&second, "10", "Kill")));

        let results = container.into_results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].provider, first);
        assert_eq!(results[1].id, "10");
    }

    #[test]
    fn test_truncates_to_one_less_than_max() {
        let provider = ProviderRef::new("p");
        let mut container = ResultContainer::new(3);
        let added = container.extend_results(
            (0..5).map(|i| element(&provider, &i.to_string(), &format!("Effect {}", i))),
        );

        assert_eq!(added, 5);
        assert!(container.is_full());
        assert_eq!(container.result_count(), 5);
        assert_eq!(container.into_results().len(), 2);
    }

    #[test]
    fn test_zero_max_results() {
        let container = ResultContainer::new(0);
        assert!(container.is_full());
        assert!(container.into_results().is_empty());
    }
}
