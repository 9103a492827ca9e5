//! Combined search across several providers

use super::options::SearchOptions;
use crate::providers::{Provider, ProviderError};
use crate::results::{
    FailureKind, ResultContainer, SyntaxElement, Timing, UnresponsiveProvider,
};
use async_trait::async_trait;
use futures::stream::{FuturesOrdered, StreamExt};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{timeout, Instant};
use tracing::{debug, info, warn};

/// Default maximum number of accumulated elements
pub const DEFAULT_MAX_RESULTS: usize = 25;

/// Default timeout shared by all members of a search
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of one member's search
struct MemberOutcome {
    name: String,
    elapsed: Duration,
    result: Result<Vec<SyntaxElement>, ProviderError>,
}

/// Provider that searches an ordered list of member providers and merges
/// their results.
///
/// Members earlier in the list take priority: when two members return the
/// same construct, the element that was merged first is kept.
pub struct CombinedProvider {
    providers: Vec<Arc<dyn Provider>>,
    name: String,
    max_results: usize,
    default_timeout: Duration,
    sequential: bool,
}

impl CombinedProvider {
    pub fn new(providers: Vec<Arc<dyn Provider>>) -> Self {
        let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
        let name = format!("CombinedProvider({:?})", names);

        Self {
            providers,
            name,
            max_results: DEFAULT_MAX_RESULTS,
            default_timeout: DEFAULT_TIMEOUT,
            sequential: false,
        }
    }

    /// Set the accumulation limit. One slot less is returned.
    pub fn with_max_results(mut self, max_results: usize) -> Self {
        self.max_results = max_results;
        self
    }

    /// Set default timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Run members one after another against one shared deadline
    pub fn with_sequential(mut self, sequential: bool) -> Self {
        self.sequential = sequential;
        self
    }

    pub fn providers(&self) -> &[Arc<dyn Provider>] {
        &self.providers
    }

    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Execute a search and return the full outcome, including failed
    /// providers and timings.
    pub async fn search(&self, options: &SearchOptions) -> ResultContainer {
        let mut container = ResultContainer::new(self.max_results);
        let limit = options.effective_timeout(self.default_timeout);

        info!(
            "Executing search '{}' on {} providers",
            options.query,
            self.providers.len()
        );

        if self.sequential {
            self.search_sequential(options, limit, &mut container).await;
        } else {
            self.search_concurrent(options, limit, &mut container).await;
        }

        if !container.get_unresponsive().is_empty() {
            debug!(
                "{} of {} providers failed",
                container.get_unresponsive().len(),
                self.providers.len()
            );
        }

        container
    }

    /// All members start at once; outcomes are merged in member order as
    /// they become available.
    async fn search_concurrent(
        &self,
        options: &SearchOptions,
        limit: Duration,
        container: &mut ResultContainer,
    ) {
        let mut pending: FuturesOrdered<_> = self
            .providers
            .iter()
            .map(|provider| Self::search_member(provider, options, limit))
            .collect();

        loop {
            if container.is_full() {
                if !pending.is_empty() {
                    debug!(
                        "Result limit reached, skipping {} providers",
                        pending.len()
                    );
                }
                break;
            }

            let Some(outcome) = pending.next().await else {
                break;
            };
            Self::merge(container, outcome);
        }
    }

    async fn search_sequential(
        &self,
        options: &SearchOptions,
        limit: Duration,
        container: &mut ResultContainer,
    ) {
        let start = Instant::now();

        for (index, provider) in self.providers.iter().enumerate() {
            if container.is_full() {
                debug!(
                    "Result limit reached, skipping {} providers",
                    self.providers.len() - index
                );
                break;
            }

            let remaining = limit.saturating_sub(start.elapsed());
            let outcome = if remaining.is_zero() {
                MemberOutcome {
                    name: provider.name().to_string(),
                    elapsed: Duration::ZERO,
                    result: Err(ProviderError::Timeout {
                        provider: provider.name().to_string(),
                    }),
                }
            } else {
                Self::search_member(provider, options, remaining).await
            };
            Self::merge(container, outcome);
        }
    }

    async fn search_member(
        provider: &Arc<dyn Provider>,
        options: &SearchOptions,
        limit: Duration,
    ) -> MemberOutcome {
        let name = provider.name().to_string();
        let start = Instant::now();

        debug!("Searching provider {} with timeout {:?}", name, limit);

        let result = match timeout(limit, provider.perform_search(options)).await {
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout {
                provider: name.clone(),
            }),
        };

        MemberOutcome {
            name,
            elapsed: start.elapsed(),
            result,
        }
    }

    fn merge(container: &mut ResultContainer, outcome: MemberOutcome) {
        match outcome.result {
            Ok(elements) => {
                let result_count = elements.len();
                let accepted = container.extend_results(elements);

                container.add_timing(Timing {
                    provider: outcome.name.clone(),
                    time_ms: outcome.elapsed.as_millis() as u64,
                    result_count,
                });

                debug!(
                    "Provider {} returned {} results ({} new) in {:?}",
                    outcome.name, result_count, accepted, outcome.elapsed
                );
            }
            Err(e) => {
                warn!("Provider {} failed to provide results: {}", outcome.name, e);
                container.add_unresponsive(UnresponsiveProvider {
                    name: outcome.name,
                    kind: FailureKind::from(&e),
                    cause: e.to_string(),
                });
            }
        }
    }
}

#[async_trait]
impl Provider for CombinedProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn icon_url(&self) -> Result<&str, ProviderError> {
        Err(ProviderError::NotApplicable {
            property: "icon_url",
            provider: self.name.clone(),
        })
    }

    fn owns(&self, element: &SyntaxElement) -> bool {
        self.providers.iter().any(|provider| provider.owns(element))
    }

    async fn perform_search(
        &self,
        options: &SearchOptions,
    ) -> Result<Vec<SyntaxElement>, ProviderError> {
        Ok(self.search(options).await.into_results())
    }

    /// Delegates to the member that produced the element
    async fn prepare_element_for_display(
        &self,
        element: &mut SyntaxElement,
    ) -> Result<(), ProviderError> {
        match self.providers.iter().find(|provider| provider.owns(element)) {
            Some(provider) => provider.prepare_element_for_display(element).await,
            None => Err(ProviderError::NotOwned {
                element: element.name.clone(),
                owner: element.provider.name().to_string(),
                expected: self.name.clone(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::{ProviderRef, SyntaxType};

    struct Fixed {
        handle: ProviderRef,
        names: Vec<&'static str>,
    }

    impl Fixed {
        fn new(name: &str, names: Vec<&'static str>) -> Arc<dyn Provider> {
            Arc::new(Self {
                handle: ProviderRef::new(name),
                names,
            })
        }
    }

    #[async_trait]
    impl Provider for Fixed {
        fn name(&self) -> &str {
            self.handle.name()
        }

        fn icon_url(&self) -> Result<&str, ProviderError> {
            Ok("https://example.com/icon.png")
        }

        fn owns(&self, element: &SyntaxElement) -> bool {
            element.provider == self.handle
        }

        async fn perform_search(
            &self,
            _options: &SearchOptions,
        ) -> Result<Vec<SyntaxElement>, ProviderError> {
            self.names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    SyntaxElement::new(
                        i.to_string(),
                        self.handle.clone(),
                        *name,
                        SyntaxType::Effect,
                        vec![name.to_lowercase()],
                        "https://example.com",
                    )
                })
                .collect()
        }

        async fn prepare_element_for_display(
            &self,
            _element: &mut SyntaxElement,
        ) -> Result<(), ProviderError> {
            Ok(())
        }
    }

    #[test]
    fn test_name_lists_members() {
        let combined = CombinedProvider::new(vec![
            Fixed::new("Skript Hub", vec![]),
            Fixed::new("skUnity", vec![]),
        ]);
        assert_eq!(combined.name(), r#"CombinedProvider(["Skript Hub", "skUnity"])"#);
    }

    #[test]
    fn test_icon_url_not_applicable() {
        let combined = CombinedProvider::new(vec![]);
        assert!(matches!(
            combined.icon_url(),
            Err(ProviderError::NotApplicable { .. })
        ));
    }

    #[tokio::test]
    async fn test_no_providers() {
        let combined = CombinedProvider::new(vec![]);
        let results = combined
            .perform_search(&SearchOptions::new("test"))
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_timeout_falls_back_to_default() {
        let options = SearchOptions::new("x").with_timeout(1e20);

        let combined = CombinedProvider::new(vec![Fixed::new("a", vec!["Kill"])]);
        let container = combined.search(&options).await;
        assert_eq!(container.result_count(), 1);

        let sequential = CombinedProvider::new(vec![Fixed::new("a", vec!["Kill"])])
            .with_sequential(true);
        let container = sequential.search(&SearchOptions::new("x").with_timeout(1e15)).await;
        assert_eq!(container.result_count(), 1);
    }

    #[tokio::test]
    async fn test_merges_in_member_order() {
        let combined = CombinedProvider::new(vec![
            Fixed::new("a", vec!["Kill", "Broadcast"]),
            Fixed::new("b", vec!["broadcast", "Give"]),
        ]);

        let container = combined.search(&SearchOptions::new("x")).await;
        assert_eq!(container.get_timings().len(), 2);

        let results = container.into_results();
        let names: Vec<_> = results.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Kill", "Broadcast", "Give"]);
        assert_eq!(results[1].provider.name(), "a");
    }
}
