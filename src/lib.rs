//! skdocs: aggregated search over the Skript documentation backends
//!
//! Queries Skript Hub, skUnity, SkriptLang and Skript-MC, normalizes their
//! answers into one syntax element model and merges them under a result
//! limit.

pub mod cache;
pub mod config;
pub mod network;
pub mod providers;
pub mod results;
pub mod search;

pub use config::Settings;
pub use providers::{Provider, ProviderError, ProviderLoader};
pub use results::{ResultContainer, SyntaxElement, SyntaxType};
pub use search::{CombinedProvider, SearchOptions};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
