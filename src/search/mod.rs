//! Search orchestration module
//!
//! Fans a query out to several providers, merges and bounds their results,
//! and holds the local ranking used by providers without a search endpoint.

mod combined;
mod options;
mod ranking;

pub use combined::{CombinedProvider, DEFAULT_MAX_RESULTS, DEFAULT_TIMEOUT};
pub use options::SearchOptions;
pub use ranking::{match_level, name_distance, nearest_element, rank_by_match_level, MatchLevel};
