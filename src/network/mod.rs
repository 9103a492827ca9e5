//! HTTP networking module
//!
//! Provides the HTTP client used by every documentation provider.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::default_user_agent;
