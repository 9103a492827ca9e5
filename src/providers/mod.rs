//! Documentation provider module
//!
//! Defines the Provider trait and the adapters for each documentation
//! backend.

mod error;
mod loader;
mod traits;

// Provider implementations
pub mod skripthub;
pub mod skriptlang;
pub mod skriptmc;
pub mod skunity;

pub use error::ProviderError;
pub use loader::ProviderLoader;
pub use traits::{ApiRequest, Provider};
