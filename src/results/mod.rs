//! Syntax element model and the result container
//!
//! Every provider converts its backend rows into [`SyntaxElement`]s. The
//! combined search merges them in a [`ResultContainer`].

mod category;
mod container;
mod normalize;
mod types;

pub use category::map_category;
pub use container::ResultContainer;
pub use normalize::*;
pub use types::*;
