//! Core data types for rate derivation.

mod dependency_map;
mod key;
mod quote;

pub use dependency_map::DependencyMap;
pub use key::{Instrument, QuoteKey, SourceId};
pub use quote::Quote;
