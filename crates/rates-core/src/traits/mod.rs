//! Core traits for rate derivation.

mod derivation;

pub use derivation::Derivation;
