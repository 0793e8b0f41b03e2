//! Core types and traits for synthetic rate derivation.
//!
//! This crate provides the foundational building blocks including:
//! - Quote values and typed `(source, instrument)` keys
//! - The per-invocation dependency map
//! - The `Derivation` trait every rule implements
//! - Layered error types

pub mod types;
pub mod traits;
pub mod error;

pub use error::RateError;
pub use types::*;
pub use traits::*;
