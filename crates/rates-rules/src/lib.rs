//! Rate derivation rules.
//!
//! This crate provides:
//! - Feed averaging and triangulation combinators
//! - Declarative rule specifications compiled into a generic evaluator
//! - The rule catalog, including the built-in TRY crosses

mod builtin;
mod catalog;
pub mod combinator;
mod rule;

pub use builtin::{builtin_specs, BUILTIN_SOURCES};
pub use catalog::{DerivationReport, RuleCatalog};
pub use rule::{Combinator, LegOrientation, LegSpec, Rule, RuleSpec};
