//! CLI command implementations.

pub mod dependents;
pub mod derive;
pub mod rules;
pub mod validate;
