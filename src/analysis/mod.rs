//! Export surface consistency checking.
//!
//! Cross-references scanned modules against the aggregator's declarations
//! and produces a [`ValidationResult`](crate::models::ValidationResult).

pub mod checker;

pub use checker::*;
