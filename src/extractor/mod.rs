//! Re-export extraction from aggregator module text.
//!
//! Extraction is textual. Comments are not stripped, so an export
//! statement inside a comment is still reported as a declaration.

pub mod pattern;

pub use pattern::PatternExtractor;

use crate::models::ExportDeclaration;

/// Extracts re-export declarations from an aggregator module's source text.
pub trait ExportExtractor {
    /// Return declarations in the order they appear in `content`.
    fn extract(&self, content: &str) -> Vec<ExportDeclaration>;
}
