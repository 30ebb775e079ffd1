//! Regular-expression based export extractor.

use super::ExportExtractor;
use crate::models::{ExportDeclaration, ExportForm};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// All three statement shapes in one alternation so a single left-to-right
/// pass yields declarations in source order. The target must start with `./`.
const EXPORT_PATTERN: &str = r#"export\s+(?:(?P<wildcard>(?:type\s+)?\*(?:\s+as\s+[\w$]+)?)|(?P<named>(?:type\s+)?\{[^}]*\})|(?P<single>[A-Za-z_$][\w$]*))\s+from\s+["']\./(?P<target>[^"']+)["']"#;

fn export_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(EXPORT_PATTERN).expect("export pattern is valid"))
}

/// Default extractor matching `export [type] * from`, `export [type] { .. } from`
/// and `export Name from` statements.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ExportExtractor for PatternExtractor {
    fn extract(&self, content: &str) -> Vec<ExportDeclaration> {
        let declarations: Vec<ExportDeclaration> = export_regex()
            .captures_iter(content)
            .filter_map(|caps| {
                let form = if caps.name("wildcard").is_some() {
                    ExportForm::Wildcard
                } else if caps.name("named").is_some() {
                    ExportForm::Named
                } else {
                    ExportForm::Single
                };
                let target = caps.name("target")?.as_str().trim_end_matches('/');
                if target.is_empty() {
                    return None;
                }
                Some(ExportDeclaration::new(target, form))
            })
            .collect();

        debug!("Extracted {} export declarations", declarations.len());
        declarations
    }
}
