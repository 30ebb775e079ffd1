//! Data models for the export validator.
//!
//! This module contains the core data structures shared by the scanner,
//! the export extractor, the checker and the report generator.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Syntactic shape of a re-export statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportForm {
    /// `export * from './a'`, `export * as ns from './a'` or `export type * from './a'`
    Wildcard,
    /// `export { A, B } from './b'`
    Named,
    /// `export Foo from './foo'`
    Single,
}

impl fmt::Display for ExportForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportForm::Wildcard => write!(f, "wildcard"),
            ExportForm::Named => write!(f, "named"),
            ExportForm::Single => write!(f, "single"),
        }
    }
}

/// One re-export target declared by the aggregator module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportDeclaration {
    /// Target path relative to the scan root, without the leading `./`
    /// and without an extension.
    pub target: String,
    /// The statement shape the target was found in.
    pub form: ExportForm,
}

impl ExportDeclaration {
    pub fn new(target: impl Into<String>, form: ExportForm) -> Self {
        Self {
            target: target.into(),
            form,
        }
    }

    /// Whether this declaration covers the given logical module name.
    ///
    /// A module is covered on an exact match, when it lives below the
    /// declared path, or when the declared path lives below the module name.
    pub fn covers(&self, module_name: &str) -> bool {
        self.target == module_name
            || is_path_prefix(&self.target, module_name)
            || is_path_prefix(module_name, &self.target)
    }
}

/// `prefix` names a strict ancestor path of `path`, on `/` boundaries.
fn is_path_prefix(prefix: &str, path: &str) -> bool {
    path.len() > prefix.len()
        && path.starts_with(prefix)
        && path.as_bytes()[prefix.len()] == b'/'
}

/// An eligible source module discovered under the scan root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    /// Path relative to the scan root, `/`-separated.
    pub relative: String,
    /// File extension without the dot.
    pub extension: String,
}

impl ModuleFile {
    /// Relative path with the extension stripped, e.g. `sub/b` for `sub/b.ts`.
    pub fn module_name(&self) -> &str {
        self.relative
            .strip_suffix(self.extension.as_str())
            .and_then(|s| s.strip_suffix('.'))
            .unwrap_or(&self.relative)
    }
}

/// Outcome of one validation run.
///
/// `valid` is false exactly when `errors` is non-empty. Use [`push_error`]
/// rather than writing to `errors` directly so the two never drift.
///
/// [`push_error`]: ValidationResult::push_error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub exports: Vec<ExportDeclaration>,
    pub files: Vec<String>,
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            exports: Vec::new(),
            files: Vec::new(),
        }
    }
}

impl ValidationResult {
    /// Result holding a single structural error and nothing else.
    pub fn fatal(message: impl Into<String>) -> Self {
        let mut result = Self::default();
        result.push_error(message);
        result
    }

    pub fn push_error(&mut self, message: impl Into<String>) {
        self.errors.push(message.into());
        self.valid = false;
    }

    pub fn push_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Process exit status for this result: 1 if any error, else 0.
    pub fn exit_code(&self) -> i32 {
        if self.errors.is_empty() {
            0
        } else {
            1
        }
    }
}

/// Metadata about a rendered report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Scanned module root.
    pub root: String,
    /// Aggregator module path.
    pub aggregator: String,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
    /// Tool version.
    pub version: String,
}

/// A validation result together with the context it was produced in.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub result: ValidationResult,
}

impl Report {
    pub fn new(
        root: impl Into<String>,
        aggregator: impl Into<String>,
        result: ValidationResult,
    ) -> Self {
        Self {
            metadata: ReportMetadata {
                root: root.into(),
                aggregator: aggregator.into(),
                generated_at: Utc::now(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            result,
        }
    }
}
