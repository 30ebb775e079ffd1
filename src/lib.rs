//! ExportGuard - barrel module export surface validator.
//!
//! Checks that an aggregator ("barrel") module and the directory of
//! source modules beside it agree: every re-export resolves to a real
//! module, and every real module is reachable through some re-export.
//!
//! ```no_run
//! let result = exportguard::validate_exports(None)?;
//! if !result.valid {
//!     for error in &result.errors {
//!         eprintln!("{}", error);
//!     }
//! }
//! # Ok::<(), exportguard::ValidateError>(())
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod extractor;
pub mod models;
pub mod report;
pub mod scanner;

pub use analysis::{Validator, ValidatorOptions};
pub use error::ValidateError;
pub use models::{ExportDeclaration, ExportForm, ModuleFile, ValidationResult};

use std::path::Path;

/// Validate the export surface with default settings.
///
/// `root` overrides the default module root (`src/lib`).
pub fn validate_exports(root: Option<&Path>) -> Result<ValidationResult, ValidateError> {
    let mut options = ValidatorOptions::default();
    if let Some(root) = root {
        options.root = root.to_path_buf();
    }
    Validator::new(options).validate()
}
