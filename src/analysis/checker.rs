//! The validator: scan, extract, cross-reference.

use crate::config::{Config, Sentinel};
use crate::error::ValidateError;
use crate::extractor::{ExportExtractor, PatternExtractor};
use crate::models::{ExportDeclaration, ModuleFile, ValidationResult};
use crate::scanner::{ModuleScanner, ScanConfig};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{debug, info};

/// Options for a validation run.
#[derive(Debug, Clone)]
pub struct ValidatorOptions {
    /// Module root directory.
    pub root: PathBuf,
    /// Aggregator file name inside the root.
    pub aggregator: String,
    /// Recognized source extensions, without the dot.
    pub extensions: Vec<String>,
    /// Stem of a directory's index module.
    pub index_name: String,
    pub declaration_suffixes: Vec<String>,
    pub doc_markers: Vec<String>,
    /// Constants the aggregator must mention.
    pub sentinels: Vec<Sentinel>,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for ValidatorOptions {
    fn from(config: &Config) -> Self {
        let scanner = &config.scanner;
        Self {
            root: scanner.root.clone(),
            aggregator: scanner.aggregator.clone(),
            extensions: scanner.extensions.clone(),
            index_name: scanner.index_name.clone(),
            declaration_suffixes: scanner.declaration_suffixes.clone(),
            doc_markers: scanner.doc_markers.clone(),
            sentinels: config.sentinels.clone(),
        }
    }
}

impl ValidatorOptions {
    pub fn aggregator_path(&self) -> PathBuf {
        self.root.join(&self.aggregator)
    }

    fn scan_config(&self) -> ScanConfig {
        ScanConfig {
            extensions: self.extensions.clone(),
            aggregator: self.aggregator.clone(),
            declaration_suffixes: self.declaration_suffixes.clone(),
            doc_markers: self.doc_markers.clone(),
        }
    }
}

/// Checks that an aggregator module and its module directory agree.
pub struct Validator {
    options: ValidatorOptions,
    extractor: Box<dyn ExportExtractor>,
    cancel: Option<Arc<AtomicBool>>,
}

impl Validator {
    /// Create a validator using the pattern-based extractor.
    pub fn new(options: ValidatorOptions) -> Self {
        Self {
            options,
            extractor: Box::new(PatternExtractor::new()),
            cancel: None,
        }
    }

    /// Replace the export extractor.
    pub fn with_extractor(mut self, extractor: Box<dyn ExportExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Stop scanning with [`ValidateError::Cancelled`] once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn options(&self) -> &ValidatorOptions {
        &self.options
    }

    /// Scan the module tree.
    pub fn scan(&self) -> Result<Vec<ModuleFile>, ValidateError> {
        let mut scanner = ModuleScanner::new(self.options.root.clone(), self.options.scan_config());
        if let Some(ref flag) = self.cancel {
            scanner = scanner.with_cancel(Arc::clone(flag));
        }
        scanner.scan()
    }

    /// Read the aggregator and extract its declarations.
    pub fn extract(&self) -> Result<(String, Vec<ExportDeclaration>), ValidateError> {
        let path = self.options.aggregator_path();
        let bytes = fs::read(&path).map_err(|e| ValidateError::io(&path, e))?;
        // Stray non-UTF-8 bytes (e.g. Latin-1 in a header comment) are not fatal.
        let content = String::from_utf8_lossy(&bytes).into_owned();
        let exports = self.extractor.extract(&content);
        Ok((content, exports))
    }

    /// Run the full validation.
    ///
    /// Missing roots, missing aggregators, dangling exports, orphaned
    /// modules and missing sentinels are all reported in the returned
    /// result. `Err` is reserved for I/O failures and cancellation.
    pub fn validate(&self) -> Result<ValidationResult, ValidateError> {
        let root = &self.options.root;
        if !root.is_dir() {
            info!("Module root {} does not exist", root.display());
            return Ok(ValidationResult::fatal(format!(
                "Root directory does not exist: {}",
                root.display()
            )));
        }

        let aggregator_path = self.options.aggregator_path();
        if !aggregator_path.is_file() {
            info!("Aggregator {} does not exist", aggregator_path.display());
            return Ok(ValidationResult::fatal(format!(
                "Aggregator module does not exist: {}",
                aggregator_path.display()
            )));
        }

        let (content, exports) = self.extract()?;
        let files = self.scan()?;
        debug!(
            "Checking {} modules against {} declarations",
            files.len(),
            exports.len()
        );

        let mut result = ValidationResult::default();

        for file in &files {
            if !is_covered(file, &exports) {
                result.push_warning(format!(
                    "File \"{}\" is not exported from {}",
                    file.relative, self.options.aggregator
                ));
            }
        }

        for export in &exports {
            if resolve_export(root, export, &self.options.extensions, &self.options.index_name)
                .is_none()
            {
                result.push_error(format!(
                    "Export \"{}\" references non-existent module",
                    export.target
                ));
            }
        }

        for sentinel in &self.options.sentinels {
            if !content.contains(sentinel.name.as_str()) {
                result.push_warning(sentinel.message.clone());
            }
        }

        result.files = files.into_iter().map(|f| f.relative).collect();
        result.exports = exports;

        info!(
            "Validation finished: {} errors, {} warnings",
            result.errors.len(),
            result.warnings.len()
        );

        Ok(result)
    }
}

/// Whether any declaration covers `file`.
pub fn is_covered(file: &ModuleFile, exports: &[ExportDeclaration]) -> bool {
    let name = file.module_name();
    exports.iter().any(|export| export.covers(name))
}

/// Candidate paths a declaration may resolve to, in lookup order:
/// `<target>.<ext>` for each extension, then `<target>/<index>.<ext>`.
pub fn candidate_paths(
    root: &Path,
    export: &ExportDeclaration,
    extensions: &[String],
    index_name: &str,
) -> Vec<PathBuf> {
    let base = root.join(&export.target);

    let direct = extensions
        .iter()
        .map(|ext| root.join(format!("{}.{}", export.target, ext)));
    let index = extensions
        .iter()
        .map(|ext| base.join(format!("{}.{}", index_name, ext)));

    direct.chain(index).collect()
}

/// First existing candidate for `export`, if any.
pub fn resolve_export(
    root: &Path,
    export: &ExportDeclaration,
    extensions: &[String],
    index_name: &str,
) -> Option<PathBuf> {
    candidate_paths(root, export, extensions, index_name)
        .into_iter()
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExportForm;
    use std::sync::atomic::Ordering;

    const SENTINELS: &str = "export const VERSION = '1.0.0';\nexport const LAST_SYNCED = '2024-01-01';\n";

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn validator(root: &Path) -> Validator {
        Validator::new(ValidatorOptions {
            root: root.to_path_buf(),
            ..ValidatorOptions::default()
        })
    }

    #[test]
    fn test_candidate_paths_order() {
        let exts = vec!["ts".to_string(), "tsx".to_string()];
        let export = ExportDeclaration::new("sub", ExportForm::Named);
        let candidates = candidate_paths(Path::new("/r"), &export, &exts, "index");

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/r/sub.ts"),
                PathBuf::from("/r/sub.tsx"),
                PathBuf::from("/r/sub/index.ts"),
                PathBuf::from("/r/sub/index.tsx"),
            ]
        );
    }

    #[test]
    fn test_resolve_prefers_direct_file() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "sub.tsx", "");
        write(tmp.path(), "sub/index.ts", "");

        let exts = vec!["ts".to_string(), "tsx".to_string()];
        let export = ExportDeclaration::new("sub", ExportForm::Wildcard);
        let resolved = resolve_export(tmp.path(), &export, &exts, "index");

        assert_eq!(resolved, Some(tmp.path().join("sub.tsx")));
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let result = validator(&tmp.path().join("nope")).validate().unwrap();

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Root directory does not exist"));
        assert!(result.files.is_empty());
        assert!(result.exports.is_empty());
    }

    #[test]
    fn test_missing_aggregator() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.ts", "");

        let result = validator(tmp.path()).validate().unwrap();

        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert!(result.errors[0].starts_with("Aggregator module does not exist"));
        assert!(result.warnings.is_empty());
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_non_utf8_aggregator_is_read_lossily() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.ts", "");
        let mut content = b"// Copyright \xa9 2024\nexport * from './a';\n".to_vec();
        content.extend_from_slice(SENTINELS.as_bytes());
        fs::write(tmp.path().join("index.ts"), content).unwrap();

        let result = validator(tmp.path()).validate().unwrap();

        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.exports, vec![ExportDeclaration::new("a", ExportForm::Wildcard)]);
    }

    #[test]
    fn test_orphan_warning() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.ts", "");
        write(tmp.path(), "stray.ts", "");
        write(tmp.path(), "index.ts", &format!("export * from './a';\n{}", SENTINELS));

        let result = validator(tmp.path()).validate().unwrap();

        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec!["File \"stray.ts\" is not exported from index.ts".to_string()]
        );
        assert_eq!(result.files, vec!["a.ts", "stray.ts"]);
    }

    #[test]
    fn test_dangling_export_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            "index.ts",
            &format!("export * from './missing-module';\n{}", SENTINELS),
        );

        let result = validator(tmp.path()).validate().unwrap();

        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec!["Export \"missing-module\" references non-existent module".to_string()]
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_missing_sentinels_only_warn() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.ts", "");
        write(tmp.path(), "index.ts", "export * from './a';\n");

        let result = validator(tmp.path()).validate().unwrap();

        assert!(result.valid);
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("VERSION"));
        assert!(result.warnings[1].contains("LAST_SYNCED"));
    }

    #[test]
    fn test_custom_sentinels() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "index.ts", "export const SCHEMA = 3;\n");

        let options = ValidatorOptions {
            root: tmp.path().to_path_buf(),
            sentinels: vec![
                Sentinel::new("SCHEMA", "no schema"),
                Sentinel::new("OWNER", "no owner"),
            ],
            ..ValidatorOptions::default()
        };
        let result = Validator::new(options).validate().unwrap();

        assert_eq!(result.warnings, vec!["no owner".to_string()]);
    }

    struct FixedExtractor(Vec<ExportDeclaration>);

    impl ExportExtractor for FixedExtractor {
        fn extract(&self, _content: &str) -> Vec<ExportDeclaration> {
            self.0.clone()
        }
    }

    #[test]
    fn test_custom_extractor() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.ts", "");
        write(tmp.path(), "index.ts", SENTINELS);

        let extractor = FixedExtractor(vec![ExportDeclaration::new("a", ExportForm::Named)]);
        let result = validator(tmp.path())
            .with_extractor(Box::new(extractor))
            .validate()
            .unwrap();

        assert!(result.valid);
        assert!(result.warnings.is_empty());
        assert_eq!(result.exports.len(), 1);
    }

    #[test]
    fn test_cancellation_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "index.ts", SENTINELS);

        let flag = Arc::new(AtomicBool::new(false));
        flag.store(true, Ordering::Relaxed);
        let outcome = validator(tmp.path()).with_cancel(flag).validate();

        assert!(matches!(outcome, Err(ValidateError::Cancelled)));
    }
}
