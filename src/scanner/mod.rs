//! Module tree scanner.
//!
//! Walks the module root and collects every eligible source module.
//! Traversal visits the whole tree; exclusion rules are applied to the
//! collected files afterwards because they depend on file identity only.

use crate::error::ValidateError;
use crate::models::ModuleFile;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;
use walkdir::WalkDir;

/// Configuration for module scanning.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// File extensions to include (e.g., ["ts", "tsx"])
    pub extensions: Vec<String>,
    /// File name of the aggregator module, excluded at the root only
    pub aggregator: String,
    /// Path suffixes of declarations-only modules (e.g., [".d.ts"])
    pub declaration_suffixes: Vec<String>,
    /// Name fragments marking documentation files (e.g., ["README"])
    pub doc_markers: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::from(&crate::config::ScannerConfig::default())
    }
}

impl From<&crate::config::ScannerConfig> for ScanConfig {
    fn from(config: &crate::config::ScannerConfig) -> Self {
        Self {
            extensions: config.extensions.clone(),
            aggregator: config.aggregator.clone(),
            declaration_suffixes: config.declaration_suffixes.clone(),
            doc_markers: config.doc_markers.clone(),
        }
    }
}

/// Scanner for discovering module files under a root directory.
pub struct ModuleScanner {
    config: ScanConfig,
    root: PathBuf,
    cancel: Option<Arc<AtomicBool>>,
}

impl ModuleScanner {
    /// Create a new module scanner.
    pub fn new(root: PathBuf, config: ScanConfig) -> Self {
        Self {
            config,
            root,
            cancel: None,
        }
    }

    /// Abort the walk with [`ValidateError::Cancelled`] once `flag` is set.
    pub fn with_cancel(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    /// Scan for all module files, sorted by relative path.
    ///
    /// A missing root yields an empty list.
    pub fn scan(&self) -> Result<Vec<ModuleFile>, ValidateError> {
        if !self.root.is_dir() {
            debug!("Module root {} not found, nothing to scan", self.root.display());
            return Ok(Vec::new());
        }

        let leaves = self.walk()?;
        let total = leaves.len();

        let mut files: Vec<ModuleFile> = leaves
            .into_iter()
            .filter_map(|path| self.to_module_file(&path))
            .collect();

        // Per-directory walk order differs from path order (`a-b.ts` < `a/x.ts`).
        files.sort_by(|a, b| a.relative.cmp(&b.relative));

        debug!(
            "Scanned {}: {} files, {} eligible modules",
            self.root.display(),
            total,
            files.len()
        );

        Ok(files)
    }

    /// Collect every regular file below the root, following symlinks so the
    /// scan sees the same files export resolution does.
    fn walk(&self) -> Result<Vec<PathBuf>, ValidateError> {
        let mut leaves = Vec::new();

        for entry in WalkDir::new(&self.root).follow_links(true).sort_by_file_name() {
            let entry = entry?;

            if entry.file_type().is_dir() {
                self.check_cancelled()?;
                continue;
            }

            if entry.file_type().is_file() {
                leaves.push(entry.into_path());
            }
        }

        Ok(leaves)
    }

    fn check_cancelled(&self) -> Result<(), ValidateError> {
        match self.cancel {
            Some(ref flag) if flag.load(Ordering::Relaxed) => Err(ValidateError::Cancelled),
            _ => Ok(()),
        }
    }

    /// Build a `ModuleFile` for `path` if it passes every filter.
    fn to_module_file(&self, path: &Path) -> Option<ModuleFile> {
        let relative = relative_path(&self.root, path);

        if !self.matches(&relative) {
            return None;
        }

        let extension = path.extension()?.to_str()?.to_string();

        Some(ModuleFile {
            relative,
            extension,
        })
    }

    /// Check whether a root-relative path names an eligible module.
    pub fn matches(&self, relative: &str) -> bool {
        let name = relative.rsplit('/').next().unwrap_or(relative);

        // Check extension
        let ext = name.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        if !self.config.extensions.iter().any(|e| e == ext) {
            return false;
        }

        // The aggregator itself
        if relative == self.config.aggregator {
            return false;
        }

        // Declarations-only modules
        if self
            .config
            .declaration_suffixes
            .iter()
            .any(|suffix| relative.ends_with(suffix.as_str()))
        {
            return false;
        }

        // Documentation files
        !self
            .config
            .doc_markers
            .iter()
            .any(|marker| name.contains(marker.as_str()))
    }
}

/// `path` relative to `root`, with `/` separators.
fn relative_path(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
