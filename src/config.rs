//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.exportguard.toml` files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = ".exportguard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Scanner settings.
    #[serde(default)]
    pub scanner: ScannerConfig,

    /// Metadata constants the aggregator must declare.
    #[serde(default = "default_sentinels")]
    pub sentinels: Vec<Sentinel>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            scanner: ScannerConfig::default(),
            sentinels: default_sentinels(),
        }
    }
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default report format.
    #[serde(default)]
    pub format: ReportFormat,
}

/// Output format for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Console summary (default)
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
}

/// Module tree settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Module root directory, relative to the working directory.
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// File name of the aggregator module inside the root.
    #[serde(default = "default_aggregator")]
    pub aggregator: String,

    /// Recognized source extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Suffixes marking declarations-only modules.
    #[serde(default = "default_declaration_suffixes")]
    pub declaration_suffixes: Vec<String>,

    /// Substrings marking documentation files.
    #[serde(default = "default_doc_markers")]
    pub doc_markers: Vec<String>,

    /// Stem of a directory's index module.
    #[serde(default = "default_index_name")]
    pub index_name: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            aggregator: default_aggregator(),
            extensions: default_extensions(),
            declaration_suffixes: default_declaration_suffixes(),
            doc_markers: default_doc_markers(),
            index_name: default_index_name(),
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from("src/lib")
}

fn default_aggregator() -> String {
    "index.ts".to_string()
}

fn default_extensions() -> Vec<String> {
    vec!["ts".to_string(), "tsx".to_string()]
}

fn default_declaration_suffixes() -> Vec<String> {
    vec![".d.ts".to_string()]
}

fn default_doc_markers() -> Vec<String> {
    vec!["README".to_string()]
}

fn default_index_name() -> String {
    "index".to_string()
}

/// A named constant the aggregator content must mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentinel {
    /// Identifier searched for in the aggregator text.
    pub name: String,
    /// Warning emitted when the identifier is absent.
    pub message: String,
}

impl Sentinel {
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
        }
    }
}

fn default_sentinels() -> Vec<Sentinel> {
    vec![
        Sentinel::new("VERSION", "Missing VERSION constant in aggregator module"),
        Sentinel::new("LAST_SYNCED", "Missing LAST_SYNCED constant in aggregator module"),
    ]
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref root) = args.root {
            self.scanner.root = root.clone();
        }
        if let Some(ref aggregator) = args.aggregator {
            self.scanner.aggregator = aggregator.clone();
        }
        if let Some(ref extensions) = args.extensions {
            self.scanner.extensions = extensions.clone();
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
