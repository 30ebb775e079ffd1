//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation. Every flag is optional; with none given the
//! validator runs against the configured (or default) module root.

use crate::config::ReportFormat;
use clap::Parser;
use std::path::PathBuf;

/// ExportGuard - barrel module export surface validator
///
/// Checks that every re-export in the aggregator module points at a real
/// module, and that every module is reachable through some re-export.
///
/// Exit codes:
///   0 - Export surface is valid (warnings allowed)
///   1 - At least one validation error
///   2 - Runtime error (unreadable directory, bad config, etc.)
///
/// Examples:
///   exportguard
///   exportguard --root packages/core/src --aggregator mod.ts
///   exportguard --format json --output exports.json
///   exportguard --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Module root directory to scan
    ///
    /// Defaults to `src/lib`, or `scanner.root` from the config file.
    #[arg(short, long, value_name = "DIR", env = "EXPORTGUARD_ROOT")]
    pub root: Option<PathBuf>,

    /// File name of the aggregator module inside the root
    #[arg(short, long, value_name = "FILE")]
    pub aggregator: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .exportguard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Source extensions to recognize (comma-separated)
    ///
    /// Example: --extensions ts,tsx,js
    #[arg(long, value_name = "EXTS", value_delimiter = ',')]
    pub extensions: Option<Vec<String>>,

    /// Report format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only in the log)
    #[arg(short, long)]
    pub quiet: bool,

    /// Dry run: scan modules and extract exports without checking them
    #[arg(long)]
    pub dry_run: bool,

    /// Generate a default .exportguard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(ref extensions) = self.extensions {
            if extensions.iter().any(|e| e.is_empty() || e.starts_with('.')) {
                return Err("Extensions must be non-empty and given without a leading dot".to_string());
            }
        }

        if let Some(ref aggregator) = self.aggregator {
            if aggregator.trim().is_empty() {
                return Err("Aggregator file name must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_is_valid() {
        let args = Args::try_parse_from(["exportguard"]).unwrap();
        assert!(args.root.is_none());
        assert!(args.format.is_none());
        assert!(args.validate().is_ok());
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "exportguard",
            "--root",
            "pkg/src",
            "--extensions",
            "ts,js",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.root, Some(PathBuf::from("pkg/src")));
        assert_eq!(
            args.extensions,
            Some(vec!["ts".to_string(), "js".to_string()])
        );
        assert_eq!(args.format, Some(ReportFormat::Json));
    }

    #[test]
    fn test_validation_conflicting_options() {
        let args = Args {
            verbose: true,
            quiet: true,
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_dotted_extension() {
        let args = Args {
            extensions: Some(vec![".ts".to_string()]),
            ..Args::default()
        };
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = Args::default();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
