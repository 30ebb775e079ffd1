//! ExportGuard - barrel module export surface validator
//!
//! Exit codes:
//!   0 - Export surface is valid (warnings do not fail the run)
//!   1 - At least one validation error
//!   2 - Runtime error (unreadable directory, bad config, bad arguments)

use anyhow::{Context, Result};
use exportguard::cli::Args;
use exportguard::config::{Config, CONFIG_FILE};
use exportguard::models::Report;
use exportguard::report;
use exportguard::{Validator, ValidatorOptions};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

const EXIT_RUNTIME_ERROR: i32 = 2;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(EXIT_RUNTIME_ERROR);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        std::process::exit(handle_init_config(Path::new(CONFIG_FILE)));
    }

    // Initialize logging
    init_logging(&args);

    info!("ExportGuard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(&args) {
        Ok(exit_code) => std::process::exit(exit_code),
        Err(e) => {
            error!("Validation failed to run: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(EXIT_RUNTIME_ERROR);
        }
    }
}

/// Handle --init-config: generate a default .exportguard.toml.
///
/// Returns the exit code: 0 on success, 2 if the file exists or can't be written.
fn handle_init_config(path: &Path) -> i32 {
    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            path.display()
        );
        return EXIT_RUNTIME_ERROR;
    }

    let content = Config::default_toml();
    if let Err(e) = std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", path.display()))
    {
        eprintln!("❌ Error: {:#}", e);
        return EXIT_RUNTIME_ERROR;
    }

    println!("✅ Created {} with default settings.", path.display());
    println!("   Edit it to customize the module root, extensions, and sentinels.");
    0
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so rendered reports on stdout stay machine-readable.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the validation and emit the report. Returns the exit code (0 or 1).
fn run(args: &Args) -> Result<i32> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    let options = ValidatorOptions::from(&config);
    let validator = Validator::new(options);

    if args.dry_run {
        return handle_dry_run(&validator);
    }

    let result = validator
        .validate()
        .context("Failed to validate export surface")?;

    let opts = validator.options();
    let report = Report::new(
        opts.root.display().to_string(),
        opts.aggregator_path().display().to_string(),
        result,
    );
    let output = report::render(&report, config.general.format)?;

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("📝 Report saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(report.result.exit_code())
}

/// Handle --dry-run: scan and extract, print what would be checked, exit 0.
fn handle_dry_run(validator: &Validator) -> Result<i32> {
    let opts = validator.options();
    println!("🔍 Dry run: scanning {} (no checks)...\n", opts.root.display());

    let files = validator.scan()?;
    if files.is_empty() {
        println!("   No module files found.");
    } else {
        println!("   Found {} module files:\n", files.len());
        for file in &files {
            println!("     📄 {}", file.relative);
        }
    }

    if opts.aggregator_path().is_file() {
        let (_, exports) = validator.extract()?;
        println!("\n   Found {} export declarations:\n", exports.len());
        for export in &exports {
            println!("     📦 ./{} ({})", export.target, export.form);
        }
    } else {
        println!("\n   Aggregator {} not found.", opts.aggregator_path().display());
    }

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
