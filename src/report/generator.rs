//! Report generation.
//!
//! Renders a [`Report`] as a console summary, a Markdown document or JSON.

use crate::config::ReportFormat;
use crate::models::{Report, ReportMetadata, ValidationResult};
use anyhow::Result;

/// Render a report in the requested format.
pub fn render(report: &Report, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_text_report(report)),
        ReportFormat::Markdown => Ok(generate_markdown_report(report)),
        ReportFormat::Json => generate_json_report(report),
    }
}

/// Generate the console summary.
pub fn generate_text_report(report: &Report) -> String {
    let result = &report.result;
    let mut output = String::new();

    output.push_str(&format!(
        "🔍 Validating exports in {}\n",
        report.metadata.root
    ));
    output.push_str(&format!("   Files found: {}\n", result.files.len()));
    output.push_str(&format!("   Exports declared: {}\n", result.exports.len()));

    if !result.warnings.is_empty() {
        output.push_str(&format!("\n⚠️  Warnings ({}):\n", result.warnings.len()));
        for warning in &result.warnings {
            output.push_str(&format!("   - {}\n", warning));
        }
    }

    if !result.errors.is_empty() {
        output.push_str(&format!("\n❌ Errors ({}):\n", result.errors.len()));
        for error in &result.errors {
            output.push_str(&format!("   - {}\n", error));
        }
    }

    output.push('\n');
    output.push_str(verdict(result));
    output.push('\n');

    output
}

fn verdict(result: &ValidationResult) -> &'static str {
    match (result.valid, result.warnings.is_empty()) {
        (true, true) => "✅ Export surface is valid.",
        (true, false) => "✅ Export surface is valid (with warnings).",
        (false, _) => "⛔ Export validation failed.",
    }
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report) -> String {
    let mut output = String::new();

    output.push_str("# Export Surface Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.result));
    output.push_str(&generate_list_section("Errors", &report.result.errors));
    output.push_str(&generate_list_section("Warnings", &report.result.warnings));
    output.push_str(&generate_exports_section(&report.result));
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Module Root:** `{}`\n", metadata.root));
    section.push_str(&format!("- **Aggregator:** `{}`\n", metadata.aggregator));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Version:** {}\n", metadata.version));
    section.push('\n');

    section
}

/// Generate the summary table.
fn generate_summary_section(result: &ValidationResult) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Status | Files | Exports | Errors | Warnings |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        if result.valid { "✅ valid" } else { "⛔ invalid" },
        result.files.len(),
        result.exports.len(),
        result.errors.len(),
        result.warnings.len()
    ));

    section
}

/// Generate a bulleted section, or nothing when `items` is empty.
fn generate_list_section(title: &str, items: &[String]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let mut section = format!("## {}\n\n", title);
    for item in items {
        section.push_str(&format!("- {}\n", item));
    }
    section.push('\n');

    section
}

/// Generate the declared exports table.
fn generate_exports_section(result: &ValidationResult) -> String {
    let mut section = String::new();

    section.push_str("## Declared Exports\n\n");

    if result.exports.is_empty() {
        section.push_str("No re-export declarations were found.\n\n");
        return section;
    }

    section.push_str("| Target | Form |\n");
    section.push_str("|:---|:---:|\n");
    for export in &result.exports {
        section.push_str(&format!("| `./{}` | {} |\n", export.target, export.form));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Report generated by ExportGuard*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExportDeclaration, ExportForm};

    fn create_test_report() -> Report {
        let mut result = ValidationResult {
            exports: vec![
                ExportDeclaration::new("a", ExportForm::Wildcard),
                ExportDeclaration::new("missing", ExportForm::Named),
            ],
            files: vec!["a.ts".to_string(), "stray.ts".to_string()],
            ..ValidationResult::default()
        };
        result.push_warning("File \"stray.ts\" is not exported from index.ts");
        result.push_error("Export \"missing\" references non-existent module");

        Report::new("src/lib", "src/lib/index.ts", result)
    }

    #[test]
    fn test_generate_text_report() {
        let text = generate_text_report(&create_test_report());

        assert!(text.contains("Files found: 2"));
        assert!(text.contains("Exports declared: 2"));
        assert!(text.contains("Warnings (1)"));
        assert!(text.contains("Errors (1)"));
        assert!(text.contains("stray.ts"));
        assert!(text.contains("Export validation failed"));
    }

    #[test]
    fn test_text_report_valid_without_sections() {
        let report = Report::new("src/lib", "src/lib/index.ts", ValidationResult::default());
        let text = generate_text_report(&report);

        assert!(!text.contains("Warnings"));
        assert!(!text.contains("Errors"));
        assert!(text.contains("Export surface is valid."));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Export Surface Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Summary"));
        assert!(markdown.contains("## Errors"));
        assert!(markdown.contains("## Warnings"));
        assert!(markdown.contains("| `./a` | wildcard |"));
        assert!(markdown.contains("⛔ invalid"));
    }

    #[test]
    fn test_list_section_empty() {
        assert!(generate_list_section("Errors", &[]).is_empty());
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["result"]["valid"], false);
        assert_eq!(value["result"]["exports"][0]["target"], "a");
        assert_eq!(value["metadata"]["aggregator"], "src/lib/index.ts");
    }

    #[test]
    fn test_render_dispatches_on_format() {
        let report = create_test_report();
        assert!(render(&report, ReportFormat::Json).unwrap().starts_with('{'));
        assert!(render(&report, ReportFormat::Markdown)
            .unwrap()
            .starts_with("# Export Surface Report"));
        assert!(render(&report, ReportFormat::Text)
            .unwrap()
            .starts_with("🔍"));
    }
}
