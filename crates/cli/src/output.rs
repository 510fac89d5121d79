//! Terminal output formatting

use colored::Colorize;
use relint_core::{DiagnosticLine, LintSummary, Severity};

pub fn format_diagnostic(raw: &str) -> String {
    match DiagnosticLine::parse(raw) {
        Some(diag) => {
            let severity = match diag.severity {
                Severity::Error => "error".red().bold(),
                Severity::Warning => "warning".yellow(),
                Severity::Info => "info".blue(),
            };
            format!(
                "  {}:{}:{}: {}: {}",
                diag.path.display(),
                diag.line,
                diag.column,
                severity,
                diag.message
            )
        }
        None => format!("  {}", raw.dimmed()),
    }
}

pub fn format_summary(summary: &LintSummary) -> String {
    let counts = format!(
        "{} error(s), {} warning(s)",
        summary.errors, summary.warnings
    );

    if summary.errors > 0 {
        format!("  {}", counts.red())
    } else if summary.warnings > 0 {
        format!("  {}", counts.yellow())
    } else {
        format!("  {}", counts.green())
    }
}
