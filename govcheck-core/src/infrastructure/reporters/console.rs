// govcheck-core/src/infrastructure/reporters/console.rs

use comfy_table::{Table, presets};
use std::fmt::Write;

use crate::domain::governance::{Severity, ValidationReport, ValidationResult};
use crate::error::GovcheckError;
use crate::ports::renderer::{RenderOptions, ReportRenderer};

/// Human-readable report for terminals.
pub struct ConsoleRenderer;

fn icon(result: &ValidationResult) -> &'static str {
    match (result.passed, result.severity) {
        (true, _) => "✓",
        (false, Severity::Error) => "✗",
        (false, Severity::Warning) => "⚠",
        (false, Severity::Info) => "ℹ",
    }
}

fn section<'a, I>(out: &mut String, title: &str, results: I) -> std::fmt::Result
where
    I: Iterator<Item = &'a ValidationResult>,
{
    let mut results = results.peekable();
    if results.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "{title}")?;
    for r in results {
        writeln!(out, "  {} [{}] {}: {}", icon(r), r.rule_id, r.entity_id, r.message)?;
        if let Some(hint) = &r.remediation {
            writeln!(out, "      ↳ {hint}")?;
        }
    }
    writeln!(out)
}

fn summary_table(report: &ValidationReport) -> Table {
    let s = &report.summary;
    let mut table = Table::new();
    table.load_preset(presets::NOTHING);
    for (label, value) in [
        ("Models checked", s.entities_checked),
        ("Total checks", s.total_checks),
        ("Passed", s.passed),
        ("Errors", s.errors),
        ("Warnings", s.warnings),
        ("Info", s.infos),
    ] {
        table.add_row(vec![label.to_string(), value.to_string()]);
    }
    table
}

impl ConsoleRenderer {
    fn write(report: &ValidationReport, options: RenderOptions) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        writeln!(out, "🛡️  Governance Validation Report")?;
        writeln!(out)?;
        writeln!(out, "{}", summary_table(report))?;
        writeln!(out)?;

        section(&mut out, "❌ Errors:", report.errors())?;
        section(&mut out, "⚠️  Warnings:", report.warnings())?;
        section(&mut out, "ℹ️  Info:", report.infos())?;
        if options.show_passed {
            section(&mut out, "✅ Passed:", report.passed())?;
        }

        let s = &report.summary;
        if s.success {
            writeln!(out, "✅ Validation passed")?;
        } else if s.errors > 0 {
            writeln!(out, "❌ Validation failed with {} error(s)", s.errors)?;
        } else {
            writeln!(out, "❌ Validation failed with {} warning(s)", s.warnings)?;
        }
        Ok(out)
    }
}

impl ReportRenderer for ConsoleRenderer {
    fn render(&self, report: &ValidationReport, options: RenderOptions) -> Result<String, GovcheckError> {
        Self::write(report, options).map_err(|e| GovcheckError::InternalError(e.to_string()))
    }
}
