// govcheck-core/src/infrastructure/reporters/markdown.rs

use std::fmt::Write;

use crate::domain::governance::{ValidationReport, ValidationResult};
use crate::error::GovcheckError;
use crate::ports::renderer::{RenderOptions, ReportRenderer};

/// Markdown report, suitable for PR comments.
pub struct MarkdownRenderer;

// Pipes would break the table layout.
fn cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

fn table<'a, I>(out: &mut String, title: &str, results: I) -> std::fmt::Result
where
    I: Iterator<Item = &'a ValidationResult>,
{
    let mut results = results.peekable();
    if results.peek().is_none() {
        return Ok(());
    }
    writeln!(out, "## {title}")?;
    writeln!(out)?;
    writeln!(out, "| Model | Rule | Message |")?;
    writeln!(out, "|-------|------|---------|")?;
    for r in results {
        writeln!(out, "| `{}` | {} | {} |", r.entity_id, r.rule_id, cell(&r.message))?;
    }
    writeln!(out)
}

impl MarkdownRenderer {
    fn write(report: &ValidationReport, options: RenderOptions) -> Result<String, std::fmt::Error> {
        let s = &report.summary;
        let verdict = if s.success { "✅" } else { "❌" };

        let mut out = String::new();
        writeln!(out, "# Governance Validation Report")?;
        writeln!(out)?;
        writeln!(out, "## Summary {verdict}")?;
        writeln!(out)?;
        writeln!(out, "- **Models Checked:** {}", s.entities_checked)?;
        writeln!(out, "- **Total Checks:** {}", s.total_checks)?;
        writeln!(out, "- **Passed:** {}", s.passed)?;
        writeln!(out, "- **Errors:** {}", s.errors)?;
        writeln!(out, "- **Warnings:** {}", s.warnings)?;
        writeln!(out, "- **Info:** {}", s.infos)?;
        writeln!(out)?;

        table(&mut out, "Errors ❌", report.errors())?;
        table(&mut out, "Warnings ⚠️", report.warnings())?;
        table(&mut out, "Info ℹ️", report.infos())?;
        if options.show_passed {
            table(&mut out, "Passed ✅", report.passed())?;
        }
        Ok(out)
    }
}

impl ReportRenderer for MarkdownRenderer {
    fn render(&self, report: &ValidationReport, options: RenderOptions) -> Result<String, GovcheckError> {
        Self::write(report, options).map_err(|e| GovcheckError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::reporters::fixtures;

    #[test]
    fn test_markdown_tables() -> anyhow::Result<()> {
        let out = MarkdownRenderer.render(&fixtures::report(), RenderOptions::default())?;
        assert!(out.starts_with("# Governance Validation Report"));
        assert!(out.contains("## Summary ❌"));
        assert!(out.contains("| `stg_customers` | require_owner | Model does not have an owner assigned in the catalog |"));
        assert!(out.contains("## Warnings ⚠️"));
        assert!(!out.contains("## Info"));
        Ok(())
    }

    #[test]
    fn test_pipes_are_escaped() {
        assert_eq!(cell("a|b\nc"), "a\\|b c");
    }
}
