// govcheck-core/src/infrastructure/reporters/github.rs

use std::fmt::Write;

use crate::domain::governance::{Severity, ValidationReport};
use crate::error::GovcheckError;
use crate::ports::renderer::{RenderOptions, ReportRenderer};

/// GitHub Actions workflow commands (`::error title=...::message`).
pub struct GithubRenderer;

fn level(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "error",
        Severity::Warning => "warning",
        Severity::Info => "notice",
    }
}

// Workflow command data escaping.
fn escape_data(text: &str) -> String {
    text.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}

fn escape_property(text: &str) -> String {
    escape_data(text).replace(':', "%3A").replace(',', "%2C")
}

impl GithubRenderer {
    fn write(report: &ValidationReport) -> Result<String, std::fmt::Error> {
        let mut out = String::new();
        for r in report.results.iter().filter(|r| !r.passed) {
            let title = format!("{} - {}", r.rule_id, r.entity_id);
            writeln!(
                out,
                "::{} title={}::{}",
                level(r.severity),
                escape_property(&title),
                escape_data(&r.message)
            )?;
        }

        let s = &report.summary;
        writeln!(out)?;
        writeln!(out, "Total models checked: {}", s.entities_checked)?;
        writeln!(out, "Checks passed: {}", s.passed)?;
        writeln!(out, "Errors: {}", s.errors)?;
        writeln!(out, "Warnings: {}", s.warnings)?;
        Ok(out)
    }
}

impl ReportRenderer for GithubRenderer {
    fn render(&self, report: &ValidationReport, _options: RenderOptions) -> Result<String, GovcheckError> {
        Self::write(report).map_err(|e| GovcheckError::InternalError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::reporters::fixtures;

    #[test]
    fn test_annotations() -> anyhow::Result<()> {
        let out = GithubRenderer.render(&fixtures::report(), RenderOptions::default())?;
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(
            lines[0],
            "::error title=require_owner - stg_customers::Model does not have an owner assigned in the catalog"
        );
        assert!(lines[1].starts_with("::warning title=upstream_must_have_owner - dim_customers::"));
        assert!(out.contains("Errors: 1"));
        Ok(())
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape_data("50%\nmore"), "50%25%0Amore");
        assert_eq!(escape_property("a: b, c"), "a%3A b%2C c");
    }
}
