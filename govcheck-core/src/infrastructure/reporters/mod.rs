// govcheck-core/src/infrastructure/reporters/mod.rs

pub mod console;
pub mod github;
pub mod json;
pub mod markdown;

use std::fmt;
use std::str::FromStr;

pub use console::ConsoleRenderer;
pub use github::GithubRenderer;
pub use json::JsonRenderer;
pub use markdown::MarkdownRenderer;

use crate::ports::renderer::ReportRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Console,
    Json,
    Markdown,
    Github,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 4] = [Self::Console, Self::Json, Self::Markdown, Self::Github];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Console => "console",
            Self::Json => "json",
            Self::Markdown => "markdown",
            Self::Github => "github",
        }
    }

    pub fn renderer(&self) -> Box<dyn ReportRenderer> {
        match self {
            Self::Console => Box::new(ConsoleRenderer),
            Self::Json => Box::new(JsonRenderer::default()),
            Self::Markdown => Box::new(MarkdownRenderer),
            Self::Github => Box::new(GithubRenderer),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "console" | "text" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            "markdown" | "md" => Ok(Self::Markdown),
            "github" | "github-actions" => Ok(Self::Github),
            other => Err(format!(
                "Unknown format: '{}' (available: {})",
                other,
                Self::ALL.map(|f| f.as_str()).join(", ")
            )),
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::domain::governance::{Severity, ValidationReport, ValidationResult};
    use std::collections::BTreeMap;

    pub fn result(rule: &str, model: &str, passed: bool, severity: Severity, message: &str) -> ValidationResult {
        ValidationResult {
            rule_id: rule.into(),
            entity_id: model.into(),
            passed,
            severity,
            message: message.into(),
            remediation: None,
            details: BTreeMap::new(),
        }
    }

    /// One error, one warning, one pass over two models.
    pub fn report() -> ValidationReport {
        ValidationReport::new(
            vec![
                result("require_owner", "stg_customers", false, Severity::Error, "Model does not have an owner assigned in the catalog"),
                result("require_description", "stg_customers", true, Severity::Error, "Model has a description (dbt)"),
                result("upstream_must_have_owner", "dim_customers", false, Severity::Warning, "Upstream dependency 'stg_customers' has no owner (no owner assigned)"),
            ],
            2,
            false,
        )
    }
}
