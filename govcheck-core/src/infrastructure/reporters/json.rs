// govcheck-core/src/infrastructure/reporters/json.rs

use chrono::Utc;
use serde::Serialize;

use crate::domain::governance::{Summary, ValidationReport, ValidationResult};
use crate::error::GovcheckError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::renderer::{RenderOptions, ReportRenderer};

#[derive(Serialize)]
struct Envelope<'a> {
    generated_at: String,
    summary: &'a Summary,
    results: &'a [ValidationResult],
}

/// Machine-readable report. Always contains every result.
pub struct JsonRenderer {
    pub pretty: bool,
}

impl Default for JsonRenderer {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl ReportRenderer for JsonRenderer {
    fn render(&self, report: &ValidationReport, _options: RenderOptions) -> Result<String, GovcheckError> {
        let envelope = Envelope {
            generated_at: Utc::now().to_rfc3339(),
            summary: &report.summary,
            results: &report.results,
        };
        let mut out = if self.pretty {
            serde_json::to_string_pretty(&envelope)
        } else {
            serde_json::to_string(&envelope)
        }
        .map_err(InfrastructureError::from)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::reporters::fixtures;

    #[test]
    fn test_json_layout() -> anyhow::Result<()> {
        let out = JsonRenderer { pretty: false }.render(&fixtures::report(), RenderOptions::default())?;
        let value: serde_json::Value = serde_json::from_str(&out)?;

        assert_eq!(value["summary"]["total_models_checked"], 2);
        assert_eq!(value["summary"]["errors"], 1);
        assert_eq!(value["summary"]["success"], false);
        assert_eq!(value["results"].as_array().map(Vec::len), Some(3));
        assert_eq!(value["results"][0]["rule_name"], "require_owner");
        assert_eq!(value["results"][0]["severity"], "error");
        assert!(value["generated_at"].is_string());
        Ok(())
    }
}
