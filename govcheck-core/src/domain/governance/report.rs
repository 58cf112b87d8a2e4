// govcheck-core/src/domain/governance/report.rs

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::severity::Severity;

/// One check produced for a (rule, model) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    #[serde(rename = "rule_name")]
    pub rule_id: String,
    #[serde(rename = "model_name")]
    pub entity_id: String,
    pub passed: bool,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
    #[serde(default)]
    pub details: BTreeMap<String, serde_json::Value>,
}

impl ValidationResult {
    pub fn is_error(&self) -> bool {
        !self.passed && self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        !self.passed && self.severity == Severity::Warning
    }

    pub fn is_info(&self) -> bool {
        !self.passed && self.severity == Severity::Info
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    #[serde(rename = "total_models_checked")]
    pub entities_checked: usize,
    pub total_checks: usize,
    pub passed: usize,
    pub errors: usize,
    pub warnings: usize,
    pub infos: usize,
    pub success: bool,
}

impl Summary {
    /// Fold over the produced results.
    pub fn from_results(
        results: &[ValidationResult],
        entities_checked: usize,
        fail_on_warnings: bool,
    ) -> Self {
        let mut summary = results.iter().fold(
            Summary {
                entities_checked,
                ..Default::default()
            },
            |mut acc, r| {
                acc.total_checks += 1;
                match (r.passed, r.severity) {
                    (true, _) => acc.passed += 1,
                    (false, Severity::Error) => acc.errors += 1,
                    (false, Severity::Warning) => acc.warnings += 1,
                    (false, Severity::Info) => acc.infos += 1,
                }
                acc
            },
        );
        summary.success = summary.errors == 0 && (!fail_on_warnings || summary.warnings == 0);
        summary
    }

    pub fn failed(&self) -> usize {
        self.total_checks - self.passed
    }
}

/// Complete, ordered output of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub summary: Summary,
    pub results: Vec<ValidationResult>,
}

impl ValidationReport {
    pub fn new(results: Vec<ValidationResult>, entities_checked: usize, fail_on_warnings: bool) -> Self {
        let summary = Summary::from_results(&results, entities_checked, fail_on_warnings);
        Self { summary, results }
    }

    pub fn is_successful(&self) -> bool {
        self.summary.success
    }

    pub fn errors(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_warning())
    }

    pub fn infos(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.is_info())
    }

    pub fn passed(&self) -> impl Iterator<Item = &ValidationResult> {
        self.results.iter().filter(|r| r.passed)
    }

    pub fn results_for<'a>(&'a self, entity_id: &'a str) -> impl Iterator<Item = &'a ValidationResult> {
        self.results.iter().filter(move |r| r.entity_id == entity_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(passed: bool, severity: Severity) -> ValidationResult {
        ValidationResult {
            rule_id: "require_owner".into(),
            entity_id: "stg_orders".into(),
            passed,
            severity,
            message: "msg".into(),
            remediation: None,
            details: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result(true, Severity::Error),
            result(false, Severity::Error),
            result(false, Severity::Warning),
            result(false, Severity::Info),
        ];
        let report = ValidationReport::new(results, 1, false);
        let s = &report.summary;
        assert_eq!(s.total_checks, 4);
        assert_eq!(s.passed, 1);
        assert_eq!((s.errors, s.warnings, s.infos), (1, 1, 1));
        assert_eq!(s.failed(), 3);
        assert!(!s.success);
    }

    #[test]
    fn test_warnings_only_fail_when_requested() {
        let results = vec![result(true, Severity::Error), result(false, Severity::Warning)];
        assert!(ValidationReport::new(results.clone(), 1, false).is_successful());
        assert!(!ValidationReport::new(results, 1, true).is_successful());
    }

    #[test]
    fn test_empty_report_is_successful() {
        let report = ValidationReport::new(vec![], 0, true);
        assert!(report.is_successful());
        assert_eq!(report.summary.total_checks, 0);
    }

    #[test]
    fn test_json_field_names() -> anyhow::Result<()> {
        let report = ValidationReport::new(vec![result(false, Severity::Warning)], 1, false);
        let value = serde_json::to_value(&report)?;
        assert_eq!(value["summary"]["total_models_checked"], 1);
        assert_eq!(value["results"][0]["rule_name"], "require_owner");
        assert_eq!(value["results"][0]["model_name"], "stg_orders");
        assert_eq!(value["results"][0]["severity"], "warning");
        assert!(value["results"][0].get("remediation").is_none());
        Ok(())
    }
}
