// govcheck-core/src/domain/rules/conventions.rs

use regex::Regex;

use super::registry::RuleDescriptor;
use super::{CheckOutcome, Rule, RuleContext, preview};
use crate::domain::error::{ConfigError, RuleFault};
use crate::domain::governance::{RuleParams, Severity};

pub const NAMING_CONVENTION: RuleDescriptor = RuleDescriptor {
    id: "naming_convention",
    description: "Model names should follow the layer prefix convention (stg_, int_, dim_, fct_...)",
    default_severity: Severity::Warning,
    build: NamingConvention::build,
};

pub const REQUIRE_MATERIALIZATION: RuleDescriptor = RuleDescriptor {
    id: "require_materialization",
    description: "Models should have an explicit materialization configured",
    default_severity: Severity::Info,
    build: RequireMaterialization::build,
};

pub const REQUIRE_PII_TAG: RuleDescriptor = RuleDescriptor {
    id: "require_pii_tag",
    description: "Models with PII columns must carry the PII tag",
    default_severity: Severity::Error,
    build: RequirePiiTag::build,
};

const DEFAULT_NAMING_PATTERN: &str = "^(stg|int|dim|fct|rpt|base|raw)_";

const DEFAULT_PII_INDICATORS: &[&str] = &["email", "phone", "ssn", "address", "name", "dob", "birth"];

const DEFAULT_PII_TAG: &str = "pii";

fn lowercase_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|v| v.into_iter().map(|s| s.trim().to_lowercase()).collect())
}

// --- naming_convention ---

pub struct NamingConvention {
    pattern: Regex,
    /// Only models with one of these materializations are checked.
    materializations: Option<Vec<String>>,
}

impl NamingConvention {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(NAMING_CONVENTION.id);
        let raw = reader
            .string("pattern")?
            .unwrap_or_else(|| DEFAULT_NAMING_PATTERN.to_string());
        let pattern = Regex::new(&raw).map_err(|e| ConfigError::InvalidPattern {
            pattern: raw.clone(),
            reason: e.to_string(),
        })?;
        let materializations = lowercase_list(reader.string_list("materializations")?);
        Ok(Box::new(Self {
            pattern,
            materializations,
        }))
    }
}

impl Rule for NamingConvention {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let entity = ctx.entity;

        if let Some(allowed) = &self.materializations {
            let applies = entity
                .materialization
                .as_ref()
                .is_some_and(|m| allowed.iter().any(|a| a == m.as_str()));
            if !applies {
                return Ok(Vec::new());
            }
        }

        let pattern = self.pattern.as_str();
        if self.pattern.is_match(&entity.id) {
            return Ok(vec![
                CheckOutcome::pass(format!("Model name matches naming pattern '{pattern}'"))
                    .with_detail("pattern", pattern),
            ]);
        }

        Ok(vec![
            CheckOutcome::fail(format!(
                "Model name '{}' does not match naming pattern '{pattern}'",
                entity.id
            ))
            .with_detail("pattern", pattern)
            .with_detail("model_name", entity.id.as_str())
            .with_remediation(format!("Rename the model so that it matches '{pattern}'")),
        ])
    }
}

// --- require_materialization ---

pub struct RequireMaterialization {
    allowed: Option<Vec<String>>,
}

impl RequireMaterialization {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(REQUIRE_MATERIALIZATION.id);
        let allowed = lowercase_list(reader.string_list("allowed")?);
        if allowed.as_ref().is_some_and(Vec::is_empty) {
            return Err(reader.invalid_param("allowed", "list cannot be empty"));
        }
        Ok(Box::new(Self { allowed }))
    }
}

impl Rule for RequireMaterialization {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let Some(materialization) = &ctx.entity.materialization else {
            return Ok(vec![
                CheckOutcome::fail("Model does not have explicit materialization configured")
                    .with_remediation("Set `materialized` in the model config"),
            ]);
        };

        if let Some(allowed) = &self.allowed {
            if !allowed.iter().any(|a| a == materialization.as_str()) {
                return Ok(vec![
                    CheckOutcome::fail(format!(
                        "Materialization '{materialization}' is not allowed (expected: {})",
                        allowed.join(", ")
                    ))
                    .with_detail("materialization", materialization.as_str())
                    .with_detail("allowed", allowed.clone()),
                ]);
            }
        }

        Ok(vec![
            CheckOutcome::pass(format!("Model has materialization: {materialization}"))
                .with_detail("materialization", materialization.as_str()),
        ])
    }
}

// --- require_pii_tag ---

pub struct RequirePiiTag {
    indicators: Vec<String>,
    tag: String,
}

impl RequirePiiTag {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(REQUIRE_PII_TAG.id);
        let indicators = lowercase_list(reader.string_list("indicators")?)
            .unwrap_or_else(|| DEFAULT_PII_INDICATORS.iter().map(|s| s.to_string()).collect());
        let tag = reader
            .string("tag")?
            .map(|t| t.trim().to_string())
            .unwrap_or_else(|| DEFAULT_PII_TAG.to_string());
        if tag.is_empty() {
            return Err(reader.invalid_param("tag", "tag cannot be empty"));
        }
        Ok(Box::new(Self { indicators, tag }))
    }
}

impl Rule for RequirePiiTag {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let pii_columns: Vec<String> = ctx
            .entity
            .columns
            .iter()
            .filter(|c| {
                let name = c.name.to_lowercase();
                c.pii || self.indicators.iter().any(|i| name.contains(i.as_str()))
            })
            .map(|c| c.name.clone())
            .collect();

        if pii_columns.is_empty() {
            return Ok(Vec::new());
        }

        if ctx.status.has_tag(&self.tag) {
            return Ok(vec![
                CheckOutcome::pass(format!("Model with PII columns is tagged '{}'", self.tag))
                    .with_detail("pii_columns", pii_columns),
            ]);
        }

        Ok(vec![
            CheckOutcome::fail(format!(
                "Model has PII columns ({}) but is not tagged with '{}'",
                preview(&pii_columns, 3),
                self.tag
            ))
            .with_detail("pii_columns", pii_columns)
            .with_detail("current_tags", ctx.status.tags.clone())
            .with_remediation(format!("Add the '{}' tag to the model", self.tag)),
        ])
    }
}
