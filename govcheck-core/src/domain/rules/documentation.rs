// govcheck-core/src/domain/rules/documentation.rs

use super::registry::RuleDescriptor;
use super::{CheckOutcome, Rule, RuleContext, preview};
use crate::domain::error::{ConfigError, RuleFault};
use crate::domain::governance::{RuleParams, Severity};

pub const REQUIRE_DESCRIPTION: RuleDescriptor = RuleDescriptor {
    id: "require_description",
    description: "All models must have a description",
    default_severity: Severity::Error,
    build: RequireDescription::build,
};

pub const REQUIRE_TAGS: RuleDescriptor = RuleDescriptor {
    id: "require_tags",
    description: "All models should have tags assigned",
    default_severity: Severity::Warning,
    build: RequireTags::build,
};

pub const REQUIRE_COLUMN_DESCRIPTIONS: RuleDescriptor = RuleDescriptor {
    id: "require_column_descriptions",
    description: "All declared columns should have descriptions",
    default_severity: Severity::Warning,
    build: RequireColumnDescriptions::build,
};

/// Longest description excerpt copied into result details.
const EXCERPT_LEN: usize = 100;

pub struct RequireDescription {
    min_length: usize,
}

impl RequireDescription {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(REQUIRE_DESCRIPTION.id);
        let min_length = reader.usize("min_length")?.unwrap_or(1).max(1);
        Ok(Box::new(Self { min_length }))
    }
}

impl Rule for RequireDescription {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let Some(description) = ctx.status.description.as_deref().map(str::trim) else {
            return Ok(vec![
                CheckOutcome::fail("Model does not have a description in dbt or the catalog")
                    .with_remediation("Add a `description` to the model's YAML properties"),
            ]);
        };

        let length = description.chars().count();
        if length < self.min_length {
            return Ok(vec![
                CheckOutcome::fail(format!(
                    "Model description is too short ({length} < {} characters)",
                    self.min_length
                ))
                .with_detail("length", length)
                .with_detail("min_length", self.min_length)
                .with_remediation("Expand the model description"),
            ]);
        }

        let source = if ctx.entity.declared_description() == Some(description) {
            "dbt"
        } else {
            "catalog"
        };
        let excerpt: String = description.chars().take(EXCERPT_LEN).collect();
        Ok(vec![
            CheckOutcome::pass(format!("Model has a description ({source})"))
                .with_detail("source", source)
                .with_detail("description", excerpt),
        ])
    }
}

pub struct RequireTags {
    required: Vec<String>,
}

impl RequireTags {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(REQUIRE_TAGS.id);
        let required = reader.string_list("required_tags")?.unwrap_or_default();
        Ok(Box::new(Self { required }))
    }
}

impl Rule for RequireTags {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let status = ctx.status;

        if status.tags.is_empty() {
            return Ok(vec![
                CheckOutcome::fail("Model does not have any tags in dbt or the catalog")
                    .with_detail("required_tags", self.required.clone())
                    .with_remediation("Add `tags` to the model config"),
            ]);
        }

        let missing: Vec<String> = self
            .required
            .iter()
            .filter(|t| !status.has_tag(t))
            .cloned()
            .collect();

        if !missing.is_empty() {
            return Ok(vec![
                CheckOutcome::fail(format!("Model is missing required tags: {}", missing.join(", ")))
                    .with_detail("missing_tags", missing)
                    .with_detail("tags", status.tags.clone()),
            ]);
        }

        Ok(vec![
            CheckOutcome::pass(format!("Model has tags: {}", status.tags.join(", ")))
                .with_detail("tags", status.tags.clone()),
        ])
    }
}

pub struct RequireColumnDescriptions;

impl RequireColumnDescriptions {
    fn build(_params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(Box::new(Self))
    }
}

impl Rule for RequireColumnDescriptions {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let columns = &ctx.entity.columns;
        if columns.is_empty() {
            return Ok(Vec::new());
        }

        let missing: Vec<String> = columns
            .iter()
            .filter(|c| !c.is_documented())
            .map(|c| c.name.clone())
            .collect();

        if missing.is_empty() {
            return Ok(vec![
                CheckOutcome::pass(format!("All {} columns have descriptions", columns.len()))
                    .with_detail("column_count", columns.len()),
            ]);
        }

        Ok(vec![
            CheckOutcome::fail(format!("Columns missing descriptions: {}", preview(&missing, 5)))
                .with_detail("missing_count", missing.len())
                .with_detail("total_columns", columns.len())
                .with_detail("missing_columns", missing)
                .with_remediation("Document every column in the model's YAML properties"),
        ])
    }
}
