// govcheck-core/src/domain/rules/lineage.rs

use serde_json::json;

use super::registry::RuleDescriptor;
use super::{CheckOutcome, Rule, RuleContext};
use crate::domain::error::{ConfigError, RuleFault};
use crate::domain::governance::{RuleParams, Severity};

pub const NO_DEPRECATED_UPSTREAM: RuleDescriptor = RuleDescriptor {
    id: "no_deprecated_upstream",
    description: "Models cannot depend on deprecated upstream datasets",
    default_severity: Severity::Error,
    build: NoDeprecatedUpstream::build,
};

pub const MAX_UPSTREAM_DEPENDENCIES: RuleDescriptor = RuleDescriptor {
    id: "max_upstream_dependencies",
    description: "Models should not have too many direct upstream dependencies",
    default_severity: Severity::Warning,
    build: MaxUpstreamDependencies::build,
};

const DEFAULT_MAX_DEPENDENCIES: usize = 10;

pub struct NoDeprecatedUpstream;

impl NoDeprecatedUpstream {
    fn build(_params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(Box::new(Self))
    }
}

impl Rule for NoDeprecatedUpstream {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let mut checked = 0usize;
        let mut failures = Vec::new();

        for (upstream, status) in ctx.upstream_statuses() {
            checked += 1;
            let Some(status) = status.filter(|s| s.deprecated) else {
                continue;
            };

            let mut message = format!("Model depends on deprecated dataset '{upstream}'");
            if let Some(note) = &status.deprecation_note {
                message.push_str(&format!(": {note}"));
            }
            failures.push(
                CheckOutcome::fail(message)
                    .with_detail("upstream", upstream)
                    .with_detail("urn", status.urn.as_str())
                    .with_detail("note", json!(status.deprecation_note))
                    .with_remediation(format!("Replace the dependency on '{upstream}' with its successor")),
            );
        }

        if failures.is_empty() {
            return Ok(vec![
                CheckOutcome::pass("No deprecated upstream dependencies found")
                    .with_detail("checked_dependencies", checked),
            ]);
        }
        Ok(failures)
    }
}

pub struct MaxUpstreamDependencies {
    max: usize,
}

impl MaxUpstreamDependencies {
    fn build(params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let reader = params.reader(MAX_UPSTREAM_DEPENDENCIES.id);
        let max = match reader.usize("max_dependencies")? {
            Some(max) => max,
            None => reader.usize("threshold")?.unwrap_or(DEFAULT_MAX_DEPENDENCIES),
        };
        Ok(Box::new(Self { max }))
    }
}

impl Rule for MaxUpstreamDependencies {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let count = ctx
            .graph
            .dependency_count(&ctx.entity.id)
            .map_err(|e| RuleFault::new(e.to_string()))?;

        if count > self.max {
            let listed: Vec<&String> = ctx.entity.upstream().iter().take(10).collect();
            return Ok(vec![
                CheckOutcome::fail(format!(
                    "Model has {count} upstream dependencies (max: {})",
                    self.max
                ))
                .with_detail("dependency_count", count)
                .with_detail("max_allowed", self.max)
                .with_detail("dependencies", json!(listed))
                .with_remediation("Split the model or introduce an intermediate model"),
            ]);
        }

        Ok(vec![
            CheckOutcome::pass(format!(
                "Model has {count} upstream dependencies (within limit of {})",
                self.max
            ))
            .with_detail("dependency_count", count)
            .with_detail("max_allowed", self.max),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::governance::{CatalogRecord, RuleConfig};
    use crate::domain::graph::EntityRecord;
    use crate::domain::rules::testing::Fixture;
    use anyhow::Result;

    fn deprecated(note: Option<&str>) -> CatalogRecord {
        CatalogRecord {
            deprecated: true,
            deprecation_note: note.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_deprecated_upstream_is_named() -> Result<()> {
        let fx = Fixture::new(vec![
            EntityRecord::new("stg_raw"),
            EntityRecord::new("dim_customers").with_upstream(["stg_raw"]),
        ])?
        .with_catalog("stg_raw", deprecated(Some("use stg_customers")))?;

        let out = fx.eval(&NoDeprecatedUpstream, "dim_customers")?;
        assert_eq!(out.len(), 1);
        assert!(!out[0].passed);
        assert!(out[0].message.contains("stg_raw"));
        assert!(out[0].message.ends_with("use stg_customers"));
        Ok(())
    }

    #[test]
    fn test_one_failure_per_deprecated_upstream() -> Result<()> {
        let fx = Fixture::new(vec![
            EntityRecord::new("stg_a"),
            EntityRecord::new("stg_b"),
            EntityRecord::new("stg_c"),
            EntityRecord::new("fct_x").with_upstream(["stg_a", "stg_b", "stg_c"]),
        ])?
        .with_catalog("stg_a", deprecated(None))?
        .with_catalog("stg_c", deprecated(None))?;

        let out = fx.eval(&NoDeprecatedUpstream, "fct_x")?;
        let named: Vec<&str> = out.iter().filter_map(|o| o.details["upstream"].as_str()).collect();
        assert_eq!(named, ["stg_a", "stg_c"]);
        Ok(())
    }

    #[test]
    fn test_clean_upstream_passes() -> Result<()> {
        let fx = Fixture::new(vec![
            EntityRecord::new("stg_a"),
            EntityRecord::new("fct_x").with_upstream(["stg_a"]),
        ])?;
        let out = fx.eval(&NoDeprecatedUpstream, "fct_x")?;
        assert_eq!(out.len(), 1);
        assert!(out[0].passed);
        Ok(())
    }

    #[test]
    fn test_dependency_threshold() -> Result<()> {
        let fx = Fixture::new(vec![
            EntityRecord::new("fct_wide").with_upstream(["a", "b", "c"]),
            EntityRecord::new("fct_narrow").with_upstream(["a", "b"]),
        ])?;
        let params = RuleConfig::enabled().with_param("threshold", 2).params;
        let rule = MaxUpstreamDependencies::build(&params)?;

        let wide = fx.eval(rule.as_ref(), "fct_wide")?;
        assert_eq!(wide.len(), 1);
        assert!(!wide[0].passed);
        assert_eq!(wide[0].message, "Model has 3 upstream dependencies (max: 2)");

        let narrow = fx.eval(rule.as_ref(), "fct_narrow")?;
        assert_eq!(narrow.len(), 1);
        assert!(narrow[0].passed);
        Ok(())
    }

    #[test]
    fn test_max_dependencies_wins_over_threshold() -> Result<()> {
        let fx = Fixture::new(vec![EntityRecord::new("fct_wide").with_upstream(["a", "b", "c"])])?;
        let params = RuleConfig::enabled()
            .with_param("max_dependencies", 5)
            .with_param("threshold", 1)
            .params;
        let rule = MaxUpstreamDependencies::build(&params)?;
        assert!(fx.eval(rule.as_ref(), "fct_wide")?[0].passed);
        Ok(())
    }
}
