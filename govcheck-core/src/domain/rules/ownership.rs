// govcheck-core/src/domain/rules/ownership.rs
//
// Accountability rules: who owns a model, which domain it belongs to, and
// whether the models it reads from are owned too.

use serde_json::json;

use super::registry::RuleDescriptor;
use super::{CheckOutcome, Rule, RuleContext, catalog_gap};
use crate::domain::error::{ConfigError, RuleFault};
use crate::domain::governance::{CatalogResolution, RuleParams, Severity};

pub const REQUIRE_OWNER: RuleDescriptor = RuleDescriptor {
    id: "require_owner",
    description: "All models must have an owner assigned in the catalog",
    default_severity: Severity::Error,
    build: RequireOwner::build,
};

pub const REQUIRE_DOMAIN: RuleDescriptor = RuleDescriptor {
    id: "require_domain",
    description: "All models should be assigned to a domain in the catalog",
    default_severity: Severity::Warning,
    build: RequireDomain::build,
};

pub const UPSTREAM_MUST_HAVE_OWNER: RuleDescriptor = RuleDescriptor {
    id: "upstream_must_have_owner",
    description: "Upstream dependencies should have owners",
    default_severity: Severity::Warning,
    build: UpstreamMustHaveOwner::build,
};

pub struct RequireOwner;

impl RequireOwner {
    fn build(_params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(Box::new(Self))
    }
}

impl Rule for RequireOwner {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let status = ctx.status;

        if status.has_owner() {
            return Ok(vec![
                CheckOutcome::pass(format!("Model has owner(s): {}", status.owners.join(", ")))
                    .with_detail("owners", status.owners.clone()),
            ]);
        }

        let outcome = match catalog_gap(status) {
            Some(gap) => CheckOutcome::fail(format!("Model has no owner: {gap}"))
                .with_detail("reason", status.resolution.as_str()),
            None => CheckOutcome::fail("Model does not have an owner assigned in the catalog"),
        };
        Ok(vec![
            outcome
                .with_detail("urn", status.urn.as_str())
                .with_remediation("Assign an owner to the dataset in the catalog"),
        ])
    }
}

pub struct RequireDomain;

impl RequireDomain {
    fn build(_params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(Box::new(Self))
    }
}

impl Rule for RequireDomain {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let status = ctx.status;

        if let Some(domain) = &status.domain {
            return Ok(vec![
                CheckOutcome::pass(format!("Model is assigned to domain: {domain}"))
                    .with_detail("domain", domain.as_str()),
            ]);
        }

        let outcome = match catalog_gap(status) {
            Some(gap) => CheckOutcome::fail(format!("Model has no domain: {gap}"))
                .with_detail("reason", status.resolution.as_str()),
            None => CheckOutcome::fail("Model is not assigned to any domain in the catalog"),
        };
        Ok(vec![
            outcome
                .with_detail("urn", status.urn.as_str())
                .with_remediation("Assign the dataset to a domain in the catalog"),
        ])
    }
}

pub struct UpstreamMustHaveOwner;

impl UpstreamMustHaveOwner {
    fn build(_params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        Ok(Box::new(Self))
    }
}

impl Rule for UpstreamMustHaveOwner {
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault> {
        let mut checked = 0usize;
        let mut failures = Vec::new();

        for (upstream, status) in ctx.upstream_statuses() {
            checked += 1;
            let reason = match status {
                Some(s) if s.has_owner() => continue,
                Some(s) => match &s.resolution {
                    CatalogResolution::Resolved => "no owner assigned",
                    CatalogResolution::NotFound => "not found in catalog",
                    CatalogResolution::LookupError { .. } => "catalog lookup failed",
                },
                None => "governance status unavailable",
            };
            failures.push(
                CheckOutcome::fail(format!("Upstream dependency '{upstream}' has no owner ({reason})"))
                    .with_detail("upstream", upstream)
                    .with_detail("urn", json!(status.map(|s| s.urn.as_str())))
                    .with_remediation(format!("Assign an owner to '{upstream}' in the catalog")),
            );
        }

        if failures.is_empty() {
            return Ok(vec![
                CheckOutcome::pass("All upstream dependencies have owners")
                    .with_detail("checked_dependencies", checked),
            ]);
        }
        Ok(failures)
    }
}
