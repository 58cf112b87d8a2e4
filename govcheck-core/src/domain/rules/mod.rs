// govcheck-core/src/domain/rules/mod.rs
//
// A rule is a pure check over one model and its merged governance status.
// Parameters are bound when the rule is built (see `registry`), so
// `evaluate` never sees raw configuration.

pub mod conventions;
pub mod documentation;
pub mod lineage;
pub mod ownership;
pub mod registry;

use serde_json::Value;
use std::collections::BTreeMap;

use crate::domain::error::RuleFault;
use crate::domain::governance::{CatalogResolution, GovernanceStatus, StatusMap};
use crate::domain::graph::{Entity, ModelGraph};

pub use registry::{RuleConstructor, RuleDescriptor, RuleRegistry};

/// Everything a rule may read while evaluating one model.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub entity: &'a Entity,
    pub status: &'a GovernanceStatus,
    pub graph: &'a ModelGraph,
    pub statuses: &'a StatusMap,
}

impl<'a> RuleContext<'a> {
    /// In-graph upstream models with their status (if one was resolved).
    /// External references (sources, seeds) are skipped.
    pub fn upstream_statuses(&self) -> impl Iterator<Item = (&'a str, Option<&'a GovernanceStatus>)> + use<'a> {
        let graph = self.graph;
        let statuses = self.statuses;
        self.entity
            .upstream()
            .iter()
            .filter(move |id| graph.contains(id))
            .map(move |id| (id.as_str(), statuses.get(id)))
    }
}

/// One check emitted by a rule. The engine stamps the rule id, the model
/// id and the effective severity to turn it into a `ValidationResult`.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOutcome {
    pub passed: bool,
    pub message: String,
    pub remediation: Option<String>,
    pub details: BTreeMap<String, Value>,
}

impl CheckOutcome {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            passed: true,
            message: message.into(),
            remediation: None,
            details: BTreeMap::new(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            passed: false,
            ..Self::pass(message)
        }
    }

    pub fn with_remediation(mut self, hint: impl Into<String>) -> Self {
        self.remediation = Some(hint.into());
        self
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.details.insert(key.to_string(), value.into());
        self
    }
}

pub trait Rule: Send + Sync {
    /// Zero outcomes means the rule does not apply to this model.
    fn evaluate(&self, ctx: &RuleContext<'_>) -> Result<Vec<CheckOutcome>, RuleFault>;
}

/// Why a catalog-backed field is missing, when the catalog could not answer.
pub(crate) fn catalog_gap(status: &GovernanceStatus) -> Option<String> {
    match &status.resolution {
        CatalogResolution::Resolved => None,
        CatalogResolution::NotFound => Some(format!("dataset not found in catalog ({})", status.urn)),
        CatalogResolution::LookupError { reason } => Some(format!("catalog lookup failed ({reason})")),
    }
}

/// Comma-separated preview of at most `limit` names.
pub(crate) fn preview(names: &[String], limit: usize) -> String {
    let mut out = names.iter().take(limit).cloned().collect::<Vec<_>>().join(", ");
    if names.len() > limit {
        out.push_str("...");
    }
    out
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::domain::governance::{CatalogRecord, LookupOutcome};
    use crate::domain::graph::EntityRecord;

    /// Graph + statuses fixture shared by the rule tests.
    pub struct Fixture {
        pub graph: ModelGraph,
        pub statuses: StatusMap,
    }

    impl Fixture {
        pub fn new(records: Vec<EntityRecord>) -> anyhow::Result<Self> {
            let graph = ModelGraph::from_records(records)?;
            let statuses = graph
                .entities()
                .iter()
                .map(|e| {
                    let status = GovernanceStatus::merge(e, format!("urn:{}", e.id), LookupOutcome::NotFound);
                    (e.id.clone(), status)
                })
                .collect();
            Ok(Self { graph, statuses })
        }

        pub fn with_catalog(mut self, id: &str, record: CatalogRecord) -> anyhow::Result<Self> {
            let entity = self.graph.get(id)?;
            let status = GovernanceStatus::merge(entity, format!("urn:{id}"), LookupOutcome::Found(record));
            self.statuses.insert(id.to_string(), status);
            Ok(self)
        }

        pub fn with_outcome(mut self, id: &str, outcome: LookupOutcome) -> anyhow::Result<Self> {
            let entity = self.graph.get(id)?;
            let status = GovernanceStatus::merge(entity, format!("urn:{id}"), outcome);
            self.statuses.insert(id.to_string(), status);
            Ok(self)
        }

        pub fn eval(&self, rule: &dyn Rule, id: &str) -> anyhow::Result<Vec<CheckOutcome>> {
            let ctx = RuleContext {
                entity: self.graph.get(id)?,
                status: &self.statuses[id],
                graph: &self.graph,
                statuses: &self.statuses,
            };
            Ok(rule.evaluate(&ctx)?)
        }
    }

    pub fn owned(owner: &str) -> CatalogRecord {
        CatalogRecord {
            owners: vec![owner.to_string()],
            ..Default::default()
        }
    }
}
