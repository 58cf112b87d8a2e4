// govcheck-core/src/application/engine.rs

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde_json::Value;
use std::any::Any;
use std::cell::Cell;
use std::collections::BTreeMap;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;
use tracing::{debug, instrument, warn};

use crate::domain::catalog::UrnMapper;
use crate::domain::error::ConfigError;
use crate::domain::governance::{
    GovernanceConfig, GovernanceStatus, LookupOutcome, Severity, StatusMap, ValidationReport,
    ValidationResult,
};
use crate::domain::graph::{Entity, ModelGraph};
use crate::domain::rules::{CheckOutcome, Rule, RuleContext, RuleRegistry};

struct ConfiguredRule {
    id: &'static str,
    severity: Severity,
    rule: Box<dyn Rule>,
}

/// Runs every enabled rule against every selected model.
///
/// Built from a registry and a configuration; all configuration errors
/// (unknown rules, bad parameters, bad patterns) surface in [`RuleEngine::new`].
pub struct RuleEngine {
    rules: Vec<ConfiguredRule>,
    include: GlobSet,
    exclude: GlobSet,
    fail_on_warnings: bool,
    urns: UrnMapper,
}

fn build_globset(patterns: &[String]) -> Result<GlobSet, ConfigError> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.clone(),
            reason: e.kind().to_string(),
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|e| ConfigError::InvalidPattern {
        pattern: patterns.join(", "),
        reason: e.to_string(),
    })
}

thread_local! {
    static EVALUATING_RULE: Cell<bool> = const { Cell::new(false) };
}

static RULE_PANIC_HOOK: Once = Once::new();

// Panics raised while a rule runs on this thread are reported through the
// engine's results and logs; every other panic goes to the previous hook.
fn install_rule_panic_hook() {
    RULE_PANIC_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !evaluating_rule() {
                previous(info);
            }
        }));
    });
}

fn evaluating_rule() -> bool {
    EVALUATING_RULE.with(Cell::get)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "rule panicked".to_string()
    }
}

impl RuleEngine {
    pub fn new(registry: &RuleRegistry, config: &GovernanceConfig) -> Result<Self, ConfigError> {
        // Every configured id must exist, even for disabled rules.
        if let Some(unknown) = config.rules.keys().find(|id| registry.get(id).is_none()) {
            return Err(registry.unknown_rule(unknown));
        }

        let mut rules = Vec::new();
        for descriptor in registry.descriptors() {
            let Some(rule_config) = config.rules.get(descriptor.id) else {
                continue;
            };
            if !rule_config.enabled {
                continue;
            }
            rules.push(ConfiguredRule {
                id: descriptor.id,
                severity: rule_config.severity.unwrap_or(descriptor.default_severity),
                rule: (descriptor.build)(&rule_config.params)?,
            });
        }

        Ok(Self {
            rules,
            include: build_globset(&config.include_patterns)?,
            exclude: build_globset(&config.exclude_patterns)?,
            fail_on_warnings: config.fail_on_warnings,
            urns: UrnMapper::from_config(config),
        })
    }

    /// Enabled rule ids, in evaluation order.
    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id).collect()
    }

    /// Exclude patterns always win over include patterns. A pattern matches
    /// either the model name or its source path.
    pub fn is_selected(&self, entity: &Entity) -> bool {
        let matches = |set: &GlobSet| {
            set.is_match(&entity.id) || (!entity.path.is_empty() && set.is_match(&entity.path))
        };
        if matches(&self.exclude) {
            return false;
        }
        matches(&self.include)
    }

    pub fn filter<'a>(&self, entities: &'a [Entity]) -> Vec<&'a Entity> {
        entities.iter().filter(|e| self.is_selected(e)).collect()
    }

    /// Evaluates `entities` in order; within a model, rules run in
    /// registration order. Deterministic for identical inputs.
    #[instrument(skip_all, fields(models = entities.len(), rules = self.rules.len()))]
    pub fn run(&self, entities: &[&Entity], graph: &ModelGraph, statuses: &StatusMap) -> ValidationReport {
        let mut results = Vec::new();

        for &entity in entities {
            let fallback;
            let status = match statuses.get(&entity.id) {
                Some(status) => status,
                None => {
                    warn!(model = %entity.id, "no governance status supplied, treating as not found");
                    fallback = GovernanceStatus::merge(entity, self.urns.urn(entity), LookupOutcome::NotFound);
                    &fallback
                }
            };

            let ctx = RuleContext {
                entity,
                status,
                graph,
                statuses,
            };

            for configured in &self.rules {
                self.evaluate_one(configured, &ctx, &mut results);
            }
        }

        debug!(results = results.len(), "evaluation finished");
        ValidationReport::new(results, entities.len(), self.fail_on_warnings)
    }

    fn evaluate_one(&self, configured: &ConfiguredRule, ctx: &RuleContext<'_>, results: &mut Vec<ValidationResult>) {
        let stamp = |outcome: CheckOutcome| ValidationResult {
            rule_id: configured.id.to_string(),
            entity_id: ctx.entity.id.clone(),
            passed: outcome.passed,
            severity: configured.severity,
            message: outcome.message,
            remediation: outcome.remediation,
            details: outcome.details,
        };

        install_rule_panic_hook();
        EVALUATING_RULE.with(|flag| flag.set(true));
        let evaluated = panic::catch_unwind(AssertUnwindSafe(|| configured.rule.evaluate(ctx)));
        EVALUATING_RULE.with(|flag| flag.set(false));

        let fault = match evaluated {
            Ok(Ok(outcomes)) => {
                results.extend(outcomes.into_iter().map(stamp));
                return;
            }
            Ok(Err(fault)) => fault.to_string(),
            Err(payload) => panic_message(payload.as_ref()),
        };

        warn!(rule = configured.id, model = %ctx.entity.id, error = %fault, "rule execution failed");
        results.push(ValidationResult {
            rule_id: configured.id.to_string(),
            entity_id: ctx.entity.id.clone(),
            passed: false,
            severity: Severity::Error,
            message: format!("Rule execution error: {fault}"),
            remediation: None,
            details: BTreeMap::from([("error".to_string(), Value::String(fault))]),
        });
    }
}
