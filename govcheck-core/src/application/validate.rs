// govcheck-core/src/application/validate.rs
//
// The `validate` use case: graph -> statuses -> rules -> report.

use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::application::engine::RuleEngine;
use crate::application::resolver::{DEFAULT_CONCURRENCY, StatusResolver};
use crate::domain::catalog::UrnMapper;
use crate::domain::governance::{GovernanceConfig, ValidationReport};
use crate::domain::graph::{Entity, ModelGraph};
use crate::domain::rules::RuleRegistry;
use crate::error::GovcheckError;
use crate::ports::catalog::CatalogSource;

pub struct ValidationRequest<'a> {
    pub graph: &'a ModelGraph,
    pub config: &'a GovernanceConfig,
    pub registry: &'a RuleRegistry,
    pub catalog: Arc<dyn CatalogSource>,
    /// Validate this model only, bypassing include/exclude patterns.
    pub select: Option<String>,
    pub concurrency: usize,
}

impl<'a> ValidationRequest<'a> {
    pub fn new(
        graph: &'a ModelGraph,
        config: &'a GovernanceConfig,
        registry: &'a RuleRegistry,
        catalog: Arc<dyn CatalogSource>,
    ) -> Self {
        Self {
            graph,
            config,
            registry,
            catalog,
            select: None,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn select(mut self, model: Option<String>) -> Self {
        self.select = model;
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }
}

/// Selected models plus their in-graph parents: upstream rules read the
/// parents' statuses.
fn lookup_set<'g>(graph: &'g ModelGraph, targets: &[&'g Entity]) -> Result<Vec<&'g Entity>, GovcheckError> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for &entity in targets {
        if seen.insert(entity.id.as_str()) {
            out.push(entity);
        }
    }
    for &entity in targets {
        for parent in graph.resolved_upstream(&entity.id)? {
            if seen.insert(parent.id.as_str()) {
                out.push(parent);
            }
        }
    }
    Ok(out)
}

#[instrument(skip_all, fields(models = request.graph.len(), select = ?request.select))]
pub async fn validate_project(request: ValidationRequest<'_>) -> Result<ValidationReport, GovcheckError> {
    let ValidationRequest {
        graph,
        config,
        registry,
        catalog,
        select,
        concurrency,
    } = request;

    // 1. Configuration (fail fast, before any catalog traffic)
    config.check()?;
    let engine = RuleEngine::new(registry, config)?;
    info!(rules = ?engine.rule_ids(), "rules enabled");

    // 2. Selection
    let targets: Vec<&Entity> = match &select {
        Some(model) => vec![graph.get(model)?],
        None => engine.filter(graph.entities()),
    };
    info!(
        selected = targets.len(),
        skipped = graph.len() - targets.len(),
        "models selected"
    );

    // 3. Enrichment (an unreachable catalog is fatal)
    catalog.test_connection().await?;
    debug!(catalog = %catalog.describe(), "catalog reachable");
    let resolver = StatusResolver::new(catalog, UrnMapper::from_config(config)).with_concurrency(concurrency);
    let to_resolve = lookup_set(graph, &targets)?;
    let statuses = resolver.resolve_all(&to_resolve).await;

    // 4. Evaluation
    let report = engine.run(&targets, graph, &statuses);
    info!(
        checks = report.summary.total_checks,
        errors = report.summary.errors,
        warnings = report.summary.warnings,
        success = report.summary.success,
        "validation finished"
    );
    Ok(report)
}
