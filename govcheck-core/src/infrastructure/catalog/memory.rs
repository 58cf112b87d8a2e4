// govcheck-core/src/infrastructure/catalog/memory.rs

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

use crate::domain::governance::CatalogRecord;
use crate::domain::graph::ModelGraph;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_file;
use crate::ports::catalog::{CatalogError, CatalogSource, DatasetRef};

/// Owner assigned to every model in dry-run mode.
pub const DRY_RUN_OWNER: &str = "urn:li:corpuser:dry-run-owner";

/// Catalog held in memory. Entries are keyed by dataset URN, by model name or
/// by qualified dataset name; lookups try them in that order.
///
/// Backs `--dry-run`, `--catalog-snapshot` and the test suites.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    records: HashMap<String, CatalogRecord>,
    failures: HashMap<String, String>,
    label: String,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            label: "in-memory catalog".into(),
            ..Default::default()
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, record: CatalogRecord) {
        self.records.insert(key.into(), record);
    }

    pub fn with_record(mut self, key: impl Into<String>, record: CatalogRecord) -> Self {
        self.insert(key, record);
        self
    }

    /// Makes every lookup of `key` fail with a transport error.
    pub fn with_failure(mut self, key: impl Into<String>, reason: impl Into<String>) -> Self {
        self.failures.insert(key.into(), reason.into());
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Synthetic catalog: every model is owned, keeps its declared
    /// description and tags, and nothing is deprecated.
    pub fn dry_run(graph: &ModelGraph) -> Self {
        let records = graph
            .entities()
            .iter()
            .map(|e| {
                let record = CatalogRecord {
                    owners: vec![DRY_RUN_OWNER.to_string()],
                    tags: e.tags.clone(),
                    description: e.declared_description().map(String::from),
                    ..Default::default()
                };
                (e.id.clone(), record)
            })
            .collect();
        Self {
            records,
            failures: HashMap::new(),
            label: "dry-run catalog".into(),
        }
    }

    /// Loads a JSON object of `key -> CatalogRecord`.
    pub fn from_snapshot_file(path: &Path) -> Result<Self, InfrastructureError> {
        let content = read_file(path)?;
        let records: HashMap<String, CatalogRecord> = serde_json::from_str(&content)?;
        info!(path = %path.display(), datasets = records.len(), "Loaded catalog snapshot");
        Ok(Self {
            records,
            failures: HashMap::new(),
            label: format!("snapshot {}", path.display()),
        })
    }

    fn find(&self, keys: &[&str]) -> Option<&CatalogRecord> {
        keys.iter().find_map(|k| self.records.get(*k))
    }
}

#[async_trait]
impl CatalogSource for InMemoryCatalog {
    async fn lookup(&self, dataset: &DatasetRef) -> Result<Option<CatalogRecord>, CatalogError> {
        let urn = dataset.urn();
        let keys = [urn.as_str(), dataset.entity_id.as_str(), dataset.name.as_str()];

        if let Some(reason) = keys.iter().find_map(|k| self.failures.get(*k)) {
            return Err(CatalogError::Transport(reason.clone()));
        }
        Ok(self.find(&keys).cloned())
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::catalog::UrnMapper;
    use crate::domain::graph::EntityRecord;
    use anyhow::Result;
    use std::fs;

    fn graph() -> Result<ModelGraph> {
        Ok(ModelGraph::from_records(vec![
            EntityRecord::new("stg_orders")
                .with_location(None, "staging")
                .with_description("Orders")
                .with_tags(["staging"]),
        ])?)
    }

    #[tokio::test]
    async fn test_lookup_by_urn_or_model_name() -> Result<()> {
        let graph = graph()?;
        let mapper = UrnMapper::new("postgres", "PROD", None);
        let dataset = mapper.dataset_ref(graph.get("stg_orders")?);

        let by_urn = InMemoryCatalog::new().with_record(dataset.urn(), CatalogRecord::default());
        assert!(by_urn.lookup(&dataset).await?.is_some());

        let by_name = InMemoryCatalog::new().with_record("stg_orders", CatalogRecord::default());
        assert!(by_name.lookup(&dataset).await?.is_some());

        assert!(InMemoryCatalog::new().lookup(&dataset).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_dry_run_owns_everything() -> Result<()> {
        let graph = graph()?;
        let catalog = InMemoryCatalog::dry_run(&graph);
        let dataset = UrnMapper::new("snowflake", "PROD", None).dataset_ref(graph.get("stg_orders")?);

        let record = catalog.lookup(&dataset).await?.unwrap();
        assert_eq!(record.owners, [DRY_RUN_OWNER]);
        assert_eq!(record.description.as_deref(), Some("Orders"));
        assert_eq!(record.tags, ["staging"]);
        assert!(!record.deprecated);
        Ok(())
    }

    #[tokio::test]
    async fn test_configured_failure() -> Result<()> {
        let graph = graph()?;
        let catalog = InMemoryCatalog::new().with_failure("stg_orders", "connection reset");
        let dataset = UrnMapper::new("snowflake", "PROD", None).dataset_ref(graph.get("stg_orders")?);
        let err = catalog.lookup(&dataset).await.unwrap_err();
        assert_eq!(err, CatalogError::Transport("connection reset".into()));
        Ok(())
    }

    #[test]
    fn test_snapshot_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("snapshot.json");
        fs::write(
            &path,
            r#"{ "stg_orders": { "owners": ["urn:li:corpuser:jane"], "deprecated": true } }"#,
        )?;
        let catalog = InMemoryCatalog::from_snapshot_file(&path)?;
        assert_eq!(catalog.len(), 1);
        assert!(catalog.describe().starts_with("snapshot"));
        Ok(())
    }
}
