// govcheck-core/src/application/resolver.rs

use futures::StreamExt;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::domain::catalog::UrnMapper;
use crate::domain::governance::{GovernanceStatus, LookupOutcome, StatusMap};
use crate::domain::graph::Entity;
use crate::ports::catalog::CatalogSource;

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Merges declared metadata with catalog metadata, one status per model.
pub struct StatusResolver {
    catalog: Arc<dyn CatalogSource>,
    mapper: UrnMapper,
    concurrency: usize,
}

impl StatusResolver {
    pub fn new(catalog: Arc<dyn CatalogSource>, mapper: UrnMapper) -> Self {
        Self {
            catalog,
            mapper,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub async fn resolve(&self, entity: &Entity) -> GovernanceStatus {
        let dataset = self.mapper.dataset_ref(entity);
        let urn = dataset.urn();

        let outcome = match self.catalog.lookup(&dataset).await {
            Ok(Some(record)) => LookupOutcome::Found(record),
            Ok(None) => {
                debug!(model = %entity.id, %urn, "dataset not found in catalog");
                LookupOutcome::NotFound
            }
            Err(e) => {
                warn!(model = %entity.id, %urn, error = %e, "catalog lookup failed");
                LookupOutcome::Failed(e.to_string())
            }
        };

        GovernanceStatus::merge(entity, urn, outcome)
    }

    /// Resolves a batch with at most `concurrency` lookups in flight.
    /// Every entity gets exactly one entry, keyed by its id.
    #[instrument(skip_all, fields(models = entities.len(), catalog = %self.catalog.describe()))]
    pub async fn resolve_all(&self, entities: &[&Entity]) -> StatusMap {
        futures::stream::iter(entities.iter().copied())
            .map(|entity| async move { (entity.id.clone(), self.resolve(entity).await) })
            .buffer_unordered(self.concurrency)
            .collect()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::governance::{CatalogRecord, CatalogResolution};
    use crate::domain::graph::{EntityRecord, ModelGraph};
    use crate::ports::catalog::{CatalogError, DatasetRef};
    use async_trait::async_trait;

    /// Knows `dim_customers`, fails for `stg_orders`, ignores everything else.
    struct StubCatalog;

    #[async_trait]
    impl CatalogSource for StubCatalog {
        async fn lookup(&self, dataset: &DatasetRef) -> Result<Option<CatalogRecord>, CatalogError> {
            match dataset.entity_id.as_str() {
                "dim_customers" => Ok(Some(CatalogRecord {
                    owners: vec!["urn:li:corpuser:jane".into()],
                    description: Some("From the catalog".into()),
                    ..Default::default()
                })),
                "stg_orders" => Err(CatalogError::Transport("connection refused".into())),
                _ => Ok(None),
            }
        }

        fn describe(&self) -> String {
            "stub".into()
        }
    }

    fn graph() -> anyhow::Result<ModelGraph> {
        Ok(ModelGraph::from_records(vec![
            EntityRecord::new("dim_customers")
                .with_location(Some("analytics"), "core")
                .with_description("Declared"),
            EntityRecord::new("stg_orders").with_location(None, "staging"),
            EntityRecord::new("stg_customers")
                .with_location(None, "staging")
                .with_description("Declared customers"),
        ])?)
    }

    #[tokio::test]
    async fn test_resolve_all_covers_every_entity() -> anyhow::Result<()> {
        let graph = graph()?;
        let resolver = StatusResolver::new(Arc::new(StubCatalog), UrnMapper::new("snowflake", "PROD", None))
            .with_concurrency(2);
        let entities: Vec<&Entity> = graph.entities().iter().collect();

        let statuses = resolver.resolve_all(&entities).await;
        assert_eq!(statuses.len(), 3);

        let customers = &statuses["dim_customers"];
        assert!(customers.is_resolved());
        assert_eq!(customers.description.as_deref(), Some("From the catalog"));
        assert_eq!(
            customers.urn,
            "urn:li:dataset:(urn:li:dataPlatform:snowflake,ANALYTICS.CORE.DIM_CUSTOMERS,PROD)"
        );

        let orders = &statuses["stg_orders"];
        assert!(matches!(orders.resolution, CatalogResolution::LookupError { ref reason } if reason.contains("connection refused")));
        assert!(!orders.has_owner());

        let staging = &statuses["stg_customers"];
        assert_eq!(staging.resolution, CatalogResolution::NotFound);
        assert_eq!(staging.description.as_deref(), Some("Declared customers"));
        Ok(())
    }
}
