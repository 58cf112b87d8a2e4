// govcheck-core/src/domain/catalog/urn.rs
//
// Maps a model's physical location to the dataset key used by the catalog.

use serde::Serialize;
use std::fmt;

use crate::domain::governance::GovernanceConfig;
use crate::domain::graph::Entity;

/// Platforms whose identifiers are stored upper-case in the catalog.
const UPPERCASE_PLATFORMS: &[&str] = &["snowflake"];
/// Platforms whose identifiers are stored lower-case in the catalog.
const LOWERCASE_PLATFORMS: &[&str] = &["postgres", "mysql"];

/// Everything a catalog adapter needs to find one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DatasetRef {
    pub platform: String,
    pub environment: String,
    pub platform_instance: Option<String>,
    /// Qualified dataset name (`database.schema.table` or `schema.table`).
    pub name: String,
    pub entity_id: String,
}

impl DatasetRef {
    /// DataHub dataset URN.
    pub fn urn(&self) -> String {
        match &self.platform_instance {
            Some(instance) => format!(
                "urn:li:dataset:(urn:li:dataPlatform:{},{}.{},{})",
                self.platform, instance, self.name, self.environment
            ),
            None => format!(
                "urn:li:dataset:(urn:li:dataPlatform:{},{},{})",
                self.platform, self.name, self.environment
            ),
        }
    }
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.urn())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrnMapper {
    platform: String,
    environment: String,
    platform_instance: Option<String>,
}

impl UrnMapper {
    pub fn new(platform: &str, environment: &str, platform_instance: Option<&str>) -> Self {
        Self {
            platform: platform.trim().to_lowercase(),
            environment: environment.trim().to_string(),
            platform_instance: platform_instance
                .map(str::trim)
                .filter(|i| !i.is_empty())
                .map(String::from),
        }
    }

    pub fn from_config(config: &GovernanceConfig) -> Self {
        Self::new(
            &config.target_platform,
            &config.environment,
            config.platform_instance.as_deref(),
        )
    }

    pub fn platform(&self) -> &str {
        &self.platform
    }

    fn normalize(&self, part: &str) -> String {
        if UPPERCASE_PLATFORMS.contains(&self.platform.as_str()) {
            part.to_uppercase()
        } else if LOWERCASE_PLATFORMS.contains(&self.platform.as_str()) {
            part.to_lowercase()
        } else {
            part.to_string()
        }
    }

    pub fn dataset_name(&self, entity: &Entity) -> String {
        let parts = [
            entity.database.as_deref(),
            Some(entity.schema.as_str()),
            Some(entity.id.as_str()),
        ];
        parts
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .map(|p| self.normalize(p))
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn dataset_ref(&self, entity: &Entity) -> DatasetRef {
        DatasetRef {
            platform: self.platform.clone(),
            environment: self.environment.clone(),
            platform_instance: self.platform_instance.clone(),
            name: self.dataset_name(entity),
            entity_id: entity.id.clone(),
        }
    }

    pub fn urn(&self, entity: &Entity) -> String {
        self.dataset_ref(entity).urn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::graph::{EntityRecord, ModelGraph};
    use anyhow::Result;

    fn entity(database: Option<&str>) -> Result<Entity> {
        let graph = ModelGraph::from_records(vec![
            EntityRecord::new("dim_customers").with_location(database, "analytics"),
        ])?;
        Ok(graph.entities()[0].clone())
    }

    #[test]
    fn test_snowflake_names_are_uppercased() -> Result<()> {
        let mapper = UrnMapper::new("Snowflake", "PROD", None);
        let e = entity(Some("warehouse"))?;
        assert_eq!(
            mapper.urn(&e),
            "urn:li:dataset:(urn:li:dataPlatform:snowflake,WAREHOUSE.ANALYTICS.DIM_CUSTOMERS,PROD)"
        );
        Ok(())
    }

    #[test]
    fn test_postgres_without_database() -> Result<()> {
        let mapper = UrnMapper::new("postgres", "DEV", None);
        let e = entity(None)?;
        assert_eq!(mapper.dataset_name(&e), "analytics.dim_customers");
        assert_eq!(
            mapper.urn(&e),
            "urn:li:dataset:(urn:li:dataPlatform:postgres,analytics.dim_customers,DEV)"
        );
        Ok(())
    }

    #[test]
    fn test_platform_instance_prefixes_name() -> Result<()> {
        let mapper = UrnMapper::new("bigquery", "PROD", Some("eu"));
        let dataset = mapper.dataset_ref(&entity(Some("proj"))?);
        assert_eq!(dataset.name, "proj.analytics.dim_customers");
        assert_eq!(
            dataset.urn(),
            "urn:li:dataset:(urn:li:dataPlatform:bigquery,eu.proj.analytics.dim_customers,PROD)"
        );
        assert_eq!(dataset.entity_id, "dim_customers");
        Ok(())
    }
}
