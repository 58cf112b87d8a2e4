// govcheck-core/src/infrastructure/manifest/dbt.rs
//
// Reads dbt artifacts (`target/manifest.json`, optionally `target/catalog.json`)
// into raw model records.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::domain::graph::{ColumnRecord, EntityRecord, Materialization};
use crate::error::GovcheckError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::read_file;
use crate::ports::manifest::ManifestSource;

const MODEL_RESOURCE: &str = "model";

#[derive(Deserialize, Default)]
struct RawManifest {
    #[serde(default)]
    metadata: RawMetadata,
    /// Kept as raw JSON: only model nodes are decoded strictly.
    #[serde(default)]
    nodes: BTreeMap<String, serde_json::Value>,
}

#[derive(Deserialize, Default)]
struct RawMetadata {
    #[serde(default)]
    dbt_version: Option<String>,
}

#[derive(Deserialize)]
struct RawModelNode {
    name: String,
    #[serde(default)]
    unique_id: Option<String>,
    #[serde(default)]
    database: Option<String>,
    #[serde(default)]
    schema: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    original_file_path: Option<String>,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    tags: Vec<String>,
    #[serde(default)]
    config: RawNodeConfig,
    #[serde(default)]
    columns: BTreeMap<String, RawColumn>,
    #[serde(default)]
    depends_on: RawDependsOn,
    /// dbt >= 1.5 model versions: an integer or a string.
    #[serde(default)]
    version: Option<serde_json::Value>,
    #[serde(default)]
    latest_version: Option<serde_json::Value>,
}

fn version_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

impl RawModelNode {
    /// Versioned models share one `name`. The latest version keeps it; older
    /// versions become `<name>_v<version>`, dbt's default relation name.
    fn entity_id(&self) -> String {
        let Some(version) = self.version.as_ref().filter(|v| !v.is_null()) else {
            return self.name.clone();
        };
        let version = version_label(version);
        let is_latest = self
            .latest_version
            .as_ref()
            .is_some_and(|latest| version_label(latest) == version);
        if is_latest {
            self.name.clone()
        } else {
            format!("{}_v{}", self.name, version)
        }
    }
}

#[derive(Deserialize, Default)]
struct RawNodeConfig {
    #[serde(default)]
    materialized: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawDependsOn {
    #[serde(default)]
    nodes: Vec<String>,
}

#[derive(Deserialize)]
struct RawColumn {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    data_type: Option<String>,
    #[serde(default)]
    meta: serde_json::Map<String, serde_json::Value>,
}

impl RawColumn {
    fn is_pii(&self) -> bool {
        match self.meta.get("pii") {
            Some(serde_json::Value::Bool(flag)) => *flag,
            Some(serde_json::Value::String(s)) => matches!(s.to_lowercase().as_str(), "true" | "yes"),
            _ => false,
        }
    }
}

// --- catalog.json ---

#[derive(Deserialize, Default)]
struct RawCatalog {
    #[serde(default)]
    nodes: HashMap<String, RawCatalogNode>,
}

#[derive(Deserialize, Default)]
struct RawCatalogNode {
    #[serde(default)]
    columns: BTreeMap<String, RawCatalogColumn>,
}

#[derive(Deserialize)]
struct RawCatalogColumn {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type", default)]
    data_type: Option<String>,
    #[serde(default)]
    comment: Option<String>,
}

fn invalid(path: &str, reason: impl Into<String>) -> InfrastructureError {
    InfrastructureError::InvalidManifest {
        path: path.to_string(),
        reason: reason.into(),
    }
}

/// Parses manifest JSON. Non-model nodes are ignored; a model node that
/// cannot be decoded is fatal.
pub fn parse_manifest(content: &str, origin: &str) -> Result<Vec<EntityRecord>, InfrastructureError> {
    let raw: RawManifest = serde_json::from_str(content).map_err(|e| invalid(origin, e.to_string()))?;

    let mut models: Vec<(String, RawModelNode)> = Vec::new();
    for (node_id, node) in raw.nodes {
        if node.get("resource_type").and_then(|v| v.as_str()) != Some(MODEL_RESOURCE) {
            continue;
        }
        let model: RawModelNode =
            serde_json::from_value(node).map_err(|e| invalid(origin, format!("node '{node_id}': {e}")))?;
        models.push((node_id, model));
    }

    // depends_on holds unique ids; models are referenced by entity id.
    let names: HashMap<&str, String> = models
        .iter()
        .map(|(id, m)| (id.as_str(), m.entity_id()))
        .collect();

    let records = models
        .iter()
        .map(|(node_id, model)| to_record(node_id, model, &names))
        .collect::<Vec<_>>();

    info!(
        models = records.len(),
        dbt_version = raw.metadata.dbt_version.as_deref().unwrap_or("unknown"),
        "Parsed dbt manifest"
    );
    Ok(records)
}

fn to_record(node_id: &str, model: &RawModelNode, names: &HashMap<&str, String>) -> EntityRecord {
    let upstream = model
        .depends_on
        .nodes
        .iter()
        .map(|dep| names.get(dep.as_str()).cloned().unwrap_or_else(|| dep.clone()));

    let columns = model
        .columns
        .iter()
        .map(|(key, col)| ColumnRecord {
            name: col.name.clone().unwrap_or_else(|| key.clone()),
            description: col.description.clone(),
            data_type: col.data_type.clone(),
            pii: col.is_pii(),
        })
        .collect();

    let materialization = model
        .config
        .materialized
        .as_deref()
        .and_then(|m| m.parse::<Materialization>().ok());

    let id = names.get(node_id).cloned().unwrap_or_else(|| model.entity_id());
    let mut record = EntityRecord::new(id)
        .with_location(model.database.as_deref(), model.schema.as_deref().unwrap_or_default())
        .with_upstream(upstream)
        .with_tags(model.tags.iter().cloned())
        .with_columns(columns)
        .with_path(
            model
                .original_file_path
                .clone()
                .or_else(|| model.path.clone())
                .unwrap_or_default(),
        );
    record.unique_id = Some(model.unique_id.clone().unwrap_or_else(|| node_id.to_string()));
    record.description = model.description.clone();
    record.materialization = materialization;
    record
}

/// Merges warehouse column metadata from `catalog.json` into the records.
/// Declared values win; the warehouse only fills the gaps.
pub fn merge_catalog_columns(records: &mut [EntityRecord], content: &str, origin: &str) -> Result<(), InfrastructureError> {
    let catalog: RawCatalog = serde_json::from_str(content).map_err(|e| invalid(origin, e.to_string()))?;

    for record in records.iter_mut() {
        let Some(node) = record.unique_id.as_deref().and_then(|id| catalog.nodes.get(id)) else {
            continue;
        };
        for (key, col) in &node.columns {
            let name = col.name.as_deref().unwrap_or(key);
            let comment = col.comment.clone().filter(|c| !c.trim().is_empty());
            match record
                .columns
                .iter_mut()
                .find(|c| c.name.eq_ignore_ascii_case(name))
            {
                Some(existing) => {
                    if existing.data_type.is_none() {
                        existing.data_type = col.data_type.clone();
                    }
                    if !existing.is_documented() && comment.is_some() {
                        existing.description = comment;
                    }
                }
                None => record.columns.push(ColumnRecord {
                    name: name.to_lowercase(),
                    description: comment,
                    data_type: col.data_type.clone(),
                    pii: false,
                }),
            }
        }
        debug!(model = %record.id, columns = record.columns.len(), "Merged warehouse columns");
    }
    Ok(())
}

/// `ManifestSource` over dbt artifacts on disk.
#[derive(Debug, Clone)]
pub struct DbtManifestSource {
    manifest_path: PathBuf,
    catalog_path: Option<PathBuf>,
}

impl DbtManifestSource {
    pub fn new(manifest_path: impl Into<PathBuf>) -> Self {
        Self {
            manifest_path: manifest_path.into(),
            catalog_path: None,
        }
    }

    pub fn with_catalog(mut self, catalog_path: Option<PathBuf>) -> Self {
        self.catalog_path = catalog_path;
        self
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }
}

impl ManifestSource for DbtManifestSource {
    #[instrument(skip(self), fields(manifest = %self.manifest_path.display()))]
    fn load(&self) -> Result<Vec<EntityRecord>, GovcheckError> {
        let origin = self.manifest_path.display().to_string();
        let content = read_file(&self.manifest_path)?;
        let mut records = parse_manifest(&content, &origin)?;

        if let Some(catalog_path) = &self.catalog_path {
            let origin = catalog_path.display().to_string();
            let content = read_file(catalog_path)?;
            merge_catalog_columns(&mut records, &content, &origin)?;
        }
        Ok(records)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use serde_json::json;

    fn manifest() -> String {
        json!({
            "metadata": { "dbt_version": "1.7.4" },
            "nodes": {
                "model.shop.stg_orders": {
                    "resource_type": "model",
                    "name": "stg_orders",
                    "unique_id": "model.shop.stg_orders",
                    "database": "analytics",
                    "schema": "staging",
                    "description": "Cleaned orders",
                    "original_file_path": "models/staging/stg_orders.sql",
                    "tags": ["staging"],
                    "config": { "materialized": "view" },
                    "columns": {
                        "customer_email": { "name": "customer_email", "description": "", "meta": { "pii": true } },
                        "order_id": { "name": "order_id", "description": "Primary key" }
                    },
                    "depends_on": { "nodes": ["source.shop.raw.orders"] }
                },
                "model.shop.fct_orders": {
                    "resource_type": "model",
                    "name": "fct_orders",
                    "schema": "marts",
                    "config": { "materialized": "incremental" },
                    "depends_on": { "nodes": ["model.shop.stg_orders", "seed.shop.countries"] }
                },
                "test.shop.not_null_orders": { "resource_type": "test", "name": "not_null_orders" },
                "seed.shop.countries": { "resource_type": "seed", "name": "countries" }
            }
        })
        .to_string()
    }

    #[test]
    fn test_only_models_become_records() -> Result<()> {
        let records = parse_manifest(&manifest(), "manifest.json")?;
        let names: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(names, ["fct_orders", "stg_orders"]);
        Ok(())
    }

    #[test]
    fn test_model_fields_are_mapped() -> Result<()> {
        let records = parse_manifest(&manifest(), "manifest.json")?;
        let stg = records.iter().find(|r| r.id == "stg_orders").unwrap();

        assert_eq!(stg.database.as_deref(), Some("analytics"));
        assert_eq!(stg.schema, "staging");
        assert_eq!(stg.path, "models/staging/stg_orders.sql");
        assert_eq!(stg.materialization, Some(Materialization::View));
        assert_eq!(stg.upstream, ["source.shop.raw.orders"]);
        assert_eq!(stg.columns.len(), 2);
        assert!(stg.columns[0].pii);
        assert!(!stg.columns[0].is_documented());

        let fct = records.iter().find(|r| r.id == "fct_orders").unwrap();
        assert_eq!(fct.upstream, ["stg_orders", "seed.shop.countries"]);
        assert_eq!(fct.unique_id.as_deref(), Some("model.shop.fct_orders"));
        Ok(())
    }

    #[test]
    fn test_versioned_models_get_distinct_ids() -> Result<()> {
        let versioned = |version: serde_json::Value| {
            json!({
                "resource_type": "model",
                "name": "dim_customers",
                "schema": "core",
                "version": version,
                "latest_version": 2,
                "depends_on": { "nodes": [] }
            })
        };
        let content = json!({
            "nodes": {
                "model.shop.dim_customers.v1": versioned(json!(1)),
                "model.shop.dim_customers.v2": versioned(json!(2)),
                "model.shop.rpt_churn": {
                    "resource_type": "model",
                    "name": "rpt_churn",
                    "schema": "reports",
                    "depends_on": { "nodes": ["model.shop.dim_customers.v1"] }
                }
            }
        })
        .to_string();

        let records = parse_manifest(&content, "manifest.json")?;
        let mut ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        ids.sort_unstable();
        assert_eq!(ids, ["dim_customers", "dim_customers_v1", "rpt_churn"]);

        let report = records.iter().find(|r| r.id == "rpt_churn").unwrap();
        assert_eq!(report.upstream, ["dim_customers_v1"]);

        let graph = crate::domain::graph::ModelGraph::from_records(records)?;
        assert_eq!(graph.downstream("dim_customers_v1")?, ["rpt_churn"]);
        Ok(())
    }

    #[test]
    fn test_malformed_model_node_is_fatal() {
        let content = json!({
            "nodes": { "model.shop.broken": { "resource_type": "model", "tags": "oops" } }
        })
        .to_string();
        let err = parse_manifest(&content, "manifest.json").unwrap_err();
        assert!(err.to_string().contains("model.shop.broken"));
    }

    #[test]
    fn test_invalid_json_is_reported() {
        let err = parse_manifest("{ not json", "target/manifest.json").unwrap_err();
        assert!(matches!(err, InfrastructureError::InvalidManifest { ref path, .. } if path == "target/manifest.json"));
    }

    #[test]
    fn test_catalog_columns_fill_gaps() -> Result<()> {
        let mut records = parse_manifest(&manifest(), "manifest.json")?;
        let catalog = json!({
            "nodes": {
                "model.shop.stg_orders": {
                    "columns": {
                        "ORDER_ID": { "name": "ORDER_ID", "type": "NUMBER", "comment": "Warehouse key" },
                        "CUSTOMER_EMAIL": { "name": "CUSTOMER_EMAIL", "type": "TEXT", "comment": "Email" },
                        "LOADED_AT": { "name": "LOADED_AT", "type": "TIMESTAMP", "comment": null }
                    }
                }
            }
        })
        .to_string();
        merge_catalog_columns(&mut records, &catalog, "catalog.json")?;

        let stg = records.iter().find(|r| r.id == "stg_orders").unwrap();
        let order_id = stg.columns.iter().find(|c| c.name == "order_id").unwrap();
        assert_eq!(order_id.data_type.as_deref(), Some("NUMBER"));
        assert_eq!(order_id.description.as_deref(), Some("Primary key"));

        let email = stg.columns.iter().find(|c| c.name == "customer_email").unwrap();
        assert_eq!(email.description.as_deref(), Some("Email"));

        let loaded = stg.columns.iter().find(|c| c.name == "loaded_at").unwrap();
        assert!(!loaded.is_documented());
        Ok(())
    }
}
