// govcheck-core/src/domain/graph/entity.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a model is materialized in the warehouse.
/// Custom dbt materializations are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Materialization {
    View,
    Table,
    Incremental,
    Ephemeral,
    MaterializedView,
    Snapshot,
    Other(String),
}

impl Materialization {
    pub fn as_str(&self) -> &str {
        match self {
            Self::View => "view",
            Self::Table => "table",
            Self::Incremental => "incremental",
            Self::Ephemeral => "ephemeral",
            Self::MaterializedView => "materialized_view",
            Self::Snapshot => "snapshot",
            Self::Other(s) => s.as_str(),
        }
    }
}

impl fmt::Display for Materialization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Materialization {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Materialization cannot be empty".to_string());
        }
        Ok(match trimmed.to_lowercase().as_str() {
            "view" => Self::View,
            "table" => Self::Table,
            "incremental" => Self::Incremental,
            "ephemeral" => Self::Ephemeral,
            "materialized_view" | "materializedview" => Self::MaterializedView,
            "snapshot" => Self::Snapshot,
            other => Self::Other(other.to_string()),
        })
    }
}

impl Serialize for Materialization {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Materialization {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Materialization::from_str(&s).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRecord {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data_type: Option<String>,
    /// Explicit `meta.pii` flag from the manifest.
    #[serde(default)]
    pub pii: bool,
}

impl ColumnRecord {
    pub fn is_documented(&self) -> bool {
        self.description
            .as_deref()
            .is_some_and(|d| !d.trim().is_empty())
    }
}

/// Raw model record as produced by a manifest source, before graph assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: String,
    /// Build-tool identifier (e.g. `model.jaffle_shop.stg_orders`), if any.
    #[serde(default)]
    pub unique_id: Option<String>,
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub schema: String,
    /// Source file path relative to the project, used for pattern filtering.
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub materialization: Option<Materialization>,
    #[serde(default)]
    pub columns: Vec<ColumnRecord>,
    /// Upstream references by model name. Unknown names are kept as-is.
    #[serde(default)]
    pub upstream: Vec<String>,
}

impl EntityRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn with_upstream<I, S>(mut self, upstream: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upstream = upstream.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_location(mut self, database: Option<&str>, schema: &str) -> Self {
        self.database = database.map(String::from);
        self.schema = schema.to_string();
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_materialization(mut self, materialization: Materialization) -> Self {
        self.materialization = Some(materialization);
        self
    }

    pub fn with_columns(mut self, columns: Vec<ColumnRecord>) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }
}

/// A model inside the [`ModelGraph`](super::ModelGraph).
/// Same shape as the record, with a deduplicated upstream set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entity {
    pub id: String,
    pub unique_id: Option<String>,
    pub database: Option<String>,
    pub schema: String,
    pub path: String,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub materialization: Option<Materialization>,
    pub columns: Vec<ColumnRecord>,
    pub(crate) upstream: Vec<String>,
}

impl Entity {
    pub(crate) fn from_record(record: EntityRecord) -> Self {
        let mut upstream: Vec<String> = Vec::with_capacity(record.upstream.len());
        for reference in record.upstream {
            if !upstream.contains(&reference) {
                upstream.push(reference);
            }
        }

        Self {
            id: record.id,
            unique_id: record.unique_id,
            database: record.database,
            schema: record.schema,
            path: record.path,
            description: record.description,
            tags: record.tags,
            materialization: record.materialization,
            columns: record.columns,
            upstream,
        }
    }

    /// Declared description, `None` when missing or blank.
    pub fn declared_description(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }

    /// Immediate upstream references in declaration order.
    pub fn upstream(&self) -> &[String] {
        &self.upstream
    }

    /// `database.schema.name` (or `schema.name` without a database).
    pub fn qualified_name(&self) -> String {
        match &self.database {
            Some(db) if !db.is_empty() => format!("{}.{}.{}", db, self.schema, self.id),
            _ => format!("{}.{}", self.schema, self.id),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_materialization_parsing() {
        assert_eq!(
            Materialization::from_str("TABLE").unwrap(),
            Materialization::Table
        );
        assert_eq!(
            Materialization::from_str("dynamic_table").unwrap(),
            Materialization::Other("dynamic_table".into())
        );
        assert!(Materialization::from_str("  ").is_err());
    }

    #[test]
    fn test_entity_deduplicates_upstream() {
        let record = EntityRecord::new("fct_orders").with_upstream(["stg_orders", "stg_orders", "dim_customers"]);
        let entity = Entity::from_record(record);
        assert_eq!(entity.upstream(), ["stg_orders", "dim_customers"]);
    }

    #[test]
    fn test_qualified_name() {
        let entity = Entity::from_record(
            EntityRecord::new("stg_orders").with_location(Some("ANALYTICS"), "STAGING"),
        );
        assert_eq!(entity.qualified_name(), "ANALYTICS.STAGING.stg_orders");

        let entity = Entity::from_record(EntityRecord::new("stg_orders").with_location(None, "staging"));
        assert_eq!(entity.qualified_name(), "staging.stg_orders");
    }

    #[test]
    fn test_blank_description_is_absent() {
        let entity = Entity::from_record(EntityRecord::new("a").with_description("   "));
        assert_eq!(entity.declared_description(), None);
    }
}
