// govcheck-core/src/domain/governance/status.rs

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::graph::Entity;

/// Metadata held by the catalog for one dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    #[serde(default)]
    pub owners: Vec<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub deprecation_note: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Result of a single catalog lookup, as seen by the domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(CatalogRecord),
    NotFound,
    /// Transport, auth or protocol failure. Carries the reason.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum CatalogResolution {
    Resolved,
    NotFound,
    LookupError { reason: String },
}

impl CatalogResolution {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resolved => "resolved",
            Self::NotFound => "not_found",
            Self::LookupError { .. } => "lookup_error",
        }
    }
}

/// Merged governance view of one model: declared metadata + catalog metadata.
/// A snapshot: built once per run, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GovernanceStatus {
    pub entity_id: String,
    /// Catalog key used for the lookup (dataset URN).
    pub urn: String,
    pub owners: Vec<String>,
    pub domain: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub deprecation_note: Option<String>,
    pub description: Option<String>,
    pub resolution: CatalogResolution,
}

pub type StatusMap = HashMap<String, GovernanceStatus>;

impl GovernanceStatus {
    /// Merge policy: the catalog wins for owners, domain, deprecation and tags
    /// (tags are unioned with the declared ones); the description falls back
    /// to the declared one. A failed lookup leaves every catalog field absent.
    pub fn merge(entity: &Entity, urn: impl Into<String>, outcome: LookupOutcome) -> Self {
        let declared_description = entity.declared_description().map(String::from);

        let (record, resolution) = match outcome {
            LookupOutcome::Found(record) => (Some(record), CatalogResolution::Resolved),
            LookupOutcome::NotFound => (None, CatalogResolution::NotFound),
            LookupOutcome::Failed(reason) => (None, CatalogResolution::LookupError { reason }),
        };

        match record {
            Some(record) => {
                let description = non_blank(record.description).or(declared_description);
                Self {
                    entity_id: entity.id.clone(),
                    urn: urn.into(),
                    owners: record
                        .owners
                        .into_iter()
                        .filter(|o| !o.trim().is_empty())
                        .collect(),
                    domain: non_blank(record.domain),
                    tags: merge_tags(&entity.tags, &record.tags),
                    deprecated: record.deprecated,
                    deprecation_note: non_blank(record.deprecation_note),
                    description,
                    resolution,
                }
            }
            None => Self {
                entity_id: entity.id.clone(),
                urn: urn.into(),
                owners: Vec::new(),
                domain: None,
                tags: merge_tags(&entity.tags, &[]),
                deprecated: false,
                deprecation_note: None,
                description: declared_description,
                resolution,
            },
        }
    }

    pub fn has_owner(&self) -> bool {
        !self.owners.is_empty()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution == CatalogResolution::Resolved
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

// Declared tags first, then catalog-only tags; case-insensitive set semantics.
fn merge_tags(declared: &[String], catalog: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(declared.len() + catalog.len());
    for tag in declared.iter().chain(catalog) {
        let tag = tag.trim();
        if tag.is_empty() || merged.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        merged.push(tag.to_string());
    }
    merged
}
