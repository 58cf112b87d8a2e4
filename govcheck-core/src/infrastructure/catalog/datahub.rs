// govcheck-core/src/infrastructure/catalog/datahub.rs
//
// DataHub GMS adapter. One GraphQL request per dataset; timeouts and HTTP
// failures are reported as `CatalogError` and never abort the run.

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};
use url::Url;

use crate::domain::governance::CatalogRecord;
use crate::infrastructure::config::DataHubConnection;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::catalog::{CatalogError, CatalogSource, DatasetRef};

const DATASET_QUERY: &str = r#"
query governanceStatus($urn: String!) {
  dataset(urn: $urn) {
    urn
    properties { description }
    editableProperties { description }
    ownership { owners { owner { ... on CorpUser { urn } ... on CorpGroup { urn } } } }
    domain { domain { urn properties { name } } }
    tags { tags { tag { urn name } } }
    deprecation { deprecated note }
  }
}
"#;

const TAG_URN_PREFIX: &str = "urn:li:tag:";

/// Longest response body excerpt kept in error messages.
const BODY_EXCERPT: usize = 200;

// --- GraphQL response shapes ---

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<DatasetData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Deserialize)]
struct DatasetData {
    dataset: Option<Dataset>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Dataset {
    #[serde(default)]
    properties: Option<Properties>,
    #[serde(default)]
    editable_properties: Option<Properties>,
    #[serde(default)]
    ownership: Option<Ownership>,
    #[serde(default)]
    domain: Option<DomainAssociation>,
    #[serde(default)]
    tags: Option<GlobalTags>,
    #[serde(default)]
    deprecation: Option<Deprecation>,
}

#[derive(Deserialize)]
struct Properties {
    description: Option<String>,
}

#[derive(Deserialize)]
struct Ownership {
    #[serde(default)]
    owners: Vec<Owner>,
}

#[derive(Deserialize)]
struct Owner {
    owner: UrnRef,
}

#[derive(Deserialize)]
struct UrnRef {
    urn: String,
}

#[derive(Deserialize)]
struct DomainAssociation {
    domain: Option<Domain>,
}

#[derive(Deserialize)]
struct Domain {
    urn: String,
    #[serde(default)]
    properties: Option<DomainProperties>,
}

#[derive(Deserialize)]
struct DomainProperties {
    name: Option<String>,
}

#[derive(Deserialize)]
struct GlobalTags {
    #[serde(default)]
    tags: Vec<TagAssociation>,
}

#[derive(Deserialize)]
struct TagAssociation {
    tag: Tag,
}

#[derive(Deserialize)]
struct Tag {
    urn: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Deserialize)]
struct Deprecation {
    #[serde(default)]
    deprecated: bool,
    #[serde(default)]
    note: Option<String>,
}

impl From<Dataset> for CatalogRecord {
    fn from(ds: Dataset) -> Self {
        // Descriptions edited in the UI take precedence over ingested ones.
        let description = [ds.editable_properties, ds.properties]
            .into_iter()
            .flatten()
            .filter_map(|p| p.description)
            .find(|d| !d.trim().is_empty());

        let owners = ds
            .ownership
            .map(|o| o.owners.into_iter().map(|o| o.owner.urn).collect())
            .unwrap_or_default();

        let domain = ds.domain.and_then(|d| d.domain).map(|d| {
            d.properties
                .and_then(|p| p.name)
                .filter(|n| !n.trim().is_empty())
                .unwrap_or(d.urn)
        });

        let tags = ds
            .tags
            .map(|t| {
                t.tags
                    .into_iter()
                    .map(|a| match a.tag.name.filter(|n| !n.trim().is_empty()) {
                        Some(name) => name,
                        None => a
                            .tag
                            .urn
                            .strip_prefix(TAG_URN_PREFIX)
                            .map(String::from)
                            .unwrap_or(a.tag.urn),
                    })
                    .collect()
            })
            .unwrap_or_default();

        let (deprecated, deprecation_note) = match ds.deprecation {
            Some(d) if d.deprecated => (true, d.note.filter(|n| !n.trim().is_empty())),
            _ => (false, None),
        };

        Self {
            owners,
            domain,
            tags,
            deprecated,
            deprecation_note,
            description,
        }
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}

fn status_error(status: StatusCode, body: &str) -> CatalogError {
    let message = format!("HTTP {status}: {}", excerpt(body));
    if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
        CatalogError::Auth(message)
    } else {
        CatalogError::Transport(message)
    }
}

fn transport_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Transport(format!("request timed out: {e}"))
    } else {
        CatalogError::Transport(e.to_string())
    }
}

/// DataHub catalog over the GMS GraphQL API.
#[derive(Debug)]
pub struct DataHubCatalog {
    client: reqwest::Client,
    graphql_url: Url,
    config_url: Url,
    server: String,
}

impl DataHubCatalog {
    pub fn new(connection: &DataHubConnection) -> Result<Self, InfrastructureError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &connection.token {
            let value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
                InfrastructureError::ConfigError("DataHub token contains invalid characters".into())
            })?;
            headers.insert(AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(connection.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            graphql_url: connection.endpoint("api/graphql")?,
            config_url: connection.endpoint("config")?,
            server: connection.server.to_string(),
        })
    }
}

#[async_trait]
impl CatalogSource for DataHubCatalog {
    #[instrument(skip(self), fields(urn = %dataset.urn()))]
    async fn lookup(&self, dataset: &DatasetRef) -> Result<Option<CatalogRecord>, CatalogError> {
        let body = json!({
            "query": DATASET_QUERY,
            "variables": { "urn": dataset.urn() },
        });

        let response = self
            .client
            .post(self.graphql_url.clone())
            .json(&body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let text = response.text().await.map_err(transport_error)?;
        if !status.is_success() {
            return Err(status_error(status, &text));
        }

        let parsed: GraphQlResponse =
            serde_json::from_str(&text).map_err(|e| CatalogError::InvalidResponse(e.to_string()))?;

        match parsed.data.and_then(|d| d.dataset) {
            Some(ds) => Ok(Some(ds.into())),
            None if parsed.errors.is_empty() => {
                debug!("dataset unknown to DataHub");
                Ok(None)
            }
            None => Err(CatalogError::InvalidResponse(
                parsed
                    .errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            )),
        }
    }

    async fn test_connection(&self) -> Result<(), CatalogError> {
        let response = self
            .client
            .get(self.config_url.clone())
            .send()
            .await
            .map_err(transport_error)?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let text = response.text().await.unwrap_or_default();
        Err(status_error(status, &text))
    }

    fn describe(&self) -> String {
        format!("DataHub at {}", self.server)
    }
}
