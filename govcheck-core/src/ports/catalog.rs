// govcheck-core/src/ports/catalog.rs

// What the resolver needs from a metadata catalog, without knowing whether
// the answer comes from a DataHub server, a JSON snapshot or a test double.

use async_trait::async_trait;
use miette::Diagnostic;
use thiserror::Error;

pub use crate::domain::catalog::DatasetRef;
use crate::domain::governance::CatalogRecord;

/// Catalog failures. A failed connection check aborts validation; a failed
/// lookup is recorded as a `lookup_error` status for the affected model.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Catalog unreachable: {0}")]
    #[diagnostic(
        code(govcheck::catalog::transport),
        help("Check the server URL and your network connection.")
    )]
    Transport(String),

    #[error("Catalog rejected the credentials: {0}")]
    #[diagnostic(
        code(govcheck::catalog::auth),
        help("Set a valid token with --datahub-token or DATAHUB_GMS_TOKEN.")
    )]
    Auth(String),

    #[error("Unexpected catalog response: {0}")]
    #[diagnostic(code(govcheck::catalog::response))]
    InvalidResponse(String),
}

#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// `Ok(None)` when the catalog does not know the dataset.
    async fn lookup(&self, dataset: &DatasetRef) -> Result<Option<CatalogRecord>, CatalogError>;

    /// Cheap reachability check, run once before any lookup.
    async fn test_connection(&self) -> Result<(), CatalogError> {
        Ok(())
    }

    /// Human-readable name for logs.
    fn describe(&self) -> String;
}
