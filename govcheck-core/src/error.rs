// govcheck-core/src/error.rs

use crate::domain::error::{ConfigError, DomainError, GraphError};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::catalog::CatalogError;
use miette::Diagnostic;
use thiserror::Error;

/// Fatal errors: anything that prevents a report from being produced.
#[derive(Error, Debug, Diagnostic)]
pub enum GovcheckError {
    // --- ERREURS DU DOMAINE (Graphe, Configuration des règles) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, HTTP) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    #[diagnostic(code(govcheck::internal))]
    InternalError(String),
}

// Shortcuts so that `?` works on the most common error types.
impl From<GraphError> for GovcheckError {
    fn from(err: GraphError) -> Self {
        GovcheckError::Domain(DomainError::Graph(err))
    }
}

impl From<ConfigError> for GovcheckError {
    fn from(err: ConfigError) -> Self {
        GovcheckError::Domain(DomainError::Config(err))
    }
}

impl From<std::io::Error> for GovcheckError {
    fn from(err: std::io::Error) -> Self {
        GovcheckError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<CatalogError> for GovcheckError {
    fn from(err: CatalogError) -> Self {
        GovcheckError::Infrastructure(InfrastructureError::Catalog(err))
    }
}
