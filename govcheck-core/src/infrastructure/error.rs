// govcheck-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

use crate::ports::catalog::CatalogError;

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(govcheck::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    #[error("Cannot read '{path}': {source}")]
    #[diagnostic(code(govcheck::infra::read))]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(govcheck::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(govcheck::infra::config))]
    ConfigError(String),

    #[error("Governance configuration not found at '{0}'")]
    #[diagnostic(
        code(govcheck::infra::config_missing),
        help("Run `govcheck init` to create a governance.yml.")
    )]
    ConfigNotFound(String),

    // --- MANIFEST / JSON ---
    #[error("JSON Parsing Error: {0}")]
    #[diagnostic(code(govcheck::infra::json))]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid manifest '{path}': {reason}")]
    #[diagnostic(
        code(govcheck::infra::manifest),
        help("Run `dbt compile` (or `dbt docs generate`) to produce target/manifest.json.")
    )]
    InvalidManifest { path: String, reason: String },

    // --- CATALOG (HTTP) ---
    #[error("Invalid catalog URL '{url}': {reason}")]
    #[diagnostic(code(govcheck::infra::url))]
    InvalidUrl { url: String, reason: String },

    #[error("HTTP client error: {0}")]
    #[diagnostic(code(govcheck::infra::http))]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Catalog(#[from] CatalogError),
}
