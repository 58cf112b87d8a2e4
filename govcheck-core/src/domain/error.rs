// govcheck-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while building or querying the model graph. Always fatal.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate model '{0}' in manifest")]
    #[diagnostic(
        code(govcheck::graph::duplicate),
        help("Model names must be unique across the project (including packages).")
    )]
    DuplicateEntity(String),

    #[error("Malformed model record #{index}: {reason}")]
    #[diagnostic(code(govcheck::graph::malformed))]
    MalformedRecord { index: usize, reason: String },

    #[error("Model '{0}' not found in manifest")]
    #[diagnostic(code(govcheck::graph::not_found))]
    EntityNotFound(String),
}

/// Errors raised while validating the governance configuration against the
/// rule registry. Always fatal, always raised before evaluation starts.
#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Unknown rule '{rule}'")]
    #[diagnostic(
        code(govcheck::config::unknown_rule),
        help("Available rules: {available}. Run `govcheck list-rules` for details.")
    )]
    UnknownRule { rule: String, available: String },

    #[error("Rule '{0}' is already registered")]
    #[diagnostic(code(govcheck::config::duplicate_rule))]
    DuplicateRule(String),

    #[error("Invalid pattern '{pattern}': {reason}")]
    #[diagnostic(
        code(govcheck::config::pattern),
        help("Include/exclude patterns are globs (e.g. 'stg_*'), rule patterns are regexes.")
    )]
    InvalidPattern { pattern: String, reason: String },

    #[error("Invalid parameter '{param}' for rule '{rule}': {reason}")]
    #[diagnostic(code(govcheck::config::param))]
    InvalidParam {
        rule: String,
        param: String,
        reason: String,
    },

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(govcheck::config::invalid))]
    Invalid(String),
}

/// A fault inside a single rule evaluation. Never fatal: the engine turns it
/// into an error-severity result for the offending (rule, model) pair.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct RuleFault(pub String);

impl RuleFault {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}
