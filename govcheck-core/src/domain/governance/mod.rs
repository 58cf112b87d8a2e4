// govcheck-core/src/domain/governance/mod.rs

pub mod configuration;
pub mod report;
pub mod severity;
pub mod status;

// Re-exports
pub use configuration::{GovernanceConfig, ParamReader, RuleConfig, RuleParams};
pub use report::{Summary, ValidationReport, ValidationResult};
pub use severity::Severity;
pub use status::{CatalogRecord, CatalogResolution, GovernanceStatus, LookupOutcome, StatusMap};
