// govcheck-core/src/application/mod.rs

pub mod engine;
pub mod resolver;
pub mod validate;

// --- RE-EXPORTS (FACADE PATTERN) ---
// `use govcheck_core::application::{validate_project, RuleEngine};`

pub use engine::RuleEngine;
pub use resolver::{DEFAULT_CONCURRENCY, StatusResolver};
pub use validate::{ValidationRequest, validate_project};
