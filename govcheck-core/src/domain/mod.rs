// govcheck-core/src/domain/mod.rs

pub mod catalog;
pub mod error;
pub mod governance;
pub mod graph;
pub mod rules;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::{ConfigError, DomainError, GraphError, RuleFault};
