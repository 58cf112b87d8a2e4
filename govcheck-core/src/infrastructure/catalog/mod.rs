// govcheck-core/src/infrastructure/catalog/mod.rs

pub mod datahub;
pub mod memory;

pub use datahub::DataHubCatalog;
pub use memory::InMemoryCatalog;
