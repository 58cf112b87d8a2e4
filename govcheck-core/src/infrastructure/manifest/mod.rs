// govcheck-core/src/infrastructure/manifest/mod.rs

pub mod dbt;

pub use dbt::DbtManifestSource;
