// govcheck-core/src/ports/mod.rs

pub mod catalog;
pub mod manifest;
pub mod renderer;

pub use catalog::{CatalogError, CatalogSource};
pub use manifest::ManifestSource;
pub use renderer::{RenderOptions, ReportRenderer};
