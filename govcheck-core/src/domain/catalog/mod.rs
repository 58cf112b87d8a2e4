// govcheck-core/src/domain/catalog/mod.rs

pub mod urn;

pub use urn::{DatasetRef, UrnMapper};
