// govcheck-core/src/domain/graph/mod.rs

pub mod entity;
pub mod model_graph;

pub use entity::{ColumnRecord, Entity, EntityRecord, Materialization};
pub use model_graph::ModelGraph;
