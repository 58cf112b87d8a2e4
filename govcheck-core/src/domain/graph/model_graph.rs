// govcheck-core/src/domain/graph/model_graph.rs

use std::collections::HashMap;

use super::entity::{Entity, EntityRecord};
use crate::domain::error::GraphError;

/// Immutable project graph, built once per run.
///
/// Entities keep their input order. Upstream references that do not resolve
/// to a model of the graph (sources, seeds, models from disabled packages)
/// are kept as opaque references: rules decide what they mean.
#[derive(Debug, Clone, Default)]
pub struct ModelGraph {
    entities: Vec<Entity>,
    index: HashMap<String, usize>,
    downstream: HashMap<String, Vec<String>>,
}

impl ModelGraph {
    pub fn from_records<I>(records: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = EntityRecord>,
    {
        let mut entities = Vec::new();
        let mut index = HashMap::new();

        for (position, record) in records.into_iter().enumerate() {
            if record.id.trim().is_empty() {
                return Err(GraphError::MalformedRecord {
                    index: position,
                    reason: "model identifier is empty".into(),
                });
            }
            if index.contains_key(&record.id) {
                return Err(GraphError::DuplicateEntity(record.id));
            }
            index.insert(record.id.clone(), entities.len());
            entities.push(Entity::from_record(record));
        }

        // Derived edges: only references that resolve inside the graph.
        let mut downstream: HashMap<String, Vec<String>> = HashMap::new();
        for entity in &entities {
            for parent in entity.upstream() {
                if index.contains_key(parent) {
                    downstream
                        .entry(parent.clone())
                        .or_default()
                        .push(entity.id.clone());
                }
            }
        }

        Ok(Self {
            entities,
            index,
            downstream,
        })
    }

    pub fn get(&self, id: &str) -> Result<&Entity, GraphError> {
        self.index
            .get(id)
            .map(|&i| &self.entities[i])
            .ok_or_else(|| GraphError::EntityNotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All entities, in input order.
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Immediate upstream references of `id` (not transitive).
    pub fn upstream(&self, id: &str) -> Result<&[String], GraphError> {
        self.get(id).map(Entity::upstream)
    }

    pub fn dependency_count(&self, id: &str) -> Result<usize, GraphError> {
        self.upstream(id).map(<[String]>::len)
    }

    /// Immediate in-graph children of `id`.
    pub fn downstream(&self, id: &str) -> Result<&[String], GraphError> {
        self.get(id)?;
        Ok(self
            .downstream
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or_default())
    }

    /// Upstream references of `id` that resolve to a model of this graph.
    pub fn resolved_upstream<'a>(
        &'a self,
        id: &str,
    ) -> Result<impl Iterator<Item = &'a Entity> + use<'a>, GraphError> {
        let refs = self.upstream(id)?;
        Ok(refs.iter().filter_map(|r| self.get(r).ok()))
    }
}
