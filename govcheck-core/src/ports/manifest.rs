// govcheck-core/src/ports/manifest.rs

use crate::domain::graph::EntityRecord;
use crate::error::GovcheckError;

/// Produces the raw model records of a project (one per model node).
pub trait ManifestSource: Send + Sync {
    fn load(&self) -> Result<Vec<EntityRecord>, GovcheckError>;
}
