// govcheck-core/src/domain/rules/registry.rs

use std::fmt;

use super::Rule;
use super::{conventions, documentation, lineage, ownership};
use crate::domain::error::ConfigError;
use crate::domain::governance::{RuleParams, Severity};

/// Builds a rule from its configured parameters. Malformed parameters are
/// reported here, before any model is evaluated.
pub type RuleConstructor = fn(&RuleParams) -> Result<Box<dyn Rule>, ConfigError>;

#[derive(Clone, Copy)]
pub struct RuleDescriptor {
    pub id: &'static str,
    pub description: &'static str,
    pub default_severity: Severity,
    pub build: RuleConstructor,
}

impl fmt::Debug for RuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleDescriptor")
            .field("id", &self.id)
            .field("default_severity", &self.default_severity)
            .finish_non_exhaustive()
    }
}

/// Rule identifier -> constructor. Explicit value, no global state:
/// build one with [`RuleRegistry::builtin`] and extend it with `register`.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    descriptors: Vec<RuleDescriptor>,
}

impl RuleRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Built-in rules, in evaluation order.
    pub fn builtin() -> Self {
        Self {
            descriptors: vec![
                ownership::REQUIRE_OWNER,
                documentation::REQUIRE_DESCRIPTION,
                ownership::REQUIRE_DOMAIN,
                lineage::NO_DEPRECATED_UPSTREAM,
                ownership::UPSTREAM_MUST_HAVE_OWNER,
                documentation::REQUIRE_TAGS,
                documentation::REQUIRE_COLUMN_DESCRIPTIONS,
                conventions::NAMING_CONVENTION,
                conventions::REQUIRE_MATERIALIZATION,
                lineage::MAX_UPSTREAM_DEPENDENCIES,
                conventions::REQUIRE_PII_TAG,
            ],
        }
    }

    pub fn register(&mut self, descriptor: RuleDescriptor) -> Result<(), ConfigError> {
        if self.get(descriptor.id).is_some() {
            return Err(ConfigError::DuplicateRule(descriptor.id.to_string()));
        }
        self.descriptors.push(descriptor);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&RuleDescriptor> {
        self.descriptors.iter().find(|d| d.id == id)
    }

    /// Registration order.
    pub fn descriptors(&self) -> &[RuleDescriptor] {
        &self.descriptors
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.descriptors.iter().map(|d| d.id).collect()
    }

    pub fn unknown_rule(&self, id: &str) -> ConfigError {
        ConfigError::UnknownRule {
            rule: id.to_string(),
            available: self.ids().join(", "),
        }
    }

    pub fn instantiate(&self, id: &str, params: &RuleParams) -> Result<Box<dyn Rule>, ConfigError> {
        let descriptor = self.get(id).ok_or_else(|| self.unknown_rule(id))?;
        (descriptor.build)(params)
    }
}
