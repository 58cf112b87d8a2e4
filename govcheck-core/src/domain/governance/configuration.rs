// govcheck-core/src/domain/governance/configuration.rs

use serde::de::value::MapAccessDeserializer;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use validator::Validate;

use super::severity::Severity;
use crate::domain::error::ConfigError;

/// Governance settings loaded from `governance.yml`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Validate)]
pub struct GovernanceConfig {
    #[serde(default = "default_platform")]
    #[validate(length(min = 1, message = "target_platform cannot be empty"))]
    pub target_platform: String,

    #[serde(default = "default_environment")]
    #[validate(length(min = 1, message = "environment cannot be empty"))]
    pub environment: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform_instance: Option<String>,

    #[serde(default)]
    pub fail_on_warnings: bool,

    #[serde(default = "default_include_patterns")]
    pub include_patterns: Vec<String>,

    #[serde(default)]
    pub exclude_patterns: Vec<String>,

    /// Rules absent from this map are not evaluated.
    #[serde(default)]
    pub rules: BTreeMap<String, RuleConfig>,
}

fn default_platform() -> String {
    "snowflake".to_string()
}

fn default_environment() -> String {
    "PROD".to_string()
}

fn default_include_patterns() -> Vec<String> {
    vec!["*".to_string()]
}

fn default_true() -> bool {
    true
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        let rules = [
            ("require_owner", true, Severity::Error, "All models must have an owner assigned in the catalog"),
            ("require_description", true, Severity::Error, "All models must have a description"),
            ("require_domain", false, Severity::Warning, "All models should be assigned to a domain"),
            ("no_deprecated_upstream", true, Severity::Error, "Models cannot depend on deprecated upstream datasets"),
            ("upstream_must_have_owner", true, Severity::Warning, "Upstream dependencies should have owners"),
        ]
        .into_iter()
        .map(|(name, enabled, severity, description)| {
            (
                name.to_string(),
                RuleConfig {
                    enabled,
                    severity: Some(severity),
                    description: Some(description.to_string()),
                    params: RuleParams::default(),
                },
            )
        })
        .collect();

        Self {
            target_platform: default_platform(),
            environment: default_environment(),
            platform_instance: None,
            fail_on_warnings: false,
            include_patterns: default_include_patterns(),
            exclude_patterns: Vec::new(),
            rules,
        }
    }
}

impl GovernanceConfig {
    /// Structural validation (field constraints). Rule identifiers and
    /// parameters are checked against the registry when the engine is built.
    pub fn check(&self) -> Result<(), ConfigError> {
        self.validate()
            .map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, &RuleConfig)> {
        self.rules
            .iter()
            .filter(|(_, c)| c.enabled)
            .map(|(name, c)| (name.as_str(), c))
    }
}

/// Per-rule settings. Accepts the `require_owner: true` shorthand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRuleConfig")]
pub struct RuleConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "config", skip_serializing_if = "RuleParams::is_empty")]
    pub params: RuleParams,
}

impl RuleConfig {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            severity: None,
            description: None,
            params: RuleParams::default(),
        }
    }

    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    pub fn with_param(mut self, key: &str, value: impl Into<serde_yaml::Value>) -> Self {
        self.params.0.insert(key.to_string(), value.into());
        self
    }
}

enum RawRuleConfig {
    Toggle(bool),
    Detailed(DetailedRuleConfig),
}

// Errors inside a settings map keep their field path
// (e.g. `rules.require_owner.severity`).
impl<'de> Deserialize<'de> for RawRuleConfig {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RawRuleVisitor;

        impl<'de> Visitor<'de> for RawRuleVisitor {
            type Value = RawRuleConfig;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("`true`, `false` or a map of rule settings")
            }

            fn visit_bool<E: de::Error>(self, enabled: bool) -> Result<Self::Value, E> {
                Ok(RawRuleConfig::Toggle(enabled))
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                DetailedRuleConfig::deserialize(MapAccessDeserializer::new(map))
                    .map(RawRuleConfig::Detailed)
            }
        }

        deserializer.deserialize_any(RawRuleVisitor)
    }
}

#[derive(Deserialize)]
struct DetailedRuleConfig {
    #[serde(default = "default_true")]
    enabled: bool,
    #[serde(default)]
    severity: Option<Severity>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, alias = "params")]
    config: RuleParams,
}

impl From<RawRuleConfig> for RuleConfig {
    fn from(raw: RawRuleConfig) -> Self {
        match raw {
            RawRuleConfig::Toggle(enabled) => Self {
                enabled,
                ..Self::enabled()
            },
            RawRuleConfig::Detailed(d) => Self {
                enabled: d.enabled,
                severity: d.severity,
                description: d.description,
                params: d.config,
            },
        }
    }
}

/// Free-form rule parameters (`config:` block of a rule).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleParams(pub BTreeMap<String, serde_yaml::Value>);

impl RuleParams {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Typed accessor that reports errors against `rule`.
    pub fn reader<'a>(&'a self, rule: &'a str) -> ParamReader<'a> {
        ParamReader { rule, params: self }
    }
}

pub struct ParamReader<'a> {
    rule: &'a str,
    params: &'a RuleParams,
}

impl ParamReader<'_> {
    fn invalid(&self, param: &str, reason: impl Into<String>) -> ConfigError {
        ConfigError::InvalidParam {
            rule: self.rule.to_string(),
            param: param.to_string(),
            reason: reason.into(),
        }
    }

    pub fn usize(&self, key: &str) -> Result<Option<usize>, ConfigError> {
        match self.params.0.get(key) {
            None | Some(serde_yaml::Value::Null) => Ok(None),
            Some(value) => value
                .as_u64()
                .and_then(|v| usize::try_from(v).ok())
                .map(Some)
                .ok_or_else(|| self.invalid(key, "expected a non-negative integer")),
        }
    }

    pub fn string(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.params.0.get(key) {
            None | Some(serde_yaml::Value::Null) => Ok(None),
            Some(serde_yaml::Value::String(s)) => Ok(Some(s.clone())),
            Some(_) => Err(self.invalid(key, "expected a string")),
        }
    }

    /// Accepts a list of strings or a single string.
    pub fn string_list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        match self.params.0.get(key) {
            None | Some(serde_yaml::Value::Null) => Ok(None),
            Some(serde_yaml::Value::String(s)) => Ok(Some(vec![s.clone()])),
            Some(serde_yaml::Value::Sequence(items)) => items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(String::from)
                        .ok_or_else(|| self.invalid(key, "expected a list of strings"))
                })
                .collect::<Result<Vec<_>, _>>()
                .map(Some),
            Some(_) => Err(self.invalid(key, "expected a list of strings")),
        }
    }

    pub fn invalid_param(&self, key: &str, reason: impl Into<String>) -> ConfigError {
        self.invalid(key, reason)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_full_config_deserialization() -> Result<()> {
        let yaml = r#"
target_platform: bigquery
environment: DEV
fail_on_warnings: true
exclude_patterns: ["tmp_*"]
rules:
  require_owner: true
  require_domain: false
  max_upstream_dependencies:
    severity: WARNING
    config:
      max_dependencies: 3
  naming_convention:
    enabled: false
"#;
        let config: GovernanceConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.target_platform, "bigquery");
        assert_eq!(config.include_patterns, ["*"]);
        assert!(config.fail_on_warnings);

        let owner = &config.rules["require_owner"];
        assert!(owner.enabled);
        assert_eq!(owner.severity, None);

        assert!(!config.rules["require_domain"].enabled);
        assert!(!config.rules["naming_convention"].enabled);

        let deps = &config.rules["max_upstream_dependencies"];
        assert!(deps.enabled);
        assert_eq!(deps.severity, Some(Severity::Warning));
        assert_eq!(deps.params.reader("max_upstream_dependencies").usize("max_dependencies")?, Some(3));

        let enabled: Vec<&str> = config.enabled_rules().map(|(n, _)| n).collect();
        assert_eq!(enabled, ["max_upstream_dependencies", "require_owner"]);
        Ok(())
    }

    #[test]
    fn test_defaults_when_fields_missing() -> Result<()> {
        let config: GovernanceConfig = serde_yaml::from_str("rules: {}")?;
        assert_eq!(config.target_platform, "snowflake");
        assert_eq!(config.environment, "PROD");
        assert!(config.rules.is_empty());
        config.check()?;
        Ok(())
    }

    #[test]
    fn test_default_config_rules() {
        let config = GovernanceConfig::default();
        assert_eq!(config.rules.len(), 5);
        assert!(!config.rules["require_domain"].enabled);
        assert_eq!(
            config.rules["upstream_must_have_owner"].severity,
            Some(Severity::Warning)
        );
    }

    #[test]
    fn test_empty_platform_is_invalid() -> Result<()> {
        let config: GovernanceConfig = serde_yaml::from_str("target_platform: ''")?;
        assert!(matches!(config.check(), Err(ConfigError::Invalid(_))));
        Ok(())
    }

    #[test]
    fn test_bad_severity_names_the_field() {
        let yaml = "rules:\n  require_owner:\n    severity: fatal\n";
        let err = serde_yaml::from_str::<GovernanceConfig>(yaml).unwrap_err().to_string();
        assert!(err.contains("Unknown severity: 'fatal'"), "{err}");
        assert!(err.contains("rules.require_owner.severity"), "{err}");
    }

    #[test]
    fn test_rule_must_be_bool_or_map() {
        let err = serde_yaml::from_str::<GovernanceConfig>("rules:\n  require_owner: 3\n")
            .unwrap_err()
            .to_string();
        assert!(err.contains("`true`, `false` or a map of rule settings"), "{err}");
    }

    #[test]
    fn test_param_reader_type_errors() -> Result<()> {
        let rule = RuleConfig::enabled()
            .with_param("max_dependencies", "ten")
            .with_param("allowed", vec!["table", "view"]);
        let reader = rule.params.reader("max_upstream_dependencies");

        let err = reader.usize("max_dependencies").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidParam { ref param, .. } if param == "max_dependencies"));
        assert_eq!(
            reader.string_list("allowed")?,
            Some(vec!["table".to_string(), "view".to_string()])
        );
        assert_eq!(reader.string("missing")?, None);
        Ok(())
    }
}
