// govcheck-core/src/infrastructure/config/loader.rs

use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

use crate::domain::governance::GovernanceConfig;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::{atomic_write, read_file};

/// File names looked up, in order, in each directory.
pub const CONFIG_FILE_NAMES: &[&str] = &[
    "governance.yml",
    "governance.yaml",
    ".governance.yml",
    ".governance.yaml",
];

pub const ENV_PLATFORM: &str = "GOVCHECK_PLATFORM";
pub const ENV_ENVIRONMENT: &str = "GOVCHECK_ENVIRONMENT";

/// Walks up from `start` until a governance config file is found.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

#[instrument]
pub fn load_config_file(path: &Path) -> Result<GovernanceConfig, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(path.display().to_string()));
    }
    let content = read_file(path)?;
    // An empty file means "all defaults".
    if content.trim().is_empty() {
        return Ok(GovernanceConfig::default());
    }
    let config: GovernanceConfig = serde_yaml::from_str(&content)?;
    info!(path = %path.display(), rules = config.rules.len(), "Loaded governance config");
    Ok(config)
}

/// Explicit path, else discovery from `search_from`, else built-in defaults.
/// Environment overrides are applied on top in every case.
pub fn load_config(explicit: Option<&Path>, search_from: &Path) -> Result<GovernanceConfig, InfrastructureError> {
    let mut config = match explicit {
        Some(path) => load_config_file(path)?,
        None => match find_config_file(search_from) {
            Some(path) => load_config_file(&path)?,
            None => {
                info!("No governance config found, using defaults");
                GovernanceConfig::default()
            }
        },
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

// Permet de faire: GOVCHECK_ENVIRONMENT=DEV govcheck validate ...
pub fn apply_env_overrides<F>(config: &mut GovernanceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(val) = non_empty(ENV_PLATFORM) {
        debug!(old = %config.target_platform, new = %val, "Overriding platform via ENV");
        config.target_platform = val;
    }
    if let Some(val) = non_empty(ENV_ENVIRONMENT) {
        debug!(old = %config.environment, new = %val, "Overriding environment via ENV");
        config.environment = val;
    }
}

/// Commented starter config written by `govcheck init`.
pub const STARTER_CONFIG: &str = r#"# Governance rules for this dbt project.
# Run `govcheck list-rules` to see every available rule.

target_platform: snowflake
environment: PROD
# platform_instance: my_instance

# Fail the run when warnings are found (errors always fail).
fail_on_warnings: false

# Glob patterns matched against the model name or its file path.
include_patterns:
  - "*"
exclude_patterns: []
#  - "tmp_*"

rules:
  require_owner:
    enabled: true
    severity: error

  require_description:
    enabled: true
    severity: error
    # config:
    #   min_length: 10

  require_domain:
    enabled: false
    severity: warning

  no_deprecated_upstream:
    enabled: true
    severity: error

  upstream_must_have_owner:
    enabled: true
    severity: warning

  # max_upstream_dependencies:
  #   enabled: true
  #   severity: warning
  #   config:
  #     max_dependencies: 10

  # naming_convention:
  #   enabled: true
  #   config:
  #     pattern: "^(stg|int|dim|fct)_"
"#;

/// Writes the starter config. Refuses to overwrite unless `force` is set.
pub fn write_starter_config(path: &Path, force: bool) -> Result<(), InfrastructureError> {
    if path.exists() && !force {
        return Err(InfrastructureError::ConfigError(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    atomic_write(path, STARTER_CONFIG)?;
    info!(path = %path.display(), "Wrote starter governance config");
    Ok(())
}
