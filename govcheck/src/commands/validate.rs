// govcheck/src/commands/validate.rs
//
// USE CASE: Validate the models of a dbt manifest against the governance rules.

use std::path::Path;
use std::sync::Arc;

use miette::IntoDiagnostic;
use tracing::info;

use govcheck_core::application::{ValidationRequest, validate_project};
use govcheck_core::domain::governance::GovernanceConfig;
use govcheck_core::domain::graph::ModelGraph;
use govcheck_core::domain::rules::RuleRegistry;
use govcheck_core::infrastructure::catalog::{DataHubCatalog, InMemoryCatalog};
use govcheck_core::infrastructure::config::{DataHubConnection, load_config};
use govcheck_core::infrastructure::fs::atomic_write;
use govcheck_core::infrastructure::manifest::DbtManifestSource;
use govcheck_core::ports::catalog::CatalogSource;
use govcheck_core::ports::manifest::ManifestSource;
use govcheck_core::ports::renderer::{RenderOptions, ReportRenderer};

use crate::cli::ValidateArgs;

/// Flags win over the config file and the environment.
fn apply_overrides(config: &mut GovernanceConfig, args: &ValidateArgs) {
    if let Some(platform) = &args.platform {
        config.target_platform = platform.clone();
    }
    if let Some(environment) = &args.environment {
        config.environment = environment.clone();
    }
    if args.fail_on_warnings {
        config.fail_on_warnings = true;
    }
}

fn build_catalog(args: &ValidateArgs, graph: &ModelGraph) -> miette::Result<Arc<dyn CatalogSource>> {
    if args.dry_run {
        return Ok(Arc::new(InMemoryCatalog::dry_run(graph)));
    }
    if let Some(snapshot) = &args.catalog_snapshot {
        return Ok(Arc::new(InMemoryCatalog::from_snapshot_file(snapshot)?));
    }
    let connection = DataHubConnection::from_env(
        args.datahub.datahub_server.as_deref(),
        args.datahub.datahub_token.as_deref(),
    )?;
    info!(?connection, "Using DataHub catalog");
    Ok(Arc::new(DataHubCatalog::new(&connection)?))
}

/// Returns `true` when the report is successful.
pub async fn execute(args: ValidateArgs) -> miette::Result<bool> {
    // 1. Config
    let cwd = std::env::current_dir().into_diagnostic()?;
    let mut config = load_config(args.config.as_deref(), &cwd)?;
    apply_overrides(&mut config, &args);

    // 2. Manifest -> graph
    let records = DbtManifestSource::new(&args.manifest)
        .with_catalog(args.dbt_catalog.clone())
        .load()?;
    let graph = ModelGraph::from_records(records).map_err(govcheck_core::GovcheckError::from)?;
    info!(models = graph.len(), "Loaded dbt manifest");

    // 3. Catalog
    let catalog = build_catalog(&args, &graph)?;
    info!(catalog = %catalog.describe(), "Resolving governance metadata");

    // 4. Rules
    let registry = RuleRegistry::builtin();
    let request = ValidationRequest::new(&graph, &config, &registry, catalog)
        .select(args.model.clone())
        .concurrency(args.concurrency);
    let report = validate_project(request).await?;

    // 5. Report
    let options = RenderOptions {
        show_passed: args.show_passed,
    };
    let rendered = args.format.renderer().render(&report, options)?;
    write_output(&rendered, args.output.as_deref())?;

    Ok(report.is_successful())
}

fn write_output(rendered: &str, output: Option<&Path>) -> miette::Result<()> {
    match output {
        Some(path) => {
            atomic_write(path, rendered)?;
            info!(path = %path.display(), "Report written");
        }
        None => print!("{rendered}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use anyhow::{Result, bail};
    use clap::Parser;

    #[test]
    fn test_flags_override_config() -> Result<()> {
        let cli = Cli::parse_from([
            "govcheck",
            "validate",
            "-m",
            "m.json",
            "-p",
            "postgres",
            "-e",
            "DEV",
            "--fail-on-warnings",
        ]);
        let Commands::Validate(args) = cli.command else {
            bail!("Expected Validate command");
        };
        let mut config = GovernanceConfig::default();
        apply_overrides(&mut config, &args);
        assert_eq!(config.target_platform, "postgres");
        assert_eq!(config.environment, "DEV");
        assert!(config.fail_on_warnings);
        Ok(())
    }

    #[test]
    fn test_absent_flags_keep_config() -> Result<()> {
        let cli = Cli::parse_from(["govcheck", "validate", "-m", "m.json"]);
        let Commands::Validate(args) = cli.command else {
            bail!("Expected Validate command");
        };
        let mut config = GovernanceConfig {
            fail_on_warnings: true,
            ..GovernanceConfig::default()
        };
        apply_overrides(&mut config, &args);
        assert_eq!(config.target_platform, "snowflake");
        assert!(config.fail_on_warnings);
        Ok(())
    }
}
