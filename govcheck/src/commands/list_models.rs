// govcheck/src/commands/list_models.rs
//
// USE CASE: Show which dataset URN each model maps to.

use std::path::PathBuf;

use comfy_table::{Table, presets};

use govcheck_core::GovcheckError;
use govcheck_core::domain::catalog::UrnMapper;
use govcheck_core::domain::graph::ModelGraph;
use govcheck_core::infrastructure::config::load_config;
use govcheck_core::infrastructure::manifest::DbtManifestSource;
use govcheck_core::ports::manifest::ManifestSource;
use miette::IntoDiagnostic;

pub fn execute(manifest: PathBuf, platform: Option<String>, environment: Option<String>) -> miette::Result<()> {
    let cwd = std::env::current_dir().into_diagnostic()?;
    let config = load_config(None, &cwd)?;
    let mapper = UrnMapper::new(
        platform.as_deref().unwrap_or(&config.target_platform),
        environment.as_deref().unwrap_or(&config.environment),
        config.platform_instance.as_deref(),
    );

    let records = DbtManifestSource::new(&manifest).load()?;
    let graph = ModelGraph::from_records(records).map_err(GovcheckError::from)?;

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(vec!["Model", "Materialization", "Upstream", "URN"]);
    for entity in graph.entities() {
        table.add_row(vec![
            entity.id.clone(),
            entity.materialization.as_ref().map(|m| m.as_str().to_string()).unwrap_or_default(),
            entity.upstream().len().to_string(),
            mapper.urn(entity),
        ]);
    }

    println!("🔍 {} model(s) in {}\n", graph.len(), manifest.display());
    println!("{table}");
    Ok(())
}
