// govcheck/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use govcheck_core::infrastructure::reporters::ReportFormat;

#[derive(Parser)]
#[command(name = "govcheck")]
#[command(about = "Governance rules for dbt models, checked against DataHub", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Debug logging on stderr
    #[arg(long, short, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(long, short, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// DataHub connection flags, shared by `validate` and `test-connection`.
#[derive(Args, Debug, Clone, Default)]
pub struct DataHubArgs {
    /// DataHub GMS URL (falls back to DATAHUB_GMS_URL / DATAHUB_SERVER)
    #[arg(long)]
    pub datahub_server: Option<String>,

    /// DataHub access token (falls back to DATAHUB_GMS_TOKEN / DATAHUB_TOKEN)
    #[arg(long)]
    pub datahub_token: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to dbt's target/manifest.json
    #[arg(long, short)]
    pub manifest: PathBuf,

    /// Path to dbt's target/catalog.json (column types and comments)
    #[arg(long)]
    pub dbt_catalog: Option<PathBuf>,

    /// Governance config file (default: discovered governance.yml)
    #[arg(long = "config", short = 'C')]
    pub config: Option<PathBuf>,

    #[command(flatten)]
    pub datahub: DataHubArgs,

    /// Target platform used to build dataset URNs (snowflake, bigquery, ...)
    #[arg(long, short)]
    pub platform: Option<String>,

    /// DataHub environment (PROD, DEV, ...)
    #[arg(long, short)]
    pub environment: Option<String>,

    /// Validate a single model, ignoring include/exclude patterns
    #[arg(long, short = 'M')]
    pub model: Option<String>,

    /// Output format: console | json | markdown | github
    #[arg(long, short, default_value = "console")]
    pub format: ReportFormat,

    /// Write the report to a file instead of stdout
    #[arg(long, short)]
    pub output: Option<PathBuf>,

    /// Include passed checks in console and markdown output
    #[arg(long)]
    pub show_passed: bool,

    /// Treat warnings as failures
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Skip DataHub and use a synthetic catalog where every model is owned
    #[arg(long, conflicts_with = "catalog_snapshot")]
    pub dry_run: bool,

    /// JSON file of catalog records keyed by URN or model name
    #[arg(long)]
    pub catalog_snapshot: Option<PathBuf>,

    /// Maximum number of concurrent catalog lookups
    #[arg(long, default_value_t = govcheck_core::application::DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 🛡️  Validates dbt models against the governance rules
    Validate(Box<ValidateArgs>),

    /// 📝 Writes a starter governance.yml
    Init {
        #[arg(long, short, default_value = "governance.yml")]
        output: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// 📚 Lists the available rules
    ListRules,

    /// 🔍 Lists the models of a manifest with their dataset URNs
    ListModels {
        #[arg(long, short)]
        manifest: PathBuf,

        #[arg(long, short)]
        platform: Option<String>,

        #[arg(long, short)]
        environment: Option<String>,
    },

    /// 🔌 Checks that the DataHub server is reachable
    TestConnection {
        #[command(flatten)]
        datahub: DataHubArgs,
    },
}
