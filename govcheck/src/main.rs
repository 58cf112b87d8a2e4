// govcheck/src/main.rs

use std::process::ExitCode;

use clap::Parser;
use tracing::Level;

mod cli;
mod commands;

use cli::{Cli, Commands};

// Exit codes: 0 = success, 1 = governance violations, 2 = could not produce a report.
const EXIT_VIOLATIONS: u8 = 1;
const EXIT_FATAL: u8 = 2;

fn init_tracing(cli: &Cli) {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };
    // Logs go to stderr: stdout is reserved for the report.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli);

    let result = match cli.command {
        // --- USE CASE: VALIDATE ---
        Commands::Validate(args) => commands::validate::execute(*args).await,

        // --- USE CASE: SCAFFOLDING ---
        Commands::Init { output, force } => commands::init::execute(output, force).map(|()| true),

        // --- INTROSPECTION ---
        Commands::ListRules => commands::list_rules::execute().map(|()| true),
        Commands::ListModels {
            manifest,
            platform,
            environment,
        } => commands::list_models::execute(manifest, platform, environment).map(|()| true),

        // --- CONNECTIVITY ---
        Commands::TestConnection { datahub } => commands::test_connection::execute(datahub).await,
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(EXIT_VIOLATIONS),
        Err(report) => {
            eprintln!("{report:?}");
            ExitCode::from(EXIT_FATAL)
        }
    }
}
