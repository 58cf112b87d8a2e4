// govcheck/src/commands/test_connection.rs

use govcheck_core::infrastructure::catalog::DataHubCatalog;
use govcheck_core::infrastructure::config::DataHubConnection;
use govcheck_core::ports::catalog::CatalogSource;

use crate::cli::DataHubArgs;

/// Returns `true` when the server answered.
pub async fn execute(args: DataHubArgs) -> miette::Result<bool> {
    let connection = DataHubConnection::from_env(args.datahub_server.as_deref(), args.datahub_token.as_deref())?;
    let catalog = DataHubCatalog::new(&connection)?;

    println!("🔌 Connecting to {}...", catalog.describe());
    match catalog.test_connection().await {
        Ok(()) => {
            println!("✅ Connection successful");
            Ok(true)
        }
        Err(e) => {
            eprintln!("❌ Connection failed: {}", e);
            Ok(false)
        }
    }
}
