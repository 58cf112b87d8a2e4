// govcheck/src/commands/init.rs
//
// USE CASE: Scaffold a governance.yml.

use std::path::PathBuf;

use govcheck_core::infrastructure::config::write_starter_config;

pub fn execute(output: PathBuf, force: bool) -> miette::Result<()> {
    write_starter_config(&output, force)?;
    println!("✨ Created {}", output.display());
    println!("   Edit the rules, then run: govcheck validate --manifest target/manifest.json");
    Ok(())
}
