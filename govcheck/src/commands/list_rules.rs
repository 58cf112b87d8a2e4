// govcheck/src/commands/list_rules.rs

use comfy_table::{Table, presets};

use govcheck_core::domain::rules::RuleRegistry;

pub fn execute() -> miette::Result<()> {
    let registry = RuleRegistry::builtin();

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_header(vec!["Rule", "Default severity", "Description"]);
    for rule in registry.descriptors() {
        table.add_row(vec![
            rule.id.to_string(),
            rule.default_severity.to_string(),
            rule.description.to_string(),
        ]);
    }

    println!("📚 Available rules ({})\n", registry.descriptors().len());
    println!("{table}");
    Ok(())
}
