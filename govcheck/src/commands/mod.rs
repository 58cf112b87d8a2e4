// govcheck/src/commands/mod.rs

pub mod init;
pub mod list_models;
pub mod list_rules;
pub mod test_connection;
pub mod validate;
