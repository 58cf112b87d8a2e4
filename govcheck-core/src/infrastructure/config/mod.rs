// govcheck-core/src/infrastructure/config/mod.rs

pub mod connection;
pub mod loader;

pub use connection::DataHubConnection;
pub use loader::{CONFIG_FILE_NAMES, find_config_file, load_config, load_config_file, write_starter_config};
