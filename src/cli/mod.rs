//! CLI command handling module
//!
//! Handles the `config` subcommands, logging setup and version output. The
//! check itself is driven from `main.rs`.

mod config;
mod logging;
mod version;

pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;
pub use version::{display_version, version_string};
