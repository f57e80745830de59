//! Configuration commands

mod handler;

use clap::Subcommand;

pub use handler::handle_config_command;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
    /// Print the config file location
    Path,
}
