use anyhow::Result;
use colored::*;

use super::ConfigCommands;
use crate::cli::Session;
use crate::config::Config;

pub fn handle_config_command(command: ConfigCommands, session: &Session) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let mut effective = session.config.clone();
            effective.user.name = session.user.clone();
            effective.user.role = session.role.clone();
            effective.storage.data_file = Some(session.data_file.clone());
            print!("{}", effective.to_toml()?);
        }
        ConfigCommands::Path => {
            let path = Config::default_path();
            let note = if path.exists() { "" } else { " (not created yet)" };
            println!("{}{}", path.display().to_string().cyan(), note.dimmed());
        }
    }
    Ok(())
}
