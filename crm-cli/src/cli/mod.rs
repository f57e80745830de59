//! Command-line surface

pub mod commands;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use is_terminal::IsTerminal;

use crate::config::Config;
use crate::models::{ActionItem, Lead, Opportunity, Sale, UserRole};
use commands::config::{ConfigCommands, handle_config_command};
use commands::employees::{EmployeeCommands, handle_employee_command};
use commands::records::{RecordCommands, handle_record_command};

#[derive(Parser, Debug)]
#[command(
    name = "crm-cli",
    version,
    about = "Track leads, opportunities, sales and action items from the terminal"
)]
pub struct Cli {
    /// Act as this user (overrides config and CRM_CLI_USER)
    #[arg(long, global = true)]
    pub user: Option<String>,

    /// Act with this role, e.g. "Sales Head" (overrides config and CRM_CLI_ROLE)
    #[arg(long, global = true)]
    pub role: Option<String>,

    /// Records file (overrides config and CRM_CLI_DATA_FILE)
    #[arg(long, global = true, value_name = "FILE")]
    pub data_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage leads
    Leads {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Manage opportunities
    #[command(alias = "opps")]
    Opportunities {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Manage sales
    Sales {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Manage action items
    #[command(alias = "tasks")]
    Actions {
        #[command(subcommand)]
        command: RecordCommands,
    },
    /// Manage the employee roster used by assignee pickers
    Employees {
        #[command(subcommand)]
        command: EmployeeCommands,
    },
    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Effective identity and settings for one invocation
#[derive(Debug, Clone)]
pub struct Session {
    pub config: Config,
    pub user: String,
    pub role: UserRole,
    pub data_file: PathBuf,
}

impl Session {
    /// Command-line flags win over the loaded config
    pub fn new(
        config: Config,
        user: Option<String>,
        role: Option<String>,
        data_file: Option<PathBuf>,
    ) -> Self {
        let user = user.unwrap_or_else(|| config.user.name.clone());
        let role = role
            .map(|r| UserRole::from_label(&r))
            .unwrap_or_else(|| config.user.role.clone());
        let data_file = data_file.unwrap_or_else(|| config.data_file());
        Self {
            config,
            user,
            role,
            data_file,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    if cli.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if cfg!(debug_assertions) {
        crate::transfer::validate_all_mappings()?;
    }

    let config = Config::load()?;
    let session = Session::new(config, cli.user, cli.role, cli.data_file);
    log::debug!(
        "Running as {} ({}), data file {}",
        session.user,
        session.role,
        session.data_file.display()
    );

    match cli.command {
        Commands::Leads { command } => handle_record_command::<Lead>(command, &session).await,
        Commands::Opportunities { command } => {
            handle_record_command::<Opportunity>(command, &session).await
        }
        Commands::Sales { command } => handle_record_command::<Sale>(command, &session).await,
        Commands::Actions { command } => {
            handle_record_command::<ActionItem>(command, &session).await
        }
        Commands::Employees { command } => handle_employee_command(command, &session),
        Commands::Config { command } => handle_config_command(command, &session),
    }
}
