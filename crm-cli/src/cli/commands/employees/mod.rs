//! Employee roster commands

mod handler;

use clap::Subcommand;

pub use handler::handle_employee_command;

#[derive(Subcommand, Debug)]
pub enum EmployeeCommands {
    /// List employees
    List,
    /// Add an employee, or replace the one with the same id
    Add {
        /// Full name; prompted for when omitted
        name: Option<String>,
        /// Role label, e.g. "Presales Consultant"; prompted for when omitted
        role: Option<String>,
        /// Explicit id (defaults to EMP-<millis>)
        #[arg(long)]
        id: Option<String>,
        /// Mark the employee inactive
        #[arg(long)]
        inactive: bool,
    },
}
