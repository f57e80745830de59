//! Commands shared by the four record kinds

mod handler;

use std::path::PathBuf;

use clap::Subcommand;

pub use handler::handle_record_command;

#[derive(Subcommand, Debug)]
pub enum RecordCommands {
    /// List the records you can see
    List,
    /// Write the CSV import template
    Template {
        /// Output directory (defaults to the configured export directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Import records from a CSV file
    Import {
        /// A `.csv` file laid out like the template
        file: PathBuf,
        /// Reject rows with problems instead of importing them with defaults
        #[arg(long)]
        strict: bool,
    },
    /// Export selected records to CSV
    Export {
        /// Select every visible record
        #[arg(long, conflicts_with = "ids", required_unless_present = "ids")]
        all: bool,
        /// Select one record by id (repeatable)
        #[arg(long = "id", value_name = "ID")]
        ids: Vec<String>,
        /// Output directory (defaults to the configured export directory)
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },
    /// Create a record
    New {
        /// Field value, by field name or CSV header (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Remark appended to the history
        #[arg(long)]
        remark: Option<String>,
        /// Choose the assignee from the employee roster
        #[arg(long)]
        pick_assignee: bool,
    },
    /// Edit a record
    Edit {
        id: String,
        /// Field value, by field name or CSV header (repeatable)
        #[arg(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
        /// Remark appended to the history
        #[arg(long)]
        remark: Option<String>,
        /// Choose the assignee from the employee roster
        #[arg(long)]
        pick_assignee: bool,
    },
}
