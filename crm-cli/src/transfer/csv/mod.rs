//! CSV reading and writing against the column mappings

mod reader;
mod writer;

pub use reader::{ImportError, ImportOptions, ImportReport, check_csv_path, parse_records};
pub use writer::{export_filename, render_export, render_template, write_download};
