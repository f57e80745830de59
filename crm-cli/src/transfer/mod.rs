//! CSV templates, import and export for pipeline records
//!
//! Column layouts live in [`mapping`] as one declarative table per record
//! kind; [`csv`] reads and writes files against those tables.

pub mod mapping;
pub mod csv;

pub use mapping::{resolve_header, validate_all_mappings};
pub use self::csv::{
    ImportError, ImportOptions, ImportReport, check_csv_path, export_filename, parse_records,
    render_export, render_template, write_download,
};
