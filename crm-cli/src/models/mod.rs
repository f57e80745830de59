//! Pipeline record types
//!
//! Four record kinds share the [`Record`] trait, which exposes every field
//! as a string under its canonical camelCase key. The CSV and form layers
//! are written once against that trait.

mod field;
mod ids;
mod remark;
mod role;
mod lead;
mod opportunity;
mod sale;
mod action_item;
mod employee;
pub mod options;

pub use field::{DATE_FORMAT, FieldError};
pub use ids::{import_id, record_id};
pub use remark::{RemarkEntry, append_remark};
pub use role::UserRole;
pub use lead::Lead;
pub use opportunity::{OppStage, Opportunity};
pub use sale::Sale;
pub use action_item::ActionItem;
pub use employee::{Employee, EmployeeStatus};

use std::collections::BTreeMap;

use chrono::{DateTime, Local};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// The four kinds of pipeline record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Leads,
    Opportunities,
    Sales,
    ActionItems,
}

impl RecordKind {
    /// Prefix for generated identifiers
    pub fn id_prefix(&self) -> &'static str {
        match self {
            RecordKind::Leads => "LD",
            RecordKind::Opportunities => "OPP",
            RecordKind::Sales => "SALE",
            RecordKind::ActionItems => "ACT",
        }
    }

    /// Get display label for UI
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Leads => "Lead",
            RecordKind::Opportunities => "Opportunity",
            RecordKind::Sales => "Sale",
            RecordKind::ActionItems => "Action Item",
        }
    }

    /// File name prefix for exports (`<prefix>_export_<date>.csv`)
    pub fn export_prefix(&self) -> &'static str {
        match self {
            RecordKind::Leads => "leads",
            RecordKind::Opportunities => "opportunities",
            RecordKind::Sales => "sales",
            RecordKind::ActionItems => "tasks",
        }
    }

    pub fn template_filename(&self) -> &'static str {
        match self {
            RecordKind::Leads => "leads_import_template.csv",
            RecordKind::Opportunities => "opps_import_template.csv",
            RecordKind::Sales => "sales_import_template.csv",
            RecordKind::ActionItems => "action_items_template.csv",
        }
    }

    pub fn all_variants() -> &'static [RecordKind] {
        &[
            RecordKind::Leads,
            RecordKind::Opportunities,
            RecordKind::Sales,
            RecordKind::ActionItems,
        ]
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Common behavior of every pipeline record
pub trait Record: Clone + Default + Serialize + DeserializeOwned {
    const KIND: RecordKind;

    /// Canonical keys of the typed fields, in form order
    const FIELDS: &'static [&'static str];

    /// Fields the form refuses to submit while blank
    const REQUIRED: &'static [&'static str];

    /// Fields computed from other fields; the form never edits them directly
    const DERIVED: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn set_id(&mut self, id: String);

    fn owner(&self) -> &str;

    fn assignee(&self) -> &str;

    /// Read a field as a string; falls back to extra columns, `None` if absent
    fn field(&self, key: &str) -> Option<String>;

    /// Store a raw string in a field; unknown keys land in the extra columns
    fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FieldError>;

    /// Remark history, for kinds that keep one
    fn remarks_history_mut(&mut self) -> Option<&mut Vec<RemarkEntry>> {
        None
    }

    /// Hook run by the form after a field is edited
    fn on_field_changed(&mut self, _key: &str) {}

    /// Hook run when a form opens on this record
    fn on_form_open(&mut self) {}

    /// A blank record as the create form shows it
    fn create_defaults(user: &str, now: DateTime<Local>) -> Self;

    /// Attach the owner and kind-specific defaults to a freshly imported row
    ///
    /// `row` holds the raw values of the row keyed by resolved field name.
    fn apply_import_defaults(&mut self, row: &BTreeMap<String, String>, user: &str, now: DateTime<Local>);

    /// Column labels of the list view
    fn list_columns() -> &'static [&'static str];

    /// One list-view row
    fn list_row(&self) -> Vec<String>;

    /// Whether a canonical key names a typed field
    fn is_known_field(key: &str) -> bool {
        key == "id" || Self::FIELDS.contains(&key)
    }
}
