//! Typed field parsing and formatting shared by all record kinds
//!
//! Records expose their fields to the CSV layer and the form layer as
//! strings keyed by canonical field name. These helpers convert between
//! that string form and the typed struct fields.

use chrono::NaiveDate;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Error raised when a raw string cannot be stored in a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldError {
    /// Numeric field got something that is not a number
    InvalidNumber { field: String, value: String },
    /// Date field got something that is not `YYYY-MM-DD`
    InvalidDate { field: String, value: String },
    /// Closed-vocabulary field got an unknown option
    InvalidOption { field: String, value: String },
    /// Field is computed or assigned by the system
    ReadOnly { field: String },
    /// No such field on this record kind
    UnknownField { field: String },
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldError::InvalidNumber { field, value } => {
                write!(f, "'{}' is not a number (field '{}')", value, field)
            }
            FieldError::InvalidDate { field, value } => {
                write!(f, "'{}' is not a YYYY-MM-DD date (field '{}')", value, field)
            }
            FieldError::InvalidOption { field, value } => {
                write!(f, "'{}' is not a valid option for field '{}'", value, field)
            }
            FieldError::ReadOnly { field } => write!(f, "field '{}' cannot be set directly", field),
            FieldError::UnknownField { field } => write!(f, "unknown field '{}'", field),
        }
    }
}

impl std::error::Error for FieldError {}

/// Parse a number; blank input means zero
pub fn parse_number(field: &str, raw: &str) -> Result<f64, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .ok_or_else(|| FieldError::InvalidNumber {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// Parse an ISO date; blank input means no date
pub fn parse_date(field: &str, raw: &str) -> Result<Option<NaiveDate>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| FieldError::InvalidDate {
            field: field.to_string(),
            value: raw.to_string(),
        })
}

/// `Yes` is the only spelling that counts as true
pub fn parse_yes_no(raw: &str) -> bool {
    raw.trim() == "Yes"
}

pub fn format_yes_no(value: bool) -> String {
    if value { "Yes" } else { "No" }.to_string()
}

/// Whole numbers print without a fractional part (`50000`, not `50000.0`)
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

pub fn format_date(value: Option<NaiveDate>) -> String {
    value
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}
