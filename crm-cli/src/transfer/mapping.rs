//! Static column mappings for CSV templates, imports and exports
//!
//! Each record kind has three tables:
//! - the import table, mapping template headers to canonical field names,
//! - the template header row with its example values,
//! - the export columns.
//!
//! Headers missing from the import table resolve to their lower-cased text,
//! so unmapped columns still land on the record as extra fields.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use once_cell::sync::Lazy;

use crate::models::{ActionItem, DATE_FORMAT, Lead, Opportunity, Record, RecordKind, Sale};

/// Single mapping from a CSV header to a record field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldMapping {
    pub csv_column: &'static str,
    pub field: &'static str,
}

const fn map(csv_column: &'static str, field: &'static str) -> FieldMapping {
    FieldMapping { csv_column, field }
}

/// Single export column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportColumn {
    pub header: &'static str,
    pub field: &'static str,
}

const fn col(header: &'static str, field: &'static str) -> ExportColumn {
    ExportColumn { header, field }
}

pub const LEAD_IMPORT: &[FieldMapping] = &[
    map("Lead Assignee", "assignee"),
    map("Lead Name", "name"),
    map("Notes", "notes"),
    map("Company Name", "companyName"),
    map("Contact Name", "contactName"),
    map("Contact Number", "contactNumber"),
    map("Region", "region"),
    map("Country", "country"),
    map("Type", "type"),
    map("Priority", "priority"),
    map("Next Step", "nextStep"),
    map("Lead Source", "source"),
    map("Lead Status", "status"),
    map("Remarks", "remarks"),
    map("Start Date", "startDate"),
    map("Closing Date", "closingDate"),
    map("Currency", "currency"),
    map("Value", "value"),
    map("Expected Revenue", "expectedRevenue"),
];

pub const OPPORTUNITY_IMPORT: &[FieldMapping] = &[
    map("Ops Name", "name"),
    map("Account Name", "accountName"),
    map("Contact Name", "contactName"),
    map("Contact Number", "contactNumber"),
    map("Region", "region"),
    map("Country", "country"),
    map("Type", "type"),
    map("Lead Source", "source"),
    map("Next Step", "nextStep"),
    map("Currency", "currency"),
    map("Value", "value"),
    map("Expected Closing Date", "expectedClosingDate"),
    map("Stage", "stage"),
    map("Remarks", "remarks"),
    map("Probability", "probability"),
    map("Feasibility Status", "feasibilityStatus"),
    map("Presales Recommendation", "presalesRecommendation"),
    map("Risks", "risks"),
    map("Expected Revenue", "expectedRevenue"),
    map("Campaign Source", "campaignSource"),
    map("Sales Owner", "salesOwner"),
    map("Technical PoC", "technicalPoC"),
    map("Presales PoC", "presalesPoC"),
    map("Partner Org", "partnerOrg"),
    map("Partner Org Name", "partnerOrgName"),
    map("Partner Contact Name", "partnerContactName"),
    map("Partner Contact Number", "partnerContactNumber"),
    map("Description", "description"),
];

pub const SALE_IMPORT: &[FieldMapping] = &[
    map("Sale Owner", "owner"),
    map("Sale Assignee", "assignee"),
    map("Sale Date", "date"),
    map("Client Name", "clientName"),
    map("Contact Name", "contactName"),
    map("Contact Number", "contactNumber"),
    map("Region", "region"),
    map("Country", "country"),
    map("Priority", "priority"),
    map("Next Step", "nextStep"),
    map("Sale Source", "source"),
    map("Sale Status", "status"),
    map("Remarks", "remarks"),
];

pub const ACTION_ITEM_IMPORT: &[FieldMapping] = &[
    map("Action Item Assignee", "assignee"),
    map("Subject", "subject"),
    map("Due Date", "dueDate"),
    map("Action Type", "actionType"),
    map("Linked Record ID", "linkedRecordId"),
    map("Region", "region"),
    map("Priority", "priority"),
    map("Status", "status"),
    map("Remarks", "remarks"),
    map("Description", "description"),
];

pub const LEAD_EXPORT: &[ExportColumn] = &[
    col("Lead ID", "id"),
    col("Lead Owner", "owner"),
    col("Lead Assignee", "assignee"),
    col("Lead Name", "name"),
    col("Company Name", "companyName"),
    col("Contact Name", "contactName"),
    col("Contact Number", "contactNumber"),
    col("Region", "region"),
    col("Country", "country"),
    col("Type", "type"),
    col("Priority", "priority"),
    col("Next Step", "nextStep"),
    col("Lead Source", "source"),
    col("Lead Status", "status"),
    col("Start Date", "startDate"),
    col("Closing Date", "closingDate"),
    col("Value", "value"),
];

pub const OPPORTUNITY_EXPORT: &[ExportColumn] = &[
    col("OpsID", "id"),
    col("Ops Name", "name"),
    col("Ops Owner", "owner"),
    col("Account Name", "accountName"),
    col("Region", "region"),
    col("Type", "type"),
    col("Source", "source"),
    col("Stage", "stage"),
    col("Value", "value"),
    col("Closing Date", "expectedClosingDate"),
];

pub const SALE_EXPORT: &[ExportColumn] = &[
    col("Sale ID", "id"),
    col("Sale Owner", "owner"),
    col("Sale Assignee", "assignee"),
    col("Sale Date", "date"),
    col("Client Name", "clientName"),
    col("Contact Name", "contactName"),
    col("Contact Number", "contactNumber"),
    col("Region", "region"),
    col("Country", "country"),
    col("Priority", "priority"),
    col("Next Step", "nextStep"),
    col("Sale Source", "source"),
    col("Sale Status", "status"),
    col("Remarks", "remarks"),
];

pub const ACTION_ITEM_EXPORT: &[ExportColumn] = &[
    col("ID", "id"),
    col("Owner", "owner"),
    col("Assignee", "assignee"),
    col("Subject", "subject"),
    col("Due Date", "dueDate"),
    col("Type", "actionType"),
    col("LinkedID", "linkedRecordId"),
    col("Region", "region"),
    col("Priority", "priority"),
    col("Status", "status"),
];

/// Import table for a record kind
pub fn import_mappings(kind: RecordKind) -> &'static [FieldMapping] {
    match kind {
        RecordKind::Leads => LEAD_IMPORT,
        RecordKind::Opportunities => OPPORTUNITY_IMPORT,
        RecordKind::Sales => SALE_IMPORT,
        RecordKind::ActionItems => ACTION_ITEM_IMPORT,
    }
}

/// Export columns for a record kind
pub fn export_columns(kind: RecordKind) -> &'static [ExportColumn] {
    match kind {
        RecordKind::Leads => LEAD_EXPORT,
        RecordKind::Opportunities => OPPORTUNITY_EXPORT,
        RecordKind::Sales => SALE_EXPORT,
        RecordKind::ActionItems => ACTION_ITEM_EXPORT,
    }
}

/// Imported values consumed by the import defaults instead of being stored as a field
///
/// Leads and opportunities turn the `Remarks` column into the first entry of
/// their remark history.
pub fn transient_fields(kind: RecordKind) -> &'static [&'static str] {
    match kind {
        RecordKind::Leads | RecordKind::Opportunities => &["remarks"],
        RecordKind::Sales | RecordKind::ActionItems => &[],
    }
}

/// Template headers are the import table's headers in order
pub fn template_headers(kind: RecordKind) -> Vec<&'static str> {
    import_mappings(kind).iter().map(|m| m.csv_column).collect()
}

/// Example row shipped with the template, one value per template header
pub fn template_row(kind: RecordKind, user: &str, today: NaiveDate) -> Vec<String> {
    let row: Vec<&str> = match kind {
        RecordKind::Leads => vec![
            user, "Global Expansion", "Interested in cloud services", "Acme Global",
            "Jane Smith", "555-0122", "Europe", "Germany", "RFP", "Medium", "Schedule PoC",
            "Online Store", "Qualified", "Converted from Sales", "2023-10-01", "2023-12-31",
            "USD", "50000", "45000",
        ],
        RecordKind::Opportunities => vec![
            "Cloud Migration Ph2", "Acme Global", "Jane Smith", "555-0122", "Europe", "Germany",
            "RFP", "Cold Call", "Proposal Prep", "USD", "125000", "2024-03-31", "Qualification",
            "Imported record", "10", "Pending", "Proceed", "Resources limited", "12500",
            "Summer Campaign", user, "", "", "No", "", "", "",
            "Enterprise scale cloud migration",
        ],
        RecordKind::Sales => {
            let date = today.format(DATE_FORMAT).to_string();
            return [
                user, user, date.as_str(), "Acme Corp", "John Doe", "555-0199", "North America",
                "United States", "High", "Draft Proposal", "Advertisement", "Not Contacted",
                "Initial Outreach",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
        }
        RecordKind::ActionItems => vec![
            "Delivery Managers", "Initialize Kickoff", "2024-04-10", "Opportunity", "OPP-123",
            "Asia Pacific", "High", "Not Started", "Immediate attention needed",
            "Project plan and resource grid",
        ],
    };
    row.into_iter().map(str::to_string).collect()
}

static HEADER_LOOKUP: Lazy<HashMap<RecordKind, HashMap<&'static str, &'static str>>> = Lazy::new(|| {
    RecordKind::all_variants()
        .iter()
        .map(|kind| {
            let lookup = import_mappings(*kind)
                .iter()
                .map(|m| (m.csv_column, m.field))
                .collect();
            (*kind, lookup)
        })
        .collect()
});

/// Resolve a CSV header to a field name
///
/// Returns the field and whether the header was found in the import table.
pub fn resolve_header(kind: RecordKind, header: &str) -> (String, bool) {
    let header = header.trim();
    match HEADER_LOOKUP.get(&kind).and_then(|lookup| lookup.get(header)) {
        Some(field) => (field.to_string(), true),
        None => (header.to_lowercase(), false),
    }
}

/// Problem found while validating the mapping tables
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    DuplicateColumn { kind: RecordKind, column: String },
    DuplicateField { kind: RecordKind, field: String },
    UnknownField { kind: RecordKind, field: String },
    TemplateWidth { kind: RecordKind, headers: usize, values: usize },
}

impl std::fmt::Display for MappingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MappingError::DuplicateColumn { kind, column } => {
                write!(f, "{} mapping lists column '{}' twice", kind, column)
            }
            MappingError::DuplicateField { kind, field } => {
                write!(f, "{} mapping targets field '{}' twice", kind, field)
            }
            MappingError::UnknownField { kind, field } => {
                write!(f, "{} mapping targets unknown field '{}'", kind, field)
            }
            MappingError::TemplateWidth { kind, headers, values } => write!(
                f,
                "{} template has {} headers but {} example values",
                kind, headers, values
            ),
        }
    }
}

impl std::error::Error for MappingError {}

/// Check the tables of one record kind against its field set
pub fn validate_mappings<R: Record>() -> Result<(), MappingError> {
    let kind = R::KIND;
    let transient = transient_fields(kind);

    let mut columns = HashSet::new();
    let mut fields = HashSet::new();
    for mapping in import_mappings(kind) {
        if !columns.insert(mapping.csv_column) {
            return Err(MappingError::DuplicateColumn {
                kind,
                column: mapping.csv_column.to_string(),
            });
        }
        if !fields.insert(mapping.field) {
            return Err(MappingError::DuplicateField {
                kind,
                field: mapping.field.to_string(),
            });
        }
        if !R::is_known_field(mapping.field) && !transient.contains(&mapping.field) {
            return Err(MappingError::UnknownField {
                kind,
                field: mapping.field.to_string(),
            });
        }
    }

    for column in export_columns(kind) {
        if !R::is_known_field(column.field) {
            return Err(MappingError::UnknownField {
                kind,
                field: column.field.to_string(),
            });
        }
    }

    let headers = template_headers(kind).len();
    let values = template_row(kind, "user", NaiveDate::MIN).len();
    if headers != values {
        return Err(MappingError::TemplateWidth { kind, headers, values });
    }

    Ok(())
}

/// Check the tables of every record kind
pub fn validate_all_mappings() -> Result<(), MappingError> {
    validate_mappings::<Lead>()?;
    validate_mappings::<Opportunity>()?;
    validate_mappings::<Sale>()?;
    validate_mappings::<ActionItem>()
}
