use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Local};
use ::csv::{ReaderBuilder, Trim};
use rand::Rng;

use crate::models::options::{is_known, options_for};
use crate::models::{FieldError, Record, import_id};
use crate::transfer::mapping::{resolve_header, transient_fields};

/// Context an import runs under
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Becomes the owner of every imported record
    pub user: String,
    pub now: DateTime<Local>,
    /// Reject rows with problems instead of importing them with defaults
    pub strict: bool,
}

/// Whole-file import failure
#[derive(Debug)]
pub enum ImportError {
    /// Selected file does not end in `.csv`
    NotCsv { path: String },
    /// No header row
    Empty,
    Csv(::csv::Error),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::NotCsv { path } => write!(f, "'{}' is not a .csv file", path),
            ImportError::Empty => write!(f, "CSV file has no header row"),
            ImportError::Csv(e) => write!(f, "Malformed CSV: {}", e),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Csv(e) => Some(e),
            _ => None,
        }
    }
}

impl From<::csv::Error> for ImportError {
    fn from(e: ::csv::Error) -> Self {
        ImportError::Csv(e)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImportIssueKind {
    /// Row width differs from the header row
    ColumnCount { expected: usize, found: usize },
    Field(FieldError),
    /// Picklist field holds a value the picker does not offer; kept as is
    UnknownOption { field: String, value: String },
}

impl ImportIssueKind {
    /// Whether strict mode rejects the row
    pub fn is_error(&self) -> bool {
        !matches!(self, ImportIssueKind::UnknownOption { .. })
    }
}

/// Problem found in a single data row
#[derive(Debug, Clone, PartialEq)]
pub struct ImportIssue {
    /// 1-based line number in the file
    pub line: u64,
    pub kind: ImportIssueKind,
}

impl std::fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ImportIssueKind::ColumnCount { expected, found } => write!(
                f,
                "line {}: expected {} columns, found {}",
                self.line, expected, found
            ),
            ImportIssueKind::Field(e) => write!(f, "line {}: {}", self.line, e),
            ImportIssueKind::UnknownOption { field, value } => write!(
                f,
                "line {}: '{}' is not a listed option for '{}'",
                self.line, value, field
            ),
        }
    }
}

/// Outcome of parsing one CSV file
#[derive(Debug, Clone)]
pub struct ImportReport<R> {
    /// Records in file order, ready for a bulk submit
    pub records: Vec<R>,
    pub issues: Vec<ImportIssue>,
    /// Rows dropped because strict mode was on
    pub rejected_rows: usize,
    /// Headers that had no mapping and were kept as extra fields
    pub unmapped_columns: Vec<String>,
}

impl<R> ImportReport<R> {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Imports only accept files with a `.csv` extension
pub fn check_csv_path(path: &Path) -> Result<(), ImportError> {
    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        Ok(())
    } else {
        Err(ImportError::NotCsv {
            path: path.display().to_string(),
        })
    }
}

/// Turn CSV text into records of kind `R`
///
/// The first non-blank row is the header row. Each header is resolved
/// through the kind's import table, falling back to its lower-cased text.
/// Blank rows are skipped. Every record gets a fresh import id and the
/// importing user as owner.
pub fn parse_records<R: Record, G: Rng + ?Sized>(
    text: &str,
    options: &ImportOptions,
    rng: &mut G,
) -> Result<ImportReport<R>, ImportError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = reader
        .records()
        .filter(|row| row.as_ref().map_or(true, |r| r.iter().any(|v| !v.is_empty())));

    let header_row = match rows.next() {
        Some(row) => row?,
        None => return Err(ImportError::Empty),
    };

    let mut columns = Vec::with_capacity(header_row.len());
    let mut unmapped_columns = Vec::new();
    for header in header_row.iter() {
        let (field, mapped) = resolve_header(R::KIND, header);
        if !mapped && !header.is_empty() {
            unmapped_columns.push(header.to_string());
        }
        columns.push(field);
    }
    if !unmapped_columns.is_empty() {
        log::debug!(
            "{} import keeps unmapped columns as extra fields: {:?}",
            R::KIND,
            unmapped_columns
        );
    }

    let transient = transient_fields(R::KIND);
    let mut records = Vec::new();
    let mut issues = Vec::new();
    let mut rejected_rows = 0;

    for row in rows {
        let row = row?;
        let line = row.position().map_or(0, |p| p.line());
        let mut row_issues = Vec::new();

        if row.len() != columns.len() {
            row_issues.push(ImportIssue {
                line,
                kind: ImportIssueKind::ColumnCount {
                    expected: columns.len(),
                    found: row.len(),
                },
            });
        }

        // Later duplicate headers win
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        for (idx, field) in columns.iter().enumerate() {
            if field.is_empty() {
                continue;
            }
            values.insert(field.clone(), row.get(idx).unwrap_or("").to_string());
        }

        let mut record = R::default();
        for (field, value) in &values {
            if field == "id" || transient.contains(&field.as_str()) {
                continue;
            }
            if let Err(e) = record.set_field(field, value) {
                row_issues.push(ImportIssue {
                    line,
                    kind: ImportIssueKind::Field(e),
                });
                continue;
            }
            let listed = options_for(R::KIND, field);
            if !value.is_empty() && listed.is_some_and(|options| !is_known(options, value)) {
                row_issues.push(ImportIssue {
                    line,
                    kind: ImportIssueKind::UnknownOption {
                        field: field.clone(),
                        value: value.clone(),
                    },
                });
            }
        }

        for issue in &row_issues {
            log::warn!("{} import: {}", R::KIND, issue);
        }
        if options.strict && row_issues.iter().any(|i| i.kind.is_error()) {
            rejected_rows += 1;
            issues.extend(row_issues);
            continue;
        }
        issues.extend(row_issues);

        record.apply_import_defaults(&values, &options.user, options.now);
        record.set_id(import_id(R::KIND.id_prefix(), &options.now, rng));
        records.push(record);
    }

    log::info!(
        "Parsed {} {} records ({} issues, {} rejected)",
        records.len(),
        R::KIND,
        issues.len(),
        rejected_rows
    );

    Ok(ImportReport {
        records,
        issues,
        rejected_rows,
        unmapped_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionItem, Lead, OppStage, Opportunity, RecordKind, Sale};
    use crate::transfer::csv::{render_export, render_template};
    use chrono::{NaiveDate, TimeZone};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn options(strict: bool) -> ImportOptions {
        ImportOptions {
            user: "alice".to_string(),
            now: Local.with_ymd_and_hms(2024, 5, 20, 9, 30, 0).unwrap(),
            strict,
        }
    }

    fn parse<R: Record>(text: &str) -> ImportReport<R> {
        let mut rng = StdRng::seed_from_u64(7);
        parse_records(text, &options(false), &mut rng).unwrap()
    }

    #[test]
    fn test_lead_template_imports() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let text = render_template(RecordKind::Leads, "bob", today).unwrap();
        let report = parse::<Lead>(&text);

        assert!(report.is_clean());
        assert_eq!(report.records.len(), 1);
        let lead = &report.records[0];
        assert!(lead.id.starts_with("LD-IMP-"));
        assert_eq!(lead.owner, "alice");
        assert_eq!(lead.assignee, "bob");
        assert_eq!(lead.company_name, "Acme Global");
        assert_eq!(lead.source, "Online Store");
        assert_eq!(lead.value, 50000.0);
        assert_eq!(lead.start_date, NaiveDate::from_ymd_opt(2023, 10, 1));
        assert_eq!(lead.tech_feasibility, "Pending");
        assert_eq!(lead.remarks_history.len(), 1);
        assert_eq!(lead.remarks_history[0].text, "Converted from Sales");
        assert_eq!(lead.remarks_history[0].author, "alice");
        assert!(lead.extra.is_empty());
    }

    #[test]
    fn test_opportunity_template_imports() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();
        let text = render_template(RecordKind::Opportunities, "bob", today).unwrap();
        let report = parse::<Opportunity>(&text);

        let opp = &report.records[0];
        assert!(opp.id.starts_with("OPP-IMP-"));
        assert_eq!(opp.owner, "alice");
        assert_eq!(opp.sales_owner, "bob");
        assert_eq!(opp.stage, OppStage::Qualification);
        assert_eq!(opp.probability, 10.0);
        assert_eq!(opp.expected_revenue, 12500.0);
        assert!(!opp.partner_org);
        assert_eq!(opp.remarks_history[0].text, "Imported record");
    }

    #[test]
    fn test_opportunity_defaults_when_columns_blank() {
        let text = "Ops Name,Partner Org,Probability,Value\nDeal,Yes,,";
        let report = parse::<Opportunity>(text);
        let opp = &report.records[0];
        assert!(opp.partner_org);
        assert_eq!(opp.probability, 10.0);
        assert_eq!(opp.value, 0.0);
        assert_eq!(opp.expected_revenue, 0.0);
        assert!(opp.remarks_history.is_empty());
    }

    #[test]
    fn test_sale_owner_comes_from_column() {
        let text = "Sale Owner,Client Name,Remarks\nzoe,Acme,call soon";
        let report = parse::<Sale>(text);
        let sale = &report.records[0];
        assert!(sale.id.starts_with("SALE-IMP-"));
        assert_eq!(sale.owner, "zoe");
        assert_eq!(sale.remarks, "call soon");
    }

    #[test]
    fn test_action_item_owner_is_importer() {
        let text = "Action Item Assignee,Subject,Action Type\nDelivery Managers,Kickoff,Opportunity";
        let report = parse::<ActionItem>(text);
        let item = &report.records[0];
        assert_eq!(item.owner, "alice");
        assert_eq!(item.assignee, "Delivery Managers");
        assert_eq!(item.action_type, "Opportunity");
    }

    #[test]
    fn test_quoted_comma_stays_in_field() {
        let text = "\"Client Name\",\"Remarks\"\n\"Acme, Inc.\",\"said \"\"hi\"\"\"";
        let report = parse::<Sale>(text);
        assert_eq!(report.records[0].client_name, "Acme, Inc.");
        assert_eq!(report.records[0].remarks, "said \"hi\"");
    }

    #[test]
    fn test_quoted_newline_stays_in_field() {
        let text = "Subject,Description\n\"Kickoff\",\"line one\nline two\"\nReview,short";
        let report = parse::<ActionItem>(text);
        assert_eq!(report.records.len(), 2);
        assert_eq!(report.records[0].description, "line one\nline two");
        assert_eq!(report.records[1].subject, "Review");
    }

    #[test]
    fn test_blank_lines_skipped() {
        let text = "\n\nClient Name\n\nAcme\n   \nGlobex\n";
        let report = parse::<Sale>(text);
        let names: Vec<_> = report.records.iter().map(|s| s.client_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
    }

    #[test]
    fn test_rows_of_empty_fields_skipped() {
        let text = "Client Name,Contact Name\nAcme,Jane\n,\n\" \",\nGlobex,Bob\n,,\n";
        let report = parse::<Sale>(text);
        let names: Vec<_> = report.records.iter().map(|s| s.client_name.as_str()).collect();
        assert_eq!(names, vec!["Acme", "Globex"]);
        assert!(report.issues.is_empty());
    }

    #[test]
    fn test_unknown_header_kept_as_extra() {
        let text = "Lead Name,Industry\nExpansion,Retail";
        let report = parse::<Lead>(text);
        assert_eq!(report.unmapped_columns, vec!["Industry".to_string()]);
        assert_eq!(
            report.records[0].extra.get("industry").map(String::as_str),
            Some("Retail")
        );
    }

    #[test]
    fn test_short_row_is_reported_and_kept() {
        let text = "Client Name,Contact Name,Region\nAcme";
        let report = parse::<Sale>(text);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].contact_name, "");
        assert_eq!(
            report.issues[0].kind,
            ImportIssueKind::ColumnCount { expected: 3, found: 1 }
        );
        assert_eq!(report.issues[0].line, 2);
    }

    #[test]
    fn test_bad_number_lenient_vs_strict() {
        let text = "Lead Name,Value\nGood,100\nBad,lots";

        let lenient = parse::<Lead>(text);
        assert_eq!(lenient.records.len(), 2);
        assert_eq!(lenient.records[1].value, 0.0);
        assert_eq!(lenient.issues.len(), 1);

        let mut rng = StdRng::seed_from_u64(7);
        let strict: ImportReport<Lead> = parse_records(text, &options(true), &mut rng).unwrap();
        assert_eq!(strict.records.len(), 1);
        assert_eq!(strict.records[0].name, "Good");
        assert_eq!(strict.rejected_rows, 1);
    }

    #[test]
    fn test_unknown_option_kept_even_when_strict() {
        let text = "Subject,Priority\nKickoff,Urgent";
        let mut rng = StdRng::seed_from_u64(5);
        let report: ImportReport<ActionItem> =
            parse_records(text, &options(true), &mut rng).unwrap();
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].priority, "Urgent");
        assert_eq!(report.rejected_rows, 0);
        assert!(matches!(
            report.issues[0].kind,
            ImportIssueKind::UnknownOption { .. }
        ));
    }

    #[test]
    fn test_id_column_is_replaced() {
        let text = "Lead ID,Lead Name\nLD-1,Expansion";
        let report = parse::<Lead>(text);
        assert!(report.records[0].id.starts_with("LD-IMP-"));
        // unmapped "Lead ID" resolves to "lead id", not "id"
        assert_eq!(report.records[0].extra.get("lead id").map(String::as_str), Some("LD-1"));
    }

    #[test]
    fn test_imported_ids_unique() {
        let text = "Subject\na\nb\nc\nd";
        let report = parse::<ActionItem>(text);
        let mut ids: Vec<_> = report.records.iter().map(|r| r.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn test_empty_file_rejected() {
        let mut rng = StdRng::seed_from_u64(1);
        let result: Result<ImportReport<Lead>, _> = parse_records("\n  \n", &options(false), &mut rng);
        assert!(matches!(result, Err(ImportError::Empty)));
    }

    #[test]
    fn test_header_only_yields_no_records() {
        let report = parse::<Lead>("Lead Name,Value");
        assert!(report.records.is_empty());
    }

    #[test]
    fn test_check_csv_path() {
        assert!(check_csv_path(Path::new("leads.csv")).is_ok());
        assert!(check_csv_path(Path::new("LEADS.CSV")).is_ok());
        assert!(matches!(
            check_csv_path(Path::new("leads.xlsx")),
            Err(ImportError::NotCsv { .. })
        ));
        assert!(check_csv_path(Path::new("leads")).is_err());
    }

    #[test]
    fn test_template_export_round_trip() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 20).unwrap();

        fn shared_columns_match<R: Record>(template: &str) {
            let mut rng = StdRng::seed_from_u64(3);
            let report: ImportReport<R> = parse_records(template, &options(false), &mut rng).unwrap();
            let exported = render_export(&report.records.iter().collect::<Vec<_>>()).unwrap();

            let mut template_reader = ::csv::Reader::from_reader(template.as_bytes());
            let template_headers: Vec<String> =
                template_reader.headers().unwrap().iter().map(str::to_string).collect();
            let template_row = template_reader.records().next().unwrap().unwrap();

            let mut export_reader = ::csv::Reader::from_reader(exported.as_bytes());
            let export_headers: Vec<String> =
                export_reader.headers().unwrap().iter().map(str::to_string).collect();
            let export_row = export_reader.records().next().unwrap().unwrap();

            for (ei, header) in export_headers.iter().enumerate() {
                if let Some(ti) = template_headers.iter().position(|h| h == header) {
                    assert_eq!(
                        &export_row[ei], &template_row[ti],
                        "{} column '{}' changed through import/export",
                        R::KIND,
                        header
                    );
                }
            }
        }

        shared_columns_match::<Lead>(&render_template(RecordKind::Leads, "bob", today).unwrap());
        shared_columns_match::<Sale>(&render_template(RecordKind::Sales, "bob", today).unwrap());
        shared_columns_match::<Opportunity>(
            &render_template(RecordKind::Opportunities, "bob", today).unwrap(),
        );
        shared_columns_match::<ActionItem>(
            &render_template(RecordKind::ActionItems, "bob", today).unwrap(),
        );
    }
}
