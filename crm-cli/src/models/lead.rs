use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::field::{FieldError, format_date, format_number, parse_date, parse_number};
use super::remark::RemarkEntry;
use super::{Record, RecordKind};

/// A prospective deal that has not been qualified into an opportunity yet
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Lead {
    pub id: String,
    pub owner: String,
    pub assignee: String,
    pub name: String,
    pub notes: String,
    pub company_name: String,
    pub contact_name: String,
    pub contact_number: String,
    pub region: String,
    pub country: String,
    #[serde(rename = "type")]
    pub lead_type: String,
    pub priority: String,
    pub next_step: String,
    pub source: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub closing_date: Option<NaiveDate>,
    pub currency: String,
    pub value: f64,
    pub expected_revenue: f64,
    pub tech_feasibility: String,
    pub implementation_feasibility: String,
    pub sales_feasibility: String,
    pub remarks_history: Vec<RemarkEntry>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

const PENDING: &str = "Pending";

impl Record for Lead {
    const KIND: RecordKind = RecordKind::Leads;

    const FIELDS: &'static [&'static str] = &[
        "owner",
        "assignee",
        "name",
        "notes",
        "companyName",
        "contactName",
        "contactNumber",
        "region",
        "country",
        "type",
        "priority",
        "nextStep",
        "source",
        "status",
        "startDate",
        "closingDate",
        "currency",
        "value",
        "expectedRevenue",
        "techFeasibility",
        "implementationFeasibility",
        "salesFeasibility",
    ];

    const REQUIRED: &'static [&'static str] = &[
        "assignee",
        "name",
        "companyName",
        "contactName",
        "contactNumber",
        "startDate",
        "closingDate",
    ];

    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: String) {
        self.id = id;
    }

    fn owner(&self) -> &str {
        &self.owner
    }

    fn assignee(&self) -> &str {
        &self.assignee
    }

    fn field(&self, key: &str) -> Option<String> {
        let value = match key {
            "id" => self.id.clone(),
            "owner" => self.owner.clone(),
            "assignee" => self.assignee.clone(),
            "name" => self.name.clone(),
            "notes" => self.notes.clone(),
            "companyName" => self.company_name.clone(),
            "contactName" => self.contact_name.clone(),
            "contactNumber" => self.contact_number.clone(),
            "region" => self.region.clone(),
            "country" => self.country.clone(),
            "type" => self.lead_type.clone(),
            "priority" => self.priority.clone(),
            "nextStep" => self.next_step.clone(),
            "source" => self.source.clone(),
            "status" => self.status.clone(),
            "startDate" => format_date(self.start_date),
            "closingDate" => format_date(self.closing_date),
            "currency" => self.currency.clone(),
            "value" => format_number(self.value),
            "expectedRevenue" => format_number(self.expected_revenue),
            "techFeasibility" => self.tech_feasibility.clone(),
            "implementationFeasibility" => self.implementation_feasibility.clone(),
            "salesFeasibility" => self.sales_feasibility.clone(),
            other => return self.extra.get(other).cloned(),
        };
        Some(value)
    }

    fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FieldError> {
        let text = raw.to_string();
        match key {
            "id" => return Err(FieldError::ReadOnly { field: key.to_string() }),
            "owner" => self.owner = text,
            "assignee" => self.assignee = text,
            "name" => self.name = text,
            "notes" => self.notes = text,
            "companyName" => self.company_name = text,
            "contactName" => self.contact_name = text,
            "contactNumber" => self.contact_number = text,
            "region" => self.region = text,
            "country" => self.country = text,
            "type" => self.lead_type = text,
            "priority" => self.priority = text,
            "nextStep" => self.next_step = text,
            "source" => self.source = text,
            "status" => self.status = text,
            "startDate" => self.start_date = parse_date(key, raw)?,
            "closingDate" => self.closing_date = parse_date(key, raw)?,
            "currency" => self.currency = text,
            "value" => self.value = parse_number(key, raw)?,
            "expectedRevenue" => self.expected_revenue = parse_number(key, raw)?,
            "techFeasibility" => self.tech_feasibility = text,
            "implementationFeasibility" => self.implementation_feasibility = text,
            "salesFeasibility" => self.sales_feasibility = text,
            other => {
                self.extra.insert(other.to_string(), text);
            }
        }
        Ok(())
    }

    fn remarks_history_mut(&mut self) -> Option<&mut Vec<RemarkEntry>> {
        Some(&mut self.remarks_history)
    }

    fn create_defaults(user: &str, now: DateTime<Local>) -> Self {
        Self {
            owner: user.to_string(),
            assignee: "Unassigned".to_string(),
            region: "North America".to_string(),
            status: "Not Contacted".to_string(),
            lead_type: "RFP".to_string(),
            source: "Advertisement".to_string(),
            currency: "USD".to_string(),
            start_date: Some(now.date_naive()),
            value: 0.0,
            expected_revenue: 0.0,
            tech_feasibility: PENDING.to_string(),
            implementation_feasibility: PENDING.to_string(),
            sales_feasibility: PENDING.to_string(),
            ..Default::default()
        }
    }

    fn apply_import_defaults(&mut self, row: &BTreeMap<String, String>, user: &str, now: DateTime<Local>) {
        self.owner = user.to_string();
        self.remarks_history = match row.get("remarks").filter(|r| !r.is_empty()) {
            Some(text) => vec![RemarkEntry::new(text.clone(), user, now)],
            None => Vec::new(),
        };
        self.tech_feasibility = PENDING.to_string();
        self.implementation_feasibility = PENDING.to_string();
        self.sales_feasibility = PENDING.to_string();
    }

    fn list_columns() -> &'static [&'static str] {
        &["Lead ID", "Lead Name", "Lead Owner", "Region", "Lead Type", "Status"]
    }

    fn list_row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.owner.clone(),
            self.region.clone(),
            self.lead_type.clone(),
            self.status.clone(),
        ]
    }
}
