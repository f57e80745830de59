use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::field::{FieldError, format_date, parse_date};
use super::{Record, RecordKind};

/// An early sales contact, tracked before it becomes a lead
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Sale {
    pub id: String,
    pub owner: String,
    pub assignee: String,
    pub date: Option<NaiveDate>,
    pub client_name: String,
    pub contact_name: String,
    pub contact_number: String,
    pub region: String,
    pub country: String,
    pub priority: String,
    pub next_step: String,
    pub source: String,
    pub status: String,
    pub remarks: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Record for Sale {
    const KIND: RecordKind = RecordKind::Sales;

    const FIELDS: &'static [&'static str] = &[
        "owner",
        "assignee",
        "date",
        "clientName",
        "contactName",
        "contactNumber",
        "region",
        "country",
        "priority",
        "nextStep",
        "source",
        "status",
        "remarks",
    ];

    const REQUIRED: &'static [&'static str] =
        &["assignee", "date", "clientName", "contactName", "contactNumber"];

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
            "date" => format_date(self.date),
            "clientName" => self.client_name.clone(),
            "contactName" => self.contact_name.clone(),
            "contactNumber" => self.contact_number.clone(),
            "region" => self.region.clone(),
            "country" => self.country.clone(),
            "priority" => self.priority.clone(),
            "nextStep" => self.next_step.clone(),
            "source" => self.source.clone(),
            "status" => self.status.clone(),
            "remarks" => self.remarks.clone(),
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
            "date" => self.date = parse_date(key, raw)?,
            "clientName" => self.client_name = text,
            "contactName" => self.contact_name = text,
            "contactNumber" => self.contact_number = text,
            "region" => self.region = text,
            "country" => self.country = text,
            "priority" => self.priority = text,
            "nextStep" => self.next_step = text,
            "source" => self.source = text,
            "status" => self.status = text,
            "remarks" => self.remarks = text,
            other => {
                self.extra.insert(other.to_string(), text);
            }
        }
        Ok(())
    }

    fn create_defaults(user: &str, now: DateTime<Local>) -> Self {
        Self {
            owner: user.to_string(),
            date: Some(now.date_naive()),
            priority: "Medium".to_string(),
            status: "Not Contacted".to_string(),
            source: "Advertisement".to_string(),
            region: "North America".to_string(),
            ..Default::default()
        }
    }

    // Owner comes from the `Sale Owner` column; only the id is attached.
    fn apply_import_defaults(&mut self, _row: &BTreeMap<String, String>, _user: &str, _now: DateTime<Local>) {}

    fn list_columns() -> &'static [&'static str] {
        &["Sale ID", "Client", "Contact", "Region", "Status", "Next Step"]
    }

    fn list_row(&self) -> Vec<String> {
        let contact = if self.contact_number.is_empty() {
            self.contact_name.clone()
        } else {
            format!("{} ({})", self.contact_name, self.contact_number)
        };
        vec![
            self.id.clone(),
            self.client_name.clone(),
            contact,
            self.region.clone(),
            self.status.clone(),
            self.next_step.clone(),
        ]
    }
}
