use std::collections::BTreeMap;

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::field::{FieldError, format_date, parse_date};
use super::{Record, RecordKind};

/// A follow-up task linked to another pipeline record
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ActionItem {
    pub id: String,
    pub owner: String,
    pub assignee: String,
    pub subject: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub action_type: String,
    pub linked_record_id: String,
    pub region: String,
    pub priority: String,
    pub status: String,
    pub remarks: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub extra: BTreeMap<String, String>,
}

impl Record for ActionItem {
    const KIND: RecordKind = RecordKind::ActionItems;

    const FIELDS: &'static [&'static str] = &[
        "owner",
        "assignee",
        "subject",
        "description",
        "dueDate",
        "actionType",
        "linkedRecordId",
        "region",
        "priority",
        "status",
        "remarks",
    ];

    const REQUIRED: &'static [&'static str] = &["assignee", "subject", "description", "dueDate"];

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
            "subject" => self.subject.clone(),
            "description" => self.description.clone(),
            "dueDate" => format_date(self.due_date),
            "actionType" => self.action_type.clone(),
            "linkedRecordId" => self.linked_record_id.clone(),
            "region" => self.region.clone(),
            "priority" => self.priority.clone(),
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
            "subject" => self.subject = text,
            "description" => self.description = text,
            "dueDate" => self.due_date = parse_date(key, raw)?,
            "actionType" => self.action_type = text,
            "linkedRecordId" => self.linked_record_id = text,
            "region" => self.region = text,
            "priority" => self.priority = text,
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
            status: "Not Started".to_string(),
            priority: "Medium".to_string(),
            region: "North America".to_string(),
            action_type: "Lead".to_string(),
            due_date: Some(now.date_naive()),
            ..Default::default()
        }
    }

    fn apply_import_defaults(&mut self, _row: &BTreeMap<String, String>, user: &str, _now: DateTime<Local>) {
        self.owner = user.to_string();
    }

    fn list_columns() -> &'static [&'static str] {
        &["ID", "Subject", "Assignee", "Due", "Priority", "Status", "Region"]
    }

    fn list_row(&self) -> Vec<String> {
        let assignee = if self.assignee.is_empty() {
            "Unassigned".to_string()
        } else {
            self.assignee.clone()
        };
        vec![
            self.id.clone(),
            self.subject.clone(),
            assignee,
            format_date(self.due_date),
            self.priority.clone(),
            self.status.clone(),
            self.region.clone(),
        ]
    }
}
