//! Create/edit form for a single record

use chrono::{DateTime, Local};

use crate::models::{FieldError, Record, append_remark, record_id};

/// Error raised by form transitions
#[derive(Debug, Clone, PartialEq)]
pub enum FormError {
    /// Operation needs an open form
    NotOpen,
    /// Edit requested for an id that is not in the list
    UnknownRecord { id: String },
    /// Role is not allowed to create records of this kind
    CreateNotAllowed { role: String },
    /// Submit attempted with blank required fields
    MissingRequired(Vec<String>),
    Field(FieldError),
}

impl std::fmt::Display for FormError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormError::NotOpen => write!(f, "no form is open"),
            FormError::UnknownRecord { id } => write!(f, "no record with id '{}'", id),
            FormError::CreateNotAllowed { role } => {
                write!(f, "role '{}' cannot create new records here", role)
            }
            FormError::MissingRequired(fields) => {
                write!(f, "required fields are blank: {}", fields.join(", "))
            }
            FormError::Field(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for FormError {}

impl From<FieldError> for FormError {
    fn from(e: FieldError) -> Self {
        FormError::Field(e)
    }
}

/// Form lifecycle: closed, open on a fresh draft, or open on a copy of an existing record
#[derive(Debug, Clone, Default)]
pub enum FormState<R> {
    #[default]
    Closed,
    Creating { draft: R, remark: String },
    Editing { draft: R, remark: String },
}

impl<R: Record> FormState<R> {
    pub fn open_create(&mut self, user: &str, now: DateTime<Local>) {
        let mut draft = R::create_defaults(user, now);
        draft.on_form_open();
        *self = FormState::Creating {
            draft,
            remark: String::new(),
        };
    }

    pub fn open_edit(&mut self, record: &R) {
        let mut draft = record.clone();
        draft.on_form_open();
        *self = FormState::Editing {
            draft,
            remark: String::new(),
        };
    }

    pub fn cancel(&mut self) {
        *self = FormState::Closed;
    }

    pub fn is_open(&self) -> bool {
        !matches!(self, FormState::Closed)
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, FormState::Editing { .. })
    }

    pub fn draft(&self) -> Option<&R> {
        match self {
            FormState::Closed => None,
            FormState::Creating { draft, .. } | FormState::Editing { draft, .. } => Some(draft),
        }
    }

    fn parts_mut(&mut self) -> Result<(&mut R, &mut String), FormError> {
        match self {
            FormState::Closed => Err(FormError::NotOpen),
            FormState::Creating { draft, remark } | FormState::Editing { draft, remark } => {
                Ok((draft, remark))
            }
        }
    }

    /// Edit one field of the draft
    ///
    /// Only typed fields are editable; `id` is assigned by the form itself
    /// and derived fields follow the fields they are computed from.
    pub fn set_field(&mut self, key: &str, raw: &str) -> Result<(), FormError> {
        let (draft, _) = self.parts_mut()?;
        if !R::is_known_field(key) {
            return Err(FieldError::UnknownField { field: key.to_string() }.into());
        }
        if R::DERIVED.contains(&key) {
            return Err(FieldError::ReadOnly { field: key.to_string() }.into());
        }
        draft.set_field(key, raw)?;
        draft.on_field_changed(key);
        Ok(())
    }

    /// Text of the remark appended on submit
    pub fn set_remark(&mut self, text: &str) -> Result<(), FormError> {
        let (_, remark) = self.parts_mut()?;
        *remark = text.to_string();
        Ok(())
    }

    /// Required fields of the draft that are still blank
    pub fn missing_required(&self) -> Vec<String> {
        let Some(draft) = self.draft() else {
            return Vec::new();
        };
        R::REQUIRED
            .iter()
            .filter(|key| draft.field(key).is_none_or(|v| v.trim().is_empty()))
            .map(|key| key.to_string())
            .collect()
    }

    /// Finish the form and return the record to hand to the owner
    ///
    /// Keeps a non-empty draft id, otherwise generates one. Appends the pending
    /// remark to kinds that keep a history. The form closes only on success.
    pub fn submit(&mut self, user: &str, now: DateTime<Local>) -> Result<R, FormError> {
        if !self.is_open() {
            return Err(FormError::NotOpen);
        }
        let missing = self.missing_required();
        if !missing.is_empty() {
            return Err(FormError::MissingRequired(missing));
        }

        let (mut draft, remark) = match std::mem::take(self) {
            FormState::Closed => return Err(FormError::NotOpen),
            FormState::Creating { draft, remark } | FormState::Editing { draft, remark } => {
                (draft, remark)
            }
        };

        if draft.id().is_empty() {
            draft.set_id(record_id(R::KIND.id_prefix(), &now));
        }
        if let Some(history) = draft.remarks_history_mut() {
            append_remark(history, &remark, user, now);
        }

        log::debug!("Submitted {} form for {}", R::KIND, draft.id());
        Ok(draft)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ActionItem, Lead, OppStage, Opportunity, Sale};
    use chrono::TimeZone;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 6, 1, 14, 5, 9).unwrap()
    }

    fn filled_lead_form() -> FormState<Lead> {
        let mut form = FormState::default();
        form.open_create("alice", now());
        for (key, value) in [
            ("assignee", "bob"),
            ("name", "Expansion"),
            ("companyName", "Acme"),
            ("contactName", "Jane"),
            ("contactNumber", "555-0100"),
            ("closingDate", "2024-12-31"),
        ] {
            form.set_field(key, value).unwrap();
        }
        form
    }

    #[test]
    fn test_create_lead_with_remark() {
        let mut form = filled_lead_form();
        form.set_remark("  first call went well ").unwrap();
        let lead = form.submit("alice", now()).unwrap();

        assert!(!form.is_open());
        assert_eq!(lead.id, format!("LD-{}", now().timestamp_millis()));
        assert_eq!(lead.owner, "alice");
        assert_eq!(lead.remarks_history.len(), 1);
        assert_eq!(lead.remarks_history[0].text, "first call went well");
        assert_eq!(lead.remarks_history[0].author, "alice");
    }

    #[test]
    fn test_blank_remark_not_appended() {
        let mut form = filled_lead_form();
        form.set_remark("   ").unwrap();
        let lead = form.submit("alice", now()).unwrap();
        assert!(lead.remarks_history.is_empty());
    }

    #[test]
    fn test_missing_required_keeps_form_open() {
        let mut form: FormState<Lead> = FormState::default();
        form.open_create("alice", now());
        form.set_field("name", "Expansion").unwrap();

        let err = form.submit("alice", now()).unwrap_err();
        match err {
            FormError::MissingRequired(fields) => {
                assert!(fields.contains(&"companyName".to_string()));
                assert!(!fields.contains(&"assignee".to_string()));
                assert!(!fields.contains(&"startDate".to_string()));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(form.is_open());
        assert_eq!(form.draft().unwrap().name, "Expansion");
    }

    #[test]
    fn test_edit_preserves_id_and_appends_to_history() {
        let mut existing = filled_lead_form().submit("alice", now()).unwrap();
        existing.id = "LD-1".to_string();

        let mut form = FormState::default();
        form.open_edit(&existing);
        assert!(form.is_editing());
        form.set_field("status", "Qualified").unwrap();
        form.set_remark("moved forward").unwrap();
        let updated = form.submit("bob", now()).unwrap();

        assert_eq!(updated.id, "LD-1");
        assert_eq!(updated.status, "Qualified");
        assert_eq!(updated.remarks_history.len(), 1);
        assert_eq!(updated.remarks_history[0].author, "bob");
        // existing record untouched until the owner replaces it
        assert_eq!(existing.status, "Not Contacted");
    }

    #[test]
    fn test_opportunity_id_assigned_on_open() {
        let mut form: FormState<Opportunity> = FormState::default();
        form.open_create("alice", now());
        let opened_id = form.draft().unwrap().id.clone();
        assert!(opened_id.starts_with("OPP-"));

        form.set_field("name", "Cloud").unwrap();
        form.set_field("accountName", "Acme").unwrap();
        let later = Local.with_ymd_and_hms(2024, 6, 2, 9, 0, 0).unwrap();
        let opp = form.submit("alice", later).unwrap();
        assert_eq!(opp.id, opened_id);
    }

    #[test]
    fn test_opportunity_stage_recomputes() {
        let mut form: FormState<Opportunity> = FormState::default();
        form.open_create("alice", now());
        form.set_field("value", "100000").unwrap();
        form.set_field("stage", "Qualification").unwrap();
        let draft = form.draft().unwrap();
        assert_eq!(draft.probability, 10.0);
        assert_eq!(draft.expected_revenue, 10000.0);

        form.set_field("stage", "Negotiation/Review").unwrap();
        let draft = form.draft().unwrap();
        assert_eq!(draft.stage, OppStage::NegotiationReview);
        assert_eq!(draft.probability, 90.0);
        assert_eq!(draft.expected_revenue, 90000.0);
    }

    #[test]
    fn test_stale_opportunity_recomputed_on_edit() {
        let stored = Opportunity {
            id: "OPP-1".to_string(),
            name: "Cloud".to_string(),
            account_name: "Acme".to_string(),
            stage: OppStage::Qualification,
            value: 100000.0,
            probability: 40.0,
            expected_revenue: 0.0,
            ..Default::default()
        };
        let mut form = FormState::default();
        form.open_edit(&stored);
        let opp = form.submit("alice", now()).unwrap();

        assert_eq!(opp.id, "OPP-1");
        assert_eq!(opp.probability, 10.0);
        assert_eq!(opp.expected_revenue, 10000.0);
    }

    #[test]
    fn test_derived_opportunity_fields_read_only() {
        let mut form: FormState<Opportunity> = FormState::default();
        form.open_create("alice", now());
        form.set_field("value", "50000").unwrap();

        for key in ["probability", "expectedRevenue"] {
            assert_eq!(
                form.set_field(key, "77"),
                Err(FormError::Field(FieldError::ReadOnly { field: key.to_string() }))
            );
        }
        let draft = form.draft().unwrap();
        assert_eq!(draft.probability, 10.0);
        assert_eq!(draft.expected_revenue, 5000.0);
    }

    #[test]
    fn test_sale_ignores_pending_remark() {
        let mut form: FormState<Sale> = FormState::default();
        form.open_create("alice", now());
        for (key, value) in [
            ("assignee", "bob"),
            ("clientName", "Acme"),
            ("contactName", "Jane"),
            ("contactNumber", "555"),
        ] {
            form.set_field(key, value).unwrap();
        }
        form.set_remark("not kept").unwrap();
        let sale = form.submit("alice", now()).unwrap();
        assert!(sale.id.starts_with("SALE-"));
        assert_eq!(sale.remarks, "");
    }

    #[test]
    fn test_unknown_and_readonly_fields_rejected() {
        let mut form: FormState<ActionItem> = FormState::default();
        form.open_create("alice", now());
        assert!(matches!(
            form.set_field("colour", "red"),
            Err(FormError::Field(FieldError::UnknownField { .. }))
        ));
        assert!(matches!(
            form.set_field("id", "ACT-9"),
            Err(FormError::Field(FieldError::ReadOnly { .. }))
        ));
    }

    #[test]
    fn test_closed_form_rejects_edits() {
        let mut form: FormState<Lead> = FormState::default();
        assert_eq!(form.set_field("name", "x"), Err(FormError::NotOpen));
        assert_eq!(form.submit("alice", now()).unwrap_err(), FormError::NotOpen);

        form.open_create("alice", now());
        form.cancel();
        assert!(!form.is_open());
    }
}
