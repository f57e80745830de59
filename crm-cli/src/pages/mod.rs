//! Page state for the four record lists
//!
//! A [`Page`] works on a snapshot of one record list handed over by the
//! owner. It never mutates that list: new and edited records go back to the
//! owner through a [`RecordSink`].

pub mod form;
pub mod picker;
pub mod selection;
pub mod visibility;

pub use form::{FormError, FormState};
pub use picker::{assignee_options, filter_options};
pub use selection::Selection;
pub use visibility::visible_records;

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDate};
use rand::Rng;

use crate::models::{Record, RecordKind, UserRole};
use crate::transfer::{
    ImportError, ImportOptions, ImportReport, export_filename, parse_records, render_export,
    render_template,
};

/// Owner of the canonical record lists
pub trait RecordSink<R> {
    /// Replace the record with the same id, or append it
    fn submit(&mut self, record: R);

    /// Append every record
    fn bulk_submit(&mut self, records: Vec<R>);
}

/// A CSV file ready to be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Download {
    pub filename: String,
    pub contents: String,
}

/// List page for one record kind
#[derive(Debug, Clone)]
pub struct Page<R> {
    records: Vec<R>,
    user: String,
    role: UserRole,
    pub selection: Selection,
    pub form: FormState<R>,
}

impl<R: Record> Page<R> {
    pub fn new(records: Vec<R>, user: impl Into<String>, role: UserRole) -> Self {
        Self {
            records,
            user: user.into(),
            role,
            selection: Selection::new(),
            form: FormState::Closed,
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    /// Rows the list shows; action items are filtered by role
    pub fn visible(&self) -> Vec<&R> {
        match R::KIND {
            RecordKind::ActionItems => visible_records(&self.records, &self.role, &self.user),
            _ => self.records.iter().collect(),
        }
    }

    pub fn visible_ids(&self) -> Vec<&str> {
        self.visible().into_iter().map(|r| r.id()).collect()
    }

    pub fn toggle_all(&mut self) {
        let visible: Vec<String> = self.visible_ids().into_iter().map(str::to_string).collect();
        let visible: Vec<&str> = visible.iter().map(String::as_str).collect();
        self.selection.toggle_all(&visible);
    }

    /// Checked records in list order
    pub fn selected(&self) -> Vec<&R> {
        self.selection.pick(&self.records, |r| r.id())
    }

    /// Delivery managers get no "New" button except on the sales page
    pub fn can_create(&self) -> bool {
        R::KIND == RecordKind::Sales || self.role.can_create()
    }

    pub fn open_create(&mut self, now: DateTime<Local>) -> Result<(), FormError> {
        if !self.can_create() {
            return Err(FormError::CreateNotAllowed {
                role: self.role.label().to_string(),
            });
        }
        self.form.open_create(&self.user, now);
        Ok(())
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), FormError> {
        let record = self
            .visible()
            .into_iter()
            .find(|r| r.id() == id)
            .cloned()
            .ok_or_else(|| FormError::UnknownRecord { id: id.to_string() })?;
        self.form.open_edit(&record);
        Ok(())
    }

    /// Submit the open form to the owner, returning the record id
    pub fn submit_form<S: RecordSink<R>>(
        &mut self,
        now: DateTime<Local>,
        sink: &mut S,
    ) -> Result<String, FormError> {
        let record = self.form.submit(&self.user, now)?;
        let id = record.id().to_string();
        sink.submit(record);
        Ok(id)
    }

    /// Import template with this user's example values
    pub fn template(&self, today: NaiveDate) -> Result<Download> {
        Ok(Download {
            filename: R::KIND.template_filename().to_string(),
            contents: render_template(R::KIND, &self.user, today)?,
        })
    }

    /// Export of the checked rows; `None` when nothing is checked
    pub fn export(&self, today: NaiveDate) -> Result<Option<Download>> {
        if !self.selection.can_export() {
            log::info!("Nothing selected, {} export skipped", R::KIND);
            return Ok(None);
        }
        let selected = self.selected();
        if selected.is_empty() {
            return Ok(None);
        }
        Ok(Some(Download {
            filename: export_filename(R::KIND, today),
            contents: render_export(&selected)?,
        }))
    }

    /// Parse CSV text and hand every imported record to the owner in one batch
    pub fn import<S: RecordSink<R>, G: Rng + ?Sized>(
        &self,
        text: &str,
        strict: bool,
        now: DateTime<Local>,
        rng: &mut G,
        sink: &mut S,
    ) -> Result<ImportReport<R>, ImportError> {
        let options = ImportOptions {
            user: self.user.clone(),
            now,
            strict,
        };
        let report = parse_records::<R, G>(text, &options, rng)?;
        if !report.records.is_empty() {
            sink.bulk_submit(report.records.clone());
        }
        Ok(report)
    }
}
