//! JSON-file record store
//!
//! Holds the canonical record lists and the employee roster. Commands load
//! the store, hand it to a page as its [`RecordSink`], then save it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::{ActionItem, Employee, Lead, Opportunity, Record, Sale};
use crate::pages::RecordSink;

/// Everything persisted in the data file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreData {
    pub leads: Vec<Lead>,
    pub opportunities: Vec<Opportunity>,
    pub sales: Vec<Sale>,
    pub action_items: Vec<ActionItem>,
    pub employees: Vec<Employee>,
}

/// Typed access to the list holding records of kind `R`
pub trait Collection<R> {
    fn list(&self) -> &Vec<R>;
    fn list_mut(&mut self) -> &mut Vec<R>;
}

macro_rules! collection {
    ($record:ty, $field:ident) => {
        impl Collection<$record> for StoreData {
            fn list(&self) -> &Vec<$record> {
                &self.$field
            }

            fn list_mut(&mut self) -> &mut Vec<$record> {
                &mut self.$field
            }
        }
    };
}

collection!(Lead, leads);
collection!(Opportunity, opportunities);
collection!(Sale, sales);
collection!(ActionItem, action_items);

/// Record lists backed by a JSON file
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    data: StoreData,
}

impl RecordStore {
    /// Load the store; a missing file is an empty store
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = if path.exists() {
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read data file: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse data file: {}", path.display()))?
        } else {
            log::debug!("No data file at {}, starting empty", path.display());
            StoreData::default()
        };
        Ok(Self { path, data })
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let json =
            serde_json::to_string_pretty(&self.data).context("Failed to serialize records")?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write data file: {}", self.path.display()))?;
        log::debug!("Saved data file {}", self.path.display());
        Ok(())
    }

    pub fn data(&self) -> &StoreData {
        &self.data
    }

    pub fn records<R: Record>(&self) -> &[R]
    where
        StoreData: Collection<R>,
    {
        Collection::<R>::list(&self.data)
    }

    pub fn employees(&self) -> &[Employee] {
        &self.data.employees
    }

    pub fn add_employee(&mut self, employee: Employee) {
        match self.data.employees.iter_mut().find(|e| e.id == employee.id) {
            Some(existing) => *existing = employee,
            None => self.data.employees.push(employee),
        }
    }
}

impl<R: Record> RecordSink<R> for RecordStore
where
    StoreData: Collection<R>,
{
    fn submit(&mut self, record: R) {
        let list: &mut Vec<R> = self.data.list_mut();
        match list.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => {
                log::info!("Updated {} {}", R::KIND, record.id());
                *existing = record;
            }
            None => {
                log::info!("Created {} {}", R::KIND, record.id());
                list.push(record);
            }
        }
    }

    fn bulk_submit(&mut self, records: Vec<R>) {
        log::info!("Imported {} {} records", records.len(), R::KIND);
        Collection::<R>::list_mut(&mut self.data).extend(records);
    }
}
