use serde::{Deserialize, Serialize};

use super::UserRole;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmployeeStatus {
    #[default]
    Active,
    Inactive,
}

impl EmployeeStatus {
    pub fn label(&self) -> &'static str {
        match self {
            EmployeeStatus::Active => "Active",
            EmployeeStatus::Inactive => "Inactive",
        }
    }
}

/// A member of staff who can be picked as an assignee
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Picker label, e.g. `Jane Smith (Sales Head)`
    pub fn picker_label(&self) -> String {
        format!("{} ({})", self.name, self.role)
    }
}
