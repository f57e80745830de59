//! User roles

use serde::{Deserialize, Serialize};

/// Role of the person operating the tool
///
/// Roles are matched by label. Labels the tool does not know are kept as
/// `Other` so that a role coming from configuration is never lost.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum UserRole {
    SuperAdmin,
    AdminFounder,
    SalesHead,
    SalesExecutive,
    DeliveryManager,
    PresalesHead,
    PresalesConsultant,
    Other(String),
}

const KNOWN_ROLES: &[UserRole] = &[
    UserRole::SuperAdmin,
    UserRole::AdminFounder,
    UserRole::SalesHead,
    UserRole::SalesExecutive,
    UserRole::DeliveryManager,
    UserRole::PresalesHead,
    UserRole::PresalesConsultant,
];

impl UserRole {
    /// Get display label
    pub fn label(&self) -> &str {
        match self {
            UserRole::SuperAdmin => "Super Admin",
            UserRole::AdminFounder => "Admin/Founder",
            UserRole::SalesHead => "Sales Head",
            UserRole::SalesExecutive => "Sales Executive",
            UserRole::DeliveryManager => "Delivery Manager",
            UserRole::PresalesHead => "Presales Head",
            UserRole::PresalesConsultant => "Presales Consultant",
            UserRole::Other(label) => label,
        }
    }

    /// All known roles (excludes `Other`)
    pub fn all_variants() -> &'static [UserRole] {
        KNOWN_ROLES
    }

    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        Self::all_variants()
            .iter()
            .find(|r| r.label().eq_ignore_ascii_case(trimmed))
            .cloned()
            .unwrap_or_else(|| UserRole::Other(trimmed.to_string()))
    }

    /// Any role whose label mentions presales belongs to the presales group
    pub fn is_presales(&self) -> bool {
        self.label().contains("Presales")
    }

    /// Whether the role may open the create form on lead, opportunity and action item pages
    pub fn can_create(&self) -> bool {
        *self != UserRole::DeliveryManager
    }
}

impl Default for UserRole {
    fn default() -> Self {
        UserRole::SalesExecutive
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl From<String> for UserRole {
    fn from(label: String) -> Self {
        UserRole::from_label(&label)
    }
}

impl From<UserRole> for String {
    fn from(role: UserRole) -> Self {
        role.label().to_string()
    }
}

impl std::str::FromStr for UserRole {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(UserRole::from_label(s))
    }
}
