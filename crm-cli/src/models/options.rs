//! Picklist values offered by the record forms
//!
//! Picklist fields are stored as plain strings so that imported values the
//! lists do not know about still survive a round trip. These lists drive the
//! form pickers and the "unknown value" warnings raised during import.

use super::RecordKind;

pub const REGIONS: &[&str] = &[
    "North America",
    "South America",
    "Europe",
    "Middle East",
    "Africa",
    "Asia Pacific",
];

pub const COUNTRIES: &[&str] = &[
    "United States",
    "Canada",
    "Mexico",
    "Brazil",
    "United Kingdom",
    "Germany",
    "France",
    "Netherlands",
    "United Arab Emirates",
    "Saudi Arabia",
    "South Africa",
    "India",
    "Singapore",
    "Australia",
    "Japan",
];

pub const SALE_SOURCES: &[&str] = &[
    "Advertisement",
    "Cold Call",
    "Employee Referral",
    "External Referral",
    "Online Store",
    "Partner",
    "Public Relations",
    "Trade Show",
    "Web Research",
];

pub const PRIORITIES: &[&str] = &["High", "Medium", "Low"];

pub const LEAD_TYPES: &[&str] = &["RFP", "RFI", "Direct", "Partner", "Renewal"];

pub const CURRENCIES: &[&str] = &["USD", "EUR", "GBP", "INR", "AED", "SGD", "AUD"];

pub const LEAD_STATUSES: &[&str] = &[
    "Not Contacted",
    "Attempted to Contact",
    "Contact in Future",
    "Contacted",
    "Qualified",
    "Junk Lead",
    "Lost Lead",
];

/// Sale statuses
pub const STATUSES: &[&str] = &[
    "Not Contacted",
    "Attempted to Contact",
    "Contacted",
    "Proposal Sent",
    "Converted to Lead",
    "Closed",
];

pub const ACTION_STATUSES: &[&str] = &["Not Started", "In Progress", "Completed", "Deferred"];

pub const ACTION_TYPES: &[&str] = &["Lead", "Opportunity", "Sale", "General"];

pub const FEASIBILITY_STATUSES: &[&str] = &["Pending", "Feasible", "Not Feasible"];

pub const PRESALES_RECOMMENDATIONS: &[&str] = &["Proceed", "Proceed with Caution", "Do Not Proceed"];

/// Picklist backing a field of a record kind, if the field has one
pub fn options_for(kind: RecordKind, field: &str) -> Option<&'static [&'static str]> {
    let options = match (kind, field) {
        (_, "region") => REGIONS,
        (_, "country") => COUNTRIES,
        (_, "priority") => PRIORITIES,
        (_, "currency") => CURRENCIES,
        (RecordKind::ActionItems, "status") => ACTION_STATUSES,
        (RecordKind::ActionItems, "actionType") => ACTION_TYPES,
        (RecordKind::Leads, "status") => LEAD_STATUSES,
        (RecordKind::Sales, "status") => STATUSES,
        (RecordKind::Leads | RecordKind::Opportunities, "type") => LEAD_TYPES,
        (RecordKind::Leads | RecordKind::Opportunities | RecordKind::Sales, "source") => SALE_SOURCES,
        (RecordKind::Opportunities, "feasibilityStatus") => FEASIBILITY_STATUSES,
        (
            RecordKind::Leads,
            "techFeasibility" | "implementationFeasibility" | "salesFeasibility",
        ) => FEASIBILITY_STATUSES,
        (RecordKind::Opportunities, "presalesRecommendation") => PRESALES_RECOMMENDATIONS,
        _ => return None,
    };
    Some(options)
}

/// Case-sensitive membership check against one of the lists above
pub fn is_known(options: &[&str], value: &str) -> bool {
    options.iter().any(|o| *o == value)
}
