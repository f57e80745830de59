//! Assignee choices for the create/edit forms

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use super::visibility::{DELIVERY_MANAGERS_GROUP, PRESALES_TEAM_GROUP};
use crate::models::Employee;

/// One entry of the assignee picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssigneeOption {
    /// Stored on the record
    pub value: String,
    /// Shown to the user
    pub label: String,
}

/// Active employees as `Name (Role)`, preceded by the group assignees when asked for
pub fn assignee_options(employees: &[Employee], include_groups: bool) -> Vec<AssigneeOption> {
    let groups = [DELIVERY_MANAGERS_GROUP, PRESALES_TEAM_GROUP]
        .into_iter()
        .filter(|_| include_groups)
        .map(|group| AssigneeOption {
            value: group.to_string(),
            label: group.to_string(),
        });

    let people = employees
        .iter()
        .filter(|e| e.is_active())
        .map(|e| AssigneeOption {
            value: e.name.clone(),
            label: e.picker_label(),
        });

    groups.chain(people).collect()
}

/// Fuzzy-filter picker options by label, best match first
pub fn filter_options<'a>(options: &'a [AssigneeOption], query: &str) -> Vec<&'a AssigneeOption> {
    let query = query.trim();
    if query.is_empty() {
        return options.iter().collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored: Vec<(&AssigneeOption, i64)> = options
        .iter()
        .filter_map(|opt| matcher.fuzzy_match(&opt.label, query).map(|score| (opt, score)))
        .collect();

    // Stable sort keeps picker order among equal scores
    scored.sort_by(|a, b| b.1.cmp(&a.1));
    scored.into_iter().map(|(opt, _)| opt).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EmployeeStatus, UserRole};

    fn employee(name: &str, role: UserRole, status: EmployeeStatus) -> Employee {
        Employee {
            id: format!("EMP-{}", name),
            name: name.to_string(),
            role,
            status,
        }
    }

    fn staff() -> Vec<Employee> {
        vec![
            employee("Maya Patel", UserRole::SalesExecutive, EmployeeStatus::Active),
            employee("Tom Reed", UserRole::DeliveryManager, EmployeeStatus::Inactive),
            employee("Ana Silva", UserRole::PresalesConsultant, EmployeeStatus::Active),
        ]
    }

    #[test]
    fn test_only_active_employees() {
        let options = assignee_options(&staff(), false);
        let labels: Vec<_> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["Maya Patel (Sales Executive)", "Ana Silva (Presales Consultant)"]
        );
        assert_eq!(options[0].value, "Maya Patel");
    }

    #[test]
    fn test_groups_come_first() {
        let options = assignee_options(&staff(), true);
        assert_eq!(options.len(), 4);
        assert_eq!(options[0].value, "Delivery Managers");
        assert_eq!(options[1].value, "Presales Team");
    }

    #[test]
    fn test_fuzzy_filter() {
        let options = assignee_options(&staff(), true);
        let hits = filter_options(&options, "ana");
        assert_eq!(hits[0].value, "Ana Silva");
        // inactive employees are not candidates
        assert!(filter_options(&options, "tom").is_empty());

        assert_eq!(filter_options(&options, "").len(), 4);
        assert!(filter_options(&options, "zzzz").is_empty());
    }
}
