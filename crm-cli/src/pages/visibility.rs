//! Which action items a user gets to see

use crate::models::{Record, UserRole};

/// Group assignee for action items meant for every delivery manager
pub const DELIVERY_MANAGERS_GROUP: &str = "Delivery Managers";

/// Group assignee for action items meant for the presales team
pub const PRESALES_TEAM_GROUP: &str = "Presales Team";

/// Visibility rule for a single action item
pub fn is_visible(role: &UserRole, user: &str, owner: &str, assignee: &str) -> bool {
    let mine = owner == user || assignee == user;
    match role {
        UserRole::SuperAdmin | UserRole::AdminFounder => true,
        UserRole::DeliveryManager => assignee == DELIVERY_MANAGERS_GROUP || mine,
        role if role.is_presales() => assignee.contains("Presales") || mine,
        UserRole::SalesHead => true,
        _ => false,
    }
}

/// Subset of `items` visible to `user` under `role`, order preserved
pub fn visible_records<'a, R: Record>(items: &'a [R], role: &UserRole, user: &str) -> Vec<&'a R> {
    items
        .iter()
        .filter(|item| is_visible(role, user, item.owner(), item.assignee()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActionItem;

    fn item(id: &str, owner: &str, assignee: &str) -> ActionItem {
        ActionItem {
            id: id.to_string(),
            owner: owner.to_string(),
            assignee: assignee.to_string(),
            ..Default::default()
        }
    }

    fn sample() -> Vec<ActionItem> {
        vec![
            item("1", "alice", "Delivery Managers"),
            item("2", "bob", "Presales Team"),
            item("3", "carol", "dave"),
            item("4", "dave", "erin"),
            item("5", "erin", "Presales Lead Group"),
        ]
    }

    fn ids(items: &[&ActionItem]) -> Vec<String> {
        items.iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_admins_see_everything() {
        let items = sample();
        for role in [UserRole::SuperAdmin, UserRole::AdminFounder, UserRole::SalesHead] {
            assert_eq!(visible_records(&items, &role, "nobody").len(), 5);
        }
    }

    #[test]
    fn test_delivery_manager() {
        let items = sample();
        let visible = visible_records(&items, &UserRole::DeliveryManager, "dave");
        assert_eq!(ids(&visible), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_presales_roles() {
        let items = sample();
        for role in [
            UserRole::PresalesHead,
            UserRole::PresalesConsultant,
            UserRole::Other("Junior Presales Analyst".to_string()),
        ] {
            let visible = visible_records(&items, &role, "carol");
            assert_eq!(ids(&visible), vec!["2", "3", "5"]);
        }
    }

    #[test]
    fn test_other_roles_see_nothing() {
        let items = sample();
        assert!(visible_records(&items, &UserRole::SalesExecutive, "alice").is_empty());
        assert!(visible_records(&items, &UserRole::Other("Intern".into()), "alice").is_empty());
    }

    #[test]
    fn test_filter_is_idempotent() {
        let items = sample();
        let roles = UserRole::all_variants()
            .iter()
            .cloned()
            .chain([UserRole::Other("Presales Intern".into()), UserRole::Other("Guest".into())]);
        for role in roles {
            for user in ["alice", "dave", "carol", "zed"] {
                let once: Vec<ActionItem> = visible_records(&items, &role, user)
                    .into_iter()
                    .cloned()
                    .collect();
                let twice = visible_records(&once, &role, user);
                assert_eq!(ids(&twice), once.iter().map(|i| i.id.clone()).collect::<Vec<_>>());
            }
        }
    }
}
