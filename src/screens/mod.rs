//! Dashboard screens and the managed collections behind them.
//!
//! Each CRUD screen is nothing more than a [`CollectionSpec`] plus its mock
//! fixture; all list behaviour lives in the controller.

mod fixtures;

use crate::controller::{CollectionController, CollectionSpec, FieldPattern, MockDataSource};
use crate::core::{BoardError, Fields, Result};
use crate::query::SortSpec;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

lazy_static! {
    pub static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[A-Za-z]{2,}$").expect("email pattern is valid");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Dashboard,
    Users,
    Roles,
    Tasks,
    Reports,
    Directory,
    Tickets,
    Settings,
}

impl Screen {
    pub const ALL: [Screen; 8] = [
        Screen::Dashboard,
        Screen::Users,
        Screen::Roles,
        Screen::Tasks,
        Screen::Reports,
        Screen::Directory,
        Screen::Tickets,
        Screen::Settings,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Users => "users",
            Self::Roles => "roles",
            Self::Tasks => "tasks",
            Self::Reports => "reports",
            Self::Directory => "directory",
            Self::Tickets => "tickets",
            Self::Settings => "settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::Users => "User Management",
            Self::Roles => "Roles & Permissions",
            Self::Tasks => "Tasks",
            Self::Reports => "Reports",
            Self::Directory => "Employee Directory",
            Self::Tickets => "Support Tickets",
            Self::Settings => "Settings",
        }
    }

    /// Whether the screen is a managed collection page.
    pub fn is_collection(self) -> bool {
        !matches!(self, Self::Dashboard | Self::Settings)
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Screen {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|screen| screen.slug() == wanted)
            .ok_or_else(|| BoardError::validation("screen", format!("unknown screen '{}'", s)))
    }
}

fn email_pattern(field: &str) -> FieldPattern {
    FieldPattern::from_regex(field, EMAIL_REGEX.clone(), "must be a valid email")
}

fn fields(value: serde_json::Value) -> Fields {
    match value {
        serde_json::Value::Object(map) => map,
        _ => Fields::new(),
    }
}

/// Collection configuration for a screen, or `None` for non-list screens.
pub fn collection_spec(screen: Screen) -> Option<CollectionSpec> {
    let spec = match screen {
        Screen::Users => CollectionSpec::new("users")
            .searchable(["name", "email", "role"])
            .filter("role", ["Admin", "Manager", "Employee"])
            .filter("status", ["Active", "Inactive"])
            .required(["name", "email", "role"])
            .pattern(email_pattern("email"))
            .unique(["email"])
            .defaults(fields(json!({"role": "Employee", "status": "Active"}))),
        Screen::Roles => CollectionSpec::new("roles")
            .searchable(["name", "description"])
            .filter("scope", ["Global", "Department"])
            .required(["name"])
            .unique(["name"])
            .range("members", 0.0, 10_000.0)
            .defaults(fields(json!({"scope": "Department", "permissions": [], "members": 0}))),
        Screen::Tasks => CollectionSpec::new("tasks")
            .searchable(["task.title", "task.department", "assignee"])
            .filter("status", ["To Do", "In Progress", "Done"])
            .filter("priority", ["Low", "Medium", "High"])
            .filter("task.department", fixtures::DEPARTMENTS)
            .required(["task.title", "task.department", "assignee"])
            .defaults(fields(json!({"status": "To Do", "priority": "Medium"}))),
        Screen::Reports => CollectionSpec::new("reports")
            .searchable(["title", "department", "owner"])
            .filter("department", fixtures::DEPARTMENTS)
            .filter("type", ["Financial", "Operational", "Performance"])
            .required(["title", "department", "type"])
            .sort(SortSpec::descending("period")),
        Screen::Directory => CollectionSpec::new("employees")
            .searchable(["name", "title", "department"])
            .filter("department", fixtures::DEPARTMENTS)
            .required(["name", "department", "email"])
            .range("performance", 0.0, 5.0)
            .pattern(email_pattern("email"))
            .unique(["email"]),
        Screen::Tickets => CollectionSpec::new("tickets")
            .searchable(["subject", "requester", "category"])
            .filter("status", ["Open", "In Progress", "Resolved", "Closed"])
            .filter("priority", ["Low", "Medium", "High", "Urgent"])
            .required(["subject", "requester"])
            .defaults(fields(json!({"status": "Open", "priority": "Medium", "category": "General"}))),
        Screen::Dashboard | Screen::Settings => return None,
    };
    Some(spec)
}

/// Mock fixture for a screen's collection.
pub fn mock_records(screen: Screen) -> Vec<Fields> {
    let raw = match screen {
        Screen::Users => fixtures::users(),
        Screen::Roles => fixtures::roles(),
        Screen::Tasks => fixtures::tasks(),
        Screen::Reports => fixtures::reports(),
        Screen::Directory => fixtures::employees(),
        Screen::Tickets => fixtures::tickets(),
        Screen::Dashboard | Screen::Settings => return Vec::new(),
    };
    match raw {
        serde_json::Value::Array(items) => items.into_iter().map(fields).collect(),
        _ => Vec::new(),
    }
}

pub fn mock_source(screen: Screen, latency: Duration) -> MockDataSource {
    MockDataSource::new(mock_records(screen)).with_latency(latency)
}

/// Controller for a collection screen with its page size overridden.
pub fn controller_for(screen: Screen, page_size: usize, page_window: usize) -> Result<CollectionController> {
    let spec = collection_spec(screen).ok_or_else(|| {
        BoardError::validation("screen", format!("'{}' is not a collection screen", screen))
    })?;
    Ok(CollectionController::new(
        spec.page_size(page_size).page_window(page_window),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::RecordStore;

    #[test]
    fn test_screen_parse_roundtrip() {
        for screen in Screen::ALL {
            assert_eq!(screen.slug().parse::<Screen>().unwrap(), screen);
        }
        assert!("payroll".parse::<Screen>().is_err());
    }

    #[test]
    fn test_every_collection_screen_has_spec_and_data() {
        for screen in Screen::ALL.into_iter().filter(|s| s.is_collection()) {
            assert!(collection_spec(screen).is_some(), "{}", screen);
            assert!(!mock_records(screen).is_empty(), "{}", screen);
        }
        assert!(collection_spec(Screen::Settings).is_none());
    }

    #[test]
    fn test_fixtures_satisfy_their_own_rules() {
        for screen in Screen::ALL.into_iter().filter(|s| s.is_collection()) {
            let spec = collection_spec(screen).unwrap();
            for record in mock_records(screen) {
                let problems = crate::controller::validate_draft(&spec, &record);
                assert!(problems.is_empty(), "{}: {:?}", screen, problems);
            }
            let mut store = RecordStore::new(spec.name.clone()).with_unique_fields(spec.unique_fields.clone());
            store.seed(mock_records(screen)).unwrap();
        }
    }

    #[test]
    fn test_email_regex() {
        assert!(EMAIL_REGEX.is_match("ada@corp.io"));
        assert!(!EMAIL_REGEX.is_match("ada@corp"));
        assert!(!EMAIL_REGEX.is_match("ada corp.io"));
    }
}
