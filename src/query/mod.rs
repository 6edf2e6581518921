//! Search and filter evaluation over an in-memory collection.

mod engine;

pub use engine::QueryEngine;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Filter value meaning "no constraint on this field".
pub const ALL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Descending,
        }
    }

    /// Parses `field` or `field:desc` / `field:asc`.
    pub fn parse(raw: &str) -> Option<Self> {
        let (field, direction) = match raw.rsplit_once(':') {
            Some((field, "desc")) => (field, SortDirection::Descending),
            Some((field, "asc")) => (field, SortDirection::Ascending),
            Some(_) => return None,
            None => (raw, SortDirection::Ascending),
        };
        let field = field.trim();
        if field.is_empty() {
            return None;
        }
        Some(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Free-text term plus per-field equality filters, with optional ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub term: String,
    pub filters: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        self.term = term.into();
        self
    }

    pub fn with_filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// True when the term is empty or whitespace only.
    pub fn has_blank_term(&self) -> bool {
        self.term.trim().is_empty()
    }

    /// Filters that constrain results, i.e. everything not set to [`ALL`].
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .filter(|(_, value)| value.as_str() != ALL)
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    pub fn is_unconstrained(&self) -> bool {
        self.has_blank_term() && self.active_filters().next().is_none()
    }
}
