use crate::core::{BoardError, Fields, Result};
use crate::pager::{DEFAULT_PAGE_SIZE, DEFAULT_WINDOW};
use crate::query::{ALL, SortSpec};
use crate::storage::InsertPosition;
use regex::Regex;
use serde::Serialize;

/// Equality filter offered on a page, with the choices the page renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterSpec {
    pub field: String,
    /// Choices excluding [`ALL`], which is always accepted.
    pub options: Vec<String>,
}

impl FilterSpec {
    pub fn accepts(&self, value: &str) -> bool {
        value == ALL || self.options.is_empty() || self.options.iter().any(|option| option == value)
    }
}

/// Inclusive numeric bounds for a field, e.g. a 0-5 performance score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Format rule checked on non-blank values.
#[derive(Debug, Clone)]
pub struct FieldPattern {
    pub field: String,
    pub regex: Regex,
    pub message: String,
}

impl FieldPattern {
    pub fn new(field: impl Into<String>, pattern: &str, message: impl Into<String>) -> Result<Self> {
        let field = field.into();
        let regex = Regex::new(pattern)
            .map_err(|err| BoardError::Config(format!("invalid pattern for '{}': {}", field, err)))?;
        Ok(Self {
            field,
            regex,
            message: message.into(),
        })
    }

    pub fn from_regex(field: impl Into<String>, regex: Regex, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            regex,
            message: message.into(),
        }
    }
}

/// Everything a page supplies to get a managed collection: record shape
/// defaults, which fields are searchable and filterable, validation rules
/// and paging parameters.
#[derive(Debug, Clone)]
pub struct CollectionSpec {
    pub name: String,
    pub searchable_fields: Vec<String>,
    pub filters: Vec<FilterSpec>,
    pub required_fields: Vec<String>,
    pub numeric_ranges: Vec<(String, NumericRange)>,
    pub patterns: Vec<FieldPattern>,
    pub unique_fields: Vec<String>,
    pub defaults: Fields,
    pub page_size: usize,
    pub page_window: usize,
    pub insert_position: InsertPosition,
    pub sort: Option<SortSpec>,
}

impl CollectionSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            searchable_fields: Vec::new(),
            filters: Vec::new(),
            required_fields: Vec::new(),
            numeric_ranges: Vec::new(),
            patterns: Vec::new(),
            unique_fields: Vec::new(),
            defaults: Fields::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page_window: DEFAULT_WINDOW,
            insert_position: InsertPosition::Prepend,
            sort: None,
        }
    }

    pub fn searchable<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.searchable_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn filter<I, S>(mut self, field: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.filters.push(FilterSpec {
            field: field.into(),
            options: options.into_iter().map(Into::into).collect(),
        });
        self
    }

    pub fn required<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn range(mut self, field: impl Into<String>, min: f64, max: f64) -> Self {
        self.numeric_ranges.push((field.into(), NumericRange { min, max }));
        self
    }

    pub fn pattern(mut self, pattern: FieldPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    pub fn unique<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn defaults(mut self, defaults: Fields) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn page_window(mut self, window: usize) -> Self {
        self.page_window = window.max(1);
        self
    }

    pub fn insert_position(mut self, position: InsertPosition) -> Self {
        self.insert_position = position;
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn filter_spec(&self, field: &str) -> Option<&FilterSpec> {
        self.filters.iter().find(|filter| filter.field == field)
    }
}
