use super::{Query, SortDirection};
use crate::core::{Record, compare_values, display_form};

/// Evaluates a [`Query`] against records.
///
/// Results are a subset of the input in input order (or sort order when the
/// query asks for one). The input is never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEngine {
    searchable_fields: Vec<String>,
}

impl QueryEngine {
    pub fn new<I, S>(searchable_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            searchable_fields: searchable_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn searchable_fields(&self) -> &[String] {
        &self.searchable_fields
    }

    pub fn apply<'a, I>(&self, records: I, query: &Query) -> Vec<&'a Record>
    where
        I: IntoIterator<Item = &'a Record>,
    {
        let needle = (!query.has_blank_term()).then(|| query.term.to_lowercase());

        let mut results: Vec<&Record> = records
            .into_iter()
            .filter(|record| match &needle {
                Some(needle) => self.matches_term(record, needle),
                None => true,
            })
            .filter(|record| Self::matches_filters(record, query))
            .collect();

        if let Some(sort) = &query.sort {
            // missing values sort last in either direction
            results.sort_by(|a, b| {
                let (x, y) = (a.get(&sort.field), b.get(&sort.field));
                let ordering = compare_values(x, y);
                let both_present = [x, y].iter().all(|v| v.is_some_and(|v| !v.is_null()));
                match sort.direction {
                    SortDirection::Descending if both_present => ordering.reverse(),
                    _ => ordering,
                }
            });
        }

        results
    }

    /// `needle` must already be lower-cased.
    pub fn matches_term(&self, record: &Record, needle: &str) -> bool {
        self.searchable_fields.iter().any(|field| {
            record
                .get(field)
                .and_then(display_form)
                .is_some_and(|value| value.to_lowercase().contains(needle))
        })
    }

    pub fn matches_filters(record: &Record, query: &Query) -> bool {
        query.active_filters().all(|(field, expected)| {
            record
                .get(field)
                .and_then(display_form)
                .is_some_and(|value| value == expected)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ALL, SortSpec};
    use crate::storage::RecordStore;
    use serde_json::json;

    fn users() -> RecordStore {
        let mut store = RecordStore::new("users");
        store
            .seed(
                [
                    json!({"id": 1, "name": "Ada Lovelace", "email": "ada@corp.io", "role": "Admin", "status": "Active"}),
                    json!({"id": 2, "name": "Brian Kernighan", "email": "bk@corp.io", "role": "Manager", "status": "Inactive"}),
                    json!({"id": 3, "name": "Cleo Adams", "email": "cleo@corp.io", "role": "Employee", "status": "Active"}),
                    json!({"id": 4, "name": "Dmitri", "email": "dm@corp.io", "role": "Employee", "status": "Active", "score": 4}),
                ]
                .into_iter()
                .map(|v| v.as_object().cloned().unwrap())
                .collect(),
            )
            .unwrap();
        store
    }

    fn ids(records: &[&Record]) -> Vec<u64> {
        records.iter().map(|r| r.id().get()).collect()
    }

    #[test]
    fn test_blank_term_matches_everything() {
        let store = users();
        let engine = QueryEngine::new(["name", "email"]);
        assert_eq!(engine.apply(store.list(), &Query::new().with_term("   ")).len(), 4);
    }

    #[test]
    fn test_term_case_insensitive_across_fields() {
        let store = users();
        let engine = QueryEngine::new(["name", "email", "role"]);
        let result = engine.apply(store.list(), &Query::new().with_term("ADA"));
        assert_eq!(ids(&result), vec![1, 3]);

        let result = engine.apply(store.list(), &Query::new().with_term("manager"));
        assert_eq!(ids(&result), vec![2]);
    }

    #[test]
    fn test_unsearchable_fields_ignored() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let result = engine.apply(store.list(), &Query::new().with_term("corp.io"));
        assert!(result.is_empty());
    }

    #[test]
    fn test_filters_and_term_combine_with_and() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let query = Query::new()
            .with_term("d")
            .with_filter("status", "Active")
            .with_filter("role", "Employee");
        assert_eq!(ids(&engine.apply(store.list(), &query)), vec![3, 4]);
    }

    #[test]
    fn test_all_sentinel_disables_filter() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let query = Query::new().with_filter("role", ALL);
        assert_eq!(engine.apply(store.list(), &query).len(), 4);
    }

    #[test]
    fn test_filter_exact_match_only() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let query = Query::new().with_filter("status", "active");
        assert!(engine.apply(store.list(), &query).is_empty());
    }

    #[test]
    fn test_numeric_filter_uses_display_form() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let query = Query::new().with_filter("score", "4");
        assert_eq!(ids(&engine.apply(store.list(), &query)), vec![4]);
    }

    #[test]
    fn test_sorted_descending() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        let query = Query::new().with_sort(SortSpec::descending("name"));
        assert_eq!(ids(&engine.apply(store.list(), &query)), vec![4, 3, 2, 1]);
    }

    #[test]
    fn test_missing_values_sort_last() {
        let store = users();
        let engine = QueryEngine::new(["name"]);
        for sort in [SortSpec::ascending("score"), SortSpec::descending("score")] {
            let query = Query::new().with_sort(sort);
            assert_eq!(ids(&engine.apply(store.list(), &query)), vec![4, 1, 2, 3]);
        }
    }

    #[test]
    fn test_apply_idempotent() {
        let store = users();
        let engine = QueryEngine::new(["name", "email"]);
        let query = Query::new().with_term("o").with_filter("status", "Active");
        let once = engine.apply(store.list(), &query);
        let twice = engine.apply(once.iter().copied(), &query);
        assert_eq!(once, twice);
    }
}
