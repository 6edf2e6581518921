use super::collection_spec::CollectionSpec;
use crate::core::value::{as_number, get_path};
use crate::core::{BoardError, Fields, display_form, is_blank};

/// Field-level problems in check order: required fields, numeric ranges,
/// then format patterns. A field reports at most one problem.
pub fn validate_draft(spec: &CollectionSpec, draft: &Fields) -> Vec<(String, String)> {
    let mut problems: Vec<(String, String)> = Vec::new();
    let mut report = |field: &str, message: String| {
        if !problems.iter().any(|(existing, _)| existing == field) {
            problems.push((field.to_string(), message));
        }
    };

    for field in &spec.required_fields {
        if is_blank(get_path(draft, field)) {
            report(field, "is required".to_string());
        }
    }

    for (field, range) in &spec.numeric_ranges {
        let value = get_path(draft, field);
        if is_blank(value) {
            continue;
        }
        match value.and_then(as_number) {
            Some(number) if range.contains(number) => {}
            Some(_) => report(
                field,
                format!("must be between {} and {}", range.min, range.max),
            ),
            None => report(field, "must be a number".to_string()),
        }
    }

    for pattern in &spec.patterns {
        let value = get_path(draft, &pattern.field);
        if is_blank(value) {
            continue;
        }
        let matches = value
            .and_then(display_form)
            .is_some_and(|text| pattern.regex.is_match(text.trim()));
        if !matches {
            report(&pattern.field, pattern.message.clone());
        }
    }

    problems
}

/// First problem as a typed error, if any.
pub fn first_error(problems: &[(String, String)]) -> Option<BoardError> {
    problems
        .first()
        .map(|(field, message)| BoardError::validation(field.clone(), message.clone()))
}
