use crate::core::{BoardError, Result};
use serde_json::{Map, Value as JsonValue};
use std::cmp::Ordering;

pub(crate) fn get_path<'a>(fields: &'a Map<String, JsonValue>, path: &str) -> Option<&'a JsonValue> {
    let mut segments = path.split('.');
    let mut current = fields.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

pub(crate) fn set_path(fields: &mut Map<String, JsonValue>, path: &str, value: JsonValue) -> Result<()> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(BoardError::validation(path, "field path has an empty segment"));
    }

    let (last, parents) = segments
        .split_last()
        .ok_or_else(|| BoardError::validation(path, "field path is empty"))?;

    let mut current = fields;
    for segment in parents {
        let slot = current
            .entry((*segment).to_string())
            .or_insert_with(|| JsonValue::Object(Map::new()));
        current = match slot {
            JsonValue::Object(map) => map,
            _ => {
                return Err(BoardError::validation(
                    path,
                    format!("'{}' is not an object", segment),
                ));
            }
        };
    }
    current.insert((*last).to_string(), value);
    Ok(())
}

/// Merges `patch` into `target`. Objects on both sides merge key-wise;
/// any other pairing replaces the target value.
pub(crate) fn deep_merge(target: &mut Map<String, JsonValue>, patch: Map<String, JsonValue>) {
    for (key, incoming) in patch {
        match incoming {
            JsonValue::Object(nested) => {
                if let Some(JsonValue::Object(existing)) = target.get_mut(&key) {
                    deep_merge(existing, nested);
                } else {
                    target.insert(key, JsonValue::Object(nested));
                }
            }
            other => {
                target.insert(key, other);
            }
        }
    }
}

/// Null, whitespace-only strings and empty arrays/objects count as blank.
pub fn is_blank(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => true,
        Some(JsonValue::String(s)) => s.trim().is_empty(),
        Some(JsonValue::Array(items)) => items.is_empty(),
        Some(JsonValue::Object(map)) => map.is_empty(),
        Some(_) => false,
    }
}

/// Scalar rendering used by text search and equality filters.
/// Structured values have no display form.
pub fn display_form(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        JsonValue::Bool(b) => Some(b.to_string()),
        JsonValue::Null | JsonValue::Array(_) | JsonValue::Object(_) => None,
    }
}

/// Numeric reading of a value. Numeric strings count, so `"5"` and `5`
/// are the same number to validation and sorting alike.
pub fn as_number(value: &JsonValue) -> Option<f64> {
    let number = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    number.is_finite().then_some(number)
}

/// Ordering used by list sorting. Missing and null values sort last.
/// Otherwise numbers (including numeric strings) come first and compare
/// numerically, then booleans, then text case-insensitively, then
/// structured values. This is a total order over any mix of values.
pub fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    let a = a.filter(|v| !v.is_null());
    let b = b.filter(|v| !v.is_null());
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, _) => Ordering::Greater,
        (_, None) => Ordering::Less,
        (Some(x), Some(y)) => SortKey::of(x).cmp(&SortKey::of(y)),
    }
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum SortKey {
    Number(Finite),
    Bool(bool),
    Text(String),
    Structured,
}

impl SortKey {
    fn of(value: &JsonValue) -> Self {
        if let Some(number) = as_number(value) {
            return Self::Number(Finite(number));
        }
        match value {
            JsonValue::Bool(b) => Self::Bool(*b),
            JsonValue::String(s) => Self::Text(s.to_lowercase()),
            _ => Self::Structured,
        }
    }
}

/// A finite `f64`, ordered with `total_cmp`.
#[derive(Debug, Clone, Copy)]
struct Finite(f64);

impl PartialEq for Finite {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Finite {}

impl PartialOrd for Finite {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Finite {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}
