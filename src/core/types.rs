use super::value::{deep_merge, get_path, set_path};
use super::{BoardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;

/// Raw field mapping of one record, without its identifier.
pub type Fields = Map<String, JsonValue>;

/// Name of the identifier key when records are exchanged as flat JSON.
pub const ID_FIELD: &str = "id";

/// Identifier assigned by a record store. Never reused after deletion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// The id after this one. Fails once the id space is used up.
    pub(crate) fn next(self) -> Result<Self> {
        self.0
            .checked_add(1)
            .map(Self)
            .ok_or_else(|| BoardError::Storage(format!("no record id follows {}", self.0)))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RecordId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl std::str::FromStr for RecordId {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| BoardError::validation(ID_FIELD, format!("'{}' is not a record id", s)))
    }
}

/// Store-maintained timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RecordMeta {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordMeta {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
        }
    }
}

/// One row of a managed collection: a user, role, task, ticket, employee or report.
///
/// The field mapping is opaque to the core; only the configured search, filter
/// and validation paths are ever looked at. It is serialized under its own
/// key so user field names never collide with `id` or `_meta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    id: RecordId,
    #[serde(rename = "_meta", default)]
    meta: RecordMeta,
    #[serde(default)]
    fields: Fields,
}

impl Record {
    pub(crate) fn new(id: RecordId, mut fields: Fields, now: DateTime<Utc>) -> Self {
        fields.remove(ID_FIELD);
        Self {
            id,
            meta: RecordMeta::new(now),
            fields,
        }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Looks up a dotted path such as `task.title`.
    pub fn get(&self, path: &str) -> Option<&JsonValue> {
        if path == ID_FIELD {
            return None;
        }
        get_path(&self.fields, path)
    }

    /// String form of a field, for display and equality filters.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(JsonValue::as_str)
    }

    /// Deep-merges `patch` into the record: nested objects merge key-wise,
    /// everything else replaces.
    pub(crate) fn merge(&mut self, patch: Fields, now: DateTime<Utc>) {
        deep_merge(&mut self.fields, patch);
        self.meta.updated_at = now;
    }

    /// Replaces the value at `path` wholesale, including nested objects.
    pub(crate) fn replace_field(&mut self, path: &str, value: JsonValue, now: DateTime<Utc>) -> Result<()> {
        set_path(&mut self.fields, path, value)?;
        self.meta.updated_at = now;
        Ok(())
    }

    /// Flat JSON form with the identifier inlined, as handed to renderers.
    pub fn to_json(&self) -> JsonValue {
        let mut flat = Map::with_capacity(self.fields.len() + 1);
        flat.insert(ID_FIELD.to_string(), JsonValue::from(self.id.get()));
        for (key, value) in &self.fields {
            flat.insert(key.clone(), value.clone());
        }
        JsonValue::Object(flat)
    }
}
