use super::events::{StoreEvent, SubscriptionId, Subscribers};
use crate::core::value::deep_merge;
use crate::core::{BoardError, Fields, ID_FIELD, Record, RecordId, Result, display_form, is_blank};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::HashSet;
use tracing::{Level, event};

/// Where newly created records land in the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertPosition {
    /// New records surface at the top of the list.
    #[default]
    Prepend,
    Append,
}

/// Serializable image of a store, including the id counter so that ids are
/// never handed out twice across reloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub collection: String,
    pub next_id: RecordId,
    pub records: Vec<Record>,
}

/// In-memory owner of one page's records.
///
/// All mutation goes through `create`, `update` and `delete`; each success
/// bumps the revision and is published to subscribers.
#[derive(Debug)]
pub struct RecordStore {
    name: String,
    records: Vec<Record>,
    next_id: RecordId,
    revision: u64,
    insert_position: InsertPosition,
    unique_fields: Vec<String>,
    defaults: Fields,
    subscribers: Subscribers,
}

impl RecordStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            records: Vec::new(),
            next_id: RecordId::new(1),
            revision: 0,
            insert_position: InsertPosition::default(),
            unique_fields: Vec::new(),
            defaults: Fields::new(),
            subscribers: Subscribers::default(),
        }
    }

    pub fn with_insert_position(mut self, position: InsertPosition) -> Self {
        self.insert_position = position;
        self
    }

    pub fn with_unique_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.unique_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Fields every created record starts from before the caller's values are merged in.
    pub fn with_defaults(mut self, defaults: Fields) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Incremented on every successful mutation; lets readers detect staleness.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn contains(&self, id: RecordId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// All records in store order.
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Replaces the contents with records from a data source.
    ///
    /// Seed entries keep a numeric `id` when they carry one; the rest get
    /// fresh ids in order.
    pub fn seed(&mut self, seeds: Vec<Fields>) -> Result<()> {
        let now = Utc::now();
        let mut explicit = Vec::with_capacity(seeds.len());
        for fields in &seeds {
            explicit.push(fields.get(ID_FIELD).and_then(JsonValue::as_u64).map(RecordId::new));
        }

        check_distinct_ids(explicit.iter().flatten().copied())?;

        let mut next_id = match explicit.iter().flatten().max() {
            Some(highest) => highest.next()?.max(self.next_id),
            None => self.next_id,
        };

        let mut records = Vec::with_capacity(seeds.len());
        for (fields, id) in seeds.into_iter().zip(explicit) {
            let id = match id {
                Some(id) => id,
                None => {
                    let assigned = next_id;
                    next_id = next_id.next()?;
                    assigned
                }
            };
            let candidate = Record::new(id, fields, now);
            self.check_unique(&records, &candidate)?;
            records.push(candidate);
        }

        self.records = records;
        self.next_id = next_id;
        self.bump(StoreEvent::Seeded {
            count: self.records.len(),
        });
        Ok(())
    }

    pub fn create(&mut self, fields: Fields) -> Result<Record> {
        let mut merged = self.defaults.clone();
        deep_merge(&mut merged, fields);

        let id = self.next_id;
        let following = id.next()?;
        let record = Record::new(id, merged, Utc::now());
        self.check_unique(&self.records, &record)?;

        self.next_id = following;
        match self.insert_position {
            InsertPosition::Prepend => self.records.insert(0, record.clone()),
            InsertPosition::Append => self.records.push(record.clone()),
        }

        event!(Level::DEBUG, collection = %self.name, id = %id, "record created");
        self.bump(StoreEvent::Created(id));
        Ok(record)
    }

    /// Merges `fields` into an existing record. Nested objects merge key-wise.
    pub fn update(&mut self, id: RecordId, mut fields: Fields) -> Result<Record> {
        let index = self.position(id).ok_or(BoardError::NotFound(id))?;
        Self::strip_id(id, &mut fields)?;

        let mut candidate = self.records[index].clone();
        candidate.merge(fields, Utc::now());
        self.check_unique(&self.records, &candidate)?;

        self.records[index] = candidate.clone();
        event!(Level::DEBUG, collection = %self.name, id = %id, "record updated");
        self.bump(StoreEvent::Updated(id));
        Ok(candidate)
    }

    /// Replaces one field wholesale, for callers that mean to drop nested keys.
    pub fn replace_field(&mut self, id: RecordId, path: &str, value: JsonValue) -> Result<Record> {
        let index = self.position(id).ok_or(BoardError::NotFound(id))?;
        if path == ID_FIELD {
            return Err(BoardError::validation(ID_FIELD, "record ids are immutable"));
        }

        let mut candidate = self.records[index].clone();
        candidate.replace_field(path, value, Utc::now())?;
        self.check_unique(&self.records, &candidate)?;

        self.records[index] = candidate.clone();
        self.bump(StoreEvent::Updated(id));
        Ok(candidate)
    }

    /// Removes a record. Deleting an absent id fails so stale views notice.
    pub fn delete(&mut self, id: RecordId) -> Result<Record> {
        let index = self.position(id).ok_or(BoardError::NotFound(id))?;
        let removed = self.records.remove(index);
        event!(Level::DEBUG, collection = %self.name, id = %id, "record deleted");
        self.bump(StoreEvent::Deleted(id));
        Ok(removed)
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        self.subscribers.add(Box::new(listener))
    }

    pub fn unsubscribe(&mut self, subscription: SubscriptionId) -> bool {
        self.subscribers.remove(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            collection: self.name.clone(),
            next_id: self.next_id,
            records: self.records.clone(),
        }
    }

    /// Loads a snapshot written by [`snapshot`](Self::snapshot). The snapshot
    /// must belong to this collection and hold each id once.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> Result<()> {
        if snapshot.collection != self.name {
            return Err(BoardError::Storage(format!(
                "snapshot belongs to '{}', not '{}'",
                snapshot.collection, self.name
            )));
        }
        check_distinct_ids(snapshot.records.iter().map(Record::id))?;

        let floor = match snapshot.records.iter().map(Record::id).max() {
            Some(highest) => highest.next()?,
            None => RecordId::new(1),
        };
        if snapshot.next_id < floor {
            return Err(BoardError::Storage(format!(
                "snapshot for '{}' has next id {} below existing record ids",
                snapshot.collection, snapshot.next_id
            )));
        }

        let count = snapshot.records.len();
        self.records = snapshot.records;
        self.next_id = snapshot.next_id.max(self.next_id);
        self.bump(StoreEvent::Seeded { count });
        Ok(())
    }

    fn position(&self, id: RecordId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    fn strip_id(id: RecordId, fields: &mut Fields) -> Result<()> {
        match fields.remove(ID_FIELD) {
            None => Ok(()),
            Some(value) if value.as_u64() == Some(id.get()) => Ok(()),
            Some(_) => Err(BoardError::validation(ID_FIELD, "record ids are immutable")),
        }
    }

    fn check_unique(&self, existing: &[Record], candidate: &Record) -> Result<()> {
        for field in &self.unique_fields {
            let value = candidate.get(field);
            if is_blank(value) {
                continue;
            }
            let Some(needle) = value.and_then(display_form).map(|v| normalize(&v)) else {
                continue;
            };
            let clash = existing.iter().any(|other| {
                other.id() != candidate.id()
                    && other
                        .get(field)
                        .and_then(display_form)
                        .is_some_and(|v| normalize(&v) == needle)
            });
            if clash {
                return Err(BoardError::duplicate(
                    field.clone(),
                    value.and_then(display_form).unwrap_or_default(),
                ));
            }
        }
        Ok(())
    }

    fn bump(&mut self, change: StoreEvent) {
        self.revision += 1;
        self.subscribers.publish(&change);
    }
}

fn check_distinct_ids(ids: impl IntoIterator<Item = RecordId>) -> Result<()> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(BoardError::duplicate(ID_FIELD, id.to_string()));
        }
    }
    Ok(())
}

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn fields(value: JsonValue) -> Fields {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_prepends_and_assigns_ids() {
        let mut store = RecordStore::new("users");
        let first = store.create(fields(json!({"name": "Ada"}))).unwrap();
        let second = store.create(fields(json!({"name": "Brian"}))).unwrap();

        assert_eq!(first.id(), RecordId::new(1));
        assert_eq!(second.id(), RecordId::new(2));
        assert_eq!(store.list()[0].id(), second.id());
    }

    #[test]
    fn test_append_position() {
        let mut store = RecordStore::new("users").with_insert_position(InsertPosition::Append);
        store.create(fields(json!({"name": "Ada"}))).unwrap();
        store.create(fields(json!({"name": "Brian"}))).unwrap();
        assert_eq!(store.list()[1].get_str("name"), Some("Brian"));
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let mut store = RecordStore::new("tasks");
        let a = store.create(fields(json!({"title": "a"}))).unwrap();
        store.delete(a.id()).unwrap();
        let b = store.create(fields(json!({"title": "b"}))).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_seed_keeps_explicit_ids() {
        let mut store = RecordStore::new("users");
        store
            .seed(vec![
                fields(json!({"id": 10, "name": "Ada"})),
                fields(json!({"name": "Brian"})),
            ])
            .unwrap();

        assert_eq!(store.list()[0].id(), RecordId::new(10));
        assert_eq!(store.list()[1].id(), RecordId::new(11));
        let created = store.create(fields(json!({"name": "Cleo"}))).unwrap();
        assert_eq!(created.id(), RecordId::new(12));
    }

    #[test]
    fn test_seed_rejects_duplicate_ids() {
        let mut store = RecordStore::new("users");
        let err = store
            .seed(vec![fields(json!({"id": 1})), fields(json!({"id": 1}))])
            .unwrap_err();
        assert!(matches!(err, BoardError::DuplicateConstraintViolated { .. }));
    }

    #[test]
    fn test_defaults_merged_under_fields() {
        let mut store = RecordStore::new("tickets")
            .with_defaults(fields(json!({"status": "Open", "priority": "Medium"})));
        let ticket = store
            .create(fields(json!({"subject": "VPN down", "priority": "High"})))
            .unwrap();
        assert_eq!(ticket.get_str("status"), Some("Open"));
        assert_eq!(ticket.get_str("priority"), Some("High"));
    }

    #[test]
    fn test_update_missing_is_not_found() {
        let mut store = RecordStore::new("users");
        let err = store.update(RecordId::new(3), Fields::new()).unwrap_err();
        assert_eq!(err, BoardError::NotFound(RecordId::new(3)));
    }

    #[test]
    fn test_update_rejects_id_change() {
        let mut store = RecordStore::new("users");
        let user = store.create(fields(json!({"name": "Ada"}))).unwrap();
        let err = store.update(user.id(), fields(json!({"id": 99}))).unwrap_err();
        assert!(matches!(err, BoardError::ValidationFailed { .. }));
        assert!(store.update(user.id(), fields(json!({"id": 1}))).is_ok());
    }

    #[test]
    fn test_unique_fields_case_insensitive() {
        let mut store = RecordStore::new("roles").with_unique_fields(["name"]);
        let admin = store.create(fields(json!({"name": "Admin"}))).unwrap();
        let err = store.create(fields(json!({"name": " admin "}))).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateConstraintViolated { .. }));

        let other = store.create(fields(json!({"name": "Viewer"}))).unwrap();
        assert!(store.update(other.id(), fields(json!({"name": "ADMIN"}))).is_err());
        assert!(store.update(admin.id(), fields(json!({"name": "Admin"}))).is_ok());
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_subscribers_receive_events() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let mut store = RecordStore::new("users");
        let subscription = store.subscribe(move |event| sink.lock().unwrap().push(*event));

        let user = store.create(fields(json!({"name": "Ada"}))).unwrap();
        store.update(user.id(), fields(json!({"name": "Ada L."}))).unwrap();
        store.delete(user.id()).unwrap();
        assert!(store.delete(user.id()).is_err());

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                StoreEvent::Created(user.id()),
                StoreEvent::Updated(user.id()),
                StoreEvent::Deleted(user.id()),
            ]
        );
        assert_eq!(store.revision(), 3);
        assert!(store.unsubscribe(subscription));
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_snapshot_restore_preserves_counter() {
        let mut store = RecordStore::new("users");
        let a = store.create(fields(json!({"name": "Ada"}))).unwrap();
        store.create(fields(json!({"name": "Brian"}))).unwrap();
        store.delete(a.id()).unwrap();
        let snapshot = store.snapshot();

        let mut restored = RecordStore::new("users");
        restored.restore(snapshot).unwrap();
        assert_eq!(restored.len(), 1);
        let next = restored.create(fields(json!({"name": "Cleo"}))).unwrap();
        assert_eq!(next.id(), RecordId::new(3));
    }

    #[test]
    fn test_seed_at_id_ceiling_fails_cleanly() {
        let mut store = RecordStore::new("users");
        let err = store
            .seed(vec![fields(json!({"id": u64::MAX, "name": "Ada"}))])
            .unwrap_err();
        assert!(matches!(err, BoardError::Storage(_)));
        assert!(store.is_empty());
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_restore_rejects_duplicate_ids() {
        let mut source = RecordStore::new("users");
        source.create(fields(json!({"name": "Ada"}))).unwrap();
        let mut snapshot = source.snapshot();
        snapshot.records.push(snapshot.records[0].clone());

        let mut restored = RecordStore::new("users");
        let err = restored.restore(snapshot).unwrap_err();
        assert!(matches!(err, BoardError::DuplicateConstraintViolated { .. }));
        assert!(restored.is_empty());
    }

    #[test]
    fn test_restore_rejects_other_collection() {
        let mut source = RecordStore::new("roles");
        source.create(fields(json!({"name": "Viewer"}))).unwrap();

        let mut restored = RecordStore::new("users");
        assert!(matches!(
            restored.restore(source.snapshot()),
            Err(BoardError::Storage(_))
        ));
    }
}
