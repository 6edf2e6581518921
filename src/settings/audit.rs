use crate::core::{RecordId, Result};
use crate::storage::{KeyValueStore, KeyValueStoreExt};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default number of entries kept before the oldest are dropped.
pub const DEFAULT_AUDIT_CAPACITY: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Deleted => "deleted",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub at: DateTime<Utc>,
    pub actor: String,
    pub collection: String,
    pub action: AuditAction,
    pub record_id: RecordId,
}

/// Append-only activity list kept under one key of a [`KeyValueStore`],
/// newest first. Cheap to clone; clones share the same backing key.
#[derive(Clone)]
pub struct AuditLog {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    capacity: usize,
}

impl AuditLog {
    pub fn new(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
            capacity: DEFAULT_AUDIT_CAPACITY,
        }
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity.max(1);
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn entries(&self) -> Result<Vec<AuditEntry>> {
        Ok(self.kv.get_as::<Vec<AuditEntry>>(&self.key)?.unwrap_or_default())
    }

    pub fn record(&self, entry: AuditEntry) -> Result<()> {
        let mut entries = self.entries()?;
        entries.insert(0, entry);
        entries.truncate(self.capacity);
        self.kv.set_as(&self.key, &entries)
    }

    pub fn clear(&self) -> Result<()> {
        self.kv.remove(&self.key).map(|_| ())
    }
}

impl fmt::Debug for AuditLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuditLog")
            .field("key", &self.key)
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    fn entry(id: u64) -> AuditEntry {
        AuditEntry {
            at: Utc::now(),
            actor: "admin".to_string(),
            collection: "users".to_string(),
            action: AuditAction::Created,
            record_id: RecordId::new(id),
        }
    }

    #[test]
    fn test_newest_first_and_capped() {
        let log = AuditLog::new(Arc::new(MemoryKeyValueStore::new()), "crewboard:audit").with_capacity(2);
        log.record(entry(1)).unwrap();
        log.record(entry(2)).unwrap();
        log.record(entry(3)).unwrap();

        let ids: Vec<u64> = log.entries().unwrap().iter().map(|e| e.record_id.get()).collect();
        assert_eq!(ids, vec![3, 2]);
    }

    #[test]
    fn test_clones_share_backing_key() {
        let log = AuditLog::new(Arc::new(MemoryKeyValueStore::new()), "crewboard:audit");
        let other = log.clone();
        log.record(entry(1)).unwrap();
        assert_eq!(other.entries().unwrap().len(), 1);
        other.clear().unwrap();
        assert!(log.entries().unwrap().is_empty());
    }
}
