use crate::core::RecordId;
use std::fmt;

/// Change notification published by a [`RecordStore`](super::RecordStore)
/// after a successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Seeded { count: usize },
    Created(RecordId),
    Updated(RecordId),
    Deleted(RecordId),
}

impl StoreEvent {
    pub fn record_id(&self) -> Option<RecordId> {
        match self {
            Self::Seeded { .. } => None,
            Self::Created(id) | Self::Updated(id) | Self::Deleted(id) => Some(*id),
        }
    }
}

impl fmt::Display for StoreEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Seeded { count } => write!(f, "seeded {} records", count),
            Self::Created(id) => write!(f, "created {}", id),
            Self::Updated(id) => write!(f, "updated {}", id),
            Self::Deleted(id) => write!(f, "deleted {}", id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);

pub(crate) type Listener = Box<dyn FnMut(&StoreEvent) + Send>;

/// Ordered set of store listeners.
#[derive(Default)]
pub(crate) struct Subscribers {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl Subscribers {
    pub(crate) fn add(&mut self, listener: Listener) -> SubscriptionId {
        self.next_id += 1;
        let id = SubscriptionId(self.next_id);
        self.listeners.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }

    pub(crate) fn publish(&mut self, event: &StoreEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl fmt::Debug for Subscribers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscribers")
            .field("count", &self.listeners.len())
            .finish()
    }
}
