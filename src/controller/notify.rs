use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// Button rendered next to a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationAction {
    pub label: String,
    pub enabled: bool,
}

impl NotificationAction {
    /// The "Undo" affordance shown after deletes. It is rendered but inert:
    /// there are no undo semantics behind it.
    pub fn undo_placeholder() -> Self {
        Self {
            label: "Undo".to_string(),
            enabled: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotificationKind,
    pub action: Option<NotificationAction>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Holds at most one live notification. Pushing a new one replaces the old,
/// which also cancels the old one's pending auto-dismissal.
#[derive(Debug, Clone)]
pub struct NotificationCenter {
    ttl: Duration,
    current: Option<Notification>,
    next_id: u64,
    superseded: u64,
}

impl NotificationCenter {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            current: None,
            next_id: 0,
            superseded: 0,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn push(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        action: Option<NotificationAction>,
    ) -> &Notification {
        self.push_at(message, kind, action, Utc::now())
    }

    pub fn push_at(
        &mut self,
        message: impl Into<String>,
        kind: NotificationKind,
        action: Option<NotificationAction>,
        now: DateTime<Utc>,
    ) -> &Notification {
        if self.current.is_some() {
            self.superseded += 1;
        }
        self.next_id += 1;
        self.current.insert(Notification {
            id: self.next_id,
            message: message.into(),
            kind,
            action,
            issued_at: now,
            expires_at: now + self.ttl,
        })
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref()
    }

    /// Dismisses the live notification if it has reached its expiry.
    pub fn expire(&mut self, now: DateTime<Utc>) -> Option<Notification> {
        if self.current.as_ref().is_some_and(|n| n.expires_at <= now) {
            return self.current.take();
        }
        None
    }

    /// Dismisses by id; a stale id (already superseded) does nothing.
    pub fn dismiss(&mut self, id: u64) -> bool {
        if self.current.as_ref().is_some_and(|n| n.id == id) {
            self.current = None;
            return true;
        }
        false
    }

    pub fn clear(&mut self) {
        self.current = None;
    }

    /// Count of notifications replaced before they were dismissed.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}

impl Default for NotificationCenter {
    fn default() -> Self {
        Self::new(Duration::seconds(4))
    }
}
