//! Per-user settings blob and the activity audit trail, both kept in the
//! local key-value store.

pub mod audit;

pub use audit::{AuditAction, AuditEntry, AuditLog};

use crate::core::{BoardError, Result};
use crate::screens::EMAIL_REGEX;
use crate::storage::{KeyValueStore, KeyValueStoreExt, namespaced_key};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    System,
}

impl std::str::FromStr for Theme {
    type Err = BoardError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            other => Err(BoardError::validation("theme", format!("unknown theme '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub display_name: String,
    pub email: String,
    pub theme: Theme,
    pub notifications_enabled: bool,
    pub language: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: "Dashboard User".to_string(),
            email: "user@example.com".to_string(),
            theme: Theme::Light,
            notifications_enabled: true,
            language: "en".to_string(),
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        if self.display_name.trim().is_empty() {
            return Err(BoardError::validation("display_name", "is required"));
        }
        if !EMAIL_REGEX.is_match(self.email.trim()) {
            return Err(BoardError::validation("email", "must be a valid email"));
        }
        if self.language.trim().is_empty() {
            return Err(BoardError::validation("language", "is required"));
        }
        Ok(())
    }

    /// Applies a single `field=value` style change.
    pub fn set_field(&mut self, field: &str, value: &str) -> Result<()> {
        match field {
            "display_name" => self.display_name = value.to_string(),
            "email" => self.email = value.to_string(),
            "theme" => self.theme = value.parse()?,
            "notifications_enabled" => {
                self.notifications_enabled = value.trim().parse().map_err(|_| {
                    BoardError::validation(field, "must be true or false")
                })?;
            }
            "language" => self.language = value.to_string(),
            other => {
                return Err(BoardError::validation(other, "unknown settings field"));
            }
        }
        Ok(())
    }
}

/// Loads and saves [`Settings`] under `<namespace>:settings`.
#[derive(Clone)]
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl SettingsStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: &str) -> Self {
        Self {
            kv,
            key: namespaced_key(namespace, "settings"),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stored settings, or defaults when nothing was saved yet.
    pub fn load(&self) -> Result<Settings> {
        Ok(self.kv.get_as::<Settings>(&self.key)?.unwrap_or_default())
    }

    pub fn save(&self, settings: &Settings) -> Result<()> {
        settings.validate()?;
        self.kv.set_as(&self.key, settings)
    }

    pub fn reset(&self) -> Result<()> {
        self.kv.remove(&self.key).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;

    #[test]
    fn test_missing_settings_load_defaults() {
        let store = SettingsStore::new(Arc::new(MemoryKeyValueStore::new()), "crewboard");
        assert_eq!(store.key(), "crewboard:settings");
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_save_and_reload() {
        let store = SettingsStore::new(Arc::new(MemoryKeyValueStore::new()), "crewboard");
        let mut settings = Settings::default();
        settings.set_field("theme", "Dark").unwrap();
        settings.set_field("notifications_enabled", "false").unwrap();
        store.save(&settings).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded.theme, Theme::Dark);
        assert!(!loaded.notifications_enabled);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let store = SettingsStore::new(Arc::new(MemoryKeyValueStore::new()), "crewboard");
        let mut settings = Settings::default();
        settings.email = "not-an-email".to_string();
        assert!(matches!(
            store.save(&settings),
            Err(BoardError::ValidationFailed { .. })
        ));
        assert!(settings.set_field("volume", "11").is_err());
    }
}
