use crate::core::{BoardError, Result};
use crate::pager::{DEFAULT_PAGE_SIZE, DEFAULT_WINDOW};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_PAGE_SIZE: &str = "CREWBOARD_PAGE_SIZE";
pub const ENV_PAGE_WINDOW: &str = "CREWBOARD_PAGE_WINDOW";
pub const ENV_DATA_DIR: &str = "CREWBOARD_DATA_DIR";
pub const ENV_NAMESPACE: &str = "CREWBOARD_NAMESPACE";
pub const ENV_LATENCY_MS: &str = "CREWBOARD_LATENCY_MS";

/// Dashboard runtime configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Rows per page on every collection screen
    pub page_size: usize,

    /// Number of page buttons in the pager window
    pub page_window: usize,

    /// How long a notification stays visible
    pub notification_ttl: Duration,

    /// Artificial delay applied to loads and saves
    pub simulated_latency: Duration,

    /// Root directory of the file-backed key-value store
    pub data_dir: PathBuf,

    /// Key prefix for everything written to local persistence
    pub namespace: String,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            page_window: DEFAULT_WINDOW,
            notification_ttl: Duration::from_secs(4),
            simulated_latency: Duration::ZERO,
            data_dir: PathBuf::from(".crewboard"),
            namespace: "crewboard".to_string(),
        }
    }
}

impl BoardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults overridden by `CREWBOARD_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`BoardConfig::from_env`] but reads variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_PAGE_SIZE) {
            config.page_size = parse_positive(ENV_PAGE_SIZE, &raw)?;
        }
        if let Some(raw) = lookup(ENV_PAGE_WINDOW) {
            config.page_window = parse_positive(ENV_PAGE_WINDOW, &raw)?;
        }
        if let Some(raw) = lookup(ENV_LATENCY_MS) {
            let millis = raw.trim().parse::<u64>().map_err(|_| {
                BoardError::Config(format!("{} must be a whole number of milliseconds", ENV_LATENCY_MS))
            })?;
            config.simulated_latency = Duration::from_millis(millis);
        }
        if let Some(raw) = lookup(ENV_DATA_DIR) {
            config.data_dir = PathBuf::from(raw);
        }
        if let Some(raw) = lookup(ENV_NAMESPACE) {
            config.namespace = raw;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(BoardError::Config("page_size must be at least 1".into()));
        }
        if self.page_window == 0 {
            return Err(BoardError::Config("page_window must be at least 1".into()));
        }
        if self.namespace.trim().is_empty() {
            return Err(BoardError::Config("namespace must not be empty".into()));
        }
        Ok(())
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn page_window(mut self, page_window: usize) -> Self {
        self.page_window = page_window;
        self
    }

    pub fn notification_ttl(mut self, ttl: Duration) -> Self {
        self.notification_ttl = ttl;
        self
    }

    pub fn simulated_latency(mut self, latency: Duration) -> Self {
        self.simulated_latency = latency;
        self
    }

    pub fn data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    pub fn namespace(mut self, namespace: &str) -> Self {
        self.namespace = namespace.to_string();
        self
    }

    /// Storage key for a collection, e.g. `crewboard:users`.
    pub fn collection_key(&self, collection: &str) -> String {
        crate::storage::namespaced_key(&self.namespace, collection)
    }

    pub fn audit_key(&self) -> String {
        crate::storage::namespaced_key(&self.namespace, "audit")
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(0) => Err(BoardError::Config(format!("{} must be at least 1", key))),
        Ok(value) => Ok(value),
        Err(_) => Err(BoardError::Config(format!("{} must be a positive integer, got '{}'", key, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = BoardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, BoardConfig::default());
        assert_eq!(config.page_size, 5);
        assert_eq!(config.page_window, 3);
        assert_eq!(config.notification_ttl, Duration::from_secs(4));
        assert_eq!(config.collection_key("users"), "crewboard:users");
    }

    #[test]
    fn test_env_overrides() {
        let config = BoardConfig::from_lookup(lookup(&[
            (ENV_PAGE_SIZE, "10"),
            (ENV_PAGE_WINDOW, "5"),
            (ENV_LATENCY_MS, "250"),
            (ENV_DATA_DIR, "/tmp/board"),
            (ENV_NAMESPACE, "demo"),
        ]))
        .unwrap();

        assert_eq!(config.page_size, 10);
        assert_eq!(config.page_window, 5);
        assert_eq!(config.simulated_latency, Duration::from_millis(250));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/board"));
        assert_eq!(config.audit_key(), "demo:audit");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for vars in [
            [(ENV_PAGE_SIZE, "0")],
            [(ENV_PAGE_SIZE, "five")],
            [(ENV_PAGE_WINDOW, "0")],
            [(ENV_LATENCY_MS, "-3")],
            [(ENV_NAMESPACE, "  ")],
        ] {
            assert!(matches!(
                BoardConfig::from_lookup(lookup(&vars)),
                Err(BoardError::Config(_))
            ));
        }
    }
}
