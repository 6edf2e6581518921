use crate::core::{BoardError, Fields, Result};
use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::time::Duration;

/// Supplies the initial records for a collection.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Fields>>;
}

/// Fixed records returned after a simulated network delay.
#[derive(Debug, Clone, Default)]
pub struct MockDataSource {
    records: Vec<Fields>,
    latency: Duration,
}

impl MockDataSource {
    pub fn new(records: Vec<Fields>) -> Self {
        Self {
            records,
            latency: Duration::ZERO,
        }
    }

    /// Accepts a JSON array of objects, as mock fixtures are usually written.
    pub fn from_json(value: JsonValue) -> Result<Self> {
        let JsonValue::Array(items) = value else {
            return Err(BoardError::Serialization(
                "mock data must be a JSON array".to_string(),
            ));
        };

        let mut records = Vec::with_capacity(items.len());
        for (index, item) in items.into_iter().enumerate() {
            match item {
                JsonValue::Object(fields) => records.push(fields),
                _ => {
                    return Err(BoardError::Serialization(format!(
                        "mock record {} is not an object",
                        index
                    )));
                }
            }
        }
        Ok(Self::new(records))
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl DataSource for MockDataSource {
    async fn fetch(&self) -> Result<Vec<Fields>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(self.records.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_mock_source_returns_records() {
        let source = MockDataSource::from_json(json!([{"name": "Ada"}, {"name": "Brian"}]))
            .unwrap()
            .with_latency(Duration::from_millis(5));
        let records = source.fetch().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["name"], json!("Brian"));
    }

    #[test]
    fn test_from_json_rejects_non_objects() {
        assert!(MockDataSource::from_json(json!({"name": "Ada"})).is_err());
        assert!(MockDataSource::from_json(json!([1, 2])).is_err());
    }
}
