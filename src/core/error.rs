use super::types::RecordId;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Record {0} not found")]
    NotFound(RecordId),

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Duplicate value '{value}' for unique field '{field}'")]
    DuplicateConstraintViolated { field: String, value: String },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl BoardError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::DuplicateConstraintViolated {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// Errors a user can fix from the page itself by correcting input or
    /// refreshing stale state. Everything else is a defect or an environment
    /// failure.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::ValidationFailed { .. } | Self::DuplicateConstraintViolated { .. }
        )
    }

    /// Field the error is attached to, if it is a field-level error.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { field, .. } | Self::DuplicateConstraintViolated { field, .. } => {
                Some(field)
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BoardError>;

impl From<serde_json::Error> for BoardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl From<std::io::Error> for BoardError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for BoardError {
    fn from(err: std::sync::PoisonError<T>) -> Self {
        Self::Storage(format!("lock poisoned: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_kinds() {
        assert!(BoardError::NotFound(RecordId::new(1)).is_recoverable());
        assert!(BoardError::validation("name", "required").is_recoverable());
        assert!(BoardError::duplicate("name", "Admin").is_recoverable());
        assert!(!BoardError::invalid_state("no draft").is_recoverable());
        assert!(!BoardError::Storage("disk".into()).is_recoverable());
    }

    #[test]
    fn test_field_attachment() {
        assert_eq!(BoardError::validation("email", "bad").field(), Some("email"));
        assert_eq!(BoardError::NotFound(RecordId::new(3)).field(), None);
    }

    #[test]
    fn test_display_messages() {
        assert_eq!(
            BoardError::NotFound(RecordId::new(7)).to_string(),
            "Record 7 not found"
        );
        assert_eq!(
            BoardError::duplicate("name", "Admin").to_string(),
            "Duplicate value 'Admin' for unique field 'name'"
        );
    }
}
