//! Error types for configuration resolution.

use std::fmt;

use thiserror::Error;

use crate::schema::ConfigField;

/// One schema violation on one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: ConfigField,
    pub message: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// The assembled configuration failed schema validation. Carries every issue, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub issues: Vec<FieldIssue>,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        f.write_str(&joined)
    }
}

impl std::error::Error for ValidationError {}

/// A string that names no member of a closed configuration enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub expected: Vec<&'static str>,
    pub received: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let expected = self
            .expected
            .iter()
            .map(|name| format!("'{name}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        write!(
            f,
            "invalid enum value, expected {expected}, received '{}'",
            self.received
        )
    }
}

impl std::error::Error for UnknownVariant {}

/// Failure inside a key-value store lookup.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("credentials file error: {0}")]
    Credentials(#[from] dotenvy::Error),

    #[error("store lock poisoned")]
    Poisoned,

    #[error("store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("{0}")]
    Other(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    /// Schema validation failed after all tiers resolved
    #[error("invalid configuration: {0}")]
    Validation(#[from] ValidationError),

    /// A secure or indexed store lookup itself failed
    #[error("{store} store lookup for '{key}' failed: {source}")]
    Store {
        store: String,
        key: String,
        #[source]
        source: StoreError,
    },
}

impl ConfigError {
    pub fn is_validation(&self) -> bool {
        matches!(self, ConfigError::Validation(_))
    }

    pub fn validation_issues(&self) -> Option<&[FieldIssue]> {
        match self {
            ConfigError::Validation(err) => Some(&err.issues),
            ConfigError::Store { .. } => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_joins_issues() {
        let err = ValidationError {
            issues: vec![
                FieldIssue {
                    field: ConfigField::BackendUrl,
                    message: "invalid url".to_string(),
                },
                FieldIssue {
                    field: ConfigField::Environment,
                    message: "unexpected value".to_string(),
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "backendUrl: invalid url; environment: unexpected value"
        );
    }

    #[test]
    fn test_config_error_kinds() {
        let validation = ConfigError::from(ValidationError { issues: Vec::new() });
        assert!(validation.is_validation());

        let store = ConfigError::Store {
            store: "secure".to_string(),
            key: "OPENAI_API_KEY".to_string(),
            source: StoreError::Poisoned,
        };
        assert!(!store.is_validation());
        assert!(store.validation_issues().is_none());
        assert_eq!(
            store.to_string(),
            "secure store lookup for 'OPENAI_API_KEY' failed: store lock poisoned"
        );
    }
}
