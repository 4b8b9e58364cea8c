//! Error types for WFSync
//!
//! Provides a single error taxonomy shared by every pipeline stage:
//! - Distinct error types for each failure mode
//! - Stable machine-readable error codes
//! - Retry and scope classification used by the orchestrator

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Configuration errors (1xxx)
    ConfigurationError,

    // Remote errors (2xxx)
    TransportError,
    HttpStatus,
    NotFound,
    InvalidPayload,

    // Record errors (3xxx)
    ValidationError,
    ReferenceError,

    // Persistence errors (4xxx)
    ReferentialIntegrity,
    DatabaseError,

    // Internal errors (9xxx)
    SerializationError,
    InternalError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::ConfigurationError => 1001,

            ErrorCode::TransportError => 2001,
            ErrorCode::HttpStatus => 2002,
            ErrorCode::NotFound => 2003,
            ErrorCode::InvalidPayload => 2004,

            ErrorCode::ValidationError => 3001,
            ErrorCode::ReferenceError => 3002,

            ErrorCode::ReferentialIntegrity => 4001,
            ErrorCode::DatabaseError => 4002,

            ErrorCode::SerializationError => 9001,
            ErrorCode::InternalError => 9002,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Invalid payload from {url}: {message}")]
    InvalidPayload { url: String, message: String },

    #[error("Validation failed for field `{field}`: {reason}")]
    Validation { field: String, reason: String },

    #[error("Unknown {parent} `{key}` referenced by {child}")]
    Reference {
        parent: String,
        key: String,
        child: String,
    },

    #[error("Referential integrity violation on {table}: {message}")]
    ReferentialIntegrity { table: String, message: String },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for a validation failure on one field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Shorthand for a configuration failure
    pub fn configuration(message: impl Into<String>) -> Self {
        AppError::Configuration {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Transport { .. } => ErrorCode::TransportError,
            AppError::HttpStatus { status: 404, .. } => ErrorCode::NotFound,
            AppError::HttpStatus { .. } => ErrorCode::HttpStatus,
            AppError::InvalidPayload { .. } => ErrorCode::InvalidPayload,
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::Reference { .. } => ErrorCode::ReferenceError,
            AppError::ReferentialIntegrity { .. } => ErrorCode::ReferentialIntegrity,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Remote entity is gone (HTTP 404)
    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::HttpStatus { status: 404, .. })
    }

    /// Only network failures are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::Transport { .. })
    }

    /// Errors that belong to a single entity and must not abort a batch
    pub fn is_entity_level(&self) -> bool {
        !matches!(self, AppError::Configuration { .. })
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, errs)) = fields.into_iter().next() else {
            return AppError::validation("record", errors.to_string());
        };

        let reason = errs
            .first()
            .map(|e| match &e.message {
                Some(message) => format!("{}: {}", e.code, message),
                None => format!("{} constraint violated", e.code),
            })
            .unwrap_or_else(|| "invalid".to_string());

        AppError::Validation {
            field: field.to_string(),
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_mapping() {
        let err = AppError::HttpStatus {
            status: 404,
            url: "https://api.example/items/Nope".into(),
        };
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert!(err.is_not_found());
        assert!(!err.is_retryable());

        let err = AppError::HttpStatus {
            status: 502,
            url: "https://api.example/mods/".into(),
        };
        assert_eq!(err.code(), ErrorCode::HttpStatus);
        assert_eq!(err.code().as_code(), 2002);
    }

    #[test]
    fn test_transport_is_retryable() {
        let err = AppError::Transport {
            url: "https://api.example/weapons/".into(),
            message: "timed out".into(),
        };
        assert!(err.is_retryable());
        assert!(err.is_entity_level());
    }

    #[test]
    fn test_configuration_is_not_entity_level() {
        let err = AppError::configuration("remote.base_url is required");
        assert_eq!(err.code(), ErrorCode::ConfigurationError);
        assert!(!err.is_entity_level());
    }

    #[test]
    fn test_validation_message() {
        let err = AppError::validation("ability_index", "range: must be within 1..=4");
        assert_eq!(
            err.to_string(),
            "Validation failed for field `ability_index`: range: must be within 1..=4"
        );
    }
}
