//! # Error Types
//!
//! Structured error types for bullion_core. Every failure carries enough
//! context for a caller to show a useful message and re-prompt the user,
//! and serializes cleanly to JSON for API consumers.
//!
//! ## Example
//!
//! ```rust
//! use bullion_core::errors::{BillError, BillResult};
//!
//! fn validate_weight(weight_g: f64) -> BillResult<()> {
//!     if weight_g <= 0.0 {
//!         return Err(BillError::InvalidInput {
//!             field: "weight".to_string(),
//!             value: weight_g.to_string(),
//!             reason: "Weight must be positive".to_string(),
//!         });
//!     }
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bullion_core operations
pub type BillResult<T> = Result<T, BillError>;

/// Structured error type for billing and shop operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum BillError {
    /// An input value is invalid (non-numeric, out of range, unknown purity)
    #[error("Invalid input for '{field}': {value} - {reason}")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    /// A required field is missing
    #[error("Missing required field: {field}")]
    MissingField { field: String },

    /// A record was looked up by id or key and does not exist
    #[error("{entity} not found: {key}")]
    NotFound { entity: String, key: String },

    /// A unique field collides with an existing record
    #[error("{field} '{value}' is already taken")]
    Duplicate { field: String, value: String },

    /// Email/password pair did not match an account
    #[error("Authentication failed: invalid email or password")]
    AuthenticationFailed,

    /// The acting user lacks the capability for this operation
    #[error("Permission denied: {username} ({role}) cannot {capability}")]
    PermissionDenied {
        username: String,
        role: String,
        capability: String,
    },

    /// Configuration values are present but unusable
    #[error("Configuration error: {reason}")]
    ConfigError { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// Ledger file is locked by another process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },

    /// Generic internal error (should be rare)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl BillError {
    /// Create an InvalidInput error
    pub fn invalid_input(field: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        BillError::InvalidInput {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a MissingField error
    pub fn missing_field(field: impl Into<String>) -> Self {
        BillError::MissingField {
            field: field.into(),
        }
    }

    /// Create a NotFound error
    pub fn not_found(entity: impl Into<String>, key: impl Into<String>) -> Self {
        BillError::NotFound {
            entity: entity.into(),
            key: key.into(),
        }
    }

    /// Create a Duplicate error
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        BillError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a ConfigError
    pub fn config(reason: impl Into<String>) -> Self {
        BillError::ConfigError {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        BillError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(path: impl Into<String>, locked_by: impl Into<String>, locked_at: impl Into<String>) -> Self {
        BillError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// Create a SerializationError from anything displayable
    pub fn serialization(reason: impl std::fmt::Display) -> Self {
        BillError::SerializationError {
            reason: reason.to_string(),
        }
    }

    /// Whether the user can fix this by correcting what they typed
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            BillError::InvalidInput { .. }
                | BillError::MissingField { .. }
                | BillError::Duplicate { .. }
                | BillError::AuthenticationFailed
        )
    }

    /// Check if this is a recoverable error (e.g., can retry)
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BillError::FileLocked { .. })
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            BillError::InvalidInput { .. } => "INVALID_INPUT",
            BillError::MissingField { .. } => "MISSING_FIELD",
            BillError::NotFound { .. } => "NOT_FOUND",
            BillError::Duplicate { .. } => "DUPLICATE",
            BillError::AuthenticationFailed => "AUTHENTICATION_FAILED",
            BillError::PermissionDenied { .. } => "PERMISSION_DENIED",
            BillError::ConfigError { .. } => "CONFIG_ERROR",
            BillError::FileError { .. } => "FILE_ERROR",
            BillError::FileLocked { .. } => "FILE_LOCKED",
            BillError::SerializationError { .. } => "SERIALIZATION_ERROR",
            BillError::VersionMismatch { .. } => "VERSION_MISMATCH",
            BillError::Internal { .. } => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = BillError::invalid_input("weight", "-1", "Weight must be positive");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"InvalidInput\""));
        let roundtrip: BillError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(BillError::missing_field("email").error_code(), "MISSING_FIELD");
        assert_eq!(BillError::not_found("User", "7").error_code(), "NOT_FOUND");
        assert_eq!(BillError::AuthenticationFailed.error_code(), "AUTHENTICATION_FAILED");
    }

    #[test]
    fn test_user_error_classification() {
        assert!(BillError::invalid_input("tax", "abc", "Not a number").is_user_error());
        assert!(!BillError::config("bad table").is_user_error());
        assert!(BillError::file_locked("a.bullion", "x", "now").is_recoverable());
    }

    #[test]
    fn test_display_message() {
        let error = BillError::duplicate("email", "a@b.com");
        assert_eq!(error.to_string(), "email 'a@b.com' is already taken");
    }
}
