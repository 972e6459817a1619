//! Custom error types for memberfile
//!
//! This module defines the error hierarchy for the application using thiserror
//! for ergonomic error definitions.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Per-field validation messages, keyed by field name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a field
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of fields with at least one error
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Check whether a field has an error
    pub fn has_error(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// Messages recorded for a field
    pub fn get(&self, field: &str) -> &[String] {
        self.errors.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterate over fields and their messages in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Turn a non-empty error set into an `Err`
    pub fn into_result(self) -> MemberfileResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(MemberfileError::FieldValidation(self))
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .errors
            .iter()
            .map(|(field, messages)| format!("{}: {}", field, messages.join("; ")))
            .collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// The main error type for memberfile operations
#[derive(Error, Debug)]
pub enum MemberfileError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Validation errors that are not tied to a single field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Validation errors reported per field
    #[error("Invalid fields: {0}")]
    FieldValidation(FieldErrors),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Duplicate entity errors
    #[error("{entity_type} already exists: {identifier}")]
    Duplicate {
        entity_type: &'static str,
        identifier: String,
    },

    /// The acting user is not allowed to perform the operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Login failed; carries a stable error code
    #[error("Authentication failed: {0}")]
    Authentication(&'static str),

    /// Malformed request parameters (calendar feed)
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Export errors
    #[error("Export error: {0}")]
    Export(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl MemberfileError {
    /// Create a "not found" error for members
    pub fn member_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Member",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for member logs
    pub fn log_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "MemberLog",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for users
    pub fn user_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "User",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for activities
    pub fn activity_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Activity",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::FieldValidation(_))
    }

    /// Check if this is a permission error
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::Forbidden(_))
    }

    /// HTTP-style status code of the admin boundary for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) | Self::FieldValidation(_) | Self::BadRequest(_) => 400,
            Self::Authentication(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound { .. } => 404,
            Self::Duplicate { .. } => 409,
            Self::Config(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::Export(_)
            | Self::Storage(_) => 500,
        }
    }
}

// Implement From traits for common error types

impl From<std::io::Error> for MemberfileError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MemberfileError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for memberfile operations
pub type MemberfileResult<T> = Result<T, MemberfileError>;
