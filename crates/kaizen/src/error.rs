//! Error types for kaizen.
//!
//! This module defines all error types used throughout the kaizen crate.
//! The record-level variants (`Validation`, `InvalidField`, `NotFound`,
//! `Corruption`) are recoverable and are turned into user notices at the
//! CLI boundary; the rest are infrastructure failures.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for kaizen operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Record Errors ===
    /// Required fields were empty or absent.
    #[error("missing required fields: {}", missing_fields.join(", "))]
    Validation {
        /// Names of the fields that must be supplied.
        missing_fields: Vec<&'static str>,
    },

    /// A field was supplied but breaks a record invariant.
    #[error("invalid value for {field}: {message}")]
    InvalidField {
        /// Name of the offending field.
        field: &'static str,
        /// Description of the violated constraint.
        message: String,
    },

    /// No record with the given id exists in the collection.
    #[error("{kind} '{id}' not found")]
    NotFound {
        /// Record kind, e.g. "initiative".
        kind: &'static str,
        /// The id that was looked up.
        id: String,
    },

    /// A stored slot could not be decoded into the expected shape.
    #[error("stored collection '{key}' is corrupted: {message}")]
    Corruption {
        /// Slot key that failed to load.
        key: String,
        /// What was wrong with the stored data.
        message: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the database.
    #[error("failed to open database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Serialization Errors ===
    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for kaizen operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create a validation error for the given missing fields.
    #[must_use]
    pub fn missing(missing_fields: Vec<&'static str>) -> Self {
        Self::Validation { missing_fields }
    }

    /// Create an invalid field error.
    #[must_use]
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    /// Create a not found error.
    #[must_use]
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Create a corruption error for a slot.
    #[must_use]
    pub fn corruption(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Corruption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Check if this error rejects user input (missing or invalid fields).
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidField { .. })
    }

    /// Check if this error reports an unknown record id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error reports unreadable stored data.
    #[must_use]
    pub fn is_corruption(&self) -> bool {
        matches!(self, Self::Corruption { .. })
    }
}
