//! Error types for schema compilation and call validation.

use crate::ValidationReport;
use thiserror::Error;
use tyck_core::{ConfigurationError, Value};

/// Errors raised when a field map cannot be compiled into a descriptor.
///
/// Like builder errors these are definition-time failures: compilation
/// stops at the first one.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaConfigurationError {
    /// A builder chain was rejected while assembling the field map
    #[error(transparent)]
    Builder(#[from] ConfigurationError),

    /// A record reference names no definition
    #[error("Unresolved record reference '{name}' in field '{field}'")]
    UnresolvedReference { name: String, field: String },

    /// Two different records share one name
    #[error("Record '{0}' is defined more than once")]
    DuplicateDefinition(String),

    /// Two fields accept the same input key after alias resolution
    #[error("Fields '{first}' and '{second}' of record '{record}' both accept input key '{key}'")]
    AliasCollision {
        record: String,
        key: String,
        first: String,
        second: String,
    },

    /// A field name passed to a schema operation does not exist
    #[error("Record '{record}' has no field '{field}'")]
    UnknownField { record: String, field: String },

    /// A declared default does not satisfy its own field spec
    #[error("Default value of field '{field}' in record '{record}' is invalid: {message}")]
    InvalidDefault {
        record: String,
        field: String,
        message: String,
    },
}

impl SchemaConfigurationError {
    /// Creates a new unknown field error.
    pub fn unknown_field(record: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnknownField {
            record: record.into(),
            field: field.into(),
        }
    }

    /// Creates a new unresolved reference error.
    pub fn unresolved(name: impl Into<String>, field: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            name: name.into(),
            field: field.into(),
        }
    }
}

/// Errors raised by a validated call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CallError {
    /// Arguments failed validation; the callable was not invoked
    #[error("Invalid call arguments: {0}")]
    ArgumentValidation(ValidationReport),

    /// The callable ran but its return value failed validation
    #[error("Invalid return value {value}: {report}")]
    ReturnValidation {
        report: ValidationReport,
        /// The untrusted value the callable produced
        value: Value,
    },
}

impl CallError {
    /// Returns the report of either failure.
    pub fn report(&self) -> &ValidationReport {
        match self {
            CallError::ArgumentValidation(report) => report,
            CallError::ReturnValidation { report, .. } => report,
        }
    }
}

/// Errors raised when parsing input through a declared model type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// The model's schema failed to compile
    #[error(transparent)]
    Schema(#[from] SchemaConfigurationError),

    /// The input failed validation
    #[error(transparent)]
    Validation(#[from] ValidationReport),
}
