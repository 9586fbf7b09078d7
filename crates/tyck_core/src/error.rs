//! Definition-time error types.
//!
//! These errors describe a schema that contradicts itself. They are raised
//! while a builder chain is assembled, before any input is seen, and are
//! never aggregated: the first offense is reported.

use thiserror::Error;

/// Result type for builder operations.
pub type Result<T> = std::result::Result<T, ConfigurationError>;

/// Error raised when a builder receives self-inconsistent constraints.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    /// A lower bound exceeds an upper bound
    #[error("Invalid bounds for {constraint}: {lower} exceeds {upper}")]
    InvalidBounds {
        /// Constraint family (e.g. "length", "value")
        constraint: String,
        /// Effective lower bound
        lower: String,
        /// Effective upper bound
        upper: String,
    },

    /// A regular expression failed to compile
    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        /// Source pattern
        pattern: String,
        /// Compiler message
        message: String,
    },

    /// A constraint parameter is outside its domain
    #[error("Invalid parameter for '{constraint}': {message}")]
    InvalidParameter {
        /// Constraint name
        constraint: String,
        /// Description of the problem
        message: String,
    },

    /// A choice-based kind was given no choices
    #[error("{kind} requires at least one choice")]
    EmptyChoices {
        /// Kind name (literal, enum, union)
        kind: String,
    },
}

impl ConfigurationError {
    /// Creates a new bounds error.
    pub fn bounds(
        constraint: impl Into<String>,
        lower: impl ToString,
        upper: impl ToString,
    ) -> Self {
        Self::InvalidBounds {
            constraint: constraint.into(),
            lower: lower.to_string(),
            upper: upper.to_string(),
        }
    }

    /// Creates a new parameter error.
    pub fn parameter(constraint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            constraint: constraint.into(),
            message: message.into(),
        }
    }
}
