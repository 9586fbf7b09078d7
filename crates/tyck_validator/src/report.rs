//! Validation-time error reporting.
//!
//! The engine never raises on bad input. It returns a [`ValidationReport`]:
//! a non-empty, ordered list of [`ValidationError`]s, one per independent
//! failure, each qualified with the path of the offending value.

use std::fmt;
use thiserror::Error;
use tyck_core::Value;

/// One segment of a value path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    /// Record field or mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

impl From<&str> for PathSegment {
    fn from(key: &str) -> Self {
        PathSegment::Key(key.to_string())
    }
}

impl From<String> for PathSegment {
    fn from(key: String) -> Self {
        PathSegment::Key(key)
    }
}

impl From<usize> for PathSegment {
    fn from(index: usize) -> Self {
        PathSegment::Index(index)
    }
}

/// Renders a path as `a.b[0].c`, or `(root)` when empty.
pub fn format_path(path: &[PathSegment]) -> String {
    if path.is_empty() {
        return "(root)".to_string();
    }
    let mut out = String::new();
    for segment in path {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(index) => out.push_str(&format!("[{index}]")),
        }
    }
    out
}

/// Classification of a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A required field is absent
    MissingField,
    /// The value has the wrong type or could not be coerced
    TypeMismatch,
    /// A declared predicate rejected the value
    ConstraintViolation {
        /// Predicate name (e.g. "min_length", "positive")
        constraint: String,
    },
    /// An undeclared key under the `forbid` policy
    UnknownField,
    /// A tuple or argument list has the wrong length
    ArityMismatch,
    /// No union branch, literal or enum member matched
    NoMatchingVariant,
    /// Nesting exceeded the configured depth bound
    RecursionLimitExceeded,
}

impl ErrorKind {
    /// Creates a constraint violation kind.
    pub fn constraint(name: impl Into<String>) -> Self {
        ErrorKind::ConstraintViolation {
            constraint: name.into(),
        }
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &str {
        match self {
            ErrorKind::MissingField => "missing_field",
            ErrorKind::TypeMismatch => "type_mismatch",
            ErrorKind::ConstraintViolation { constraint } => constraint,
            ErrorKind::UnknownField => "unknown_field",
            ErrorKind::ArityMismatch => "arity_mismatch",
            ErrorKind::NoMatchingVariant => "no_matching_variant",
            ErrorKind::RecursionLimitExceeded => "recursion_limit_exceeded",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::ConstraintViolation { constraint } => {
                write!(f, "constraint_violation({constraint})")
            }
            other => write!(f, "{}", other.code()),
        }
    }
}

/// A single, path-qualified validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{}: {message} [{kind}]", format_path(.path))]
pub struct ValidationError {
    /// Location of the offending value
    pub path: Vec<PathSegment>,
    /// Failure classification
    pub kind: ErrorKind,
    /// Human-readable description
    pub message: String,
    /// The rejected input, when one exists (absent for missing fields)
    pub input: Option<Value>,
}

impl ValidationError {
    /// Creates a new validation error.
    pub fn new(
        path: Vec<PathSegment>,
        kind: ErrorKind,
        message: impl Into<String>,
        input: Option<Value>,
    ) -> Self {
        Self {
            path,
            kind,
            message: message.into(),
            input,
        }
    }

    /// Path rendered as `a.b[0]`.
    pub fn location(&self) -> String {
        format_path(&self.path)
    }
}

/// Every failure found by one validation call, in report order.
///
/// Errors are ordered by field declaration order, then by predicate order
/// within a field. A report is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    title: String,
    errors: Vec<ValidationError>,
}

impl ValidationReport {
    /// Creates a report. Returns `None` when `errors` is empty.
    pub fn from_errors(title: impl Into<String>, errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self {
                title: title.into(),
                errors,
            })
        }
    }

    /// Creates a report holding one error.
    pub fn single(title: impl Into<String>, error: ValidationError) -> Self {
        Self {
            title: title.into(),
            errors: vec![error],
        }
    }

    /// Name of the record or value that failed.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns all errors.
    pub fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Consumes the report and returns its errors.
    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
    }

    /// Returns the number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Iterates over errors.
    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// Errors whose path starts with `prefix`.
    pub fn errors_at<'a>(
        &'a self,
        prefix: &'a [PathSegment],
    ) -> impl Iterator<Item = &'a ValidationError> + 'a {
        self.errors.iter().filter(move |e| e.path.starts_with(prefix))
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.errors.len() == 1 {
            "error"
        } else {
            "errors"
        };
        write!(
            f,
            "{} validation {} for {}",
            self.errors.len(),
            noun,
            self.title
        )?;
        for error in &self.errors {
            write!(f, "\n  {error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationReport {}

impl<'a> IntoIterator for &'a ValidationReport {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl IntoIterator for ValidationReport {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_path() {
        assert_eq!(format_path(&[]), "(root)");
        assert_eq!(
            format_path(&["children".into(), 0.into(), "value".into()]),
            "children[0].value"
        );
    }

    #[test]
    fn test_error_display() {
        let error = ValidationError::new(
            vec!["name".into()],
            ErrorKind::constraint("min_length"),
            "should have at least 1 character",
            Some(Value::from("")),
        );
        assert_eq!(
            error.to_string(),
            "name: should have at least 1 character [constraint_violation(min_length)]"
        );
    }

    #[test]
    fn test_report_never_empty() {
        assert!(ValidationReport::from_errors("User", Vec::new()).is_none());

        let report = ValidationReport::from_errors(
            "User",
            vec![ValidationError::new(
                vec!["id".into()],
                ErrorKind::MissingField,
                "field required",
                None,
            )],
        )
        .unwrap();
        assert_eq!(report.len(), 1);
        assert!(report.to_string().starts_with("1 validation error for User"));
    }
}
