//! Declarative schema documents for Tyck (YAML/TOML formats).
//!
//! Parses schema documents into the same field maps the builder API
//! produces, so both front-ends compile through one path.
//!
//! # Example
//!
//! ```rust
//! use tyck_parser::parse_yaml;
//!
//! let yaml = r#"
//! name: User
//! fields:
//!   - name: id
//!     type: integer
//!     positive: true
//!   - name: name
//!     type: string
//!     min_length: 1
//!     max_length: 100
//! "#;
//!
//! let schema = parse_yaml(yaml).expect("Failed to parse schema");
//! assert_eq!(schema.name, "User");
//! assert_eq!(schema.fields.names(), vec!["id", "name"]);
//!
//! let descriptor = schema.compile().unwrap();
//! assert_eq!(descriptor.field_names(), vec!["id", "name"]);
//! ```

mod document;

pub use document::{FieldDocument, ParsedRecord, ParsedSchema, RecordDocument, SchemaDocument};

use std::path::Path;
use thiserror::Error;
use tyck_core::ConfigurationError;

/// Errors that can occur during schema parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    #[error("Invalid YAML schema document: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    #[error("Invalid TOML schema document: {0}")]
    TomlError(String),

    #[error("Cannot read schema file: {0}")]
    IoError(#[from] std::io::Error),

    /// The extension is neither YAML nor TOML
    #[error("Unsupported file format: .{0}")]
    UnsupportedFormat(String),

    #[error("Schema file has no usable extension")]
    InvalidExtension,

    /// A field names a type that does not exist
    #[error("Unknown type '{kind}' for field '{field}'")]
    UnknownType { field: String, kind: String },

    /// A constraint key was given to a type it does not apply to
    #[error("Constraint '{constraint}' does not apply to type '{kind}' (field '{field}')")]
    UnsupportedConstraint {
        field: String,
        constraint: String,
        kind: String,
    },

    /// A required key is absent
    #[error("Field '{field}' is missing required key '{key}'")]
    MissingKey { field: String, key: &'static str },

    /// The same field name appears twice in one record
    #[error("Duplicate field '{field}' in record '{record}'")]
    DuplicateField { record: String, field: String },

    /// The builders rejected the field's constraints
    #[error("Invalid constraints for field '{field}': {source}")]
    Configuration {
        field: String,
        #[source]
        source: ConfigurationError,
    },
}

/// Shorthand for parser results.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported schema file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    /// `.yml` or `.yaml`
    Yaml,
    /// TOML format (.toml)
    Toml,
}

/// Parse a schema document from a YAML string.
pub fn parse_yaml(content: &str) -> Result<ParsedSchema> {
    let document: SchemaDocument = serde_yaml_ng::from_str(content)?;
    document.into_schema()
}

/// Parse a schema document from a TOML string.
///
/// # Example
///
/// ```rust
/// use tyck_parser::parse_toml;
///
/// let toml = r#"
/// name = "User"
///
/// [config]
/// extra = "forbid"
///
/// [[fields]]
/// name = "id"
/// type = "integer"
/// positive = true
/// "#;
///
/// let schema = parse_toml(toml).unwrap();
/// assert_eq!(schema.fields.len(), 1);
/// ```
pub fn parse_toml(content: &str) -> Result<ParsedSchema> {
    let document: SchemaDocument =
        toml::from_str(content).map_err(|err| ParserError::TomlError(err.to_string()))?;
    document.into_schema()
}

/// Picks the document format from the file extension, ignoring case.
///
/// Fails with `InvalidExtension` when the path has no UTF-8 extension and
/// with `UnsupportedFormat` for anything other than `yaml`, `yml` or `toml`.
pub fn detect_format(path: &Path) -> Result<SchemaFormat> {
    let Some(extension) = path.extension().and_then(|ext| ext.to_str()) else {
        return Err(ParserError::InvalidExtension);
    };

    match extension.to_ascii_lowercase().as_str() {
        "yaml" | "yml" => Ok(SchemaFormat::Yaml),
        "toml" => Ok(SchemaFormat::Toml),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a schema document from a file with automatic format detection.
///
/// ```no_run
/// use tyck_parser::parse_file;
/// use std::path::Path;
///
/// let schema = parse_file(Path::new("schemas/user.yml")).unwrap();
/// println!("Loaded schema: {}", schema.name);
/// ```
pub fn parse_file(path: &Path) -> Result<ParsedSchema> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;

    match format {
        SchemaFormat::Yaml => parse_yaml(&content),
        SchemaFormat::Toml => parse_toml(&content),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;
    use tyck_core::{ExtraPolicy, Value};
    use tyck_validator::{ErrorKind, validate_json};

    const USER_YAML: &str = r#"
name: User
description: Registered user
config:
  extra: forbid
fields:
  - name: id
    type: integer
    positive: true
  - name: name
    type: string
    min_length: 1
    max_length: 100
  - name: email
    type: string
    email: true
    optional: true
  - name: role
    type: enum
    choices: [admin, member]
    default: member
"#;

    #[test]
    fn test_parse_valid_yaml_minimal() {
        let schema = parse_yaml("name: Empty\n").expect("Failed to parse valid YAML");

        assert_eq!(schema.name, "Empty");
        assert_eq!(schema.description, None);
        assert!(schema.fields.is_empty());
        assert!(schema.definitions.is_empty());
    }

    #[test]
    fn test_parse_valid_yaml_with_fields() {
        let schema = parse_yaml(USER_YAML).expect("Failed to parse YAML with fields");

        assert_eq!(schema.name, "User");
        assert_eq!(schema.description, Some("Registered user".to_string()));
        assert_eq!(schema.config.extra, ExtraPolicy::Forbid);
        assert_eq!(schema.fields.names(), vec!["id", "name", "email", "role"]);
        assert_eq!(
            schema.fields.get("role").and_then(|s| s.default.clone()),
            Some(Value::from("member"))
        );
    }

    #[test]
    fn test_parsed_schema_validates() {
        let descriptor = parse_yaml(USER_YAML).unwrap().compile().unwrap();

        let record = validate_json(&descriptor, &json!({"id": 1, "name": "John"})).unwrap();
        assert_eq!(
            record.to_json(),
            json!({"id": 1, "name": "John", "email": null, "role": "member"})
        );

        let report = validate_json(&descriptor, &json!({"id": -1, "name": "", "x": 1})).unwrap_err();
        let kinds: Vec<ErrorKind> = report.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                ErrorKind::constraint("positive"),
                ErrorKind::constraint("min_length"),
                ErrorKind::UnknownField,
            ]
        );
    }

    #[test]
    fn test_document_defaults_are_coerced() {
        let yaml = r#"
name: Event
fields:
  - name: day
    type: date
    default: 2024-01-01
  - name: retries
    type: integer
    default: "3"
"#;
        let descriptor = parse_yaml(yaml).unwrap().compile().unwrap();
        let record = validate_json(&descriptor, &json!({})).unwrap();

        assert!(matches!(record.get("day"), Some(Value::Date(_))));
        assert_eq!(record.get("retries"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_parse_yaml_with_definitions() {
        let yaml = r#"
name: Tree
fields:
  - name: root
    ref: Node
definitions:
  - name: Node
    fields:
      - name: value
        type: integer
      - name: children
        type: array
        items:
          ref: Node
"#;
        let descriptor = parse_yaml(yaml).unwrap().compile().unwrap();
        let raw = json!({"root": {"value": 1, "children": [{"value": 2, "children": []}]}});
        assert!(validate_json(&descriptor, &raw).is_ok());
    }

    #[test]
    fn test_unresolved_reference_surfaces_at_compile() {
        let yaml = r#"
name: Broken
fields:
  - name: parent
    ref: Missing
"#;
        let schema = parse_yaml(yaml).unwrap();
        assert!(schema.compile().is_err());
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let invalid_yaml = r#"
name: test
fields:
  - name: id
    type: integer
  missing dash
"#;

        let result = parse_yaml(invalid_yaml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::YamlError(_)));
    }

    #[test]
    fn test_parse_yaml_unknown_key() {
        let yaml = r#"
name: test
fields:
  - name: id
    type: integer
    minimum: 3
"#;
        assert!(matches!(
            parse_yaml(yaml).unwrap_err(),
            ParserError::YamlError(_)
        ));
    }

    #[test]
    fn test_parse_yaml_missing_name() {
        let result = parse_yaml("fields: []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_valid_toml_with_fields() {
        let toml = r#"
name = "User"

[config]
strict = true

[[fields]]
name = "id"
type = "integer"
positive = true

[[fields]]
name = "tags"
type = "array"
max_items = 3

[fields.items]
type = "string"
"#;

        let schema = parse_toml(toml).expect("Failed to parse TOML with fields");

        assert_eq!(schema.name, "User");
        assert!(schema.config.strict);
        assert_eq!(schema.fields.names(), vec!["id", "tags"]);
        assert_eq!(schema.fields.get("tags").unwrap().kind.name(), "array");
    }

    #[test]
    fn test_parse_invalid_toml() {
        let invalid_toml = r#"
name = "test"
[[[invalid syntax
"#;

        let result = parse_toml(invalid_toml);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::TomlError(_)));
    }

    #[test]
    fn test_detect_format_yaml() {
        let path = Path::new("schema.yaml");
        assert_eq!(detect_format(path).unwrap(), SchemaFormat::Yaml);

        let path = Path::new("schema.yml");
        assert_eq!(detect_format(path).unwrap(), SchemaFormat::Yaml);
    }

    #[test]
    fn test_detect_format_toml() {
        let path = Path::new("schema.TOML");
        assert_eq!(detect_format(path).unwrap(), SchemaFormat::Toml);
    }

    #[test]
    fn test_detect_format_unsupported() {
        let path = Path::new("schema.json");
        let result = detect_format(path);
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            ParserError::UnsupportedFormat(_)
        ));
    }

    #[test]
    fn test_detect_format_no_extension() {
        let path = Path::new("schema");
        let result = detect_format(path);
        assert!(result.is_err());
        assert!(matches!(result.unwrap_err(), ParserError::InvalidExtension));
    }

    #[test]
    fn test_parse_file_yaml() {
        let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        file.write_all(USER_YAML.as_bytes()).unwrap();

        let schema = parse_file(file.path()).expect("Failed to parse schema file");
        assert_eq!(schema.name, "User");
        assert_eq!(schema.fields.len(), 4);
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.yaml"));
        assert!(matches!(result.unwrap_err(), ParserError::IoError(_)));
    }
}
