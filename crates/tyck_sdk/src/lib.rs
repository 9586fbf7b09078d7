//! # Tyck SDK
//!
//! Public facade over the Tyck crates: builders and values from `tyck_core`,
//! compilation and validation from `tyck_validator`, and declarative schema
//! documents from `tyck_parser`.
//!
//! ## Example
//!
//! ```rust
//! use tyck_sdk::prelude::*;
//!
//! let user = compile(
//!     &fields! {
//!         "id" => integer().positive().unwrap(),
//!         "name" => string().min_length(1).unwrap().max_length(100).unwrap(),
//!     },
//!     &SchemaConfig::default(),
//! )
//! .unwrap();
//!
//! let raw = serde_json::json!({"id": "1", "name": "John"});
//! let record = validate_json(&user, &raw).unwrap();
//! assert_eq!(record.get("id"), Some(&Value::Int(1)));
//! ```

use std::path::Path;
use thiserror::Error;

pub use tyck_core::*;
pub use tyck_parser::{
    FieldDocument, ParsedRecord, ParsedSchema, ParserError, RecordDocument, SchemaDocument,
    SchemaFormat, detect_format, parse_file, parse_toml, parse_yaml,
};
pub use tyck_validator::*;

/// Errors raised while loading a schema document.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Parser(#[from] ParserError),

    #[error(transparent)]
    Schema(#[from] SchemaConfigurationError),
}

/// Parses and compiles a YAML or TOML schema file.
pub fn load_schema(path: impl AsRef<Path>) -> std::result::Result<RecordDescriptor, LoadError> {
    let schema = parse_file(path.as_ref())?;
    Ok(schema.compile()?)
}

/// Commonly used items.
pub mod prelude {
    pub use tyck_core::{
        AliasStrategy, ConfigurationError, ExtraPolicy, FieldMap, SchemaConfig, SpecBuilder,
        Value, any, array, boolean, bytes, date, datetime, decimal, dict, enumeration, fields,
        integer, literal, named_record, null, number, optional, record, reference, set, string,
        time, tuple, union, uuid,
    };
    pub use tyck_validator::{
        CallError, Compiler, ErrorKind, Interface, RecordDescriptor, SchemaConfigurationError,
        ValidatedCall, ValidatedField, ValidatedRecord, ValidationError, ValidationReport,
        compile, compile_named, compile_value, validate, validate_call,
        validate_call_with_return, validate_json, validate_value,
    };
}
