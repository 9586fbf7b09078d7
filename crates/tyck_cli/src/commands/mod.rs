pub mod check;
pub mod validate;

use anyhow::{Context, Result};
use std::path::Path;
use tyck_parser::{ParsedSchema, parse_file};
use tyck_validator::RecordDescriptor;

/// Parses and compiles a schema file.
pub fn load_schema(schema_path: &str, strict: bool) -> Result<(ParsedSchema, RecordDescriptor)> {
    let mut schema = parse_file(Path::new(schema_path))
        .with_context(|| format!("Failed to parse schema file: {}", schema_path))?;

    if strict {
        schema.config.strict = true;
        for definition in &mut schema.definitions {
            if let Some(config) = &mut definition.config {
                config.strict = true;
            }
        }
    }

    let descriptor = schema
        .compile()
        .with_context(|| format!("Failed to compile schema: {}", schema.name))?;
    Ok((schema, descriptor))
}
