use anyhow::Result;
use serde_json::json;
use tracing::info;
use tyck_core::{ConstraintSpec, Kind, RecordId};
use tyck_validator::RecordDescriptor;

use crate::commands::load_schema;
use crate::output;

pub fn execute(schema_path: &str, format: &str) -> Result<()> {
    info!("Checking schema: {}", schema_path);

    let (schema, descriptor) = load_schema(schema_path, false)?;

    if format == "json" {
        let fields: Vec<_> = descriptor
            .fields()
            .iter()
            .map(|field| {
                json!({
                    "name": field.name(),
                    "type": describe(&descriptor, field.spec()),
                    "required": field.is_required(),
                    "alias": field.alias(),
                })
            })
            .collect();
        let summary = json!({
            "name": descriptor.name(),
            "description": schema.description,
            "records": descriptor.arena().len(),
            "fields": fields,
        });
        output::print_json(&summary)?;
        return Ok(());
    }

    output::print_success("Schema is valid");

    let config = descriptor.config();
    println!("\nSchema Summary:");
    println!("  Name:        {}", descriptor.name());
    println!(
        "  Description: {}",
        schema.description.as_deref().unwrap_or("N/A")
    );
    println!("  Fields:      {}", descriptor.fields().len());
    println!("  Records:     {}", descriptor.arena().len());
    println!("  Extra:       {:?}", config.extra);
    println!("  Strict:      {}", config.strict);

    if !descriptor.fields().is_empty() {
        println!("\nFields:");
        for field in descriptor.fields() {
            let mut line = format!(
                "  - {}: {}",
                field.name(),
                describe(&descriptor, field.spec())
            );
            if !field.is_required() {
                line.push_str(" (optional)");
            }
            if let Some(alias) = field.alias() {
                line.push_str(&format!(" [alias: {}]", alias));
            }
            println!("{}", line);
        }
    }

    Ok(())
}

/// Short type description such as `array<string>` or `Node`.
fn describe(descriptor: &RecordDescriptor, spec: &ConstraintSpec<RecordId>) -> String {
    let joined = |specs: &[ConstraintSpec<RecordId>], sep: &str| {
        specs
            .iter()
            .map(|s| describe(descriptor, s))
            .collect::<Vec<_>>()
            .join(sep)
    };
    match &spec.kind {
        Kind::Primitive(kind) => kind.name().to_string(),
        Kind::Array(item) => format!("array<{}>", describe(descriptor, item)),
        Kind::Set(item) => format!("set<{}>", describe(descriptor, item)),
        Kind::Dict { keys, values } => format!(
            "dict<{}, {}>",
            describe(descriptor, keys),
            describe(descriptor, values)
        ),
        Kind::Optional(inner) => format!("optional<{}>", describe(descriptor, inner)),
        Kind::Tuple(items) => format!("tuple<{}>", joined(items, ", ")),
        Kind::Union(branches) => format!("union<{}>", joined(branches, " | ")),
        Kind::Literal(values) | Kind::Enum(values) => format!(
            "{}<{}>",
            spec.kind.name(),
            values
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ),
        Kind::Record(id) => descriptor
            .record(*id)
            .map(|record| record.name().to_string())
            .unwrap_or_else(|| "object".to_string()),
    }
}
