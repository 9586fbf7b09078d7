use anyhow::{Context, Result, anyhow};
use tracing::info;
use tyck_validator::validate_json;

use crate::commands::load_schema;
use crate::output::{self, RecordOutcome};

pub fn execute(schema_path: &str, data_path: &str, strict: bool, format: &str) -> Result<()> {
    info!("Validating {} against {}", data_path, schema_path);
    info!("Strict mode: {}", strict);

    let (_, descriptor) = load_schema(schema_path, strict)?;

    let content = std::fs::read_to_string(data_path)
        .with_context(|| format!("Failed to read data file: {}", data_path))?;
    let data: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON data file: {}", data_path))?;

    let records = match data {
        serde_json::Value::Array(items) => items,
        object @ serde_json::Value::Object(_) => vec![object],
        other => {
            return Err(anyhow!(
                "Data file must contain a JSON object or an array of objects, got {}",
                json_kind(&other)
            ));
        }
    };

    let outcomes: Vec<RecordOutcome> = records
        .iter()
        .enumerate()
        .map(|(index, raw)| RecordOutcome {
            index,
            result: validate_json(&descriptor, raw),
        })
        .collect();

    output::print_validation_report(descriptor.name(), &outcomes, format)?;

    if outcomes.iter().any(|outcome| outcome.result.is_err()) {
        std::process::exit(1);
    }

    Ok(())
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
