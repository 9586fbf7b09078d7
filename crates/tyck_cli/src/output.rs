use anyhow::Result;
use colored::*;
use serde_json::json;
use tyck_validator::{ValidatedRecord, ValidationReport};

/// Validation result of one input record.
pub struct RecordOutcome {
    pub index: usize,
    pub result: std::result::Result<ValidatedRecord, ValidationReport>,
}

pub fn print_validation_report(schema: &str, outcomes: &[RecordOutcome], format: &str) -> Result<()> {
    match format {
        "json" => print_json_report(schema, outcomes),
        _ => {
            print_text_report(schema, outcomes);
            Ok(())
        }
    }
}

fn print_text_report(schema: &str, outcomes: &[RecordOutcome]) {
    let failed: Vec<(usize, &ValidationReport)> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().err().map(|report| (o.index, report)))
        .collect();
    let error_count: usize = failed.iter().map(|(_, report)| report.len()).sum();

    println!("\n{}", "═".repeat(60));
    println!("{}", format!("  VALIDATION REPORT: {}", schema).bold());
    println!("{}", "═".repeat(60));

    if failed.is_empty() {
        println!(
            "\n{} {}",
            "✓".green().bold(),
            "Validation PASSED".green().bold()
        );
    } else {
        println!(
            "\n{} {}",
            "✗".red().bold(),
            "Validation FAILED".red().bold()
        );
    }

    for (index, report) in &failed {
        println!("\n{}", format!("Record #{}:", index).red().bold());
        for (i, error) in report.iter().enumerate() {
            println!("  {}. {}", i + 1, error.to_string().red());
        }
    }

    println!("\n{}", "Summary:".bold());
    println!("  Records:        {}", outcomes.len());
    println!("  Valid:          {}", outcomes.len() - failed.len());
    println!("  Invalid:        {}", failed.len());
    println!("  Total errors:   {}", error_count);
    println!("{}", "═".repeat(60));
}

fn print_json_report(schema: &str, outcomes: &[RecordOutcome]) -> Result<()> {
    let mut errors = Vec::new();
    let mut invalid = 0;
    for outcome in outcomes {
        if let Err(report) = &outcome.result {
            invalid += 1;
            errors.extend(report.iter().map(|error| {
                json!({
                    "record": outcome.index,
                    "path": error.location(),
                    "kind": error.kind.to_string(),
                    "code": error.kind.code(),
                    "message": error.message,
                })
            }));
        }
    }

    let error_count = errors.len();
    let output = json!({
        "schema": schema,
        "passed": invalid == 0,
        "errors": errors,
        "summary": {
            "records": outcomes.len(),
            "valid": outcomes.len() - invalid,
            "invalid": invalid,
            "error_count": error_count,
        }
    });

    print_json(&output)
}

pub fn print_json(value: &serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message.green());
}
