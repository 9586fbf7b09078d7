//! Predicate checks.
//!
//! Predicates run after coercion and transforms, against the coerced value:
//! - Length: `min_length`, `max_length` (characters, bytes or entries)
//! - Text: `pattern`, `email`, `url`, `starts_with`, `ends_with`, `contains`
//! - Numeric: `ge`, `le`, `gt`, `lt`, sign checks, `multiple_of`
//! - Collections: `min_items`, `max_items`, `unique_items`
//! - Decimals: `max_digits`, `decimal_places`
//! - Temporal: `after`, `before`
//! - Custom: user predicates

use crate::coerce::decimal_shape;
use std::cmp::Ordering;
use tyck_core::{Predicate, Transform, Value};
use validator::{ValidateEmail, ValidateUrl};

/// Checks one predicate against a coerced value.
///
/// Returns a message describing the violation.
pub(crate) fn check(predicate: &Predicate, value: &Value) -> Result<(), String> {
    match predicate {
        Predicate::MinLength(n) => {
            let len = length(predicate, value)?;
            ensure(len >= *n, || {
                format!("should have at least {n} {}, got {len}", unit(value, *n))
            })
        }
        Predicate::MaxLength(n) => {
            let len = length(predicate, value)?;
            ensure(len <= *n, || {
                format!("should have at most {n} {}, got {len}", unit(value, *n))
            })
        }
        Predicate::MinItems(n) => {
            let len = length(predicate, value)?;
            ensure(len >= *n, || format!("should have at least {n} items, got {len}"))
        }
        Predicate::MaxItems(n) => {
            let len = length(predicate, value)?;
            ensure(len <= *n, || format!("should have at most {n} items, got {len}"))
        }
        Predicate::Pattern(pattern) => {
            let text = text(predicate, value)?;
            ensure(pattern.is_match(text), || {
                format!("should match pattern '{}'", pattern.as_str())
            })
        }
        Predicate::Email => {
            let text = text(predicate, value)?;
            ensure(text.to_string().validate_email(), || {
                "should be a valid email address".to_string()
            })
        }
        Predicate::Url => {
            let text = text(predicate, value)?;
            ensure(text.to_string().validate_url(), || "should be a valid URL".to_string())
        }
        Predicate::StartsWith(prefix) => {
            let text = text(predicate, value)?;
            ensure(text.starts_with(prefix.as_str()), || {
                format!("should start with '{prefix}'")
            })
        }
        Predicate::EndsWith(suffix) => {
            let text = text(predicate, value)?;
            ensure(text.ends_with(suffix.as_str()), || {
                format!("should end with '{suffix}'")
            })
        }
        Predicate::Contains(needle) => {
            let text = text(predicate, value)?;
            ensure(text.contains(needle.as_str()), || {
                format!("should contain '{needle}'")
            })
        }
        Predicate::Ge(bound) => compare(predicate, value, *bound, |o| o.is_ge(), "greater than or equal to"),
        Predicate::Le(bound) => compare(predicate, value, *bound, |o| o.is_le(), "less than or equal to"),
        Predicate::Gt(bound) => compare(predicate, value, *bound, |o| o.is_gt(), "greater than"),
        Predicate::Lt(bound) => compare(predicate, value, *bound, |o| o.is_lt(), "less than"),
        Predicate::Positive => compare(predicate, value, 0.0, |o| o.is_gt(), "greater than"),
        Predicate::Negative => compare(predicate, value, 0.0, |o| o.is_lt(), "less than"),
        Predicate::NonNegative => {
            compare(predicate, value, 0.0, |o| o.is_ge(), "greater than or equal to")
        }
        Predicate::NonPositive => {
            compare(predicate, value, 0.0, |o| o.is_le(), "less than or equal to")
        }
        Predicate::MultipleOf(step) => {
            let ok = match value {
                Value::Int(i) if step.fract() == 0.0 => {
                    let step = *step as i64;
                    step != 0 && i % step == 0
                }
                other => {
                    let x = number(predicate, other)?;
                    let quotient = x / step;
                    (quotient - quotient.round()).abs() < 1e-9
                }
            };
            ensure(ok, || format!("should be a multiple of {step}"))
        }
        Predicate::UniqueItems => {
            let items = value
                .as_list()
                .ok_or_else(|| not_applicable(predicate, value))?;
            let duplicate = items
                .iter()
                .enumerate()
                .any(|(i, item)| items[..i].contains(item));
            ensure(!duplicate, || "should contain unique items".to_string())
        }
        Predicate::MaxDigits(max) => {
            let (digits, _) = decimal(predicate, value)?;
            ensure(digits <= *max, || {
                format!("should have no more than {max} digits in total, got {digits}")
            })
        }
        Predicate::DecimalPlaces(max) => {
            let (_, places) = decimal(predicate, value)?;
            ensure(places <= *max, || {
                format!("should have no more than {max} decimal places, got {places}")
            })
        }
        Predicate::After(bound) => temporal(predicate, value, bound, Ordering::Greater, "after"),
        Predicate::Before(bound) => temporal(predicate, value, bound, Ordering::Less, "before"),
        Predicate::Custom(custom) => custom.check(value),
    }
}

/// Applies a transform. Non-text values pass through unchanged.
pub(crate) fn apply(transform: Transform, value: Value) -> Value {
    match value {
        Value::String(s) => Value::String(match transform {
            Transform::Trim => s.trim().to_string(),
            Transform::Lowercase => s.to_lowercase(),
            Transform::Uppercase => s.to_uppercase(),
        }),
        other => other,
    }
}

fn ensure(ok: bool, message: impl FnOnce() -> String) -> Result<(), String> {
    if ok { Ok(()) } else { Err(message()) }
}

fn not_applicable(predicate: &Predicate, value: &Value) -> String {
    format!(
        "{} constraint not applicable to type {}",
        predicate.name(),
        value.type_name()
    )
}

fn length(predicate: &Predicate, value: &Value) -> Result<usize, String> {
    value.len().ok_or_else(|| not_applicable(predicate, value))
}

fn unit(value: &Value, n: usize) -> &'static str {
    match (value, n == 1) {
        (Value::String(_), true) => "character",
        (Value::String(_), false) => "characters",
        (Value::Bytes(_), true) => "byte",
        (Value::Bytes(_), false) => "bytes",
        (_, true) => "item",
        (_, false) => "items",
    }
}

fn text<'a>(predicate: &Predicate, value: &'a Value) -> Result<&'a str, String> {
    value.as_str().ok_or_else(|| not_applicable(predicate, value))
}

fn number(predicate: &Predicate, value: &Value) -> Result<f64, String> {
    value.as_float().ok_or_else(|| not_applicable(predicate, value))
}

fn compare(
    predicate: &Predicate,
    value: &Value,
    bound: f64,
    accept: impl Fn(Ordering) -> bool,
    relation: &str,
) -> Result<(), String> {
    let ordering = value
        .compare(&Value::Float(bound))
        .ok_or_else(|| not_applicable(predicate, value))?;
    ensure(accept(ordering), || format!("should be {relation} {bound}"))
}

fn decimal(predicate: &Predicate, value: &Value) -> Result<(u32, u32), String> {
    match value {
        Value::Decimal(text) => Ok(decimal_shape(text)),
        Value::Int(i) => Ok(decimal_shape(&i.to_string())),
        other => Err(not_applicable(predicate, other)),
    }
}

fn temporal(
    predicate: &Predicate,
    value: &Value,
    bound: &Value,
    expected: Ordering,
    relation: &str,
) -> Result<(), String> {
    let ordering = value
        .compare(bound)
        .ok_or_else(|| not_applicable(predicate, value))?;
    ensure(ordering == expected, || format!("should be {relation} {bound}"))
}
