//! Tests to verify consistent handling of null and absent values.
//!
//! - Null in a non-nullable field is a type mismatch mentioning null
//! - Nullable fields accept null without running their predicates
//! - Absent optional fields read as null, absent defaulted fields as the default
//! - Absent required fields are reported as missing, never as type errors

use pretty_assertions::assert_eq;
use serde_json::json;
use tyck_core::{
    SchemaConfig, SpecBuilder, Value, array, fields, integer, optional, string, union,
};
use tyck_validator::{ErrorKind, compile, validate_json};

#[test]
fn test_null_in_non_nullable_field_fails() {
    let descriptor = compile(&fields! { "id" => string() }, &SchemaConfig::default()).unwrap();

    let report = validate_json(&descriptor, &json!({"id": null})).unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.errors()[0].kind, ErrorKind::TypeMismatch);
    assert!(
        report.errors()[0].message.contains("null"),
        "Error should mention null: {}",
        report.errors()[0]
    );
}

#[test]
fn test_null_in_nullable_field_skips_predicates() {
    // min_length would reject any string shorter than 3; null never reaches it
    let descriptor = compile(
        &fields! { "code" => string().min_length(3).unwrap().nullable() },
        &SchemaConfig::default(),
    )
    .unwrap();

    let record = validate_json(&descriptor, &json!({"code": null})).unwrap();
    assert_eq!(record.get("code"), Some(&Value::Null));

    // Nullable does not make the field optional
    let report = validate_json(&descriptor, &json!({})).unwrap_err();
    assert_eq!(report.errors()[0].kind, ErrorKind::MissingField);
}

#[test]
fn test_absent_optional_and_default_fields() {
    let descriptor = compile(
        &fields! {
            "nickname" => string().optional(),
            "wrapped" => optional(integer()),
            "role" => string().default_value("member"),
        },
        &SchemaConfig::default(),
    )
    .unwrap();

    let record = validate_json(&descriptor, &json!({})).unwrap();
    assert_eq!(
        record.to_json(),
        json!({"nickname": null, "wrapped": null, "role": "member"})
    );
}

#[test]
fn test_explicit_null_does_not_fall_back_to_default() {
    let descriptor = compile(
        &fields! { "role" => string().default_value("member") },
        &SchemaConfig::default(),
    )
    .unwrap();

    let report = validate_json(&descriptor, &json!({"role": null})).unwrap_err();
    assert_eq!(report.errors()[0].kind, ErrorKind::TypeMismatch);
}

#[test]
fn test_null_items_in_collections() {
    let descriptor = compile(
        &fields! {
            "strict_items" => array(integer()),
            "loose_items" => array(integer().nullable()),
        },
        &SchemaConfig::default(),
    )
    .unwrap();

    let report = validate_json(
        &descriptor,
        &json!({"strict_items": [1, null], "loose_items": [1, null]}),
    )
    .unwrap_err();

    assert_eq!(report.len(), 1);
    assert_eq!(report.errors()[0].location(), "strict_items[1]");
}

#[test]
fn test_union_with_null_branch() {
    let descriptor = compile(
        &fields! {
            "value" => union([integer().build(), tyck_core::null().build()]).unwrap(),
        },
        &SchemaConfig::default(),
    )
    .unwrap();

    assert!(validate_json(&descriptor, &json!({"value": null})).is_ok());
    assert!(validate_json(&descriptor, &json!({"value": 3})).is_ok());
    let report = validate_json(&descriptor, &json!({"value": "x"})).unwrap_err();
    assert_eq!(report.errors()[0].kind, ErrorKind::NoMatchingVariant);
}
