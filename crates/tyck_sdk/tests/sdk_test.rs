//! End-to-end usage through the public facade.
//!
//! Exercises both front-ends (builder chains and schema documents), the
//! model trait, schema algebra and call validation the way an application
//! would combine them.

use pretty_assertions::assert_eq;
use serde_json::json;
use std::io::Write;
use tyck_sdk::prelude::*;
use tyck_sdk::{LoadError, load_schema, make_all_optional, merge, select_subset};

struct Account;

impl Interface for Account {
    fn fields() -> Result<FieldMap, ConfigurationError> {
        Ok(fields! {
            "account_id" => uuid(),
            "owner" => string().trim().min_length(1)?,
            "balance" => decimal().max_digits(12)?.decimal_places(2)?,
            "opened" => date(),
            "status" => enumeration(["open", "frozen", "closed"])?.default_value("open"),
        })
    }

    fn config() -> SchemaConfig {
        SchemaConfig::default()
            .with_extra(ExtraPolicy::Forbid)
            .with_alias_strategy(AliasStrategy::CamelCase)
    }
}

#[test]
fn test_builder_and_document_front_ends_agree() {
    let built = compile_named(
        "User",
        &fields! {
            "id" => integer().positive().unwrap(),
            "name" => string().min_length(1).unwrap().max_length(100).unwrap(),
        },
        &SchemaConfig::default(),
    )
    .unwrap();

    let parsed = tyck_sdk::parse_yaml(
        r#"
name: User
fields:
  - name: id
    type: integer
    positive: true
  - name: name
    type: string
    min_length: 1
    max_length: 100
"#,
    )
    .unwrap()
    .compile()
    .unwrap();

    assert_eq!(built, parsed);
    for raw in [
        json!({"id": 1, "name": "John"}),
        json!({"id": -1, "name": ""}),
        json!({"name": "x"}),
    ] {
        assert_eq!(validate_json(&built, &raw), validate_json(&parsed, &raw));
    }
}

#[test]
fn test_interface_model() {
    let account = Account::parse_json(&json!({
        "accountId": "67e55044-10b1-426f-9247-bb680e5fe0c8",
        "owner": "  Ada  ",
        "balance": "1050.50",
        "opened": "2024-01-31",
    }))
    .unwrap();

    assert_eq!(account.get("owner"), Some(&Value::from("Ada")));
    assert_eq!(account.get("status"), Some(&Value::from("open")));
    assert_eq!(
        account.to_value_by_alias().to_json()["accountId"],
        json!("67e55044-10b1-426f-9247-bb680e5fe0c8")
    );

    match Account::parse_json(&json!({
        "accountId": "not-a-uuid",
        "owner": "   ",
        "balance": "1.005",
        "opened": "2024-02-30",
        "status": "gone",
        "nickname": "x",
    })) {
        Err(tyck_sdk::ModelError::Validation(report)) => {
            let paths: Vec<String> = report.iter().map(|e| e.location()).collect();
            assert_eq!(
                paths,
                vec!["account_id", "owner", "balance", "opened", "status", "nickname"]
            );
        }
        other => panic!("Expected validation errors, got {:?}", other),
    }
}

#[test]
fn test_algebra_then_call() {
    let user = compile(
        &fields! {
            "id" => integer().positive().unwrap(),
            "name" => string(),
            "email" => string().email(),
        },
        &SchemaConfig::default().with_title("User"),
    )
    .unwrap();

    let lookup = select_subset(&user, &["id"]).unwrap();
    let extra = compile(&fields! { "limit" => integer().default_value(10) }, &SchemaConfig::default())
        .unwrap();
    let params = merge(&lookup, &extra).unwrap();
    assert_eq!(params.field_names(), vec!["id", "limit"]);

    let returns = compile_value(array(integer()).max_items(3).unwrap(), &SchemaConfig::default())
        .unwrap();
    let call = validate_call_with_return(
        |args: &ValidatedRecord| {
            let limit = args.get("limit").and_then(Value::as_int).unwrap_or_default();
            Value::list((0..limit).map(Value::Int))
        },
        params,
        returns,
    );

    assert_eq!(
        call.call_with([("id", Value::from(1)), ("limit", Value::from("2"))])
            .unwrap(),
        Value::list([Value::Int(0), Value::Int(1)])
    );
    assert!(matches!(
        call.call_with([("id", Value::from(0))]),
        Err(CallError::ArgumentValidation(_))
    ));
    assert!(matches!(
        call.call_with([("id", Value::from(1)), ("limit", Value::from(5))]),
        Err(CallError::ReturnValidation { .. })
    ));

    let patch = make_all_optional(&user);
    assert!(validate_json(&patch, &json!({})).is_ok());
}

#[test]
fn test_load_schema_from_file() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(
        b"name: Point\nfields:\n  - name: x\n    type: number\n  - name: y\n    type: number\n",
    )
    .unwrap();

    let point = load_schema(file.path()).unwrap();
    let record = validate_json(&point, &json!({"x": 1, "y": 2.5})).unwrap();
    assert_eq!(record.to_json(), json!({"x": 1.0, "y": 2.5}));
}

#[test]
fn test_load_schema_errors() {
    assert!(matches!(
        load_schema("missing.yaml"),
        Err(LoadError::Parser(_))
    ));

    let mut file = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
    file.write_all(b"name: Orphan\nfields:\n  - name: p\n    ref: Nowhere\n")
        .unwrap();
    assert!(matches!(load_schema(file.path()), Err(LoadError::Schema(_))));
}
