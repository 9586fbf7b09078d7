//! Validated output records.

use crate::descriptor::RecordDescriptor;
use std::fmt;
use tyck_core::{ConstraintSpec, Kind, RecordId, Value};

/// The trusted result of a successful validation.
///
/// Holds one coerced value per declared field, in declaration order, plus
/// undeclared keys kept under the `allow` extra policy. Two records are
/// equal when their field values and extras are equal.
#[derive(Clone)]
pub struct ValidatedRecord {
    descriptor: RecordDescriptor,
    fields: Vec<(String, Value)>,
    extras: Vec<(String, Value)>,
}

impl ValidatedRecord {
    pub(crate) fn new(
        descriptor: RecordDescriptor,
        fields: Vec<(String, Value)>,
        extras: Vec<(String, Value)>,
    ) -> Self {
        Self {
            descriptor,
            fields,
            extras,
        }
    }

    /// Descriptor the record was validated against.
    pub fn descriptor(&self) -> &RecordDescriptor {
        &self.descriptor
    }

    /// Returns the coerced value of a declared field or kept extra.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .chain(&self.extras)
            .find(|(k, _)| k == name)
            .map(|(_, v)| v)
    }

    /// Declared fields in declaration order.
    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// Undeclared keys kept under the `allow` policy.
    pub fn extras(&self) -> &[(String, Value)] {
        &self.extras
    }

    /// Serializes to a mapping keyed by field name.
    pub fn to_value(&self) -> Value {
        Value::Map(self.fields.iter().chain(&self.extras).cloned().collect())
    }

    /// Serializes to a mapping keyed by each field's alias, where one exists.
    ///
    /// Nested records are serialized by their own aliases.
    pub fn to_value_by_alias(&self) -> Value {
        by_alias(&self.descriptor, &self.to_value())
    }

    /// Serializes to JSON keyed by field name.
    pub fn to_json(&self) -> serde_json::Value {
        self.to_value().to_json()
    }

    /// Consumes the record and returns its mapping value.
    pub fn into_value(self) -> Value {
        let mut entries = self.fields;
        entries.extend(self.extras);
        Value::Map(entries)
    }
}

/// Renames record keys to their aliases, following nested record fields.
fn by_alias(descriptor: &RecordDescriptor, value: &Value) -> Value {
    let Some(entries) = value.as_map() else {
        return value.clone();
    };
    Value::Map(
        entries
            .iter()
            .map(|(key, value)| match descriptor.field(key) {
                Some(field) => (
                    field.output_key().to_string(),
                    nested_by_alias(descriptor, field.spec(), value),
                ),
                None => (key.clone(), value.clone()),
            })
            .collect(),
    )
}

fn nested_by_alias(
    descriptor: &RecordDescriptor,
    spec: &ConstraintSpec<RecordId>,
    value: &Value,
) -> Value {
    match (&spec.kind, value) {
        (Kind::Record(id), _) => match descriptor.record(*id) {
            Some(nested) => by_alias(&nested, value),
            None => value.clone(),
        },
        (Kind::Optional(inner), _) => nested_by_alias(descriptor, inner, value),
        (Kind::Array(item) | Kind::Set(item), Value::List(items)) => Value::List(
            items
                .iter()
                .map(|v| nested_by_alias(descriptor, item, v))
                .collect(),
        ),
        (Kind::Tuple(specs), Value::List(items)) => Value::List(
            specs
                .iter()
                .zip(items)
                .map(|(spec, v)| nested_by_alias(descriptor, spec, v))
                .collect(),
        ),
        (Kind::Dict { values, .. }, Value::Map(entries)) => Value::Map(
            entries
                .iter()
                .map(|(k, v)| (k.clone(), nested_by_alias(descriptor, values, v)))
                .collect(),
        ),
        _ => value.clone(),
    }
}

impl PartialEq for ValidatedRecord {
    fn eq(&self, other: &Self) -> bool {
        self.fields == other.fields && self.extras == other.extras
    }
}

impl fmt::Debug for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct(self.descriptor.name())
            .field("fields", &self.fields)
            .field("extras", &self.extras)
            .finish()
    }
}

impl fmt::Display for ValidatedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.descriptor.name())?;
        for (index, (key, value)) in self.fields.iter().chain(&self.extras).enumerate() {
            if index > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}={value}")?;
        }
        write!(f, ")")
    }
}

impl From<ValidatedRecord> for Value {
    fn from(record: ValidatedRecord) -> Self {
        record.into_value()
    }
}

#[cfg(test)]
mod tests {
    use crate::{compile, validate};
    use pretty_assertions::assert_eq;
    use tyck_core::{AliasStrategy, SchemaConfig, SpecBuilder, Value, fields, integer, record, string};

    #[test]
    fn test_round_trip_is_idempotent() {
        let descriptor = compile(
            &fields! {
                "id" => integer(),
                "name" => string().trim(),
            },
            &SchemaConfig::default(),
        )
        .unwrap();
        let first = validate(
            &descriptor,
            &Value::map([("id", Value::from("3")), ("name", Value::from(" x "))]),
        )
        .unwrap();
        let second = validate(&descriptor, &first.to_value()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_to_value_by_alias() {
        let descriptor = compile(
            &fields! {
                "user_name" => string(),
                "home_address" => record(fields! { "zip_code" => string() }),
                "id" => integer().alias("ID"),
            },
            &SchemaConfig::default().with_alias_strategy(AliasStrategy::CamelCase),
        )
        .unwrap();
        let record = validate(
            &descriptor,
            &Value::map([
                ("userName", Value::from("a")),
                (
                    "homeAddress",
                    Value::map([("zipCode", Value::from("123"))]),
                ),
                ("ID", Value::from(1)),
            ]),
        )
        .unwrap();

        assert_eq!(
            record.to_value_by_alias().to_json(),
            serde_json::json!({"userName": "a", "homeAddress": {"zipCode": "123"}, "ID": 1})
        );
        assert_eq!(
            record.to_json(),
            serde_json::json!({"user_name": "a", "home_address": {"zip_code": "123"}, "id": 1})
        );
    }

    #[test]
    fn test_display() {
        let descriptor = compile(
            &fields! { "id" => integer(), "name" => string() },
            &SchemaConfig::default().with_title("User"),
        )
        .unwrap();
        let record = validate(
            &descriptor,
            &Value::map([("id", Value::from(1)), ("name", Value::from("a"))]),
        )
        .unwrap();
        assert_eq!(record.to_string(), "User(id=1, name='a')");
    }
}
