//! Schema document model and its conversion into field maps.
//!
//! A document describes a root record and, optionally, further named records
//! that fields can point at with `ref`. Each field entry names its `type` and
//! lists constraint keys next to it:
//!
//! ```yaml
//! name: User
//! config:
//!   extra: forbid
//! fields:
//!   - name: id
//!     type: integer
//!     positive: true
//!   - name: tags
//!     type: array
//!     items:
//!       type: string
//!       max_length: 20
//!   - name: manager
//!     type: ref
//!     ref: User
//!     optional: true
//! ```
//!
//! Constraint keys are checked against the field's type: `min_length` on an
//! integer is rejected rather than silently ignored.

use crate::{ParserError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;
use tracing::debug;
use tyck_core::{
    CollectionBuilder, ConfigurationError, ConstraintSpec, DictBuilder, FieldMap, IntegerBuilder,
    NumberBuilder, PrimitiveKind, SchemaConfig, SpecBuilder, TemporalBuilder, TypeBuilder, Value,
    array, boolean, bytes, date, datetime, decimal, dict, enumeration, integer, literal, null,
    number, record, reference, set, string, time, tuple, union, uuid,
};
use tyck_validator::{Compiler, RecordDescriptor, SchemaConfigurationError};

/// Root of a schema document.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Root record name
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Configuration of the root record (and of definitions without their own)
    #[serde(default)]
    pub config: SchemaConfig,

    /// Root fields in declaration order
    #[serde(default)]
    pub fields: Vec<FieldDocument>,

    /// Further named records
    #[serde(default)]
    pub definitions: Vec<RecordDocument>,
}

/// A named record inside `definitions`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RecordDocument {
    pub name: String,

    #[serde(default)]
    pub config: Option<SchemaConfig>,

    #[serde(default)]
    pub fields: Vec<FieldDocument>,
}

/// A field entry, or a nested type (`items`, `values`, `variants`, ...).
///
/// Nested types carry no `name`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldDocument {
    pub name: Option<String>,

    /// Type name; may be left out when `ref` or `fields` makes it obvious
    #[serde(rename = "type")]
    pub kind: Option<String>,

    // Modifiers
    pub optional: bool,
    pub nullable: bool,
    pub default: Option<serde_json::Value>,
    pub alias: Option<String>,
    pub strict: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<serde_json::Value>,

    // Text and binary
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub length: Option<usize>,
    pub non_empty: bool,
    pub pattern: Option<String>,
    pub email: bool,
    pub url: bool,
    pub starts_with: Option<String>,
    pub ends_with: Option<String>,
    pub contains: Option<String>,
    pub trim: bool,
    pub lowercase: bool,
    pub uppercase: bool,

    // Numbers
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub gt: Option<f64>,
    pub lt: Option<f64>,
    pub positive: bool,
    pub negative: bool,
    pub non_negative: bool,
    pub non_positive: bool,
    pub multiple_of: Option<f64>,
    pub max_digits: Option<u32>,
    pub decimal_places: Option<u32>,

    // Temporal
    pub after: Option<String>,
    pub before: Option<String>,

    // Collections
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
    pub items: Option<Box<FieldDocument>>,
    pub keys: Option<Box<FieldDocument>>,
    pub values: Option<Box<FieldDocument>>,
    pub elements: Vec<FieldDocument>,

    // Choices
    pub variants: Vec<FieldDocument>,
    pub choices: Vec<serde_json::Value>,

    // Records
    pub fields: Vec<FieldDocument>,
    #[serde(rename = "ref")]
    pub reference: Option<String>,
}

/// A document converted into builder output, ready to compile.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedSchema {
    pub name: String,
    pub description: Option<String>,
    pub config: SchemaConfig,
    pub fields: FieldMap,
    pub definitions: Vec<ParsedRecord>,
}

/// A named record converted from `definitions`.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub name: String,
    pub config: Option<SchemaConfig>,
    pub fields: FieldMap,
}

impl SchemaDocument {
    /// Converts every field entry into a constraint spec.
    pub fn into_schema(self) -> Result<ParsedSchema> {
        let fields = build_fields(&self.name, &self.fields)?;
        let definitions = self
            .definitions
            .iter()
            .map(|def| {
                Ok(ParsedRecord {
                    name: def.name.clone(),
                    config: def.config.clone(),
                    fields: build_fields(&def.name, &def.fields)?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(
            schema = %self.name,
            fields = fields.len(),
            definitions = definitions.len(),
            "Parsed schema document"
        );
        Ok(ParsedSchema {
            name: self.name,
            description: self.description,
            config: self.config,
            fields,
            definitions,
        })
    }
}

impl ParsedSchema {
    /// Compiler holding the root record and every definition.
    pub fn compiler(&self) -> Compiler {
        let root = Compiler::new(self.config.clone()).define(&self.name, self.fields.clone());
        self.definitions
            .iter()
            .fold(root, |compiler, def| match &def.config {
                Some(config) => {
                    compiler.define_with_config(&def.name, def.fields.clone(), config.clone())
                }
                None => compiler.define(&def.name, def.fields.clone()),
            })
    }

    /// Compiles the root record.
    pub fn compile(&self) -> std::result::Result<RecordDescriptor, SchemaConfigurationError> {
        self.compiler().compile(&self.name)
    }
}

fn build_fields(record: &str, docs: &[FieldDocument]) -> Result<FieldMap> {
    let mut map = FieldMap::new();
    for (index, doc) in docs.iter().enumerate() {
        let Some(name) = doc.name.as_deref() else {
            return Err(ParserError::MissingKey {
                field: format!("{record}.fields[{index}]"),
                key: "name",
            });
        };
        if map.get(name).is_some() {
            return Err(ParserError::DuplicateField {
                record: record.to_string(),
                field: name.to_string(),
            });
        }
        map.insert(name, build_type(doc, &format!("{record}.{name}"))?);
    }
    Ok(map)
}

const TEXT_KEYS: &[&str] = &[
    "min_length",
    "max_length",
    "length",
    "non_empty",
    "pattern",
    "email",
    "url",
    "starts_with",
    "ends_with",
    "contains",
    "trim",
    "lowercase",
    "uppercase",
];
const NUMERIC_KEYS: &[&str] = &[
    "min",
    "max",
    "gt",
    "lt",
    "positive",
    "negative",
    "non_negative",
    "non_positive",
    "multiple_of",
];
const DECIMAL_KEYS: &[&str] = &[
    "min",
    "max",
    "gt",
    "lt",
    "positive",
    "negative",
    "non_negative",
    "non_positive",
    "multiple_of",
    "max_digits",
    "decimal_places",
];
const TEMPORAL_KEYS: &[&str] = &["after", "before"];
const BYTES_KEYS: &[&str] = &["min_length", "max_length", "length"];
const SEQUENCE_KEYS: &[&str] = &["items", "min_items", "max_items", "length", "unique_items"];
const DICT_KEYS: &[&str] = &["keys", "values", "min_items", "max_items"];

fn allowed_keys(kind: &str) -> Option<&'static [&'static str]> {
    let keys: &'static [&'static str] = match kind {
        "string" => TEXT_KEYS,
        "number" | "integer" => NUMERIC_KEYS,
        "decimal" => DECIMAL_KEYS,
        "datetime" | "date" | "time" => TEMPORAL_KEYS,
        "bytes" => BYTES_KEYS,
        "array" | "set" => SEQUENCE_KEYS,
        "dict" => DICT_KEYS,
        "tuple" => &["elements"],
        "union" => &["variants"],
        "literal" | "enum" => &["choices"],
        "object" => &["fields"],
        "ref" => &["ref"],
        "boolean" | "uuid" | "any" | "null" => &[],
        _ => return None,
    };
    Some(keys)
}

impl FieldDocument {
    /// Effective type name.
    fn type_name(&self) -> Option<&str> {
        match (&self.kind, &self.reference) {
            (Some(kind), _) => Some(kind.as_str()),
            (None, Some(_)) => Some("ref"),
            (None, None) if !self.fields.is_empty() => Some("object"),
            (None, None) => None,
        }
    }

    /// Type-specific keys present in this entry.
    fn constraint_keys(&self) -> Vec<&'static str> {
        let flags = [
            ("min_length", self.min_length.is_some()),
            ("max_length", self.max_length.is_some()),
            ("length", self.length.is_some()),
            ("non_empty", self.non_empty),
            ("pattern", self.pattern.is_some()),
            ("email", self.email),
            ("url", self.url),
            ("starts_with", self.starts_with.is_some()),
            ("ends_with", self.ends_with.is_some()),
            ("contains", self.contains.is_some()),
            ("trim", self.trim),
            ("lowercase", self.lowercase),
            ("uppercase", self.uppercase),
            ("min", self.min.is_some()),
            ("max", self.max.is_some()),
            ("gt", self.gt.is_some()),
            ("lt", self.lt.is_some()),
            ("positive", self.positive),
            ("negative", self.negative),
            ("non_negative", self.non_negative),
            ("non_positive", self.non_positive),
            ("multiple_of", self.multiple_of.is_some()),
            ("max_digits", self.max_digits.is_some()),
            ("decimal_places", self.decimal_places.is_some()),
            ("after", self.after.is_some()),
            ("before", self.before.is_some()),
            ("min_items", self.min_items.is_some()),
            ("max_items", self.max_items.is_some()),
            ("unique_items", self.unique_items),
            ("items", self.items.is_some()),
            ("keys", self.keys.is_some()),
            ("values", self.values.is_some()),
            ("elements", !self.elements.is_empty()),
            ("variants", !self.variants.is_empty()),
            ("choices", !self.choices.is_empty()),
            ("fields", !self.fields.is_empty()),
            ("ref", self.reference.is_some()),
        ];
        flags
            .into_iter()
            .filter_map(|(key, set)| set.then_some(key))
            .collect()
    }
}

fn build_type(doc: &FieldDocument, path: &str) -> Result<ConstraintSpec> {
    let Some(kind) = doc.type_name() else {
        return Err(ParserError::MissingKey {
            field: path.to_string(),
            key: "type",
        });
    };
    let Some(allowed) = allowed_keys(kind) else {
        return Err(ParserError::UnknownType {
            field: path.to_string(),
            kind: kind.to_string(),
        });
    };
    if let Some(key) = doc
        .constraint_keys()
        .into_iter()
        .find(|key| !allowed.contains(key))
    {
        return Err(ParserError::UnsupportedConstraint {
            field: path.to_string(),
            constraint: key.to_string(),
            kind: kind.to_string(),
        });
    }

    let configured = |result: tyck_core::Result<ConstraintSpec>| {
        result.map_err(|source| ParserError::Configuration {
            field: path.to_string(),
            source,
        })
    };

    let spec = match kind {
        "string" => configured(text_spec(doc))?,
        "number" => configured(number_spec(doc))?,
        "integer" => configured(integer_spec(doc))?,
        "decimal" => configured(decimal_spec(doc))?,
        "boolean" => boolean().build(),
        "datetime" => configured(temporal_spec(datetime(), PrimitiveKind::DateTime, doc))?,
        "date" => configured(temporal_spec(date(), PrimitiveKind::Date, doc))?,
        "time" => configured(temporal_spec(time(), PrimitiveKind::Time, doc))?,
        "uuid" => uuid().build(),
        "bytes" => configured(bytes_spec(doc))?,
        "any" => tyck_core::any().build(),
        "null" => null().build(),
        "array" | "set" => {
            let item = nested(doc.items.as_deref(), path, "items")?;
            let builder = if kind == "set" { set(item) } else { array(item) };
            configured(sequence_spec(builder, doc))?
        }
        "dict" => {
            let keys = match doc.keys.as_deref() {
                Some(keys) => build_type(keys, &format!("{path}.keys"))?,
                None => string().build(),
            };
            let values = nested(doc.values.as_deref(), path, "values")?;
            configured(dict_spec(dict(keys, values), doc))?
        }
        "tuple" => {
            let elements = doc
                .elements
                .iter()
                .enumerate()
                .map(|(i, element)| build_type(element, &format!("{path}.elements[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            tuple(elements).build()
        }
        "union" => {
            let variants = doc
                .variants
                .iter()
                .enumerate()
                .map(|(i, variant)| build_type(variant, &format!("{path}.variants[{i}]")))
                .collect::<Result<Vec<_>>>()?;
            configured(union(variants).map(|b| b.build()))?
        }
        "literal" => configured(literal(json_values(&doc.choices)).map(|b| b.build()))?,
        "enum" => configured(enumeration(json_values(&doc.choices)).map(|b| b.build()))?,
        "object" => record(build_fields(path, &doc.fields)?).build(),
        "ref" => match &doc.reference {
            Some(name) => reference(name.as_str()).build(),
            None => {
                return Err(ParserError::MissingKey {
                    field: path.to_string(),
                    key: "ref",
                });
            }
        },
        other => {
            return Err(ParserError::UnknownType {
                field: path.to_string(),
                kind: other.to_string(),
            });
        }
    };

    Ok(modifiers(spec, doc))
}

fn nested(doc: Option<&FieldDocument>, path: &str, key: &'static str) -> Result<ConstraintSpec> {
    match doc {
        Some(doc) => build_type(doc, &format!("{path}.{key}")),
        None => Err(ParserError::MissingKey {
            field: path.to_string(),
            key,
        }),
    }
}

fn json_values(values: &[serde_json::Value]) -> Vec<Value> {
    values.iter().map(Value::from_json).collect()
}

fn modifiers(spec: ConstraintSpec, doc: &FieldDocument) -> ConstraintSpec {
    let mut builder = TypeBuilder::from_spec(spec);
    if doc.optional {
        builder = builder.optional();
    }
    if doc.nullable {
        builder = builder.nullable();
    }
    if let Some(default) = &doc.default {
        builder = builder.default_value(Value::from_json(default));
    }
    if let Some(alias) = &doc.alias {
        builder = builder.alias(alias.as_str());
    }
    if doc.strict {
        builder = builder.strict();
    }
    if let Some(title) = &doc.title {
        builder = builder.title(title.as_str());
    }
    if let Some(description) = &doc.description {
        builder = builder.description(description.as_str());
    }
    for example in &doc.examples {
        builder = builder.example(Value::from_json(example));
    }
    builder.build()
}

fn text_spec(doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = string();
    if doc.trim {
        builder = builder.trim();
    }
    if doc.lowercase {
        builder = builder.to_lowercase();
    }
    if doc.uppercase {
        builder = builder.to_uppercase();
    }
    if let Some(n) = doc.min_length {
        builder = builder.min_length(n)?;
    }
    if let Some(n) = doc.max_length {
        builder = builder.max_length(n)?;
    }
    if let Some(n) = doc.length {
        builder = builder.length(n)?;
    }
    if doc.non_empty {
        builder = builder.non_empty()?;
    }
    if let Some(pattern) = &doc.pattern {
        builder = builder.pattern(pattern)?;
    }
    if doc.email {
        builder = builder.email();
    }
    if doc.url {
        builder = builder.url();
    }
    if let Some(prefix) = &doc.starts_with {
        builder = builder.starts_with(prefix.as_str());
    }
    if let Some(suffix) = &doc.ends_with {
        builder = builder.ends_with(suffix.as_str());
    }
    if let Some(needle) = &doc.contains {
        builder = builder.contains(needle.as_str());
    }
    Ok(builder.build())
}

/// Applies the shared numeric keys to a number, integer or decimal builder.
/// `$bound` converts a document bound into the builder's parameter type.
macro_rules! numeric_keys {
    ($builder:expr, $doc:expr, $bound:expr) => {{
        let mut builder = $builder;
        let doc = $doc;
        if let Some(v) = doc.min {
            builder = builder.min($bound("min", v)?)?;
        }
        if let Some(v) = doc.max {
            builder = builder.max($bound("max", v)?)?;
        }
        if let Some(v) = doc.gt {
            builder = builder.gt($bound("gt", v)?)?;
        }
        if let Some(v) = doc.lt {
            builder = builder.lt($bound("lt", v)?)?;
        }
        if doc.positive {
            builder = builder.positive()?;
        }
        if doc.negative {
            builder = builder.negative()?;
        }
        if doc.non_negative {
            builder = builder.non_negative()?;
        }
        if doc.non_positive {
            builder = builder.non_positive()?;
        }
        if let Some(v) = doc.multiple_of {
            builder = builder.multiple_of($bound("multiple_of", v)?)?;
        }
        builder
    }};
}

fn float_bound(_: &str, value: f64) -> tyck_core::Result<f64> {
    Ok(value)
}

fn whole_bound(constraint: &str, value: f64) -> tyck_core::Result<i64> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Ok(value as i64)
    } else {
        Err(ConfigurationError::parameter(
            constraint,
            format!("integer bound must be a whole number, got {value}"),
        ))
    }
}

fn number_spec(doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let builder: NumberBuilder = numeric_keys!(number(), doc, float_bound);
    Ok(builder.build())
}

fn integer_spec(doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let builder: IntegerBuilder = numeric_keys!(integer(), doc, whole_bound);
    Ok(builder.build())
}

fn decimal_spec(doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = numeric_keys!(decimal(), doc, float_bound);
    if let Some(digits) = doc.max_digits {
        builder = builder.max_digits(digits)?;
    }
    if let Some(places) = doc.decimal_places {
        builder = builder.decimal_places(places)?;
    }
    Ok(builder.build())
}

fn temporal_spec(
    builder: TemporalBuilder,
    kind: PrimitiveKind,
    doc: &FieldDocument,
) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = builder;
    if let Some(text) = &doc.after {
        builder = builder.after(temporal_bound(kind, "after", text)?)?;
    }
    if let Some(text) = &doc.before {
        builder = builder.before(temporal_bound(kind, "before", text)?)?;
    }
    Ok(builder.build())
}

fn temporal_bound(kind: PrimitiveKind, constraint: &str, text: &str) -> tyck_core::Result<Value> {
    let parsed = match kind {
        PrimitiveKind::DateTime => DateTime::parse_from_rfc3339(text).ok().map(Value::from),
        PrimitiveKind::Date => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .ok()
            .map(Value::from),
        _ => NaiveTime::parse_from_str(text, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M"))
            .ok()
            .map(Value::from),
    };
    parsed.ok_or_else(|| {
        ConfigurationError::parameter(
            constraint,
            format!("'{text}' is not a valid {} bound", kind.name()),
        )
    })
}

fn bytes_spec(doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = bytes();
    if let Some(n) = doc.min_length {
        builder = builder.min_length(n)?;
    }
    if let Some(n) = doc.max_length {
        builder = builder.max_length(n)?;
    }
    if let Some(n) = doc.length {
        builder = builder.length(n)?;
    }
    Ok(builder.build())
}

fn sequence_spec(
    builder: CollectionBuilder,
    doc: &FieldDocument,
) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = builder;
    if let Some(n) = doc.min_items {
        builder = builder.min_items(n)?;
    }
    if let Some(n) = doc.max_items {
        builder = builder.max_items(n)?;
    }
    if let Some(n) = doc.length {
        builder = builder.length(n)?;
    }
    if doc.unique_items {
        builder = builder.unique_items();
    }
    Ok(builder.build())
}

fn dict_spec(builder: DictBuilder, doc: &FieldDocument) -> tyck_core::Result<ConstraintSpec> {
    let mut builder = builder;
    if let Some(n) = doc.min_items {
        builder = builder.min_items(n)?;
    }
    if let Some(n) = doc.max_items {
        builder = builder.max_items(n)?;
    }
    Ok(builder.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tyck_core::{Kind, Predicate};

    fn field(yaml: &str) -> FieldDocument {
        serde_yaml_ng::from_str(yaml).unwrap()
    }

    #[test]
    fn test_text_constraints() {
        let doc = field("type: string\nmin_length: 1\nmax_length: 10\ntrim: true\n");
        let spec = build_type(&doc, "User.name").unwrap();
        assert_eq!(
            spec.predicates,
            vec![Predicate::MinLength(1), Predicate::MaxLength(10)]
        );
        assert_eq!(spec.transforms.len(), 1);
    }

    #[test]
    fn test_integer_bounds_must_be_whole() {
        let doc = field("type: integer\nmin: 1.5\n");
        assert!(matches!(
            build_type(&doc, "User.age"),
            Err(ParserError::Configuration { .. })
        ));

        let doc = field("type: integer\nmin: 0\nmax: 120\n");
        let spec = build_type(&doc, "User.age").unwrap();
        assert_eq!(spec.predicates, vec![Predicate::Ge(0.0), Predicate::Le(120.0)]);
    }

    #[test]
    fn test_contradicting_bounds_name_the_field() {
        let doc = field("type: string\nmin_length: 5\nmax_length: 2\n");
        match build_type(&doc, "User.name") {
            Err(ParserError::Configuration { field, source }) => {
                assert_eq!(field, "User.name");
                assert!(matches!(source, ConfigurationError::InvalidBounds { .. }));
            }
            other => panic!("Expected configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_constraint_not_applicable_to_type() {
        let doc = field("type: integer\nmin_length: 1\n");
        assert_eq!(
            build_type(&doc, "User.id").unwrap_err().to_string(),
            "Constraint 'min_length' does not apply to type 'integer' (field 'User.id')"
        );
    }

    #[test]
    fn test_unknown_type() {
        let doc = field("type: complex\n");
        assert!(matches!(
            build_type(&doc, "User.z"),
            Err(ParserError::UnknownType { .. })
        ));
    }

    #[test]
    fn test_nested_collections() {
        let doc = field(
            r#"
type: dict
values:
  type: array
  items:
    type: integer
    positive: true
"#,
        );
        let spec = build_type(&doc, "Stats.counts").unwrap();
        let Kind::Dict { keys, values } = &spec.kind else {
            panic!("Expected dict, got {:?}", spec.kind);
        };
        assert_eq!(keys.kind.name(), "string");
        assert_eq!(values.kind.name(), "array");
    }

    #[test]
    fn test_array_without_items() {
        let doc = field("type: array\n");
        assert!(matches!(
            build_type(&doc, "User.tags"),
            Err(ParserError::MissingKey { key: "items", .. })
        ));
    }

    #[test]
    fn test_inferred_types() {
        let by_ref = field("ref: Node\n");
        assert_eq!(build_type(&by_ref, "Node.next").unwrap(), reference("Node").build());

        let inline = field("fields:\n  - name: street\n    type: string\n");
        assert_eq!(build_type(&inline, "User.home").unwrap().kind.name(), "object");
    }

    #[test]
    fn test_temporal_bounds() {
        let doc = field("type: date\nafter: \"2020-01-01\"\n");
        assert!(build_type(&doc, "Event.day").is_ok());

        let doc = field("type: date\nafter: \"yesterday\"\n");
        assert!(build_type(&doc, "Event.day").is_err());
    }

    #[test]
    fn test_modifiers() {
        let doc = field("type: string\noptional: true\nalias: userName\ndefault: anon\n");
        let spec = build_type(&doc, "User.user_name").unwrap();
        assert!(spec.optional);
        assert_eq!(spec.alias.as_deref(), Some("userName"));
        assert_eq!(spec.default, Some(Value::from("anon")));
    }

    #[test]
    fn test_duplicate_field() {
        let docs = vec![
            field("name: id\ntype: integer\n"),
            field("name: id\ntype: string\n"),
        ];
        assert!(matches!(
            build_fields("User", &docs),
            Err(ParserError::DuplicateField { .. })
        ));
    }
}
