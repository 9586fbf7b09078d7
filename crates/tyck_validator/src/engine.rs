//! Validation engine.
//!
//! Walks raw input against a compiled descriptor and produces either coerced
//! output or a [`ValidationReport`] listing every failure. Per field:
//!
//! 1. resolve the raw value by field name, falling back to the alias
//! 2. absent: required fields report `MissingField`, others take their
//!    default (or null)
//! 3. null: accepted only by nullable specs
//! 4. coerce to the spec's kind, recursing into composite kinds
//! 5. apply transforms, then every predicate in declaration order
//!
//! A failing field never stops the walk: sibling fields are still validated
//! so that one call reports all independent problems. Undeclared keys are
//! handled by the record's extra policy.
//!
//! Each visited value sits one level deeper than its container; values deeper
//! than `max_depth` report `RecursionLimitExceeded` instead of being walked.

use crate::coerce::coerce;
use crate::constraints;
use crate::descriptor::{Arena, RecordDescriptor, ValueDescriptor};
use crate::record::ValidatedRecord;
use crate::report::{ErrorKind, PathSegment, ValidationError, ValidationReport};
use tracing::trace;
use tyck_core::{ConstraintSpec, ExtraPolicy, Kind, RecordId, SchemaConfig, Value};

/// Validates raw input against a record descriptor.
///
/// ```rust
/// use tyck_core::{fields, integer, string, SchemaConfig, Value};
/// use tyck_validator::{compile, validate};
///
/// let user = compile(
///     &fields! {
///         "id" => integer().positive().unwrap(),
///         "name" => string().min_length(1).unwrap(),
///     },
///     &SchemaConfig::default(),
/// )
/// .unwrap();
///
/// let record = validate(&user, &Value::map([("id", Value::from(1)), ("name", Value::from("a"))]))
///     .unwrap();
/// assert_eq!(record.get("id"), Some(&Value::Int(1)));
///
/// let report = validate(&user, &Value::map([("id", Value::from(0)), ("name", Value::from(""))]))
///     .unwrap_err();
/// assert_eq!(report.len(), 2);
/// ```
pub fn validate(
    descriptor: &RecordDescriptor,
    raw: &Value,
) -> Result<ValidatedRecord, ValidationReport> {
    let config = descriptor.config();
    let mut walker = Walker::new(&descriptor.arena, config.max_depth);
    let output = walker.record(descriptor.id, raw, &[], 0);
    match (output, finish(descriptor.name(), walker.errors)) {
        (Some(output), None) => Ok(ValidatedRecord::new(
            descriptor.clone(),
            output.fields,
            output.extras,
        )),
        (_, Some(report)) => Err(report),
        (None, None) => Err(internal(descriptor.name())),
    }
}

/// Validates JSON input against a record descriptor.
pub fn validate_json(
    descriptor: &RecordDescriptor,
    json: &serde_json::Value,
) -> Result<ValidatedRecord, ValidationReport> {
    validate(descriptor, &Value::from_json(json))
}

/// Validates a standalone value, returning the coerced value.
pub fn validate_value(descriptor: &ValueDescriptor, raw: &Value) -> Result<Value, ValidationReport> {
    check_value(&descriptor.arena, &descriptor.spec, raw, &descriptor.config)
}

pub(crate) fn check_value(
    arena: &Arena,
    spec: &ConstraintSpec<RecordId>,
    raw: &Value,
    config: &SchemaConfig,
) -> Result<Value, ValidationReport> {
    let mut walker = Walker::new(arena, config.max_depth);
    let output = walker.value(spec, raw, &[], 0, config.strict);
    let title = spec.kind.name();
    match (output, finish(title, walker.errors)) {
        (Some(value), None) => Ok(value),
        (_, Some(report)) => Err(report),
        (None, None) => Err(internal(title)),
    }
}

fn finish(title: &str, errors: Vec<ValidationError>) -> Option<ValidationReport> {
    ValidationReport::from_errors(title, errors)
}

/// A walk that produced no output must have recorded an error; this
/// covers the case where it did not.
fn internal(title: &str) -> ValidationReport {
    ValidationReport::single(
        title,
        ValidationError::new(
            Vec::new(),
            ErrorKind::TypeMismatch,
            "validation produced no value",
            None,
        ),
    )
}

/// Output of a record walk: declared fields in order, then kept extras.
pub(crate) struct RecordOutput {
    pub(crate) fields: Vec<(String, Value)>,
    pub(crate) extras: Vec<(String, Value)>,
}

struct Walker<'a> {
    arena: &'a Arena,
    max_depth: usize,
    errors: Vec<ValidationError>,
}

fn child(path: &[PathSegment], segment: impl Into<PathSegment>) -> Vec<PathSegment> {
    let mut next = Vec::with_capacity(path.len() + 1);
    next.extend_from_slice(path);
    next.push(segment.into());
    next
}

impl<'a> Walker<'a> {
    fn new(arena: &'a Arena, max_depth: usize) -> Self {
        Self {
            arena,
            max_depth,
            errors: Vec::new(),
        }
    }

    fn push(&mut self, path: &[PathSegment], kind: ErrorKind, message: String, input: Option<&Value>) {
        self.errors
            .push(ValidationError::new(path.to_vec(), kind, message, input.cloned()));
    }

    fn depth_exceeded(&mut self, path: &[PathSegment], depth: usize, raw: &Value) -> bool {
        if depth > self.max_depth {
            self.push(
                path,
                ErrorKind::RecursionLimitExceeded,
                format!("nesting exceeds maximum depth of {}", self.max_depth),
                Some(raw),
            );
            true
        } else {
            false
        }
    }

    fn record(
        &mut self,
        id: RecordId,
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
    ) -> Option<RecordOutput> {
        if self.depth_exceeded(path, depth, raw) {
            return None;
        }
        let arena = self.arena;
        let Some(def) = arena.get(id) else {
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("unknown record #{}", id.0),
                Some(raw),
            );
            return None;
        };
        let Some(entries) = raw.as_map() else {
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected object, got {}", raw.type_name()),
                Some(raw),
            );
            return None;
        };

        let start = self.errors.len();
        let config = &def.config;
        let mut fields = Vec::with_capacity(def.fields.len());
        let mut consumed = vec![false; entries.len()];

        for field in &def.fields {
            let by_name = (config.populate_by_name || field.alias.is_none())
                .then(|| entries.iter().position(|(k, _)| *k == field.name))
                .flatten();
            let position = by_name.or_else(|| {
                field
                    .alias
                    .as_ref()
                    .and_then(|alias| entries.iter().position(|(k, _)| k == alias))
            });
            let field_path = child(path, field.name.as_str());

            match position {
                Some(index) => {
                    consumed[index] = true;
                    let strict = field.spec.strict.unwrap_or(config.strict);
                    if let Some(value) =
                        self.value(&field.spec, &entries[index].1, &field_path, depth + 1, strict)
                    {
                        fields.push((field.name.clone(), value));
                    }
                }
                None if field.required => self.push(
                    &field_path,
                    ErrorKind::MissingField,
                    "field required".to_string(),
                    None,
                ),
                None => fields.push((field.name.clone(), field.spec.missing_value())),
            }
        }

        // A key some field accepts is declared even when another key already
        // supplied that field.
        let accepted = |key: &str| {
            def.fields.iter().any(|f| {
                f.alias.as_deref() == Some(key)
                    || (f.name == key && (config.populate_by_name || f.alias.is_none()))
            })
        };
        let mut extras = Vec::new();
        for (index, (key, value)) in entries.iter().enumerate() {
            if consumed[index] || accepted(key) {
                continue;
            }
            match config.extra {
                ExtraPolicy::Forbid => self.push(
                    &child(path, key.as_str()),
                    ErrorKind::UnknownField,
                    "extra fields not permitted".to_string(),
                    Some(value),
                ),
                ExtraPolicy::Allow => extras.push((key.clone(), value.clone())),
                ExtraPolicy::Ignore => {}
            }
        }

        (self.errors.len() == start).then_some(RecordOutput { fields, extras })
    }

    fn value(
        &mut self,
        spec: &ConstraintSpec<RecordId>,
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
        strict: bool,
    ) -> Option<Value> {
        if raw.is_null() {
            if spec.accepts_null() {
                return Some(Value::Null);
            }
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected {}, got null", spec.kind.name()),
                Some(raw),
            );
            return None;
        }
        if self.depth_exceeded(path, depth, raw) {
            return None;
        }

        let start = self.errors.len();
        let strict = spec.strict.unwrap_or(strict);
        let coerced = match &spec.kind {
            Kind::Primitive(kind) => match coerce(*kind, raw, strict) {
                Ok(value) => value,
                Err(message) => {
                    self.push(path, ErrorKind::TypeMismatch, message, Some(raw));
                    return None;
                }
            },
            Kind::Optional(inner) => self.value(inner, raw, path, depth, strict)?,
            Kind::Array(item) => Value::List(self.sequence(item, raw, path, depth, strict)?),
            Kind::Set(item) => {
                let items = self.sequence(item, raw, path, depth, strict)?;
                let mut unique: Vec<Value> = Vec::with_capacity(items.len());
                for item in items {
                    if !unique.contains(&item) {
                        unique.push(item);
                    }
                }
                Value::List(unique)
            }
            Kind::Tuple(items) => self.tuple(items, raw, path, depth, strict)?,
            Kind::Dict { keys, values } => self.dict(keys, values, raw, path, depth, strict)?,
            Kind::Union(branches) => self.union(branches, raw, path, depth, strict)?,
            Kind::Literal(choices) => self.choice(choices, raw, path, strict, false)?,
            Kind::Enum(members) => self.choice(members, raw, path, strict, true)?,
            Kind::Record(id) => {
                let output = self.record(*id, raw, path, depth)?;
                let mut entries = output.fields;
                entries.extend(output.extras);
                Value::Map(entries)
            }
        };

        let value = spec
            .transforms
            .iter()
            .fold(coerced, |value, transform| constraints::apply(*transform, value));

        for predicate in &spec.predicates {
            if let Err(message) = constraints::check(predicate, &value) {
                self.push(
                    path,
                    ErrorKind::constraint(predicate.name()),
                    message,
                    Some(&value),
                );
            }
        }

        (self.errors.len() == start).then_some(value)
    }

    fn sequence(
        &mut self,
        item: &ConstraintSpec<RecordId>,
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
        strict: bool,
    ) -> Option<Vec<Value>> {
        let Some(items) = raw.as_list() else {
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected array, got {}", raw.type_name()),
                Some(raw),
            );
            return None;
        };

        let start = self.errors.len();
        let mut output = Vec::with_capacity(items.len());
        for (index, raw_item) in items.iter().enumerate() {
            if let Some(value) = self.value(item, raw_item, &child(path, index), depth + 1, strict) {
                output.push(value);
            }
        }
        (self.errors.len() == start).then_some(output)
    }

    fn tuple(
        &mut self,
        items: &[ConstraintSpec<RecordId>],
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
        strict: bool,
    ) -> Option<Value> {
        let Some(raw_items) = raw.as_list() else {
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected tuple, got {}", raw.type_name()),
                Some(raw),
            );
            return None;
        };
        if raw_items.len() != items.len() {
            self.push(
                path,
                ErrorKind::ArityMismatch,
                format!("expected {} items, got {}", items.len(), raw_items.len()),
                Some(raw),
            );
            return None;
        }

        let start = self.errors.len();
        let mut output = Vec::with_capacity(items.len());
        for (index, (spec, raw_item)) in items.iter().zip(raw_items).enumerate() {
            if let Some(value) = self.value(spec, raw_item, &child(path, index), depth + 1, strict) {
                output.push(value);
            }
        }
        (self.errors.len() == start).then_some(Value::List(output))
    }

    fn dict(
        &mut self,
        keys: &ConstraintSpec<RecordId>,
        values: &ConstraintSpec<RecordId>,
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
        strict: bool,
    ) -> Option<Value> {
        let Some(entries) = raw.as_map() else {
            self.push(
                path,
                ErrorKind::TypeMismatch,
                format!("expected object, got {}", raw.type_name()),
                Some(raw),
            );
            return None;
        };

        let start = self.errors.len();
        let mut output: Vec<(String, Value)> = Vec::with_capacity(entries.len());
        for (key, raw_value) in entries {
            let entry_path = child(path, key.as_str());
            let key = self.value(keys, &Value::String(key.clone()), &entry_path, depth + 1, strict);
            let value = self.value(values, raw_value, &entry_path, depth + 1, strict);
            if let (Some(key), Some(value)) = (key, value) {
                let key = key_text(&key);
                match output.iter_mut().find(|(k, _)| *k == key) {
                    Some(entry) => entry.1 = value,
                    None => output.push((key, value)),
                }
            }
        }
        (self.errors.len() == start).then_some(Value::Map(output))
    }

    /// Tries branches in declaration order; the first clean one wins.
    ///
    /// A branch that ran into the depth limit reports that error as is, so
    /// recursion through a union fails the same way as any other recursion.
    fn union(
        &mut self,
        branches: &[ConstraintSpec<RecordId>],
        raw: &Value,
        path: &[PathSegment],
        depth: usize,
        strict: bool,
    ) -> Option<Value> {
        let mut summaries = Vec::with_capacity(branches.len());
        let mut too_deep: Option<Vec<ValidationError>> = None;
        for (index, branch) in branches.iter().enumerate() {
            let mut attempt = Walker::new(self.arena, self.max_depth);
            if let Some(value) = attempt.value(branch, raw, path, depth, strict) {
                trace!(branch = index, kind = branch.kind.name(), "Union branch matched");
                return Some(value);
            }
            let reason = attempt
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_default();
            summaries.push(format!("{}: {}", branch.kind.name(), reason));

            if too_deep.is_none() {
                let limit_errors: Vec<ValidationError> = attempt
                    .errors
                    .into_iter()
                    .filter(|e| e.kind == ErrorKind::RecursionLimitExceeded)
                    .collect();
                if !limit_errors.is_empty() {
                    too_deep = Some(limit_errors);
                }
            }
        }

        if let Some(errors) = too_deep {
            self.errors.extend(errors);
            return None;
        }

        self.push(
            path,
            ErrorKind::NoMatchingVariant,
            format!("no union branch matched ({})", summaries.join("; ")),
            Some(raw),
        );
        None
    }

    /// Matches literal choices or enum members.
    ///
    /// Numbers match across integer and float in lax mode. Enum members also
    /// match their textual form in lax mode.
    fn choice(
        &mut self,
        choices: &[Value],
        raw: &Value,
        path: &[PathSegment],
        strict: bool,
        textual: bool,
    ) -> Option<Value> {
        let matched = choices.iter().find(|choice| {
            *choice == raw
                || (!strict
                    && (numeric_eq(choice, raw) || (textual && text_eq(choice, raw))))
        });
        if let Some(choice) = matched {
            return Some(choice.clone());
        }

        let expected: Vec<String> = choices.iter().map(|c| c.to_string()).collect();
        self.push(
            path,
            ErrorKind::NoMatchingVariant,
            format!("expected one of [{}], got {}", expected.join(", "), raw),
            Some(raw),
        );
        None
    }
}

fn numeric_eq(a: &Value, b: &Value) -> bool {
    matches!(
        (a, b),
        (Value::Int(_), Value::Float(_)) | (Value::Float(_), Value::Int(_))
    ) && a.compare(b).is_some_and(|o| o.is_eq())
}

fn text_eq(member: &Value, raw: &Value) -> bool {
    match (member, raw) {
        (Value::String(m), other) | (other, Value::String(m)) => {
            !matches!(other, Value::String(_)) && key_text(other) == *m
        }
        _ => false,
    }
}

/// Text of a validated mapping key.
fn key_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => match other.to_json() {
            serde_json::Value::String(s) => s,
            json => json.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;
    use tyck_core::{
        SpecBuilder, array, boolean, dict, enumeration, fields, integer, literal, set, string,
        tuple, union,
    };

    fn user() -> RecordDescriptor {
        compile(
            &fields! {
                "id" => integer().positive().unwrap(),
                "name" => string().min_length(1).unwrap(),
            },
            &SchemaConfig::default(),
        )
        .unwrap()
    }

    fn input(entries: Vec<(&str, Value)>) -> Value {
        Value::map(entries)
    }

    #[test]
    fn test_valid_record() {
        let record = validate(
            &user(),
            &input(vec![("id", Value::from(1)), ("name", Value::from("a"))]),
        )
        .unwrap();
        assert_eq!(
            record.to_value(),
            input(vec![("id", Value::Int(1)), ("name", Value::from("a"))])
        );
    }

    #[test]
    fn test_every_failing_field_reported() {
        let report = validate(
            &user(),
            &input(vec![("id", Value::from(0)), ("name", Value::from(""))]),
        )
        .unwrap_err();

        let summary: Vec<(String, String)> = report
            .iter()
            .map(|e| (e.location(), e.kind.code().to_string()))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("id".to_string(), "positive".to_string()),
                ("name".to_string(), "min_length".to_string()),
            ]
        );
    }

    #[test]
    fn test_missing_fields_do_not_short_circuit() {
        let report = validate(&user(), &Value::map(Vec::<(String, Value)>::new())).unwrap_err();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|e| e.kind == ErrorKind::MissingField));
    }

    #[test]
    fn test_non_mapping_input() {
        let report = validate(&user(), &Value::from("nope")).unwrap_err();
        assert_eq!(report.errors()[0].kind, ErrorKind::TypeMismatch);
        assert!(report.errors()[0].path.is_empty());
    }

    #[test]
    fn test_lax_and_strict_coercion() {
        let raw = input(vec![("id", Value::from("7")), ("name", Value::from("a"))]);
        let record = validate(&user(), &raw).unwrap();
        assert_eq!(record.get("id"), Some(&Value::Int(7)));

        let strict = compile(
            &fields! { "id" => integer() },
            &SchemaConfig::default().with_strict(true),
        )
        .unwrap();
        let report = validate(&strict, &input(vec![("id", Value::from("7"))])).unwrap_err();
        assert_eq!(report.errors()[0].kind, ErrorKind::TypeMismatch);
    }

    #[test]
    fn test_field_level_strict_overrides_config() {
        let descriptor = compile(
            &fields! { "flag" => boolean().strict() },
            &SchemaConfig::default(),
        )
        .unwrap();
        assert!(validate(&descriptor, &input(vec![("flag", Value::from("true"))])).is_err());
    }

    #[test]
    fn test_extra_policies() {
        let fields = fields! { "id" => integer() };
        let raw = input(vec![("id", Value::from(1)), ("extra", Value::from(2))]);

        let ignore = compile(&fields, &SchemaConfig::default()).unwrap();
        let record = validate(&ignore, &raw).unwrap();
        assert!(record.extras().is_empty());

        let allow = compile(
            &fields,
            &SchemaConfig::default().with_extra(ExtraPolicy::Allow),
        )
        .unwrap();
        let record = validate(&allow, &raw).unwrap();
        assert_eq!(record.extras(), &[("extra".to_string(), Value::Int(2))]);

        let forbid = compile(
            &fields,
            &SchemaConfig::default().with_extra(ExtraPolicy::Forbid),
        )
        .unwrap();
        let report = validate(&forbid, &raw).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].kind, ErrorKind::UnknownField);
        assert_eq!(report.errors()[0].location(), "extra");
    }

    #[test]
    fn test_alias_lookup() {
        let descriptor = compile(
            &fields! { "user_name" => string().alias("userName") },
            &SchemaConfig::default().with_extra(ExtraPolicy::Forbid),
        )
        .unwrap();

        let by_alias = validate(&descriptor, &input(vec![("userName", Value::from("a"))])).unwrap();
        assert_eq!(by_alias.get("user_name"), Some(&Value::from("a")));
        let by_name = validate(&descriptor, &input(vec![("user_name", Value::from("b"))])).unwrap();
        assert_eq!(by_name.get("user_name"), Some(&Value::from("b")));

        let alias_only = compile(
            &fields! { "user_name" => string().alias("userName") },
            &SchemaConfig::default().with_populate_by_name(false),
        )
        .unwrap();
        let report =
            validate(&alias_only, &input(vec![("user_name", Value::from("b"))])).unwrap_err();
        assert_eq!(report.errors()[0].kind, ErrorKind::MissingField);
    }

    #[test]
    fn test_optional_default_and_null() {
        let descriptor = compile(
            &fields! {
                "nickname" => string().optional(),
                "role" => string().default_value("member"),
                "age" => integer(),
            },
            &SchemaConfig::default(),
        )
        .unwrap();

        let record = validate(&descriptor, &input(vec![("age", Value::from(3))])).unwrap();
        assert_eq!(record.get("nickname"), Some(&Value::Null));
        assert_eq!(record.get("role"), Some(&Value::from("member")));

        let report = validate(&descriptor, &input(vec![("age", Value::Null)])).unwrap_err();
        assert_eq!(report.errors()[0].message, "expected integer, got null");
    }

    #[test]
    fn test_nested_paths() {
        let descriptor = compile(
            &fields! { "scores" => array(integer().min(0).unwrap()) },
            &SchemaConfig::default(),
        )
        .unwrap();
        let report = validate(
            &descriptor,
            &input(vec![("scores", Value::list([1, -1, 2, -5]))]),
        )
        .unwrap_err();
        let locations: Vec<String> = report.iter().map(|e| e.location()).collect();
        assert_eq!(locations, vec!["scores[1]", "scores[3]"]);
    }

    #[test]
    fn test_union_declaration_order() {
        let int_first = compile(
            &fields! { "v" => union([integer().build(), string().build()]).unwrap() },
            &SchemaConfig::default(),
        )
        .unwrap();
        let record = validate(&int_first, &input(vec![("v", Value::from("5"))])).unwrap();
        assert_eq!(record.get("v"), Some(&Value::Int(5)));

        let string_first = compile(
            &fields! { "v" => union([string().build(), integer().build()]).unwrap() },
            &SchemaConfig::default(),
        )
        .unwrap();
        let record = validate(&string_first, &input(vec![("v", Value::from("5"))])).unwrap();
        assert_eq!(record.get("v"), Some(&Value::from("5")));
    }

    #[test]
    fn test_union_no_match_reports_single_summary() {
        let descriptor = compile(
            &fields! { "v" => union([integer().build(), boolean().build()]).unwrap() },
            &SchemaConfig::default(),
        )
        .unwrap();
        let report = validate(&descriptor, &input(vec![("v", Value::list([1]))])).unwrap_err();
        assert_eq!(report.len(), 1);
        assert_eq!(report.errors()[0].kind, ErrorKind::NoMatchingVariant);
        assert!(report.errors()[0].message.contains("integer: expected integer, got array"));
    }

    #[test]
    fn test_tuple_arity() {
        let descriptor = compile(
            &fields! { "pair" => tuple([integer().build(), string().build()]) },
            &SchemaConfig::default(),
        )
        .unwrap();
        let ok = validate(
            &descriptor,
            &input(vec![("pair", Value::list([Value::from(1), Value::from("a")]))]),
        );
        assert!(ok.is_ok());

        let report = validate(&descriptor, &input(vec![("pair", Value::list([1]))])).unwrap_err();
        assert_eq!(report.errors()[0].kind, ErrorKind::ArityMismatch);
    }

    #[test]
    fn test_set_deduplicates_after_coercion() {
        let descriptor = compile(
            &fields! { "tags" => set(integer()) },
            &SchemaConfig::default(),
        )
        .unwrap();
        let record = validate(
            &descriptor,
            &input(vec![(
                "tags",
                Value::list([Value::from(1), Value::from("1"), Value::from(2)]),
            )]),
        )
        .unwrap();
        assert_eq!(record.get("tags"), Some(&Value::list([1, 2])));
    }

    #[test]
    fn test_dict_keys_and_values() {
        let descriptor = compile(
            &fields! { "counts" => dict(string().min_length(2).unwrap(), integer()) },
            &SchemaConfig::default(),
        )
        .unwrap();
        let report = validate(
            &descriptor,
            &input(vec![(
                "counts",
                Value::map([("ab", Value::from(1)), ("c", Value::from("x"))]),
            )]),
        )
        .unwrap_err();
        let locations: Vec<String> = report.iter().map(|e| e.location()).collect();
        assert_eq!(locations, vec!["counts.c", "counts.c"]);
    }

    #[test]
    fn test_literal_and_enum() {
        let descriptor = compile(
            &fields! {
                "kind" => literal(["a", "b"]).unwrap(),
                "level" => enumeration([1, 2, 3]).unwrap(),
            },
            &SchemaConfig::default(),
        )
        .unwrap();

        let record = validate(
            &descriptor,
            &input(vec![("kind", Value::from("a")), ("level", Value::from("2"))]),
        )
        .unwrap();
        assert_eq!(record.get("level"), Some(&Value::Int(2)));

        let report = validate(
            &descriptor,
            &input(vec![("kind", Value::from("c")), ("level", Value::from(9))]),
        )
        .unwrap_err();
        assert_eq!(report.len(), 2);
        assert!(report.iter().all(|e| e.kind == ErrorKind::NoMatchingVariant));
    }

    #[test]
    fn test_transforms_run_before_predicates() {
        let descriptor = compile(
            &fields! { "code" => string().trim().to_uppercase().length(3).unwrap() },
            &SchemaConfig::default(),
        )
        .unwrap();
        let record = validate(&descriptor, &input(vec![("code", Value::from("  abc "))])).unwrap();
        assert_eq!(record.get("code"), Some(&Value::from("ABC")));
    }

    #[test]
    fn test_custom_predicate() {
        let descriptor = compile(
            &fields! {
                "even" => integer().custom("even", |v| match v.as_int() {
                    Some(i) if i % 2 == 0 => Ok(()),
                    _ => Err("must be even".to_string()),
                }),
            },
            &SchemaConfig::default(),
        )
        .unwrap();
        let report = validate(&descriptor, &input(vec![("even", Value::from(3))])).unwrap_err();
        assert_eq!(report.errors()[0].kind, ErrorKind::constraint("even"));
        assert_eq!(report.errors()[0].message, "must be even");
    }
}
