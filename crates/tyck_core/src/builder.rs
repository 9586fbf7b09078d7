//! Fluent constraint builders.
//!
//! Every constructor returns an immutable builder wrapping a
//! [`ConstraintSpec`]. Chained calls take `&self` and return a new builder
//! with one more predicate or modifier, so a partially configured builder can
//! be shared and extended in several directions:
//!
//! ```rust
//! use tyck_core::{string, SpecBuilder};
//!
//! let name = string().min_length(1).unwrap();
//! let short_name = name.max_length(10).unwrap();
//! let long_name = name.max_length(200).unwrap();
//!
//! assert_eq!(name.spec().predicates.len(), 1);
//! assert_eq!(short_name.spec().predicates.len(), 2);
//! assert_eq!(long_name.spec().predicates.len(), 2);
//! ```
//!
//! Methods whose parameters can contradict earlier constraints (for example
//! a minimum above a maximum) return `Result<Self, ConfigurationError>`.

use crate::{
    ConfigurationError, ConstraintSpec, CustomPredicate, FieldMap, Kind, Pattern, Predicate,
    PrimitiveKind, RecordSource, Result, Transform, Value,
};
use std::sync::Arc;

/// Shared behavior of every builder.
///
/// Provides the modifiers that apply to any kind: optionality, defaults,
/// aliases, metadata, strictness and custom predicates.
pub trait SpecBuilder: Sized {
    /// Returns the accumulated spec.
    fn spec(&self) -> &ConstraintSpec;

    /// Wraps a spec in this builder type.
    fn from_spec(spec: ConstraintSpec) -> Self;

    /// Returns a copy of the accumulated spec.
    fn build(&self) -> ConstraintSpec {
        self.spec().clone()
    }

    /// Marks the field as not required; absent input yields null.
    fn optional(&self) -> Self {
        self.modify(|spec| {
            spec.optional = true;
            spec.nullable = true;
        })
    }

    /// Accepts null as a value.
    fn nullable(&self) -> Self {
        self.modify(|spec| spec.nullable = true)
    }

    /// Sets the value used when the field is absent.
    fn default_value(&self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.modify(|spec| spec.default = Some(value))
    }

    /// Sets an alternative input key.
    fn alias(&self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        self.modify(|spec| spec.alias = Some(alias))
    }

    fn title(&self, title: impl Into<String>) -> Self {
        let title = title.into();
        self.modify(|spec| spec.metadata.title = Some(title))
    }

    fn description(&self, description: impl Into<String>) -> Self {
        let description = description.into();
        self.modify(|spec| spec.metadata.description = Some(description))
    }

    /// Appends an example value to the metadata.
    fn example(&self, example: impl Into<Value>) -> Self {
        let example = example.into();
        self.modify(|spec| spec.metadata.examples.push(example))
    }

    /// Disables lax coercion for this value regardless of schema config.
    fn strict(&self) -> Self {
        self.modify(|spec| spec.strict = Some(true))
    }

    /// Appends a named user predicate.
    fn custom<F>(&self, name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Self::from_spec(
            self.spec()
                .with_predicate(Predicate::Custom(CustomPredicate::new(name, check))),
        )
    }

    #[doc(hidden)]
    fn modify(&self, f: impl FnOnce(&mut ConstraintSpec)) -> Self {
        let mut spec = self.spec().clone();
        f(&mut spec);
        Self::from_spec(spec)
    }
}

macro_rules! builder_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            spec: ConstraintSpec,
        }

        impl SpecBuilder for $name {
            fn spec(&self) -> &ConstraintSpec {
                &self.spec
            }

            fn from_spec(spec: ConstraintSpec) -> Self {
                Self { spec }
            }
        }

        impl From<$name> for ConstraintSpec {
            fn from(builder: $name) -> Self {
                builder.spec
            }
        }

        impl From<&$name> for ConstraintSpec {
            fn from(builder: &$name) -> Self {
                builder.spec.clone()
            }
        }
    };
}

builder_type!(
    /// Builder for text values.
    StringBuilder
);
builder_type!(
    /// Builder for floating point values.
    NumberBuilder
);
builder_type!(
    /// Builder for integer values.
    IntegerBuilder
);
builder_type!(
    /// Builder for datetime, date and time values.
    TemporalBuilder
);
builder_type!(
    /// Builder for binary values.
    BytesBuilder
);
builder_type!(
    /// Builder for fixed-precision decimal values.
    DecimalBuilder
);
builder_type!(
    /// Builder for arrays and sets.
    CollectionBuilder
);
builder_type!(
    /// Builder for mappings.
    DictBuilder
);
builder_type!(
    /// Builder for kinds without kind-specific constraints (boolean, uuid,
    /// any, null, optional, literal, union, tuple, enum, records).
    TypeBuilder
);

fn primitive(kind: PrimitiveKind) -> ConstraintSpec {
    ConstraintSpec::new(Kind::Primitive(kind))
}

fn append<B: SpecBuilder>(builder: &B, predicate: Predicate) -> B {
    B::from_spec(builder.spec().with_predicate(predicate))
}

/// Appends a predicate and re-checks bound feasibility of the result.
fn append_checked<B: SpecBuilder>(builder: &B, predicate: Predicate) -> Result<B> {
    let next = append(builder, predicate);
    check_bounds(&next.spec().predicates)?;
    Ok(next)
}

fn finite(constraint: &str, value: f64) -> Result<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ConfigurationError::parameter(
            constraint,
            "bound must be a finite number",
        ))
    }
}

/// Verifies that the accumulated bounds admit at least one value.
fn check_bounds(predicates: &[Predicate]) -> Result<()> {
    let min_len = predicates
        .iter()
        .filter_map(|p| match p {
            Predicate::MinLength(n) => Some(*n),
            _ => None,
        })
        .max();
    let max_len = predicates
        .iter()
        .filter_map(|p| match p {
            Predicate::MaxLength(n) => Some(*n),
            _ => None,
        })
        .min();
    if let (Some(lo), Some(hi)) = (min_len, max_len) {
        if lo > hi {
            return Err(ConfigurationError::bounds("length", lo, hi));
        }
    }

    let min_items = predicates
        .iter()
        .filter_map(|p| match p {
            Predicate::MinItems(n) => Some(*n),
            _ => None,
        })
        .max();
    let max_items = predicates
        .iter()
        .filter_map(|p| match p {
            Predicate::MaxItems(n) => Some(*n),
            _ => None,
        })
        .min();
    if let (Some(lo), Some(hi)) = (min_items, max_items) {
        if lo > hi {
            return Err(ConfigurationError::bounds("items", lo, hi));
        }
    }

    // (bound, exclusive)
    let mut lower: Option<(f64, bool)> = None;
    let mut upper: Option<(f64, bool)> = None;
    for predicate in predicates {
        match predicate {
            Predicate::Ge(v) => tighten(&mut lower, (*v, false), true),
            Predicate::Gt(v) => tighten(&mut lower, (*v, true), true),
            Predicate::Positive => tighten(&mut lower, (0.0, true), true),
            Predicate::NonNegative => tighten(&mut lower, (0.0, false), true),
            Predicate::Le(v) => tighten(&mut upper, (*v, false), false),
            Predicate::Lt(v) => tighten(&mut upper, (*v, true), false),
            Predicate::Negative => tighten(&mut upper, (0.0, true), false),
            Predicate::NonPositive => tighten(&mut upper, (0.0, false), false),
            _ => {}
        }
    }
    if let (Some((lo, lo_excl)), Some((hi, hi_excl))) = (lower, upper) {
        if lo > hi || (lo == hi && (lo_excl || hi_excl)) {
            return Err(ConfigurationError::bounds("value", lo, hi));
        }
    }

    let after = predicates.iter().filter_map(|p| match p {
        Predicate::After(v) => Some(v),
        _ => None,
    });
    let before: Vec<&Value> = predicates
        .iter()
        .filter_map(|p| match p {
            Predicate::Before(v) => Some(v),
            _ => None,
        })
        .collect();
    for lo in after {
        for hi in &before {
            if lo.compare(hi).is_some_and(|ord| ord.is_ge()) {
                return Err(ConfigurationError::bounds("time", lo, hi));
            }
        }
    }

    let max_digits = predicates.iter().find_map(|p| match p {
        Predicate::MaxDigits(n) => Some(*n),
        _ => None,
    });
    let places = predicates.iter().find_map(|p| match p {
        Predicate::DecimalPlaces(n) => Some(*n),
        _ => None,
    });
    if let (Some(digits), Some(places)) = (max_digits, places) {
        if places > digits {
            return Err(ConfigurationError::bounds("decimal places", places, digits));
        }
    }

    Ok(())
}

/// Keeps the tighter of two bounds. Lower bounds keep the maximum, upper
/// bounds the minimum; on a tie the exclusive bound wins.
fn tighten(slot: &mut Option<(f64, bool)>, candidate: (f64, bool), is_lower: bool) {
    *slot = match *slot {
        None => Some(candidate),
        Some(current) => {
            let tighter = if is_lower {
                candidate.0 > current.0
            } else {
                candidate.0 < current.0
            };
            if tighter || (candidate.0 == current.0 && candidate.1) {
                Some(candidate)
            } else {
                Some(current)
            }
        }
    };
}

/// Creates a text builder.
pub fn string() -> StringBuilder {
    StringBuilder::from_spec(primitive(PrimitiveKind::String))
}

impl StringBuilder {
    /// Requires at least `n` characters.
    pub fn min_length(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MinLength(n))
    }

    /// Allows at most `n` characters.
    pub fn max_length(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MaxLength(n))
    }

    /// Requires exactly `n` characters.
    pub fn length(&self, n: usize) -> Result<Self> {
        self.min_length(n)?.max_length(n)
    }

    /// Rejects the empty string.
    pub fn non_empty(&self) -> Result<Self> {
        self.min_length(1)
    }

    /// Requires a regular expression match anywhere in the text.
    pub fn pattern(&self, pattern: &str) -> Result<Self> {
        Ok(append(self, Predicate::Pattern(Pattern::new(pattern)?)))
    }

    pub fn email(&self) -> Self {
        append(self, Predicate::Email)
    }

    pub fn url(&self) -> Self {
        append(self, Predicate::Url)
    }

    pub fn starts_with(&self, prefix: impl Into<String>) -> Self {
        append(self, Predicate::StartsWith(prefix.into()))
    }

    pub fn ends_with(&self, suffix: impl Into<String>) -> Self {
        append(self, Predicate::EndsWith(suffix.into()))
    }

    pub fn contains(&self, needle: impl Into<String>) -> Self {
        append(self, Predicate::Contains(needle.into()))
    }

    /// Strips surrounding whitespace before predicates run.
    pub fn trim(&self) -> Self {
        Self::from_spec(self.spec.with_transform(Transform::Trim))
    }

    pub fn to_lowercase(&self) -> Self {
        Self::from_spec(self.spec.with_transform(Transform::Lowercase))
    }

    pub fn to_uppercase(&self) -> Self {
        Self::from_spec(self.spec.with_transform(Transform::Uppercase))
    }
}

/// Creates a floating point builder.
pub fn number() -> NumberBuilder {
    NumberBuilder::from_spec(primitive(PrimitiveKind::Number))
}

macro_rules! numeric_bounds {
    ($builder:ident, $param:ty) => {
        impl $builder {
            /// Inclusive lower bound.
            pub fn min(&self, bound: $param) -> Result<Self> {
                append_checked(self, Predicate::Ge(finite("ge", bound as f64)?))
            }

            /// Inclusive upper bound.
            pub fn max(&self, bound: $param) -> Result<Self> {
                append_checked(self, Predicate::Le(finite("le", bound as f64)?))
            }

            /// Exclusive lower bound.
            pub fn gt(&self, bound: $param) -> Result<Self> {
                append_checked(self, Predicate::Gt(finite("gt", bound as f64)?))
            }

            /// Exclusive upper bound.
            pub fn lt(&self, bound: $param) -> Result<Self> {
                append_checked(self, Predicate::Lt(finite("lt", bound as f64)?))
            }

            /// Inclusive range.
            pub fn range(&self, min: $param, max: $param) -> Result<Self> {
                self.min(min)?.max(max)
            }

            pub fn positive(&self) -> Result<Self> {
                append_checked(self, Predicate::Positive)
            }

            pub fn negative(&self) -> Result<Self> {
                append_checked(self, Predicate::Negative)
            }

            pub fn non_negative(&self) -> Result<Self> {
                append_checked(self, Predicate::NonNegative)
            }

            pub fn non_positive(&self) -> Result<Self> {
                append_checked(self, Predicate::NonPositive)
            }

            /// Requires the value to be a multiple of `step` (which must be positive).
            pub fn multiple_of(&self, step: $param) -> Result<Self> {
                let step = finite("multiple_of", step as f64)?;
                if step <= 0.0 {
                    return Err(ConfigurationError::parameter(
                        "multiple_of",
                        "step must be greater than zero",
                    ));
                }
                Ok(append(self, Predicate::MultipleOf(step)))
            }
        }
    };
}

numeric_bounds!(NumberBuilder, f64);
numeric_bounds!(IntegerBuilder, i64);
numeric_bounds!(DecimalBuilder, f64);

/// Creates an integer builder.
pub fn integer() -> IntegerBuilder {
    IntegerBuilder::from_spec(primitive(PrimitiveKind::Integer))
}

/// Creates a boolean builder.
pub fn boolean() -> TypeBuilder {
    TypeBuilder::from_spec(primitive(PrimitiveKind::Boolean))
}

/// Creates a timezone-aware datetime builder.
pub fn datetime() -> TemporalBuilder {
    TemporalBuilder::from_spec(primitive(PrimitiveKind::DateTime))
}

/// Creates a calendar date builder.
pub fn date() -> TemporalBuilder {
    TemporalBuilder::from_spec(primitive(PrimitiveKind::Date))
}

/// Creates a wall-clock time builder.
pub fn time() -> TemporalBuilder {
    TemporalBuilder::from_spec(primitive(PrimitiveKind::Time))
}

impl TemporalBuilder {
    /// Requires values strictly later than `bound`.
    pub fn after(&self, bound: impl Into<Value>) -> Result<Self> {
        let bound = self.temporal_bound("after", bound.into())?;
        append_checked(self, Predicate::After(bound))
    }

    /// Requires values strictly earlier than `bound`.
    pub fn before(&self, bound: impl Into<Value>) -> Result<Self> {
        let bound = self.temporal_bound("before", bound.into())?;
        append_checked(self, Predicate::Before(bound))
    }

    fn temporal_bound(&self, constraint: &str, bound: Value) -> Result<Value> {
        let matches = matches!(
            (&self.spec.kind, &bound),
            (Kind::Primitive(PrimitiveKind::DateTime), Value::DateTime(_))
                | (Kind::Primitive(PrimitiveKind::Date), Value::Date(_))
                | (Kind::Primitive(PrimitiveKind::Time), Value::Time(_))
        );
        if matches {
            Ok(bound)
        } else {
            Err(ConfigurationError::parameter(
                constraint,
                format!(
                    "bound of type {} does not match {}",
                    bound.type_name(),
                    self.spec.kind.name()
                ),
            ))
        }
    }
}

/// Creates a UUID builder.
pub fn uuid() -> TypeBuilder {
    TypeBuilder::from_spec(primitive(PrimitiveKind::Uuid))
}

/// Creates a binary builder.
pub fn bytes() -> BytesBuilder {
    BytesBuilder::from_spec(primitive(PrimitiveKind::Bytes))
}

impl BytesBuilder {
    pub fn min_length(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MinLength(n))
    }

    pub fn max_length(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MaxLength(n))
    }

    pub fn length(&self, n: usize) -> Result<Self> {
        self.min_length(n)?.max_length(n)
    }
}

/// Creates a fixed-precision decimal builder.
pub fn decimal() -> DecimalBuilder {
    DecimalBuilder::from_spec(primitive(PrimitiveKind::Decimal))
}

impl DecimalBuilder {
    /// Limits the total number of significant digits.
    pub fn max_digits(&self, digits: u32) -> Result<Self> {
        if digits == 0 {
            return Err(ConfigurationError::parameter(
                "max_digits",
                "must allow at least one digit",
            ));
        }
        append_checked(self, Predicate::MaxDigits(digits))
    }

    /// Limits the number of digits after the decimal point.
    pub fn decimal_places(&self, places: u32) -> Result<Self> {
        append_checked(self, Predicate::DecimalPlaces(places))
    }
}

/// Creates a wildcard builder accepting any value, including null.
pub fn any() -> TypeBuilder {
    TypeBuilder::from_spec(primitive(PrimitiveKind::Any))
}

/// Creates a builder accepting only null.
pub fn null() -> TypeBuilder {
    TypeBuilder::from_spec(primitive(PrimitiveKind::Null))
}

/// Creates an array builder with the given element spec.
pub fn array(item: impl Into<ConstraintSpec>) -> CollectionBuilder {
    CollectionBuilder::from_spec(ConstraintSpec::new(Kind::Array(Box::new(item.into()))))
}

/// Creates a set builder; elements are deduplicated after validation.
pub fn set(item: impl Into<ConstraintSpec>) -> CollectionBuilder {
    CollectionBuilder::from_spec(ConstraintSpec::new(Kind::Set(Box::new(item.into()))))
}

impl CollectionBuilder {
    pub fn min_items(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MinItems(n))
    }

    pub fn max_items(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MaxItems(n))
    }

    pub fn length(&self, n: usize) -> Result<Self> {
        self.min_items(n)?.max_items(n)
    }

    /// Rejects sequences containing equal elements.
    pub fn unique_items(&self) -> Self {
        append(self, Predicate::UniqueItems)
    }
}

/// Creates a mapping builder with key and value specs.
pub fn dict(keys: impl Into<ConstraintSpec>, values: impl Into<ConstraintSpec>) -> DictBuilder {
    DictBuilder::from_spec(ConstraintSpec::new(Kind::Dict {
        keys: Box::new(keys.into()),
        values: Box::new(values.into()),
    }))
}

impl DictBuilder {
    pub fn min_items(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MinItems(n))
    }

    pub fn max_items(&self, n: usize) -> Result<Self> {
        append_checked(self, Predicate::MaxItems(n))
    }
}

/// Wraps a spec so that null is accepted and the field is not required.
pub fn optional(inner: impl Into<ConstraintSpec>) -> TypeBuilder {
    TypeBuilder::from_spec(ConstraintSpec::new(Kind::Optional(Box::new(inner.into()))))
}

/// Accepts exactly one of the given values.
pub fn literal<V, I>(values: I) -> Result<TypeBuilder>
where
    V: Into<Value>,
    I: IntoIterator<Item = V>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(ConfigurationError::EmptyChoices {
            kind: "literal".to_string(),
        });
    }
    Ok(TypeBuilder::from_spec(ConstraintSpec::new(Kind::Literal(
        values,
    ))))
}

/// Accepts one of the enumeration members.
pub fn enumeration<V, I>(members: I) -> Result<TypeBuilder>
where
    V: Into<Value>,
    I: IntoIterator<Item = V>,
{
    let members: Vec<Value> = members.into_iter().map(Into::into).collect();
    if members.is_empty() {
        return Err(ConfigurationError::EmptyChoices {
            kind: "enum".to_string(),
        });
    }
    Ok(TypeBuilder::from_spec(ConstraintSpec::new(Kind::Enum(
        members,
    ))))
}

/// Accepts the first branch, in declaration order, that validates cleanly.
pub fn union<I>(branches: I) -> Result<TypeBuilder>
where
    I: IntoIterator<Item = ConstraintSpec>,
{
    let branches: Vec<ConstraintSpec> = branches.into_iter().collect();
    if branches.is_empty() {
        return Err(ConfigurationError::EmptyChoices {
            kind: "union".to_string(),
        });
    }
    Ok(TypeBuilder::from_spec(ConstraintSpec::new(Kind::Union(
        branches,
    ))))
}

/// Creates a fixed-arity tuple builder.
pub fn tuple<I>(items: I) -> TypeBuilder
where
    I: IntoIterator<Item = ConstraintSpec>,
{
    TypeBuilder::from_spec(ConstraintSpec::new(Kind::Tuple(
        items.into_iter().collect(),
    )))
}

/// Creates an inline nested record.
pub fn record(fields: FieldMap) -> TypeBuilder {
    TypeBuilder::from_spec(ConstraintSpec::new(Kind::Record(RecordSource::Inline {
        name: None,
        fields: Arc::new(fields),
    })))
}

/// Creates a named inline nested record; other fields may refer to it with
/// [`reference`].
pub fn named_record(name: impl Into<String>, fields: FieldMap) -> TypeBuilder {
    TypeBuilder::from_spec(ConstraintSpec::new(Kind::Record(RecordSource::Inline {
        name: Some(name.into()),
        fields: Arc::new(fields),
    })))
}

/// Refers to a record by name. The reference is resolved by the compiler and
/// may point at the record that contains it.
pub fn reference(name: impl Into<String>) -> TypeBuilder {
    TypeBuilder::from_spec(ConstraintSpec::new(Kind::Record(RecordSource::Named(
        name.into(),
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_string_builder_chain() {
        let spec = string()
            .min_length(1)
            .unwrap()
            .max_length(100)
            .unwrap()
            .email()
            .build();

        assert_eq!(spec.kind, Kind::Primitive(PrimitiveKind::String));
        assert_eq!(
            spec.predicates,
            vec![
                Predicate::MinLength(1),
                Predicate::MaxLength(100),
                Predicate::Email
            ]
        );
    }

    #[test]
    fn test_builders_are_not_mutated() {
        let base = string().min_length(1).unwrap();
        let a = base.max_length(5).unwrap();
        let b = base.pattern("^[a-z]+$").unwrap();

        assert_eq!(base.spec().predicates.len(), 1);
        assert_eq!(a.spec().predicates[1], Predicate::MaxLength(5));
        assert_eq!(b.spec().predicates[1].name(), "pattern");
    }

    #[test]
    fn test_min_length_above_max_length() {
        let err = string().max_length(3).unwrap().min_length(5).unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidBounds { .. }));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = string().pattern("[invalid(regex").unwrap_err();
        assert!(matches!(err, ConfigurationError::InvalidPattern { .. }));
    }

    #[test]
    fn test_numeric_bounds_conflicts() {
        assert!(integer().min(10).unwrap().max(5).is_err());
        assert!(integer().positive().unwrap().negative().is_err());
        assert!(number().gt(1.0).unwrap().lt(1.0).is_err());
        assert!(number().min(1.0).unwrap().max(1.0).is_ok());
        assert!(number().positive().unwrap().max(0.0).is_err());
        assert!(number().min(f64::NAN).is_err());
    }

    #[test]
    fn test_multiple_of_requires_positive_step() {
        assert!(integer().multiple_of(0).is_err());
        assert!(number().multiple_of(-0.5).is_err());
        assert!(integer().multiple_of(5).is_ok());
    }

    #[test]
    fn test_temporal_bounds() {
        let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let feb = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        assert!(date().after(jan).unwrap().before(feb).is_ok());
        assert!(date().after(feb).unwrap().before(jan).is_err());
        assert!(date().after("2024-01-01").is_err());
    }

    #[test]
    fn test_decimal_places_exceed_digits() {
        assert!(decimal().max_digits(3).unwrap().decimal_places(4).is_err());
        assert!(decimal().max_digits(0).is_err());
    }

    #[test]
    fn test_empty_choices() {
        assert!(matches!(
            literal(Vec::<Value>::new()),
            Err(ConfigurationError::EmptyChoices { .. })
        ));
        assert!(enumeration(Vec::<&str>::new()).is_err());
        assert!(union(Vec::<ConstraintSpec>::new()).is_err());
    }

    #[test]
    fn test_modifiers() {
        let spec = integer()
            .default_value(0)
            .alias("userId")
            .title("User id")
            .description("Primary key")
            .example(42)
            .strict()
            .build();

        assert_eq!(spec.default, Some(Value::Int(0)));
        assert_eq!(spec.alias.as_deref(), Some("userId"));
        assert_eq!(spec.metadata.title.as_deref(), Some("User id"));
        assert_eq!(spec.metadata.examples, vec![Value::Int(42)]);
        assert_eq!(spec.strict, Some(true));
        assert!(!spec.is_required());
    }

    #[test]
    fn test_optional_modifier() {
        let spec = string().optional().build();
        assert!(spec.optional);
        assert!(spec.nullable);
        assert!(!spec.is_required());
    }

    #[test]
    fn test_composite_builders() {
        let spec = array(string()).min_items(1).unwrap().build();
        match &spec.kind {
            Kind::Array(item) => assert_eq!(item.kind, Kind::Primitive(PrimitiveKind::String)),
            other => panic!("Expected array, got {:?}", other),
        }

        let spec = union(vec![integer().build(), string().build()])
            .unwrap()
            .build();
        assert!(matches!(&spec.kind, Kind::Union(branches) if branches.len() == 2));

        let spec = reference("Node").build();
        assert_eq!(
            spec.kind,
            Kind::Record(RecordSource::Named("Node".to_string()))
        );
    }

    #[test]
    fn test_custom_predicate() {
        let spec = integer()
            .custom("even", |v| match v.as_int() {
                Some(i) if i % 2 == 0 => Ok(()),
                _ => Err("must be even".to_string()),
            })
            .build();

        match &spec.predicates[0] {
            Predicate::Custom(custom) => {
                assert_eq!(custom.name(), "even");
                assert!(custom.check(&Value::Int(4)).is_ok());
                assert!(custom.check(&Value::Int(3)).is_err());
            }
            other => panic!("Expected custom predicate, got {:?}", other),
        }
    }
}
