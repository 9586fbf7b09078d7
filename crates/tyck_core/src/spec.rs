//! Constraint specifications.
//!
//! A [`ConstraintSpec`] is the immutable description accumulated by a builder
//! chain: the value kind, the ordered predicates, post-coercion transforms,
//! optionality, default value and metadata. Builders wrap a spec and every
//! chained call returns a new spec with one more entry appended.
//!
//! Record references are generic: at authoring time a nested record is a
//! [`RecordSource`] (inline field map or a name), after compilation it is a
//! [`RecordId`] into the descriptor arena.

use crate::{ConfigurationError, Value};
use regex::Regex;
use std::fmt;
use std::sync::Arc;

/// Primitive value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    String,
    Number,
    Integer,
    Boolean,
    DateTime,
    Date,
    Time,
    Uuid,
    Bytes,
    Decimal,
    Any,
    Null,
}

impl PrimitiveKind {
    /// Returns the kind name used in messages and documents.
    pub fn name(&self) -> &'static str {
        match self {
            PrimitiveKind::String => "string",
            PrimitiveKind::Number => "number",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::DateTime => "datetime",
            PrimitiveKind::Date => "date",
            PrimitiveKind::Time => "time",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::Bytes => "bytes",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Any => "any",
            PrimitiveKind::Null => "null",
        }
    }
}

/// Stable identifier of a compiled record inside a descriptor arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(pub usize);

/// Authoring-time reference to a nested record.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordSource {
    /// Record declared in place
    Inline {
        /// Optional record name
        name: Option<String>,
        /// Declared fields
        fields: Arc<FieldMap>,
    },
    /// Reference to a record defined by name (may be self-referential)
    Named(String),
}

/// The kind of a value, primitive or composite.
#[derive(Debug, Clone, PartialEq)]
pub enum Kind<R = RecordSource> {
    /// Primitive kind
    Primitive(PrimitiveKind),
    /// Homogeneous sequence
    Array(Box<ConstraintSpec<R>>),
    /// Sequence deduplicated after validation
    Set(Box<ConstraintSpec<R>>),
    /// Mapping with validated keys and values
    Dict {
        keys: Box<ConstraintSpec<R>>,
        values: Box<ConstraintSpec<R>>,
    },
    /// Null or the inner kind
    Optional(Box<ConstraintSpec<R>>),
    /// Fixed-arity heterogeneous sequence
    Tuple(Vec<ConstraintSpec<R>>),
    /// First matching branch wins
    Union(Vec<ConstraintSpec<R>>),
    /// Exact value match
    Literal(Vec<Value>),
    /// Member value match (lax mode also matches the textual form)
    Enum(Vec<Value>),
    /// Nested record
    Record(R),
}

impl<R> Kind<R> {
    /// Returns the kind name used in messages.
    pub fn name(&self) -> &'static str {
        match self {
            Kind::Primitive(p) => p.name(),
            Kind::Array(_) => "array",
            Kind::Set(_) => "set",
            Kind::Dict { .. } => "dict",
            Kind::Optional(_) => "optional",
            Kind::Tuple(_) => "tuple",
            Kind::Union(_) => "union",
            Kind::Literal(_) => "literal",
            Kind::Enum(_) => "enum",
            Kind::Record(_) => "object",
        }
    }
}

/// A compiled regular expression compared by its source.
#[derive(Debug, Clone)]
pub struct Pattern(Regex);

impl Pattern {
    /// Compiles a pattern.
    pub fn new(source: &str) -> Result<Self, ConfigurationError> {
        Regex::new(source)
            .map(Pattern)
            .map_err(|e| ConfigurationError::InvalidPattern {
                pattern: source.to_string(),
                message: e.to_string(),
            })
    }

    /// Returns the pattern source.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns true if the pattern matches anywhere in `text`.
    pub fn is_match(&self, text: &str) -> bool {
        self.0.is_match(text)
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

/// Signature of a user-supplied predicate.
pub type CheckFn = dyn Fn(&Value) -> Result<(), String> + Send + Sync;

/// A named user predicate.
#[derive(Clone)]
pub struct CustomPredicate {
    name: String,
    check: Arc<CheckFn>,
}

impl CustomPredicate {
    pub fn new<F>(name: impl Into<String>, check: F) -> Self
    where
        F: Fn(&Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            check: Arc::new(check),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runs the predicate on a coerced value.
    pub fn check(&self, value: &Value) -> Result<(), String> {
        (self.check)(value)
    }
}

impl fmt::Debug for CustomPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomPredicate")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl PartialEq for CustomPredicate {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && Arc::ptr_eq(&self.check, &other.check)
    }
}

/// A constraint checked against a coerced value.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    MinLength(usize),
    MaxLength(usize),
    Pattern(Pattern),
    Email,
    Url,
    StartsWith(String),
    EndsWith(String),
    Contains(String),
    /// Inclusive lower bound
    Ge(f64),
    /// Inclusive upper bound
    Le(f64),
    /// Exclusive lower bound
    Gt(f64),
    /// Exclusive upper bound
    Lt(f64),
    Positive,
    Negative,
    NonNegative,
    NonPositive,
    MultipleOf(f64),
    MinItems(usize),
    MaxItems(usize),
    UniqueItems,
    MaxDigits(u32),
    DecimalPlaces(u32),
    /// Strictly later than the bound
    After(Value),
    /// Strictly earlier than the bound
    Before(Value),
    Custom(CustomPredicate),
}

impl Predicate {
    /// Returns the predicate name reported in constraint violations.
    pub fn name(&self) -> &str {
        match self {
            Predicate::MinLength(_) => "min_length",
            Predicate::MaxLength(_) => "max_length",
            Predicate::Pattern(_) => "pattern",
            Predicate::Email => "email",
            Predicate::Url => "url",
            Predicate::StartsWith(_) => "starts_with",
            Predicate::EndsWith(_) => "ends_with",
            Predicate::Contains(_) => "contains",
            Predicate::Ge(_) => "ge",
            Predicate::Le(_) => "le",
            Predicate::Gt(_) => "gt",
            Predicate::Lt(_) => "lt",
            Predicate::Positive => "positive",
            Predicate::Negative => "negative",
            Predicate::NonNegative => "non_negative",
            Predicate::NonPositive => "non_positive",
            Predicate::MultipleOf(_) => "multiple_of",
            Predicate::MinItems(_) => "min_items",
            Predicate::MaxItems(_) => "max_items",
            Predicate::UniqueItems => "unique_items",
            Predicate::MaxDigits(_) => "max_digits",
            Predicate::DecimalPlaces(_) => "decimal_places",
            Predicate::After(_) => "after",
            Predicate::Before(_) => "before",
            Predicate::Custom(custom) => custom.name(),
        }
    }
}

/// A normalization applied after coercion and before predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Trim,
    Lowercase,
    Uppercase,
}

/// Descriptive metadata carried through compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Value>,
}

/// Type and constraint description of a single value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstraintSpec<R = RecordSource> {
    /// Value kind
    pub kind: Kind<R>,
    /// Predicates in declaration order
    pub predicates: Vec<Predicate>,
    /// Transforms in declaration order
    pub transforms: Vec<Transform>,
    /// Whether null is accepted
    pub nullable: bool,
    /// Whether the field may be absent from input
    pub optional: bool,
    /// Value used when the field is absent
    pub default: Option<Value>,
    /// Alternative input key
    pub alias: Option<String>,
    /// Per-field strictness; `None` inherits the schema configuration
    pub strict: Option<bool>,
    /// Descriptive metadata
    pub metadata: Metadata,
}

impl<R> ConstraintSpec<R> {
    /// Creates an unconstrained spec of the given kind.
    pub fn new(kind: Kind<R>) -> Self {
        Self {
            kind,
            predicates: Vec::new(),
            transforms: Vec::new(),
            nullable: false,
            optional: false,
            default: None,
            alias: None,
            strict: None,
            metadata: Metadata::default(),
        }
    }

    /// Whether a field with this spec must be present in input.
    pub fn is_required(&self) -> bool {
        !self.optional && self.default.is_none() && !matches!(self.kind, Kind::Optional(_))
    }

    /// Whether null is an accepted value.
    pub fn accepts_null(&self) -> bool {
        self.nullable
            || match &self.kind {
                Kind::Optional(_)
                | Kind::Primitive(PrimitiveKind::Null)
                | Kind::Primitive(PrimitiveKind::Any) => true,
                Kind::Union(branches) => branches.iter().any(ConstraintSpec::accepts_null),
                Kind::Literal(choices) => choices.iter().any(Value::is_null),
                _ => false,
            }
    }

    /// Value substituted for an absent, non-required field.
    pub fn missing_value(&self) -> Value {
        self.default.clone().unwrap_or(Value::Null)
    }

    /// Rebuilds the spec, converting every record reference with `f`.
    ///
    /// Used by the compiler to replace authoring-time record sources with
    /// arena identifiers.
    pub fn try_map_records<S, E, F>(&self, f: &mut F) -> Result<ConstraintSpec<S>, E>
    where
        F: FnMut(&R) -> Result<S, E>,
    {
        let kind = match &self.kind {
            Kind::Primitive(p) => Kind::Primitive(*p),
            Kind::Array(item) => Kind::Array(Box::new(item.try_map_records(f)?)),
            Kind::Set(item) => Kind::Set(Box::new(item.try_map_records(f)?)),
            Kind::Dict { keys, values } => Kind::Dict {
                keys: Box::new(keys.try_map_records(f)?),
                values: Box::new(values.try_map_records(f)?),
            },
            Kind::Optional(inner) => Kind::Optional(Box::new(inner.try_map_records(f)?)),
            Kind::Tuple(items) => Kind::Tuple(
                items
                    .iter()
                    .map(|item| item.try_map_records(f))
                    .collect::<Result<_, _>>()?,
            ),
            Kind::Union(branches) => Kind::Union(
                branches
                    .iter()
                    .map(|branch| branch.try_map_records(f))
                    .collect::<Result<_, _>>()?,
            ),
            Kind::Literal(values) => Kind::Literal(values.clone()),
            Kind::Enum(values) => Kind::Enum(values.clone()),
            Kind::Record(source) => Kind::Record(f(source)?),
        };

        Ok(ConstraintSpec {
            kind,
            predicates: self.predicates.clone(),
            transforms: self.transforms.clone(),
            nullable: self.nullable,
            optional: self.optional,
            default: self.default.clone(),
            alias: self.alias.clone(),
            strict: self.strict,
            metadata: self.metadata.clone(),
        })
    }
}

impl<R: Clone> ConstraintSpec<R> {
    /// Returns a copy with `predicate` appended.
    pub fn with_predicate(&self, predicate: Predicate) -> Self {
        let mut next = self.clone();
        next.predicates.push(predicate);
        next
    }

    /// Returns a copy with `transform` appended.
    pub fn with_transform(&self, transform: Transform) -> Self {
        let mut next = self.clone();
        next.transforms.push(transform);
        next
    }
}

/// Ordered mapping of field name to spec.
///
/// The shared intermediate both front-ends (builder chains and declarative
/// documents) hand to the compiler. Insertion order is declaration order;
/// re-inserting a name replaces its spec in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, ConstraintSpec)>,
}

impl FieldMap {
    /// Creates an empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field and returns the map.
    pub fn field(mut self, name: impl Into<String>, spec: impl Into<ConstraintSpec>) -> Self {
        self.insert(name, spec);
        self
    }

    /// Adds or replaces a field.
    pub fn insert(&mut self, name: impl Into<String>, spec: impl Into<ConstraintSpec>) {
        let name = name.into();
        let spec = spec.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = spec,
            None => self.entries.push((name, spec)),
        }
    }

    /// Looks up a field spec by name.
    pub fn get(&self, name: &str) -> Option<&ConstraintSpec> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, spec)| spec)
    }

    /// Iterates over fields in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintSpec)> {
        self.entries.iter().map(|(n, spec)| (n.as_str(), spec))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, S> FromIterator<(K, S)> for FieldMap
where
    K: Into<String>,
    S: Into<ConstraintSpec>,
{
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (name, spec) in iter {
            map.insert(name, spec);
        }
        map
    }
}

/// Builds a [`FieldMap`] from `name => builder` pairs.
///
/// ```rust
/// use tyck_core::{fields, integer, string};
///
/// let user = fields! {
///     "id" => integer().positive().unwrap(),
///     "name" => string().min_length(1).unwrap(),
/// };
/// assert_eq!(user.names(), vec!["id", "name"]);
/// ```
#[macro_export]
macro_rules! fields {
    ($($name:expr => $spec:expr),* $(,)?) => {
        $crate::FieldMap::new()$(.field($name, $spec))*
    };
}
