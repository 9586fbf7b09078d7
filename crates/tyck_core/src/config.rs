//! Schema compilation settings.
//!
//! A [`SchemaConfig`] is handed to the compiler together with the field map.
//! It decides how undeclared input keys are treated, whether lax coercion is
//! enabled, how aliases are generated and how deep nested values may go.

use serde::{Deserialize, Serialize};

/// Default bound on nesting depth during validation.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Treatment of input keys that are not declared fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtraPolicy {
    /// Report one error per undeclared key
    Forbid,
    /// Keep undeclared keys in the record's extension bag
    Allow,
    /// Drop undeclared keys silently
    #[default]
    Ignore,
}

/// Alias naming strategy applied to fields without an explicit alias.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasStrategy {
    /// No generated aliases
    #[default]
    None,
    /// `user_name` → `userName`
    CamelCase,
    /// `user_name` → `UserName`
    PascalCase,
    /// `user_name` → `user-name`
    KebabCase,
}

impl AliasStrategy {
    /// Generates the alias for a snake_case field name.
    ///
    /// Returns `None` when the strategy is [`AliasStrategy::None`] or when the
    /// generated alias equals the field name.
    pub fn apply(&self, name: &str) -> Option<String> {
        let alias = match self {
            AliasStrategy::None => return None,
            AliasStrategy::CamelCase => {
                let pascal = to_pascal(name);
                let mut chars = pascal.chars();
                match chars.next() {
                    Some(first) => first.to_lowercase().chain(chars).collect(),
                    None => String::new(),
                }
            }
            AliasStrategy::PascalCase => to_pascal(name),
            AliasStrategy::KebabCase => name.replace('_', "-"),
        };
        (alias != name).then_some(alias)
    }
}

fn to_pascal(name: &str) -> String {
    name.split('_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}

/// Configuration applied when compiling a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Treatment of undeclared input keys
    pub extra: ExtraPolicy,

    /// Whether lax coercions (e.g. numeric strings) are disabled
    pub strict: bool,

    /// Alias generation strategy
    pub alias_strategy: AliasStrategy,

    /// Whether a field with an alias may still be populated by its name
    pub populate_by_name: bool,

    /// Maximum nesting depth accepted during validation
    pub max_depth: usize,

    /// Optional record title
    pub title: Option<String>,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            extra: ExtraPolicy::default(),
            strict: false,
            alias_strategy: AliasStrategy::default(),
            populate_by_name: true,
            max_depth: DEFAULT_MAX_DEPTH,
            title: None,
        }
    }
}

impl SchemaConfig {
    /// Creates a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the extra-field policy.
    pub fn with_extra(mut self, extra: ExtraPolicy) -> Self {
        self.extra = extra;
        self
    }

    /// Sets strict type matching.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Sets the alias generation strategy.
    pub fn with_alias_strategy(mut self, strategy: AliasStrategy) -> Self {
        self.alias_strategy = strategy;
        self
    }

    /// Sets whether aliased fields accept their declared name.
    pub fn with_populate_by_name(mut self, populate_by_name: bool) -> Self {
        self.populate_by_name = populate_by_name;
        self
    }

    /// Sets the maximum nesting depth.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the record title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }
}
