//! Compiled descriptor cache and declared model types.
//!
//! Model types implementing [`Interface`] declare their fields once; the
//! descriptor is compiled on first use and shared afterwards. The cache
//! guarantees at most one compilation per key even when several threads
//! ask for the same model at once.

use crate::descriptor::RecordDescriptor;
use crate::engine::validate;
use crate::record::ValidatedRecord;
use crate::{ModelError, SchemaConfigurationError, compile_named};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};
use tracing::debug;
use tyck_core::{ConfigurationError, FieldMap, SchemaConfig, Value};

type Slot = Arc<OnceLock<Result<RecordDescriptor, SchemaConfigurationError>>>;

/// Thread-safe, compile-once descriptor cache keyed by name.
#[derive(Default)]
pub struct SchemaCache {
    slots: RwLock<HashMap<String, Slot>>,
}

impl SchemaCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the descriptor cached under `key`, compiling it with `define`
    /// on first use.
    ///
    /// Compilation errors are cached as well: a schema that failed once
    /// fails the same way on every later lookup.
    pub fn get_or_compile<F>(
        &self,
        key: &str,
        define: F,
    ) -> Result<RecordDescriptor, SchemaConfigurationError>
    where
        F: FnOnce() -> Result<RecordDescriptor, SchemaConfigurationError>,
    {
        let existing = self.slots.read().get(key).cloned();
        let slot = match existing {
            Some(slot) => slot,
            None => Arc::clone(self.slots.write().entry(key.to_string()).or_default()),
        };
        slot.get_or_init(|| {
            debug!(key, "Compiling cached schema");
            define()
        })
        .clone()
    }

    /// Whether a descriptor (or compile error) is cached under `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.slots
            .read()
            .get(key)
            .is_some_and(|slot| slot.get().is_some())
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.slots.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.read().is_empty()
    }
}

impl std::fmt::Debug for SchemaCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaCache")
            .field("entries", &self.len())
            .finish()
    }
}

/// Process-wide cache used by [`Interface`] types.
pub fn global_cache() -> &'static SchemaCache {
    static CACHE: OnceLock<SchemaCache> = OnceLock::new();
    CACHE.get_or_init(SchemaCache::new)
}

/// A model type whose schema is declared through builders.
///
/// ```rust
/// use tyck_core::{fields, integer, string, ConfigurationError, FieldMap, Value};
/// use tyck_validator::Interface;
///
/// struct User;
///
/// impl Interface for User {
///     fn fields() -> Result<FieldMap, ConfigurationError> {
///         Ok(fields! {
///             "id" => integer().positive()?,
///             "name" => string().min_length(1)?,
///         })
///     }
/// }
///
/// let user = User::parse(&Value::map([("id", Value::from(1)), ("name", Value::from("a"))]))
///     .unwrap();
/// assert_eq!(user.descriptor().name(), "User");
/// ```
pub trait Interface {
    /// Declared fields.
    fn fields() -> Result<FieldMap, ConfigurationError>;

    /// Compilation settings.
    fn config() -> SchemaConfig {
        SchemaConfig::default()
    }

    /// Record name; fields may refer to the model itself with
    /// `reference(Self::schema_name())`.
    fn schema_name() -> String {
        let full = std::any::type_name::<Self>();
        let base = full.split('<').next().unwrap_or(full);
        base.rsplit("::").next().unwrap_or(base).to_string()
    }

    /// Compiled descriptor, shared through the global cache.
    fn descriptor() -> Result<RecordDescriptor, SchemaConfigurationError> {
        global_cache().get_or_compile(std::any::type_name::<Self>(), || {
            let fields = Self::fields()?;
            compile_named(&Self::schema_name(), &fields, &Self::config())
        })
    }

    /// Validates raw input against the model.
    fn parse(raw: &Value) -> Result<ValidatedRecord, ModelError> {
        let descriptor = Self::descriptor()?;
        Ok(validate(&descriptor, raw)?)
    }

    /// Validates JSON input against the model.
    fn parse_json(json: &serde_json::Value) -> Result<ValidatedRecord, ModelError> {
        Self::parse(&Value::from_json(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tyck_core::{array, fields, integer, reference};

    #[test]
    fn test_compiles_at_most_once() {
        let cache = Arc::new(SchemaCache::new());
        let compilations = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let compilations = Arc::clone(&compilations);
                thread::spawn(move || {
                    cache
                        .get_or_compile("User", || {
                            compilations.fetch_add(1, Ordering::SeqCst);
                            compile(&fields! { "id" => integer() }, &SchemaConfig::default())
                        })
                        .unwrap()
                })
            })
            .collect();

        let descriptors: Vec<RecordDescriptor> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert_eq!(compilations.load(Ordering::SeqCst), 1);
        assert!(descriptors.windows(2).all(|pair| pair[0] == pair[1]));
        assert!(cache.contains("User"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_errors_are_cached() {
        let cache = SchemaCache::new();
        let first = cache.get_or_compile("Broken", || {
            compile(&fields! { "x" => reference("Nope") }, &SchemaConfig::default())
        });
        let second = cache.get_or_compile("Broken", || unreachable!("compiled twice"));
        assert!(first.is_err());
        assert_eq!(first, second);
    }

    struct TreeNode;

    impl Interface for TreeNode {
        fn fields() -> Result<FieldMap, ConfigurationError> {
            Ok(fields! {
                "value" => integer(),
                "children" => array(reference(Self::schema_name())),
            })
        }
    }

    #[test]
    fn test_interface_self_reference() {
        assert_eq!(TreeNode::schema_name(), "TreeNode");
        let raw = serde_json::json!({
            "value": 1,
            "children": [{"value": 2, "children": []}]
        });
        let node = TreeNode::parse_json(&raw).unwrap();
        assert_eq!(node.get("value"), Some(&Value::Int(1)));

        let bad = serde_json::json!({"value": "x", "children": []});
        assert!(matches!(
            TreeNode::parse_json(&bad),
            Err(ModelError::Validation(_))
        ));
    }
}
