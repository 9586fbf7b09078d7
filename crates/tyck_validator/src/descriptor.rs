//! Compiled schema descriptors.
//!
//! Compilation turns a [`FieldMap`](tyck_core::FieldMap) into records stored
//! in an [`Arena`]. Nested and recursive records refer to each other by
//! [`RecordId`], so a self-referential schema is a plain index rather than an
//! ownership cycle. A [`RecordDescriptor`] is a cheap handle: an `Arc` on the
//! arena plus the id of the root record.
//!
//! Descriptors are immutable. Schema operations in [`crate::transform`]
//! produce new arenas and never touch an existing one, so descriptors can be
//! shared across threads and validated concurrently.

use std::fmt;
use std::sync::Arc;
use tyck_core::{ConstraintSpec, ExtraPolicy, RecordId, SchemaConfig};

/// A compiled field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    pub(crate) name: String,
    pub(crate) spec: ConstraintSpec<RecordId>,
    pub(crate) required: bool,
    pub(crate) alias: Option<String>,
}

impl FieldDescriptor {
    /// Declared field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Compiled value spec.
    pub fn spec(&self) -> &ConstraintSpec<RecordId> {
        &self.spec
    }

    /// Whether input must contain the field.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Effective input alias (explicit or generated by the alias strategy).
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    /// Key used when serializing by alias.
    pub fn output_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// A compiled record.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RecordDef {
    pub(crate) name: String,
    pub(crate) fields: Vec<FieldDescriptor>,
    pub(crate) config: SchemaConfig,
}

impl RecordDef {
    pub(crate) fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Storage for every record reachable from one compilation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arena {
    pub(crate) records: Vec<RecordDef>,
}

impl Arena {
    pub(crate) fn get(&self, id: RecordId) -> Option<&RecordDef> {
        self.records.get(id.0)
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Looks up a record id by record name.
    pub fn find(&self, name: &str) -> Option<RecordId> {
        self.records
            .iter()
            .position(|r| r.name == name)
            .map(RecordId)
    }
}

/// Handle on a compiled record.
///
/// Cloning is cheap. Two handles compare equal when they describe the same
/// record structure.
#[derive(Clone)]
pub struct RecordDescriptor {
    pub(crate) arena: Arc<Arena>,
    pub(crate) id: RecordId,
}

impl RecordDescriptor {
    pub(crate) fn new(arena: Arc<Arena>, id: RecordId) -> Self {
        Self { arena, id }
    }

    /// Returns the record definition. Ids are only ever created by the
    /// compiler and transforms, which guarantee they are in range.
    pub(crate) fn def(&self) -> &RecordDef {
        &self.arena.records[self.id.0]
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.def().name
    }

    /// Fields in declaration order.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.def().fields
    }

    /// Looks up a field by declared name.
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.def().field(name)
    }

    /// Field names in declaration order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields().iter().map(|f| f.name.as_str()).collect()
    }

    /// Configuration the record was compiled with.
    pub fn config(&self) -> &SchemaConfig {
        &self.def().config
    }

    /// Extra-field policy of this record.
    pub fn extra(&self) -> ExtraPolicy {
        self.def().config.extra
    }

    /// The arena this record lives in.
    pub fn arena(&self) -> &Arc<Arena> {
        &self.arena
    }

    /// Root record id inside the arena.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Handle on another record of the same arena, e.g. the target of a
    /// nested record field.
    pub fn record(&self, id: RecordId) -> Option<RecordDescriptor> {
        self.arena
            .get(id)
            .map(|_| RecordDescriptor::new(Arc::clone(&self.arena), id))
    }
}

impl fmt::Debug for RecordDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordDescriptor")
            .field("name", &self.name())
            .field("fields", &self.field_names())
            .finish()
    }
}

impl PartialEq for RecordDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && (Arc::ptr_eq(&self.arena, &other.arena) || self.arena == other.arena)
    }
}

/// A compiled standalone value spec, such as a return type or a validated
/// attribute.
#[derive(Clone)]
pub struct ValueDescriptor {
    pub(crate) arena: Arc<Arena>,
    pub(crate) spec: ConstraintSpec<RecordId>,
    pub(crate) config: SchemaConfig,
}

impl ValueDescriptor {
    pub fn spec(&self) -> &ConstraintSpec<RecordId> {
        &self.spec
    }

    pub fn config(&self) -> &SchemaConfig {
        &self.config
    }

    /// Handle on a record referenced by this value's spec.
    pub fn record(&self, id: RecordId) -> Option<RecordDescriptor> {
        self.arena
            .get(id)
            .map(|_| RecordDescriptor::new(Arc::clone(&self.arena), id))
    }
}

impl fmt::Debug for ValueDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueDescriptor")
            .field("kind", &self.spec.kind.name())
            .field("records", &self.arena.len())
            .finish()
    }
}
