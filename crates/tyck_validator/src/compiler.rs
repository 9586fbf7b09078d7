//! Schema compiler.
//!
//! Turns field maps into descriptors:
//! - resolves named and self-referential record references to arena ids
//! - computes requiredness and effective aliases per field
//! - rejects alias collisions and defaults that fail their own spec
//!
//! Compilation is deterministic: the same field map and configuration always
//! yield structurally equal descriptors.

use crate::descriptor::{Arena, FieldDescriptor, RecordDef, RecordDescriptor, ValueDescriptor};
use crate::engine;
use crate::SchemaConfigurationError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use tracing::debug;
use tyck_core::{ConstraintSpec, FieldMap, Kind, RecordId, RecordSource, SchemaConfig};

type Result<T> = std::result::Result<T, SchemaConfigurationError>;

/// Name given to a record compiled without a title.
pub const DEFAULT_RECORD_NAME: &str = "Model";

/// Compiles a field map into a record descriptor.
///
/// The record is named after `config.title`, or [`DEFAULT_RECORD_NAME`].
pub fn compile(fields: &FieldMap, config: &SchemaConfig) -> Result<RecordDescriptor> {
    let name = config
        .title
        .clone()
        .unwrap_or_else(|| DEFAULT_RECORD_NAME.to_string());
    compile_named(&name, fields, config)
}

/// Compiles a field map under an explicit record name, so that its fields
/// may refer back to it with `reference(name)`.
pub fn compile_named(
    name: &str,
    fields: &FieldMap,
    config: &SchemaConfig,
) -> Result<RecordDescriptor> {
    Compiler::new(config.clone())
        .define(name, fields.clone())
        .compile(name)
}

/// Compiles a standalone value spec (e.g. a return type).
pub fn compile_value(
    spec: impl Into<ConstraintSpec>,
    config: &SchemaConfig,
) -> Result<ValueDescriptor> {
    Compiler::new(config.clone()).compile_value(&spec.into())
}

#[derive(Debug, Clone)]
struct Definition {
    name: String,
    fields: Arc<FieldMap>,
    config: Option<SchemaConfig>,
}

/// Compiler for a set of named, possibly mutually recursive, records.
///
/// ```rust
/// use tyck_core::{array, fields, integer, reference, SchemaConfig};
/// use tyck_validator::Compiler;
///
/// let node = fields! {
///     "value" => integer(),
///     "children" => array(reference("Node")),
/// };
/// let descriptor = Compiler::new(SchemaConfig::default())
///     .define("Node", node)
///     .compile("Node")
///     .unwrap();
/// assert_eq!(descriptor.name(), "Node");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: SchemaConfig,
    definitions: Vec<Definition>,
}

impl Compiler {
    /// Creates a compiler whose records default to `config`.
    pub fn new(config: SchemaConfig) -> Self {
        Self {
            config,
            definitions: Vec::new(),
        }
    }

    /// Adds a named record definition.
    pub fn define(mut self, name: impl Into<String>, fields: FieldMap) -> Self {
        self.definitions.push(Definition {
            name: name.into(),
            fields: Arc::new(fields),
            config: None,
        });
        self
    }

    /// Adds a named record definition with its own configuration.
    pub fn define_with_config(
        mut self,
        name: impl Into<String>,
        fields: FieldMap,
        config: SchemaConfig,
    ) -> Self {
        self.definitions.push(Definition {
            name: name.into(),
            fields: Arc::new(fields),
            config: Some(config),
        });
        self
    }

    /// Compiles every definition and returns a handle on `root`.
    pub fn compile(&self, root: &str) -> Result<RecordDescriptor> {
        let session = self.session()?;
        let id = session
            .names
            .get(root)
            .copied()
            .ok_or_else(|| SchemaConfigurationError::unresolved(root, "(root)"))?;
        let mut arena = session.finish()?;
        check_defaults(&mut arena)?;

        let descriptor = RecordDescriptor::new(Arc::new(arena), id);
        debug!(
            record = %descriptor.name(),
            fields = descriptor.fields().len(),
            records = descriptor.arena().len(),
            "Compiled schema"
        );
        Ok(descriptor)
    }

    /// Compiles a standalone value spec against the definitions.
    pub fn compile_value(&self, spec: &ConstraintSpec) -> Result<ValueDescriptor> {
        let mut session = self.session()?;
        session.scan_spec(spec, &self.config)?;
        let context = Context {
            record: "value",
            field: "value",
            config: &self.config,
        };
        let mut compiled =
            spec.try_map_records(&mut |source| session.resolve(source, &context))?;
        let mut arena = session.finish()?;
        check_defaults(&mut arena)?;

        if let Some(default) = &compiled.default {
            let value = engine::check_value(&arena, &compiled, default, &self.config).map_err(
                |report| SchemaConfigurationError::InvalidDefault {
                    record: "value".to_string(),
                    field: "value".to_string(),
                    message: first_message(&report),
                },
            )?;
            compiled.default = Some(value);
        }
        let arena = Arc::new(arena);

        debug!(kind = compiled.kind.name(), records = arena.len(), "Compiled value spec");
        Ok(ValueDescriptor {
            arena,
            spec: compiled,
            config: self.config.clone(),
        })
    }

    fn session(&self) -> Result<Session> {
        let mut session = Session::default();
        for definition in &self.definitions {
            let config = definition
                .config
                .clone()
                .unwrap_or_else(|| self.config.clone());
            session.declare(&definition.name, &definition.fields, config)?;
        }
        for definition in &self.definitions {
            let config = definition.config.as_ref().unwrap_or(&self.config);
            session.scan_fields(&definition.fields, config)?;
        }
        Ok(session)
    }
}

struct Pending {
    id: RecordId,
    name: String,
    fields: Arc<FieldMap>,
    config: SchemaConfig,
}

struct Context<'a> {
    record: &'a str,
    field: &'a str,
    config: &'a SchemaConfig,
}

#[derive(Default)]
struct Session {
    names: HashMap<String, RecordId>,
    sources: HashMap<String, Arc<FieldMap>>,
    slots: Vec<Option<RecordDef>>,
    pending: Vec<Pending>,
}

impl Session {
    fn allocate(&mut self) -> RecordId {
        self.slots.push(None);
        RecordId(self.slots.len() - 1)
    }

    /// Reserves an id for a named record and queues it for compilation.
    fn declare(&mut self, name: &str, fields: &Arc<FieldMap>, config: SchemaConfig) -> Result<()> {
        match self.sources.entry(name.to_string()) {
            Entry::Occupied(existing) => {
                if Arc::ptr_eq(existing.get(), fields) || **existing.get() == **fields {
                    return Ok(());
                }
                Err(SchemaConfigurationError::DuplicateDefinition(
                    name.to_string(),
                ))
            }
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(fields));
                let id = self.allocate();
                self.names.insert(name.to_string(), id);
                self.pending.push(Pending {
                    id,
                    name: name.to_string(),
                    fields: Arc::clone(fields),
                    config,
                });
                Ok(())
            }
        }
    }

    /// Registers named inline records ahead of resolution so references
    /// may precede the declaration.
    fn scan_fields(&mut self, fields: &FieldMap, config: &SchemaConfig) -> Result<()> {
        for (_, spec) in fields.iter() {
            self.scan_spec(spec, config)?;
        }
        Ok(())
    }

    fn scan_spec(&mut self, spec: &ConstraintSpec, config: &SchemaConfig) -> Result<()> {
        match &spec.kind {
            Kind::Primitive(_) | Kind::Literal(_) | Kind::Enum(_) => Ok(()),
            Kind::Array(item) | Kind::Set(item) | Kind::Optional(item) => {
                self.scan_spec(item, config)
            }
            Kind::Dict { keys, values } => {
                self.scan_spec(keys, config)?;
                self.scan_spec(values, config)
            }
            Kind::Tuple(items) | Kind::Union(items) => {
                for item in items {
                    self.scan_spec(item, config)?;
                }
                Ok(())
            }
            Kind::Record(RecordSource::Named(_)) => Ok(()),
            Kind::Record(RecordSource::Inline { name, fields }) => {
                if let Some(name) = name {
                    let known = self.sources.contains_key(name);
                    self.declare(name, fields, config.clone())?;
                    if known {
                        return Ok(());
                    }
                }
                self.scan_fields(fields, config)
            }
        }
    }

    fn resolve(&mut self, source: &RecordSource, context: &Context<'_>) -> Result<RecordId> {
        match source {
            RecordSource::Named(name) | RecordSource::Inline { name: Some(name), .. } => {
                self.names.get(name).copied().ok_or_else(|| {
                    SchemaConfigurationError::unresolved(
                        name.as_str(),
                        format!("{}.{}", context.record, context.field),
                    )
                })
            }
            RecordSource::Inline { name: None, fields } => {
                let id = self.allocate();
                self.pending.push(Pending {
                    id,
                    name: format!("{}.{}", context.record, context.field),
                    fields: Arc::clone(fields),
                    config: context.config.clone(),
                });
                Ok(id)
            }
        }
    }

    fn compile_record(&mut self, pending: Pending) -> Result<()> {
        let mut fields = Vec::with_capacity(pending.fields.len());
        for (name, spec) in pending.fields.iter() {
            let context = Context {
                record: &pending.name,
                field: name,
                config: &pending.config,
            };
            let compiled = spec.try_map_records(&mut |source| self.resolve(source, &context))?;
            let alias = spec
                .alias
                .clone()
                .or_else(|| pending.config.alias_strategy.apply(name));
            fields.push(FieldDescriptor {
                name: name.to_string(),
                required: compiled.is_required(),
                spec: compiled,
                alias,
            });
        }
        check_aliases(&pending.name, &fields, pending.config.populate_by_name)?;

        self.slots[pending.id.0] = Some(RecordDef {
            name: pending.name,
            fields,
            config: pending.config,
        });
        Ok(())
    }

    /// Compiles every queued record and assembles the arena.
    fn finish(mut self) -> Result<Arena> {
        while let Some(pending) = self.pending.pop() {
            self.compile_record(pending)?;
        }
        let records = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.ok_or_else(|| {
                    SchemaConfigurationError::unresolved(format!("#{index}"), "(arena)")
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Arena { records })
    }
}

/// Rejects records where two fields accept the same input key.
pub(crate) fn check_aliases(
    record: &str,
    fields: &[FieldDescriptor],
    populate_by_name: bool,
) -> Result<()> {
    let mut seen: HashMap<&str, &str> = HashMap::new();
    for field in fields {
        let mut keys = Vec::with_capacity(2);
        match &field.alias {
            Some(alias) => {
                keys.push(alias.as_str());
                if populate_by_name {
                    keys.push(field.name.as_str());
                }
            }
            None => keys.push(field.name.as_str()),
        }
        for key in keys {
            if let Some(first) = seen.insert(key, &field.name) {
                if first != field.name {
                    return Err(SchemaConfigurationError::AliasCollision {
                        record: record.to_string(),
                        key: key.to_string(),
                        first: first.to_string(),
                        second: field.name.clone(),
                    });
                }
            }
        }
    }
    Ok(())
}

/// Validates every declared default against its own field spec and replaces
/// it with the validated output, so an absent field yields the same value
/// the field would produce for that input.
pub(crate) fn check_defaults(arena: &mut Arena) -> Result<()> {
    let mut checked = Vec::new();
    for (r, record) in arena.records.iter().enumerate() {
        for (f, field) in record.fields.iter().enumerate() {
            let Some(default) = &field.spec.default else {
                continue;
            };
            let value = engine::check_value(arena, &field.spec, default, &record.config)
                .map_err(|report| SchemaConfigurationError::InvalidDefault {
                    record: record.name.clone(),
                    field: field.name.clone(),
                    message: first_message(&report),
                })?;
            checked.push((r, f, value));
        }
    }

    for (r, f, value) in checked {
        if let Some(field) = arena
            .records
            .get_mut(r)
            .and_then(|record| record.fields.get_mut(f))
        {
            field.spec.default = Some(value);
        }
    }
    Ok(())
}

fn first_message(report: &crate::ValidationReport) -> String {
    report
        .errors()
        .first()
        .map(|e| e.message.clone())
        .unwrap_or_default()
}
