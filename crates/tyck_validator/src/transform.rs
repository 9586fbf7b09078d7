//! Schema algebra.
//!
//! Derives new descriptors from existing ones. Operands are never modified;
//! every operation returns a fresh descriptor and keeps the field order of
//! its operand(s).
//!
//! | Operation            | Result                                            |
//! |----------------------|---------------------------------------------------|
//! | [`select_subset`]    | only the named fields                             |
//! | [`select_without`]   | every field except the named ones                 |
//! | [`make_all_optional`]| every field optional                              |
//! | [`make_optional`]    | the named fields optional                         |
//! | [`make_all_required`]| every field required, defaults dropped            |
//! | [`make_required`]    | the named fields required                         |
//! | [`merge`]            | fields of both; the right operand wins on clashes |
//! | [`add_fields`]       | `merge` with a freshly compiled field map         |

use crate::compiler::{check_aliases, check_defaults, compile_named};
use crate::descriptor::{Arena, FieldDescriptor, RecordDef, RecordDescriptor};
use crate::SchemaConfigurationError;
use std::sync::Arc;
use tracing::debug;
use tyck_core::{FieldMap, RecordId};

type Result<T> = std::result::Result<T, SchemaConfigurationError>;

/// Keeps only the named fields.
pub fn select_subset(descriptor: &RecordDescriptor, names: &[&str]) -> Result<RecordDescriptor> {
    check_names(descriptor, names)?;
    rebuild(descriptor, "pick", |fields| {
        fields.retain(|f| names.contains(&f.name.as_str()));
        Ok(())
    })
}

/// Drops the named fields.
pub fn select_without(descriptor: &RecordDescriptor, names: &[&str]) -> Result<RecordDescriptor> {
    check_names(descriptor, names)?;
    rebuild(descriptor, "omit", |fields| {
        fields.retain(|f| !names.contains(&f.name.as_str()));
        Ok(())
    })
}

/// Makes every field optional and nullable.
pub fn make_all_optional(descriptor: &RecordDescriptor) -> RecordDescriptor {
    rebuild_infallible(descriptor, "make_optional", |fields| {
        fields.iter_mut().for_each(relax)
    })
}

/// Makes the named fields optional and nullable.
pub fn make_optional(descriptor: &RecordDescriptor, names: &[&str]) -> Result<RecordDescriptor> {
    check_names(descriptor, names)?;
    rebuild(descriptor, "make_optional", |fields| {
        fields
            .iter_mut()
            .filter(|f| names.contains(&f.name.as_str()))
            .for_each(relax);
        Ok(())
    })
}

/// Makes every field required. Defaults are dropped; null stays accepted
/// where the field spec accepts it.
pub fn make_all_required(descriptor: &RecordDescriptor) -> RecordDescriptor {
    rebuild_infallible(descriptor, "make_required", |fields| {
        fields.iter_mut().for_each(require)
    })
}

/// Makes the named fields required.
pub fn make_required(descriptor: &RecordDescriptor, names: &[&str]) -> Result<RecordDescriptor> {
    check_names(descriptor, names)?;
    rebuild(descriptor, "make_required", |fields| {
        fields
            .iter_mut()
            .filter(|f| names.contains(&f.name.as_str()))
            .for_each(require);
        Ok(())
    })
}

/// Combines the fields of `left` and `right`.
///
/// Fields keep `left`'s order; a field present in both takes `right`'s
/// definition at `left`'s position, and fields only in `right` follow in
/// `right`'s order. The result keeps `left`'s name and configuration.
pub fn merge(left: &RecordDescriptor, right: &RecordDescriptor) -> Result<RecordDescriptor> {
    let offset = left.arena.len();
    let shift = |id: &RecordId| -> std::result::Result<RecordId, SchemaConfigurationError> {
        Ok(RecordId(id.0 + offset))
    };

    let mut records = left.arena.records.clone();
    for record in &right.arena.records {
        let mut shifted = record.clone();
        for field in &mut shifted.fields {
            field.spec = field.spec.try_map_records(&mut |id| shift(id))?;
        }
        records.push(shifted);
    }

    let mut fields = left.fields().to_vec();
    for field in right.fields() {
        let mut incoming = field.clone();
        incoming.spec = field.spec.try_map_records(&mut |id| shift(id))?;
        match fields.iter_mut().find(|f| f.name == incoming.name) {
            Some(existing) => *existing = incoming,
            None => fields.push(incoming),
        }
    }

    let mut root = left.def().clone();
    check_aliases(&root.name, &fields, root.config.populate_by_name)?;
    root.fields = fields;
    let id = RecordId(records.len());
    records.push(root);

    let mut arena = Arena { records };
    check_defaults(&mut arena)?;
    debug!(
        left = %left.name(),
        right = %right.name(),
        "Merged schemas"
    );
    Ok(RecordDescriptor::new(Arc::new(arena), id))
}

/// Compiles `fields` and merges them into `descriptor`.
///
/// The new fields are compiled under `descriptor`'s configuration; a field
/// that already exists is replaced.
pub fn add_fields(descriptor: &RecordDescriptor, fields: &FieldMap) -> Result<RecordDescriptor> {
    let addition = compile_named(descriptor.name(), fields, descriptor.config())?;
    merge(descriptor, &addition)
}

fn check_names(descriptor: &RecordDescriptor, names: &[&str]) -> Result<()> {
    match names.iter().find(|name| descriptor.field(name).is_none()) {
        Some(unknown) => Err(SchemaConfigurationError::unknown_field(
            descriptor.name(),
            *unknown,
        )),
        None => Ok(()),
    }
}

fn relax(field: &mut FieldDescriptor) {
    field.spec.optional = true;
    field.spec.nullable = true;
    field.required = false;
}

fn require(field: &mut FieldDescriptor) {
    field.spec.optional = false;
    field.spec.default = None;
    field.required = true;
}

/// Copies the arena and appends an edited copy of the root record.
///
/// The operand's own slot is left as is, so references to it from nested
/// fields keep describing the original record.
fn rebuild<F>(descriptor: &RecordDescriptor, operation: &str, edit: F) -> Result<RecordDescriptor>
where
    F: FnOnce(&mut Vec<FieldDescriptor>) -> Result<()>,
{
    let mut root = descriptor.def().clone();
    edit(&mut root.fields)?;
    Ok(append_root(descriptor, root, operation))
}

fn rebuild_infallible<F>(descriptor: &RecordDescriptor, operation: &str, edit: F) -> RecordDescriptor
where
    F: FnOnce(&mut Vec<FieldDescriptor>),
{
    let mut root = descriptor.def().clone();
    edit(&mut root.fields);
    append_root(descriptor, root, operation)
}

fn append_root(descriptor: &RecordDescriptor, root: RecordDef, operation: &str) -> RecordDescriptor {
    debug!(record = %root.name, operation, fields = root.fields.len(), "Derived schema");
    let mut records = descriptor.arena.records.clone();
    let id = RecordId(records.len());
    records.push(root);
    RecordDescriptor::new(Arc::new(Arena { records }), id)
}
