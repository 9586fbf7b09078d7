//! # Tyck Validator
//!
//! Schema compiler and validation engine for Tyck. This crate turns the
//! field maps authored with `tyck_core` builders into immutable descriptors
//! and validates untrusted input against them:
//!
//! - Compilation (reference resolution, aliases, default checks)
//! - Validation (coercion, predicates, aggregated error reports)
//! - Schema algebra (pick, omit, optional/required, merge)
//! - Call validation (argument and return checking around a callable)
//! - Declared model types with a compile-once cache
//!
//! ## Example
//!
//! ```rust
//! use tyck_core::{fields, integer, string, ExtraPolicy, SchemaConfig, Value};
//! use tyck_validator::{compile, validate, ErrorKind};
//!
//! let user = compile(
//!     &fields! {
//!         "id" => integer().positive().unwrap(),
//!         "name" => string().min_length(1).unwrap(),
//!     },
//!     &SchemaConfig::default().with_extra(ExtraPolicy::Forbid),
//! )
//! .unwrap();
//!
//! let raw = Value::map([
//!     ("id", Value::from(1)),
//!     ("name", Value::from("a")),
//!     ("x", Value::from(1)),
//! ]);
//! match validate(&user, &raw) {
//!     Ok(record) => println!("Valid: {record}"),
//!     Err(report) => {
//!         assert_eq!(report.errors()[0].kind, ErrorKind::UnknownField);
//!     }
//! }
//! ```

mod cache;
mod call;
mod coerce;
mod compiler;
mod constraints;
mod descriptor;
mod engine;
mod error;
mod record;
mod report;
pub mod transform;

pub use cache::*;
pub use call::*;
pub use compiler::{Compiler, DEFAULT_RECORD_NAME, compile, compile_named, compile_value};
pub use descriptor::*;
pub use engine::{validate, validate_json, validate_value};
pub use error::*;
pub use record::*;
pub use report::*;
pub use transform::{
    add_fields, make_all_optional, make_all_required, make_optional, make_required, merge,
    select_subset, select_without,
};
