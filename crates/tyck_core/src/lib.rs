//! # Tyck Core
//!
//! Core data structures for the Tyck schema engine.
//!
//! This crate provides the authoring side of a schema: the dynamically typed
//! [`Value`] model, immutable constraint builders, the [`ConstraintSpec`] they
//! accumulate, and the [`SchemaConfig`] consumed by the compiler in
//! `tyck_validator`.
//!
//! ## Key Concepts
//!
//! - **Builder**: an immutable value describing the type and constraints of
//!   one field; chained calls return new builders
//! - **ConstraintSpec**: the accumulated kind, predicates, transforms and
//!   metadata of a builder
//! - **FieldMap**: ordered mapping of field name to spec, the input of the
//!   compiler
//! - **ConfigurationError**: raised when a builder chain contradicts itself
//!
//! ## Example
//!
//! ```rust
//! use tyck_core::{fields, integer, string};
//!
//! let user = fields! {
//!     "id" => integer().positive()?,
//!     "name" => string().min_length(1)?.max_length(100)?,
//!     "email" => string().email(),
//! };
//!
//! assert_eq!(user.names(), vec!["id", "name", "email"]);
//! # Ok::<(), tyck_core::ConfigurationError>(())
//! ```

pub mod builder;
pub mod config;
pub mod error;
pub mod spec;
pub mod value;

pub use builder::*;
pub use config::*;
pub use error::*;
pub use spec::*;
pub use value::*;
