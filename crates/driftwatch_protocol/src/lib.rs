//! Canonical schema payload types shared across Driftwatch crates.
//!
//! Everything a schema reader produces or a drift consumer receives is
//! defined here: the closed [`ColumnType`] enumeration, the structural
//! schema types ([`ColumnSchema`], [`TableSchema`]), the diff result model
//! ([`SchemaDiff`]), the vendor-agnostic widening relation, and the uniform
//! [`ToolOutcome`] envelope used at automation boundaries.
//!
//! This crate is pure data: no I/O, no clock, no global state. The drift
//! engine itself lives in `driftwatch_schema`.

pub mod diff;
pub mod outcome;
pub mod types;
pub mod widening;

pub use diff::{Change, ChangeKind, ChangeSeverity, SchemaDiff};
pub use outcome::ToolOutcome;
pub use types::{ColumnSchema, ColumnType, MalformedSchemaError, TableSchema};
pub use widening::{extract_length, is_safe_widening};
