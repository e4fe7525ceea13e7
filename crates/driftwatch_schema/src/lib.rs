//! Schema Drift Detection
//!
//! # Philosophy: a baseline is a commitment
//!
//! The drift lifecycle in Driftwatch:
//!
//! 1. **Acquisition**: a reader introspects a source and produces a
//!    normalized [`TableSchema`]
//! 2. **Baseline**: the schema is registered as the known-good version
//! 3. **Observation**: a fresh schema is acquired later
//! 4. **Comparison**: [`compare`] walks both column trees in lock-step and
//!    classifies every elementary change
//! 5. **Routing**: SAFE changes can be re-registered, WARNING ones need
//!    review, BREAKING ones must never be auto-applied
//!
//! The comparison engine is pure and deterministic: no I/O, no clock, no
//! shared state. Concurrent callers need no coordination. Everything that
//! touches the filesystem lives in [`registry`] and [`parse`].
//!
//! # Modules
//!
//! - [`compare`]: the recursive diff engine and severity classification
//! - [`registry`]: file-based versioned baseline store
//! - [`reader`]: capability contract for vendor schema readers
//! - [`parse`]: JSON schema documents and payload inference

pub mod compare;
pub mod parse;
pub mod reader;
pub mod registry;

pub use driftwatch_protocol::{
    Change, ChangeKind, ChangeSeverity, ColumnSchema, ColumnType, MalformedSchemaError,
    SchemaDiff, TableSchema, ToolOutcome, is_safe_widening,
};

pub use compare::{compare, compare_cross_table, CompareError};
pub use parse::{infer_from_json_file, infer_table_schema, table_schema_from_value, ParseError};
pub use reader::{ReaderError, SchemaReader};
pub use registry::{RegisteredVersion, RegistryError, SchemaRegistry, Version};
