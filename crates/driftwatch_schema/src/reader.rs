//! SchemaReader - capability contract for live source introspectors.
//!
//! Each vendor (SQLite, Postgres, BigQuery, REST, ...) implements this
//! trait in its own crate. The mapping from native type strings to the
//! canonical [`ColumnType`](driftwatch_protocol::ColumnType) is a private
//! detail of each implementation - the comparison engine never inspects
//! it. JSON schema parsing is a separate concern (document
//! deserialization, not live introspection) and lives in [`crate::parse`].

use driftwatch_protocol::{MalformedSchemaError, TableSchema};
use thiserror::Error;

/// Errors a reader implementation can surface.
#[derive(Debug, Error)]
pub enum ReaderError {
    #[error("source unavailable: {0}")]
    Unavailable(String),

    #[error("target '{0}' not found in source")]
    TargetNotFound(String),

    #[error("vendor error: {0}")]
    Vendor(String),

    #[error("source produced a malformed schema: {0}")]
    Malformed(#[from] MalformedSchemaError),
}

/// A handle onto one addressable target of a live source. The target
/// (table name, endpoint URL, ...) is fixed at construction time.
pub trait SchemaReader {
    /// Introspect the source and return its normalized schema. The result
    /// must satisfy the structural invariants checked by
    /// [`TableSchema::validate`].
    fn read_schema(&self) -> Result<TableSchema, ReaderError>;

    /// All user-visible target names in the source.
    fn list_targets(&self) -> Result<Vec<String>, ReaderError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_protocol::{ColumnSchema, ColumnType};
    use std::collections::BTreeMap;

    /// In-memory reader over a fixed set of schemas, the shape a vendor
    /// implementation takes.
    struct FixtureReader {
        target: String,
        schemas: BTreeMap<String, TableSchema>,
    }

    impl SchemaReader for FixtureReader {
        fn read_schema(&self) -> Result<TableSchema, ReaderError> {
            let schema = self
                .schemas
                .get(&self.target)
                .cloned()
                .ok_or_else(|| ReaderError::TargetNotFound(self.target.clone()))?;
            schema.validate()?;
            Ok(schema)
        }

        fn list_targets(&self) -> Result<Vec<String>, ReaderError> {
            Ok(self.schemas.keys().cloned().collect())
        }
    }

    fn fixture(target: &str) -> FixtureReader {
        let mut schemas = BTreeMap::new();
        schemas.insert(
            "orders".to_string(),
            TableSchema::new(
                "orders",
                vec![ColumnSchema::required("id", ColumnType::Integer)],
            )
            .with_source("fixture"),
        );
        FixtureReader {
            target: target.to_string(),
            schemas,
        }
    }

    #[test]
    fn test_read_known_target() {
        let reader = fixture("orders");
        let schema = reader.read_schema().unwrap();
        assert_eq!(schema.table_name, "orders");
        assert_eq!(reader.list_targets().unwrap(), vec!["orders"]);
    }

    #[test]
    fn test_unknown_target() {
        let reader = fixture("customers");
        assert!(matches!(
            reader.read_schema(),
            Err(ReaderError::TargetNotFound(t)) if t == "customers"
        ));
    }
}
