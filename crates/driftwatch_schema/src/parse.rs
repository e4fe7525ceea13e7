//! JSON schema documents and payload inference.
//!
//! Two distinct jobs, neither of which is live source introspection:
//!
//! - deserializing a schema *document* (a `TableSchema` that arrived as a
//!   JSON payload from an API, message bus, or file),
//! - inferring a schema from an actual data payload, used for
//!   snapshotting REST responses and detecting payload drift over time.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use driftwatch_protocol::{ColumnSchema, ColumnType, MalformedSchemaError, TableSchema};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;

/// Errors from schema parsing and inference.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a JSON object or non-empty array of objects, got {got}")]
    NotAnObject { got: &'static str },

    #[error("JSON array is empty; cannot infer a schema")]
    EmptyArray,

    #[error("parsed schema is malformed: {0}")]
    Malformed(#[from] MalformedSchemaError),
}

/// Deserialize a schema document. Column entries accept either `col_type`
/// or `type`; unrecognized type strings map to `unknown`. The result is
/// validated before it is returned.
pub fn table_schema_from_value(value: &Value) -> Result<TableSchema, ParseError> {
    let schema: TableSchema = serde_json::from_value(value.clone())?;
    schema.validate()?;
    Ok(schema)
}

/// Infer a schema from a data payload: a JSON object, or the first element
/// of a non-empty array of objects. Nested objects become struct columns.
pub fn infer_table_schema(value: &Value, table_name: &str) -> Result<TableSchema, ParseError> {
    let obj = first_object(value)?;
    let columns = obj.iter().map(|(k, v)| infer_column(k, v)).collect();
    let schema = TableSchema::new(table_name, columns)
        .with_source("json_payload")
        .with_captured_at(Utc::now().to_rfc3339());
    schema.validate()?;
    Ok(schema)
}

/// Read a JSON file and infer a schema from its payload.
pub fn infer_from_json_file(path: &Path, table_name: &str) -> Result<TableSchema, ParseError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let value: Value = serde_json::from_str(&raw)?;
    infer_table_schema(&value, table_name)
}

fn first_object(value: &Value) -> Result<&serde_json::Map<String, Value>, ParseError> {
    match value {
        Value::Object(map) => Ok(map),
        Value::Array(items) => match items.first() {
            Some(Value::Object(map)) => Ok(map),
            Some(other) => Err(ParseError::NotAnObject {
                got: type_name(other),
            }),
            None => Err(ParseError::EmptyArray),
        },
        other => Err(ParseError::NotAnObject {
            got: type_name(other),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn infer_column(name: &str, value: &Value) -> ColumnSchema {
    if let Value::Object(map) = value {
        let fields = map.iter().map(|(k, v)| infer_column(k, v)).collect();
        return ColumnSchema::nested(name, fields);
    }
    let mut col = ColumnSchema::required(name, infer_type(value));
    col.nullable = value.is_null();
    col
}

fn infer_type(value: &Value) -> ColumnType {
    match value {
        Value::Null => ColumnType::Unknown,
        Value::Bool(_) => ColumnType::Boolean,
        Value::Number(n) if n.is_i64() || n.is_u64() => ColumnType::Integer,
        Value::Number(_) => ColumnType::Float,
        Value::Array(_) => ColumnType::Array,
        Value::String(s) => {
            if is_iso_timestamp(s) {
                ColumnType::Timestamp
            } else if is_iso_date(s) {
                ColumnType::Date
            } else {
                ColumnType::Varchar
            }
        }
        Value::Object(_) => ColumnType::Struct,
    }
}

fn is_iso_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

fn is_iso_timestamp(s: &str) -> bool {
    DateTime::parse_from_rfc3339(s).is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f").is_ok()
}
