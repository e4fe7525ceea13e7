//! Canonical type system and structural schema types.
//!
//! Vendor readers map native type strings into exactly one [`ColumnType`]
//! before a schema ever reaches the comparison engine. The engine never
//! sees a raw vendor type.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Canonical column types
// ============================================================================

/// Normalized column type - the closed set of kinds every vendor maps into.
/// This is the CANONICAL definition - use this everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColumnType {
    Integer,
    BigInt,
    Float,
    Decimal,
    Varchar,
    Text,
    Boolean,
    Date,
    Timestamp,
    Json,
    Array,
    /// Nested record with its own typed sub-columns (`ColumnSchema::fields`).
    Struct,
    /// Fallback for anything a reader could not classify.
    #[default]
    Unknown,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::Integer => "integer",
            ColumnType::BigInt => "bigint",
            ColumnType::Float => "float",
            ColumnType::Decimal => "decimal",
            ColumnType::Varchar => "varchar",
            ColumnType::Text => "text",
            ColumnType::Boolean => "boolean",
            ColumnType::Date => "date",
            ColumnType::Timestamp => "timestamp",
            ColumnType::Json => "json",
            ColumnType::Array => "array",
            ColumnType::Struct => "struct",
            ColumnType::Unknown => "unknown",
        }
    }

    /// Lenient mapping for reader-side normalization: case-insensitive,
    /// ignores a trailing facet like `varchar(255)`, and maps anything
    /// unrecognized to [`ColumnType::Unknown`] instead of failing.
    pub fn from_normalized(raw: &str) -> Self {
        let cleaned = raw.trim().to_ascii_lowercase();
        let base = match cleaned.find('(') {
            Some(idx) => cleaned[..idx].trim_end().to_string(),
            None => cleaned,
        };
        base.parse().unwrap_or(ColumnType::Unknown)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ColumnType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "integer" => Ok(ColumnType::Integer),
            "bigint" => Ok(ColumnType::BigInt),
            "float" => Ok(ColumnType::Float),
            "decimal" => Ok(ColumnType::Decimal),
            "varchar" => Ok(ColumnType::Varchar),
            "text" => Ok(ColumnType::Text),
            "boolean" => Ok(ColumnType::Boolean),
            "date" => Ok(ColumnType::Date),
            "timestamp" => Ok(ColumnType::Timestamp),
            "json" => Ok(ColumnType::Json),
            "array" => Ok(ColumnType::Array),
            "struct" => Ok(ColumnType::Struct),
            "unknown" => Ok(ColumnType::Unknown),
            _ => Err(format!("Invalid column type: '{}'", s)),
        }
    }
}

impl Serialize for ColumnType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// Schema documents arrive from external sources; an unrecognized type
// string deserializes to Unknown rather than rejecting the whole document.
impl<'de> Deserialize<'de> for ColumnType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ColumnType::from_normalized(&raw))
    }
}

// ============================================================================
// Structural schema types
// ============================================================================

/// One column definition. `fields` is non-empty iff `col_type` is
/// [`ColumnType::Struct`]; the containment relation is an owned tree, so a
/// column can never (directly or transitively) contain itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,

    #[serde(rename = "col_type", alias = "type")]
    pub col_type: ColumnType,

    #[serde(default = "default_true")]
    pub nullable: bool,

    /// Maximum length, meaningful for varchar. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,

    /// Total digits, meaningful for decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,

    /// Fractional digits, meaningful for decimal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<u32>,

    /// Default literal or expression, opaque beyond equality comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Free text, never affects comparison.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Sub-columns for struct columns.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<ColumnSchema>,
}

fn default_true() -> bool {
    true
}

impl ColumnSchema {
    /// Create a new required (non-nullable) column.
    pub fn required(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            col_type,
            nullable: false,
            max_length: None,
            precision: None,
            scale: None,
            default_value: None,
            description: None,
            fields: Vec::new(),
        }
    }

    /// Create a new optional (nullable) column.
    pub fn optional(name: impl Into<String>, col_type: ColumnType) -> Self {
        Self {
            nullable: true,
            ..Self::required(name, col_type)
        }
    }

    /// Create a struct column from its sub-columns.
    pub fn nested(name: impl Into<String>, fields: Vec<ColumnSchema>) -> Self {
        Self {
            fields,
            ..Self::required(name, ColumnType::Struct)
        }
    }

    /// Set the maximum length (varchar).
    pub fn with_length(mut self, max_length: u32) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// Set precision and scale (decimal).
    pub fn with_precision(mut self, precision: u32, scale: u32) -> Self {
        self.precision = Some(precision);
        self.scale = Some(scale);
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default_value = Some(default.into());
        self
    }

    /// Set the description.
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// A named ordered sequence of columns - conceptually the root level is
/// itself an implicit struct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableSchema {
    pub table_name: String,

    pub columns: Vec<ColumnSchema>,

    /// Names of top-level columns the source partitions by.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub partition_keys: Vec<String>,

    /// Names of top-level columns the source clusters by.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clustering_keys: Vec<String>,

    /// Vendor identifier ("sqlite", "snowflake", "json_payload", ...).
    #[serde(default = "default_source")]
    pub source: String,

    /// RFC 3339 capture stamp, doubles as the registry version key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<String>,
}

fn default_source() -> String {
    "unknown".to_string()
}

impl TableSchema {
    /// Create a new table schema.
    pub fn new(table_name: impl Into<String>, columns: Vec<ColumnSchema>) -> Self {
        Self {
            table_name: table_name.into(),
            columns,
            partition_keys: Vec::new(),
            clustering_keys: Vec::new(),
            source: default_source(),
            captured_at: None,
        }
    }

    /// Set the partition key column names.
    pub fn with_partition_keys(mut self, keys: Vec<String>) -> Self {
        self.partition_keys = keys;
        self
    }

    /// Set the clustering key column names.
    pub fn with_clustering_keys(mut self, keys: Vec<String>) -> Self {
        self.clustering_keys = keys;
        self
    }

    /// Set the source vendor identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Set the capture stamp.
    pub fn with_captured_at(mut self, captured_at: impl Into<String>) -> Self {
        self.captured_at = Some(captured_at.into());
        self
    }

    /// Top-level columns keyed by name.
    pub fn column_map(&self) -> HashMap<&str, &ColumnSchema> {
        self.columns.iter().map(|c| (c.name.as_str(), c)).collect()
    }

    /// Check the structural invariants: unique sibling names at every
    /// nesting level, struct columns carry fields, non-struct columns do
    /// not, and partition/clustering keys name existing top-level columns.
    pub fn validate(&self) -> Result<(), MalformedSchemaError> {
        validate_level(&self.columns, "")?;

        let names = self.column_map();
        for key in &self.partition_keys {
            if !names.contains_key(key.as_str()) {
                return Err(MalformedSchemaError::UnknownKeyColumn {
                    key_kind: "partition",
                    name: key.clone(),
                });
            }
        }
        for key in &self.clustering_keys {
            if !names.contains_key(key.as_str()) {
                return Err(MalformedSchemaError::UnknownKeyColumn {
                    key_kind: "clustering",
                    name: key.clone(),
                });
            }
        }
        Ok(())
    }
}

fn validate_level(columns: &[ColumnSchema], prefix: &str) -> Result<(), MalformedSchemaError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(columns.len());
    for col in columns {
        let path = qualify(prefix, &col.name);
        if !seen.insert(col.name.as_str()) {
            return Err(MalformedSchemaError::DuplicateColumn { path });
        }
        match col.col_type {
            ColumnType::Struct => {
                if col.fields.is_empty() {
                    return Err(MalformedSchemaError::EmptyStruct { path });
                }
                validate_level(&col.fields, &path)?;
            }
            other => {
                if !col.fields.is_empty() {
                    return Err(MalformedSchemaError::UnexpectedFields {
                        path,
                        col_type: other,
                    });
                }
            }
        }
    }
    Ok(())
}

/// Dot-qualify a column name under a (possibly empty) parent path.
pub fn qualify(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

/// A schema that violates the structural invariants. Raised by
/// [`TableSchema::validate`] before any comparison begins - never mid-walk.
#[derive(Debug, Error)]
pub enum MalformedSchemaError {
    #[error("duplicate column name at '{path}'")]
    DuplicateColumn { path: String },

    #[error("struct column '{path}' has no fields")]
    EmptyStruct { path: String },

    #[error("non-struct column '{path}' ({col_type}) carries nested fields")]
    UnexpectedFields { path: String, col_type: ColumnType },

    #[error("{key_kind} key '{name}' does not name a top-level column")]
    UnknownKeyColumn { key_kind: &'static str, name: String },
}
