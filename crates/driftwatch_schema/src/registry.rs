//! Schema Registry
//!
//! File-based store for versioned baseline schemas: one JSON document per
//! table, holding an append-only list of captured versions. The capture
//! stamp doubles as the version key. The comparison engine never touches
//! this module - callers fetch a baseline here and hand it to `compare`.

use chrono::Utc;
use driftwatch_protocol::{MalformedSchemaError, TableSchema};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur in registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("registry i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("registry serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("no registered schema for table '{table}'; register a baseline first")]
    NoBaseline { table: String },

    #[error("version '{version}' not found for table '{table}'")]
    VersionNotFound { table: String, version: String },

    #[error("stored schema for table '{table}' is malformed: {source}")]
    Malformed {
        table: String,
        #[source]
        source: MalformedSchemaError,
    },
}

/// Which stored version of a baseline to fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Version {
    /// The most recently registered version.
    Latest,
    /// The version captured at an exact stamp.
    At(String),
}

/// Receipt returned by [`SchemaRegistry::register`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredVersion {
    /// Stamp assigned to the stored version.
    pub captured_at: String,
    /// Total versions now stored for the table.
    pub version_count: usize,
}

/// On-disk document: the full version history of one table.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryFile {
    table_name: String,
    versions: Vec<TableSchema>,
}

/// File-based versioned baseline store.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    dir: PathBuf,
}

impl SchemaRegistry {
    /// Create a registry rooted at `dir`. The directory is created lazily
    /// on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn table_path(&self, table: &str) -> PathBuf {
        self.dir.join(format!("{}.json", table))
    }

    /// Store a schema as the newest version for its table. The registry
    /// assigns the capture stamp; a stamp already on the schema is
    /// replaced. Malformed schemas are rejected at write time so reads
    /// always return values that validate.
    pub fn register(&self, schema: &TableSchema) -> Result<RegisteredVersion, RegistryError> {
        schema.validate().map_err(|source| RegistryError::Malformed {
            table: schema.table_name.clone(),
            source,
        })?;

        let path = self.table_path(&schema.table_name);
        let mut file = if path.exists() {
            read_registry_file(&path)?
        } else {
            RegistryFile {
                table_name: schema.table_name.clone(),
                versions: Vec::new(),
            }
        };

        let captured_at = Utc::now().to_rfc3339();
        let mut stored = schema.clone();
        stored.captured_at = Some(captured_at.clone());
        file.versions.push(stored);

        fs::create_dir_all(&self.dir)?;
        fs::write(&path, serde_json::to_string_pretty(&file)?)?;

        debug!(
            table = %schema.table_name,
            version = %captured_at,
            versions = file.versions.len(),
            "registered schema baseline"
        );

        Ok(RegisteredVersion {
            captured_at,
            version_count: file.versions.len(),
        })
    }

    /// Fetch a stored baseline by table and version.
    pub fn get(&self, table: &str, version: Version) -> Result<TableSchema, RegistryError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(RegistryError::NoBaseline {
                table: table.to_string(),
            });
        }
        let file = read_registry_file(&path)?;

        let schema = match &version {
            Version::Latest => file.versions.last().cloned(),
            Version::At(stamp) => file
                .versions
                .iter()
                .find(|s| s.captured_at.as_deref() == Some(stamp.as_str()))
                .cloned(),
        };

        let schema = schema.ok_or_else(|| match version {
            Version::Latest => RegistryError::NoBaseline {
                table: table.to_string(),
            },
            Version::At(stamp) => RegistryError::VersionNotFound {
                table: table.to_string(),
                version: stamp,
            },
        })?;

        // Registry contents were validated at write time; re-check on read
        // in case the file was edited out of band.
        schema.validate().map_err(|source| RegistryError::Malformed {
            table: table.to_string(),
            source,
        })?;

        debug!(table = %table, version = ?schema.captured_at, "loaded schema baseline");
        Ok(schema)
    }

    /// List the stored version stamps for a table, oldest first.
    pub fn versions(&self, table: &str) -> Result<Vec<String>, RegistryError> {
        let path = self.table_path(table);
        if !path.exists() {
            return Err(RegistryError::NoBaseline {
                table: table.to_string(),
            });
        }
        let file = read_registry_file(&path)?;
        Ok(file
            .versions
            .iter()
            .filter_map(|s| s.captured_at.clone())
            .collect())
    }

    /// Table names with at least one registered version.
    pub fn tables(&self) -> Result<Vec<String>, RegistryError> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

fn read_registry_file(path: &Path) -> Result<RegistryFile, RegistryError> {
    let raw = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}
