//! Diff result model.
//!
//! A [`SchemaDiff`] is created fresh per comparison call and is immutable
//! once returned. It is designed to be complete (the consumer never needs
//! to re-examine the schemas), self-explaining (every change carries its
//! own summary), and actionable (severity is pre-classified).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// How dangerous a detected change is for downstream consumers.
/// Ordering is significant: `Safe < Warning < Breaking`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeSeverity {
    /// Additive or widening - no action needed.
    Safe,
    /// Potentially breaking - review recommended.
    Warning,
    /// Likely to break consumers.
    Breaking,
}

impl ChangeSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeSeverity::Safe => "SAFE",
            ChangeSeverity::Warning => "WARNING",
            ChangeSeverity::Breaking => "BREAKING",
        }
    }
}

impl fmt::Display for ChangeSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The elementary kind of a detected change. A column with several
/// simultaneous changes produces one record per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    Added,
    Removed,
    TypeChanged,
    NullabilityChanged,
    DefaultChanged,
    Reordered,
    PrecisionChanged,
    LengthChanged,
}

impl ChangeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeKind::Added => "added",
            ChangeKind::Removed => "removed",
            ChangeKind::TypeChanged => "type_changed",
            ChangeKind::NullabilityChanged => "nullability_changed",
            ChangeKind::DefaultChanged => "default_changed",
            ChangeKind::Reordered => "reordered",
            ChangeKind::PrecisionChanged => "precision_changed",
            ChangeKind::LengthChanged => "length_changed",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One elementary change at one column path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Change {
    /// Dot-qualified column path ("address.zip"). A level-wide reorder
    /// carries the containing struct's path, empty for the table root.
    pub path: String,

    pub kind: ChangeKind,

    pub severity: ChangeSeverity,

    /// Human-readable explanation of the change and its severity.
    pub summary: String,

    /// Baseline-side value of the changed facet, when meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old: Option<Value>,

    /// Current-side value of the changed facet, when meaningful.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new: Option<Value>,
}

impl Change {
    pub fn new(
        path: impl Into<String>,
        kind: ChangeKind,
        severity: ChangeSeverity,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            severity,
            summary: summary.into(),
            old: None,
            new: None,
        }
    }

    pub fn with_old(mut self, old: Value) -> Self {
        self.old = Some(old);
        self
    }

    pub fn with_new(mut self, new: Value) -> Self {
        self.new = Some(new);
        self
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} at '{}': {}", self.severity, self.kind, self.path, self.summary)
    }
}

/// Result of comparing a baseline schema against a newly observed one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaDiff {
    pub table_name: String,

    /// Capture stamp of the baseline schema, if it carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline_version: Option<String>,

    /// Capture stamp of the current schema, if it carried one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_version: Option<String>,

    /// All detected changes, in deterministic emission order.
    pub changes: Vec<Change>,

    /// Maximum severity across all changes. `None` means no drift - a
    /// distinct state, not the same as `Some(Safe)`.
    pub overall_severity: Option<ChangeSeverity>,

    /// One-line human-readable account of the diff.
    pub summary: String,
}

impl SchemaDiff {
    pub fn has_drift(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn breaking_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes_with(ChangeSeverity::Breaking)
    }

    pub fn warning_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes_with(ChangeSeverity::Warning)
    }

    pub fn safe_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes_with(ChangeSeverity::Safe)
    }

    fn changes_with(&self, severity: ChangeSeverity) -> impl Iterator<Item = &Change> {
        self.changes.iter().filter(move |c| c.severity == severity)
    }
}
