//! Schema Comparison Engine
//!
//! Pure deterministic diffing - no reasoning layer involved here, only in
//! interpreting the results. Both inputs are validated in full before any
//! diffing begins; a violation aborts the whole call with no partial diff.
//!
//! Emission order is fixed: per nesting level, baseline-order columns
//! first (recursing into struct fields pre-order), then added columns in
//! current order, then at most one reorder record for the level.

use driftwatch_protocol::types::qualify;
use driftwatch_protocol::{
    is_safe_widening, Change, ChangeKind, ChangeSeverity, ColumnSchema, ColumnType,
    MalformedSchemaError, SchemaDiff, TableSchema,
};
use serde_json::json;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors a comparison call can fail with. Once validation passes, every
/// facet comparison is total - no mid-walk failure is possible.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("malformed schema: {0}")]
    Malformed(#[from] MalformedSchemaError),

    #[error("cannot compare schemas of different tables: baseline is '{baseline}', current is '{current}'")]
    Incomparable { baseline: String, current: String },
}

/// Compare a recorded baseline against a newly observed schema.
///
/// Both schemas must describe the same table; use [`compare_cross_table`]
/// to deliberately diff across table identities.
pub fn compare(baseline: &TableSchema, current: &TableSchema) -> Result<SchemaDiff, CompareError> {
    if baseline.table_name != current.table_name {
        return Err(CompareError::Incomparable {
            baseline: baseline.table_name.clone(),
            current: current.table_name.clone(),
        });
    }
    compare_cross_table(baseline, current)
}

/// [`compare`] without the table-identity check, for callers that
/// explicitly want to diff one table's schema against another's.
pub fn compare_cross_table(
    baseline: &TableSchema,
    current: &TableSchema,
) -> Result<SchemaDiff, CompareError> {
    baseline.validate()?;
    current.validate()?;

    let mut changes = Vec::new();
    diff_level(&baseline.columns, &current.columns, "", &mut changes);

    let overall_severity = changes.iter().map(|c| c.severity).max();
    let summary = summarize(&changes);

    debug!(
        table = %baseline.table_name,
        changes = changes.len(),
        severity = overall_severity.map(|s| s.as_str()).unwrap_or("none"),
        "schema comparison complete"
    );
    if overall_severity == Some(ChangeSeverity::Breaking) {
        warn!(table = %baseline.table_name, "breaking schema drift detected");
    }

    Ok(SchemaDiff {
        table_name: baseline.table_name.clone(),
        baseline_version: baseline.captured_at.clone(),
        current_version: current.captured_at.clone(),
        changes,
        overall_severity,
        summary,
    })
}

fn summarize(changes: &[Change]) -> String {
    if changes.is_empty() {
        return "No schema changes detected. Schemas are identical.".to_string();
    }
    let breaking = changes.iter().filter(|c| c.severity == ChangeSeverity::Breaking).count();
    let warning = changes.iter().filter(|c| c.severity == ChangeSeverity::Warning).count();
    let safe = changes.iter().filter(|c| c.severity == ChangeSeverity::Safe).count();

    let mut parts = Vec::new();
    if breaking > 0 {
        parts.push(format!("{} breaking", breaking));
    }
    if warning > 0 {
        parts.push(format!("{} warning", warning));
    }
    if safe > 0 {
        parts.push(format!("{} safe", safe));
    }
    format!("{} change(s) detected: {}.", changes.len(), parts.join(", "))
}

/// Diff one nesting level: the table root, or a struct's fields.
/// `prefix` is the dot path of the containing struct, empty at the root.
fn diff_level(
    baseline: &[ColumnSchema],
    current: &[ColumnSchema],
    prefix: &str,
    out: &mut Vec<Change>,
) {
    let current_by_name: HashMap<&str, &ColumnSchema> =
        current.iter().map(|c| (c.name.as_str(), c)).collect();
    let baseline_by_name: HashMap<&str, &ColumnSchema> =
        baseline.iter().map(|c| (c.name.as_str(), c)).collect();

    for old in baseline {
        let path = qualify(prefix, &old.name);
        match current_by_name.get(old.name.as_str()) {
            Some(new) => diff_column(old, new, &path, out),
            None => out.push(
                Change::new(
                    &path,
                    ChangeKind::Removed,
                    ChangeSeverity::Breaking,
                    format!(
                        "column '{}' ({}) was removed; consumers reading it will fail",
                        path, old.col_type
                    ),
                )
                .with_old(json!({ "col_type": old.col_type })),
            ),
        }
    }

    for new in current {
        if baseline_by_name.contains_key(new.name.as_str()) {
            continue;
        }
        let path = qualify(prefix, &new.name);
        let backfillable = new.nullable || new.default_value.is_some();
        let (severity, detail) = if backfillable {
            (
                ChangeSeverity::Safe,
                "nullable or defaulted, existing readers are unaffected",
            )
        } else {
            (
                ChangeSeverity::Breaking,
                "NOT NULL with no default, existing rows cannot be backfilled",
            )
        };
        out.push(
            Change::new(
                &path,
                ChangeKind::Added,
                severity,
                format!("column '{}' ({}) was added; {}", path, new.col_type, detail),
            )
            .with_new(json!({
                "col_type": new.col_type,
                "nullable": new.nullable,
                "default_value": new.default_value,
            })),
        );
    }

    // One reorder record per level, and only when no name joined or left.
    if baseline.len() == current.len()
        && baseline.iter().all(|c| current_by_name.contains_key(c.name.as_str()))
    {
        let old_order: Vec<&str> = baseline.iter().map(|c| c.name.as_str()).collect();
        let new_order: Vec<&str> = current.iter().map(|c| c.name.as_str()).collect();
        if old_order != new_order {
            out.push(
                Change::new(
                    prefix,
                    ChangeKind::Reordered,
                    ChangeSeverity::Warning,
                    "column order changed with no additions or removals; \
                     positional consumers may silently read wrong values",
                )
                .with_old(json!(old_order))
                .with_new(json!(new_order)),
            );
        }
    }
}

/// Per-column comparison of a same-named pair. One change record per
/// elementary concern - simultaneous changes are never merged.
fn diff_column(old: &ColumnSchema, new: &ColumnSchema, path: &str, out: &mut Vec<Change>) {
    let both_struct =
        old.col_type == ColumnType::Struct && new.col_type == ColumnType::Struct;

    if old.col_type != new.col_type {
        let struct_mismatch =
            old.col_type == ColumnType::Struct || new.col_type == ColumnType::Struct;
        let (severity, detail) = if struct_mismatch {
            (
                ChangeSeverity::Breaking,
                "structural kind mismatch".to_string(),
            )
        } else if is_safe_widening(old.col_type, new.col_type) {
            (ChangeSeverity::Safe, "safe widening".to_string())
        } else {
            (
                ChangeSeverity::Breaking,
                format!(
                    "narrowed or incompatible conversion; consumers expecting {} will fail",
                    old.col_type
                ),
            )
        };
        out.push(
            Change::new(
                path,
                ChangeKind::TypeChanged,
                severity,
                format!("{} -> {}: {}", old.col_type, new.col_type, detail),
            )
            .with_old(json!({ "col_type": old.col_type }))
            .with_new(json!({ "col_type": new.col_type })),
        );
    } else if !both_struct {
        diff_facets(old, new, path, out);
    }

    if old.nullable != new.nullable {
        let (severity, summary) = if !old.nullable && new.nullable {
            (
                ChangeSeverity::Safe,
                "relaxed from NOT NULL to NULL".to_string(),
            )
        } else {
            (
                ChangeSeverity::Breaking,
                "tightened from NULL to NOT NULL without guaranteed backfill".to_string(),
            )
        };
        out.push(
            Change::new(path, ChangeKind::NullabilityChanged, severity, summary)
                .with_old(json!({ "nullable": old.nullable }))
                .with_new(json!({ "nullable": new.nullable })),
        );
    }

    if old.default_value != new.default_value {
        out.push(
            Change::new(
                path,
                ChangeKind::DefaultChanged,
                ChangeSeverity::Warning,
                format!(
                    "default changed from {} to {}; new rows will differ",
                    render_default(&old.default_value),
                    render_default(&new.default_value)
                ),
            )
            .with_old(json!({ "default_value": old.default_value }))
            .with_new(json!({ "default_value": new.default_value })),
        );
    }

    // Struct fields recurse last: the column's own changes come before its
    // children in the emitted sequence.
    if both_struct {
        diff_level(&old.fields, &new.fields, path, out);
    }
}

/// Length/precision/scale checks for a same-kind, non-struct pair. Facets
/// across different kinds are not comparable and are skipped when the kind
/// itself changed.
fn diff_facets(old: &ColumnSchema, new: &ColumnSchema, path: &str, out: &mut Vec<Change>) {
    // max_length: None means unbounded, which covers every bounded range.
    if old.max_length != new.max_length {
        let (severity, summary) = match (old.max_length, new.max_length) {
            (Some(o), Some(n)) if n > o => (
                ChangeSeverity::Safe,
                format!("max length increased from {} to {}", o, n),
            ),
            (Some(o), None) => (
                ChangeSeverity::Safe,
                format!("length bound {} removed; column is now unbounded", o),
            ),
            (Some(o), Some(n)) => (
                ChangeSeverity::Breaking,
                format!(
                    "max length decreased from {} to {}; existing values may be truncated",
                    o, n
                ),
            ),
            (None, Some(n)) => (
                ChangeSeverity::Breaking,
                format!(
                    "length bound {} introduced on a previously unbounded column; \
                     existing values may be truncated",
                    n
                ),
            ),
            (None, None) => unreachable!("guarded by inequality check"),
        };
        out.push(
            Change::new(path, ChangeKind::LengthChanged, severity, summary)
                .with_old(json!({ "max_length": old.max_length }))
                .with_new(json!({ "max_length": new.max_length })),
        );
    }

    diff_numeric_facet(
        "precision",
        old.precision,
        new.precision,
        old.col_type,
        path,
        out,
    );
    diff_numeric_facet("scale", old.scale, new.scale, old.col_type, path, out);
}

fn diff_numeric_facet(
    facet: &str,
    old: Option<u32>,
    new: Option<u32>,
    col_type: ColumnType,
    path: &str,
    out: &mut Vec<Change>,
) {
    let old_v = old.unwrap_or(0);
    let new_v = new.unwrap_or(0);
    if old_v == new_v {
        return;
    }
    let (severity, summary) = if new_v > old_v {
        (
            ChangeSeverity::Safe,
            format!("{} increased from {} to {}", facet, old_v, new_v),
        )
    } else if col_type == ColumnType::Decimal {
        // Explicit product rule: a narrower decimal is a soft concern, not
        // guaranteed data loss - existing values may still fit.
        (
            ChangeSeverity::Warning,
            format!(
                "decimal {} decreased from {} to {}; existing values may still fit",
                facet, old_v, new_v
            ),
        )
    } else {
        (
            ChangeSeverity::Breaking,
            format!(
                "{} decreased from {} to {}; possible truncation or data loss",
                facet, old_v, new_v
            ),
        )
    };
    out.push(
        Change::new(path, ChangeKind::PrecisionChanged, severity, summary)
            .with_old(json!({ facet: old }))
            .with_new(json!({ facet: new })),
    );
}

fn render_default(value: &Option<String>) -> String {
    match value {
        Some(v) => format!("'{}'", v),
        None => "none".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use driftwatch_protocol::ColumnSchema as Col;
    use ColumnType::*;

    fn table(name: &str, columns: Vec<Col>) -> TableSchema {
        TableSchema::new(name, columns)
    }

    fn orders_baseline() -> TableSchema {
        table(
            "orders",
            vec![
                Col::required("id", Integer),
                Col::optional("name", Varchar).with_length(50),
            ],
        )
    }

    #[test]
    fn test_identity_yields_no_drift() {
        let schema = table(
            "customers",
            vec![
                Col::required("id", BigInt),
                Col::nested(
                    "address",
                    vec![
                        Col::required("street", Varchar).with_length(100),
                        Col::nested("geo", vec![Col::required("lat", Float)]),
                    ],
                ),
            ],
        );
        let diff = compare(&schema, &schema).unwrap();
        assert!(!diff.has_drift());
        assert!(diff.changes.is_empty());
        assert_eq!(diff.overall_severity, None);
        assert!(diff.summary.contains("No schema changes"));
    }

    #[test]
    fn test_nullable_addition_is_safe() {
        let baseline = orders_baseline();
        let mut current = baseline.clone();
        current
            .columns
            .push(Col::optional("email", Varchar).with_length(100));

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        let change = &diff.changes[0];
        assert_eq!(change.kind, ChangeKind::Added);
        assert_eq!(change.path, "email");
        assert_eq!(change.severity, ChangeSeverity::Safe);
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Safe));
    }

    #[test]
    fn test_non_nullable_addition_without_default_is_breaking() {
        let baseline = orders_baseline();
        let mut current = baseline.clone();
        current.columns.push(Col::required("tenant", Varchar));

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Breaking);

        // A default makes the same addition safe.
        let mut current = orders_baseline();
        current
            .columns
            .push(Col::required("tenant", Varchar).with_default("acme"));
        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Safe);
    }

    #[test]
    fn test_removal_is_breaking() {
        let baseline = orders_baseline();
        let current = table("orders", vec![Col::required("id", Integer)]);

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::Removed);
        assert_eq!(diff.changes[0].path, "name");
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Breaking));
    }

    #[test]
    fn test_add_remove_antisymmetry() {
        let a = orders_baseline();
        let mut b = a.clone();
        b.columns.push(Col::optional("email", Varchar));

        let forward = compare(&a, &b).unwrap();
        assert_eq!(forward.changes[0].kind, ChangeKind::Added);
        assert_eq!(forward.changes[0].path, "email");

        let backward = compare(&b, &a).unwrap();
        assert_eq!(backward.changes[0].kind, ChangeKind::Removed);
        assert_eq!(backward.changes[0].path, "email");
    }

    #[test]
    fn test_widening_is_safe_narrowing_is_breaking() {
        let baseline = table("t", vec![Col::required("amount", Integer)]);
        let widened = table("t", vec![Col::required("amount", BigInt)]);
        let diff = compare(&baseline, &widened).unwrap();
        assert_eq!(diff.changes[0].kind, ChangeKind::TypeChanged);
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Safe);
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Safe));

        let narrowed = table("t", vec![Col::required("amount", Integer)]);
        let diff = compare(&widened, &narrowed).unwrap();
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Breaking);
    }

    #[test]
    fn test_varchar_to_integer_is_breaking() {
        let baseline = table("t", vec![Col::optional("name", Varchar).with_length(50)]);
        let current = table("t", vec![Col::optional("name", Integer)]);
        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::TypeChanged);
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Breaking));
    }

    #[test]
    fn test_struct_non_struct_mismatch_stops_recursion() {
        let baseline = table(
            "t",
            vec![Col::nested("address", vec![Col::required("zip", Varchar)])],
        );
        let current = table("t", vec![Col::required("address", Json)]);

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::TypeChanged);
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Breaking);
        assert!(diff.changes[0].summary.contains("structural kind mismatch"));
        // No field-level changes surfaced for the vanished struct body.
        assert!(!diff.changes.iter().any(|c| c.path.starts_with("address.")));
    }

    #[test]
    fn test_nested_length_widening() {
        let baseline = table(
            "customers",
            vec![Col::nested(
                "address",
                vec![Col::required("zip", Varchar).with_length(5)],
            )],
        );
        let current = table(
            "customers",
            vec![Col::nested(
                "address",
                vec![Col::required("zip", Varchar).with_length(10)],
            )],
        );

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::LengthChanged);
        assert_eq!(diff.changes[0].path, "address.zip");
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Safe);
    }

    #[test]
    fn test_doubly_nested_path() {
        let make = |t: ColumnType| {
            table(
                "t",
                vec![Col::nested(
                    "a",
                    vec![Col::nested("b", vec![Col::required("c", t)])],
                )],
            )
        };
        let diff = compare(&make(Varchar), &make(Boolean)).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].path, "a.b.c");
        assert_eq!(diff.changes[0].kind, ChangeKind::TypeChanged);
    }

    #[test]
    fn test_nullability_relaxed_and_tightened() {
        let strict = table("t", vec![Col::required("id", Integer)]);
        let loose = table("t", vec![Col::optional("id", Integer)]);

        let relaxed = compare(&strict, &loose).unwrap();
        assert_eq!(relaxed.changes[0].kind, ChangeKind::NullabilityChanged);
        assert_eq!(relaxed.changes[0].severity, ChangeSeverity::Safe);

        let tightened = compare(&loose, &strict).unwrap();
        assert_eq!(tightened.changes[0].severity, ChangeSeverity::Breaking);
    }

    #[test]
    fn test_varchar_shrink_is_breaking() {
        let baseline = table("t", vec![Col::optional("name", Varchar).with_length(50)]);
        let current = table("t", vec![Col::optional("name", Varchar).with_length(10)]);
        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes[0].kind, ChangeKind::LengthChanged);
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Breaking);
    }

    #[test]
    fn test_length_bound_removed_is_safe_introduced_is_breaking() {
        let bounded = table("t", vec![Col::optional("name", Varchar).with_length(50)]);
        let unbounded = table("t", vec![Col::optional("name", Varchar)]);

        let diff = compare(&bounded, &unbounded).unwrap();
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Safe);

        let diff = compare(&unbounded, &bounded).unwrap();
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Breaking);
    }

    #[test]
    fn test_decimal_precision_decrease_is_warning() {
        let wide = table("t", vec![Col::required("amount", Decimal).with_precision(12, 4)]);
        let narrow = table("t", vec![Col::required("amount", Decimal).with_precision(10, 2)]);

        let diff = compare(&wide, &narrow).unwrap();
        assert_eq!(diff.changes.len(), 2); // precision and scale each report
        assert!(diff
            .changes
            .iter()
            .all(|c| c.kind == ChangeKind::PrecisionChanged
                && c.severity == ChangeSeverity::Warning));
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Warning));

        let diff = compare(&narrow, &wide).unwrap();
        assert!(diff.changes.iter().all(|c| c.severity == ChangeSeverity::Safe));
    }

    #[test]
    fn test_default_change_is_warning() {
        let baseline = table(
            "t",
            vec![Col::optional("status", Varchar).with_length(10).with_default("new")],
        );
        let current = table(
            "t",
            vec![Col::optional("status", Varchar).with_length(10).with_default("pending")],
        );

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::DefaultChanged);
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Warning);

        // None <-> Some in either direction also reports.
        let bare = table("t", vec![Col::optional("status", Varchar).with_length(10)]);
        assert_eq!(compare(&bare, &current).unwrap().changes.len(), 1);
        assert_eq!(compare(&current, &bare).unwrap().changes.len(), 1);
    }

    #[test]
    fn test_reorder_isolation() {
        let baseline = table(
            "t",
            vec![
                Col::required("a", Integer),
                Col::required("b", Varchar),
                Col::required("c", Boolean),
            ],
        );
        let current = table(
            "t",
            vec![
                Col::required("c", Boolean),
                Col::required("a", Integer),
                Col::required("b", Varchar),
            ],
        );

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::Reordered);
        assert_eq!(diff.changes[0].severity, ChangeSeverity::Warning);
        assert_eq!(diff.changes[0].path, "");
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Warning));
    }

    #[test]
    fn test_no_reorder_when_name_sets_differ() {
        let baseline = table(
            "t",
            vec![Col::required("a", Integer), Col::required("b", Varchar)],
        );
        let current = table(
            "t",
            vec![Col::required("b", Varchar), Col::optional("z", Float)],
        );

        let diff = compare(&baseline, &current).unwrap();
        assert!(!diff.changes.iter().any(|c| c.kind == ChangeKind::Reordered));
    }

    #[test]
    fn test_nested_reorder_carries_struct_path() {
        let baseline = table(
            "t",
            vec![Col::nested(
                "address",
                vec![Col::required("street", Varchar), Col::required("zip", Varchar)],
            )],
        );
        let current = table(
            "t",
            vec![Col::nested(
                "address",
                vec![Col::required("zip", Varchar), Col::required("street", Varchar)],
            )],
        );

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.changes.len(), 1);
        assert_eq!(diff.changes[0].kind, ChangeKind::Reordered);
        assert_eq!(diff.changes[0].path, "address");
    }

    #[test]
    fn test_simultaneous_changes_emit_one_record_each() {
        let baseline = table("t", vec![Col::optional("v", BigInt)]);
        let current = table("t", vec![Col::required("v", Integer).with_default("0")]);

        let diff = compare(&baseline, &current).unwrap();
        let kinds: Vec<ChangeKind> = diff.changes.iter().map(|c| c.kind).collect();
        assert_eq!(
            kinds,
            vec![
                ChangeKind::TypeChanged,
                ChangeKind::NullabilityChanged,
                ChangeKind::DefaultChanged,
            ]
        );
        assert!(diff.changes.iter().all(|c| c.path == "v"));
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Breaking));
    }

    #[test]
    fn test_severity_monotonicity() {
        // A safe pair stays safe...
        let baseline = orders_baseline();
        let mut current = baseline.clone();
        current.columns.push(Col::optional("email", Varchar));
        assert_eq!(
            compare(&baseline, &current).unwrap().overall_severity,
            Some(ChangeSeverity::Safe)
        );

        // ...until any breaking elementary change joins.
        current.columns.retain(|c| c.name != "name");
        let diff = compare(&baseline, &current).unwrap();
        assert!(diff.safe_changes().count() > 0);
        assert_eq!(diff.overall_severity, Some(ChangeSeverity::Breaking));
    }

    #[test]
    fn test_deterministic_emission_order() {
        let baseline = table(
            "t",
            vec![
                Col::required("keep", Integer),
                Col::required("gone", Varchar),
                Col::nested("s", vec![Col::required("x", Integer)]),
            ],
        );
        let current = table(
            "t",
            vec![
                Col::required("keep", BigInt),
                Col::nested("s", vec![Col::required("x", Float)]),
                Col::optional("fresh", Boolean),
            ],
        );

        let first = compare(&baseline, &current).unwrap();
        let second = compare(&baseline, &current).unwrap();
        assert_eq!(first, second);

        let paths: Vec<&str> = first.changes.iter().map(|c| c.path.as_str()).collect();
        // Baseline walk order (pre-order through the struct), then adds.
        assert_eq!(paths, vec!["keep", "gone", "s.x", "fresh"]);
    }

    #[test]
    fn test_malformed_inputs_rejected_upfront() {
        let dup = table(
            "t",
            vec![Col::required("a", Integer), Col::required("a", Varchar)],
        );
        let ok = table("t", vec![Col::required("a", Integer)]);

        assert!(matches!(compare(&dup, &ok), Err(CompareError::Malformed(_))));
        assert!(matches!(compare(&ok, &dup), Err(CompareError::Malformed(_))));
    }

    #[test]
    fn test_cross_table_identity_check() {
        let a = table("orders", vec![Col::required("id", Integer)]);
        let b = table("orders_v2", vec![Col::required("id", Integer)]);

        assert!(matches!(
            compare(&a, &b),
            Err(CompareError::Incomparable { .. })
        ));
        let diff = compare_cross_table(&a, &b).unwrap();
        assert!(!diff.has_drift());
    }

    #[test]
    fn test_versions_carried_from_capture_stamps() {
        let baseline = orders_baseline().with_captured_at("2026-08-01T00:00:00Z");
        let current = orders_baseline().with_captured_at("2026-08-25T00:00:00Z");

        let diff = compare(&baseline, &current).unwrap();
        assert_eq!(diff.baseline_version.as_deref(), Some("2026-08-01T00:00:00Z"));
        assert_eq!(diff.current_version.as_deref(), Some("2026-08-25T00:00:00Z"));
    }
}
