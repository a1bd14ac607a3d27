//! Structural schema gate between aggregation and rendering. Nothing is
//! rendered from data that has not passed these checks.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::error::AnalysisError;

/// Validate a serialized index report against its fixed schema:
/// `{ score, metrics: [{ metric, score, entries: [{ class, value, diff,
/// defect }] }] }` with every numeric field finite or, for `value` only,
/// explicitly null.
pub fn validate_index(value: &Value) -> Result<(), AnalysisError> {
    let root = object(value, "index", "$")?;
    finite(field(root, "index", "$", "score")?, "index", "$.score")?;

    let metrics = array(field(root, "index", "$", "metrics")?, "index", "$.metrics")?;
    for (i, metric) in metrics.iter().enumerate() {
        let path = format!("$.metrics[{i}]");
        let metric = object(metric, "index", &path)?;
        non_empty_string(
            field(metric, "index", &path, "metric")?,
            "index",
            &format!("{path}.metric"),
        )?;
        finite(
            field(metric, "index", &path, "score")?,
            "index",
            &format!("{path}.score"),
        )?;

        let entries = array(
            field(metric, "index", &path, "entries")?,
            "index",
            &format!("{path}.entries"),
        )?;
        for (j, entry) in entries.iter().enumerate() {
            let path = format!("{path}.entries[{j}]");
            let entry = object(entry, "index", &path)?;
            non_empty_string(
                field(entry, "index", &path, "class")?,
                "index",
                &format!("{path}.class"),
            )?;
            let raw = field(entry, "index", &path, "value")?;
            if !raw.is_null() {
                finite(raw, "index", &format!("{path}.value"))?;
            }
            finite(
                field(entry, "index", &path, "diff")?,
                "index",
                &format!("{path}.diff"),
            )?;
            if !field(entry, "index", &path, "defect")?.is_boolean() {
                return Err(violation("index", format!("{path}.defect: expected bool")));
            }
        }
    }
    Ok(())
}

/// Validate a serialized matrix against its fixed schema: `{ rows:
/// [string], cells: [{ row, column, weight }] }` where rows are unique,
/// every cell names known rows, and weights are integers of at least 1.
pub fn validate_matrix(value: &Value) -> Result<(), AnalysisError> {
    let root = object(value, "matrix", "$")?;

    let rows = array(field(root, "matrix", "$", "rows")?, "matrix", "$.rows")?;
    let mut known: BTreeSet<&str> = BTreeSet::new();
    for (i, row) in rows.iter().enumerate() {
        let name = non_empty_string(row, "matrix", &format!("$.rows[{i}]"))?;
        if !known.insert(name) {
            return Err(violation(
                "matrix",
                format!("$.rows[{i}]: duplicate row '{name}'"),
            ));
        }
    }

    let cells = array(field(root, "matrix", "$", "cells")?, "matrix", "$.cells")?;
    for (i, cell) in cells.iter().enumerate() {
        let path = format!("$.cells[{i}]");
        let cell = object(cell, "matrix", &path)?;
        for key in ["row", "column"] {
            let name = non_empty_string(
                field(cell, "matrix", &path, key)?,
                "matrix",
                &format!("{path}.{key}"),
            )?;
            if !known.contains(name) {
                return Err(violation(
                    "matrix",
                    format!("{path}.{key}: unknown row '{name}'"),
                ));
            }
        }
        let weight = field(cell, "matrix", &path, "weight")?;
        match weight.as_u64() {
            Some(w) if w >= 1 => {}
            _ => {
                return Err(violation(
                    "matrix",
                    format!("{path}.weight: expected integer >= 1, found {weight}"),
                ))
            }
        }
    }
    Ok(())
}

fn violation(artifact: &str, detail: String) -> AnalysisError {
    AnalysisError::SchemaViolation {
        artifact: artifact.to_string(),
        detail,
    }
}

fn object<'a>(
    value: &'a Value,
    artifact: &str,
    path: &str,
) -> Result<&'a serde_json::Map<String, Value>, AnalysisError> {
    value
        .as_object()
        .ok_or_else(|| violation(artifact, format!("{path}: expected object")))
}

fn array<'a>(value: &'a Value, artifact: &str, path: &str) -> Result<&'a [Value], AnalysisError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| violation(artifact, format!("{path}: expected array")))
}

fn field<'a>(
    map: &'a serde_json::Map<String, Value>,
    artifact: &str,
    path: &str,
    key: &str,
) -> Result<&'a Value, AnalysisError> {
    map.get(key)
        .ok_or_else(|| violation(artifact, format!("{path}: missing field '{key}'")))
}

fn finite(value: &Value, artifact: &str, path: &str) -> Result<f64, AnalysisError> {
    value
        .as_f64()
        .filter(|v| v.is_finite())
        .ok_or_else(|| violation(artifact, format!("{path}: expected finite number")))
}

fn non_empty_string<'a>(
    value: &'a Value,
    artifact: &str,
    path: &str,
) -> Result<&'a str, AnalysisError> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .ok_or_else(|| violation(artifact, format!("{path}: expected non-empty string")))
}
