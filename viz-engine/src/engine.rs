//! FILENAME: viz-engine/src/engine.rs
//! PURPOSE: The generic aggregation pass - split, map, bucket.
//!
//! Algorithm, per row:
//! 1. Read the raw x cell; a missing cell becomes the literal "N/A".
//! 2. Split multi-valued cells into pieces (strict: comma only; relaxed:
//!    semicolon if present, else comma). Without splitting, the whole
//!    stringified value is one piece.
//! 3. Each piece independently is codebook-mapped and counted into the
//!    bucket at (mapped x, group key). A respondent selecting three
//!    options increments three buckets.
//!
//! Also houses the split-aware helpers that the filter UI and dashboards
//! rely on: unique value enumeration, multi-value detection, drill-down.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use smallvec::{smallvec, SmallVec};
use engine::{Codebook, RawValue, Row, RowId};
use crate::definition::ViewConfig;
use crate::view::{AggregationView, Bucket};

/// The split pipeline applied to one cell. Returns the trimmed pieces the
/// cell contributes; a single-piece result for anything that is not a
/// splittable string.
pub(crate) fn split_pieces(
    cell: &RawValue,
    split_values: bool,
    strict_mode: bool,
) -> SmallVec<[String; 4]> {
    if !split_values {
        let s = if cell.is_missing() { "N/A".to_string() } else { cell.display() };
        return smallvec![s.trim().to_string()];
    }

    let text = match cell {
        RawValue::Empty => "N/A",
        RawValue::Text(s) => s.as_str(),
        // Numbers and booleans are never split.
        other => return smallvec![other.display()],
    };

    if strict_mode {
        text.split(',').map(|p| p.trim().to_string()).collect()
    } else if text.contains(';') {
        text.split(';').map(|p| p.trim().to_string()).collect()
    } else if text.contains(',') {
        text.split(',').map(|p| p.trim().to_string()).collect()
    } else {
        smallvec![text.trim().to_string()]
    }
}

/// The group key for a row: "N/A" for missing cells, then codebook-mapped.
pub(crate) fn group_key(row: &Row, group_by: &str, codebook: &Codebook) -> String {
    let cell = row.cell(group_by);
    let raw = if cell.is_missing() { "N/A".to_string() } else { cell.display() };
    codebook.label(group_by, &raw).to_string()
}

/// Runs the generic aggregation pass over filtered rows.
///
/// `x_values` and `group_values` come out lexicographically sorted and
/// duplicate-free; this ordering is part of the output contract. With
/// splitting active, `total_count` tallies piece occurrences, not rows.
pub fn aggregate(rows: &[Row], config: &ViewConfig, codebook: &Codebook) -> AggregationView {
    let mut buckets: FxHashMap<String, FxHashMap<String, Bucket>> = FxHashMap::default();
    let mut x_set: BTreeSet<String> = BTreeSet::new();
    let mut group_set: BTreeSet<String> = BTreeSet::new();
    let mut total_count = 0usize;

    for row in rows {
        let pieces = split_pieces(
            row.cell(&config.x_axis),
            config.split_values,
            config.strict_mode,
        );

        for piece in pieces {
            let mapped = codebook.label(&config.x_axis, &piece).to_string();
            x_set.insert(mapped.clone());

            let group = match &config.group_by {
                Some(col) => {
                    let g = group_key(row, col, codebook);
                    group_set.insert(g.clone());
                    g
                }
                None => "All".to_string(),
            };

            let bucket = buckets.entry(mapped).or_default().entry(group).or_default();
            bucket.count += 1;
            bucket.row_ids.push(row.id);

            if let Some(y_col) = &config.y_axis {
                // Non-numeric secondary cells are skipped, not zeroed.
                if let Some(y) = row.cell(y_col).as_f64() {
                    bucket.sum_y += y;
                }
            }
            total_count += 1;
        }
    }

    AggregationView {
        buckets,
        x_values: x_set.into_iter().collect(),
        group_values: group_set.into_iter().collect(),
        is_grouped: config.group_by.is_some(),
        has_secondary: config.y_axis.is_some(),
        total_count,
    }
}

/// Distinct values of a column, split-aware, sorted lexicographically.
/// Comma-delimited cells contribute each trimmed piece; empty pieces and
/// missing cells appear as "N/A". Feeds filter option lists and the
/// codebook editor.
pub fn unique_values(rows: &[Row], column: &str) -> Vec<String> {
    let mut set: BTreeSet<String> = BTreeSet::new();
    for row in rows {
        let cell = row.cell(column);
        if let RawValue::Text(s) = cell {
            if s.contains(',') {
                for piece in s.split(',') {
                    let p = piece.trim();
                    set.insert(if p.is_empty() { "N/A".to_string() } else { p.to_string() });
                }
                continue;
            }
        }
        set.insert(if cell.is_missing() { "N/A".to_string() } else { cell.display() });
    }
    set.into_iter().collect()
}

/// Heuristic used by dashboards to default the split flag: scans up to
/// ~20 leading values and reports whether any string cell contains a
/// comma.
pub fn detect_multi_valued(rows: &[Row], column: &str) -> bool {
    let mut examined = 0;
    for row in rows {
        if let RawValue::Text(s) = row.cell(column) {
            if s.contains(',') {
                return true;
            }
        }
        examined += 1;
        if examined > 20 {
            break;
        }
    }
    false
}

/// Re-derives the row ids behind a clicked aggregated point.
///
/// Matching happens on raw (pre-codebook) values: a comma-delimited cell
/// matches if any trimmed piece equals `x_label` when splitting is
/// active, otherwise the whole stringified cell must equal it.
/// `group_label` is only consulted when a grouping column is configured.
/// For mapped-key lookups use [`AggregationView::bucket_row_ids`].
pub fn drill_down(
    rows: &[Row],
    config: &ViewConfig,
    x_label: &str,
    group_label: &str,
) -> Vec<RowId> {
    let mut ids = Vec::new();
    for row in rows {
        let cell = row.cell(&config.x_axis);
        let match_x = match cell {
            RawValue::Text(s) if config.split_values && s.contains(',') => {
                s.split(',').any(|p| p.trim() == x_label)
            }
            _ => {
                let s = if cell.is_missing() { "N/A".to_string() } else { cell.display() };
                s == x_label
            }
        };
        if !match_x {
            continue;
        }
        match &config.group_by {
            Some(col) => {
                let g_cell = row.cell(col);
                let g = if g_cell.is_missing() { "N/A".to_string() } else { g_cell.display() };
                if g == group_label {
                    ids.push(row.id);
                }
            }
            None => ids.push(row.id),
        }
    }
    ids
}
