//! FILENAME: engine/src/filter.rs
//! PURPOSE: Narrows a dataset to rows matching the active filter selections.
//! CONTEXT: Filters are AND across columns, OR within a column. A cell that
//! holds a comma-delimited multi-select answer matches if any trimmed piece
//! is among the accepted values.

use std::collections::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use crate::dataset::Row;
use crate::value::RawValue;

/// Active filter selections: column name -> set of accepted value strings.
/// A column with an empty accepted set imposes no constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterSet {
    accepted: HashMap<String, HashSet<String>>,
}

impl FilterSet {
    pub fn new() -> Self {
        FilterSet::default()
    }

    /// Replaces the accepted value set for a column.
    pub fn set(&mut self, column: &str, values: impl IntoIterator<Item = String>) {
        self.accepted
            .insert(column.to_string(), values.into_iter().collect());
    }

    /// Drops the constraint on a column entirely.
    pub fn remove(&mut self, column: &str) {
        self.accepted.remove(column);
    }

    pub fn clear(&mut self) {
        self.accepted.clear();
    }

    /// Number of columns carrying a non-empty constraint.
    pub fn active_count(&self) -> usize {
        self.accepted.values().filter(|v| !v.is_empty()).count()
    }

    /// Whether a single row satisfies every active constraint.
    pub fn matches(&self, row: &Row) -> bool {
        self.accepted.iter().all(|(column, values)| {
            if values.is_empty() {
                return true;
            }
            cell_matches(row.cell(column), values)
        })
    }

    /// Filters `rows` down to the matching subset. With no active
    /// constraints this is the identity.
    pub fn apply(&self, rows: &[Row]) -> Vec<Row> {
        rows.iter().filter(|r| self.matches(r)).cloned().collect()
    }
}

/// Missing cells take the string form "N/A" so that the "N/A" option
/// offered by unique-value enumeration is selectable.
fn cell_matches(cell: &RawValue, accepted: &HashSet<String>) -> bool {
    if let RawValue::Text(s) = cell {
        if s.contains(',') {
            return s.split(',').any(|piece| accepted.contains(piece.trim()));
        }
    }
    if cell.is_missing() {
        return accepted.contains("N/A");
    }
    accepted.contains(&cell.display())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;

    fn create_test_rows() -> Dataset {
        let headers = vec!["color".to_string(), "size".to_string()];
        let rows = vec![
            HashMap::from([
                ("color".to_string(), RawValue::from("Red, Blue")),
                ("size".to_string(), RawValue::from("L")),
            ]),
            HashMap::from([
                ("color".to_string(), RawValue::from("Green")),
                ("size".to_string(), RawValue::from("S")),
            ]),
            HashMap::from([("size".to_string(), RawValue::from("L"))]),
        ];
        Dataset::from_rows(headers, rows)
    }

    #[test]
    fn test_empty_filter_is_identity() {
        let ds = create_test_rows();
        let filters = FilterSet::new();
        let out = filters.apply(ds.rows());
        assert_eq!(out.len(), ds.len());
        let ids: Vec<usize> = out.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn test_multi_valued_cell_matches_any_piece() {
        let ds = create_test_rows();
        let mut filters = FilterSet::new();
        filters.set("color", vec!["Blue".to_string()]);
        let out = filters.apply(ds.rows());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 0);
    }

    #[test]
    fn test_and_across_columns() {
        let ds = create_test_rows();
        let mut filters = FilterSet::new();
        filters.set("color", vec!["Red".to_string(), "Green".to_string()]);
        filters.set("size", vec!["S".to_string()]);
        let out = filters.apply(ds.rows());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 1);
    }

    #[test]
    fn test_empty_accepted_set_is_no_constraint() {
        let ds = create_test_rows();
        let mut filters = FilterSet::new();
        filters.set("color", Vec::<String>::new());
        assert_eq!(filters.apply(ds.rows()).len(), 3);
        assert_eq!(filters.active_count(), 0);
    }

    #[test]
    fn test_missing_cell_matches_na() {
        let ds = create_test_rows();
        let mut filters = FilterSet::new();
        filters.set("color", vec!["N/A".to_string()]);
        let out = filters.apply(ds.rows());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, 2);
    }
}
