//! FILENAME: engine/src/dataset.rs
//! PURPOSE: Rows and the ordered dataset they live in.
//! CONTEXT: Row ids are the join key for drill-down: every aggregation
//! bucket records the ids of its member rows so the UI can trace a bar
//! segment back to the respondents behind it. Ids are assigned once at
//! ingestion and never change.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};
use crate::value::RawValue;

/// Stable row identifier, unique within one dataset.
pub type RowId = usize;

/// A single survey response: a mapping from column name to raw value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    values: HashMap<String, RawValue>,
}

impl Row {
    pub fn new(id: RowId, values: HashMap<String, RawValue>) -> Self {
        Row { id, values }
    }

    /// Returns the cell for `column`, or `None` if the column is unknown.
    /// Callers treat `None` and `RawValue::Empty` identically (missing).
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.values.get(column)
    }

    /// Cell lookup that normalizes unknown columns to `Empty`.
    pub fn cell(&self, column: &str) -> &RawValue {
        static EMPTY: RawValue = RawValue::Empty;
        self.values.get(column).unwrap_or(&EMPTY)
    }

    pub fn values(&self) -> &HashMap<String, RawValue> {
        &self.values
    }
}

/// An ordered collection of rows plus the header order from the source
/// file. Header order is display-significant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Row>,
}

impl Dataset {
    pub fn new() -> Self {
        Dataset::default()
    }

    /// Builds a dataset from loader output, assigning sequential row ids.
    /// Every row is padded so it has a value (possibly `Empty`) for every
    /// header.
    pub fn from_rows(headers: Vec<String>, raw_rows: Vec<HashMap<String, RawValue>>) -> Self {
        let rows = raw_rows
            .into_iter()
            .enumerate()
            .map(|(id, mut values)| {
                for header in &headers {
                    values.entry(header.clone()).or_insert(RawValue::Empty);
                }
                Row::new(id, values)
            })
            .collect();
        Dataset { headers, rows }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Looks up a row by its stable id (drill-down / respondent detail).
    pub fn row_by_id(&self, id: RowId) -> Option<&Row> {
        // Ids are sequential at ingestion, so try direct indexing first.
        if let Some(row) = self.rows.get(id) {
            if row.id == id {
                return Some(row);
            }
        }
        self.rows.iter().find(|r| r.id == id)
    }
}
