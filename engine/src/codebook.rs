//! FILENAME: engine/src/codebook.rs
//! PURPOSE: The recoding table mapping raw survey codes to labels.
//! CONTEXT: A codebook row like (Q3, "1", "Strongly agree") turns the raw
//! code "1" into a readable label at aggregation time. Raw data is never
//! rewritten; lookups happen after multi-value splitting, keyed on the
//! split-and-trimmed piece. Labels are not validated for uniqueness: two
//! raw codes mapped to the same label will merge into one bucket.

use std::collections::HashMap;
use serde::{Deserialize, Serialize};

/// Recoding table plus per-column question text.
///
/// The serialized shape is the persistence contract:
/// `{ "mapping": { col: { raw: label } }, "questions": { col: question } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Codebook {
    #[serde(default)]
    pub mapping: HashMap<String, HashMap<String, String>>,
    #[serde(default)]
    pub questions: HashMap<String, String>,
}

impl Codebook {
    pub fn new() -> Self {
        Codebook::default()
    }

    /// Returns the mapped label for `(column, raw)`, or `raw` unchanged
    /// when no mapping exists. Mappings for values that never occur in
    /// the data are silently inert.
    pub fn label<'a>(&'a self, column: &str, raw: &'a str) -> &'a str {
        self.mapping
            .get(column)
            .and_then(|m| m.get(raw))
            .map(String::as_str)
            .unwrap_or(raw)
    }

    /// Replaces (not merges) the entire mapping for a column.
    pub fn set_mapping(&mut self, column: &str, mapping: HashMap<String, String>) {
        self.mapping.insert(column.to_string(), mapping);
    }

    /// Adds or overwrites a single raw-value -> label entry.
    pub fn set_label(&mut self, column: &str, raw: &str, label: &str) {
        self.mapping
            .entry(column.to_string())
            .or_default()
            .insert(raw.to_string(), label.to_string());
    }

    /// Sets the display question/prompt text for a column.
    pub fn set_question(&mut self, column: &str, text: &str) {
        self.questions.insert(column.to_string(), text.to_string());
    }

    /// Question text for a column, used as chart title fallback.
    pub fn question(&self, column: &str) -> Option<&str> {
        self.questions.get(column).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.mapping.is_empty() && self.questions.is_empty()
    }
}
