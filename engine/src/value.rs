//! FILENAME: engine/src/value.rs
//! PURPOSE: Defines the raw cell value handed to the core by the loader.
//! CONTEXT: Loaders parse CSV/JSON outside the core and deliver every cell
//! as a `RawValue`. CSV cells arrive as text; JSON cells may be numbers,
//! booleans, or null. The core never re-reads files.

use serde::{Deserialize, Serialize};

/// A raw cell value as delivered by the load/parse layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
}

impl RawValue {
    /// True for missing/null cells.
    pub fn is_missing(&self) -> bool {
        matches!(self, RawValue::Empty)
    }

    /// Returns the display string of the value.
    /// Integral numbers drop their fractional part (`1.0` -> `"1"`),
    /// matching how the source data was stringified before ingestion.
    pub fn display(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            RawValue::Text(s) => s.clone(),
            RawValue::Boolean(b) => {
                if *b { "true" } else { "false" }.to_string()
            }
        }
    }

    /// Attempts a numeric interpretation of the value.
    /// Text is trimmed and parsed as a float; booleans and missing cells
    /// are not numeric. Non-parseable text yields `None`, never an error.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Number(n) if n.is_finite() => Some(*n),
            RawValue::Text(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        }
    }
}

impl Default for RawValue {
    fn default() -> Self {
        RawValue::Empty
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        RawValue::Text(s.to_string())
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        RawValue::Number(n)
    }
}
