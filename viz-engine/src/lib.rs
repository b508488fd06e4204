//! FILENAME: viz-engine/src/lib.rs
//! Chart and statistics subsystem for the survey dashboard.
//!
//! This crate turns filtered survey rows into renderable chart data as a
//! standalone module, separate from the core data engine. It depends on
//! `engine` only for shared types (RawValue, Row, Codebook).
//!
//! Layers:
//! - `definition`: Serializable configuration (what the view IS)
//! - `engine`: Generic category aggregation and drill-down (HOW we count)
//! - `charts`: Specialized per-chart-family transforms (HOW we reshape)
//! - `stats`: Chi-squared, confidence intervals, correlation (HOW we test)
//! - `view`: Renderable output for the frontend (WHAT we display)

pub mod charts;
pub mod definition;
pub mod engine;
pub mod error;
pub mod stats;
pub mod view;

pub use definition::*;
pub use error::PrepareError;
pub use view::*;
pub use engine::{aggregate, detect_multi_valued, drill_down, unique_values};
pub use charts::prepare;
pub use stats::{
    category_summary, chi_square_test, pearson, percentile, proportion_ci,
    CategorySummary, ChiSquareResult, ConfidenceInterval,
};

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use ::engine::{Codebook, Dataset, RawValue};

    #[test]
    fn test_prepare_end_to_end() {
        let headers = vec!["color".to_string()];
        let rows = vec![
            HashMap::from([("color".to_string(), RawValue::from("Red"))]),
            HashMap::from([("color".to_string(), RawValue::from("Blue"))]),
            HashMap::from([("color".to_string(), RawValue::from("Red"))]),
        ];
        let dataset = Dataset::from_rows(headers, rows);
        let config = ViewConfig::new("color", ChartType::Bar);
        let data = prepare(
            dataset.rows(),
            dataset.headers(),
            &config,
            &Codebook::new(),
        )
        .unwrap();
        match data {
            ChartData::Aggregation(view) => {
                assert_eq!(view.x_values, vec!["Blue", "Red"]);
                assert_eq!(view.count("Red", "All"), 2);
            }
            other => panic!("expected aggregation, got {:?}", other),
        }
    }
}
