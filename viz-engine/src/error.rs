//! FILENAME: viz-engine/src/error.rs

use thiserror::Error;

/// Configuration errors returned by the chart-data preparers.
///
/// These are the only failures the transform core reports: a required
/// axis/grouping column is missing or no usable data exists for the chart
/// family. The caller renders the message inline and lets the user adjust
/// the configuration; malformed individual data values are silently
/// skipped instead.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Scatter plots require both X and Y axes.")]
    MissingSecondaryAxis,

    #[error("Heatmap requires a Y-Axis or Group By variable.")]
    MissingHeatmapDimension,

    #[error("Select X-Axis and Group By column for Crosstab.")]
    MissingCrosstabDimension,

    #[error("Sankey requires a Group By variable as target.")]
    MissingSankeyTarget,

    #[error("Correlation heatmap requires at least two numeric columns.")]
    TooFewNumericColumns,

    #[error("No numeric data for histogram.")]
    NoNumericData,

    #[error("Pick at least one variable in the multi-variable selector.")]
    NoCompareVariables,
}
