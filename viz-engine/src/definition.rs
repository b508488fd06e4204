//! FILENAME: viz-engine/src/definition.rs
//! PURPOSE: View Configuration - the serializable description of one
//! aggregation/render pass.
//!
//! This module contains all the types needed to DESCRIBE a chart view.
//! These structures are designed to be:
//! - Serializable (for saving/loading dashboards)
//! - Immutable snapshots of user intent for the duration of one transform

use serde::{Deserialize, Serialize};

/// Maximum number of variables in a multi-variable comparison.
pub const MAX_COMPARE_VARIABLES: usize = 6;

/// The chart family selector. Determines which specialized transform runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartType {
    Bar,
    BarHorizontal,
    Pie,
    Donut,
    Crosstab,
    Scatter,
    ScatterJitter,
    Heatmap,
    CorrelationHeatmap,
    Boxplot,
    Sankey,
    Histogram,
    SideBySideBar,
    StackedColumn,
    #[serde(rename = "100-stacked-column")]
    PercentStackedColumn,
    HorizontalStacked,
    #[serde(rename = "horizontal-100-stacked")]
    HorizontalPercentStacked,
}

impl ChartType {
    /// Chart families that compare multiple selected variables against
    /// one categorical axis.
    pub fn is_multi_axis(&self) -> bool {
        matches!(
            self,
            ChartType::SideBySideBar
                | ChartType::StackedColumn
                | ChartType::PercentStackedColumn
                | ChartType::HorizontalStacked
                | ChartType::HorizontalPercentStacked
        )
    }

    /// 100%-normalized variants: series values become each variable's
    /// share of the total responses to a category.
    pub fn is_percentage(&self) -> bool {
        matches!(
            self,
            ChartType::PercentStackedColumn | ChartType::HorizontalPercentStacked
        )
    }

    /// Families served by the generic category aggregation pass.
    pub fn uses_generic_aggregation(&self) -> bool {
        matches!(
            self,
            ChartType::Bar | ChartType::BarHorizontal | ChartType::Pie | ChartType::Donut
        )
    }
}

impl Default for ChartType {
    fn default() -> Self {
        ChartType::Bar
    }
}

/// The parameters controlling one aggregation/render pass.
/// Immutable for the duration of one transform call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// The primary (categorical or numeric) column.
    pub x_axis: String,

    /// Optional secondary numeric column (sums, scatter Y, boxplot value).
    #[serde(default)]
    pub y_axis: Option<String>,

    /// Optional grouping column (series split, crosstab columns,
    /// sankey target).
    #[serde(default)]
    pub group_by: Option<String>,

    /// Whether multi-valued cells are split into independent pieces.
    #[serde(default)]
    pub split_values: bool,

    /// Delimiter policy when splitting: strict splits on comma only;
    /// relaxed prefers semicolon when one is present, else comma.
    #[serde(default)]
    pub strict_mode: bool,

    /// Which chart family's transform runs.
    #[serde(default)]
    pub chart_type: ChartType,

    /// Columns compared in multi-axis charts (at most
    /// [`MAX_COMPARE_VARIABLES`] are used).
    #[serde(default)]
    pub multi_axis_variables: Vec<String>,
}

impl ViewConfig {
    /// Creates a minimal configuration for a chart over one column.
    pub fn new(x_axis: &str, chart_type: ChartType) -> Self {
        ViewConfig {
            x_axis: x_axis.to_string(),
            y_axis: None,
            group_by: None,
            split_values: false,
            strict_mode: false,
            chart_type,
            multi_axis_variables: Vec::new(),
        }
    }

    pub fn with_group_by(mut self, column: &str) -> Self {
        self.group_by = Some(column.to_string());
        self
    }

    pub fn with_y_axis(mut self, column: &str) -> Self {
        self.y_axis = Some(column.to_string());
        self
    }

    pub fn with_split(mut self, split: bool, strict: bool) -> Self {
        self.split_values = split;
        self.strict_mode = strict;
        self
    }
}
