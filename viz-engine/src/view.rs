//! FILENAME: viz-engine/src/view.rs
//! PURPOSE: Renderable output shapes - what the rendering layer consumes.
//!
//! Every transform in this crate produces one of these plain-data
//! structures. They are the sole contract with the chart/table renderer;
//! nothing here knows about any charting library.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use engine::RowId;

// ============================================================================
// GENERIC AGGREGATION
// ============================================================================

/// One aggregation cell: how many pieces landed here, the running sum of
/// the secondary column, and the ids of the contributing rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Bucket {
    pub count: usize,
    pub sum_y: f64,
    pub row_ids: Vec<RowId>,
}

/// Output of the generic aggregation pass: buckets keyed by mapped
/// x-value, then group value.
///
/// When multi-value splitting is active, `total_count` and per-bucket
/// counts tally piece occurrences, not rows: one respondent selecting
/// three options increments three buckets. Percentages derived from these
/// counts are shares of selections, not of respondents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregationView {
    pub buckets: FxHashMap<String, FxHashMap<String, Bucket>>,

    /// Distinct mapped x keys, lexicographically sorted.
    pub x_values: Vec<String>,

    /// Distinct mapped group keys, lexicographically sorted.
    /// Empty when no grouping column is configured (buckets then live
    /// under the single group key "All").
    pub group_values: Vec<String>,

    pub is_grouped: bool,
    pub has_secondary: bool,
    pub total_count: usize,
}

impl AggregationView {
    pub fn bucket(&self, x: &str, group: &str) -> Option<&Bucket> {
        self.buckets.get(x).and_then(|g| g.get(group))
    }

    pub fn count(&self, x: &str, group: &str) -> usize {
        self.bucket(x, group).map_or(0, |b| b.count)
    }

    /// Total count for an x category across all of its groups.
    pub fn total_for(&self, x: &str) -> usize {
        self.buckets
            .get(x)
            .map_or(0, |g| g.values().map(|b| b.count).sum())
    }

    /// Drill-down: the row ids behind one bucket (mapped-key space).
    pub fn bucket_row_ids(&self, x: &str, group: &str) -> &[RowId] {
        match self.bucket(x, group) {
            Some(b) => &b.row_ids,
            None => &[],
        }
    }
}

// ============================================================================
// SPECIALIZED CHART SHAPES
// ============================================================================

/// Histogram with Sturges-rule bins. `labels[i]` covers
/// `edges[i] ..= edges[i + 1]`; the maximum value is clamped into the
/// last bin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistogramView {
    pub labels: Vec<String>,
    pub counts: Vec<usize>,
    pub edges: Vec<f64>,
}

/// One scatter series (one group).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterSeries {
    pub name: String,
    pub points: Vec<(f64, f64)>,
}

/// Scatter point lists, one series per group, sorted by group name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterView {
    pub series: Vec<ScatterSeries>,
}

/// Boxplot five-number summaries per category.
/// `boxes[i]` is `[min, q1, median, q3, max]` for `categories[i]`, where
/// min/max are the most extreme data points still inside the whisker
/// bounds. `outliers` holds `(category index, value)` pairs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxplotView {
    pub categories: Vec<String>,
    pub boxes: Vec<[f64; 5]>,
    pub outliers: Vec<(usize, f64)>,
}

/// Dense pairwise Pearson correlation matrix.
/// `cells` holds `(column index, row index, correlation)` for every pair
/// of `labels`, diagonal included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationView {
    pub labels: Vec<String>,
    pub cells: Vec<(usize, usize, f64)>,
}

/// 2D contingency counts for the categorical heatmap.
/// `cells` holds `(x index, y index, count)` for every combination,
/// zero-count cells included. `max_count` is for color-scale
/// normalization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContingencyView {
    pub x_keys: Vec<String>,
    pub y_keys: Vec<String>,
    pub cells: Vec<(usize, usize, usize)>,
    pub max_count: usize,
}

/// Crosstab table: the same contingency counts in dense matrix form,
/// `counts[row][col]` aligned with `row_keys`/`col_keys`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrosstabView {
    pub row_keys: Vec<String>,
    pub col_keys: Vec<String>,
    pub counts: Vec<Vec<usize>>,
    pub max_count: usize,
}

/// One sankey flow edge. Node names carry a role suffix so a value
/// occurring in both columns does not collide into one node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyLink {
    pub source: String,
    pub target: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SankeyView {
    pub nodes: Vec<String>,
    pub links: Vec<SankeyLink>,
}

/// One series of a multi-variable comparison (one selected column).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompareSeries {
    pub name: String,
    pub values: Vec<f64>,
}

/// Multi-variable comparison: up to six columns bucketed on one shared
/// categorical axis. In percentage mode each value is the variable's
/// share of the total responses to that category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiCompareView {
    pub categories: Vec<String>,
    pub series: Vec<CompareSeries>,
    pub is_percentage: bool,
}

// ============================================================================
// DISPATCHER OUTPUT
// ============================================================================

/// The union of all preparer outputs, tagged by shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartData {
    Aggregation(AggregationView),
    Histogram(HistogramView),
    Scatter(ScatterView),
    Boxplot(BoxplotView),
    Correlation(CorrelationView),
    Contingency(ContingencyView),
    Crosstab(CrosstabView),
    Sankey(SankeyView),
    MultiCompare(MultiCompareView),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_lookup_defaults() {
        let view = AggregationView::default();
        assert_eq!(view.count("A", "All"), 0);
        assert!(view.bucket_row_ids("A", "All").is_empty());
    }

    #[test]
    fn test_total_for_sums_groups() {
        let mut view = AggregationView::default();
        let mut groups = FxHashMap::default();
        groups.insert(
            "g1".to_string(),
            Bucket { count: 2, sum_y: 0.0, row_ids: vec![0, 1] },
        );
        groups.insert(
            "g2".to_string(),
            Bucket { count: 3, sum_y: 0.0, row_ids: vec![2, 3, 4] },
        );
        view.buckets.insert("A".to_string(), groups);
        assert_eq!(view.total_for("A"), 5);
    }
}
