//! FILENAME: viz-engine/src/charts.rs
//! PURPOSE: Specialized chart-data preparers.
//! CONTEXT: Chart families whose output is not a category -> count bucket
//! (histogram, scatter, boxplot, contingency/crosstab, correlation,
//! sankey, multi-variable comparison) transform the filtered rows
//! directly instead of going through the generic aggregator. Rows whose
//! cells fail a required numeric parse are dropped silently; only missing
//! required configuration is reported, as a `PrepareError`.

use std::collections::{BTreeMap, BTreeSet};
use rand::Rng;
use rustc_hash::FxHashMap;
use engine::{Codebook, RawValue, Row};
use crate::definition::{ChartType, ViewConfig, MAX_COMPARE_VARIABLES};
use crate::engine::{aggregate, split_pieces};
use crate::error::PrepareError;
use crate::stats::{pearson, percentile};
use crate::view::{
    BoxplotView, ChartData, CompareSeries, ContingencyView, CorrelationView, CrosstabView,
    HistogramView, MultiCompareView, SankeyLink, SankeyView, ScatterSeries, ScatterView,
};

/// Runs the transform selected by `config.chart_type` and returns its
/// output shape. Multi-axis chart families use the multi-variable
/// comparison only when variables are actually selected; otherwise they
/// fall back to the generic aggregation like any bar chart.
pub fn prepare(
    rows: &[Row],
    headers: &[String],
    config: &ViewConfig,
    codebook: &Codebook,
) -> Result<ChartData, PrepareError> {
    if config.chart_type.is_multi_axis() && !config.multi_axis_variables.is_empty() {
        return multi_compare(rows, config, codebook).map(ChartData::MultiCompare);
    }
    match config.chart_type {
        ChartType::Scatter | ChartType::ScatterJitter => {
            scatter(rows, config).map(ChartData::Scatter)
        }
        ChartType::Boxplot => Ok(ChartData::Boxplot(boxplot(rows, config))),
        ChartType::CorrelationHeatmap => {
            correlation_matrix(rows, headers).map(ChartData::Correlation)
        }
        ChartType::Heatmap => contingency(rows, config).map(ChartData::Contingency),
        ChartType::Crosstab => crosstab(rows, config).map(ChartData::Crosstab),
        ChartType::Sankey => sankey(rows, config).map(ChartData::Sankey),
        ChartType::Histogram => histogram(rows, config).map(ChartData::Histogram),
        _ => Ok(ChartData::Aggregation(aggregate(rows, config, codebook))),
    }
}

/// Display string with missing (and blank) cells replaced by `fallback`.
fn display_or(cell: &RawValue, fallback: &str) -> String {
    let s = if cell.is_missing() { String::new() } else { cell.display() };
    if s.is_empty() {
        fallback.to_string()
    } else {
        s
    }
}

// ============================================================================
// SCATTER
// ============================================================================

/// Scatter point lists grouped by the optional grouping column.
/// Rows where either coordinate fails the numeric parse are dropped.
pub fn scatter(rows: &[Row], config: &ViewConfig) -> Result<ScatterView, PrepareError> {
    scatter_with_rng(rows, config, &mut rand::thread_rng())
}

fn scatter_with_rng<R: Rng>(
    rows: &[Row],
    config: &ViewConfig,
    rng: &mut R,
) -> Result<ScatterView, PrepareError> {
    let y_col = config
        .y_axis
        .as_ref()
        .ok_or(PrepareError::MissingSecondaryAxis)?;
    let jitter = config.chart_type == ChartType::ScatterJitter;

    let mut groups: BTreeMap<String, Vec<(f64, f64)>> = BTreeMap::new();
    for row in rows {
        let x = row.cell(&config.x_axis).as_f64();
        let y = row.cell(y_col).as_f64();
        if let (Some(x), Some(y)) = (x, y) {
            let group = match &config.group_by {
                Some(col) => display_or(row.cell(col), "All"),
                None => "All".to_string(),
            };
            // Jitter de-overlaps integer-coded values; it is visual only
            // and must never feed a statistic.
            let (jx, jy) = if jitter {
                (rng.gen_range(-0.3..0.3), rng.gen_range(-0.3..0.3))
            } else {
                (0.0, 0.0)
            };
            groups.entry(group).or_default().push((x + jx, y + jy));
        }
    }

    Ok(ScatterView {
        series: groups
            .into_iter()
            .map(|(name, points)| ScatterSeries { name, points })
            .collect(),
    })
}

// ============================================================================
// BOXPLOT
// ============================================================================

/// Five-number summaries per category. With a secondary column the
/// x-column is the category and the secondary holds the values;
/// otherwise the x-column holds the values and the grouping column (if
/// any) is the category.
pub fn boxplot(rows: &[Row], config: &ViewConfig) -> BoxplotView {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let (category, value) = match &config.y_axis {
            Some(y_col) => (
                display_or(row.cell(&config.x_axis), "N/A"),
                row.cell(y_col).as_f64(),
            ),
            None => {
                let category = match &config.group_by {
                    Some(col) => display_or(row.cell(col), "N/A"),
                    None => "All".to_string(),
                };
                (category, row.cell(&config.x_axis).as_f64())
            }
        };
        if let Some(v) = value {
            groups.entry(category).or_default().push(v);
        }
    }

    let mut categories = Vec::new();
    let mut boxes = Vec::new();
    let mut outliers = Vec::new();

    for (idx, (category, mut values)) in groups.into_iter().enumerate() {
        values.sort_by(f64::total_cmp);
        categories.push(category);

        let q1 = percentile(&values, 0.25);
        let median = percentile(&values, 0.5);
        let q3 = percentile(&values, 0.75);
        let iqr = q3 - q1;
        let lower_bound = q1 - 1.5 * iqr;
        let upper_bound = q3 + 1.5 * iqr;

        // Whiskers end at the most extreme points still inside the
        // bounds, not at the bounds themselves.
        let in_bounds: Vec<f64> = values
            .iter()
            .copied()
            .filter(|v| *v >= lower_bound && *v <= upper_bound)
            .collect();
        let real_min = in_bounds.first().copied().unwrap_or(q1);
        let real_max = in_bounds.last().copied().unwrap_or(q3);
        boxes.push([real_min, q1, median, q3, real_max]);

        for v in &values {
            if *v < lower_bound || *v > upper_bound {
                outliers.push((idx, *v));
            }
        }
    }

    BoxplotView { categories, boxes, outliers }
}

// ============================================================================
// CORRELATION MATRIX
// ============================================================================

/// Full pairwise Pearson matrix over the auto-detected numeric columns
/// (any column where at least one cell parses as a float). Each pair is
/// computed over pairwise-complete rows, not listwise.
pub fn correlation_matrix(
    rows: &[Row],
    headers: &[String],
) -> Result<CorrelationView, PrepareError> {
    let numeric: Vec<&String> = headers
        .iter()
        .filter(|h| rows.iter().any(|r| r.cell(h).as_f64().is_some()))
        .collect();
    if numeric.len() < 2 {
        return Err(PrepareError::TooFewNumericColumns);
    }

    let mut cells = Vec::with_capacity(numeric.len() * numeric.len());
    for (i, col_a) in numeric.iter().enumerate() {
        for (j, col_b) in numeric.iter().enumerate() {
            let mut xs = Vec::new();
            let mut ys = Vec::new();
            for row in rows {
                if let (Some(a), Some(b)) =
                    (row.cell(col_a).as_f64(), row.cell(col_b).as_f64())
                {
                    xs.push(a);
                    ys.push(b);
                }
            }
            let corr = if xs.len() > 1 { pearson(&xs, &ys) } else { 0.0 };
            cells.push((j, i, corr));
        }
    }

    Ok(CorrelationView {
        labels: numeric.into_iter().cloned().collect(),
        cells,
    })
}

// ============================================================================
// CONTINGENCY (HEATMAP / CROSSTAB)
// ============================================================================

fn contingency_counts(
    rows: &[Row],
    x_col: &str,
    y_col: &str,
) -> (Vec<String>, Vec<String>, FxHashMap<(String, String), usize>) {
    let mut counts: FxHashMap<(String, String), usize> = FxHashMap::default();
    let mut x_keys: BTreeSet<String> = BTreeSet::new();
    let mut y_keys: BTreeSet<String> = BTreeSet::new();
    for row in rows {
        let x = display_or(row.cell(x_col), "N/A");
        let y = display_or(row.cell(y_col), "N/A");
        x_keys.insert(x.clone());
        y_keys.insert(y.clone());
        *counts.entry((x, y)).or_default() += 1;
    }
    (
        x_keys.into_iter().collect(),
        y_keys.into_iter().collect(),
        counts,
    )
}

/// 2D contingency counts for the categorical heatmap. The y dimension is
/// the secondary column, falling back to the grouping column.
pub fn contingency(rows: &[Row], config: &ViewConfig) -> Result<ContingencyView, PrepareError> {
    let y_col = config
        .y_axis
        .as_ref()
        .or(config.group_by.as_ref())
        .ok_or(PrepareError::MissingHeatmapDimension)?;

    let (x_keys, y_keys, counts) = contingency_counts(rows, &config.x_axis, y_col);

    let mut cells = Vec::with_capacity(x_keys.len() * y_keys.len());
    let mut max_count = 0;
    for (i, x) in x_keys.iter().enumerate() {
        for (j, y) in y_keys.iter().enumerate() {
            let count = counts
                .get(&(x.clone(), y.clone()))
                .copied()
                .unwrap_or(0);
            max_count = max_count.max(count);
            cells.push((i, j, count));
        }
    }

    Ok(ContingencyView { x_keys, y_keys, cells, max_count })
}

/// Contingency counts in dense matrix form for the crosstab table,
/// rows from the x-column, columns from the grouping column.
pub fn crosstab(rows: &[Row], config: &ViewConfig) -> Result<CrosstabView, PrepareError> {
    let col_col = config
        .group_by
        .as_ref()
        .ok_or(PrepareError::MissingCrosstabDimension)?;

    let (row_keys, col_keys, counts) = contingency_counts(rows, &config.x_axis, col_col);

    let mut max_count = 0;
    let matrix: Vec<Vec<usize>> = row_keys
        .iter()
        .map(|r| {
            col_keys
                .iter()
                .map(|c| {
                    let count = counts
                        .get(&(r.clone(), c.clone()))
                        .copied()
                        .unwrap_or(0);
                    max_count = max_count.max(count);
                    count
                })
                .collect()
        })
        .collect();

    Ok(CrosstabView { row_keys, col_keys, counts: matrix, max_count })
}

// ============================================================================
// SANKEY
// ============================================================================

/// Flow graph from the x-column to the grouping column. Node names carry
/// a role suffix so a value appearing on both sides stays two nodes.
pub fn sankey(rows: &[Row], config: &ViewConfig) -> Result<SankeyView, PrepareError> {
    let target_col = config
        .group_by
        .as_ref()
        .ok_or(PrepareError::MissingSankeyTarget)?;

    let mut nodes: Vec<String> = Vec::new();
    let mut seen: FxHashMap<String, ()> = FxHashMap::default();
    let mut link_counts: BTreeMap<(String, String), usize> = BTreeMap::new();

    for row in rows {
        let source = format!("{} (Source)", display_or(row.cell(&config.x_axis), "N/A"));
        let target = format!("{} (Target)", display_or(row.cell(target_col), "N/A"));
        for node in [&source, &target] {
            if seen.insert(node.clone(), ()).is_none() {
                nodes.push(node.clone());
            }
        }
        *link_counts.entry((source, target)).or_default() += 1;
    }

    let links = link_counts
        .into_iter()
        .map(|((source, target), value)| SankeyLink { source, target, value })
        .collect();

    Ok(SankeyView { nodes, links })
}

// ============================================================================
// HISTOGRAM
// ============================================================================

/// Uniform-width bins over the numeric values of the x-column, bin count
/// by Sturges' rule. A value exactly at the maximum is clamped into the
/// last bin.
pub fn histogram(rows: &[Row], config: &ViewConfig) -> Result<HistogramView, PrepareError> {
    let values: Vec<f64> = rows
        .iter()
        .filter_map(|r| r.cell(&config.x_axis).as_f64())
        .collect();
    if values.is_empty() {
        return Err(PrepareError::NoNumericData);
    }

    let bin_count = ((values.len() as f64).log2() + 1.0).ceil() as usize;
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / bin_count as f64;

    let edges: Vec<f64> = (0..=bin_count).map(|i| min + i as f64 * width).collect();

    let mut counts = vec![0usize; bin_count];
    for v in &values {
        // All-equal data has zero width; everything lands in bin 0.
        let idx = if width > 0.0 {
            (((v - min) / width).floor() as usize).min(bin_count - 1)
        } else {
            0
        };
        counts[idx] += 1;
    }

    let labels = (0..bin_count)
        .map(|i| format!("{:.1} - {:.1}", edges[i], edges[i + 1]))
        .collect();

    Ok(HistogramView { labels, counts, edges })
}

// ============================================================================
// MULTI-VARIABLE COMPARISON
// ============================================================================

/// Buckets up to six selected columns on one shared categorical axis,
/// through the same split/map pipeline as the generic aggregator. In
/// percentage mode each series value is that variable's share of the
/// total responses to the category, not of the variable's own total.
pub fn multi_compare(
    rows: &[Row],
    config: &ViewConfig,
    codebook: &Codebook,
) -> Result<MultiCompareView, PrepareError> {
    let variables: Vec<&String> = config
        .multi_axis_variables
        .iter()
        .filter(|v| !v.is_empty())
        .take(MAX_COMPARE_VARIABLES)
        .collect();
    if variables.is_empty() {
        return Err(PrepareError::NoCompareVariables);
    }

    let mut buckets: FxHashMap<&str, FxHashMap<String, usize>> = FxHashMap::default();
    let mut categories: BTreeSet<String> = BTreeSet::new();

    for row in rows {
        for variable in &variables {
            let pieces = split_pieces(
                row.cell(variable),
                config.split_values,
                config.strict_mode,
            );
            for piece in pieces {
                let piece = if piece.is_empty() { "N/A" } else { piece.as_str() };
                let mapped = codebook.label(variable, piece).to_string();
                categories.insert(mapped.clone());
                *buckets
                    .entry(variable.as_str())
                    .or_default()
                    .entry(mapped)
                    .or_default() += 1;
            }
        }
    }

    let categories: Vec<String> = categories.into_iter().collect();
    let totals: Vec<usize> = categories
        .iter()
        .map(|cat| {
            variables
                .iter()
                .map(|v| {
                    buckets
                        .get(v.as_str())
                        .and_then(|b| b.get(cat))
                        .copied()
                        .unwrap_or(0)
                })
                .sum()
        })
        .collect();

    let is_percentage = config.chart_type.is_percentage();
    let series = variables
        .iter()
        .map(|variable| {
            let values = categories
                .iter()
                .enumerate()
                .map(|(idx, cat)| {
                    let raw = buckets
                        .get(variable.as_str())
                        .and_then(|b| b.get(cat))
                        .copied()
                        .unwrap_or(0) as f64;
                    if is_percentage {
                        let total = totals[idx] as f64;
                        if total > 0.0 { raw / total * 100.0 } else { 0.0 }
                    } else {
                        raw
                    }
                })
                .collect();
            CompareSeries { name: variable.to_string(), values }
        })
        .collect();

    Ok(MultiCompareView { categories, series, is_percentage })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use engine::Dataset;

    fn create_numeric_rows(pairs: &[(&str, &str)]) -> Dataset {
        let rows = pairs
            .iter()
            .map(|(x, y)| {
                HashMap::from([
                    ("x".to_string(), RawValue::from(*x)),
                    ("y".to_string(), RawValue::from(*y)),
                ])
            })
            .collect();
        Dataset::from_rows(vec!["x".to_string(), "y".to_string()], rows)
    }

    fn create_value_rows(values: &[&str]) -> Dataset {
        let rows = values
            .iter()
            .map(|v| HashMap::from([("x".to_string(), RawValue::from(*v))]))
            .collect();
        Dataset::from_rows(vec!["x".to_string()], rows)
    }

    #[test]
    fn test_scatter_requires_secondary_axis() {
        let ds = create_numeric_rows(&[("1", "2")]);
        let cfg = ViewConfig::new("x", ChartType::Scatter);
        assert_eq!(scatter(ds.rows(), &cfg), Err(PrepareError::MissingSecondaryAxis));
    }

    #[test]
    fn test_scatter_drops_non_numeric_rows() {
        let ds = create_numeric_rows(&[("1", "2"), ("oops", "3"), ("4", "5")]);
        let cfg = ViewConfig::new("x", ChartType::Scatter).with_y_axis("y");
        let view = scatter(ds.rows(), &cfg).unwrap();
        assert_eq!(view.series.len(), 1);
        assert_eq!(view.series[0].name, "All");
        assert_eq!(view.series[0].points, vec![(1.0, 2.0), (4.0, 5.0)]);
    }

    #[test]
    fn test_scatter_jitter_stays_within_bounds() {
        let ds = create_numeric_rows(&[("2", "3"); 50]);
        let cfg = ViewConfig::new("x", ChartType::ScatterJitter).with_y_axis("y");
        let view = scatter(ds.rows(), &cfg).unwrap();
        for (x, y) in &view.series[0].points {
            assert!((x - 2.0).abs() <= 0.3);
            assert!((y - 3.0).abs() <= 0.3);
        }
    }

    #[test]
    fn test_boxplot_quartiles_and_outlier() {
        let ds = create_value_rows(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "100"]);
        let cfg = ViewConfig::new("x", ChartType::Boxplot);
        let view = boxplot(ds.rows(), &cfg);
        assert_eq!(view.categories, vec!["All".to_string()]);
        let [min, q1, median, q3, max] = view.boxes[0];
        assert_eq!(min, 1.0);
        assert!((q1 - 3.25).abs() < 1e-12);
        assert!((median - 5.5).abs() < 1e-12);
        assert!((q3 - 7.75).abs() < 1e-12);
        // displayed max is the largest in-bound value, not the bound
        assert_eq!(max, 9.0);
        assert_eq!(view.outliers, vec![(0, 100.0)]);
    }

    #[test]
    fn test_boxplot_groups_by_category_with_secondary() {
        let headers = vec!["cat".to_string(), "val".to_string()];
        let rows = vec![
            HashMap::from([
                ("cat".to_string(), RawValue::from("a")),
                ("val".to_string(), RawValue::from("1")),
            ]),
            HashMap::from([
                ("cat".to_string(), RawValue::from("b")),
                ("val".to_string(), RawValue::from("5")),
            ]),
            HashMap::from([("val".to_string(), RawValue::from("9"))]),
        ];
        let ds = Dataset::from_rows(headers, rows);
        let cfg = ViewConfig::new("cat", ChartType::Boxplot).with_y_axis("val");
        let view = boxplot(ds.rows(), &cfg);
        assert_eq!(view.categories, vec!["N/A", "a", "b"]);
    }

    #[test]
    fn test_correlation_identical_columns() {
        let ds = create_numeric_rows(&[("1", "1"), ("2", "2"), ("3", "3")]);
        let view = correlation_matrix(ds.rows(), &["x".to_string(), "y".to_string()]).unwrap();
        assert_eq!(view.labels, vec!["x", "y"]);
        assert_eq!(view.cells.len(), 4);
        for (_, _, corr) in &view.cells {
            assert!((corr - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_correlation_needs_two_numeric_columns() {
        let ds = create_value_rows(&["a", "b"]);
        assert_eq!(
            correlation_matrix(ds.rows(), &["x".to_string()]),
            Err(PrepareError::TooFewNumericColumns)
        );
    }

    #[test]
    fn test_contingency_includes_zero_cells() {
        let ds = create_numeric_rows(&[("a", "p"), ("b", "q"), ("a", "p")]);
        let cfg = ViewConfig::new("x", ChartType::Heatmap).with_y_axis("y");
        let view = contingency(ds.rows(), &cfg).unwrap();
        assert_eq!(view.x_keys, vec!["a", "b"]);
        assert_eq!(view.y_keys, vec!["p", "q"]);
        // every (x, y) combination present, zeros included
        assert_eq!(view.cells.len(), 4);
        assert!(view.cells.contains(&(0, 0, 2)));
        assert!(view.cells.contains(&(0, 1, 0)));
        assert_eq!(view.max_count, 2);
    }

    #[test]
    fn test_contingency_falls_back_to_group_by() {
        let ds = create_numeric_rows(&[("a", "p")]);
        let cfg = ViewConfig::new("x", ChartType::Heatmap).with_group_by("y");
        assert!(contingency(ds.rows(), &cfg).is_ok());
        let bare = ViewConfig::new("x", ChartType::Heatmap);
        assert_eq!(
            contingency(ds.rows(), &bare),
            Err(PrepareError::MissingHeatmapDimension)
        );
    }

    #[test]
    fn test_crosstab_matrix() {
        let ds = create_numeric_rows(&[("a", "p"), ("a", "q"), ("b", "q")]);
        let cfg = ViewConfig::new("x", ChartType::Crosstab).with_group_by("y");
        let view = crosstab(ds.rows(), &cfg).unwrap();
        assert_eq!(view.row_keys, vec!["a", "b"]);
        assert_eq!(view.col_keys, vec!["p", "q"]);
        assert_eq!(view.counts, vec![vec![1, 1], vec![0, 1]]);
        assert_eq!(view.max_count, 1);
    }

    #[test]
    fn test_sankey_role_suffixed_nodes() {
        let ds = create_numeric_rows(&[("a", "a"), ("a", "b")]);
        let cfg = ViewConfig::new("x", ChartType::Sankey).with_group_by("y");
        let view = sankey(ds.rows(), &cfg).unwrap();
        // "a" appears in both roles without colliding into one node
        assert!(view.nodes.contains(&"a (Source)".to_string()));
        assert!(view.nodes.contains(&"a (Target)".to_string()));
        let link = view
            .links
            .iter()
            .find(|l| l.source == "a (Source)" && l.target == "a (Target)")
            .unwrap();
        assert_eq!(link.value, 1);
    }

    #[test]
    fn test_sankey_requires_group_by() {
        let ds = create_numeric_rows(&[("a", "b")]);
        let cfg = ViewConfig::new("x", ChartType::Sankey);
        assert_eq!(sankey(ds.rows(), &cfg), Err(PrepareError::MissingSankeyTarget));
    }

    #[test]
    fn test_histogram_sturges_bins_and_clamping() {
        let ds = create_value_rows(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"]);
        let cfg = ViewConfig::new("x", ChartType::Histogram);
        let view = histogram(ds.rows(), &cfg).unwrap();
        assert_eq!(view.counts.len(), 5);
        let expected_edges = [1.0, 2.8, 4.6, 6.4, 8.2, 10.0];
        for (edge, expected) in view.edges.iter().zip(expected_edges) {
            assert!((edge - expected).abs() < 1e-9);
        }
        // value 10 clamps into the last bin instead of overflowing
        assert_eq!(view.counts.iter().sum::<usize>(), 10);
        assert_eq!(*view.counts.last().unwrap(), 2); // 9 and 10
        assert_eq!(view.labels[0], "1.0 - 2.8");
    }

    #[test]
    fn test_histogram_no_numeric_data() {
        let ds = create_value_rows(&["a", "b"]);
        let cfg = ViewConfig::new("x", ChartType::Histogram);
        assert_eq!(histogram(ds.rows(), &cfg), Err(PrepareError::NoNumericData));
    }

    #[test]
    fn test_histogram_all_equal_values() {
        let ds = create_value_rows(&["5", "5", "5"]);
        let cfg = ViewConfig::new("x", ChartType::Histogram);
        let view = histogram(ds.rows(), &cfg).unwrap();
        assert_eq!(view.counts.iter().sum::<usize>(), 3);
    }

    #[test]
    fn test_multi_compare_requires_variables() {
        let ds = create_value_rows(&["a"]);
        let cfg = ViewConfig::new("x", ChartType::StackedColumn);
        assert_eq!(
            multi_compare(ds.rows(), &cfg, &Codebook::new()),
            Err(PrepareError::NoCompareVariables)
        );
    }

    #[test]
    fn test_multi_compare_percentage_is_share_of_category_total() {
        let headers = vec!["q1".to_string(), "q2".to_string()];
        let rows = vec![
            HashMap::from([
                ("q1".to_string(), RawValue::from("yes")),
                ("q2".to_string(), RawValue::from("yes")),
            ]),
            HashMap::from([
                ("q1".to_string(), RawValue::from("yes")),
                ("q2".to_string(), RawValue::from("no")),
            ]),
        ];
        let ds = Dataset::from_rows(headers, rows);
        let mut cfg = ViewConfig::new("q1", ChartType::PercentStackedColumn);
        cfg.multi_axis_variables = vec!["q1".to_string(), "q2".to_string()];
        let view = multi_compare(ds.rows(), &cfg, &Codebook::new()).unwrap();
        assert!(view.is_percentage);
        assert_eq!(view.categories, vec!["no", "yes"]);
        // "yes" category: q1 contributed 2 of 3, q2 contributed 1 of 3
        let q1 = &view.series[0];
        let q2 = &view.series[1];
        assert!((q1.values[1] - 200.0 / 3.0).abs() < 1e-9);
        assert!((q2.values[1] - 100.0 / 3.0).abs() < 1e-9);
        // "no" category is 100% q2
        assert_eq!(q1.values[0], 0.0);
        assert_eq!(q2.values[0], 100.0);
    }

    #[test]
    fn test_multi_compare_caps_at_six_variables() {
        let ds = create_value_rows(&["a"]);
        let mut cfg = ViewConfig::new("x", ChartType::SideBySideBar);
        cfg.multi_axis_variables = (0..8).map(|i| format!("v{}", i)).collect();
        let view = multi_compare(ds.rows(), &cfg, &Codebook::new()).unwrap();
        assert_eq!(view.series.len(), 6);
    }

    #[test]
    fn test_prepare_dispatches_multi_axis_only_with_variables() {
        let ds = create_value_rows(&["a", "b"]);
        let headers = vec!["x".to_string()];
        let cb = Codebook::new();

        // stacked chart without selected variables aggregates generically
        let cfg = ViewConfig::new("x", ChartType::StackedColumn);
        match prepare(ds.rows(), &headers, &cfg, &cb).unwrap() {
            ChartData::Aggregation(view) => assert_eq!(view.total_count, 2),
            other => panic!("expected aggregation, got {:?}", other),
        }

        let mut cfg = ViewConfig::new("x", ChartType::StackedColumn);
        cfg.multi_axis_variables = vec!["x".to_string()];
        assert!(matches!(
            prepare(ds.rows(), &headers, &cfg, &cb).unwrap(),
            ChartData::MultiCompare(_)
        ));
    }
}
