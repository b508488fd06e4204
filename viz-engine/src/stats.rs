//! FILENAME: viz-engine/src/stats.rs
//! PURPOSE: The statistical computations the dashboard surfaces.
//! CONTEXT: Chi-squared independence test for crosstabs, Wald confidence
//! intervals for category proportions, percentile/quartile interpolation
//! for boxplots, and Pearson correlation for the correlation matrix.
//! The distribution functions (inverse normal CDF, chi-squared CDF) are
//! closed-form approximations; this is not a general statistics library.

use std::collections::BTreeSet;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use engine::Row;
use crate::view::AggregationView;

/// Fixed significance threshold for the chi-squared test.
pub const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Default confidence level for proportion intervals.
pub const DEFAULT_CONFIDENCE: f64 = 0.95;

// ============================================================================
// CHI-SQUARED TEST OF INDEPENDENCE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChiSquareResult {
    pub chi_square: f64,
    pub df: usize,
    pub p_value: f64,
    pub significant: bool,
}

/// Chi-squared test of independence between two columns.
///
/// Contingency counts are built over raw (unmapped, unsplit) cell values,
/// missing cells counted under "N/A". Cells with zero expected count are
/// skipped, not penalized.
pub fn chi_square_test(rows: &[Row], row_col: &str, col_col: &str) -> ChiSquareResult {
    let mut observed: FxHashMap<String, FxHashMap<String, usize>> = FxHashMap::default();
    let mut row_keys: BTreeSet<String> = BTreeSet::new();
    let mut col_keys: BTreeSet<String> = BTreeSet::new();

    for row in rows {
        let r_cell = row.cell(row_col);
        let c_cell = row.cell(col_col);
        let r = if r_cell.is_missing() { "N/A".to_string() } else { r_cell.display() };
        let c = if c_cell.is_missing() { "N/A".to_string() } else { c_cell.display() };
        row_keys.insert(r.clone());
        col_keys.insert(c.clone());
        *observed.entry(r).or_default().entry(c).or_default() += 1;
    }

    let mut row_totals: FxHashMap<&String, usize> = FxHashMap::default();
    let mut col_totals: FxHashMap<&String, usize> = FxHashMap::default();
    let mut grand_total = 0usize;

    for r in &row_keys {
        for c in &col_keys {
            let count = observed.get(r).and_then(|m| m.get(c)).copied().unwrap_or(0);
            *row_totals.entry(r).or_default() += count;
            *col_totals.entry(c).or_default() += count;
            grand_total += count;
        }
    }

    let mut chi_square = 0.0;
    if grand_total > 0 {
        for r in &row_keys {
            for c in &col_keys {
                let obs = observed.get(r).and_then(|m| m.get(c)).copied().unwrap_or(0) as f64;
                let expected =
                    (row_totals[r] as f64) * (col_totals[c] as f64) / (grand_total as f64);
                if expected > 0.0 {
                    chi_square += (obs - expected).powi(2) / expected;
                }
            }
        }
    }

    let df = row_keys.len().saturating_sub(1) * col_keys.len().saturating_sub(1);
    let p_value = 1.0 - chi_square_cdf(chi_square, df);
    ChiSquareResult {
        chi_square,
        df,
        p_value,
        significant: p_value < SIGNIFICANCE_LEVEL,
    }
}

// ============================================================================
// PROPORTION CONFIDENCE INTERVAL
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceInterval {
    pub proportion: f64,
    pub lower: f64,
    pub upper: f64,
    pub error: f64,
}

/// Wald confidence interval for a proportion, clamped to [0, 1].
/// A zero total yields the all-zero interval instead of dividing by zero.
pub fn proportion_ci(count: usize, total: usize, confidence_level: f64) -> ConfidenceInterval {
    if total == 0 {
        return ConfidenceInterval::default();
    }
    let p = count as f64 / total as f64;
    let z = normal_quantile(1.0 - (1.0 - confidence_level) / 2.0);
    let error = z * (p * (1.0 - p) / total as f64).sqrt();
    ConfidenceInterval {
        proportion: p,
        lower: (p - error).max(0.0),
        upper: (p + error).min(1.0),
        error,
    }
}

/// Per-category counts, proportions and 95% CIs for the leading
/// categories of an aggregation view (the stats side panel).
///
/// With splitting active these are proportions of selections, not of
/// respondents; `total_count` already reflects that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub label: String,
    pub count: usize,
    pub ci: ConfidenceInterval,
}

pub fn category_summary(view: &AggregationView, limit: usize) -> Vec<CategorySummary> {
    view.x_values
        .iter()
        .take(limit)
        .map(|x| {
            let count = if view.is_grouped {
                view.total_for(x)
            } else {
                view.count(x, "All")
            };
            CategorySummary {
                label: x.clone(),
                count,
                ci: proportion_ci(count, view.total_count, DEFAULT_CONFIDENCE),
            }
        })
        .collect()
}

// ============================================================================
// PERCENTILES AND CORRELATION
// ============================================================================

/// Percentile with linear interpolation at rank `k * (n - 1)`,
/// `k` in [0, 1]. Input must be sorted ascending.
pub fn percentile(sorted: &[f64], k: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let rank = k * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let frac = rank - lo as f64;
    if lo + 1 < sorted.len() {
        sorted[lo] * (1.0 - frac) + sorted[lo + 1] * frac
    } else {
        sorted[lo]
    }
}

/// Pearson correlation coefficient over paired samples.
/// Returns 0.0 for fewer than two pairs or zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> f64 {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return 0.0;
    }
    let n_f = n as f64;
    let mean_x = xs[..n].iter().sum::<f64>() / n_f;
    let mean_y = ys[..n].iter().sum::<f64>() / n_f;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for i in 0..n {
        let dx = xs[i] - mean_x;
        let dy = ys[i] - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    let denom = (var_x * var_y).sqrt();
    if denom == 0.0 {
        0.0
    } else {
        cov / denom
    }
}

// ============================================================================
// DISTRIBUTION APPROXIMATIONS
// ============================================================================

/// Inverse normal CDF via the Beasley-Springer-Moro / Abramowitz-Stegun
/// rational approximation (absolute error below ~4.5e-4, ample for
/// confidence-interval z values).
pub fn normal_quantile(p: f64) -> f64 {
    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }
    if p < 0.5 {
        -normal_quantile(1.0 - p)
    } else {
        let t = (-2.0 * (1.0 - p).ln()).sqrt();
        t - (2.515517 + 0.802853 * t + 0.010328 * t * t)
            / (1.0 + 1.432788 * t + 0.189269 * t * t + 0.001308 * t * t * t)
    }
}

/// CDF of the chi-squared distribution with `df` degrees of freedom:
/// the regularized lower incomplete gamma P(df/2, x/2).
pub fn chi_square_cdf(x: f64, df: usize) -> f64 {
    if x <= 0.0 || df == 0 {
        return 0.0;
    }
    gamma_p(df as f64 / 2.0, x / 2.0)
}

/// Regularized lower incomplete gamma function P(a, x), via the series
/// expansion for x < a + 1 and the Lentz continued fraction otherwise.
fn gamma_p(a: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    let prefix = (-x + a * x.ln() - ln_gamma(a)).exp();
    if x < a + 1.0 {
        let mut ap = a;
        let mut sum = 1.0 / a;
        let mut term = sum;
        for _ in 0..200 {
            ap += 1.0;
            term *= x / ap;
            sum += term;
            if term.abs() < sum.abs() * 1e-12 {
                break;
            }
        }
        (prefix * sum).clamp(0.0, 1.0)
    } else {
        let tiny = 1e-30;
        let mut b = x + 1.0 - a;
        let mut c = 1.0 / tiny;
        let mut d = 1.0 / b;
        let mut h = d;
        for i in 1..200 {
            let an = -(i as f64) * (i as f64 - a);
            b += 2.0;
            d = an * d + b;
            if d.abs() < tiny {
                d = tiny;
            }
            c = b + an / c;
            if c.abs() < tiny {
                c = tiny;
            }
            d = 1.0 / d;
            let delta = d * c;
            h *= delta;
            if (delta - 1.0).abs() < 1e-12 {
                break;
            }
        }
        (1.0 - prefix * h).clamp(0.0, 1.0)
    }
}

/// Lanczos approximation of ln(Gamma(x)) for x > 0.
fn ln_gamma(x: f64) -> f64 {
    const COEF: [f64; 6] = [
        76.18009172947146,
        -86.50532032941677,
        24.01409824083091,
        -1.231739572450155,
        0.1208650973866179e-2,
        -0.5395239384953e-5,
    ];
    let tmp = x + 5.5;
    let tmp = tmp - (x + 0.5) * tmp.ln();
    let mut y = x;
    let mut ser = 1.000000000190015;
    for c in COEF {
        y += 1.0;
        ser += c / y;
    }
    -tmp + (2.5066282746310005 * ser / x).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use engine::{Dataset, RawValue};

    fn create_two_column_rows(pairs: &[(&str, &str)]) -> Dataset {
        let rows = pairs
            .iter()
            .map(|(a, b)| {
                HashMap::from([
                    ("a".to_string(), RawValue::from(*a)),
                    ("b".to_string(), RawValue::from(*b)),
                ])
            })
            .collect();
        Dataset::from_rows(vec!["a".to_string(), "b".to_string()], rows)
    }

    #[test]
    fn test_ci_zero_total_is_all_zero() {
        let ci = proportion_ci(0, 0, DEFAULT_CONFIDENCE);
        assert_eq!(ci, ConfidenceInterval::default());
    }

    #[test]
    fn test_ci_half_proportion() {
        let ci = proportion_ci(50, 100, 0.95);
        assert!((ci.proportion - 0.5).abs() < 1e-12);
        // z ~ 1.96, error ~ 1.96 * sqrt(0.25 / 100) = 0.098
        assert!((ci.error - 0.098).abs() < 1e-3);
        assert!(ci.lower > 0.0 && ci.upper < 1.0);
    }

    #[test]
    fn test_ci_clamped_to_unit_interval() {
        let ci = proportion_ci(1, 2, 0.95);
        assert!(ci.lower >= 0.0);
        assert!(ci.upper <= 1.0);
    }

    #[test]
    fn test_normal_quantile_known_values() {
        assert!((normal_quantile(0.975) - 1.959964).abs() < 1e-3);
        assert!((normal_quantile(0.5)).abs() < 1e-3);
        assert!((normal_quantile(0.025) + 1.959964).abs() < 1e-3);
    }

    #[test]
    fn test_chi_square_cdf_known_values() {
        // 95th percentile of chi-squared with 1 df is 3.841
        assert!((chi_square_cdf(3.841, 1) - 0.95).abs() < 1e-3);
        assert_eq!(chi_square_cdf(0.0, 1), 0.0);
        assert_eq!(chi_square_cdf(5.0, 0), 0.0);
    }

    #[test]
    fn test_chi_square_balanced_table_not_significant() {
        // 10 of each combination: perfectly independent.
        let mut pairs = Vec::new();
        for _ in 0..10 {
            pairs.push(("x", "p"));
            pairs.push(("x", "q"));
            pairs.push(("y", "p"));
            pairs.push(("y", "q"));
        }
        let ds = create_two_column_rows(&pairs);
        let res = chi_square_test(ds.rows(), "a", "b");
        assert!(res.chi_square.abs() < 1e-9);
        assert_eq!(res.df, 1);
        assert!((res.p_value - 1.0).abs() < 1e-9);
        assert!(!res.significant);
    }

    #[test]
    fn test_chi_square_dependent_table_significant() {
        // a fully determines b.
        let mut pairs = Vec::new();
        for _ in 0..30 {
            pairs.push(("x", "p"));
            pairs.push(("y", "q"));
        }
        let ds = create_two_column_rows(&pairs);
        let res = chi_square_test(ds.rows(), "a", "b");
        assert!(res.chi_square > 10.0);
        assert!(res.p_value < 0.01);
        assert!(res.significant);
    }

    #[test]
    fn test_percentile_quartiles() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 100.0];
        assert!((percentile(&values, 0.25) - 3.25).abs() < 1e-12);
        assert!((percentile(&values, 0.5) - 5.5).abs() < 1e-12);
        assert!((percentile(&values, 0.75) - 7.75).abs() < 1e-12);
        assert_eq!(percentile(&values, 1.0), 100.0);
        assert_eq!(percentile(&[7.0], 0.5), 7.0);
    }

    #[test]
    fn test_pearson_perfect_and_inverse() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        assert!((pearson(&xs, &ys) - 1.0).abs() < 1e-12);
        let neg = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &neg) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_degenerate_inputs() {
        assert_eq!(pearson(&[1.0], &[2.0]), 0.0);
        assert_eq!(pearson(&[1.0, 1.0, 1.0], &[2.0, 3.0, 4.0]), 0.0);
    }

    #[test]
    fn test_category_summary_counts_and_limit() {
        use crate::definition::{ChartType, ViewConfig};
        use crate::engine::aggregate;
        use engine::Codebook;

        let rows = ["a", "a", "b", "c"]
            .iter()
            .map(|v| HashMap::from([("q1".to_string(), RawValue::from(*v))]))
            .collect();
        let ds = Dataset::from_rows(vec!["q1".to_string()], rows);
        let view = aggregate(ds.rows(), &ViewConfig::new("q1", ChartType::Bar), &Codebook::new());

        let summary = category_summary(&view, 2);
        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].label, "a");
        assert_eq!(summary[0].count, 2);
        assert!((summary[0].ci.proportion - 0.5).abs() < 1e-12);
    }
}
