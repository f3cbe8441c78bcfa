//! Column extraction and the numeric primitives behind charts and insights.
//!
//! Missing values are kept as `None` while extracting so that pairwise
//! statistics (correlation, scatter plots, clustering) can drop incomplete rows
//! per pair rather than per column. NaN is treated as missing.

use super::types::CorrelationMatrix;
use anyhow::{Context as _, Result};
use polars::prelude::*;
use rand::SeedableRng as _;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Upper bound on rows used by the pairplot and clustering.
pub const SAMPLE_ROW_CAP: usize = 500;

/// Fixed seed so repeated requests draw the same sample.
pub const SAMPLE_SEED: u64 = 42;

/// A column cast to `f64` with NaN turned into null.
pub fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let series = df
        .column(name)
        .with_context(|| format!("Column '{name}' not found"))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::Float64)
        .with_context(|| format!("Column '{name}' cannot be read as numbers"))?;
    let ca = casted.f64()?;
    Ok(ca.set(&ca.is_nan(), None)?)
}

/// Extracts a column as optional `f64` values, one per row.
pub fn numeric_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    Ok(float_column(df, name)?.iter().collect())
}

/// Extracts a column as optional strings, one per row.
pub fn text_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)
        .with_context(|| format!("Column '{name}' not found"))?
        .as_materialized_series();
    let casted = series
        .cast(&DataType::String)
        .with_context(|| format!("Column '{name}' cannot be read as text"))?;
    let ca = casted.str()?;
    Ok(ca.into_iter().map(|v| v.map(str::to_owned)).collect())
}

pub fn present(values: &[Option<f64>]) -> Vec<f64> {
    values.iter().flatten().copied().collect()
}

fn chunked(values: &[f64]) -> Float64Chunked {
    Float64Chunked::from_slice("values".into(), values)
}

fn quantile(ca: &Float64Chunked, q: f64) -> Option<f64> {
    ca.quantile(q, QuantileMethod::Linear).ok().flatten()
}

/// Interquartile range and the outlier fence derived from it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IqrFence {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrFence {
    /// Closed interval: values on the fence are not outliers.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }

    pub fn count_outside(&self, values: &[f64]) -> usize {
        values.iter().filter(|v| !self.contains(**v)).count()
    }
}

/// `[Q1 - k*IQR, Q3 + k*IQR]` with linearly interpolated quartiles.
pub fn iqr_fence(values: &[f64], multiplier: f64) -> Option<IqrFence> {
    let ca = chunked(values);
    let q1 = quantile(&ca, 0.25)?;
    let median = ca.median()?;
    let q3 = quantile(&ca, 0.75)?;
    let iqr = q3 - q1;
    Some(IqrFence {
        q1,
        median,
        q3,
        iqr,
        lower: q1 - multiplier * iqr,
        upper: q3 + multiplier * iqr,
    })
}

/// Pearson correlation over rows where both values are present.
///
/// `None` when undefined: fewer than two complete rows or a constant side.
pub fn pearson(x: &Float64Chunked, y: &Float64Chunked) -> Option<f64> {
    let r = polars::prelude::cov::pearson_corr(x, y)
        .filter(|r| r.is_finite())?
        .clamp(-1.0, 1.0);
    // Rounding noise must not turn a perfect linear relation into "almost perfect".
    if 1.0 - r.abs() < 1e-12 {
        Some(r.signum())
    } else {
        Some(r)
    }
}

/// Pairwise Pearson matrix over the named numeric columns.
pub fn correlation_matrix(df: &DataFrame, names: &[String]) -> Result<CorrelationMatrix> {
    let columns = names
        .iter()
        .map(|name| float_column(df, name))
        .collect::<Result<Vec<_>>>()?;

    let n = columns.len();
    let mut data = vec![vec![f64::NAN; n]; n];
    for (i, x) in columns.iter().enumerate() {
        for (j, y) in columns.iter().enumerate().skip(i) {
            let r = if i == j {
                if x.std(1).is_some_and(|s| s > 0.0) {
                    1.0
                } else {
                    f64::NAN
                }
            } else {
                pearson(x, y).unwrap_or(f64::NAN)
            };
            if let Some(cell) = data.get_mut(i).and_then(|row| row.get_mut(j)) {
                *cell = r;
            }
            if let Some(cell) = data.get_mut(j).and_then(|row| row.get_mut(i)) {
                *cell = r;
            }
        }
    }

    Ok(CorrelationMatrix {
        columns: names.to_vec(),
        data,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Freedman-Diaconis binning clamped to 5..=50 bins.
///
/// A constant column gets a single unit-wide bin centred on its value.
pub fn histogram(values: &[f64]) -> Vec<HistogramBin> {
    let ca = chunked(values);
    let Some((min_v, max_v)) = ca.min_max() else {
        return Vec::new();
    };

    if (max_v - min_v).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min_v - 0.5,
            end: min_v + 0.5,
            count: values.len(),
        }];
    }

    let n = values.len();
    let iqr = quantile(&ca, 0.75).unwrap_or(max_v) - quantile(&ca, 0.25).unwrap_or(min_v);
    let h = if iqr > 0.0 {
        2.0 * iqr / (n as f64).cbrt()
    } else {
        (max_v - min_v) / (n as f64).sqrt()
    };

    let num_bins = (((max_v - min_v) / h).ceil() as usize).clamp(5, 50);
    let bin_width = (max_v - min_v) / num_bins as f64;

    let mut counts = vec![0usize; num_bins];
    for val in values {
        let idx = (((val - min_v) / bin_width).floor() as usize).min(num_bins - 1);
        if let Some(c) = counts.get_mut(idx) {
            *c += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| HistogramBin {
            start: min_v + i as f64 * bin_width,
            end: min_v + (i + 1) as f64 * bin_width,
            count,
        })
        .collect()
}

/// Gaussian kernel density estimate with Scott's bandwidth, evaluated at
/// `points` evenly spaced positions across `[lo, hi]`.
///
/// Empty when the density is undefined (fewer than two values or zero spread).
pub fn gaussian_kde(values: &[f64], lo: f64, hi: f64, points: usize) -> Vec<(f64, f64)> {
    let Some(sd) = chunked(values).std(1).filter(|s| *s > 0.0) else {
        return Vec::new();
    };
    if points < 2 || hi <= lo {
        return Vec::new();
    }
    let n = values.len() as f64;
    let bw = sd * n.powf(-0.2);
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());
    let step = (hi - lo) / (points - 1) as f64;

    (0..points)
        .map(|i| {
            let x = lo + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|v| (-0.5 * ((x - v) / bw).powi(2)).exp())
                .sum();
            (x, density * norm)
        })
        .collect()
}

/// Most frequent values, highest count first. Ties keep first-seen order.
/// Missing values are not counted.
///
/// Counted by hand: polars' `value_counts` does not promise first-seen order
/// among equal counts.
pub fn value_counts(values: &[Option<String>], top: usize) -> Vec<(String, usize)> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for v in values.iter().flatten() {
        let entry = counts.entry(v.as_str()).or_insert(0);
        if *entry == 0 {
            first_seen.push(v.as_str());
        }
        *entry += 1;
    }

    let mut ranked: Vec<(String, usize)> = first_seen
        .into_iter()
        .map(|v| (v.to_owned(), counts.get(v).copied().unwrap_or(0)))
        .collect();
    // Stable sort keeps first-seen order within equal counts.
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top);
    ranked
}

/// Row indices for a reproducible sample of at most `cap` rows, ascending.
pub fn sample_indices(row_count: usize, cap: usize, seed: u64) -> Vec<usize> {
    if row_count <= cap {
        return (0..row_count).collect();
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut picked = rand::seq::index::sample(&mut rng, row_count, cap).into_vec();
    picked.sort_unstable();
    picked
}

/// Picks `indices` out of `values`, skipping any out of range.
pub fn take_rows<T: Clone>(values: &[T], indices: &[usize]) -> Vec<T> {
    indices.iter().filter_map(|&i| values.get(i).cloned()).collect()
}

/// Rows where both coordinates are present.
pub fn complete_pairs(x: &[Option<f64>], y: &[Option<f64>]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect()
}
