//! Correlation, outlier and cluster findings over the dataset's numeric columns.
//!
//! Each sub-analysis runs independently through [`fail_soft`], so one failing
//! never costs the others their insights or support charts.

use super::classify::numeric_columns;
use super::clustering;
use super::stats::{self, IqrFence, SAMPLE_ROW_CAP, SAMPLE_SEED};
use super::types::{ArtifactKey, CorrelationMatrix, Insight, InsightKind, VisualArtifact};
use crate::analyser::charts::support;
use crate::config::AnalysisConfig;
use crate::theme::{Palette, ThemeSelector};
use crate::utils::fail_soft;
use anyhow::{Context as _, Result};
use polars::prelude::*;

/// Pairs must be strictly stronger than this (in absolute value) to be reported.
pub const CORRELATION_THRESHOLD: f64 = 0.7;
pub const MAX_CORRELATION_INSIGHTS: usize = 3;
pub const IQR_FENCE_MULTIPLIER: f64 = 1.5;
/// Outlier insights only fire when outliers are rarer than this share of rows.
pub const OUTLIER_RATE_CEILING: f64 = 0.05;
pub const CLUSTER_COUNT: usize = 3;

/// Two distinct columns and their absolute Pearson correlation.
#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationPair {
    pub left: String,
    pub right: String,
    pub strength: f64,
}

impl CorrelationPair {
    pub fn percent(&self) -> i64 {
        (self.strength * 100.0).round() as i64
    }

    pub fn describe(&self) -> String {
        format!(
            "Strong correlation between '{}' and '{}' ({}%).",
            self.left,
            self.right,
            self.percent()
        )
    }
}

/// The strongest qualifying pairs, strongest first.
///
/// Only the upper triangle is read, so each unordered pair appears once and
/// the diagonal never does. Ties keep matrix order.
pub fn strongest_correlations(matrix: &CorrelationMatrix) -> Vec<CorrelationPair> {
    let n = matrix.columns.len();
    let mut pairs: Vec<CorrelationPair> = (0..n)
        .flat_map(|i| ((i + 1)..n).map(move |j| (i, j)))
        .filter_map(|(i, j)| {
            let strength = matrix.get(i, j)?.abs();
            let qualifies = strength > CORRELATION_THRESHOLD && strength < 1.0;
            if !qualifies {
                return None;
            }
            Some(CorrelationPair {
                left: matrix.columns.get(i)?.clone(),
                right: matrix.columns.get(j)?.clone(),
                strength,
            })
        })
        .collect();

    pairs.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    pairs.truncate(MAX_CORRELATION_INSIGHTS);
    pairs
}

/// A column whose IQR fence leaves a small number of values outside.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierFinding {
    pub column: String,
    pub fence: IqrFence,
    pub count: usize,
}

impl OutlierFinding {
    pub fn describe(&self) -> String {
        let noun = if self.count == 1 { "outlier" } else { "outliers" };
        format!(
            "Found {} {noun} in '{}' outside [{:.2}, {:.2}].",
            self.count, self.column, self.fence.lower, self.fence.upper
        )
    }
}

/// Applies the IQR rule to one column.
///
/// `None` when the IQR is zero, when nothing falls outside the fence, or when
/// outliers make up 5% or more of `row_count`.
pub fn find_outliers(column: &str, values: &[f64], row_count: usize) -> Option<OutlierFinding> {
    let fence = stats::iqr_fence(values, IQR_FENCE_MULTIPLIER)?;
    if fence.iqr <= 0.0 {
        return None;
    }
    let count = fence.count_outside(values);
    let ceiling = OUTLIER_RATE_CEILING * row_count as f64;
    (count > 0 && (count as f64) < ceiling).then(|| OutlierFinding {
        column: column.to_owned(),
        fence,
        count,
    })
}

/// K-Means labels over the sampled rows of two feature columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterFinding {
    pub features: (String, String),
    pub points: Vec<(f64, f64)>,
    pub labels: Vec<usize>,
}

impl ClusterFinding {
    pub fn cluster_count(&self) -> usize {
        self.labels.iter().max().map_or(0, |max| max + 1)
    }

    pub fn describe(&self) -> String {
        format!(
            "Identified {} distinct clusters using '{}' and '{}'.",
            CLUSTER_COUNT, self.features.0, self.features.1
        )
    }
}

/// Clusters the first two numeric columns.
///
/// Rows missing either feature are dropped before sampling. Returns `Ok(None)`
/// when fewer than two numeric columns exist or no complete rows remain.
///
/// # Errors
///
/// Fails when the columns cannot be read or K-Means cannot fit, for example
/// with fewer complete rows than clusters.
pub fn cluster_sample(df: &DataFrame, numeric: &[String]) -> Result<Option<ClusterFinding>> {
    let [x_name, y_name, ..] = numeric else {
        return Ok(None);
    };
    let x = stats::numeric_values(df, x_name)?;
    let y = stats::numeric_values(df, y_name)?;
    let complete = stats::complete_pairs(&x, &y);
    if complete.is_empty() {
        return Ok(None);
    }

    let picked = stats::sample_indices(complete.len(), SAMPLE_ROW_CAP, SAMPLE_SEED);
    let points = stats::take_rows(&complete, &picked);
    let labels = clustering::assign_clusters(&points, CLUSTER_COUNT, SAMPLE_SEED)
        .with_context(|| format!("K-Means over '{x_name}' and '{y_name}'"))?;

    Ok(Some(ClusterFinding {
        features: (x_name.clone(), y_name.clone()),
        points,
        labels,
    }))
}

/// Insights in discovery order plus the charts they point at.
#[derive(Debug, Default)]
pub struct InsightReport {
    pub insights: Vec<Insight>,
    pub artifacts: Vec<VisualArtifact>,
}

impl InsightReport {
    /// Adds insights and, when it rendered, the chart backing them.
    fn record(&mut self, insights: Vec<Insight>, support: Option<VisualArtifact>) {
        let key = support.as_ref().map(|artifact| artifact.key.clone());
        self.insights
            .extend(insights.into_iter().map(|i| i.with_support(key.clone())));
        self.artifacts.extend(support);
    }
}

/// Runs every sub-analysis over the whole dataset.
///
/// Never fails: anything that goes wrong is logged and that finding is left out.
pub fn discover_insights(
    df: &DataFrame,
    theme: ThemeSelector,
    config: &AnalysisConfig,
) -> InsightReport {
    let palette = theme.palette();
    let size = config.render.support_plot.as_tuple();
    let numeric = numeric_columns(df);
    let mut report = InsightReport::default();

    if let Some(pairs) = fail_soft("correlation insights", correlation_pairs(df, &numeric))
        && !pairs.is_empty()
    {
        let support = fail_soft(
            "top_correlations",
            support::render_top_correlations(&pairs, palette, size),
        )
        .map(|png| VisualArtifact::new(ArtifactKey::TopCorrelations, png, theme));
        let insights = pairs
            .iter()
            .map(|p| Insight::new(InsightKind::Correlation, p.describe()))
            .collect();
        report.record(insights, support);
    }

    for column in &numeric {
        let step = format!("outliers in '{column}'");
        let Some(Some((finding, values))) = fail_soft(&step, column_outliers(df, column)) else {
            continue;
        };
        let key = ArtifactKey::Outliers(column.clone());
        let support = fail_soft(
            &key.to_string(),
            support::render_outlier_boxplot(&finding, &values, palette, size),
        )
        .map(|png| VisualArtifact::new(key, png, theme));
        report.record(
            vec![Insight::new(InsightKind::Outlier, finding.describe())],
            support,
        );
    }

    if config.clustering_available() {
        if let Some(Some(finding)) = fail_soft("cluster insight", cluster_sample(df, &numeric)) {
            let support = render_cluster_support(&finding, palette, size, theme);
            report.record(
                vec![Insight::new(InsightKind::Cluster, finding.describe())],
                support,
            );
        }
    } else {
        tracing::debug!("Clustering unavailable; skipping cluster insight");
    }

    tracing::debug!(
        insights = report.insights.len(),
        support_charts = report.artifacts.len(),
        "Insight discovery finished"
    );
    report
}

fn correlation_pairs(df: &DataFrame, numeric: &[String]) -> Result<Vec<CorrelationPair>> {
    if numeric.len() < 2 {
        return Ok(Vec::new());
    }
    let matrix = stats::correlation_matrix(df, numeric)?;
    Ok(strongest_correlations(&matrix))
}

fn column_outliers(df: &DataFrame, column: &str) -> Result<Option<(OutlierFinding, Vec<f64>)>> {
    let values = stats::present(&stats::numeric_values(df, column)?);
    Ok(find_outliers(column, &values, df.height()).map(|finding| (finding, values)))
}

fn render_cluster_support(
    finding: &ClusterFinding,
    palette: &Palette,
    size: (u32, u32),
    theme: ThemeSelector,
) -> Option<VisualArtifact> {
    fail_soft("clusters", support::render_clusters(finding, palette, size))
        .map(|png| VisualArtifact::new(ArtifactKey::Clusters, png, theme))
}
