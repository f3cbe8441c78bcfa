//! The plot catalog: which charts a column selection produces, and rendering them.
//!
//! [`plan`] turns a classification into a list of [`PlotSpec`]s. Each spec knows
//! its artifact key and how to render itself, so [`render_all`] is a loop that
//! keeps whatever rendered.

pub mod canvas;
pub mod heatmap;
pub mod pairplot;
pub mod plots;
pub mod support;

use crate::analyser::logic::classify::classify;
use crate::analyser::logic::stats::{self, SAMPLE_ROW_CAP, SAMPLE_SEED};
use crate::analyser::logic::types::{
    ArtifactKey, ArtifactMap, ColumnClassification, VisualArtifact,
};
use crate::config::RenderSettings;
use crate::error::AnalysisError;
use crate::theme::{Palette, ThemeSelector};
use crate::utils::fail_soft;
use anyhow::Result;
use pairplot::PairColumn;
use polars::prelude::*;

/// Most frequent values shown in a count plot.
pub const TOP_CATEGORIES: usize = 20;

/// One entry in the plot catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotSpec {
    /// Annotated correlation matrix over the numeric columns.
    Heatmap(Vec<String>),
    /// Density histogram of one numeric column.
    Distribution(String),
    /// Frequency bars of one categorical column.
    Count(String),
    /// Scatter grid over the numeric columns.
    Pairplot(Vec<String>),
}

impl PlotSpec {
    pub fn key(&self) -> ArtifactKey {
        match self {
            Self::Heatmap(_) => ArtifactKey::Heatmap,
            Self::Distribution(column) | Self::Count(column) => ArtifactKey::Column(column.clone()),
            Self::Pairplot(_) => ArtifactKey::Pairplot,
        }
    }

    /// Renders this chart to PNG bytes.
    ///
    /// # Errors
    ///
    /// Any failure reading the columns or drawing the chart.
    pub fn render(
        &self,
        df: &DataFrame,
        palette: &Palette,
        settings: &RenderSettings,
    ) -> Result<Vec<u8>> {
        match self {
            Self::Heatmap(columns) => {
                let matrix = stats::correlation_matrix(df, columns)?;
                heatmap::render_heatmap(&matrix, palette, settings.heatmap.as_tuple())
            }
            Self::Distribution(column) => {
                let values = stats::present(&stats::numeric_values(df, column)?);
                plots::render_distribution(column, &values, palette, settings.column_plot.as_tuple())
            }
            Self::Count(column) => {
                let counts = stats::value_counts(&stats::text_values(df, column)?, TOP_CATEGORIES);
                plots::render_counts(column, &counts, palette, settings.column_plot.as_tuple())
            }
            Self::Pairplot(columns) => {
                let rows = stats::sample_indices(df.height(), SAMPLE_ROW_CAP, SAMPLE_SEED);
                let sampled = columns
                    .iter()
                    .map(|name| -> Result<PairColumn<'_>> {
                        let values = stats::numeric_values(df, name)?;
                        Ok(PairColumn {
                            name: name.as_str(),
                            values: stats::take_rows(&values, &rows),
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                pairplot::render_pairplot(&sampled, palette, settings.pairplot_cell)
            }
        }
    }
}

/// Charts for a classified selection, in catalog order.
///
/// The heatmap and pairplot need more than one numeric column. Every classified
/// column gets its own plot.
pub fn plan(classification: &ColumnClassification) -> Vec<PlotSpec> {
    let multi_numeric = classification.numeric.len() > 1;
    let mut specs = Vec::with_capacity(classification.len() + 2);

    if multi_numeric {
        specs.push(PlotSpec::Heatmap(classification.numeric.clone()));
    }
    specs.extend(classification.numeric.iter().cloned().map(PlotSpec::Distribution));
    specs.extend(classification.categorical.iter().cloned().map(PlotSpec::Count));
    if multi_numeric {
        specs.push(PlotSpec::Pairplot(classification.numeric.clone()));
    }
    specs
}

/// Renders one catalog entry under `theme`.
///
/// # Errors
///
/// [`AnalysisError::Render`] naming the artifact key.
pub fn render_one(
    spec: &PlotSpec,
    df: &DataFrame,
    theme: ThemeSelector,
    settings: &RenderSettings,
) -> crate::error::Result<VisualArtifact> {
    let key = spec.key();
    let png = spec
        .render(df, theme.palette(), settings)
        .map_err(|e| AnalysisError::Render(format!("{key}: {e:#}")))?;
    Ok(VisualArtifact::new(key, png, theme))
}

/// Renders the full catalog. A chart that fails is logged and left out.
pub fn render_all(
    df: &DataFrame,
    classification: &ColumnClassification,
    theme: ThemeSelector,
    settings: &RenderSettings,
) -> ArtifactMap {
    plan(classification)
        .iter()
        .filter_map(|spec| {
            let rendered = render_one(spec, df, theme, settings).map_err(anyhow::Error::from);
            let artifact = fail_soft(&spec.key().to_string(), rendered)?;
            Some((artifact.key_string(), artifact))
        })
        .collect()
}

/// Classifies `columns` and renders their catalog.
///
/// # Errors
///
/// [`crate::error::AnalysisError::UnknownColumn`] when a column is missing.
pub fn render_catalog<S: AsRef<str>>(
    df: &DataFrame,
    columns: &[S],
    theme: ThemeSelector,
    settings: &RenderSettings,
) -> crate::error::Result<ArtifactMap> {
    let classification = classify(df, columns)?;
    Ok(render_all(df, &classification, theme, settings))
}
