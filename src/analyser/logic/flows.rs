use super::classify::classify;
use super::insights::discover_insights;
use super::io::load_df;
use super::selection::{merge_support, partition};
use super::types::{AnalysisRequest, AnalysisResult, Dataset};
use crate::analyser::charts::render_all;
use crate::config::AnalysisConfig;
use crate::error::Result;
use std::path::Path;

/// Runs one analysis request end to end.
///
/// Classification happens first and is the only step that can fail. Charts
/// and insights that fail are logged and left out of the result.
///
/// # Errors
///
/// [`crate::error::AnalysisError::UnknownColumn`] when a requested column is
/// not in `df`. No partial result is produced in that case.
pub fn run_analysis(
    df: &Dataset,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    let start = std::time::Instant::now();
    let classification = classify(df, &request.columns)?;
    tracing::info!(
        rows = df.height(),
        numeric = classification.numeric.len(),
        categorical = classification.categorical.len(),
        theme = %request.theme,
        "Starting analysis"
    );

    let artifacts = render_all(df, &classification, request.theme, &config.render);
    let report = discover_insights(df, request.theme, config);

    let (requested_artifacts, mut auxiliary_artifacts) =
        partition(artifacts, &request.plot_kinds, &classification);
    merge_support(&mut auxiliary_artifacts, report.artifacts);

    let result = AnalysisResult {
        requested_artifacts,
        auxiliary_artifacts,
        insights: report.insights,
    };
    tracing::info!(
        requested = result.requested_artifacts.len(),
        auxiliary = result.auxiliary_artifacts.len(),
        insights = result.insights.len(),
        "Analysis finished in {:?}",
        start.elapsed()
    );
    Ok(result)
}

/// Loads `path` and analyses it.
///
/// # Errors
///
/// Load failures from [`load_df`], then anything [`run_analysis`] returns.
pub fn analyze_file_flow(
    path: &Path,
    request: &AnalysisRequest,
    config: &AnalysisConfig,
) -> Result<AnalysisResult> {
    let df = load_df(path)?;
    run_analysis(&df, request, config)
}
