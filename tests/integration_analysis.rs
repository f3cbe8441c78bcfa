//! Integration tests for the full analysis workflow
//!
//! These tests load the CSV fixtures in `testdata/`, run the complete
//! pipeline and check the result and its JSON payload.

use plotsight::analyser::logic::clustering;
use plotsight::analyser::logic::{
    AnalysisRequest, InsightKind, PlotKind, analyze_file_flow, load_df, run_analysis,
};
use plotsight::config::{AnalysisConfig, FigureSize, RenderSettings};
use plotsight::error::AnalysisError;
use plotsight::theme::ThemeSelector;
use std::path::Path;

fn quick_config() -> AnalysisConfig {
    AnalysisConfig {
        clustering_enabled: true,
        render: RenderSettings {
            heatmap: FigureSize::new(320, 240),
            column_plot: FigureSize::new(320, 240),
            support_plot: FigureSize::new(320, 240),
            pairplot_cell: 100,
        },
    }
}

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[test]
fn test_analyze_sales_csv() -> anyhow::Result<()> {
    let request = AnalysisRequest::from_tokens(
        ["units", "revenue", "region"],
        &["heatmap", "count"],
        Some("light"),
    );
    let result = analyze_file_flow(Path::new("testdata/sales.csv"), &request, &quick_config())?;

    let requested: Vec<&str> = result.requested_artifacts.keys().map(String::as_str).collect();
    assert_eq!(requested, vec!["heatmap", "plot_region"]);
    for key in ["pairplot", "plot_units", "plot_revenue", "top_correlations", "outliers_discount"] {
        assert!(
            result.auxiliary_artifacts.contains_key(key),
            "Expected auxiliary artifact {key}"
        );
    }
    for artifact in result
        .requested_artifacts
        .values()
        .chain(result.auxiliary_artifacts.values())
    {
        assert!(artifact.png.starts_with(&PNG_SIGNATURE), "{artifact:?} is not a PNG");
        assert_eq!(artifact.theme, ThemeSelector::Light);
    }

    let texts: Vec<&str> = result.insights.iter().map(|i| i.text.as_str()).collect();
    assert!(
        texts
            .iter()
            .any(|t| t.starts_with("Strong correlation between 'units' and 'revenue'")),
        "Insights were {texts:?}"
    );
    assert!(texts.iter().any(|t| t.contains("'discount'")), "Insights were {texts:?}");

    let clusters = result
        .insights
        .iter()
        .filter(|i| i.kind == InsightKind::Cluster)
        .count();
    let expected_clusters = usize::from(clustering::is_compiled_in());
    assert_eq!(clusters, expected_clusters);
    Ok(())
}

#[test]
fn test_payload_round_trips_through_json() -> anyhow::Result<()> {
    let df = load_df(Path::new("testdata/sales.csv"))?;
    let request = AnalysisRequest::new(["discount", "priority"]).with_plot_kinds(PlotKind::ALL);
    let result = run_analysis(&df, &request, &quick_config().without_clustering())?;

    let json = serde_json::to_string(&result.to_payload())?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    let requested = value["requestedArtifacts"]
        .as_object()
        .ok_or_else(|| anyhow::anyhow!("requestedArtifacts is not an object"))?;
    assert!(requested.contains_key("plot_discount"));
    assert!(requested.contains_key("plot_priority"));
    assert!(!requested.contains_key("heatmap"), "Only one numeric column was selected");

    let insights = value["insights"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("insights is not an array"))?;
    let outlier = insights
        .iter()
        .find(|i| i["type"] == "outlier")
        .ok_or_else(|| anyhow::anyhow!("no outlier insight in {insights:?}"))?;
    assert_eq!(outlier["supportArtifact"], "outliers_discount");
    assert!(
        value["auxiliaryArtifacts"]["outliers_discount"].is_string(),
        "Support charts are serialized with the auxiliary artifacts"
    );
    Ok(())
}

#[test]
fn test_missing_values_csv() -> anyhow::Result<()> {
    let request = AnalysisRequest::new(["temperature", "humidity", "status"])
        .with_plot_kinds([PlotKind::Distribution, PlotKind::Pairplot]);
    let result = analyze_file_flow(
        Path::new("testdata/missing_values.csv"),
        &request,
        &quick_config(),
    )?;

    for key in ["plot_temperature", "plot_humidity", "pairplot"] {
        assert!(result.requested_artifacts.contains_key(key), "Missing {key}");
    }
    assert!(result.auxiliary_artifacts.contains_key("plot_status"));
    assert!(result.auxiliary_artifacts.contains_key("heatmap"));
    Ok(())
}

#[test]
fn test_unknown_column_is_fatal() {
    let request = AnalysisRequest::new(["units", "no_such_column"]);
    let outcome = analyze_file_flow(Path::new("testdata/sales.csv"), &request, &quick_config());
    assert!(matches!(outcome, Err(AnalysisError::UnknownColumn(_))));
}

#[test]
fn test_missing_file_is_an_error() {
    let request = AnalysisRequest::new(["units"]);
    let outcome = analyze_file_flow(Path::new("testdata/nope.csv"), &request, &quick_config());
    assert!(outcome.is_err());
}
