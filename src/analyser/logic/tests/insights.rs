use super::{frame, nullable, numeric, ramp, small_config, text};
use crate::analyser::logic::insights::{
    CorrelationPair, MAX_CORRELATION_INSIGHTS, cluster_sample, discover_insights,
    find_outliers, strongest_correlations,
};
use crate::analyser::logic::types::{ArtifactKey, CorrelationMatrix, InsightKind};
use crate::theme::ThemeSelector;
use anyhow::Result;

/// 1..=40 plus one far-away value: one outlier in 41 rows.
fn with_one_outlier() -> Vec<f64> {
    let mut values = ramp(40);
    values.push(1_000.0);
    values
}

fn matrix(columns: &[&str], data: Vec<Vec<f64>>) -> CorrelationMatrix {
    CorrelationMatrix {
        columns: columns.iter().map(|s| (*s).to_owned()).collect(),
        data,
    }
}

#[test]
fn test_single_outlier_needs_enough_rows() {
    let values = [1.0, 2.0, 3.0, 4.0, 5.0, 100.0];
    // One outlier in six rows is above the 5% rate.
    assert!(find_outliers("v", &values, values.len()).is_none());

    let finding = find_outliers("v", &values, 40);
    assert_eq!(finding.map(|f| f.count), Some(1));
}

#[test]
fn test_outlier_finding_reports_count_and_fence() {
    let values = with_one_outlier();
    let finding = find_outliers("latency", &values, values.len());
    let Some(finding) = finding else {
        panic!("Expected an outlier finding");
    };
    assert_eq!(finding.count, 1);
    assert_eq!(
        finding.describe(),
        "Found 1 outlier in 'latency' outside [-19.00, 61.00]."
    );
}

#[test]
fn test_constant_column_has_no_outliers() {
    let mut values = vec![5.0; 50];
    values.push(500.0);
    assert!(find_outliers("flat", &values, values.len()).is_none());
}

#[test]
fn test_common_outliers_are_not_reported() {
    let mut values = ramp(36);
    values.extend([900.0, 950.0, 1_000.0, 1_050.0]);
    // 4 outliers in 40 rows is 10%.
    assert!(find_outliers("wide", &values, values.len()).is_none());
}

#[test]
fn test_strongest_correlations_filters_sorts_and_caps() {
    let m = matrix(
        &["a", "b", "c", "d", "e"],
        vec![
            vec![1.0, 1.0, 0.75, 0.95, -0.85],
            vec![1.0, 1.0, 0.7, 0.1, 0.2],
            vec![0.75, 0.7, 1.0, 0.8, f64::NAN],
            vec![0.95, 0.1, 0.8, 1.0, 0.3],
            vec![-0.85, 0.2, f64::NAN, 0.3, 1.0],
        ],
    );
    let pairs = strongest_correlations(&m);

    assert_eq!(pairs.len(), MAX_CORRELATION_INSIGHTS);
    let names: Vec<(&str, &str)> = pairs
        .iter()
        .map(|p| (p.left.as_str(), p.right.as_str()))
        .collect();
    assert_eq!(names, vec![("a", "d"), ("a", "e"), ("c", "d")]);
    assert!(pairs.iter().all(|p| p.strength > 0.7 && p.strength < 1.0));
}

#[test]
fn test_perfectly_correlated_columns_are_excluded() -> Result<()> {
    let df = frame(vec![
        numeric("A", &[1.0, 2.0, 3.0, 4.0]),
        numeric("B", &[2.0, 4.0, 6.0, 8.0]),
    ])?;
    let report = discover_insights(
        &df,
        ThemeSelector::Dark,
        &small_config().without_clustering(),
    );
    assert!(
        report
            .insights
            .iter()
            .all(|i| i.kind != InsightKind::Correlation),
        "A correlation of exactly 1 must not be reported"
    );
    Ok(())
}

#[test]
fn test_correlation_text_rounds_percentage() {
    let pair = CorrelationPair {
        left: "height".to_owned(),
        right: "weight".to_owned(),
        strength: 0.8749,
    };
    assert_eq!(pair.percent(), 87);
    assert_eq!(
        pair.describe(),
        "Strong correlation between 'height' and 'weight' (87%)."
    );
}

#[test]
fn test_correlation_insights_point_at_top_correlations() -> Result<()> {
    let df = frame(vec![
        numeric("x", &ramp(10)),
        numeric("y", &[1.0, 3.0, 2.0, 5.0, 4.0, 7.0, 6.0, 9.0, 8.0, 10.0]),
        text("label", &["a"; 10]),
    ])?;
    let report = discover_insights(&df, ThemeSelector::Light, &small_config().without_clustering());

    let correlations: Vec<_> = report
        .insights
        .iter()
        .filter(|i| i.kind == InsightKind::Correlation)
        .collect();
    assert_eq!(correlations.len(), 1);
    let insight = correlations.first().ok_or_else(|| anyhow::anyhow!("missing"))?;
    assert!(insight.text.contains("'x' and 'y'"), "{}", insight.text);
    assert_eq!(insight.support, Some(ArtifactKey::TopCorrelations));
    assert!(
        report
            .artifacts
            .iter()
            .any(|a| a.key == ArtifactKey::TopCorrelations && a.theme == ThemeSelector::Light)
    );
    Ok(())
}

#[test]
fn test_outlier_insight_has_box_plot() -> Result<()> {
    let df = frame(vec![numeric("latency", &with_one_outlier())])?;
    let report = discover_insights(&df, ThemeSelector::Dark, &small_config());

    assert_eq!(report.insights.len(), 1);
    let key = ArtifactKey::Outliers("latency".to_owned());
    assert_eq!(
        report.insights.first().and_then(|i| i.support.clone()),
        Some(key.clone())
    );
    assert!(report.artifacts.iter().any(|a| a.key == key && !a.png.is_empty()));
    Ok(())
}

#[test]
fn test_every_support_key_has_an_artifact() -> Result<()> {
    let df = frame(vec![
        numeric("x", &with_one_outlier()),
        numeric("y", &with_one_outlier()),
        nullable("z", &ramp(41).into_iter().map(Some).collect::<Vec<_>>()),
    ])?;
    let report = discover_insights(&df, ThemeSelector::Dark, &small_config());

    for insight in &report.insights {
        if let Some(key) = &insight.support {
            assert!(
                report.artifacts.iter().any(|a| &a.key == key),
                "Missing support chart {key}"
            );
        }
    }
    Ok(())
}

#[test]
fn test_clustering_needs_two_numeric_columns() -> Result<()> {
    let df = frame(vec![numeric("only", &ramp(10)), text("t", &["a"; 10])])?;
    let numeric = vec!["only".to_owned()];
    assert!(cluster_sample(&df, &numeric)?.is_none());
    Ok(())
}

#[test]
fn test_clustering_skips_when_no_complete_rows() -> Result<()> {
    let df = frame(vec![
        nullable("a", &[Some(1.0), None, Some(3.0)]),
        nullable("b", &[None, Some(2.0), None]),
    ])?;
    let numeric = vec!["a".to_owned(), "b".to_owned()];
    assert!(cluster_sample(&df, &numeric)?.is_none());
    Ok(())
}

#[test]
fn test_disabled_clustering_yields_no_cluster_insight() -> Result<()> {
    let df = frame(vec![numeric("a", &ramp(30)), numeric("b", &ramp(30))])?;
    let report = discover_insights(&df, ThemeSelector::Dark, &small_config().without_clustering());
    assert!(report.insights.iter().all(|i| i.kind != InsightKind::Cluster));
    assert!(report.artifacts.iter().all(|a| a.key != ArtifactKey::Clusters));
    Ok(())
}

#[cfg(feature = "clustering")]
mod clustering {
    use super::*;
    use crate::analyser::logic::insights::CLUSTER_COUNT;
    use crate::analyser::logic::stats::SAMPLE_ROW_CAP;

    fn blobs() -> Vec<(f64, f64)> {
        let mut points = Vec::new();
        for (cx, cy) in [(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)] {
            for i in 0..8 {
                let jitter = f64::from(i) * 0.1;
                points.push((cx + jitter, cy - jitter));
            }
        }
        points
    }

    fn blob_frame() -> Result<polars::prelude::DataFrame> {
        let points = blobs();
        let xs: Vec<f64> = points.iter().map(|p| p.0).collect();
        let ys: Vec<f64> = points.iter().map(|p| p.1).collect();
        frame(vec![numeric("x", &xs), numeric("y", &ys), numeric("extra", &ramp(24))])
    }

    #[test]
    fn test_clustering_is_deterministic() -> Result<()> {
        let df = blob_frame()?;
        let numeric = vec!["x".to_owned(), "y".to_owned()];
        let first = cluster_sample(&df, &numeric)?.ok_or_else(|| anyhow::anyhow!("no clusters"))?;
        let second = cluster_sample(&df, &numeric)?.ok_or_else(|| anyhow::anyhow!("no clusters"))?;

        assert_eq!(first.labels, second.labels);
        assert_eq!(first.labels.len(), 24);
        assert!(first.labels.iter().all(|&l| l < CLUSTER_COUNT));
        assert_eq!(first.features, ("x".to_owned(), "y".to_owned()));
        Ok(())
    }

    #[test]
    fn test_large_inputs_cluster_a_fixed_sample() -> Result<()> {
        let rows = 2_000_u32;
        let xs: Vec<f64> = (0..rows)
            .map(|i| f64::from(i % 3) * 10.0 + f64::from(i % 11) * 0.1)
            .collect();
        let ys: Vec<f64> = (0..rows)
            .map(|i| f64::from(i % 3) * 5.0 - f64::from(i % 13) * 0.1)
            .collect();
        let df = frame(vec![numeric("x", &xs), numeric("y", &ys)])?;
        let numeric = vec!["x".to_owned(), "y".to_owned()];

        let first = cluster_sample(&df, &numeric)?.ok_or_else(|| anyhow::anyhow!("no clusters"))?;
        let second = cluster_sample(&df, &numeric)?.ok_or_else(|| anyhow::anyhow!("no clusters"))?;

        assert_eq!(first.points.len(), SAMPLE_ROW_CAP);
        assert_eq!(first.labels.len(), SAMPLE_ROW_CAP);
        assert_eq!(first.points, second.points);
        assert_eq!(first.labels, second.labels);
        Ok(())
    }

    #[test]
    fn test_three_rows_are_enough() -> Result<()> {
        let df = frame(vec![
            numeric("a", &[1.0, 5.0, 9.0]),
            numeric("b", &[1.0, 5.0, 9.0]),
        ])?;
        let numeric = vec!["a".to_owned(), "b".to_owned()];
        let finding = cluster_sample(&df, &numeric)?.ok_or_else(|| anyhow::anyhow!("no clusters"))?;
        assert_eq!(finding.cluster_count(), CLUSTER_COUNT);
        Ok(())
    }

    #[test]
    fn test_too_few_rows_fail_soft() -> Result<()> {
        let df = frame(vec![numeric("a", &[1.0, 2.0]), numeric("b", &[3.0, 1.0])])?;
        let numeric = vec!["a".to_owned(), "b".to_owned()];
        assert!(cluster_sample(&df, &numeric).is_err());

        let report = discover_insights(&df, ThemeSelector::Dark, &small_config());
        assert!(report.insights.iter().all(|i| i.kind != InsightKind::Cluster));
        Ok(())
    }

    #[test]
    fn test_cluster_insight_uses_first_two_numeric_columns() -> Result<()> {
        let df = blob_frame()?;
        let report = discover_insights(&df, ThemeSelector::Light, &small_config());
        let cluster = report
            .insights
            .iter()
            .find(|i| i.kind == InsightKind::Cluster)
            .ok_or_else(|| anyhow::anyhow!("no cluster insight"))?;

        assert_eq!(
            cluster.text,
            "Identified 3 distinct clusters using 'x' and 'y'."
        );
        assert_eq!(cluster.support, Some(ArtifactKey::Clusters));
        Ok(())
    }
}
