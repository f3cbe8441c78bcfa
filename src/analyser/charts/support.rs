//! Charts that back individual insights.

use super::canvas::{extent, padded_range, render_png, truncate_label};
use super::heatmap::slot_range;
use crate::analyser::logic::insights::{ClusterFinding, CorrelationPair, OutlierFinding};
use crate::theme::Palette;
use anyhow::{Result, ensure};
use plotters::prelude::*;

/// Bars of the strongest correlations, strongest first.
pub fn render_top_correlations(
    pairs: &[CorrelationPair],
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    ensure!(!pairs.is_empty(), "No correlations to chart");
    let k = pairs.len();
    let labels: Vec<String> = pairs
        .iter()
        .map(|p| format!("{} & {}", truncate_label(&p.left, 14), truncate_label(&p.right, 14)))
        .collect();

    render_png(size, palette, |root| {
        let x_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
            _ => String::new(),
        };
        let mut chart = ChartBuilder::on(root)
            .caption("Top Correlations", palette.title_font())
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(70)
            .build_cartesian_2d(slot_range(k).into_segmented(), 0.0..1.0)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .bold_line_style(palette.grid.mix(0.6))
            .light_line_style(palette.grid.mix(0.2))
            .x_labels(k)
            .x_label_formatter(&x_label)
            .axis_style(&palette.edge)
            .label_style(palette.label_font(12))
            .axis_desc_style(palette.label_font(16))
            .y_desc("|Pearson r|")
            .draw()?;

        chart.draw_series(pairs.iter().enumerate().map(|(i, pair)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), pair.strength),
                ],
                palette.correlation_color(pair.strength).filled(),
            )
        }))?;
        chart.draw_series(pairs.iter().enumerate().map(|(i, pair)| {
            Rectangle::new(
                [
                    (SegmentValue::Exact(i), 0.0),
                    (SegmentValue::Exact(i + 1), pair.strength),
                ],
                palette.background.stroke_width(3),
            )
        }))?;
        Ok(())
    })
}

/// Horizontal box plot: box from Q1 to Q3, median line, whiskers to the most
/// extreme values inside the fence, outliers as points.
pub fn render_outlier_boxplot(
    finding: &OutlierFinding,
    values: &[f64],
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    let fence = finding.fence;
    let (min_v, max_v) =
        extent(values.iter().copied()).ok_or_else(|| anyhow::anyhow!("No values to plot"))?;
    let inside = values.iter().copied().filter(|v| fence.contains(*v));
    let (whisker_lo, whisker_hi) = extent(inside).unwrap_or((fence.q1, fence.q3));
    let outliers: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| !fence.contains(*v))
        .collect();

    render_png(size, palette, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(format!("Outliers in {}", finding.column), palette.title_font())
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(30)
            .build_cartesian_2d(padded_range(min_v, max_v)?, 0.0..1.0)?;

        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(0)
            .bold_line_style(palette.grid.mix(0.6))
            .light_line_style(palette.grid.mix(0.2))
            .axis_style(&palette.edge)
            .label_style(palette.label_font(14))
            .axis_desc_style(palette.label_font(16))
            .x_desc(truncate_label(&finding.column, 40))
            .draw()?;

        let (lo, hi, mid) = (0.3, 0.7, 0.5);
        chart.draw_series(std::iter::once(Rectangle::new(
            [(fence.q1, lo), (fence.q3, hi)],
            palette.distribution.mix(0.45).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(fence.q1, lo), (fence.q3, hi)],
            palette.edge.stroke_width(2),
        )))?;

        let edge = palette.edge.stroke_width(2);
        let segments = [
            vec![(fence.median, lo), (fence.median, hi)],
            vec![(whisker_lo, mid), (fence.q1, mid)],
            vec![(fence.q3, mid), (whisker_hi, mid)],
            vec![(whisker_lo, 0.4), (whisker_lo, 0.6)],
            vec![(whisker_hi, 0.4), (whisker_hi, 0.6)],
        ];
        chart.draw_series(segments.into_iter().map(|s| PathElement::new(s, edge)))?;

        chart.draw_series(
            outliers
                .iter()
                .map(|&v| Circle::new((v, mid), 5, palette.outlier.filled())),
        )?;
        Ok(())
    })
}

/// Scatter of the sampled points coloured by cluster label.
pub fn render_clusters(
    finding: &ClusterFinding,
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    ensure!(
        finding.points.len() == finding.labels.len(),
        "Every point needs a cluster label"
    );
    let (x_lo, x_hi) = extent(finding.points.iter().map(|p| p.0))
        .ok_or_else(|| anyhow::anyhow!("No points to plot"))?;
    let (y_lo, y_hi) = extent(finding.points.iter().map(|p| p.1))
        .ok_or_else(|| anyhow::anyhow!("No points to plot"))?;
    let (x_name, y_name) = (&finding.features.0, &finding.features.1);

    render_png(size, palette, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                format!(
                    "Clusters of {} vs {}",
                    truncate_label(x_name, 20),
                    truncate_label(y_name, 20)
                ),
                palette.title_font(),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(padded_range(x_lo, x_hi)?, padded_range(y_lo, y_hi)?)?;

        chart
            .configure_mesh()
            .bold_line_style(palette.grid.mix(0.6))
            .light_line_style(palette.grid.mix(0.2))
            .axis_style(&palette.edge)
            .label_style(palette.label_font(14))
            .axis_desc_style(palette.label_font(16))
            .x_desc(truncate_label(x_name, 40))
            .y_desc(truncate_label(y_name, 40))
            .draw()?;

        chart.draw_series(
            finding
                .points
                .iter()
                .zip(&finding.labels)
                .map(|(&p, &label)| Circle::new(p, 4, palette.cluster_color(label).filled())),
        )?;
        Ok(())
    })
}
