use super::canvas::{Canvas, extent, padded_range, render_png, truncate_label};
use super::heatmap::slot_range;
use crate::analyser::logic::stats::{self, HistogramBin};
use crate::theme::Palette;
use anyhow::Result;
use plotters::prelude::*;

/// Density-normalized histogram with a KDE overlay.
///
/// A column with no values still gets its titled, empty axes.
pub fn render_distribution(
    column: &str,
    values: &[f64],
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    render_png(size, palette, |root| {
        draw_distribution(root, column, values, palette)
    })
}

fn draw_distribution(
    root: &Canvas<'_>,
    column: &str,
    values: &[f64],
    palette: &Palette,
) -> Result<()> {
    let bins = stats::histogram(values);
    let n = values.len() as f64;
    let densities: Vec<(HistogramBin, f64)> = bins
        .iter()
        .map(|bin| (*bin, bin.count as f64 / (n * (bin.end - bin.start))))
        .collect();

    let (lo, hi) = extent(bins.iter().flat_map(|b| [b.start, b.end])).unwrap_or((0.0, 1.0));
    let kde = stats::gaussian_kde(values, lo, hi, 200);

    let y_max = densities
        .iter()
        .map(|(_, d)| *d)
        .chain(kde.iter().map(|(_, d)| *d))
        .fold(0.0_f64, f64::max);
    let y_top = if y_max > 0.0 { y_max * 1.1 } else { 1.0 };

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Distribution of {column}"), palette.title_font())
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(padded_range(lo, hi)?, 0.0..y_top)?;

    chart
        .configure_mesh()
        .bold_line_style(palette.grid.mix(0.6))
        .light_line_style(palette.grid.mix(0.2))
        .axis_style(&palette.edge)
        .label_style(palette.label_font(14))
        .axis_desc_style(palette.label_font(16))
        .x_desc(truncate_label(column, 40))
        .y_desc("Density")
        .draw()?;

    chart.draw_series(densities.iter().map(|(bin, density)| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, *density)],
            palette.distribution.mix(0.45).filled(),
        )
    }))?;
    chart.draw_series(densities.iter().map(|(bin, density)| {
        Rectangle::new([(bin.start, 0.0), (bin.end, *density)], palette.edge.stroke_width(1))
    }))?;

    if !kde.is_empty() {
        chart.draw_series(LineSeries::new(kde, palette.distribution.stroke_width(2)))?;
    }

    Ok(())
}

/// Vertical bars of the most frequent values, most frequent first.
///
/// No counts draws the axes alone.
pub fn render_counts(
    column: &str,
    counts: &[(String, usize)],
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    render_png(size, palette, |root| {
        draw_counts(root, column, counts, palette)
    })
}

fn draw_counts(
    root: &Canvas<'_>,
    column: &str,
    counts: &[(String, usize)],
    palette: &Palette,
) -> Result<()> {
    let k = counts.len();
    let y_max = counts.iter().map(|(_, c)| *c).max().unwrap_or(1) as f64;
    let labels: Vec<String> = counts.iter().map(|(v, _)| truncate_label(v, 12)).collect();
    let x_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) => labels.get(*i).cloned().unwrap_or_default(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption(format!("Frequency Count of {column}"), palette.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(70)
        .build_cartesian_2d(slot_range(k).into_segmented(), 0.0..y_max * 1.1)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .bold_line_style(palette.grid.mix(0.6))
        .light_line_style(palette.grid.mix(0.2))
        .x_labels(k.max(1))
        .x_label_formatter(&x_label)
        .axis_style(&palette.edge)
        .label_style(palette.label_font(12))
        .axis_desc_style(palette.label_font(16))
        .x_desc(truncate_label(column, 40))
        .y_desc("Count")
        .draw()?;

    chart.draw_series(counts.iter().enumerate().map(|(rank, (_, count))| {
        Rectangle::new(
            [
                (SegmentValue::Exact(rank), 0.0),
                (SegmentValue::Exact(rank + 1), *count as f64),
            ],
            palette.category_color(rank).filled(),
        )
    }))?;
    // Background-coloured outlines separate neighbouring bars.
    chart.draw_series(counts.iter().enumerate().map(|(rank, (_, count))| {
        Rectangle::new(
            [
                (SegmentValue::Exact(rank), 0.0),
                (SegmentValue::Exact(rank + 1), *count as f64),
            ],
            palette.background.stroke_width(3),
        )
    }))?;

    Ok(())
}
