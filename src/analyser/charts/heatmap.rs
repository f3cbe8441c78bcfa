use super::canvas::{Canvas, render_png, truncate_label};
use crate::analyser::logic::types::CorrelationMatrix;
use crate::theme::Palette;
use anyhow::{Result, ensure};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Segment range holding exactly `n` slots (plotters integer ranges are inclusive).
pub fn slot_range(n: usize) -> std::ops::Range<usize> {
    0..n.saturating_sub(1).max(1)
}

/// Annotated correlation matrix.
pub fn render_heatmap(
    matrix: &CorrelationMatrix,
    palette: &Palette,
    size: (u32, u32),
) -> Result<Vec<u8>> {
    ensure!(
        matrix.columns.len() > 1,
        "Heatmap needs at least two numeric columns"
    );
    render_png(size, palette, |root| draw_heatmap(root, matrix, palette))
}

#[expect(clippy::indexing_slicing)]
fn draw_heatmap(root: &Canvas<'_>, matrix: &CorrelationMatrix, palette: &Palette) -> Result<()> {
    let n = matrix.columns.len();
    let labels: Vec<String> = matrix.columns.iter().map(|c| truncate_label(c, 18)).collect();

    // Row 0 is drawn at the top, so y slot `s` holds matrix row `n - 1 - s`.
    let x_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(i) if *i < n => labels[*i].clone(),
        _ => String::new(),
    };
    let y_label = |v: &SegmentValue<usize>| match v {
        SegmentValue::CenterOf(s) if *s < n => labels[n - 1 - *s].clone(),
        _ => String::new(),
    };

    let mut chart = ChartBuilder::on(root)
        .caption("Correlation Heatmap", palette.title_font())
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(160)
        .build_cartesian_2d(slot_range(n).into_segmented(), slot_range(n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&x_label)
        .y_label_formatter(&y_label)
        .axis_style(&palette.edge)
        .label_style(palette.label_font(14))
        .draw()?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));
    chart.draw_series(cells.clone().map(|(row, col)| {
        let value = matrix.get(row, col).unwrap_or(f64::NAN);
        let y = n - 1 - row;
        Rectangle::new(
            [
                (SegmentValue::Exact(col), SegmentValue::Exact(y)),
                (SegmentValue::Exact(col + 1), SegmentValue::Exact(y + 1)),
            ],
            palette.correlation_color(value).filled(),
        )
    }))?;

    let annotation = palette
        .label_font(16)
        .pos(Pos::new(HPos::Center, VPos::Center));
    chart.draw_series(cells.map(|(row, col)| {
        let value = matrix.get(row, col).unwrap_or(f64::NAN);
        let text = if value.is_finite() {
            format!("{value:.2}")
        } else {
            "nan".to_owned()
        };
        Text::new(
            text,
            (SegmentValue::CenterOf(col), SegmentValue::CenterOf(n - 1 - row)),
            annotation.clone(),
        )
    }))?;

    Ok(())
}
