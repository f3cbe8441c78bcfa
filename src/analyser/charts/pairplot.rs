use super::canvas::{Canvas, extent, padded_range, render_png, truncate_label};
use crate::analyser::logic::stats;
use crate::theme::Palette;
use anyhow::{Context as _, Result, ensure};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;

/// One sampled numeric column for the pairplot grid.
pub struct PairColumn<'a> {
    pub name: &'a str,
    pub values: Vec<Option<f64>>,
}

/// Longest side of the pairplot grid in pixels.
pub const MAX_PAIRPLOT_EDGE: u32 = 4_000;

/// Cells are never shrunk below this; wider selections are refused.
pub const MIN_PAIRPLOT_CELL: u32 = 40;

/// Cell edge for an `n`-column grid, shrunk so the grid fits [`MAX_PAIRPLOT_EDGE`].
pub fn fitted_cell(n: usize, requested: u32) -> Result<u32> {
    let columns = u32::try_from(n).context("Too many pairplot columns")?;
    ensure!(columns > 0, "Pairplot needs columns");
    let cell = requested.min(MAX_PAIRPLOT_EDGE / columns);
    ensure!(
        cell >= MIN_PAIRPLOT_CELL,
        "Pairplot of {n} columns would need cells under {MIN_PAIRPLOT_CELL} px"
    );
    Ok(cell)
}

/// n x n grid: histograms on the diagonal, scatter plots elsewhere.
pub fn render_pairplot(columns: &[PairColumn<'_>], palette: &Palette, cell: u32) -> Result<Vec<u8>> {
    let n = columns.len();
    ensure!(n > 1, "Pairplot needs at least two numeric columns");
    let edge = fitted_cell(n, cell)? * n as u32;
    render_png((edge, edge + 40), palette, |root| {
        draw_pairplot(root, columns, palette)
    })
}

fn draw_pairplot(root: &Canvas<'_>, columns: &[PairColumn<'_>], palette: &Palette) -> Result<()> {
    let n = columns.len();
    let grid = root.titled("Pairplot of Numeric Columns", palette.title_font())?;
    let cells = grid.split_evenly((n, n));

    for (idx, area) in cells.iter().enumerate() {
        let (row, col) = (idx / n, idx % n);
        let (Some(y_col), Some(x_col)) = (columns.get(row), columns.get(col)) else {
            continue;
        };
        let x_desc = if row + 1 == n { truncate_label(x_col.name, 24) } else { String::new() };
        let y_desc = if col == 0 { truncate_label(y_col.name, 24) } else { String::new() };

        if row == col {
            draw_diagonal(area, &stats::present(&x_col.values), palette, &x_desc, &y_desc)?;
        } else {
            let points = stats::complete_pairs(&x_col.values, &y_col.values);
            draw_scatter(area, &points, palette, &x_desc, &y_desc)?;
        }
    }
    Ok(())
}

fn draw_diagonal(
    area: &Canvas<'_>,
    values: &[f64],
    palette: &Palette,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let bins = stats::histogram(values);
    let Some((lo, hi)) = extent(bins.iter().flat_map(|b| [b.start, b.end])) else {
        return Ok(());
    };
    let y_max = bins.iter().map(|b| b.count).max().unwrap_or(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(padded_range(lo, hi)?, 0.0..y_max * 1.1)?;
    configure_cell(&mut chart, palette, x_desc, y_desc)?;

    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            palette.pair_fill.mix(0.7).filled(),
        )
    }))?;
    chart.draw_series(bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            palette.pair_edge.stroke_width(1),
        )
    }))?;
    Ok(())
}

fn draw_scatter(
    area: &Canvas<'_>,
    points: &[(f64, f64)],
    palette: &Palette,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    let (Some((x_lo, x_hi)), Some((y_lo, y_hi))) = (
        extent(points.iter().map(|p| p.0)),
        extent(points.iter().map(|p| p.1)),
    ) else {
        return Ok(());
    };

    let mut chart = ChartBuilder::on(area)
        .margin(6)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(padded_range(x_lo, x_hi)?, padded_range(y_lo, y_hi)?)?;
    configure_cell(&mut chart, palette, x_desc, y_desc)?;

    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 3, palette.pair_fill.mix(0.8).filled())),
    )?;
    chart.draw_series(
        points
            .iter()
            .map(|&p| Circle::new(p, 3, palette.pair_edge.stroke_width(1))),
    )?;
    Ok(())
}

fn configure_cell(
    chart: &mut ChartContext<'_, BitMapBackend<'_>, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    palette: &Palette,
    x_desc: &str,
    y_desc: &str,
) -> Result<()> {
    chart
        .configure_mesh()
        .x_labels(4)
        .y_labels(4)
        .bold_line_style(palette.grid.mix(0.4))
        .light_line_style(palette.grid.mix(0.1))
        .axis_style(&palette.edge)
        .label_style(palette.label_font(10))
        .axis_desc_style(palette.label_font(12))
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;
    Ok(())
}
