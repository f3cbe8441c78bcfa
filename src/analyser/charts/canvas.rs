use crate::theme::{FONT_FAMILY, Palette};
use anyhow::{Context as _, Result, ensure};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::register_font;
use std::io::Cursor;
use std::sync::OnceLock;

/// DejaVu Sans, shipped with the crate so text renders without system fonts.
static EMBEDDED_FONT: &[u8] = include_bytes!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/assets/fonts/DejaVuSans.ttf"
));

static FONT_READY: OnceLock<bool> = OnceLock::new();

/// Drawing surface handed to chart code. Each render owns its own buffer.
pub type Canvas<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders one chart into a fresh RGB buffer and returns it PNG-encoded.
///
/// The background is filled with the palette's background colour before `draw`
/// runs.
pub fn render_png<F>(size: (u32, u32), palette: &Palette, draw: F) -> Result<Vec<u8>>
where
    F: FnOnce(&Canvas<'_>) -> Result<()>,
{
    let (width, height) = size;
    ensure!(width > 0 && height > 0, "Canvas must not be empty");
    ensure_font()?;

    let mut buffer = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, size).into_drawing_area();
        root.fill(&palette.background)?;
        draw(&root)?;
        root.present()?;
    }
    encode_png(buffer, width, height)
}

/// Registers the embedded font under [`FONT_FAMILY`] the first time it is needed.
fn ensure_font() -> Result<()> {
    let ready = *FONT_READY.get_or_init(|| {
        let registered = register_font(FONT_FAMILY, FontStyle::Normal, EMBEDDED_FONT).is_ok();
        if !registered {
            tracing::error!("Embedded font could not be parsed");
        }
        registered
    });
    ensure!(ready, "No font available for chart text");
    Ok(())
}

fn encode_png(buffer: Vec<u8>, width: u32, height: u32) -> Result<Vec<u8>> {
    let image = RgbImage::from_raw(width, height, buffer)
        .context("Pixel buffer does not match canvas size")?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .context("Failed to encode PNG")?;
    Ok(bytes)
}

/// Axis range covering `[min, max]` with a little headroom.
///
/// Degenerate ranges (a single value) are widened so plotters always gets a
/// non-empty, finite span.
pub fn padded_range(min: f64, max: f64) -> Result<std::ops::Range<f64>> {
    ensure!(
        min.is_finite() && max.is_finite(),
        "Axis bounds must be finite"
    );
    let span = max - min;
    if span.abs() < f64::EPSILON {
        let pad = if min.abs() > 1.0 { min.abs() * 0.1 } else { 1.0 };
        return Ok((min - pad)..(max + pad));
    }
    let pad = span * 0.05;
    Ok((min - pad)..(max + pad))
}

/// Min and max of the finite values, if any.
pub fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// Shortens long labels so axis text stays readable.
pub fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() <= max_chars {
        label.to_owned()
    } else {
        let mut out: String = label.chars().take(max_chars.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
