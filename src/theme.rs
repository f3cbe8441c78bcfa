//! Chart palettes.
//!
//! A [`Palette`] is resolved once per request and handed to every renderer by
//! reference. Nothing here is global or mutable, so concurrent analyses can
//! draw with different themes at the same time.

use plotters::style::{IntoFont as _, RGBColor, TextStyle};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Theme selector supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeSelector {
    #[default]
    Dark,
    Light,
}

impl ThemeSelector {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    /// Parses a selector, falling back to [`ThemeSelector::Dark`] for anything
    /// unrecognized or absent.
    pub fn parse_lossy(selector: Option<&str>) -> Self {
        selector
            .and_then(|s| s.parse().ok())
            .unwrap_or_default()
    }

    pub fn palette(self) -> &'static Palette {
        match self {
            Self::Dark => &DARK,
            Self::Light => &LIGHT,
        }
    }
}

impl FromStr for ThemeSelector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" => Ok(Self::Dark),
            "light" => Ok(Self::Light),
            other => Err(format!("unknown theme '{other}'")),
        }
    }
}

impl std::fmt::Display for ThemeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves a raw selector to its palette. Unknown selectors get the dark palette.
pub fn resolve(selector: &str) -> &'static Palette {
    ThemeSelector::parse_lossy(Some(selector)).palette()
}

/// Font family for all chart text. Plotters falls back to this name for
/// unstyled mesh labels too.
pub const FONT_FAMILY: &str = "sans-serif";

/// Colours shared by every chart drawn under one theme.
#[derive(Debug, PartialEq)]
pub struct Palette {
    pub theme: ThemeSelector,
    pub background: RGBColor,
    pub edge: RGBColor,
    pub label: RGBColor,
    pub text: RGBColor,
    pub grid: RGBColor,
    /// Histogram bars and KDE line.
    pub distribution: RGBColor,
    /// Pairplot marker fill and edge.
    pub pair_fill: RGBColor,
    pub pair_edge: RGBColor,
    /// Bars of frequency counts, cycled by rank.
    pub categorical: &'static [RGBColor],
    /// Correlation colormap stops at -1, 0 and +1.
    pub correlation: [RGBColor; 3],
    pub highlight: RGBColor,
    pub outlier: RGBColor,
    /// One colour per cluster label, cycled.
    pub clusters: &'static [RGBColor],
}

pub const DARK: Palette = Palette {
    theme: ThemeSelector::Dark,
    background: RGBColor(18, 18, 24),
    edge: RGBColor(0, 255, 255),
    label: RGBColor(255, 255, 255),
    text: RGBColor(255, 255, 255),
    grid: RGBColor(68, 68, 68),
    distribution: RGBColor(0, 255, 255),
    pair_fill: RGBColor(0, 255, 255),
    pair_edge: RGBColor(255, 0, 255),
    // matplotlib "cool", sampled
    categorical: &[
        RGBColor(0, 255, 255),
        RGBColor(51, 204, 255),
        RGBColor(102, 153, 255),
        RGBColor(153, 102, 255),
        RGBColor(204, 51, 255),
        RGBColor(255, 0, 255),
    ],
    correlation: [
        RGBColor(0, 255, 255),
        RGBColor(128, 128, 255),
        RGBColor(255, 0, 255),
    ],
    highlight: RGBColor(255, 0, 255),
    outlier: RGBColor(255, 85, 85),
    clusters: &[
        RGBColor(0, 255, 255),
        RGBColor(255, 0, 255),
        RGBColor(255, 255, 0),
        RGBColor(0, 255, 128),
        RGBColor(255, 128, 0),
    ],
};

pub const LIGHT: Palette = Palette {
    theme: ThemeSelector::Light,
    background: RGBColor(255, 255, 255),
    edge: RGBColor(51, 51, 51),
    label: RGBColor(34, 34, 34),
    text: RGBColor(34, 34, 34),
    grid: RGBColor(204, 204, 204),
    distribution: RGBColor(70, 130, 180),
    pair_fill: RGBColor(70, 130, 180),
    pair_edge: RGBColor(25, 25, 112),
    // seaborn "deep"
    categorical: &[
        RGBColor(76, 114, 176),
        RGBColor(221, 132, 82),
        RGBColor(85, 168, 104),
        RGBColor(196, 78, 82),
        RGBColor(129, 114, 179),
        RGBColor(147, 120, 96),
    ],
    // matplotlib "coolwarm"
    correlation: [
        RGBColor(59, 76, 192),
        RGBColor(221, 221, 221),
        RGBColor(180, 4, 38),
    ],
    highlight: RGBColor(196, 78, 82),
    outlier: RGBColor(214, 39, 40),
    clusters: &[
        RGBColor(31, 119, 180),
        RGBColor(255, 127, 14),
        RGBColor(44, 160, 44),
        RGBColor(148, 103, 189),
        RGBColor(140, 86, 75),
    ],
};

impl Palette {
    /// Maps a correlation coefficient in `[-1, 1]` onto the correlation colormap.
    /// Undefined coefficients get the grid colour.
    pub fn correlation_color(&self, value: f64) -> RGBColor {
        if !value.is_finite() {
            return self.grid;
        }
        let [low, mid, high] = self.correlation;
        let v = value.clamp(-1.0, 1.0);
        if v < 0.0 {
            lerp(mid, low, -v)
        } else {
            lerp(mid, high, v)
        }
    }

    pub fn category_color(&self, rank: usize) -> RGBColor {
        cycle(self.categorical, rank, self.distribution)
    }

    pub fn cluster_color(&self, label: usize) -> RGBColor {
        cycle(self.clusters, label, self.highlight)
    }

    pub fn title_font(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 24).into_font().color(&self.text)
    }

    pub fn label_font(&self, size: u32) -> TextStyle<'static> {
        (FONT_FAMILY, size).into_font().color(&self.label)
    }
}

fn cycle(colors: &[RGBColor], index: usize, fallback: RGBColor) -> RGBColor {
    if colors.is_empty() {
        return fallback;
    }
    colors.get(index % colors.len()).copied().unwrap_or(fallback)
}

fn lerp(from: RGBColor, to: RGBColor, t: f64) -> RGBColor {
    let mix = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        v.round().clamp(0.0, 255.0) as u8
    };
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_selectors() {
        assert_eq!(resolve("dark"), &DARK);
        assert_eq!(resolve("light"), &LIGHT);
        assert_eq!(resolve(" Light "), &LIGHT);
    }

    #[test]
    fn test_unknown_selector_falls_back_to_dark() {
        assert_eq!(resolve("solarized"), &DARK);
        assert_eq!(resolve(""), &DARK);
        assert_eq!(ThemeSelector::parse_lossy(None), ThemeSelector::Dark);
        assert_eq!(
            ThemeSelector::parse_lossy(Some("neon")).palette().theme,
            ThemeSelector::Dark
        );
    }

    #[test]
    fn test_correlation_colormap_endpoints() {
        let [low, mid, high] = DARK.correlation;
        assert_eq!(DARK.correlation_color(-1.0), low);
        assert_eq!(DARK.correlation_color(0.0), mid);
        assert_eq!(DARK.correlation_color(1.0), high);
        assert_eq!(DARK.correlation_color(f64::NAN), DARK.grid);
    }

    #[test]
    fn test_cluster_colors_cycle() {
        let n = LIGHT.clusters.len();
        assert_eq!(LIGHT.cluster_color(0), LIGHT.cluster_color(n));
    }
}
