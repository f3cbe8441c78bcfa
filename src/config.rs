use crate::analyser::logic::clustering;
use crate::error::{AnalysisError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct FigureSize {
    pub width: u32,
    pub height: u32,
}

impl FigureSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn as_tuple(self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenderSettings {
    pub heatmap: FigureSize,
    /// Distribution and frequency-count plots.
    pub column_plot: FigureSize,
    /// Insight support plots (top correlations, outliers, clusters).
    pub support_plot: FigureSize,
    /// Edge length of one pairplot cell, in pixels.
    pub pairplot_cell: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            heatmap: FigureSize::new(1000, 800),
            column_plot: FigureSize::new(800, 600),
            support_plot: FigureSize::new(800, 600),
            pairplot_cell: 250,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Whether the cluster insight may run. Only effective when the
    /// `clustering` feature is compiled in.
    pub clustering_enabled: bool,
    pub render: RenderSettings,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            clustering_enabled: true,
            render: RenderSettings::default(),
        }
    }
}

impl AnalysisConfig {
    /// Capability check for the cluster insight, decided once per config.
    pub fn clustering_available(&self) -> bool {
        self.clustering_enabled && clustering::is_compiled_in()
    }

    pub fn without_clustering(mut self) -> Self {
        self.clustering_enabled = false;
        self
    }
}

pub fn get_config_path() -> PathBuf {
    crate::utils::standard_paths().base_dir.join("config.json")
}

/// Loads the user config, falling back to defaults when it is missing or invalid.
pub fn load_app_config() -> AnalysisConfig {
    let path = get_config_path();
    if !path.exists() {
        return AnalysisConfig::default();
    }
    match load_config_from(&path) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!("Ignoring config at {}: {e}", path.display());
            AnalysisConfig::default()
        }
    }
}

/// Loads a config file, failing if it cannot be read or parsed.
pub fn load_config_from(path: &Path) -> Result<AnalysisConfig> {
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content).map_err(|e| {
        AnalysisError::Config(format!("Invalid config {}: {e}", path.display()))
    })
}

pub fn save_app_config(config: &AnalysisConfig) -> Result<()> {
    save_config_to(config, &get_config_path())
}

pub fn save_config_to(config: &AnalysisConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write config {}", path.display()))
}
