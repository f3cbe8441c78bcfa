use crate::theme::ThemeSelector;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The tabular input. Owned by the caller and only ever read.
pub type Dataset = DataFrame;

/// Artifacts keyed by their rendered key (`heatmap`, `plot_<column>`, ...).
pub type ArtifactMap = BTreeMap<String, VisualArtifact>;

// REQUEST

/// Plot kinds a caller can ask for explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlotKind {
    Heatmap,
    Pairplot,
    /// Distribution plots of numeric columns.
    Distribution,
    /// Frequency counts of categorical columns.
    Count,
}

impl PlotKind {
    pub const ALL: [Self; 4] = [Self::Heatmap, Self::Pairplot, Self::Distribution, Self::Count];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Heatmap => "heatmap",
            Self::Pairplot => "pairplot",
            Self::Distribution => "distribution",
            Self::Count => "count",
        }
    }
}

impl FromStr for PlotKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "heatmap" => Ok(Self::Heatmap),
            "pairplot" => Ok(Self::Pairplot),
            "distribution" => Ok(Self::Distribution),
            "count" => Ok(Self::Count),
            other => Err(format!("unknown plot kind '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisRequest {
    pub columns: Vec<String>,
    pub plot_kinds: Vec<PlotKind>,
    pub theme: ThemeSelector,
}

impl AnalysisRequest {
    pub fn new(columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            plot_kinds: Vec::new(),
            theme: ThemeSelector::default(),
        }
    }

    /// Builds a request from raw tokens as a request handler receives them.
    ///
    /// Unknown plot kinds are dropped with a warning; an unknown or missing
    /// theme falls back to dark.
    pub fn from_tokens(
        columns: impl IntoIterator<Item = impl Into<String>>,
        plot_tokens: &[&str],
        theme: Option<&str>,
    ) -> Self {
        let plot_kinds = plot_tokens
            .iter()
            .filter_map(|token| match token.parse::<PlotKind>() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    tracing::warn!("Ignoring plot kind: {e}");
                    None
                }
            })
            .collect();
        Self {
            plot_kinds,
            theme: ThemeSelector::parse_lossy(theme),
            ..Self::new(columns)
        }
    }

    pub fn with_plot_kinds(mut self, kinds: impl IntoIterator<Item = PlotKind>) -> Self {
        self.plot_kinds = kinds.into_iter().collect();
        self
    }

    pub fn with_theme(mut self, theme: ThemeSelector) -> Self {
        self.theme = theme;
        self
    }
}

// CLASSIFICATION

/// Requested columns split by storage type, each half in request order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ColumnClassification {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
}

impl ColumnClassification {
    pub fn is_numeric(&self, column: &str) -> bool {
        self.numeric.iter().any(|c| c == column)
    }

    pub fn is_categorical(&self, column: &str) -> bool {
        self.categorical.iter().any(|c| c == column)
    }

    pub fn len(&self) -> usize {
        self.numeric.len() + self.categorical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    /// Row-major Pearson coefficients; NaN where a pair has no defined value.
    pub data: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }
}

// ARTIFACTS

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ArtifactKey {
    Heatmap,
    Pairplot,
    /// `plot_<column>`: distribution or frequency count of one column.
    Column(String),
    /// `outliers_<column>`: box plot backing an outlier insight.
    Outliers(String),
    TopCorrelations,
    Clusters,
}

impl fmt::Display for ArtifactKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Heatmap => f.write_str("heatmap"),
            Self::Pairplot => f.write_str("pairplot"),
            Self::Column(column) => write!(f, "plot_{column}"),
            Self::Outliers(column) => write!(f, "outliers_{column}"),
            Self::TopCorrelations => f.write_str("top_correlations"),
            Self::Clusters => f.write_str("clusters"),
        }
    }
}

/// One rendered chart. Immutable once produced.
#[derive(Clone, PartialEq, Eq)]
pub struct VisualArtifact {
    pub key: ArtifactKey,
    pub png: Vec<u8>,
    pub theme: ThemeSelector,
}

impl VisualArtifact {
    pub fn new(key: ArtifactKey, png: Vec<u8>, theme: ThemeSelector) -> Self {
        Self { key, png, theme }
    }

    pub fn key_string(&self) -> String {
        self.key.to_string()
    }

    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.png)
    }
}

impl fmt::Debug for VisualArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisualArtifact")
            .field("key", &self.key.to_string())
            .field("png_bytes", &self.png.len())
            .field("theme", &self.theme)
            .finish()
    }
}

// INSIGHTS

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Correlation,
    Outlier,
    Cluster,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insight {
    pub kind: InsightKind,
    pub text: String,
    /// Auxiliary artifact backing this finding, when one was rendered.
    pub support: Option<ArtifactKey>,
}

impl Insight {
    pub fn new(kind: InsightKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            support: None,
        }
    }

    pub fn with_support(mut self, key: Option<ArtifactKey>) -> Self {
        self.support = key;
        self
    }
}

// RESULT

#[derive(Debug, Clone, Default)]
pub struct AnalysisResult {
    /// Artifacts the caller asked for by plot kind.
    pub requested_artifacts: ArtifactMap,
    /// Everything else the renderer produced, plus insight support charts.
    pub auxiliary_artifacts: ArtifactMap,
    pub insights: Vec<Insight>,
}

impl AnalysisResult {
    /// All artifact keys in the result, requested first.
    pub fn artifact_keys(&self) -> Vec<&str> {
        self.requested_artifacts
            .keys()
            .chain(self.auxiliary_artifacts.keys())
            .map(String::as_str)
            .collect()
    }

    pub fn artifact(&self, key: &str) -> Option<&VisualArtifact> {
        self.requested_artifacts
            .get(key)
            .or_else(|| self.auxiliary_artifacts.get(key))
    }

    pub fn to_payload(&self) -> ResultPayload {
        let encode = |map: &ArtifactMap| {
            map.iter()
                .map(|(key, artifact)| (key.clone(), artifact.to_base64()))
                .collect()
        };
        ResultPayload {
            requested_artifacts: encode(&self.requested_artifacts),
            auxiliary_artifacts: encode(&self.auxiliary_artifacts),
            insights: self.insights.iter().map(InsightPayload::from).collect(),
        }
    }
}

/// Wire shape of an [`AnalysisResult`]: PNGs as base64 strings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultPayload {
    pub requested_artifacts: BTreeMap<String, String>,
    pub auxiliary_artifacts: BTreeMap<String, String>,
    pub insights: Vec<InsightPayload>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InsightPayload {
    #[serde(rename = "type")]
    pub kind: InsightKind,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_artifact: Option<String>,
}

impl From<&Insight> for InsightPayload {
    fn from(insight: &Insight) -> Self {
        Self {
            kind: insight.kind,
            text: insight.text.clone(),
            support_artifact: insight.support.as_ref().map(ToString::to_string),
        }
    }
}
