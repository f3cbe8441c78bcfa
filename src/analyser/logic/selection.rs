//! Splitting rendered charts into what the caller asked for and everything else.

use super::types::{ArtifactKey, ArtifactMap, ColumnClassification, PlotKind, VisualArtifact};

/// Whether `key` belongs to the requested side.
///
/// Insight support charts are never requested.
pub fn is_requested(
    key: &ArtifactKey,
    kinds: &[PlotKind],
    classification: &ColumnClassification,
) -> bool {
    match key {
        ArtifactKey::Heatmap => kinds.contains(&PlotKind::Heatmap),
        ArtifactKey::Pairplot => kinds.contains(&PlotKind::Pairplot),
        ArtifactKey::Column(column) => {
            (classification.is_numeric(column) && kinds.contains(&PlotKind::Distribution))
                || (classification.is_categorical(column) && kinds.contains(&PlotKind::Count))
        }
        ArtifactKey::Outliers(_) | ArtifactKey::TopCorrelations | ArtifactKey::Clusters => false,
    }
}

/// Splits the renderer output into `(requested, auxiliary)`.
///
/// The two maps are disjoint and together hold every input artifact.
pub fn partition(
    artifacts: ArtifactMap,
    kinds: &[PlotKind],
    classification: &ColumnClassification,
) -> (ArtifactMap, ArtifactMap) {
    artifacts
        .into_iter()
        .partition(|(_, artifact)| is_requested(&artifact.key, kinds, classification))
}

/// Appends insight support charts to the auxiliary side.
///
/// Support keys never collide with catalog keys. A duplicate replaces the
/// earlier entry.
pub fn merge_support(auxiliary: &mut ArtifactMap, support: Vec<VisualArtifact>) {
    for artifact in support {
        let key = artifact.key_string();
        if auxiliary.insert(key.clone(), artifact).is_some() {
            tracing::warn!(%key, "Support chart replaced an existing artifact");
        }
    }
}
