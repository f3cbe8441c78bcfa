//! K-Means over two feature columns.
//!
//! Backed by `linfa-clustering` when the `clustering` feature is enabled.
//! Without it [`assign_clusters`] always fails, and callers are expected to
//! check [`is_compiled_in`] (through `AnalysisConfig::clustering_available`)
//! before getting this far.

use anyhow::Result;

/// Whether K-Means support was compiled into this build.
pub const fn is_compiled_in() -> bool {
    cfg!(feature = "clustering")
}

/// Assigns each point a cluster label in `0..k`.
///
/// Seeded, so the same points and seed always yield the same labels.
#[cfg(feature = "clustering")]
pub fn assign_clusters(points: &[(f64, f64)], k: usize, seed: u64) -> Result<Vec<usize>> {
    use anyhow::{Context as _, anyhow, ensure};
    use linfa::DatasetBase;
    use linfa::traits::{Fit as _, Predict as _};
    use linfa_clustering::KMeans;
    use ndarray::{Array1, Array2};
    use rand::SeedableRng as _;
    use rand::rngs::StdRng;

    ensure!(k > 0, "K-Means needs at least one cluster");
    ensure!(
        points.len() >= k,
        "K-Means needs at least {k} rows, got {}",
        points.len()
    );

    let flat: Vec<f64> = points.iter().flat_map(|&(x, y)| [x, y]).collect();
    let records =
        Array2::from_shape_vec((points.len(), 2), flat).context("Failed to build feature matrix")?;
    let dataset = DatasetBase::from(records.clone());

    let rng = StdRng::seed_from_u64(seed);
    let model = KMeans::params_with_rng(k, rng)
        .max_n_iterations(300)
        .tolerance(1e-4)
        .fit(&dataset)
        .map_err(|e| anyhow!("K-Means failed: {e}"))?;

    let labels: Array1<usize> = model.predict(&records);
    Ok(labels.to_vec())
}

#[cfg(not(feature = "clustering"))]
pub fn assign_clusters(_points: &[(f64, f64)], _k: usize, _seed: u64) -> Result<Vec<usize>> {
    anyhow::bail!("plotsight was built without the `clustering` feature")
}
