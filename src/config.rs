use crate::error::{PaletteError, Result};

/// Tunables for a single analysis run.
///
/// The defaults reproduce the behaviour users see on upload: a cluster grid
/// bounded to 800×800, at most 20 clusters, and ten seeded initializations.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalysisConfig {
    /// Longest allowed side of the cluster grid.
    pub max_side: u32,
    /// Upper bound on K; the effective K is `min(max_clusters, pixel count)`.
    pub max_clusters: usize,
    /// Clusters whose share is at or below this percentage are dropped.
    pub min_percentage: f64,
    /// Base seed; initialization `i` uses `seed + i`.
    pub seed: u64,
    /// Number of seeded initializations, best inertia wins.
    pub n_init: usize,
    /// Lloyd iterations per initialization.
    pub max_iter: usize,
    /// Convergence threshold handed to `kmeans_colors`.
    pub converge: f32,
    /// Reuse cluster results for identical cluster grids.
    pub cache_clusters: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_side: 800,
            max_clusters: 20,
            min_percentage: 0.5,
            seed: 42,
            n_init: 10,
            max_iter: 20,
            converge: 1e-4,
            cache_clusters: false,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_side == 0 {
            return Err(PaletteError::Config("max_side must be at least 1".into()));
        }
        if self.n_init == 0 {
            return Err(PaletteError::Config("n_init must be at least 1".into()));
        }
        // kmeans_colors stores labels as u8
        if self.max_clusters > u8::MAX as usize {
            return Err(PaletteError::Config(format!(
                "max_clusters must be at most {}",
                u8::MAX
            )));
        }
        if !(0.0..100.0).contains(&self.min_percentage) {
            return Err(PaletteError::Config(
                "min_percentage must lie in [0, 100)".into(),
            ));
        }
        Ok(())
    }
}
