use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Mutex;

use image::RgbImage;
use log::{debug, info};

use crate::chart::{Chart, render_chart};
use crate::cluster::{ClusterResult, cluster_grid};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::filter::{ExcludeSet, filter_palette};
use crate::loader::load_grids;
use crate::ranker::{PaletteEntry, rank_clusters};

/// Output of Loader → Clusterer → Ranker for one image.
#[derive(Clone, Debug)]
pub struct Analysis {
    pub full_grid: RgbImage,
    pub cluster_grid_shape: (u32, u32),
    pub clusters: ClusterResult,
    /// Full ranked palette, before any exclusion.
    pub palette: Vec<PaletteEntry>,
}

/// What the rendering layer receives for one request.
#[derive(Clone, Debug)]
pub struct Report {
    pub palette: Vec<PaletteEntry>,
    pub exclude: ExcludeSet,
    pub chart: Chart,
}

/// Runs the full pipeline. Every call re-clusters unless the fingerprint
/// cache is switched on, in which case identical cluster grids reuse the
/// earlier result. Clustering is seeded, so both paths agree.
#[derive(Debug)]
pub struct Analyzer {
    config: AnalysisConfig,
    cache: Option<Mutex<HashMap<u64, ClusterResult>>>,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        let cache = config.cache_clusters.then(|| Mutex::new(HashMap::new()));
        Ok(Self { config, cache })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, input: &[u8]) -> Result<Analysis> {
        let grids = load_grids(input, self.config.max_side)?;
        let total = grids.cluster_pixel_count();
        let clusters = self.clusters_for(&grids.cluster)?;
        let palette = rank_clusters(&clusters, total, self.config.min_percentage);
        info!(
            "{} of {} clusters above {}%",
            palette.len(),
            clusters.len(),
            self.config.min_percentage
        );

        Ok(Analysis {
            cluster_grid_shape: grids.cluster.dimensions(),
            full_grid: grids.full,
            clusters,
            palette,
        })
    }

    /// Analyze, apply the exclusion set and render the chart.
    pub fn report(&self, input: &[u8], exclude: &ExcludeSet) -> Result<Report> {
        let analysis = self.analyze(input)?;
        let palette = filter_palette(&analysis.palette, exclude)?;
        let chart = render_chart(&analysis.full_grid, &palette, exclude)?;
        Ok(Report { palette, exclude: exclude.clone(), chart })
    }

    fn clusters_for(&self, grid: &RgbImage) -> Result<ClusterResult> {
        let Some(cache) = &self.cache else {
            return cluster_grid(grid, &self.config);
        };

        let key = fingerprint(grid);
        if let Some(hit) = cache.lock().unwrap_or_else(|e| e.into_inner()).get(&key) {
            debug!("cluster cache hit {key:016x}");
            return Ok(hit.clone());
        }
        let result = cluster_grid(grid, &self.config)?;
        cache
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .insert(key, result.clone());
        Ok(result)
    }
}

fn fingerprint(grid: &RgbImage) -> u64 {
    let mut hasher = DefaultHasher::new();
    grid.dimensions().hash(&mut hasher);
    grid.as_raw().hash(&mut hasher);
    hasher.finish()
}
