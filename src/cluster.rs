use image::RgbImage;
use kmeans_colors::get_kmeans;
use log::{debug, info};
use palette::Srgb;

use crate::color::{Rgb8, distance_sq};
use crate::config::AnalysisConfig;
use crate::error::{PaletteError, Result};

/// Centroids and per-centroid membership for one clustering run.
///
/// `counts[i]` is the number of cluster-grid pixels whose nearest centroid is
/// `centroids[i]`; the counts always add up to the pixel count.
#[derive(Clone, Debug, PartialEq)]
pub struct ClusterResult {
    pub centroids: Vec<[f64; 3]>,
    pub counts: Vec<usize>,
}

impl ClusterResult {
    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.centroids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.centroids.is_empty()
    }
}

/// K for a grid: never more clusters than pixels.
pub fn cluster_count(pixel_count: usize, max_clusters: usize) -> usize {
    max_clusters.min(pixel_count)
}

/// Cluster a grid with K derived from its size.
pub fn cluster_grid(grid: &RgbImage, config: &AnalysisConfig) -> Result<ClusterResult> {
    let pixels: Vec<Rgb8> = grid.pixels().map(|p| p.0).collect();
    let k = cluster_count(pixels.len(), config.max_clusters);
    info!("clustering {} pixels into at most {} colors", pixels.len(), k);
    cluster_pixels(&pixels, k, config)
}

/// Seeded k-means over RGB triples.
///
/// Runs `config.n_init` k-means++ initializations (seeds `seed`, `seed + 1`,
/// ...), re-labels every pixel against each run's centroids and keeps the run
/// with the lowest inertia. The first run wins ties.
pub fn cluster_pixels(pixels: &[Rgb8], k: usize, config: &AnalysisConfig) -> Result<ClusterResult> {
    if k == 0 {
        return Err(PaletteError::Clustering(
            "cluster count must be positive".into(),
        ));
    }
    if pixels.is_empty() {
        return Err(PaletteError::Clustering("image has no pixels".into()));
    }

    let samples: Vec<Srgb<f32>> = pixels
        .iter()
        .map(|p| Srgb::new(p[0], p[1], p[2]).into_format::<f32>())
        .collect();

    let mut best: Option<(f64, ClusterResult)> = None;
    for run in 0..config.n_init {
        let seed = config.seed.wrapping_add(run as u64);
        let kmeans = get_kmeans(k, config.max_iter, config.converge, false, &samples, seed);

        // k-means++ stops early once every distinct color has a centroid.
        let centroids: Vec<[f64; 3]> = kmeans
            .centroids
            .iter()
            .map(|c| {
                [
                    c.red as f64 * 255.0,
                    c.green as f64 * 255.0,
                    c.blue as f64 * 255.0,
                ]
            })
            .collect();

        let (counts, inertia) = assign(pixels, &centroids);
        debug!("init {run} (seed {seed}): {} centroids, inertia {inertia:.3}", centroids.len());

        if best.as_ref().is_none_or(|(score, _)| inertia < *score) {
            best = Some((inertia, ClusterResult { centroids, counts }));
        }
    }

    best.map(|(_, result)| result)
        .ok_or_else(|| PaletteError::Clustering("no initialization was run".into()))
}

/// Count nearest-centroid membership and total squared distance.
fn assign(pixels: &[Rgb8], centroids: &[[f64; 3]]) -> (Vec<usize>, f64) {
    let mut counts = vec![0usize; centroids.len()];
    let mut inertia = 0.0;

    for &pixel in pixels {
        let mut best_idx = 0;
        let mut best_dist = f64::INFINITY;
        for (idx, &centroid) in centroids.iter().enumerate() {
            let dist = distance_sq(pixel, centroid);
            if dist < best_dist {
                best_dist = dist;
                best_idx = idx;
            }
        }
        counts[best_idx] += 1;
        inertia += best_dist;
    }

    (counts, inertia)
}
