use serde::Serialize;

use crate::cluster::ClusterResult;
use crate::color::{Rgb8, round_rgb, to_hex};

/// One ranked color as shown to the user.
///
/// `number` is assigned once, by rank, and is the handle used to exclude the
/// color later. Filtering never renumbers.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PaletteEntry {
    pub number: u32,
    pub name: String,
    pub rgb: Rgb8,
    pub hex: String,
    pub count: usize,
    pub percentage: f64,
}

/// Turn raw clusters into a ranked, thresholded palette.
///
/// Clusters at or below `min_percentage` of `total_pixels` are dropped for
/// good. Survivors are ordered by share, largest first, with the lower
/// centroid index first on ties.
pub fn rank_clusters(
    clusters: &ClusterResult,
    total_pixels: usize,
    min_percentage: f64,
) -> Vec<PaletteEntry> {
    if total_pixels == 0 {
        return Vec::new();
    }

    let mut kept: Vec<(usize, usize, f64)> = clusters
        .counts
        .iter()
        .enumerate()
        .map(|(idx, &count)| (idx, count, count as f64 / total_pixels as f64 * 100.0))
        .filter(|&(_, _, pct)| pct > min_percentage)
        .collect();

    kept.sort_by(|a, b| b.2.total_cmp(&a.2).then(a.0.cmp(&b.0)));

    kept.into_iter()
        .enumerate()
        .map(|(rank, (idx, count, percentage))| {
            let number = rank as u32 + 1;
            let rgb = round_rgb(clusters.centroids[idx]);
            PaletteEntry {
                number,
                name: format!("Color {number}"),
                rgb,
                hex: to_hex(rgb),
                count,
                percentage,
            }
        })
        .collect()
}
