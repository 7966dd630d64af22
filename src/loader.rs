use image::{DynamicImage, GenericImageView, RgbImage, imageops::FilterType};
use log::info;

use crate::error::Result;

/// The two pixel grids every analysis works with.
///
/// `full` keeps the original resolution and is only used for display.
/// `cluster` is bounded to `max_side` on both axes and feeds the clusterer.
#[derive(Clone, Debug)]
pub struct LoadedImage {
    pub full: RgbImage,
    pub cluster: RgbImage,
}

impl LoadedImage {
    pub fn cluster_pixel_count(&self) -> usize {
        self.cluster.width() as usize * self.cluster.height() as usize
    }
}

/// Decode image bytes and build both grids.
pub fn load_grids(input: &[u8], max_side: u32) -> Result<LoadedImage> {
    let img = image::load_from_memory(input)?;
    Ok(normalize(&img, max_side))
}

/// Force three channels and derive the bounded cluster grid.
pub fn normalize(img: &DynamicImage, max_side: u32) -> LoadedImage {
    let (orig_w, orig_h) = img.dimensions();
    let full = img.to_rgb8();

    let cluster = match thumbnail_size(orig_w, orig_h, max_side) {
        None => full.clone(),
        Some((w, h)) => image::imageops::resize(&full, w, h, FilterType::Lanczos3),
    };

    info!(
        "loaded image {}x{}, cluster grid {}x{}",
        orig_w,
        orig_h,
        cluster.width(),
        cluster.height()
    );

    LoadedImage { full, cluster }
}

/// Size of an aspect-preserving thumbnail that fits in `max_side`², or `None`
/// when the image already fits.
pub fn thumbnail_size(w: u32, h: u32, max_side: u32) -> Option<(u32, u32)> {
    if w <= max_side && h <= max_side {
        return None;
    }
    let ratio = max_side as f64 / w.max(h) as f64;
    let tw = ((w as f64) * ratio).round().clamp(1.0, max_side as f64) as u32;
    let th = ((h as f64) * ratio).round().clamp(1.0, max_side as f64) as u32;
    Some((tw, th))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PaletteError;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(img: DynamicImage) -> Vec<u8> {
        let mut buf = Vec::new();
        img.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png).unwrap();
        buf
    }

    #[test]
    fn small_images_are_not_resampled() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(12, 7, image::Rgb([9, 8, 7])));
        let grids = load_grids(&png_bytes(img), 800).unwrap();
        assert_eq!(grids.full.dimensions(), (12, 7));
        assert_eq!(grids.cluster, grids.full);
    }

    #[test]
    fn large_images_keep_aspect_ratio() {
        assert_eq!(thumbnail_size(1600, 400, 800), Some((800, 200)));
        assert_eq!(thumbnail_size(300, 900, 800), Some((267, 800)));
        assert_eq!(thumbnail_size(800, 800, 800), None);
        assert_eq!(thumbnail_size(5000, 1, 800), Some((800, 1)));

        let img = DynamicImage::ImageRgb8(RgbImage::new(20, 10));
        let grids = normalize(&img, 8);
        assert_eq!(grids.full.dimensions(), (20, 10));
        assert_eq!(grids.cluster.dimensions(), (8, 4));
        assert!(grids.cluster_pixel_count() <= 200);
    }

    #[test]
    fn alpha_is_dropped() {
        let rgba = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 0]));
        let grids = load_grids(&png_bytes(DynamicImage::ImageRgba8(rgba)), 800).unwrap();
        assert!(grids.full.pixels().all(|p| p.0 == [10, 20, 30]));
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let err = load_grids(b"definitely not an image", 800).unwrap_err();
        assert!(matches!(err, PaletteError::Decode(_)));
    }
}
