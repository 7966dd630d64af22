use palette::{IntoColor, Lab, LinSrgb, Srgb};

/// An 8-bit sRGB triple.
pub type Rgb8 = [u8; 3];

/// Round a floating centroid channel to the nearest displayable value.
#[inline]
pub fn round_channel(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

pub fn round_rgb(color: [f64; 3]) -> Rgb8 {
    [
        round_channel(color[0]),
        round_channel(color[1]),
        round_channel(color[2]),
    ]
}

/// Lowercase `#rrggbb`.
pub fn to_hex(rgb: Rgb8) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// Squared euclidean distance between a pixel and a centroid, in 0-255 space.
#[inline(always)]
pub fn distance_sq(pixel: Rgb8, centroid: [f64; 3]) -> f64 {
    let dr = pixel[0] as f64 - centroid[0];
    let dg = pixel[1] as f64 - centroid[1];
    let db = pixel[2] as f64 - centroid[2];
    dr * dr + dg * dg + db * db
}

/// CIE L*a*b* (D65) for an sRGB color.
///
/// Not used by the clustering pipeline, which works in RGB. Kept for callers
/// that want perceptual values for inspection.
pub fn rgb_to_lab(rgb: Rgb8) -> [f32; 3] {
    let linear: LinSrgb<f32> = Srgb::new(rgb[0], rgb[1], rgb[2]).into_linear();
    let lab: Lab = linear.into_color();
    [lab.l, lab.a, lab.b]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_is_lowercase_and_padded() {
        assert_eq!(to_hex([255, 0, 0]), "#ff0000");
        assert_eq!(to_hex([1, 171, 9]), "#01ab09");
    }

    #[test]
    fn rounding_clamps_to_byte_range() {
        assert_eq!(round_rgb([254.5, 0.49, -3.0]), [255, 0, 0]);
        assert_eq!(round_rgb([300.0, 127.5, 12.2]), [255, 128, 12]);
    }

    #[test]
    fn lab_of_white_and_black() {
        let white = rgb_to_lab([255, 255, 255]);
        assert!((white[0] - 100.0).abs() < 0.5);
        assert!(white[1].abs() < 0.5 && white[2].abs() < 0.5);

        let black = rgb_to_lab([0, 0, 0]);
        assert!(black[0].abs() < 1e-3);
    }

    #[test]
    fn distance_is_zero_on_match() {
        assert_eq!(distance_sq([10, 20, 30], [10.0, 20.0, 30.0]), 0.0);
        assert_eq!(distance_sq([0, 0, 0], [3.0, 4.0, 0.0]), 25.0);
    }
}
