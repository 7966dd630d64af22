use std::f64::consts::PI;
use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, imageops::FilterType};

use crate::error::{PaletteError, Result};
use crate::filter::ExcludeSet;
use crate::ranker::PaletteEntry;

const PANEL: u32 = 500;
const MARGIN: u32 = 10;
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const EDGE: Rgb<u8> = Rgb([0, 0, 0]);

/// Encoded side-by-side visualization plus its caption.
#[derive(Clone, Debug)]
pub struct Chart {
    pub title: String,
    pub png: Vec<u8>,
}

pub fn chart_title(exclude: &ExcludeSet) -> String {
    if exclude.is_empty() {
        return "All Detected Colors".to_string();
    }
    let listed: Vec<String> = exclude.iter().map(|n| n.to_string()).collect();
    format!("Filtered Colors (Excluded: {})", listed.join(", "))
}

/// Original image on the left, proportion pie on the right.
pub fn render_chart(full: &RgbImage, palette: &[PaletteEntry], exclude: &ExcludeSet) -> Result<Chart> {
    let mut canvas = RgbImage::from_pixel(PANEL * 2, PANEL, BACKGROUND);

    if full.width() > 0 && full.height() > 0 {
        let inner = PANEL - 2 * MARGIN;
        let preview = DynamicImage::ImageRgb8(full.clone())
            .resize(inner, inner, FilterType::Lanczos3)
            .to_rgb8();
        let x = (PANEL - preview.width()) / 2;
        let y = (PANEL - preview.height()) / 2;
        image::imageops::replace(&mut canvas, &preview, x as i64, y as i64);
    }

    draw_pie(&mut canvas, PANEL, palette);

    let mut png = Vec::new();
    DynamicImage::ImageRgb8(canvas)
        .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
        .map_err(PaletteError::Encode)?;

    Ok(Chart { title: chart_title(exclude), png })
}

/// Pie weighted by `count`, starting at twelve o'clock and running
/// counter-clockwise. Wedges get a one pixel black edge.
fn draw_pie(canvas: &mut RgbImage, x0: u32, palette: &[PaletteEntry]) {
    let cx = x0 as f64 + PANEL as f64 / 2.0;
    let cy = PANEL as f64 / 2.0;
    let radius = (PANEL / 2 - MARGIN) as f64;

    let total: usize = palette.iter().map(|e| e.count).sum();
    let mut bounds = Vec::with_capacity(palette.len() + 1);
    let mut acc = 0usize;
    bounds.push(0.0);
    for entry in palette {
        acc += entry.count;
        bounds.push(if total == 0 { 0.0 } else { acc as f64 / total as f64 });
    }
    let wedges = palette.iter().filter(|e| e.count > 0).count();

    for py in 0..PANEL {
        for px in x0..x0 + PANEL {
            let dx = px as f64 + 0.5 - cx;
            let dy = cy - (py as f64 + 0.5);
            let r = dx.hypot(dy);
            if r > radius + 1.0 {
                continue;
            }
            if r > radius - 1.0 || total == 0 {
                if r > radius - 1.0 {
                    canvas.put_pixel(px, py, EDGE);
                }
                continue;
            }

            // fraction of the turn, measured counter-clockwise from the top
            let angle = dy.atan2(dx) - PI / 2.0;
            let t = angle.rem_euclid(2.0 * PI) / (2.0 * PI);

            if wedges > 1 {
                let on_edge = bounds
                    .iter()
                    .any(|&b| angular_gap(t, b) * 2.0 * PI * r < 1.0);
                if on_edge {
                    canvas.put_pixel(px, py, EDGE);
                    continue;
                }
            }

            let slot = bounds[1..].iter().position(|&b| t < b).unwrap_or(palette.len() - 1);
            let rgb = palette[slot].rgb;
            canvas.put_pixel(px, py, Rgb(rgb));
        }
    }
}

fn angular_gap(a: f64, b: f64) -> f64 {
    let d = (a - b).abs();
    d.min(1.0 - d)
}
