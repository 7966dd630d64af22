use js_sys::{Array, Object, Reflect, Uint8Array};
use wasm_bindgen::prelude::*;

use crate::config::AnalysisConfig;
use crate::filter::parse_exclude;
use crate::pipeline::Analyzer;
use crate::ranker::PaletteEntry;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    // a second init (page reload in the same worker) is harmless
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Extract the dominant colors of an encoded image.
///
/// `exclude` is the raw comma separated list of palette numbers to hide.
/// Returns `{ colors, exclude, title, chart }` where `chart` is a PNG
/// `Uint8Array` and every color is `{ number, name, hex, rgb, count, percentage }`.
#[wasm_bindgen]
pub fn analyze_colors(input: Vec<u8>, exclude: String) -> Result<Object, JsValue> {
    let analyzer = Analyzer::new(AnalysisConfig::default()).map_err(to_js)?;
    let exclude = parse_exclude(&exclude);
    let report = analyzer.report(&input, &exclude).map_err(to_js)?;

    let colors = Array::new();
    for entry in &report.palette {
        colors.push(&entry_to_js(entry)?);
    }

    let excluded = Array::new();
    for n in &report.exclude {
        excluded.push(&JsValue::from(*n));
    }

    let result = Object::new();
    Reflect::set(&result, &JsValue::from_str("colors"), &colors)?;
    Reflect::set(&result, &JsValue::from_str("exclude"), &excluded)?;
    Reflect::set(&result, &JsValue::from_str("title"), &JsValue::from_str(&report.chart.title))?;
    Reflect::set(
        &result,
        &JsValue::from_str("chart"),
        &Uint8Array::from(report.chart.png.as_slice()),
    )?;
    Ok(result)
}

fn entry_to_js(entry: &PaletteEntry) -> Result<JsValue, JsValue> {
    let rgb = Array::new();
    for channel in entry.rgb {
        rgb.push(&JsValue::from(channel));
    }

    let obj = Object::new();
    Reflect::set(&obj, &JsValue::from_str("number"), &JsValue::from(entry.number))?;
    Reflect::set(&obj, &JsValue::from_str("name"), &JsValue::from_str(&entry.name))?;
    Reflect::set(&obj, &JsValue::from_str("hex"), &JsValue::from_str(&entry.hex))?;
    Reflect::set(&obj, &JsValue::from_str("rgb"), &rgb)?;
    Reflect::set(&obj, &JsValue::from_str("count"), &JsValue::from(entry.count as f64))?;
    Reflect::set(&obj, &JsValue::from_str("percentage"), &JsValue::from(entry.percentage))?;
    Ok(obj.into())
}

fn to_js(err: crate::error::PaletteError) -> JsValue {
    JsValue::from_str(&err.user_message("Error processing image"))
}
