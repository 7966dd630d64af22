use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::chart::Chart;
use crate::filter::ExcludeSet;
use crate::pipeline::Report;
use crate::ranker::PaletteEntry;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Page {
    /// Upload form, optionally with an error.
    Index,
    /// Palette table, chart and exclusion form.
    Result,
}

/// Everything a page template may need.
#[derive(Clone, Debug, Default)]
pub struct PageData {
    pub error: Option<String>,
    pub colors: Vec<PaletteEntry>,
    pub exclude: ExcludeSet,
    pub filename: Option<String>,
    pub chart: Option<Chart>,
}

impl PageData {
    pub fn error(message: impl Into<String>) -> Self {
        Self { error: Some(message.into()), ..Default::default() }
    }

    pub fn from_report(filename: &str, report: Report) -> Self {
        Self {
            error: None,
            colors: report.palette,
            exclude: report.exclude,
            filename: Some(filename.to_string()),
            chart: Some(report.chart),
        }
    }
}

pub trait PageRenderer {
    type Output;

    fn render(&self, page: Page, data: &PageData) -> Self::Output;
}

/// Minimal HTML front end. The chart is inlined as a data URI.
#[derive(Clone, Copy, Debug, Default)]
pub struct HtmlRenderer;

impl PageRenderer for HtmlRenderer {
    type Output = String;

    fn render(&self, page: Page, data: &PageData) -> String {
        let mut body = String::new();
        if let Some(error) = &data.error {
            body.push_str(&format!("<p class=\"error\">{}</p>\n", escape_html(error)));
        }

        match page {
            Page::Index => {
                body.push_str(
                    "<form method=\"post\" enctype=\"multipart/form-data\">\n\
                     <input type=\"file\" name=\"file\" accept=\"image/*\">\n\
                     <button type=\"submit\">Analyze</button>\n</form>\n",
                );
            }
            Page::Result => {
                if let Some(chart) = &data.chart {
                    body.push_str(&format!(
                        "<h2>{}</h2>\n<img alt=\"color chart\" src=\"data:image/png;base64,{}\">\n",
                        escape_html(&chart.title),
                        STANDARD.encode(&chart.png)
                    ));
                }
                body.push_str(&color_table(&data.colors));

                let filename = data.filename.as_deref().unwrap_or_default();
                let exclude: Vec<String> = data.exclude.iter().map(|n| n.to_string()).collect();
                body.push_str(&format!(
                    "<form method=\"post\">\n\
                     <input type=\"hidden\" name=\"filename\" value=\"{}\">\n\
                     <input type=\"text\" name=\"exclude\" value=\"{}\" placeholder=\"1,3,7\">\n\
                     <button type=\"submit\">Update</button>\n</form>\n",
                    escape_html(filename),
                    exclude.join(",")
                ));
            }
        }

        format!(
            "<!DOCTYPE html>\n<html>\n<head><meta charset=\"utf-8\"><title>Dominant Colors</title></head>\n<body>\n{body}</body>\n</html>\n"
        )
    }
}

fn color_table(colors: &[PaletteEntry]) -> String {
    let mut out = String::from(
        "<table>\n<tr><th></th><th>#</th><th>Name</th><th>Hex</th><th>RGB</th><th>Share</th></tr>\n",
    );
    for c in colors {
        out.push_str(&format!(
            "<tr><td style=\"background:{hex}\"></td><td>{}</td><td>{}</td><td>{hex}</td><td>({}, {}, {})</td><td>{:.2}%</td></tr>\n",
            c.number,
            escape_html(&c.name),
            c.rgb[0],
            c.rgb[1],
            c.rgb[2],
            c.percentage,
            hex = c.hex,
        ));
    }
    out.push_str("</table>\n");
    out
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PageData {
        PageData {
            error: None,
            colors: vec![PaletteEntry {
                number: 2,
                name: "Color 2".into(),
                rgb: [18, 52, 86],
                hex: "#123456".into(),
                count: 10,
                percentage: 100.0,
            }],
            exclude: [1].into_iter().collect(),
            filename: Some("a\"b.png".into()),
            chart: Some(Chart { title: "Filtered Colors (Excluded: 1)".into(), png: vec![1, 2, 3] }),
        }
    }

    #[test]
    fn result_page_lists_colors_and_echoes_state() {
        let html = HtmlRenderer.render(Page::Result, &sample());
        assert!(html.contains("Filtered Colors (Excluded: 1)"));
        assert!(html.contains("data:image/png;base64,AQID"));
        assert!(html.contains("#123456"));
        assert!(html.contains("(18, 52, 86)"));
        assert!(html.contains("100.00%"));
        assert!(html.contains("value=\"a&quot;b.png\""));
        assert!(html.contains("name=\"exclude\" value=\"1\""));
    }

    #[test]
    fn index_page_shows_escaped_error() {
        let html = HtmlRenderer.render(Page::Index, &PageData::error("<bad> file"));
        assert!(html.contains("&lt;bad&gt; file"));
        assert!(html.contains("type=\"file\""));
    }
}
