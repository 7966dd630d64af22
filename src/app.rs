use log::{info, warn};

use crate::error::{PaletteError, Result};
use crate::filter::{ExcludeSet, parse_exclude};
use crate::pipeline::Analyzer;
use crate::render::{Page, PageData, PageRenderer};
use crate::storage::ImageStore;

const UPLOAD_FAILED: &str = "Error processing image";
const UPDATE_FAILED: &str = "Error updating exclusions";

/// Request handling for the upload and exclusion-update flows.
///
/// Every failure is turned into the index page with a message; nothing
/// escapes as an error.
pub struct PaletteApp<S, R> {
    store: S,
    renderer: R,
    analyzer: Analyzer,
}

impl<S: ImageStore, R: PageRenderer> PaletteApp<S, R> {
    pub fn new(store: S, renderer: R, analyzer: Analyzer) -> Self {
        Self { store, renderer, analyzer }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn index(&self) -> R::Output {
        self.renderer.render(Page::Index, &PageData::default())
    }

    /// Store a freshly uploaded image and show its full palette.
    pub fn upload(&self, filename: &str, bytes: &[u8]) -> R::Output {
        let outcome = self
            .store
            .store(filename, bytes)
            .and_then(|key| self.analyze_stored(&key, ExcludeSet::new()));
        self.finish(outcome, UPLOAD_FAILED)
    }

    /// Re-run the pipeline on a stored image with a new exclusion list.
    pub fn update(&self, filename: Option<&str>, exclude: &str) -> R::Output {
        let outcome = match filename.map(str::trim).filter(|f| !f.is_empty()) {
            None => Err(PaletteError::MissingReference(
                "Missing image reference, please upload again.".into(),
            )),
            Some(key) => self.analyze_stored(key, parse_exclude(exclude)),
        };
        self.finish(outcome, UPDATE_FAILED)
    }

    fn analyze_stored(&self, key: &str, exclude: ExcludeSet) -> Result<PageData> {
        let bytes = self.store.retrieve(key)?;
        info!("analyzing {key} excluding {exclude:?}");
        let report = self.analyzer.report(&bytes, &exclude)?;
        Ok(PageData::from_report(key, report))
    }

    fn finish(&self, outcome: Result<PageData>, action: &str) -> R::Output {
        match outcome {
            Ok(data) => self.renderer.render(Page::Result, &data),
            Err(err) => {
                warn!("request failed: {err}");
                self.renderer
                    .render(Page::Index, &PageData::error(err.user_message(action)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::storage::MemoryStore;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    struct Recorder;

    impl PageRenderer for Recorder {
        type Output = (Page, PageData);

        fn render(&self, page: Page, data: &PageData) -> (Page, PageData) {
            (page, data.clone())
        }
    }

    fn app() -> PaletteApp<MemoryStore, Recorder> {
        let analyzer = Analyzer::new(AnalysisConfig { n_init: 2, ..Default::default() }).unwrap();
        PaletteApp::new(MemoryStore::new(), Recorder, analyzer)
    }

    fn halves() -> Vec<u8> {
        let img = RgbImage::from_fn(10, 4, |x, _| {
            if x < 7 { Rgb([250, 250, 250]) } else { Rgb([5, 5, 5]) }
        });
        let mut buf = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
            .unwrap();
        buf
    }

    #[test]
    fn upload_then_exclude() {
        let app = app();
        let (page, data) = app.upload("photos/halves.png", &halves());
        assert_eq!(page, Page::Result);
        assert_eq!(data.filename.as_deref(), Some("halves.png"));
        assert_eq!(data.colors.len(), 2);
        assert_eq!(data.chart.as_ref().unwrap().title, "All Detected Colors");

        let (page, data) = app.update(Some("halves.png"), "1, junk");
        assert_eq!(page, Page::Result);
        assert_eq!(data.colors.len(), 1);
        assert_eq!(data.colors[0].number, 2);
        assert_eq!(data.colors[0].hex, "#050505");
        assert!((data.colors[0].percentage - 100.0).abs() < 1e-9);
        assert_eq!(data.exclude.iter().copied().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn missing_filename_returns_to_index() {
        let (page, data) = app().update(None, "1");
        assert_eq!(page, Page::Index);
        assert_eq!(data.error.as_deref(), Some("Missing image reference, please upload again."));

        let (page, _) = app().update(Some("  "), "");
        assert_eq!(page, Page::Index);
    }

    #[test]
    fn unknown_file_returns_to_index() {
        let (page, data) = app().update(Some("ghost.png"), "");
        assert_eq!(page, Page::Index);
        assert_eq!(data.error.as_deref(), Some("Image file not found, please upload again."));
    }

    #[test]
    fn undecodable_upload_reports_error() {
        let (page, data) = app().upload("notes.txt", b"hello");
        assert_eq!(page, Page::Index);
        assert!(data.error.unwrap().starts_with("Error processing image"));
    }

    #[test]
    fn excluding_everything_reports_error() {
        let app = app();
        app.upload("halves.png", &halves());
        let (page, data) = app.update(Some("halves.png"), "1,2");
        assert_eq!(page, Page::Index);
        assert!(data.error.unwrap().contains("excluded"));
    }

    #[test]
    fn update_failures_name_the_update_flow() {
        let app = app();
        app.store().store("broken.png", b"not an image").unwrap();
        let (page, data) = app.update(Some("broken.png"), "");
        assert_eq!(page, Page::Index);
        assert!(data.error.unwrap().starts_with("Error updating exclusions: "));
    }

    #[test]
    fn nested_names_resolve_to_the_stored_upload() {
        let app = app();
        app.upload("halves.png", &halves());
        let (page, data) = app.update(Some("sub/halves.png"), "");
        assert_eq!(page, Page::Result);
        assert_eq!(data.filename.as_deref(), Some("sub/halves.png"));
    }
}
