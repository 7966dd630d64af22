//! Dominant color extraction.
//!
//! An image is decoded into a full-resolution grid and a grid bounded to
//! 800×800, the bounded grid is clustered with seeded k-means, clusters are
//! ranked into a numbered palette, and user exclusions renormalize the
//! remaining shares. [`pipeline::Analyzer`] ties the stages together;
//! [`app::PaletteApp`] adds the upload / update request flow on top.

pub mod app;
pub mod chart;
pub mod cluster;
pub mod color;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod pipeline;
pub mod ranker;
pub mod render;
pub mod storage;
pub mod wasm;

pub use config::AnalysisConfig;
pub use error::{PaletteError, Result};
pub use filter::{ExcludeSet, filter_palette, parse_exclude};
pub use pipeline::{Analysis, Analyzer, Report};
pub use ranker::PaletteEntry;
