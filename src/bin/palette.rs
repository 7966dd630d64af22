use anyhow::{Context, Result};
use clap::Parser;
use color_palette_wasm::color::rgb_to_lab;
use color_palette_wasm::render::{HtmlRenderer, Page, PageData, PageRenderer};
use color_palette_wasm::storage::{DirStore, ImageStore};
use color_palette_wasm::{AnalysisConfig, Analyzer, PaletteEntry, parse_exclude};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

/// Extract the dominant colors of an image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Input image path
    input: PathBuf,

    /// Comma-separated palette numbers to exclude, e.g. "1,3,7"
    #[arg(short, long, default_value = "")]
    exclude: String,

    /// Directory uploads are copied into
    #[arg(long, default_value = "uploads")]
    store_dir: PathBuf,

    /// Write the chart PNG here
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Write a standalone HTML result page here
    #[arg(long)]
    html: Option<PathBuf>,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also print CIE Lab values
    #[arg(long)]
    lab: bool,

    /// Maximum number of clusters
    #[arg(short = 'k', long, default_value_t = 20)]
    max_clusters: usize,

    /// Clustering seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Number of seeded k-means initializations
    #[arg(long, default_value_t = 10)]
    n_init: usize,

    /// Longest side of the grid used for clustering
    #[arg(long, default_value_t = 800)]
    max_side: u32,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    filename: &'a str,
    title: &'a str,
    exclude: Vec<u32>,
    colors: &'a [PaletteEntry],
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let config = AnalysisConfig {
        max_side: args.max_side,
        max_clusters: args.max_clusters,
        seed: args.seed,
        n_init: args.n_init,
        ..Default::default()
    };
    let analyzer = Analyzer::new(config).context("invalid analysis settings")?;

    let store = DirStore::new(&args.store_dir)
        .with_context(|| format!("cannot open store {}", args.store_dir.display()))?;
    let bytes = fs::read(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;
    let name = args.input.to_string_lossy();
    let key = store.store(&name, &bytes).context("storing upload failed")?;

    let exclude = parse_exclude(&args.exclude);
    let stored = store.retrieve(&key)?;
    let report = analyzer
        .report(&stored, &exclude)
        .context("color analysis failed")?;

    if args.json {
        let out = JsonOutput {
            filename: &key,
            title: &report.chart.title,
            exclude: report.exclude.iter().copied().collect(),
            colors: &report.palette,
        };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", report.chart.title);
        for entry in &report.palette {
            print!(
                "{:>3}  {:<9} {}  ({:>3}, {:>3}, {:>3})  {:>8} px  {:>6.2}%",
                entry.number,
                entry.name,
                entry.hex,
                entry.rgb[0],
                entry.rgb[1],
                entry.rgb[2],
                entry.count,
                entry.percentage
            );
            if args.lab {
                let [l, a, b] = rgb_to_lab(entry.rgb);
                print!("  Lab({l:.1}, {a:.1}, {b:.1})");
            }
            println!();
        }
    }

    if let Some(path) = &args.chart {
        fs::write(path, &report.chart.png)
            .with_context(|| format!("cannot write {}", path.display()))?;
        eprintln!("Saved chart → {}", path.display());
    }

    if let Some(path) = &args.html {
        let page = HtmlRenderer.render(Page::Result, &PageData::from_report(&key, report));
        fs::write(path, page).with_context(|| format!("cannot write {}", path.display()))?;
        eprintln!("Saved page → {}", path.display());
    }

    Ok(())
}
