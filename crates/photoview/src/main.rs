//! PhotoView - scrolls a folder of photos through the on-demand loader

mod fetch;
mod gallery;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use anyhow::{ensure, Result};
use clap::Parser;
use photocache::{ContentCache, ResourceKey};
use photoload::{
    ContentFetcher, DeadlineFetcher, LimitedFetcher, LoaderContext, Rect, ViewportTracker,
    DEFAULT_PROXIMITY_MARGIN,
};
use tracing::info;

use crate::fetch::FsFetcher;
use crate::gallery::{Gallery, Layout};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Directory of photos
    #[arg(env = "PHOTOVIEW_DIR")]
    dir: PathBuf,

    /// Cache capacity (number of photos)
    #[arg(short, long, env = "PHOTOVIEW_CAPACITY", default_value_t = photocache::DEFAULT_CAPACITY)]
    capacity: usize,

    /// Start loading this many pixels before a tile scrolls into view
    #[arg(short, long, env = "PHOTOVIEW_MARGIN", default_value_t = DEFAULT_PROXIMITY_MARGIN)]
    margin: f64,

    /// Viewport width
    #[arg(long, env = "PHOTOVIEW_WIDTH", default_value_t = 1280.0)]
    width: f64,

    /// Viewport height
    #[arg(long, env = "PHOTOVIEW_HEIGHT", default_value_t = 800.0)]
    height: f64,

    /// Tile edge length
    #[arg(long, env = "PHOTOVIEW_TILE", default_value_t = 240.0)]
    tile: f64,

    /// Gap between tiles
    #[arg(long, env = "PHOTOVIEW_GAP", default_value_t = 8.0)]
    gap: f64,

    /// Tiles per row
    #[arg(long, env = "PHOTOVIEW_COLUMNS", default_value_t = 5)]
    columns: usize,

    /// Pixels scrolled per step
    #[arg(long, env = "PHOTOVIEW_STEP", default_value_t = 400.0)]
    step: f64,

    /// Scroll without waiting for each step's fetches
    #[arg(long)]
    fast: bool,

    /// Reverse the photo order after scrolling, re-targeting every tile
    #[arg(long)]
    resort: bool,

    /// Maximum concurrent file reads
    #[arg(long, env = "PHOTOVIEW_MAX_IN_FLIGHT")]
    max_in_flight: Option<usize>,

    /// Give up on a read after this many milliseconds
    #[arg(long, env = "PHOTOVIEW_TIMEOUT_MS")]
    timeout_ms: Option<u64>,
}

fn build_fetcher(args: &Args) -> Arc<dyn ContentFetcher> {
    let mut fetcher: Arc<dyn ContentFetcher> = Arc::new(FsFetcher);
    if let Some(ms) = args.timeout_ms {
        fetcher = Arc::new(DeadlineFetcher::new(fetcher, Duration::from_millis(ms)));
    }
    if let Some(max) = args.max_in_flight {
        fetcher = Arc::new(LimitedFetcher::new(fetcher, max));
    }
    fetcher
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    ensure!(args.step > 0.0, "scroll step must be positive");
    ensure!(args.columns > 0, "columns must be at least 1");

    info!("Starting PhotoView v{}", env!("CARGO_PKG_VERSION"));
    info!("Photo directory: {}", args.dir.display());
    info!("Cache capacity: {}", args.capacity);
    info!("Proximity margin: {}px", args.margin);

    let paths = gallery::scan(&args.dir)?;
    info!("Found {} photos", paths.len());

    let cache = Arc::new(ContentCache::with_capacity(args.capacity)?);
    let tracker = Arc::new(ViewportTracker::new(Rect::new(
        0.0,
        0.0,
        args.width,
        args.height,
    )));
    let context = LoaderContext::new(Arc::clone(&cache), build_fetcher(&args), tracker.clone());

    let layout = Layout {
        columns: args.columns,
        tile: args.tile,
        gap: args.gap,
    };
    let gallery = Gallery::build(&context, &paths, layout, args.margin)?;
    if gallery.is_empty() {
        info!("Nothing to show");
        return Ok(());
    }

    gallery
        .scroll_through(&tracker, args.step, !args.fast)
        .await;
    gallery.settle().await;

    if args.resort {
        info!("Reversing photo order");
        gallery.reassign(paths.iter().rev().map(|p| ResourceKey::from(p.as_path())));
        gallery.settle().await;
    }

    println!("\nPhotos:   {}", gallery.len());
    println!("Items:    {}", gallery.tally());
    println!("Failures: {}", gallery.failures());
    println!("Cache:    {}/{} resident", cache.len(), cache.capacity());
    println!("Stats:    {}", cache.stats().snapshot());

    Ok(())
}
