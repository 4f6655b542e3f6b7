//! Grid of lazily loaded photos

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use photocache::ResourceKey;
use photoload::{ItemConfig, LoadController, LoadState, LoaderContext, Rect, ViewportTracker};
use tracing::info;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// List image files directly inside `dir`, sorted by path
pub fn scan(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && is_image(&path) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

/// Square tiles in a fixed number of columns
#[derive(Debug, Clone, Copy)]
pub struct Layout {
    /// Tiles per row
    pub columns: usize,
    /// Tile edge length
    pub tile: f64,
    /// Space between tiles
    pub gap: f64,
}

impl Layout {
    /// Region of the tile at `index`
    pub fn tile_rect(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let pitch = self.tile + self.gap;
        let (row, col) = (index / columns, index % columns);
        Rect::new(col as f64 * pitch, row as f64 * pitch, self.tile, self.tile)
    }

    /// Total height of `count` tiles
    pub fn height(&self, count: usize) -> f64 {
        let rows = count.div_ceil(self.columns.max(1));
        rows as f64 * (self.tile + self.gap)
    }
}

/// Per-state item counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    /// Not yet near the viewport
    pub hidden: usize,
    /// Waiting on a fetch
    pub pending: usize,
    /// Showing content
    pub loaded: usize,
    /// Could not be read
    pub failed: usize,
}

impl fmt::Display for Tally {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hidden={} pending={} loaded={} failed={}",
            self.hidden, self.pending, self.loaded, self.failed
        )
    }
}

/// One deferred controller per photo, sharing the context's cache
pub struct Gallery {
    items: Vec<LoadController>,
    layout: Layout,
    failures: Arc<AtomicUsize>,
}

impl Gallery {
    /// Lay `paths` out and create their controllers
    pub fn build(
        context: &LoaderContext,
        paths: &[PathBuf],
        layout: Layout,
        margin: f64,
    ) -> photoload::Result<Self> {
        let failures = Arc::new(AtomicUsize::new(0));
        let items = paths
            .iter()
            .enumerate()
            .map(|(index, path)| {
                let failures = Arc::clone(&failures);
                let config = ItemConfig::new(path.as_path())
                    .region(layout.tile_rect(index))
                    .proximity_margin(margin)
                    .on_failure(move |_| {
                        failures.fetch_add(1, Ordering::Relaxed);
                    });
                context.controller(config)
            })
            .collect::<photoload::Result<Vec<_>>>()?;

        Ok(Self {
            items,
            layout,
            failures,
        })
    }

    /// Number of items
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the gallery has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Height of the laid-out grid
    pub fn content_height(&self) -> f64 {
        self.layout.height(self.items.len())
    }

    /// Failure notifications received so far
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Count items by state
    pub fn tally(&self) -> Tally {
        let mut tally = Tally::default();
        for item in &self.items {
            match item.state() {
                LoadState::Hidden => tally.hidden += 1,
                LoadState::Pending => tally.pending += 1,
                LoadState::Loaded(_) => tally.loaded += 1,
                LoadState::Failed => tally.failed += 1,
            }
        }
        tally
    }

    /// Wait for every outstanding fetch
    pub async fn settle(&self) {
        for item in &self.items {
            item.wait_idle().await;
        }
    }

    /// Point the tiles at new keys, in tile order (e.g. after a re-sort)
    pub fn reassign<I>(&self, keys: I)
    where
        I: IntoIterator<Item = ResourceKey>,
    {
        for (item, key) in self.items.iter().zip(keys) {
            item.set_key(key);
        }
    }

    /// Scroll from top to bottom in `step` increments
    ///
    /// With `settle` each step waits for its fetches before moving on;
    /// without it the scroll outruns the loader.
    pub async fn scroll_through(&self, tracker: &ViewportTracker, step: f64, settle: bool) {
        let viewport = tracker.viewport();
        let bottom = (self.content_height() - viewport.height).max(0.0);
        let mut y = 0.0;

        loop {
            tracker.scroll_to(y);
            if settle {
                self.settle().await;
            }
            info!(y, tally = %self.tally(), "scrolled");
            if y >= bottom {
                break;
            }
            y = (y + step).min(bottom);
        }
    }
}
