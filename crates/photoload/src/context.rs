//! Composition root shared by every controller

use std::sync::Arc;
use photocache::ContentCache;

use crate::config::ItemConfig;
use crate::controller::LoadController;
use crate::error::Result;
use crate::fetch::ContentFetcher;
use crate::visibility::VisibilityObserver;

/// The cache, fetcher and visibility source injected into each controller
///
/// Build one at application start-up and hand out controllers from it;
/// every controller created here shares the same cache.
#[derive(Clone)]
pub struct LoaderContext {
    cache: Arc<ContentCache>,
    fetcher: Arc<dyn ContentFetcher>,
    observer: Arc<dyn VisibilityObserver>,
}

impl LoaderContext {
    /// Assemble a context from its collaborators
    pub fn new(
        cache: Arc<ContentCache>,
        fetcher: Arc<dyn ContentFetcher>,
        observer: Arc<dyn VisibilityObserver>,
    ) -> Self {
        Self {
            cache,
            fetcher,
            observer,
        }
    }

    /// Assemble a context around a fresh cache of `capacity` entries
    ///
    /// # Errors
    /// * `Error::Cache` - `capacity` is 0
    pub fn with_cache_capacity(
        capacity: usize,
        fetcher: Arc<dyn ContentFetcher>,
        observer: Arc<dyn VisibilityObserver>,
    ) -> Result<Self> {
        let cache = ContentCache::with_capacity(capacity)?;
        Ok(Self::new(Arc::new(cache), fetcher, observer))
    }

    /// Create a controller for one displayed item
    ///
    /// Must be called from within a tokio runtime; fetches are spawned onto it.
    ///
    /// # Errors
    /// * `Error::InvalidMargin` - negative or non-finite proximity margin
    /// * `Error::NoRuntime` - called outside a tokio runtime
    pub fn controller(&self, config: ItemConfig) -> Result<LoadController> {
        LoadController::start(self, config)
    }

    /// Shared cache
    pub fn cache(&self) -> &Arc<ContentCache> {
        &self.cache
    }

    pub(crate) fn fetcher(&self) -> &Arc<dyn ContentFetcher> {
        &self.fetcher
    }

    pub(crate) fn observer(&self) -> &Arc<dyn VisibilityObserver> {
        &self.observer
    }
}
