//! Per-item loader configuration

use std::fmt;
use std::sync::Arc;
use photocache::ResourceKey;

use crate::error::{Error, Result};
use crate::visibility::Rect;

/// Distance outside the viewport at which loading starts
pub const DEFAULT_PROXIMITY_MARGIN: f64 = 200.0;

/// Called once per genuine fetch failure with the key that failed
pub type FailureHook = Arc<dyn Fn(&ResourceKey) + Send + Sync>;

/// Settings for one displayed item
#[derive(Clone)]
pub struct ItemConfig {
    pub(crate) key: ResourceKey,
    pub(crate) region: Rect,
    pub(crate) deferred: bool,
    pub(crate) proximity_margin: f64,
    pub(crate) on_failure: Option<FailureHook>,
}

impl ItemConfig {
    /// Deferred loading of `key` with the default margin
    pub fn new(key: impl Into<ResourceKey>) -> Self {
        Self {
            key: key.into(),
            region: Rect::default(),
            deferred: true,
            proximity_margin: DEFAULT_PROXIMITY_MARGIN,
            on_failure: None,
        }
    }

    /// Where the item sits in layout coordinates
    pub fn region(mut self, region: Rect) -> Self {
        self.region = region;
        self
    }

    /// `false` loads immediately instead of waiting for visibility
    pub fn deferred(mut self, deferred: bool) -> Self {
        self.deferred = deferred;
        self
    }

    /// Start loading this far before the item scrolls into view
    pub fn proximity_margin(mut self, margin: f64) -> Self {
        self.proximity_margin = margin;
        self
    }

    /// Hook fired when a current fetch reports no content
    pub fn on_failure<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResourceKey) + Send + Sync + 'static,
    {
        self.on_failure = Some(Arc::new(hook));
        self
    }

    /// Key the item starts with
    pub fn key(&self) -> &ResourceKey {
        &self.key
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if !self.proximity_margin.is_finite() || self.proximity_margin < 0.0 {
            return Err(Error::InvalidMargin(self.proximity_margin));
        }
        Ok(())
    }
}

impl fmt::Debug for ItemConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemConfig")
            .field("key", &self.key)
            .field("region", &self.region)
            .field("deferred", &self.deferred)
            .field("proximity_margin", &self.proximity_margin)
            .field("on_failure", &self.on_failure.is_some())
            .finish()
    }
}
