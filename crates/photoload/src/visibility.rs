//! Viewport visibility capability
//!
//! The loader only depends on [`VisibilityObserver`]. Hosts with a real
//! windowing layer implement it on top of their own intersection events;
//! [`ViewportTracker`] is an in-process implementation driven by explicit
//! scroll positions.

use std::collections::HashMap;
use std::sync::Arc;
use ahash::RandomState;
use parking_lot::Mutex;
use tracing::trace;

/// Axis-aligned rectangle in logical pixels
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge
    pub x: f64,
    /// Top edge
    pub y: f64,
    /// Width
    pub width: f64,
    /// Height
    pub height: f64,
}

impl Rect {
    /// Create a rectangle from its top-left corner and size
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether this rect overlaps `other` grown by `margin` on every side.
    ///
    /// Touching edges do not count as an overlap.
    pub fn intersects(&self, other: &Rect, margin: f64) -> bool {
        let left = other.x - margin;
        let top = other.y - margin;
        let right = other.x + other.width + margin;
        let bottom = other.y + other.height + margin;

        self.x < right && left < self.x + self.width && self.y < bottom && top < self.y + self.height
    }
}

/// Handle returned by [`VisibilityObserver::observe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObservationId(u64);

/// Receives `true` when the observed region enters the margin-grown
/// viewport and `false` when it leaves
pub type VisibilityCallback = Arc<dyn Fn(bool) + Send + Sync>;

/// Host-supplied visibility events
pub trait VisibilityObserver: Send + Sync {
    /// Start watching `region`. The callback may run before this returns.
    fn observe(&self, region: Rect, margin: f64, callback: VisibilityCallback) -> ObservationId;

    /// Stop watching. No callback for `id` runs after this returns.
    fn unobserve(&self, id: ObservationId);
}

struct Observation {
    region: Rect,
    margin: f64,
    callback: VisibilityCallback,
    intersecting: bool,
}

struct TrackerState {
    viewport: Rect,
    next_id: u64,
    observations: HashMap<ObservationId, Observation, RandomState>,
}

/// Scroll-driven [`VisibilityObserver`]
pub struct ViewportTracker {
    state: Mutex<TrackerState>,
}

impl ViewportTracker {
    /// Create a tracker with the given initial viewport
    pub fn new(viewport: Rect) -> Self {
        Self {
            state: Mutex::new(TrackerState {
                viewport,
                next_id: 0,
                observations: HashMap::with_hasher(RandomState::new()),
            }),
        }
    }

    /// Current viewport
    pub fn viewport(&self) -> Rect {
        self.state.lock().viewport
    }

    /// Move the viewport vertically, keeping its size
    pub fn scroll_to(&self, y: f64) {
        let mut viewport = self.viewport();
        viewport.y = y;
        self.set_viewport(viewport);
    }

    /// Replace the viewport and notify every observation whose state changed
    pub fn set_viewport(&self, viewport: Rect) {
        let changed: Vec<(ObservationId, VisibilityCallback, bool)> = {
            let mut state = self.state.lock();
            state.viewport = viewport;
            state
                .observations
                .iter_mut()
                .filter_map(|(id, obs)| {
                    let now = obs.region.intersects(&viewport, obs.margin);
                    if now == obs.intersecting {
                        return None;
                    }
                    obs.intersecting = now;
                    Some((*id, Arc::clone(&obs.callback), now))
                })
                .collect()
        };

        trace!(y = viewport.y, changed = changed.len(), "viewport moved");
        // Callbacks may unobserve, so the lock must be released first
        for (id, callback, intersecting) in changed {
            // An earlier callback in this batch may have unobserved it
            if self.state.lock().observations.contains_key(&id) {
                callback(intersecting);
            }
        }
    }

    /// Number of live observations
    pub fn observed_count(&self) -> usize {
        self.state.lock().observations.len()
    }
}

impl VisibilityObserver for ViewportTracker {
    fn observe(&self, region: Rect, margin: f64, callback: VisibilityCallback) -> ObservationId {
        let (id, intersecting) = {
            let mut state = self.state.lock();
            state.next_id += 1;
            let id = ObservationId(state.next_id);
            let intersecting = region.intersects(&state.viewport, margin);
            state.observations.insert(
                id,
                Observation {
                    region,
                    margin,
                    callback: Arc::clone(&callback),
                    intersecting,
                },
            );
            (id, intersecting)
        };

        trace!(?id, intersecting, "observing region");
        callback(intersecting);
        id
    }

    fn unobserve(&self, id: ObservationId) {
        self.state.lock().observations.remove(&id);
    }
}
