//! Per-item load controller
//!
//! State machine: `Hidden -> Pending -> Loaded | Failed`. A deferred item
//! waits in `Hidden` until its region first comes within the proximity
//! margin of the viewport; the observation is then released for good.
//! A key change while visible re-runs resolution and supersedes any fetch
//! still running for the old key.
//!
//! Superseded fetches are never aborted. When one succeeds its content is
//! still written to the shared cache, but the controller's state and
//! failure hook are left alone.

use std::sync::{Arc, Weak};
use parking_lot::Mutex;
use photocache::{ContentCache, ContentHandle, ResourceKey};
use tokio::runtime::Handle;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::{FailureHook, ItemConfig};
use crate::context::LoaderContext;
use crate::error::{Error, Result};
use crate::fetch::ContentFetcher;
use crate::request::{RequestToken, RequestTracker};
use crate::visibility::{ObservationId, VisibilityCallback, VisibilityObserver};

/// What a displayed item currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Placeholder; the item has not been near the viewport yet
    Hidden,
    /// Resolution in progress
    Pending,
    /// Content for the current key
    Loaded(ContentHandle),
    /// The current key could not be read; nothing is shown
    Failed,
}

impl LoadState {
    /// Content to display, if any
    pub fn content(&self) -> Option<&ContentHandle> {
        match self {
            LoadState::Loaded(content) => Some(content),
            _ => None,
        }
    }
}

struct Inner {
    key: ResourceKey,
    requests: RequestTracker,
    visible: bool,
    observation: Option<ObservationId>,
}

struct Shared {
    cache: Arc<ContentCache>,
    fetcher: Arc<dyn ContentFetcher>,
    observer: Arc<dyn VisibilityObserver>,
    runtime: Handle,
    on_failure: Option<FailureHook>,
    inner: Mutex<Inner>,
    state: watch::Sender<LoadState>,
    in_flight: watch::Sender<usize>,
}

impl Shared {
    fn on_visibility(self: &Arc<Self>, intersecting: bool) {
        if !intersecting {
            return;
        }

        let observation = {
            let mut inner = self.inner.lock();
            if inner.visible || inner.requests.is_retired() {
                return;
            }
            inner.visible = true;
            debug!(key = %inner.key, "item near viewport, loading");
            self.begin_load(&mut inner);
            inner.observation.take()
        };

        if let Some(id) = observation {
            self.observer.unobserve(id);
        }
    }

    /// Resolve the current key: cache first, then a spawned fetch.
    fn begin_load(self: &Arc<Self>, inner: &mut Inner) {
        let token = inner.requests.issue();
        let key = inner.key.clone();

        if let Some(content) = self.cache.get(&key) {
            self.state.send_replace(LoadState::Loaded(content));
            return;
        }

        self.state.send_replace(LoadState::Pending);
        let guard = InFlight::enter(Arc::clone(self));
        self.runtime.spawn(async move {
            let shared = Arc::clone(&guard.0);
            let result = shared.fetcher.fetch(&key).await;
            shared.complete(token, key, result);
            drop(guard);
        });
    }

    fn complete(&self, token: RequestToken, key: ResourceKey, result: Option<ContentHandle>) {
        match result {
            Some(content) => {
                let content = self.cache.put(key.clone(), content);
                let inner = self.inner.lock();
                if !inner.requests.is_current(token) {
                    debug!(%key, generation = token.generation(), "discarding superseded result");
                    return;
                }
                self.state.send_replace(LoadState::Loaded(content));
            }
            None => {
                {
                    let inner = self.inner.lock();
                    if !inner.requests.is_current(token) {
                        debug!(%key, generation = token.generation(), "discarding superseded failure");
                        return;
                    }
                    self.state.send_replace(LoadState::Failed);
                }
                warn!(%key, "content could not be loaded");
                if let Some(hook) = &self.on_failure {
                    hook(&key);
                }
            }
        }
    }
}

/// Counts a spawned fetch until its task finishes or is dropped
struct InFlight(Arc<Shared>);

impl InFlight {
    fn enter(shared: Arc<Shared>) -> Self {
        shared.in_flight.send_modify(|n| *n += 1);
        Self(shared)
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.in_flight.send_modify(|n| *n = n.saturating_sub(1));
    }
}

/// Loader for one displayed item
///
/// Dropping the controller (or calling [`teardown`](Self::teardown)) stops
/// visibility monitoring and makes every outstanding fetch stale.
pub struct LoadController {
    shared: Arc<Shared>,
}

impl LoadController {
    pub(crate) fn start(context: &LoaderContext, config: ItemConfig) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| Error::NoRuntime)?;

        let initial = if config.deferred {
            LoadState::Hidden
        } else {
            LoadState::Pending
        };
        let shared = Arc::new(Shared {
            cache: Arc::clone(context.cache()),
            fetcher: Arc::clone(context.fetcher()),
            observer: Arc::clone(context.observer()),
            runtime,
            on_failure: config.on_failure.clone(),
            inner: Mutex::new(Inner {
                key: config.key.clone(),
                requests: RequestTracker::new(),
                visible: !config.deferred,
                observation: None,
            }),
            state: watch::channel(initial).0,
            in_flight: watch::channel(0).0,
        });

        if config.deferred {
            Self::observe(&shared, &config);
        } else {
            let mut inner = shared.inner.lock();
            shared.begin_load(&mut inner);
        }

        Ok(Self { shared })
    }

    fn observe(shared: &Arc<Shared>, config: &ItemConfig) {
        let weak: Weak<Shared> = Arc::downgrade(shared);
        let callback: VisibilityCallback = Arc::new(move |intersecting: bool| {
            if let Some(shared) = weak.upgrade() {
                shared.on_visibility(intersecting);
            }
        });

        let id = shared
            .observer
            .observe(config.region, config.proximity_margin, callback);

        // The observer may already have reported the item as visible
        let mut inner = shared.inner.lock();
        if inner.visible {
            drop(inner);
            shared.observer.unobserve(id);
        } else {
            inner.observation = Some(id);
        }
    }

    /// Current display state
    pub fn state(&self) -> LoadState {
        self.shared.state.borrow().clone()
    }

    /// Loaded content, if any
    pub fn content(&self) -> Option<ContentHandle> {
        self.shared.state.borrow().content().cloned()
    }

    /// Current target key
    pub fn key(&self) -> ResourceKey {
        self.shared.inner.lock().key.clone()
    }

    /// Whether the item has come near the viewport at least once
    pub fn is_visible(&self) -> bool {
        self.shared.inner.lock().visible
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.shared.state.subscribe()
    }

    /// Fetches spawned by this controller that have not finished
    pub fn in_flight(&self) -> usize {
        *self.shared.in_flight.borrow()
    }

    /// Wait until no fetch spawned by this controller is running
    pub async fn wait_idle(&self) {
        let mut in_flight = self.shared.in_flight.subscribe();
        let _ = in_flight.wait_for(|n| *n == 0).await;
    }

    /// Point the item at a different resource
    ///
    /// A no-op when `key` equals the current key. While hidden only the key
    /// is recorded; resolution waits for visibility.
    pub fn set_key(&self, key: impl Into<ResourceKey>) {
        let key = key.into();
        let mut inner = self.shared.inner.lock();
        if inner.key == key {
            return;
        }

        debug!(from = %inner.key, to = %key, "target key changed");
        inner.key = key;
        if inner.visible {
            self.shared.begin_load(&mut inner);
        }
    }

    /// Stop monitoring and ignore every outstanding fetch
    pub fn teardown(self) {
        drop(self);
    }
}

impl Drop for LoadController {
    fn drop(&mut self) {
        let (key, observation) = {
            let mut inner = self.shared.inner.lock();
            inner.requests.retire();
            (inner.key.clone(), inner.observation.take())
        };
        if let Some(id) = observation {
            self.shared.observer.unobserve(id);
        }
        debug!(%key, "controller torn down");
    }
}
