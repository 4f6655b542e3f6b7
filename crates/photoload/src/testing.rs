//! Test doubles

use std::collections::{HashMap, VecDeque};
use async_trait::async_trait;
use parking_lot::Mutex;
use photocache::{ContentHandle, ResourceKey};
use tokio::sync::{oneshot, watch};

use crate::fetch::ContentFetcher;

type Reply = oneshot::Sender<Option<ContentHandle>>;

/// Fetcher whose calls stay pending until the test resolves them
pub(crate) struct ScriptedFetcher {
    pending: Mutex<HashMap<ResourceKey, VecDeque<Reply>>>,
    per_key: Mutex<HashMap<ResourceKey, usize>>,
    calls: watch::Sender<usize>,
}

impl ScriptedFetcher {
    pub(crate) fn new() -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            per_key: Mutex::new(HashMap::new()),
            calls: watch::channel(0).0,
        }
    }

    pub(crate) fn calls(&self) -> usize {
        *self.calls.borrow()
    }

    pub(crate) fn calls_for(&self, key: &ResourceKey) -> usize {
        self.per_key.lock().get(key).copied().unwrap_or(0)
    }

    pub(crate) async fn wait_for_calls(&self, count: usize) {
        let mut calls = self.calls.subscribe();
        calls.wait_for(|n| *n >= count).await.unwrap();
    }

    /// Complete the oldest outstanding fetch for `key`
    pub(crate) fn resolve(&self, key: &ResourceKey, result: Option<ContentHandle>) {
        let reply = self
            .pending
            .lock()
            .get_mut(key)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| panic!("no outstanding fetch for {key}"));
        let _ = reply.send(result);
    }
}

#[async_trait]
impl ContentFetcher for ScriptedFetcher {
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle> {
        let (tx, rx) = oneshot::channel();
        self.pending.lock().entry(key.clone()).or_default().push_back(tx);
        *self.per_key.lock().entry(key.clone()).or_default() += 1;
        self.calls.send_modify(|n| *n += 1);
        rx.await.ok().flatten()
    }
}

/// Yield until `cond` holds
pub(crate) async fn until(cond: impl Fn() -> bool) {
    for _ in 0..1000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("condition not reached");
}
