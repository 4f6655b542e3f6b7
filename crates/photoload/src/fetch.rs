//! Content fetch collaborator
//!
//! The host supplies the actual byte fetch. `None` means the resource could
//! not be read; it is a normal outcome, not a fault.

use std::sync::Arc;
use std::time::Duration;
use async_trait::async_trait;
use photocache::{ContentHandle, ResourceKey};
use tokio::sync::Semaphore;
use tracing::warn;

/// Turns a resource key into displayable content
///
/// Must be safe to call repeatedly and concurrently for the same key.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// Resolve `key`, or `None` if it cannot be read
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle>;
}

#[async_trait]
impl<F> ContentFetcher for Arc<F>
where
    F: ContentFetcher + ?Sized,
{
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle> {
        (**self).fetch(key).await
    }
}

/// Caps the number of fetches running at once
///
/// Callers beyond the limit wait for a permit; nothing is rejected.
pub struct LimitedFetcher<F> {
    inner: F,
    permits: Semaphore,
}

impl<F> LimitedFetcher<F> {
    /// Wrap `inner`, allowing at most `max_in_flight` concurrent fetches
    pub fn new(inner: F, max_in_flight: usize) -> Self {
        Self {
            inner,
            permits: Semaphore::new(max_in_flight.max(1)),
        }
    }

    /// Permits not currently held
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }
}

#[async_trait]
impl<F: ContentFetcher> ContentFetcher for LimitedFetcher<F> {
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle> {
        // The semaphore is never closed
        let _permit = self.permits.acquire().await.ok()?;
        self.inner.fetch(key).await
    }
}

/// Reports fetches that exceed a deadline as failures
pub struct DeadlineFetcher<F> {
    inner: F,
    deadline: Duration,
}

impl<F> DeadlineFetcher<F> {
    /// Wrap `inner` with a per-fetch deadline
    pub fn new(inner: F, deadline: Duration) -> Self {
        Self { inner, deadline }
    }
}

#[async_trait]
impl<F: ContentFetcher> ContentFetcher for DeadlineFetcher<F> {
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle> {
        match tokio::time::timeout(self.deadline, self.inner.fetch(key)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(%key, deadline_ms = self.deadline.as_millis() as u64, "fetch deadline elapsed");
                None
            }
        }
    }
}
