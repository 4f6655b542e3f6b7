//! # photoload
//!
//! On-demand loader for large local images.
//!
//! ## Architecture
//! - **Visibility gate**: deferred items load the first time they come
//!   within a margin of the viewport
//! - **Shared cache**: every controller resolves through one
//!   [`photocache::ContentCache`] before fetching
//! - **Request tokens**: results for superseded keys are dropped, never
//!   displayed
//!
//! Fetches run as tokio tasks and are not aborted when superseded.

#![warn(missing_docs)]

mod config;
mod context;
mod controller;
mod error;
mod fetch;
mod request;
mod visibility;

#[cfg(test)]
mod testing;

pub use config::{FailureHook, ItemConfig, DEFAULT_PROXIMITY_MARGIN};
pub use context::LoaderContext;
pub use controller::{LoadController, LoadState};
pub use error::{Error, Result};
pub use fetch::{ContentFetcher, DeadlineFetcher, LimitedFetcher};
pub use request::{RequestToken, RequestTracker};
pub use visibility::{ObservationId, Rect, VisibilityCallback, VisibilityObserver, ViewportTracker};

pub use photocache::{ContentCache, ContentHandle, ResourceKey};
