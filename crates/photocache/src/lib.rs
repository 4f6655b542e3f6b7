//! # photocache
//!
//! Bounded content cache for the photo loader.
//!
//! ## Architecture
//! - **HashMap**: AHash for fast lookups (O(1))
//! - **Insertion queue**: oldest key is evicted first (O(1))
//! - **RwLock**: many concurrent readers, one writer per insert
//!
//! Eviction is strictly by insertion order. Reading an entry does not
//! protect it from eviction.

#![warn(missing_docs)]

mod cache;
mod content;
mod error;
mod fifo;
mod stats;

pub use cache::{ContentCache, DEFAULT_CAPACITY};
pub use content::{ContentHandle, ResourceKey};
pub use error::{Error, Result};
pub use fifo::{FifoCache, PutOutcome};
pub use stats::{CacheStats, StatsSnapshot};
