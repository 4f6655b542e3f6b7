//! Error types for photocache

/// Result type alias for photocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache construction
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A cache must hold at least one entry
    #[error("cache capacity must be greater than 0")]
    ZeroCapacity,
}
