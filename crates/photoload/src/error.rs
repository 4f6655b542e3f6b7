//! Error types for photoload

/// Result type alias for photoload operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while wiring up loaders
///
/// Fetch failures are not errors; they surface as [`crate::LoadState::Failed`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Controllers spawn their fetches onto the current tokio runtime
    #[error("no tokio runtime available to drive content fetches")]
    NoRuntime,

    /// Proximity margin was negative or not a number
    #[error("invalid proximity margin: {0}")]
    InvalidMargin(f64),

    /// Cache construction failed
    #[error(transparent)]
    Cache(#[from] photocache::Error),
}
