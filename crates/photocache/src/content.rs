//! Resource keys and resolved content handles

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use bytes::Bytes;

/// Opaque identifier naming a local content item, usually an absolute file path
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceKey(Arc<str>);

impl ResourceKey {
    /// Create a key from any string-like value
    pub fn new(key: impl Into<Arc<str>>) -> Self {
        Self(key.into())
    }

    /// Borrow the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for ResourceKey {
    fn from(key: String) -> Self {
        Self::new(key)
    }
}

impl From<&Path> for ResourceKey {
    fn from(path: &Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }
}

impl AsRef<str> for ResourceKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Immutable payload ready for display (for example an encoded data blob)
///
/// Cloning is cheap: the bytes are reference counted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentHandle {
    data: Bytes,
    media_type: Option<Arc<str>>,
}

impl ContentHandle {
    /// Wrap raw bytes with no media type
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self {
            data: data.into(),
            media_type: None,
        }
    }

    /// Attach a media type such as `image/jpeg`
    pub fn with_media_type(mut self, media_type: impl Into<Arc<str>>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Payload bytes
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    /// Media type, if the producer knew it
    pub fn media_type(&self) -> Option<&str> {
        self.media_type.as_deref()
    }

    /// Payload length in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the payload is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
