//! Filesystem fetcher producing base64 data URLs

use std::path::Path;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use photocache::{ContentHandle, ResourceKey};
use photoload::ContentFetcher;
use tracing::{trace, warn};

/// Reads the file named by the key and encodes it for display
pub struct FsFetcher;

#[async_trait]
impl ContentFetcher for FsFetcher {
    async fn fetch(&self, key: &ResourceKey) -> Option<ContentHandle> {
        let path = Path::new(key.as_str());
        match tokio::fs::read(path).await {
            Ok(bytes) if bytes.is_empty() => {
                warn!(%key, "image file is empty");
                None
            }
            Ok(bytes) => {
                trace!(%key, size = bytes.len(), "image read");
                Some(data_url(path, &bytes))
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to read image");
                None
            }
        }
    }
}

fn data_url(path: &Path, bytes: &[u8]) -> ContentHandle {
    let mime = mime_guess::from_path(path).first_or_octet_stream();
    let encoded = format!("data:{};base64,{}", mime.essence_str(), STANDARD.encode(bytes));
    ContentHandle::new(encoded.into_bytes()).with_media_type(mime.essence_str().to_owned())
}
