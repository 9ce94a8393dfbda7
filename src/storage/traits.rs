use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;

/// Destination for decoded image bytes.
///
/// Callers hand in an identifier that is unique per call; implementations must
/// not leave a readable partial object behind when a write fails.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf>;
}
