use crate::{
    error::{ImageGenError, Result},
    storage::traits::BlobStore,
};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub const DEFAULT_EXTENSION: &str = "png";

/// Writes each blob to `<dir>/<identifier>.<extension>`.
///
/// Bytes land in a hidden temp file first and are linked into place only
/// after a successful flush, so a failed write never leaves a file with the
/// final name behind. An existing file with the final name is never replaced.
pub struct FsBlobStore {
    dir: PathBuf,
    extension: String,
}

impl FsBlobStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::with_extension(dir, DEFAULT_EXTENSION)
    }

    pub fn with_extension(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ImageGenError::ConfigError(format!(
                "Cannot create output directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        log::debug!("Output directory ready: {}", dir.display());

        Ok(Self {
            dir,
            extension: extension.into(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn final_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identifier, self.extension))
    }

    fn temp_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!(".{}.{}.tmp", identifier, self.extension))
    }

    async fn write_temp(&self, temp: &Path, bytes: &[u8]) -> std::io::Result<()> {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp)
            .await?;
        file.write_all(bytes).await?;
        file.sync_all().await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn write(&self, identifier: &str, bytes: &[u8]) -> Result<PathBuf> {
        if identifier.is_empty()
            || identifier.contains(&['/', '\\'][..])
            || identifier.starts_with('.')
        {
            return Err(ImageGenError::StorageError(format!(
                "Invalid blob identifier '{}'",
                identifier
            )));
        }

        let temp = self.temp_path(identifier);
        let target = self.final_path(identifier);

        if let Err(e) = self.write_temp(&temp, bytes).await {
            // AlreadyExists means another writer owns the temp file.
            if e.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&temp).await;
            }
            return Err(ImageGenError::StorageError(format!(
                "Failed to write {}: {}",
                temp.display(),
                e
            )));
        }

        // hard_link fails on an existing target where rename would replace it.
        let published = fs::hard_link(&temp, &target).await;
        if let Err(e) = fs::remove_file(&temp).await {
            log::warn!("Could not remove temp file {}: {}", temp.display(), e);
        }

        if let Err(e) = published {
            let reason = if e.kind() == ErrorKind::AlreadyExists {
                "target already exists".to_string()
            } else {
                e.to_string()
            };
            return Err(ImageGenError::StorageError(format!(
                "Failed to move image into {}: {}",
                target.display(),
                reason
            )));
        }

        log::debug!("Wrote {} bytes to {}", bytes.len(), target.display());
        Ok(target)
    }
}
