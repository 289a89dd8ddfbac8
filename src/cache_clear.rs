use async_trait::async_trait;
use std::{path::PathBuf, sync::Arc};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum CacheClearError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Clears the display's render cache before the first photo is fetched, so a
/// stale photo from a previous run is never shown.
#[async_trait]
pub trait CacheClearer: Send + Sync {
    async fn clear_cache(&self) -> Result<(), CacheClearError>;
    fn name(&self) -> &str;
}

pub type DynCacheClearer = Arc<dyn CacheClearer>;

pub fn create_clearer(directory: Option<PathBuf>) -> DynCacheClearer {
    match directory {
        Some(directory) => Arc::new(DirectoryCacheClearer::new(directory)),
        None => Arc::new(NoopCacheClearer),
    }
}

/// Empties a browser cache directory, keeping the directory itself.
pub struct DirectoryCacheClearer {
    directory: PathBuf,
}

impl DirectoryCacheClearer {
    pub fn new(directory: PathBuf) -> Self {
        Self { directory }
    }
}

#[async_trait]
impl CacheClearer for DirectoryCacheClearer {
    async fn clear_cache(&self) -> Result<(), CacheClearError> {
        if !tokio::fs::try_exists(&self.directory).await? {
            info!(
                "Cache directory {:?} does not exist, nothing to clear",
                self.directory
            );
            return Ok(());
        }

        let mut entries = tokio::fs::read_dir(&self.directory).await?;
        let mut removed = 0usize;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_dir() {
                tokio::fs::remove_dir_all(&path).await?;
            } else {
                tokio::fs::remove_file(&path).await?;
            }
            debug!("Removed cache entry {:?}", path);
            removed += 1;
        }

        info!("Cleared {} entries from {:?}", removed, self.directory);
        Ok(())
    }

    fn name(&self) -> &str {
        "directory"
    }
}

pub struct NoopCacheClearer;

#[async_trait]
impl CacheClearer for NoopCacheClearer {
    async fn clear_cache(&self) -> Result<(), CacheClearError> {
        info!("No browser cache directory configured, skipping cache clear");
        Ok(())
    }

    fn name(&self) -> &str {
        "noop"
    }
}
