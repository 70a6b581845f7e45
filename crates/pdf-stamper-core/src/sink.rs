//! Destinations for the merged document.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Error, Result};

/// Where a merged PDF ends up
#[async_trait]
pub trait PdfSink: Send + Sync {
    /// Store `bytes`. `suggested_name` is a file name the sink may use.
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<()>;
}

/// Writes `<dir>/<suggested_name>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    dir: PathBuf,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path a document with this suggested name is written to.
    pub fn target(&self, suggested_name: &str) -> Result<PathBuf> {
        // Only a bare file name is accepted; anything else could escape `dir`
        let name = Path::new(suggested_name);
        match name.file_name() {
            Some(file_name) if file_name == name.as_os_str() => Ok(self.dir.join(file_name)),
            _ => Err(Error::Sink(format!(
                "suggested name '{suggested_name}' is not a plain file name"
            ))),
        }
    }
}

#[async_trait]
impl PdfSink for DirectorySink {
    async fn save(&self, bytes: &[u8], suggested_name: &str) -> Result<()> {
        let path = self.target(suggested_name)?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| {
            Error::Sink(format!("Failed to create {}: {}", self.dir.display(), e))
        })?;
        write_file(&path, bytes).await
    }
}

/// Writes to a fixed path, ignoring the suggested name.
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PdfSink for FileSink {
    async fn save(&self, bytes: &[u8], _suggested_name: &str) -> Result<()> {
        write_file(&self.path, bytes).await
    }
}

async fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    tokio::fs::write(path, bytes)
        .await
        .map_err(|e| Error::Sink(format!("Failed to write {}: {}", path.display(), e)))?;
    debug!("Wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
