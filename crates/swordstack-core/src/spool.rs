//! Temporary storage for deposit payloads.
//!
//! Binary deposit bodies are written to disk by a [`TempStorage`] provider
//! before any validation runs, and read back by the repository managers on
//! demand. Every artifact created while handling a request is recorded on an
//! [`ArtifactGuard`] owned by that request's deposit; dropping the guard
//! releases all of them through the provider exactly once, whatever path the
//! request took to finish.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, trace, warn};

/// Errors raised by a temporary-storage provider.
#[derive(Debug, thiserror::Error)]
pub enum SpoolError {
    /// The backing temp file could not be created.
    #[error("failed to create temp file: {0}")]
    Create(#[source] std::io::Error),

    /// Reading or writing an existing artifact failed.
    #[error("temp file I/O failed for {path}: {source}")]
    Io {
        /// Path of the artifact.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Handle to one buffered payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TempArtifact {
    /// Unique identifier, used in logs.
    pub id: String,
    /// Location of the buffered bytes.
    pub path: PathBuf,
    /// Number of bytes stored.
    pub size: u64,
}

/// Buffers request bodies to retrievable storage.
#[async_trait]
pub trait TempStorage: Send + Sync + fmt::Debug {
    /// Persist `data` and return a handle to it.
    async fn store(&self, data: Bytes) -> Result<TempArtifact, SpoolError>;

    /// Read the full contents of a previously stored artifact.
    async fn open(&self, artifact: &TempArtifact) -> Result<Bytes, SpoolError>;

    /// Delete the given artifacts. Must tolerate artifacts that are already gone.
    fn release(&self, artifacts: &[TempArtifact]);
}

/// File-backed [`TempStorage`] using the [`tempfile`] crate.
///
/// # Examples
///
/// ```
/// use bytes::Bytes;
/// use swordstack_core::spool::{FileSpool, TempStorage};
///
/// # tokio_test::block_on(async {
/// let spool = FileSpool::new(None);
/// let artifact = spool.store(Bytes::from("payload")).await.unwrap();
/// assert_eq!(artifact.size, 7);
/// assert_eq!(spool.open(&artifact).await.unwrap(), Bytes::from("payload"));
/// spool.release(&[artifact]);
/// # });
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileSpool {
    directory: Option<PathBuf>,
}

impl FileSpool {
    /// Create a spool writing into `directory`, or the OS temp dir when `None`.
    #[must_use]
    pub fn new(directory: Option<PathBuf>) -> Self {
        Self { directory }
    }

    /// Directory artifacts are written to, if one was configured.
    #[must_use]
    pub fn directory(&self) -> Option<&Path> {
        self.directory.as_deref()
    }

    fn create_file(&self) -> Result<PathBuf, SpoolError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("sword-deposit-");
        let temp = match &self.directory {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        }
        .map_err(SpoolError::Create)?;

        // Keep the file on disk; deletion is driven by `release`.
        let (_file, path) = temp.keep().map_err(|e| SpoolError::Create(e.error))?;
        Ok(path)
    }
}

#[async_trait]
impl TempStorage for FileSpool {
    async fn store(&self, data: Bytes) -> Result<TempArtifact, SpoolError> {
        let path = self.create_file()?;
        let size = data.len() as u64;

        if let Err(source) = tokio::fs::write(&path, &data).await {
            remove_artifact_file(&path);
            return Err(SpoolError::Io { path, source });
        }

        let artifact = TempArtifact {
            id: uuid::Uuid::new_v4().to_string(),
            path,
            size,
        };
        debug!(id = %artifact.id, path = %artifact.path.display(), size, "spooled deposit payload");
        Ok(artifact)
    }

    async fn open(&self, artifact: &TempArtifact) -> Result<Bytes, SpoolError> {
        tokio::fs::read(&artifact.path)
            .await
            .map(Bytes::from)
            .map_err(|source| SpoolError::Io {
                path: artifact.path.clone(),
                source,
            })
    }

    fn release(&self, artifacts: &[TempArtifact]) {
        for artifact in artifacts {
            remove_artifact_file(&artifact.path);
        }
    }
}

fn remove_artifact_file(path: &Path) {
    if let Err(e) = std::fs::remove_file(path) {
        if e.kind() != std::io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove temp file");
        }
    } else {
        trace!(path = %path.display(), "removed temp file");
    }
}

/// Request-scoped owner of temporary artifacts.
///
/// Releases everything it recorded when dropped, exactly once.
pub struct ArtifactGuard {
    storage: Arc<dyn TempStorage>,
    artifacts: Vec<TempArtifact>,
}

impl fmt::Debug for ArtifactGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArtifactGuard")
            .field("artifacts", &self.artifacts)
            .finish_non_exhaustive()
    }
}

impl ArtifactGuard {
    /// Create an empty guard releasing through `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn TempStorage>) -> Self {
        Self {
            storage,
            artifacts: Vec::new(),
        }
    }

    /// Provider backing this guard.
    #[must_use]
    pub fn storage(&self) -> &Arc<dyn TempStorage> {
        &self.storage
    }

    /// Buffer `data` through the provider and record the resulting artifact.
    pub async fn spool(&mut self, data: Bytes) -> Result<TempArtifact, SpoolError> {
        let artifact = self.storage.store(data).await?;
        self.artifacts.push(artifact.clone());
        Ok(artifact)
    }

    /// Record an artifact created elsewhere.
    pub fn track(&mut self, artifact: TempArtifact) {
        self.artifacts.push(artifact);
    }

    /// Artifacts recorded so far.
    #[must_use]
    pub fn artifacts(&self) -> &[TempArtifact] {
        &self.artifacts
    }
}

impl Drop for ArtifactGuard {
    fn drop(&mut self) {
        let artifacts = std::mem::take(&mut self.artifacts);
        trace!(count = artifacts.len(), "releasing deposit artifacts");
        self.storage.release(&artifacts);
    }
}
