//! Snapshot-file [`ForumRepository`].
//!
//! The whole forum is one JSON document. Every change rewrites it through a
//! temporary file and a rename so a crash never leaves a half-written
//! snapshot behind.

use crate::changes;
use crate::error::{Result, StorageError};
use async_trait::async_trait;
use domains::{Change, ForumRepository, ForumSnapshot};
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;

pub struct JsonFileRepository {
    path: PathBuf,
    /// Cached document; `None` until the file has been read once.
    state: Mutex<Option<ForumSnapshot>>,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the file. A missing file is an empty forum.
    async fn read(&self) -> Result<ForumSnapshot> {
        match fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| StorageError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = %self.path.display(), "no snapshot yet, starting empty");
                Ok(ForumSnapshot::default())
            }
            Err(source) => Err(StorageError::Io {
                path: self.path.clone(),
                source,
            }),
        }
    }

    async fn write(&self, snapshot: &ForumSnapshot) -> Result<()> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_err)?;
        }
        let body = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, body).await.map_err(io_err)?;
        fs::rename(&tmp, &self.path).await.map_err(io_err)?;
        Ok(())
    }

    /// Replaces the whole document, e.g. when seeding.
    pub async fn write_snapshot(&self, snapshot: &ForumSnapshot) -> Result<()> {
        let mut state = self.state.lock().await;
        self.write(snapshot).await?;
        *state = Some(snapshot.clone());
        tracing::info!(
            path = %self.path.display(),
            threads = snapshot.threads.len(),
            "snapshot written"
        );
        Ok(())
    }
}

#[async_trait]
impl ForumRepository for JsonFileRepository {
    async fn load_all(&self) -> anyhow::Result<ForumSnapshot> {
        let mut state = self.state.lock().await;
        let snapshot = self.read().await?;
        *state = Some(snapshot.clone());
        Ok(snapshot)
    }

    async fn persist(&self, change: Change) -> anyhow::Result<()> {
        let mut state = self.state.lock().await;
        let mut snapshot = match state.take() {
            Some(snapshot) => snapshot,
            None => self.read().await?,
        };
        changes::apply(&mut snapshot, change);
        let written = self.write(&snapshot).await;
        // Keep the in-memory view even if the write failed; the next change retries.
        *state = Some(snapshot);
        written?;
        Ok(())
    }
}
