//! Document persistence.
//!
//! Every collection is stored as one JSON document under a fixed key and is
//! rewritten in full on each save. There is no versioning: the last writer
//! wins.

use crate::errors::StoreResult;
use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tokio::fs;
use tracing::{debug, error, warn};

pub const HABITS_KEY: &str = "habits";
pub const GOALS_KEY: &str = "goals";
pub const TODOS_KEY: &str = "awesome-todos";
pub const NOTES_KEY: &str = "productivity-notes";
pub const EVENTS_KEY: &str = "calendar-events";
pub const POMODORO_KEY: &str = "pomodoro-stats";
pub const POMODORO_SETTINGS_KEY: &str = "pomodoro-settings";

/// Key/value store of whole documents.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Replaces the document stored under `key`.
    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()>;
}

/// Stores each document as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    pub async fn new(dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).await?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

#[async_trait]
impl Backend for FileBackend {
    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        match fs::read(self.path_for(key)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        fs::write(self.path_for(key), bytes).await?;
        Ok(())
    }
}

/// Keeps documents in process memory.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn documents(&self) -> std::sync::MutexGuard<'_, HashMap<String, Vec<u8>>> {
        // A poisoned map still holds whole documents; keep serving them.
        self.documents
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn load(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.documents().get(key).cloned())
    }

    async fn save(&self, key: &str, bytes: &[u8]) -> StoreResult<()> {
        self.documents().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}

/// Reads and parses the document under `key`.
///
/// Absent, unreadable and unparsable documents all yield `None`; the caller
/// substitutes its defaults.
pub async fn load_document<T: DeserializeOwned>(backend: &dyn Backend, key: &str) -> Option<T> {
    let bytes = match backend.load(key).await {
        Ok(Some(bytes)) => bytes,
        Ok(None) => {
            debug!("no stored document for {key}");
            return None;
        }
        Err(err) => {
            error!("failed to read {key}: {err}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("discarding unparsable {key} document: {err}");
            None
        }
    }
}

pub async fn save_document<T: Serialize + ?Sized>(
    backend: &dyn Backend,
    key: &str,
    value: &T,
) -> StoreResult<()> {
    let payload = serde_json::to_vec_pretty(value)?;
    backend.save(key, &payload).await?;
    debug!("saved {key} ({} bytes)", payload.len());
    Ok(())
}
