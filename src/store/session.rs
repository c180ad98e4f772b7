//! Persisted session identity
//!
//! A single serialized [`User`] kept under a fixed key so the session can be
//! restored on the next start.

use crate::models::User;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::fs;
#[cfg(test)]
use tokio::sync::Mutex;

/// Storage key of the persisted identity
pub const SESSION_KEY: &str = "civicpulse_user";

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session storage I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Stored session is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

pub trait SessionStorage: Send + Sync + 'static {
    fn load(&self) -> impl Future<Output = Result<Option<User>, SessionError>> + Send;
    fn save(&self, user: &User) -> impl Future<Output = Result<(), SessionError>> + Send;
    fn clear(&self) -> impl Future<Output = Result<(), SessionError>> + Send;
}

/// JSON file named after [`SESSION_KEY`] inside a data directory
#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    path: PathBuf,
}

impl FileSessionStorage {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self {
            path: data_dir.as_ref().join(format!("{}.json", SESSION_KEY)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> Result<Option<User>, SessionError> {
        match fs::read(&self.path).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, user: &User) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(user)?;
        fs::write(&self.path, json).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// Process-local storage
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    slot: Mutex<Option<String>>,
}

#[cfg(test)]
impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that already holds `raw` under the session key
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub async fn raw(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }
}

#[cfg(test)]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> Result<Option<User>, SessionError> {
        match self.slot.lock().await.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, user: &User) -> Result<(), SessionError> {
        *self.slot.lock().await = Some(serde_json::to_string(user)?);
        Ok(())
    }

    async fn clear(&self) -> Result<(), SessionError> {
        *self.slot.lock().await = None;
        Ok(())
    }
}
