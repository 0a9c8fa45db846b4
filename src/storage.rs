//! Durable key-value storage for the little state that survives a restart.
//!
//! The session layer only ever stores one key, [`USER_TYPE_KEY`], but the store is a
//! plain string map so hosts can plug in whatever device storage they have.

use crate::error::AppError;
use futures::future::{ready, BoxFuture, FutureExt};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key under which the account-kind marker is persisted.
pub const USER_TYPE_KEY: &str = "userType";

pub trait KeyValueStore: Send + Sync {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AppError>>;

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), AppError>>;

    /// Removing a key that is not present is not an error.
    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), AppError>>;
}

/// Process-local store. Nothing survives the process; useful for tests and for
/// hosts that handle persistence themselves.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_items<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, AppError> {
        let mut items = self
            .items
            .lock()
            .map_err(|_| AppError::Storage("memory store lock poisoned".into()))?;
        Ok(f(&mut items))
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AppError>> {
        ready(self.with_items(|items| items.get(key).cloned())).boxed()
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        ready(self.with_items(|items| {
            items.insert(key.to_string(), value.to_string());
        }))
        .boxed()
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        ready(self.with_items(|items| {
            items.remove(key);
        }))
        .boxed()
    }
}

/// Store backed by a single JSON object on disk.
///
/// A missing file reads as an empty store; the file and its parent directory are
/// created on first write. Writes are serialized within the process, last writer wins.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    write_lock: tokio::sync::Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: tokio::sync::Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<HashMap<String, String>, AppError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(HashMap::new()),
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, items: &HashMap<String, String>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let bytes = serde_json::to_vec_pretty(items)?;
        tokio::fs::write(&self.path, bytes).await?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<Option<String>, AppError>> {
        async move {
            let items = self.load().await?;
            Ok(items.get(key).cloned())
        }
        .boxed()
    }

    fn set_item<'a>(&'a self, key: &'a str, value: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            let _guard = self.write_lock.lock().await;
            let mut items = self.load().await?;
            items.insert(key.to_string(), value.to_string());
            self.save(&items).await
        }
        .boxed()
    }

    fn remove_item<'a>(&'a self, key: &'a str) -> BoxFuture<'a, Result<(), AppError>> {
        async move {
            let _guard = self.write_lock.lock().await;
            let mut items = self.load().await?;
            if items.remove(key).is_some() {
                self.save(&items).await?;
            }
            Ok(())
        }
        .boxed()
    }
}
