use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;

/// Key the display name is stored under.
pub const USER_NAME_KEY: &str = "userName";

// ─── Error types ────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Malformed store file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Cannot encode store contents for {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

// ─── Contract ───────────────────────────────────────────────────────────────

/// A tiny asynchronous key-value store.
///
/// Neither call fails toward the caller: a missing or unreadable value reads as
/// `None`, and writes are best-effort (failures are logged and dropped).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    fn backend_name(&self) -> &'static str;

    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str);
}

/// Pick the backend once: the synced directory when configured and present,
/// the local data directory otherwise.
pub fn open(config: &Config) -> Arc<dyn KeyValueStore> {
    let store: Arc<dyn KeyValueStore> = match config.sync_dir.as_deref() {
        Some(dir) if dir.is_dir() => Arc::new(SyncedStore::new(dir)),
        Some(dir) => {
            warn!(dir = %dir.display(), "sync directory missing, falling back to local store");
            Arc::new(LocalStore::default_location())
        }
        None => Arc::new(LocalStore::default_location()),
    };
    info!(backend = store.backend_name(), "store opened");
    store
}

// ─── JSON file plumbing shared by both backends ─────────────────────────────

async fn read_map(path: &Path) -> Result<Map<String, Value>, StoreError> {
    let contents = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&contents).map_err(|source| StoreError::Malformed {
        path: path.to_path_buf(),
        source,
    })
}

async fn write_map(path: &Path, map: &Map<String, Value>, atomic: bool) -> Result<(), StoreError> {
    let io_err = |source: std::io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let json = serde_json::to_string_pretty(map).map_err(|source| StoreError::Serialize {
        path: path.to_path_buf(),
        source,
    })?;

    if atomic {
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await.map_err(io_err)?;
        tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    } else {
        tokio::fs::write(path, json).await.map_err(io_err)?;
    }
    Ok(())
}

async fn get_from(path: &Path, key: &str) -> Option<String> {
    match read_map(path).await {
        Ok(map) => map.get(key).and_then(Value::as_str).map(str::to_string),
        Err(e) => {
            warn!(error = %e, "store read failed, treating value as absent");
            None
        }
    }
}

async fn set_into(path: &Path, key: &str, value: &str, atomic: bool) {
    // A malformed file is replaced; one that cannot be read is left alone so
    // its other keys survive.
    let mut map = match read_map(path).await {
        Ok(map) => map,
        Err(StoreError::Malformed { .. }) => Map::new(),
        Err(e) => {
            warn!(error = %e, key, "store unreadable, write skipped");
            return;
        }
    };
    map.insert(key.to_string(), Value::String(value.to_string()));
    match write_map(path, &map, atomic).await {
        Ok(()) => debug!(key, path = %path.display(), "store write"),
        Err(e) => warn!(error = %e, "store write failed"),
    }
}

// ─── Synced backend ─────────────────────────────────────────────────────────

/// Lives in a directory some external tool keeps in sync across machines.
pub struct SyncedStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SyncedStore {
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join("days-left.json"),
            lock: Mutex::new(()),
        }
    }
}

#[async_trait]
impl KeyValueStore for SyncedStore {
    fn backend_name(&self) -> &'static str {
        "synced"
    }

    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        get_from(&self.path, key).await
    }

    async fn set(&self, key: &str, value: &str) {
        let _guard = self.lock.lock().await;
        set_into(&self.path, key, value, true).await;
    }
}

// ─── Local backend ──────────────────────────────────────────────────────────

pub struct LocalStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl LocalStore {
    pub fn at(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    pub fn default_location() -> Self {
        let path = dirs::data_local_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("days-left")
            .join("store.json");
        Self::at(path)
    }
}

#[async_trait]
impl KeyValueStore for LocalStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn get(&self, key: &str) -> Option<String> {
        let _guard = self.lock.lock().await;
        get_from(&self.path, key).await
    }

    async fn set(&self, key: &str, value: &str) {
        let _guard = self.lock.lock().await;
        set_into(&self.path, key, value, false).await;
    }
}
