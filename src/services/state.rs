//! Durable key-value state
//!
//! The registry persists through a small key-value store: values are JSON,
//! keys are flat strings. `JsonFileStateStore` keeps everything in one JSON
//! object on disk and rewrites it atomically on every update.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("state I/O error for {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid state value for key {key:?}: {source}")]
    Value {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("state file {path:?} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("state file {path:?} is not a JSON object")]
    NotAnObject { path: PathBuf },
    #[error("state store is read-only")]
    ReadOnly,
}

/// Persistent key-value storage
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Current value of a key
    fn get(&self, key: &str) -> Option<Value>;

    /// Set a key and persist the change before returning
    async fn update(&self, key: &str, value: Value) -> Result<(), StateError>;
}

impl dyn StateStore + '_ {
    /// Deserialize a key, `Ok(None)` when it was never written
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StateError> {
        self.get(key)
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StateError::Value {
                    key: key.to_string(),
                    source,
                })
            })
            .transpose()
    }

    /// Serialize and store a value
    pub async fn update_as<T: Serialize + Sync>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<(), StateError> {
        let value = serde_json::to_value(value).map_err(|source| StateError::Value {
            key: key.to_string(),
            source,
        })?;
        self.update(key, value).await
    }
}

/// State store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStateStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStateStore {
    /// Open the store, reading existing values. A missing file is an empty store.
    pub fn open(path: PathBuf) -> Result<Self, StateError> {
        let values = match std::fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str::<Value>(&content) {
                Ok(Value::Object(map)) => map,
                Ok(_) => return Err(StateError::NotAnObject { path }),
                Err(source) => return Err(StateError::Parse { path, source }),
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => Map::new(),
            Err(source) => return Err(StateError::Io { path, source }),
        };

        tracing::debug!("Opened state store {:?} with {} keys", path, values.len());
        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    /// Empty store that will replace whatever is at `path` on the next update
    pub fn empty(path: PathBuf) -> Self {
        Self {
            path,
            values: Mutex::new(Map::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write to a temp file in the same directory, then rename over the target
    async fn atomic_write(&self, data: &[u8]) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let temp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, data).await?;
        tokio::fs::rename(&temp_path, &self.path).await
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn update(&self, key: &str, value: Value) -> Result<(), StateError> {
        let (previous, snapshot) = {
            let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
            let previous = values.insert(key.to_string(), value);
            (previous, Value::Object(values.clone()))
        };

        let written = match serde_json::to_vec_pretty(&snapshot) {
            Ok(json) => self
                .atomic_write(&json)
                .await
                .map_err(|source| StateError::Io {
                    path: self.path.clone(),
                    source,
                }),
            Err(source) => Err(StateError::Value {
                key: key.to_string(),
                source,
            }),
        };

        if written.is_err() {
            // Memory mirrors what is on disk
            let mut values = self.values.lock().unwrap_or_else(PoisonError::into_inner);
            match previous {
                Some(previous) => values.insert(key.to_string(), previous),
                None => values.remove(key),
            };
        }
        written
    }
}

/// In-memory state store; nothing survives the process
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    values: Mutex<Map<String, Value>>,
    read_only: AtomicBool,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every following `update` fail with `StateError::ReadOnly`
    pub fn set_read_only(&self, read_only: bool) {
        self.read_only.store(read_only, Ordering::SeqCst);
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    async fn update(&self, key: &str, value: Value) -> Result<(), StateError> {
        if self.read_only.load(Ordering::SeqCst) {
            return Err(StateError::ReadOnly);
        }
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
        Ok(())
    }
}
