use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::{Map, Value};

use crate::session_store::{SessionStore, SessionStoreError};

/// Persists all keys as one JSON object in a file.
/// The file is created on first write, a missing file reads as empty storage.
pub struct FileSessionStore {
    path: PathBuf,
    // serializes read-modify-write cycles of this process
    write_lock: tokio::sync::Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Default::default(),
        }
    }

    async fn read_all(&self) -> Result<Map<String, Value>, SessionStoreError> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Map::new()),
            Err(err) => return Err(err.into()),
        };
        if content.trim().is_empty() {
            return Ok(Map::new());
        }
        match serde_json::from_str(&content)? {
            Value::Object(values) => Ok(values),
            other => Err(SessionStoreError::Corrupted(format!(
                "expected an object in {}, found {}",
                self.path.display(),
                other
            ))),
        }
    }

    async fn write_all(&self, values: Map<String, Value>) -> Result<(), SessionStoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        let content = serde_json::to_string_pretty(&Value::Object(values))?;
        tokio::fs::write(&self.path, content).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl SessionStore for FileSessionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        values.insert(key.to_string(), value);
        self.write_all(values).await
    }

    async fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        let _guard = self.write_lock.lock().await;
        let mut values = self.read_all().await?;
        if values.remove(key).is_some() {
            self.write_all(values).await?;
        }
        Ok(())
    }
}
