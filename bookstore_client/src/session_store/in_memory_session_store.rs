use std::collections::HashMap;

use serde_json::Value;

use crate::session_store::{SessionStore, SessionStoreError};

#[derive(Default)]
pub struct InMemorySessionStore {
    values: parking_lot::RwLock<HashMap<String, Value>>,
}

#[async_trait::async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError> {
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), SessionStoreError> {
        self.values.write().remove(key);
        Ok(())
    }
}
