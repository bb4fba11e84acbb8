pub use file_session_store::FileSessionStore;
pub use in_memory_session_store::InMemorySessionStore;

use std::sync::Arc;

use serde_json::Value;

use crate::api::{SessionUser, UserId, UserPatchData};

mod file_session_store;
mod in_memory_session_store;

/// Key under which the logged in user is persisted
pub const USER_KEY: &str = "user";

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to (de)serialize session value: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Session storage io failure {0}")]
    Io(#[from] std::io::Error),

    #[error("Session storage is corrupted: {0}")]
    Corrupted(String),
}

/// Minimal key-value storage the client persists its session in
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    /// Returns the stored value, None if nothing was stored under the key
    async fn get(&self, key: &str) -> Result<Option<Value>, SessionStoreError>;
    /// Stores the value, overwriting what was there before
    async fn set(&self, key: &str, value: Value) -> Result<(), SessionStoreError>;
    /// Removes the value, removing a missing key is not an error
    async fn remove(&self, key: &str) -> Result<(), SessionStoreError>;
}

/// Typed access to the "user" record of a [`SessionStore`].
///
/// Reads and writes are not atomic with respect to each other, the last writer wins.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    pub async fn current_user(&self) -> Result<Option<SessionUser>, SessionStoreError> {
        match self.store.get(USER_KEY).await? {
            None | Some(Value::Null) => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    pub async fn current_user_id(&self) -> Result<Option<UserId>, SessionStoreError> {
        Ok(self.current_user().await?.map(|user| user.user_id))
    }

    pub async fn save_user(&self, user: &SessionUser) -> Result<(), SessionStoreError> {
        self.store.set(USER_KEY, serde_json::to_value(user)?).await
    }

    /// Merges the patched fields into the stored record.
    /// Returns the updated record, or None when no user is stored.
    pub async fn merge_user(
        &self,
        patch: &UserPatchData,
    ) -> Result<Option<SessionUser>, SessionStoreError> {
        let Some(mut stored) = self.store.get(USER_KEY).await? else {
            return Ok(None);
        };
        if stored.is_null() {
            return Ok(None);
        }
        // password is never kept locally
        let mut patch = serde_json::to_value(patch)?;
        if let Some(fields) = patch.as_object_mut() {
            fields.remove("password");
        }
        json_patch::merge(&mut stored, &patch);
        let user: SessionUser = serde_json::from_value(stored.clone())?;
        self.store.set(USER_KEY, stored).await?;
        Ok(Some(user))
    }

    pub async fn clear(&self) -> Result<(), SessionStoreError> {
        self.store.remove(USER_KEY).await
    }
}
