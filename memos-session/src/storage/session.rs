use std::sync::Arc;
use tracing::debug;

use super::LocalStorage;
use crate::error::{SessionError, StorageError};
use crate::models::UserId;

/// Key the active user's id is stored under.
pub const SESSION_KEY: &str = "userId";

/// Persists which user this device is signed in as.
#[derive(Clone)]
pub struct SessionStore {
    backend: Arc<dyn LocalStorage>,
}

impl SessionStore {
    pub fn new(backend: Arc<dyn LocalStorage>) -> Self {
        Self { backend }
    }

    /// The stored user id, if any. Blank values count as no session.
    pub fn load(&self) -> Result<Option<UserId>, SessionError> {
        let Some(raw) = self.backend.get_item(SESSION_KEY)? else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        trimmed
            .parse::<UserId>()
            .map(Some)
            .map_err(|_| SessionError::InvalidSessionId(raw))
    }

    pub fn save(&self, user_id: UserId) -> Result<(), StorageError> {
        debug!(user_id, "Storing session identifier");
        self.backend.set_item(SESSION_KEY, &user_id.to_string())
    }

    pub fn clear(&self) -> Result<(), StorageError> {
        self.backend.remove_item(SESSION_KEY)
    }
}
