use thiserror::Error;

use crate::models::UserId;

/// Failure while turning a [`crate::models::UserRecord`] into a [`crate::models::User`].
#[derive(Error, Debug)]
pub enum NormalizeError {
    #[error("invalid value for user setting '{key}': {source}")]
    InvalidSetting {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{field} of user {user_id} out of range: {value}")]
    TimestampOverflow {
        user_id: UserId,
        field: &'static str,
        value: i64,
    },
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage file {path} is not a JSON object: {source}")]
    Corrupt {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode '{key}' for storage: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Errors reported by a [`crate::service::UserService`].
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid request url: {0}")]
    Url(#[from] url::ParseError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Error returned by [`crate::UserProfileAdapter`] operations.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("stored session identifier '{0}' is not a user id")]
    InvalidSessionId(String),

    #[error("failed to encode setting '{key}': {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type Result<T, E = SessionError> = std::result::Result<T, E>;
