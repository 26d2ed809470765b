//! User and session state for the memos web client.
//!
//! [`UserProfileAdapter`] turns user records from the remote service into
//! client-ready [`models::User`] values, keeps them in the shared
//! [`store::AppStore`] and persists the session identifier and device-only
//! settings through a [`storage::LocalStorage`].

mod adapter;
pub mod config;
pub mod error;
pub mod models;
pub mod normalize;
pub mod reload;
pub mod service;
pub mod storage;
pub mod store;
mod utils;

pub use adapter::UserProfileAdapter;
pub use config::SessionConfig;
pub use error::{NormalizeError, Result, ServiceError, SessionError, StorageError};
pub use utils::casing::to_camel_case;
