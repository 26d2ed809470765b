use std::path::PathBuf;
use std::time::Duration;
use tracing::info;
use url::Url;

use crate::error::ConfigError;
use crate::models::{Appearance, SettingDefaults};

const DEFAULT_API_URL: &str = "http://localhost:5230";
const DEFAULT_STORAGE_PATH: &str = "memos-session.json";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub api_url: Url,
    pub access_token: Option<String>,
    pub storage_path: PathBuf,
    /// Colour scheme reported by the host system.
    pub color_scheme: Appearance,
    pub request_timeout: Duration,
}

impl SessionConfig {
    /// Load from the process environment, after reading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            info!(path = %path.display(), "Loaded environment file");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_url = var("MEMOS_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_url = Url::parse(&api_url).map_err(|e| ConfigError::Invalid {
            var: "MEMOS_API_URL",
            message: e.to_string(),
        })?;

        let color_scheme = match var("MEMOS_COLOR_SCHEME") {
            Some(value) => value.parse().map_err(|message| ConfigError::Invalid {
                var: "MEMOS_COLOR_SCHEME",
                message,
            })?,
            None => Appearance::Light,
        };

        let timeout_secs = match var("MEMOS_REQUEST_TIMEOUT_SECS") {
            Some(value) => value.trim().parse::<u64>().map_err(|e| ConfigError::Invalid {
                var: "MEMOS_REQUEST_TIMEOUT_SECS",
                message: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_url,
            access_token: var("MEMOS_ACCESS_TOKEN"),
            storage_path: var("MEMOS_STORAGE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_PATH)),
            color_scheme,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn setting_defaults(&self) -> SettingDefaults {
        SettingDefaults {
            appearance: self.color_scheme,
            ..Default::default()
        }
    }
}
