use clap::{Parser, Subcommand};
use memos_session::models::UserId;
use memos_session::SessionConfig;
use std::path::PathBuf;
use url::Url;

#[derive(Debug, Parser)]
#[command(name = "memos-session-cli", version, about = "Inspect and change the memos session of this device")]
pub struct Cli {
    /// Base URL of the memos server (overrides MEMOS_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<Url>,

    /// Session storage file (overrides MEMOS_STORAGE_PATH)
    #[arg(long, global = true)]
    pub storage: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the instance status and host
    Status,
    /// Bootstrap the session and show the signed-in user
    Whoami,
    /// Sign in as user ID on this device
    Login { id: UserId },
    /// Sign out and forget the session
    Logout,
    /// Store a server-side setting; VALUE is JSON
    Setting { key: String, value: String },
    /// Replace the device-only settings; SETTINGS is a JSON object
    Local { settings: String },
    /// Update fields of a user
    Patch {
        id: UserId,
        #[arg(long)]
        username: Option<String>,
        #[arg(long)]
        nickname: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        avatar_url: Option<String>,
    },
    /// Delete a user by resource name, e.g. users/7
    Delete { name: String },
}

impl Cli {
    /// Environment configuration with command line overrides applied.
    pub fn config(&self) -> anyhow::Result<SessionConfig> {
        let mut config = SessionConfig::from_env()?;
        if let Some(api_url) = &self.api_url {
            config.api_url = api_url.clone();
        }
        if let Some(storage) = &self.storage {
            config.storage_path = storage.clone();
        }
        Ok(config)
    }
}
