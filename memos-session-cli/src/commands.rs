use anyhow::Context;
use memos_session::models::{LocalSetting, UserPatch};
use memos_session::reload::ReloadSignal;
use memos_session::service::HttpUserService;
use memos_session::storage::FileStorage;
use memos_session::store::AppStore;
use memos_session::{SessionConfig, UserProfileAdapter};
use serde::Serialize;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::Arc;
use tracing::info;

use crate::cli::Command;

/// Wire the adapter to the HTTP service and file storage described by `config`.
pub fn build_adapter(
    config: &SessionConfig,
) -> anyhow::Result<(UserProfileAdapter, Arc<ReloadSignal>)> {
    let storage = FileStorage::open(&config.storage_path).with_context(|| {
        format!("opening session storage {}", config.storage_path.display())
    })?;
    let service = HttpUserService::new(
        config.api_url.clone(),
        config.access_token.clone(),
        config.request_timeout,
    )?;
    let reload = Arc::new(ReloadSignal::new());

    let adapter = UserProfileAdapter::new(
        AppStore::default(),
        Arc::new(storage),
        Arc::new(service),
        reload.clone(),
        config.setting_defaults(),
    );
    Ok((adapter, reload))
}

fn print(out: &mut impl Write, value: &impl Serialize) -> anyhow::Result<()> {
    serde_json::to_writer(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

/// Run one command, writing its JSON result as a line to `out`.
pub async fn run(
    command: Command,
    adapter: &UserProfileAdapter,
    reload: &ReloadSignal,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    match command {
        Command::Status => {
            let status = adapter.load_system_status().await?;
            print(out, &status)?;
        }
        Command::Whoami => {
            adapter.load_system_status().await?;
            let user = adapter.initialize_session().await?;
            print(out, &user)?;
        }
        Command::Login { id } => {
            adapter.set_current_user(id)?;
            adapter.load_system_status().await?;
            let user = adapter.fetch_current_user().await?;
            print(out, &user)?;
        }
        Command::Logout => {
            adapter.sign_out().await?;
            print(out, &json!({ "signedOut": true }))?;
        }
        Command::Setting { key, value } => {
            let value: Value = serde_json::from_str(&value)
                .with_context(|| format!("setting value for '{}' is not JSON", key))?;
            adapter.load_system_status().await?;
            let user = adapter.upsert_user_setting(&key, &value).await?;
            print(out, &user)?;
        }
        Command::Local { settings } => {
            let local_setting: LocalSetting =
                serde_json::from_str(&settings).context("local settings are not a JSON object")?;
            adapter.upsert_local_setting(local_setting.clone())?;
            print(out, &local_setting)?;
        }
        Command::Patch {
            id,
            username,
            nickname,
            email,
            avatar_url,
        } => {
            adapter.load_system_status().await?;
            adapter.initialize_session().await?;

            let mut patch = UserPatch::new(id);
            let mut update_mask = Vec::new();
            if username.is_some() {
                update_mask.push("username".to_string());
            }
            if nickname.is_some() {
                update_mask.push("nickname".to_string());
            }
            if email.is_some() {
                update_mask.push("email".to_string());
            }
            if avatar_url.is_some() {
                update_mask.push("avatar_url".to_string());
            }
            patch.username = username;
            patch.nickname = nickname;
            patch.email = email;
            patch.avatar_url = avatar_url;

            adapter.patch_user(patch, update_mask).await?;

            if reload.take() {
                info!("Reloading session");
                let user = adapter.initialize_session().await?;
                print(out, &user)?;
            } else {
                print(out, &json!({ "updated": id }))?;
            }
        }
        Command::Delete { name } => {
            adapter.delete_user(&name).await?;
            print(out, &json!({ "deleted": name }))?;
        }
    }
    Ok(())
}
