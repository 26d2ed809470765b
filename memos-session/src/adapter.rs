//! Read and update path for "the current user".

use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::models::input::ValidateExt;
use crate::models::{
    DeleteUserRequest, LocalSetting, SettingDefaults, SystemStatus, UpdateUserRequest,
    UpsertUserSetting, User, UserId, UserPatch, UserRecord,
};
use crate::normalize::normalize;
use crate::reload::Reloader;
use crate::service::UserService;
use crate::storage::{JsonStorage, LocalStorage, SessionStore, LOCAL_SETTING_KEY};
use crate::store::{Action, AppStore, UserState, UserStatePatch};

/// Glues the state store, local storage and the remote user service together.
///
/// Operations are independent: nothing is queued or deduplicated, and the
/// last response to land in the store wins.
pub struct UserProfileAdapter {
    store: AppStore,
    storage: JsonStorage,
    session: SessionStore,
    service: Arc<dyn UserService>,
    reloader: Arc<dyn Reloader>,
    defaults: SettingDefaults,
}

impl UserProfileAdapter {
    pub fn new(
        store: AppStore,
        storage: Arc<dyn LocalStorage>,
        service: Arc<dyn UserService>,
        reloader: Arc<dyn Reloader>,
        defaults: SettingDefaults,
    ) -> Self {
        Self {
            store,
            storage: JsonStorage::new(storage.clone()),
            session: SessionStore::new(storage),
            service,
            reloader,
            defaults,
        }
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    /// Snapshot of the user slice.
    pub fn state(&self) -> UserState {
        self.store.select(|state| state.user.clone())
    }

    fn persisted_local_setting(&self) -> Option<LocalSetting> {
        let mut data = self.storage.get(&[LOCAL_SETTING_KEY]);
        let value = data.remove(LOCAL_SETTING_KEY)?;
        match serde_json::from_value(value) {
            Ok(local_setting) => Some(local_setting),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable local setting");
                None
            }
        }
    }

    /// Normalize `raw` against the current system profile and local setting.
    pub fn normalize(&self, raw: UserRecord) -> Result<User> {
        let profile = self
            .store
            .select(|state| state.global.system_status.customized_profile.clone());
        Ok(normalize(
            raw,
            &profile,
            self.persisted_local_setting(),
            &self.defaults,
        )?)
    }

    /// Fetch the system status and put it in the store.
    pub async fn load_system_status(&self) -> Result<SystemStatus> {
        let status = self.service.get_system_status().await?;
        self.store.dispatch(Action::SetSystemStatus(status.clone()));
        Ok(status)
    }

    /// Bring the user slice up: host first, then the signed-in user.
    ///
    /// Returns `None` when nobody is signed in or the stored user no longer
    /// exists on the server.
    pub async fn initialize_session(&self) -> Result<Option<User>> {
        let host = self
            .store
            .select(|state| state.global.system_status.host.clone());
        if let Some(host) = host {
            let host = self.normalize(host)?;
            debug!(user_id = host.id, "Setting host");
            self.store.dispatch(Action::SetHost(host));
        }

        let user = match self.fetch_current_user().await {
            Ok(Some(user)) => user,
            Ok(None) => {
                info!("No signed-in user");
                return Ok(None);
            }
            Err(SessionError::Service(e)) if e.is_not_found() => {
                warn!(error = %e, "Stored session user not found");
                return Ok(None);
            }
            Err(e) => return Err(e),
        };

        if !user.setting.locale.is_empty() {
            self.store
                .dispatch(Action::SetLocale(user.setting.locale.clone()));
        }
        self.store
            .dispatch(Action::SetAppearance(user.setting.appearance));

        info!(user_id = user.id, username = %user.username, "Session initialized");
        Ok(Some(user))
    }

    /// Fetch, normalize and store the user the stored session points at.
    pub async fn fetch_current_user(&self) -> Result<Option<User>> {
        match self.session.load()? {
            Some(id) => self.fetch_user(id).await.map(Some),
            None => Ok(None),
        }
    }

    /// Fetch, normalize and store user `id` as the current user.
    ///
    /// On failure the store keeps whatever it held before.
    pub async fn fetch_user(&self, id: UserId) -> Result<User> {
        let raw = self.service.get_user_by_id(id).await?;
        let user = self.normalize(raw)?;
        self.store.dispatch(Action::SetUser(user.clone()));
        Ok(user)
    }

    /// Sign out remotely and forget the session. The store is left as is.
    pub async fn sign_out(&self) -> Result<()> {
        self.service.sign_out().await?;
        self.session.clear()?;
        info!("Signed out");
        Ok(())
    }

    /// Remember `id` as the signed-in user. Nothing is fetched.
    pub fn set_current_user(&self, id: UserId) -> Result<()> {
        self.session.save(id)?;
        Ok(())
    }

    /// Store one server-side setting, then re-read the user from the server.
    pub async fn upsert_user_setting<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
    ) -> Result<Option<User>> {
        let encoded = serde_json::to_string(value).map_err(|source| SessionError::Encode {
            key: key.to_string(),
            source,
        })?;
        let request = UpsertUserSetting {
            key: key.to_string(),
            value: encoded,
        };
        request.validate_input().map_err(SessionError::Validation)?;

        debug!(key, "Upserting user setting");
        self.service.upsert_user_setting(request).await?;
        self.fetch_current_user().await
    }

    /// Persist device-only preferences and patch them into the current user.
    pub fn upsert_local_setting(&self, local_setting: LocalSetting) -> Result<()> {
        let value = serde_json::to_value(&local_setting).map_err(|source| SessionError::Encode {
            key: LOCAL_SETTING_KEY.to_string(),
            source,
        })?;
        let mut data = Map::new();
        data.insert(LOCAL_SETTING_KEY.to_string(), value);
        self.storage.set(&data)?;

        self.store.dispatch(Action::PatchUser(UserStatePatch {
            local_setting: Some(local_setting),
            ..Default::default()
        }));
        Ok(())
    }

    /// Send a partial user update. Updating the signed-in user reloads the
    /// client, since fields such as the username change its identity.
    ///
    /// The patched user is the one `user.name` points at.
    pub async fn patch_user(&self, user: UserPatch, update_mask: Vec<String>) -> Result<()> {
        let request = UpdateUserRequest { user, update_mask };
        request.validate_input().map_err(SessionError::Validation)?;
        let user_id = request.user.id().ok_or_else(|| {
            SessionError::Validation(format!("invalid user resource name '{}'", request.user.name))
        })?;

        debug!(user_id, update_mask = ?request.update_mask, "Updating user");
        self.service.update_user(request).await?;

        let current_id = self
            .store
            .select(|state| state.user.user.as_ref().map(|u| u.id));
        if current_id == Some(user_id) {
            info!(user_id, "Current user changed, requesting reload");
            self.reloader.reload();
        }
        Ok(())
    }

    /// Delete a user remotely. Local state is the caller's business.
    ///
    /// `name` must be a user resource name such as `users/7`.
    pub async fn delete_user(&self, name: &str) -> Result<()> {
        let request = DeleteUserRequest {
            name: name.to_string(),
        };
        request.validate_input().map_err(SessionError::Validation)?;

        debug!(name, "Deleting user");
        self.service.delete_user(request).await?;
        Ok(())
    }

    /// Read back the raw JSON of any persisted key. Used for diagnostics.
    pub fn persisted(&self, key: &str) -> Option<Value> {
        self.storage.get(&[key]).remove(key)
    }
}
