//! Process-wide client state.
//!
//! The composition root owns one [`AppStore`] and hands clones to whoever
//! needs it. State only changes through [`AppStore::dispatch`].

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::models::{Appearance, LocalSetting, Setting, SystemStatus, User};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GlobalState {
    pub locale: String,
    pub appearance: Appearance,
    pub system_status: SystemStatus,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserState {
    /// Instance owner, normalized.
    pub host: Option<User>,
    /// Signed-in user, normalized.
    pub user: Option<User>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub global: GlobalState,
    pub user: UserState,
}

/// Fields merged into the current user by [`Action::PatchUser`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct UserStatePatch {
    pub setting: Option<Setting>,
    pub local_setting: Option<LocalSetting>,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SetSystemStatus(SystemStatus),
    SetLocale(String),
    SetAppearance(Appearance),
    SetHost(User),
    SetUser(User),
    PatchUser(UserStatePatch),
}

fn reduce(state: &mut AppState, action: Action) {
    match action {
        Action::SetSystemStatus(status) => state.global.system_status = status,
        Action::SetLocale(locale) => state.global.locale = locale,
        Action::SetAppearance(appearance) => state.global.appearance = appearance,
        Action::SetHost(host) => state.user.host = Some(host),
        Action::SetUser(user) => state.user.user = Some(user),
        Action::PatchUser(patch) => {
            let Some(user) = state.user.user.as_mut() else {
                debug!("PatchUser dispatched without a current user, ignoring");
                return;
            };
            if let Some(setting) = patch.setting {
                user.setting = setting;
            }
            if let Some(local_setting) = patch.local_setting {
                user.local_setting = local_setting;
            }
            if let Some(nickname) = patch.nickname {
                user.nickname = nickname;
            }
            if let Some(email) = patch.email {
                user.email = email;
            }
            if let Some(avatar_url) = patch.avatar_url {
                user.avatar_url = avatar_url;
            }
        }
    }
}

/// Shared handle to the application state.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<watch::Sender<AppState>>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl AppStore {
    pub fn new(initial: AppState) -> Self {
        let (tx, _) = watch::channel(initial);
        Self { inner: Arc::new(tx) }
    }

    /// Apply `action` atomically and notify subscribers.
    pub fn dispatch(&self, action: Action) {
        self.inner.send_modify(|state| reduce(state, action));
    }

    /// Snapshot of the whole state.
    pub fn state(&self) -> AppState {
        self.inner.borrow().clone()
    }

    /// Read part of the state without cloning the rest.
    pub fn select<T>(&self, f: impl FnOnce(&AppState) -> T) -> T {
        f(&self.inner.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.inner.subscribe()
    }
}
