//! End-to-end tests of the session adapter against an in-process user service.

use async_trait::async_trait;
use memos_session::models::{
    Appearance, CustomizedProfile, DeleteUserRequest, LocalSetting, SettingDefaults,
    SystemStatus, UpdateUserRequest, UpsertUserSetting, UserId, UserPatch, UserRecord,
    UserSettingEntry, Visibility,
};
use memos_session::reload::ReloadSignal;
use memos_session::service::UserService;
use memos_session::storage::{LocalStorage, MemoryStorage, SESSION_KEY};
use memos_session::store::{Action, AppStore};
use memos_session::{ServiceError, SessionError, UserProfileAdapter};
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// User service that keeps users in memory and records every call.
#[derive(Default)]
struct FakeUserService {
    users: Mutex<HashMap<UserId, UserRecord>>,
    calls: Mutex<Vec<String>>,
    status: SystemStatus,
    fail_lookups: bool,
}

impl FakeUserService {
    fn with_users(users: Vec<UserRecord>) -> Self {
        Self {
            users: Mutex::new(users.into_iter().map(|u| (u.id, u)).collect()),
            ..Default::default()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn get_system_status(&self) -> Result<SystemStatus, ServiceError> {
        self.record("get_system_status".to_string());
        Ok(self.status.clone())
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<UserRecord, ServiceError> {
        self.record(format!("get_user_by_id:{}", id));
        if self.fail_lookups {
            return Err(ServiceError::Status {
                status: 500,
                message: "database is locked".to_string(),
            });
        }
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or_else(|| ServiceError::NotFound(format!("/api/v1/user/{}", id)))
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        self.record("sign_out".to_string());
        Ok(())
    }

    async fn upsert_user_setting(&self, request: UpsertUserSetting) -> Result<(), ServiceError> {
        self.record(format!("upsert_user_setting:{}={}", request.key, request.value));
        // the fake only knows one signed-in user: the first one
        let mut users = self.users.lock().unwrap();
        if let Some(user) = users.values_mut().min_by_key(|u| u.id) {
            let list = user.user_setting_list.get_or_insert_with(Vec::new);
            list.retain(|entry| entry.key != request.key);
            list.push(UserSettingEntry {
                user_id: user.id,
                key: request.key,
                value: request.value,
            });
        }
        Ok(())
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<(), ServiceError> {
        self.record(format!(
            "update_user:{}:{}",
            request.user.name,
            request.update_mask.join(",")
        ));
        Ok(())
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), ServiceError> {
        self.record(format!("delete_user:{}", request.name));
        Ok(())
    }
}

struct Harness {
    adapter: UserProfileAdapter,
    service: Arc<FakeUserService>,
    storage: Arc<MemoryStorage>,
    reload: Arc<ReloadSignal>,
    store: AppStore,
}

fn harness(service: FakeUserService) -> Harness {
    let store = AppStore::default();
    let service = Arc::new(service);
    let storage = Arc::new(MemoryStorage::new());
    let reload = Arc::new(ReloadSignal::new());
    let adapter = UserProfileAdapter::new(
        store.clone(),
        storage.clone(),
        service.clone(),
        reload.clone(),
        SettingDefaults::default(),
    );
    Harness {
        adapter,
        service,
        storage,
        reload,
        store,
    }
}

fn user_record(id: UserId, username: &str, settings: &[(&str, &str)]) -> UserRecord {
    UserRecord {
        id,
        username: username.to_string(),
        created_ts: 1_700_000_000,
        updated_ts: 1_700_000_100,
        user_setting_list: Some(
            settings
                .iter()
                .map(|(key, value)| UserSettingEntry {
                    user_id: id,
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        ),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_fetch_without_session_makes_no_calls() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));

    let user = h.adapter.fetch_current_user().await.unwrap();

    assert!(user.is_none());
    assert!(h.service.calls().is_empty());
    assert!(h.store.state().user.user.is_none());
}

#[tokio::test]
async fn test_fetch_current_user_normalizes_and_stores() {
    let h = harness(FakeUserService::with_users(vec![user_record(
        1,
        "alice",
        &[("memo_visibility", "\"PUBLIC\"")],
    )]));
    h.adapter.set_current_user(1).unwrap();

    let user = h.adapter.fetch_current_user().await.unwrap().unwrap();

    assert_eq!(user.id, 1);
    assert_eq!(user.created_ts, 1_700_000_000_000);
    assert_eq!(user.setting.memo_visibility, Visibility::Public);
    assert_eq!(h.adapter.state().user, Some(user));
    assert_eq!(h.service.calls(), vec!["get_user_by_id:1"]);
}

#[tokio::test]
async fn test_fetch_failure_propagates_and_keeps_state() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    h.adapter.set_current_user(2).unwrap();
    let err = h.adapter.fetch_current_user().await.unwrap_err();

    assert!(matches!(err, SessionError::Service(ref e) if e.is_not_found()));
    assert_eq!(h.adapter.state().user.map(|u| u.id), Some(1));
}

#[tokio::test]
async fn test_malformed_server_setting_fails_fetch() {
    let h = harness(FakeUserService::with_users(vec![user_record(
        1,
        "alice",
        &[("locale", "{")],
    )]));
    h.adapter.set_current_user(1).unwrap();

    let err = h.adapter.fetch_current_user().await.unwrap_err();

    assert!(err.to_string().contains("locale"));
    assert!(h.adapter.state().user.is_none());
}

#[tokio::test]
async fn test_initialize_session_sets_host_locale_and_appearance() {
    let mut service = FakeUserService::with_users(vec![user_record(
        2,
        "bob",
        &[("locale", "\"ja\""), ("appearance", "\"dark\"")],
    )]);
    service.status = SystemStatus {
        host: Some(user_record(1, "host", &[])),
        customized_profile: CustomizedProfile {
            locale: Some("fr".to_string()),
            ..Default::default()
        },
        ..Default::default()
    };
    let h = harness(service);
    h.adapter.load_system_status().await.unwrap();
    h.adapter.set_current_user(2).unwrap();

    let user = h.adapter.initialize_session().await.unwrap().unwrap();

    let state = h.store.state();
    assert_eq!(user.username, "bob");
    assert_eq!(state.user.host.as_ref().map(|u| u.id), Some(1));
    // host picks up the instance profile
    assert_eq!(state.user.host.unwrap().setting.locale, "fr");
    assert_eq!(state.global.locale, "ja");
    assert_eq!(state.global.appearance, Appearance::Dark);
}

#[tokio::test]
async fn test_initialize_session_without_session() {
    let h = harness(FakeUserService::default());
    h.store.dispatch(Action::SetLocale("de".to_string()));

    let user = h.adapter.initialize_session().await.unwrap();

    assert!(user.is_none());
    assert_eq!(h.store.state().global.locale, "de");
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn test_initialize_session_with_deleted_user_is_absent() {
    let h = harness(FakeUserService::default());
    h.adapter.set_current_user(9).unwrap();

    let user = h.adapter.initialize_session().await.unwrap();

    assert!(user.is_none());
    assert_eq!(h.service.calls(), vec!["get_user_by_id:9"]);
}

#[tokio::test]
async fn test_initialize_session_propagates_server_errors() {
    let mut service = FakeUserService::with_users(vec![user_record(1, "alice", &[])]);
    service.fail_lookups = true;
    let h = harness(service);
    h.adapter.set_current_user(1).unwrap();

    let err = h.adapter.initialize_session().await.unwrap_err();

    assert!(matches!(
        err,
        SessionError::Service(ServiceError::Status { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_sign_out_clears_session_but_not_state() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    h.adapter.sign_out().await.unwrap();

    assert!(h.storage.get_item(SESSION_KEY).unwrap().is_none());
    assert_eq!(h.adapter.state().user.map(|u| u.id), Some(1));
    assert_eq!(h.service.calls().last().map(String::as_str), Some("sign_out"));
}

#[tokio::test]
async fn test_set_current_user_only_persists() {
    let h = harness(FakeUserService::default());

    h.adapter.set_current_user(5).unwrap();

    assert_eq!(h.storage.get_item(SESSION_KEY).unwrap().as_deref(), Some("5"));
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn test_upsert_user_setting_round_trips_through_server() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();

    let user = h
        .adapter
        .upsert_user_setting("memo_visibility", "PROTECTED")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(user.setting.memo_visibility, Visibility::Protected);
    assert_eq!(
        h.service.calls(),
        vec![
            "upsert_user_setting:memo_visibility=\"PROTECTED\"",
            "get_user_by_id:1",
        ]
    );
    assert_eq!(
        h.adapter.state().user.unwrap().setting.memo_visibility,
        Visibility::Protected
    );
}

#[tokio::test]
async fn test_upsert_user_setting_rejects_empty_key() {
    let h = harness(FakeUserService::default());

    let err = h.adapter.upsert_user_setting("", &json!(1)).await.unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(h.service.calls().is_empty());
}

#[tokio::test]
async fn test_upsert_local_setting_persists_and_patches_state() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();
    let calls_before = h.service.calls().len();

    let local_setting = LocalSetting {
        enable_double_click_editing: true,
        ..Default::default()
    };
    h.adapter.upsert_local_setting(local_setting.clone()).unwrap();

    assert_eq!(h.service.calls().len(), calls_before);
    assert_eq!(
        h.adapter.persisted("localSetting"),
        Some(json!({ "enableDoubleClickEditing": true }))
    );
    assert_eq!(h.adapter.state().user.unwrap().local_setting, local_setting);

    // the next fetch reads it back from storage
    let refetched = h.adapter.fetch_current_user().await.unwrap().unwrap();
    assert!(refetched.local_setting.enable_double_click_editing);
}

#[tokio::test]
async fn test_unreadable_local_setting_falls_back_to_default() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.storage
        .set_item("localSetting", "{\"enableDoubleClickEditing\": \"yes\"}")
        .unwrap();
    h.adapter.set_current_user(1).unwrap();

    let user = h.adapter.fetch_current_user().await.unwrap().unwrap();

    assert!(!user.local_setting.enable_double_click_editing);
}

#[tokio::test]
async fn test_patch_current_user_reloads() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    let mut patch = UserPatch::new(1);
    patch.username = Some("alice2".to_string());
    h.adapter
        .patch_user(patch, vec!["username".to_string()])
        .await
        .unwrap();

    assert_eq!(h.reload.requests(), 1);
    assert_eq!(
        h.service.calls().last().map(String::as_str),
        Some("update_user:users/1:username")
    );
}

#[tokio::test]
async fn test_patch_other_user_does_not_reload() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    let mut patch = UserPatch::new(2);
    patch.nickname = Some("Bobby".to_string());
    h.adapter
        .patch_user(patch, vec!["nickname".to_string()])
        .await
        .unwrap();

    assert_eq!(h.reload.requests(), 0);
}

#[tokio::test]
async fn test_patch_reload_follows_resource_name() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    // a patch built for user 1 but retargeted at user 2 updates user 2 only
    let mut patch = UserPatch::new(1);
    patch.name = "users/2".to_string();
    patch.nickname = Some("Bobby".to_string());
    h.adapter
        .patch_user(patch, vec!["nickname".to_string()])
        .await
        .unwrap();

    assert_eq!(
        h.service.calls().last().map(String::as_str),
        Some("update_user:users/2:nickname")
    );
    assert_eq!(h.reload.requests(), 0);

    let mut patch = UserPatch::new(2);
    patch.name = "users/1".to_string();
    patch.nickname = Some("Ally".to_string());
    h.adapter
        .patch_user(patch, vec!["nickname".to_string()])
        .await
        .unwrap();

    assert_eq!(h.reload.requests(), 1);
}

#[tokio::test]
async fn test_patch_user_validates_before_sending() {
    let h = harness(FakeUserService::default());

    let err = h
        .adapter
        .patch_user(UserPatch::new(1), vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, SessionError::Validation(_)));
    assert!(h.service.calls().is_empty());
    assert_eq!(h.reload.requests(), 0);
}

#[tokio::test]
async fn test_delete_user_leaves_local_state() {
    let h = harness(FakeUserService::with_users(vec![user_record(1, "alice", &[])]));
    h.adapter.set_current_user(1).unwrap();
    h.adapter.fetch_current_user().await.unwrap();

    h.adapter.delete_user("users/1").await.unwrap();

    assert_eq!(
        h.service.calls().last().map(String::as_str),
        Some("delete_user:users/1")
    );
    assert_eq!(h.storage.get_item(SESSION_KEY).unwrap().as_deref(), Some("1"));
    assert!(h.adapter.state().user.is_some());
}

#[tokio::test]
async fn test_delete_user_rejects_non_user_names() {
    let h = harness(FakeUserService::default());

    for name in ["../v1/auth/signout", "users/1/../../v1/auth/signout", "memos/1", "users/"] {
        let err = h.adapter.delete_user(name).await.unwrap_err();
        assert!(matches!(err, SessionError::Validation(_)), "{name}");
    }

    assert!(h.service.calls().is_empty());
}
