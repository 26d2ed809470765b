use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::setting::{LocalSetting, Setting};

pub type UserId = i32;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Host,
    Admin,
    #[default]
    User,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RowStatus {
    #[default]
    Normal,
    Archived,
}

/// One server-stored preference. `value` is JSON text.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettingEntry {
    #[serde(default)]
    pub user_id: UserId,
    pub key: String,
    pub value: String,
}

/// User as returned by the remote service. Timestamps are in seconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct UserRecord {
    pub id: UserId,
    pub row_status: RowStatus,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub nickname: String,
    pub open_id: String,
    pub avatar_url: String,
    pub user_setting_list: Option<Vec<UserSettingEntry>>,
}

/// Client-side user. Timestamps are in milliseconds.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub row_status: RowStatus,
    pub created_ts: i64,
    pub updated_ts: i64,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub nickname: String,
    pub open_id: String,
    pub avatar_url: String,
    #[serde(default)]
    pub user_setting_list: Vec<UserSettingEntry>,
    pub setting: Setting,
    pub local_setting: LocalSetting,
}

impl User {
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.created_ts)
    }

    pub fn updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.updated_ts)
    }

    /// Resource name used by the v2 user API.
    pub fn resource_name(&self) -> String {
        format!("users/{}", self.id)
    }
}
