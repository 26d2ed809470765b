//! Request DTOs with garde validation.
//!
//! Validation runs before anything is sent to the remote service.

use garde::Validate;
use serde::{Deserialize, Serialize};

use super::user::{Role, RowStatus, UserId};

/// Validation constants
const MAX_SETTING_KEY_LENGTH: usize = 64;
const MAX_USERNAME_LENGTH: usize = 32;
const MAX_NICKNAME_LENGTH: usize = 64;
const MAX_EMAIL_LENGTH: usize = 256;
const MAX_AVATAR_URL_LENGTH: usize = 2048;

/// Fields of a user that an update mask may name.
pub const USER_UPDATE_FIELDS: [&str; 7] = [
    "username",
    "nickname",
    "email",
    "avatar_url",
    "password",
    "role",
    "row_status",
];

/// Id of a `users/<id>` resource name. Only plain decimal digits are
/// accepted, so the name stays a single path segment.
pub fn parse_user_name(name: &str) -> Option<UserId> {
    let id = name.strip_prefix("users/")?;
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    id.parse().ok()
}

fn validate_user_name(value: &str, _ctx: &()) -> garde::Result {
    match parse_user_name(value) {
        Some(_) => Ok(()),
        None => Err(garde::Error::new("Invalid user resource name")),
    }
}

fn validate_update_mask(value: &Vec<String>, _ctx: &()) -> garde::Result {
    match value
        .iter()
        .find(|field| !USER_UPDATE_FIELDS.contains(&field.as_str()))
    {
        Some(field) => Err(garde::Error::new(format!(
            "Unknown update mask field '{}'",
            field
        ))),
        None => Ok(()),
    }
}

/// Body of the user setting upsert call. `value` is JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[garde(context(()))]
pub struct UpsertUserSetting {
    #[garde(length(min = 1, max = MAX_SETTING_KEY_LENGTH))]
    pub key: String,
    #[garde(skip)]
    pub value: String,
}

/// Partial user sent with an update. Only fields named in the update mask
/// are meant to change; the rest may be left empty. The target user is
/// identified by `name` alone.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(context(()))]
pub struct UserPatch {
    #[garde(custom(validate_user_name))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(length(min = 1, max = MAX_USERNAME_LENGTH))]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(length(max = MAX_EMAIL_LENGTH))]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(length(max = MAX_NICKNAME_LENGTH))]
    pub nickname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(length(max = MAX_AVATAR_URL_LENGTH))]
    pub avatar_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[garde(skip)]
    pub row_status: Option<RowStatus>,
}

impl UserPatch {
    pub fn new(id: UserId) -> Self {
        Self {
            name: format!("users/{}", id),
            ..Default::default()
        }
    }

    /// Id taken from `name`, if it is a valid user resource name.
    pub fn id(&self) -> Option<UserId> {
        parse_user_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[garde(context(()))]
pub struct UpdateUserRequest {
    #[garde(dive)]
    pub user: UserPatch,
    #[garde(length(min = 1), custom(validate_update_mask))]
    pub update_mask: Vec<String>,
}

/// Target of a user deletion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[garde(context(()))]
pub struct DeleteUserRequest {
    #[garde(custom(validate_user_name))]
    pub name: String,
}

/// Helper trait to convert garde validation errors to String
pub trait ValidateExt {
    fn validate_input(&self) -> Result<(), String>;
}

impl<T: Validate<Context = ()>> ValidateExt for T {
    fn validate_input(&self) -> Result<(), String> {
        self.validate().map_err(|e| e.to_string())
    }
}
