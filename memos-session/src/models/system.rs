use serde::{Deserialize, Serialize};

use super::setting::Appearance;
use super::user::UserRecord;

/// Instance-wide branding and basic defaults set by the host.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizedProfile {
    pub name: String,
    pub logo_url: String,
    pub description: String,
    pub locale: Option<String>,
    pub appearance: Option<Appearance>,
    pub external_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemStatus {
    pub host: Option<UserRecord>,
    pub allow_sign_up: bool,
    pub disable_public_memos: bool,
    pub customized_profile: CustomizedProfile,
}
