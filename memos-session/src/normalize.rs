//! Settings normalizer: raw server record + system profile + persisted local
//! setting in, client-ready [`User`] out.

use tracing::trace;

use crate::error::NormalizeError;
use crate::models::{
    CustomizedProfile, LocalSetting, Setting, SettingDefaults, User, UserId, UserRecord,
};
use crate::utils::casing::to_camel_case;

const MILLIS_PER_SECOND: i64 = 1000;

fn seconds_to_millis(user_id: UserId, field: &'static str, value: i64) -> Result<i64, NormalizeError> {
    value
        .checked_mul(MILLIS_PER_SECOND)
        .ok_or(NormalizeError::TimestampOverflow {
            user_id,
            field,
            value,
        })
}

/// Merge every settings source into `raw` and convert its timestamps.
///
/// Precedence for `setting`: `defaults` < `profile` (locale, appearance) <
/// the record's own setting list. `local_setting` is the persisted value, or
/// the default when nothing was persisted.
pub fn normalize(
    raw: UserRecord,
    profile: &CustomizedProfile,
    persisted_local: Option<LocalSetting>,
    defaults: &SettingDefaults,
) -> Result<User, NormalizeError> {
    let mut setting = Setting::from_defaults(defaults);
    if let Some(locale) = &profile.locale {
        setting.locale = locale.clone();
    }
    if let Some(appearance) = profile.appearance {
        setting.appearance = appearance;
    }

    let local_setting = persisted_local.unwrap_or_default();

    let user_setting_list = raw.user_setting_list.unwrap_or_default();
    for entry in &user_setting_list {
        let field = to_camel_case(&entry.key);
        serde_json::from_str(&entry.value)
            .and_then(|value| setting.apply(&field, value))
            .map_err(|source| NormalizeError::InvalidSetting {
                key: entry.key.clone(),
                source,
            })?;
        trace!(user_id = raw.id, key = %entry.key, field = %field, "Applied user setting");
    }

    Ok(User {
        id: raw.id,
        row_status: raw.row_status,
        created_ts: seconds_to_millis(raw.id, "createdTs", raw.created_ts)?,
        updated_ts: seconds_to_millis(raw.id, "updatedTs", raw.updated_ts)?,
        username: raw.username,
        role: raw.role,
        email: raw.email,
        nickname: raw.nickname,
        open_id: raw.open_id,
        avatar_url: raw.avatar_url,
        user_setting_list,
        setting,
        local_setting,
    })
}
