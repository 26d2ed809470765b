use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Appearance {
    System,
    #[default]
    Light,
    Dark,
}

impl std::str::FromStr for Appearance {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "system" => Ok(Self::System),
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown appearance '{}'", other)),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Visibility {
    #[default]
    Private,
    Protected,
    Public,
}

/// Built-in defaults that seed every normalized [`Setting`].
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDefaults {
    pub locale: String,
    /// Colour scheme of the host system, used until a profile or the user says otherwise.
    pub appearance: Appearance,
}

impl Default for SettingDefaults {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            appearance: Appearance::Light,
        }
    }
}

/// Server-synchronized preferences.
///
/// Known fields are typed; any other key the server stores lands in `extra`
/// under its camel-cased name.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Setting {
    pub locale: String,
    pub appearance: Appearance,
    pub memo_visibility: Visibility,
    pub telegram_user_id: String,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Setting {
    pub fn from_defaults(defaults: &SettingDefaults) -> Self {
        Self {
            locale: defaults.locale.clone(),
            appearance: defaults.appearance,
            memo_visibility: Visibility::Private,
            telegram_user_id: String::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Assign a decoded value to the field named `field` (camelCase).
    pub fn apply(&mut self, field: &str, value: Value) -> Result<(), serde_json::Error> {
        match field {
            "locale" => self.locale = serde_json::from_value(value)?,
            "appearance" => self.appearance = serde_json::from_value(value)?,
            "memoVisibility" => self.memo_visibility = serde_json::from_value(value)?,
            "telegramUserId" => self.telegram_user_id = serde_json::from_value(value)?,
            _ => {
                self.extra.insert(field.to_string(), value);
            }
        }
        Ok(())
    }

    pub fn get(&self, field: &str) -> Option<Value> {
        match field {
            "locale" => Some(Value::from(self.locale.clone())),
            "appearance" => serde_json::to_value(self.appearance).ok(),
            "memoVisibility" => serde_json::to_value(self.memo_visibility).ok(),
            "telegramUserId" => Some(Value::from(self.telegram_user_id.clone())),
            _ => self.extra.get(field).cloned(),
        }
    }
}

/// Device-only preferences, persisted under `localSetting`.
///
/// Every field falls back to its default when missing from the persisted
/// object, so deserializing a partial object overlays it on the defaults.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct LocalSetting {
    pub enable_double_click_editing: bool,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}
