pub mod input;
mod setting;
mod system;
mod user;

pub use input::{DeleteUserRequest, UpdateUserRequest, UpsertUserSetting, UserPatch};
pub use setting::{Appearance, LocalSetting, Setting, SettingDefaults, Visibility};
pub use system::{CustomizedProfile, SystemStatus};
pub use user::{Role, RowStatus, User, UserId, UserRecord, UserSettingEntry};
