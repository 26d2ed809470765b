//! Remote user service.

mod http;

pub use http::HttpUserService;

use async_trait::async_trait;

use crate::error::ServiceError;
use crate::models::{
    DeleteUserRequest, SystemStatus, UpdateUserRequest, UpsertUserSetting, UserId, UserRecord,
};

#[async_trait]
pub trait UserService: Send + Sync {
    async fn get_system_status(&self) -> Result<SystemStatus, ServiceError>;

    async fn get_user_by_id(&self, id: UserId) -> Result<UserRecord, ServiceError>;

    async fn sign_out(&self) -> Result<(), ServiceError>;

    async fn upsert_user_setting(&self, request: UpsertUserSetting) -> Result<(), ServiceError>;

    async fn update_user(&self, request: UpdateUserRequest) -> Result<(), ServiceError>;

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), ServiceError>;
}
