use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::UserService;
use crate::error::ServiceError;
use crate::models::{
    DeleteUserRequest, SystemStatus, UpdateUserRequest, UpsertUserSetting, UserId, UserRecord,
};

const USER_AGENT: &str = concat!("memos-session/", env!("CARGO_PKG_VERSION"));
/// Longest error body carried into a [`ServiceError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// [`UserService`] over the memos HTTP JSON API.
pub struct HttpUserService {
    client: reqwest::Client,
    base_url: Url,
    access_token: Option<String>,
}

impl HttpUserService {
    pub fn new(
        base_url: Url,
        access_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ServiceError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'
        let mut base_url = base_url;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            client,
            base_url,
            access_token,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ServiceError> {
        let url = self.base_url.join(path)?;
        debug!(%method, %url, "Calling user service");
        let builder = self.client.request(method, url);
        Ok(match &self.access_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ServiceError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let path = response.url().path().to_string();
        let mut message = response.text().await.unwrap_or_default();
        if message.len() > MAX_ERROR_BODY {
            let mut cut = MAX_ERROR_BODY;
            while !message.is_char_boundary(cut) {
                cut -= 1;
            }
            message.truncate(cut);
        }

        if status == StatusCode::NOT_FOUND {
            return Err(ServiceError::NotFound(path));
        }
        Err(ServiceError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn send_json<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ServiceError> {
        let response = self.send(builder).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl UserService for HttpUserService {
    async fn get_system_status(&self) -> Result<SystemStatus, ServiceError> {
        let builder = self.request(Method::GET, "api/v1/status")?;
        self.send_json(builder).await
    }

    async fn get_user_by_id(&self, id: UserId) -> Result<UserRecord, ServiceError> {
        let builder = self.request(Method::GET, &format!("api/v1/user/{}", id))?;
        self.send_json(builder).await
    }

    async fn sign_out(&self) -> Result<(), ServiceError> {
        let builder = self.request(Method::POST, "api/v1/auth/signout")?;
        self.send(builder).await?;
        Ok(())
    }

    async fn upsert_user_setting(&self, request: UpsertUserSetting) -> Result<(), ServiceError> {
        let builder = self.request(Method::POST, "api/v1/user/setting")?.json(&request);
        self.send(builder).await?;
        Ok(())
    }

    async fn update_user(&self, request: UpdateUserRequest) -> Result<(), ServiceError> {
        let path = format!("api/v2/{}", request.user.name);
        let builder = self.request(Method::PATCH, &path)?.json(&request);
        self.send(builder).await?;
        Ok(())
    }

    async fn delete_user(&self, request: DeleteUserRequest) -> Result<(), ServiceError> {
        let builder = self.request(Method::DELETE, &format!("api/v2/{}", request.name))?;
        self.send(builder).await?;
        Ok(())
    }
}
