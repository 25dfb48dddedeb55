use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CACHE_CONTROL};
use thiserror::Error;

use crate::models::{CreateUserForm, UpdateUserForm, UserRecord};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("gateway returned {status}: {message}")]
    Upstream { status: u16, message: String },
}

/// Boundary to the remote directory service. The service owns the
/// authoritative record set; everything here is fetch-and-relay.
#[async_trait]
pub trait DirectoryGateway: Send + Sync {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, GatewayError>;
    async fn create_user(&self, user: &CreateUserForm) -> Result<UserRecord, GatewayError>;
    async fn update_user(&self, update: &UpdateUserForm) -> Result<UserRecord, GatewayError>;
    async fn delete_user(&self, username: &str) -> Result<(), GatewayError>;
    async fn fetch_ous(&self) -> Result<Vec<String>, GatewayError>;
    async fn fetch_groups(&self) -> Result<Vec<String>, GatewayError>;
}

pub struct HttpDirectoryGateway {
    base_url: String,
    client: reqwest::Client,
}

impl HttpDirectoryGateway {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GatewayError> {
        let mut headers = HeaderMap::new();
        // Reads must always hit the upstream directory, never a cache.
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Turn a non-2xx answer into an Upstream error, extracting the
    /// `{error}` body the directory service sends when it can.
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = match response.json::<serde_json::Value>().await {
            Ok(body) => body
                .get("error")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| "Unexpected response from directory service".to_string()),
            Err(_) => "Unexpected response from directory service".to_string(),
        };

        Err(GatewayError::Upstream {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl DirectoryGateway for HttpDirectoryGateway {
    async fn fetch_users(&self) -> Result<Vec<UserRecord>, GatewayError> {
        let response = self.client.get(self.url("/users")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn create_user(&self, user: &CreateUserForm) -> Result<UserRecord, GatewayError> {
        let response = self
            .client
            .post(self.url("/users"))
            .json(user)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn update_user(&self, update: &UpdateUserForm) -> Result<UserRecord, GatewayError> {
        let response = self
            .client
            .put(self.url("/users"))
            .json(update)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn delete_user(&self, username: &str) -> Result<(), GatewayError> {
        let response = self
            .client
            .delete(self.url(&format!("/users/{}", username)))
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    async fn fetch_ous(&self) -> Result<Vec<String>, GatewayError> {
        let response = self.client.get(self.url("/ous")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn fetch_groups(&self) -> Result<Vec<String>, GatewayError> {
        let response = self.client.get(self.url("/groups")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}
