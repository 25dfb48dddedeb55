use std::sync::Arc;

use crate::gateway::DirectoryGateway;
use crate::models::{CreateUserForm, ServiceError, UpdateUserForm, UserRecord};
use crate::services::batch::validate_password;
use crate::services::store::RecordStore;

/// Single-record relay to the directory gateway, plus the ou/group
/// catalogs. Every successful write triggers a forced store refresh so the
/// view reflects authoritative state instead of a local guess.
pub struct UserService {
    gateway: Arc<dyn DirectoryGateway>,
    store: Arc<RecordStore>,
}

impl UserService {
    pub fn new(gateway: Arc<dyn DirectoryGateway>, store: Arc<RecordStore>) -> Self {
        Self { gateway, store }
    }

    /// Proxy reads always hit the upstream gateway, never a cache.
    pub async fn list(&self) -> Result<Vec<UserRecord>, ServiceError> {
        self.store.refresh(true).await
    }

    pub async fn create(&self, form: CreateUserForm) -> Result<UserRecord, ServiceError> {
        if form.username.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Username is required".to_string(),
            ));
        }
        if let Some(password) = &form.password {
            validate_password(password).map_err(ServiceError::ValidationError)?;
        }

        let created = self.gateway.create_user(&form).await?;
        tracing::info!(username = %created.username, "created directory user");
        self.refresh_after_write().await;
        Ok(created)
    }

    pub async fn update(&self, form: UpdateUserForm) -> Result<UserRecord, ServiceError> {
        if form.username.trim().is_empty() {
            return Err(ServiceError::ValidationError(
                "Username is required".to_string(),
            ));
        }
        if let Some(password) = &form.password {
            validate_password(password).map_err(ServiceError::ValidationError)?;
        }

        let updated = self.gateway.update_user(&form).await?;
        tracing::info!(username = %updated.username, "updated directory user");
        self.refresh_after_write().await;
        Ok(updated)
    }

    pub async fn delete(&self, username: &str) -> Result<String, ServiceError> {
        self.gateway.delete_user(username).await?;
        tracing::info!(username, "deleted directory user");
        self.refresh_after_write().await;
        Ok(format!("User {} deleted successfully", username))
    }

    pub async fn ous(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.gateway.fetch_ous().await?)
    }

    pub async fn groups(&self) -> Result<Vec<String>, ServiceError> {
        Ok(self.gateway.fetch_groups().await?)
    }

    /// A write already succeeded upstream; a failed refresh afterwards only
    /// leaves the cache briefly behind, so it is logged rather than surfaced.
    async fn refresh_after_write(&self) {
        if let Err(e) = self.store.refresh(true).await {
            tracing::warn!("record refresh after write failed: {}", e);
        }
    }
}
