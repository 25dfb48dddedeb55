use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::gateway::DirectoryGateway;
use crate::models::{BatchFailure, BatchReport, ServiceError, UpdateUserForm};
use crate::services::store::RecordStore;

#[derive(Debug, Clone)]
pub enum BatchOperation {
    Delete,
    ResetPassword(String),
}

impl BatchOperation {
    pub fn parse(operation: &str, password: Option<String>) -> Result<Self, ServiceError> {
        match operation {
            "delete" => Ok(Self::Delete),
            "resetPassword" => {
                let password = password.ok_or_else(|| {
                    ServiceError::ValidationError("A new password is required".to_string())
                })?;
                Ok(Self::ResetPassword(password))
            }
            other => Err(ServiceError::ValidationError(format!(
                "Unknown batch operation: {}",
                other
            ))),
        }
    }
}

/// Minimum 8 characters with at least one uppercase letter, one lowercase
/// letter and one digit.
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.chars().count() < 8 {
        return Err("Password must be at least 8 characters long".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err("Password must contain an uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err("Password must contain a lowercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err("Password must contain a digit".to_string());
    }
    Ok(())
}

/// Applies one operation across a set of selected records, one gateway
/// call per record, accounting every outcome. A single in-flight flag is
/// the only mutual-exclusion device; there are no per-record locks.
pub struct BatchRunner {
    gateway: Arc<dyn DirectoryGateway>,
    store: Arc<RecordStore>,
    in_flight: AtomicBool,
}

struct InFlightGuard<'a>(&'a AtomicBool);

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl BatchRunner {
    pub fn new(gateway: Arc<dyn DirectoryGateway>, store: Arc<RecordStore>) -> Self {
        Self {
            gateway,
            store,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn acquire(&self) -> Result<InFlightGuard<'_>, ServiceError> {
        if self
            .in_flight
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(ServiceError::BatchInFlight);
        }
        Ok(InFlightGuard(&self.in_flight))
    }

    /// Run one operation over the given usernames. A failed record never
    /// aborts the batch; the aggregate is returned only after every
    /// attempt, and a forced refresh afterwards re-syncs the view with the
    /// gateway's authoritative state.
    pub async fn run(
        &self,
        operation: BatchOperation,
        usernames: &[String],
    ) -> Result<BatchReport, ServiceError> {
        if usernames.is_empty() {
            return Err(ServiceError::ValidationError("No rows selected".to_string()));
        }
        if let BatchOperation::ResetPassword(password) = &operation {
            // Rejected locally, before any remote call goes out.
            validate_password(password).map_err(ServiceError::ValidationError)?;
        }

        let _guard = self.acquire()?;

        let mut report = BatchReport {
            attempted: usernames.len(),
            succeeded: Vec::new(),
            failed: Vec::new(),
        };

        for username in usernames {
            let outcome = match &operation {
                BatchOperation::Delete => self.gateway.delete_user(username).await,
                BatchOperation::ResetPassword(password) => self
                    .gateway
                    .update_user(&UpdateUserForm::password_reset(username, password))
                    .await
                    .map(|_| ()),
            };
            match outcome {
                Ok(()) => report.succeeded.push(username.clone()),
                Err(e) => report.failed.push(BatchFailure {
                    username: username.clone(),
                    reason: e.to_string(),
                }),
            }
        }

        tracing::info!(
            attempted = report.attempted,
            failed = report.failed.len(),
            "batch operation finished"
        );

        if let Err(e) = self.store.refresh(true).await {
            tracing::warn!("record refresh after batch failed: {}", e);
        }

        Ok(report)
    }
}
