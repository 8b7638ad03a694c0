pub mod aws;
mod models;
pub mod policy;

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

pub use models::{BucketCreation, ImportRequest, ImportTask, TaskStatus};

/// Object storage: bucket creation and file upload.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Create `bucket` in `region`. A bucket we already own is not an error.
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation, CloudError>;

    /// Stream the file at `path` into `bucket` under `key`.
    async fn upload_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), CloudError>;
}

/// Identity and access management for the import service role.
#[async_trait]
pub trait AccessControl: Send + Sync {
    async fn role_exists(&self, role: &str) -> Result<bool, CloudError>;

    async fn create_role(&self, role: &str, trust_policy: &str) -> Result<(), CloudError>;

    async fn put_role_policy(
        &self,
        role: &str,
        policy_name: &str,
        document: &str,
    ) -> Result<(), CloudError>;

    /// Block until `role` is visible, checking up to `attempts` times with
    /// `delay` between checks. IAM is eventually consistent, so a freshly
    /// created role may not be readable right away.
    async fn wait_for_role(
        &self,
        role: &str,
        attempts: u32,
        delay: Duration,
    ) -> Result<(), CloudError> {
        for attempt in 1..=attempts {
            if self.role_exists(role).await? {
                return Ok(());
            }
            debug!(role, attempt, "role not visible yet");
            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }
        Err(CloudError::Timeout {
            what: format!("role '{role}' to become visible"),
            attempts,
        })
    }
}

/// Compute-side image import.
#[async_trait]
pub trait ImageImport: Send + Sync {
    /// Submit the import and return the provider's task id.
    async fn start_import(&self, request: &ImportRequest) -> Result<String, CloudError>;

    async fn describe_import(&self, task_id: &str) -> Result<ImportTask, CloudError>;
}

#[derive(thiserror::Error, Debug)]
pub enum CloudError {
    #[error("{operation} failed: {message}")]
    Service {
        operation: &'static str,
        message: String,
    },
    #[error("{operation} returned an unexpected response: {detail}")]
    UnexpectedResponse {
        operation: &'static str,
        detail: String,
    },
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("timed out after {attempts} attempts waiting for {what}")]
    Timeout { what: String, attempts: u32 },
    #[error("failed to encode policy document: {0}")]
    Policy(#[from] serde_json::Error),
    #[error("no AWS region configured; set AWS_REGION or the `region` setting")]
    MissingRegion,
}

impl CloudError {
    pub(crate) fn service(operation: &'static str, message: impl Display) -> Self {
        CloudError::Service {
            operation,
            message: message.to_string(),
        }
    }

    pub(crate) fn unexpected(operation: &'static str, detail: impl Into<String>) -> Self {
        CloudError::UnexpectedResponse {
            operation,
            detail: detail.into(),
        }
    }

    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        CloudError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
