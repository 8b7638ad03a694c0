//! The five-stage conversion: bucket, role, upload, import, monitor.
//!
//! Each stage returns on the first error; nothing created by an earlier
//! stage is rolled back.

mod bucket;
mod import;
mod monitor;
mod report;
mod role;
mod upload;

#[cfg(test)]
pub(crate) mod fake;

use std::path::{Path, PathBuf};

use tracing::info;

use crate::cloud::{AccessControl, CloudError, ImageImport, ImportTask, ObjectStorage};
use crate::config::{ConfigError, RunConfig, Settings};

pub use report::{image_id, write_summary};

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("OVA file not found at '{}'", .0.display())]
    InputNotFound(PathBuf),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("error creating S3 bucket '{bucket}'")]
    Bucket {
        bucket: String,
        #[source]
        source: CloudError,
    },
    #[error("error creating IAM role '{role}' or its policy")]
    Role {
        role: String,
        #[source]
        source: CloudError,
    },
    #[error("error uploading '{}' to S3", path.display())]
    Upload {
        path: PathBuf,
        #[source]
        source: CloudError,
    },
    #[error("error initiating import task")]
    Submit(#[source] CloudError),
    #[error("error monitoring import task {task_id}")]
    Monitor {
        task_id: String,
        #[source]
        source: CloudError,
    },
    #[error("import task {task_id} ended with status '{status}': {message}")]
    TaskFailed {
        task_id: String,
        status: String,
        message: String,
    },
    #[error("import task {0} completed without an image id")]
    MissingImageId(String),
}

/// Fails unless `path` names an existing regular file. Runs before any
/// client is built.
pub fn ensure_input(path: &Path) -> Result<(), PipelineError> {
    if path.is_file() {
        Ok(())
    } else {
        Err(PipelineError::InputNotFound(path.to_path_buf()))
    }
}

pub struct Pipeline<'a, S, A, I> {
    settings: &'a Settings,
    region: &'a str,
    storage: &'a S,
    access: &'a A,
    images: &'a I,
}

impl<'a, S, A, I> Pipeline<'a, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    pub fn new(
        settings: &'a Settings,
        region: &'a str,
        storage: &'a S,
        access: &'a A,
        images: &'a I,
    ) -> Self {
        Self {
            settings,
            region,
            storage,
            access,
            images,
        }
    }

    /// Run every stage in order and return the terminal task snapshot.
    pub async fn run(&self, run: &RunConfig) -> Result<ImportTask, PipelineError> {
        info!(input = %run.input().display(), bucket = run.bucket(), "starting OVA to AMI conversion");

        self.provision_bucket(run.bucket()).await?;
        self.provision_role(run.bucket()).await?;
        let key = self.upload(run.bucket(), run.input()).await?;
        let task_id = self.start_import(run.bucket(), &key, run.description()).await?;
        self.monitor(&task_id).await
    }
}
