use std::path::Path;

use tracing::info;

use super::{Pipeline, PipelineError};
use crate::cloud::{AccessControl, ImageImport, ObjectStorage};
use crate::config::ConfigError;
use crate::helpers::base_name;

impl<S, A, I> Pipeline<'_, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    /// Upload `path` under its base name and return the object key.
    pub(crate) async fn upload(&self, bucket: &str, path: &Path) -> Result<String, PipelineError> {
        let key = base_name(path).ok_or_else(|| ConfigError::NoFileName(path.to_path_buf()))?;
        info!(key = key.as_str(), bucket, "uploading to S3");

        self.storage
            .upload_object(bucket, &key, path)
            .await
            .map_err(|source| PipelineError::Upload {
                path: path.to_path_buf(),
                source,
            })?;

        info!(key = key.as_str(), bucket, "uploaded to S3");
        Ok(key)
    }
}
