use tracing::info;

use super::{Pipeline, PipelineError};
use crate::cloud::{AccessControl, BucketCreation, ImageImport, ObjectStorage};

impl<S, A, I> Pipeline<'_, S, A, I>
where
    S: ObjectStorage,
    A: AccessControl,
    I: ImageImport,
{
    pub(crate) async fn provision_bucket(&self, bucket: &str) -> Result<BucketCreation, PipelineError> {
        info!(bucket, region = self.region, "creating S3 bucket");

        let creation = self
            .storage
            .create_bucket(bucket, self.region)
            .await
            .map_err(|source| PipelineError::Bucket {
                bucket: bucket.to_string(),
                source,
            })?;

        match creation {
            BucketCreation::Created => info!(bucket, "created S3 bucket"),
            BucketCreation::AlreadyOwned => {
                info!(bucket, "bucket already exists and is owned by you, proceeding")
            }
        }
        Ok(creation)
    }
}
