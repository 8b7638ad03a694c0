use std::path::Path;

use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::{ByteStream, Length};
use aws_sdk_s3::types::{
    BucketLocationConstraint, CompletedMultipartUpload, CompletedPart, CreateBucketConfiguration,
};
use indicatif::ProgressBar;
use tracing::{debug, warn};

use crate::cloud::{BucketCreation, CloudError, ObjectStorage};
use crate::helpers::progress::upload_bar;

/// The one region where `CreateBucket` must not carry a location constraint.
const DEFAULT_REGION: &str = "us-east-1";
const MAX_PARTS: u64 = 10_000;

pub struct S3Storage {
    client: Client,
    part_size: u64,
}

impl S3Storage {
    pub fn new(client: Client, part_size: u64) -> Self {
        Self { client, part_size }
    }

    async fn put_single(&self, bucket: &str, key: &str, path: &Path) -> Result<(), CloudError> {
        let body = ByteStream::from_path(path)
            .await
            .map_err(|e| CloudError::io(path, std::io::Error::other(e)))?;
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| CloudError::service("PutObject", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn put_multipart(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        bar: &ProgressBar,
    ) -> Result<(), CloudError> {
        let created = self
            .client
            .create_multipart_upload()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| CloudError::service("CreateMultipartUpload", DisplayErrorContext(&e)))?;
        let upload_id = created
            .upload_id()
            .ok_or_else(|| CloudError::unexpected("CreateMultipartUpload", "no upload id"))?
            .to_string();

        let parts = match self.put_parts(bucket, key, path, size, &upload_id, bar).await {
            Ok(parts) => parts,
            Err(err) => {
                // Stored parts persist until the upload is aborted.
                if let Err(abort) = self
                    .client
                    .abort_multipart_upload()
                    .bucket(bucket)
                    .key(key)
                    .upload_id(&upload_id)
                    .send()
                    .await
                {
                    warn!(%upload_id, "failed to abort multipart upload: {}", DisplayErrorContext(&abort));
                }
                return Err(err);
            }
        };

        self.client
            .complete_multipart_upload()
            .bucket(bucket)
            .key(key)
            .upload_id(&upload_id)
            .multipart_upload(CompletedMultipartUpload::builder().set_parts(Some(parts)).build())
            .send()
            .await
            .map_err(|e| CloudError::service("CompleteMultipartUpload", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn put_parts(
        &self,
        bucket: &str,
        key: &str,
        path: &Path,
        size: u64,
        upload_id: &str,
        bar: &ProgressBar,
    ) -> Result<Vec<CompletedPart>, CloudError> {
        let part_size = part_size_for(size, self.part_size);
        let mut parts = Vec::new();
        let mut offset = 0;
        let mut part_number: i32 = 1;

        while offset < size {
            let length = part_size.min(size - offset);
            let body = ByteStream::read_from()
                .path(path)
                .offset(offset)
                .length(Length::Exact(length))
                .build()
                .await
                .map_err(|e| CloudError::io(path, std::io::Error::other(e)))?;

            let uploaded = self
                .client
                .upload_part()
                .bucket(bucket)
                .key(key)
                .upload_id(upload_id)
                .part_number(part_number)
                .body(body)
                .send()
                .await
                .map_err(|e| CloudError::service("UploadPart", DisplayErrorContext(&e)))?;
            debug!(part_number, offset, length, "uploaded part");

            parts.push(
                CompletedPart::builder()
                    .set_e_tag(uploaded.e_tag().map(str::to_string))
                    .part_number(part_number)
                    .build(),
            );
            offset += length;
            part_number += 1;
            bar.inc(length);
        }

        Ok(parts)
    }
}

#[async_trait]
impl ObjectStorage for S3Storage {
    async fn create_bucket(&self, bucket: &str, region: &str) -> Result<BucketCreation, CloudError> {
        let result = self
            .client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(bucket_configuration(region))
            .send()
            .await;

        match result {
            Ok(_) => Ok(BucketCreation::Created),
            Err(err)
                if err
                    .as_service_error()
                    .is_some_and(|e| e.is_bucket_already_owned_by_you()) =>
            {
                Ok(BucketCreation::AlreadyOwned)
            }
            Err(err) => Err(CloudError::service("CreateBucket", DisplayErrorContext(&err))),
        }
    }

    async fn upload_object(&self, bucket: &str, key: &str, path: &Path) -> Result<(), CloudError> {
        let size = tokio::fs::metadata(path)
            .await
            .map_err(|e| CloudError::io(path, e))?
            .len();

        let bar = upload_bar(size, key);
        let result = if size <= self.part_size {
            let result = self.put_single(bucket, key, path).await;
            if result.is_ok() {
                bar.inc(size);
            }
            result
        } else {
            self.put_multipart(bucket, key, path, size, &bar).await
        };

        match &result {
            Ok(()) => bar.finish_with_message(format!("Uploaded {key} to s3://{bucket}")),
            Err(_) => bar.abandon(),
        }
        result
    }
}

fn bucket_configuration(region: &str) -> Option<CreateBucketConfiguration> {
    if region == DEFAULT_REGION {
        return None;
    }
    Some(
        CreateBucketConfiguration::builder()
            .location_constraint(BucketLocationConstraint::from(region))
            .build(),
    )
}

/// Part size for a file of `size` bytes: the configured size, grown just
/// enough to fit S3's part count limit.
fn part_size_for(size: u64, configured: u64) -> u64 {
    configured.max(size.div_ceil(MAX_PARTS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_region_has_no_location_constraint() {
        assert!(bucket_configuration("us-east-1").is_none());
    }

    #[test]
    fn other_regions_carry_their_location_constraint() {
        let config = bucket_configuration("eu-west-1").unwrap();
        assert_eq!(
            config.location_constraint(),
            Some(&BucketLocationConstraint::EuWest1)
        );
    }

    #[test]
    fn part_size_grows_past_the_part_limit() {
        let mib = 1024 * 1024;
        assert_eq!(part_size_for(100 * mib, 16 * mib), 16 * mib);

        let huge = 200 * 1024 * mib;
        let size = part_size_for(huge, 16 * mib);
        assert!(size > 16 * mib);
        assert!(huge.div_ceil(size) <= MAX_PARTS);
    }
}
