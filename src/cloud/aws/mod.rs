//! AWS SDK backed implementations of the cloud capabilities.

mod ec2;
mod iam;
mod s3;

pub use ec2::Ec2Import;
pub use iam::IamAccess;
pub use s3::S3Storage;

use aws_config::{BehaviorVersion, Region};
use tracing::debug;

use super::CloudError;
use crate::config::Settings;

/// One client per service, all sharing the session resolved from the
/// environment (profile, credentials chain and region).
pub struct AwsClients {
    pub storage: S3Storage,
    pub access: IamAccess,
    pub images: Ec2Import,
    pub region: String,
}

impl AwsClients {
    pub async fn from_env(settings: &Settings) -> Result<Self, CloudError> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = settings.region() {
            loader = loader.region(Region::new(region.to_string()));
        }
        let shared = loader.load().await;

        let region = shared
            .region()
            .map(|r| r.as_ref().to_string())
            .ok_or(CloudError::MissingRegion)?;
        debug!(%region, "resolved AWS session");

        Ok(Self {
            storage: S3Storage::new(aws_sdk_s3::Client::new(&shared), settings.part_size()),
            access: IamAccess::new(aws_sdk_iam::Client::new(&shared)),
            images: Ec2Import::new(aws_sdk_ec2::Client::new(&shared)),
            region,
        })
    }
}
