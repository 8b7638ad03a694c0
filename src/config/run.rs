use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::ConfigError;
use crate::helpers::base_name;

/// S3 bucket naming rules, minus the checks regex can't express (no `..`).
const BUCKET_NAME_PATTERN: &str = r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$";

/// Per-run values, fixed before the first cloud call.
#[derive(Debug, Clone)]
pub struct RunConfig {
    input: PathBuf,
    bucket: String,
    description: String,
}

impl RunConfig {
    /// Build the run from the input path with a fresh bucket name.
    pub fn new(input: impl Into<PathBuf>, bucket_prefix: &str) -> Result<Self, ConfigError> {
        let bucket = bucket_name(bucket_prefix, Utc::now(), Uuid::new_v4());
        Self::with_bucket(input, bucket)
    }

    pub fn with_bucket(input: impl Into<PathBuf>, bucket: String) -> Result<Self, ConfigError> {
        let input = input.into();
        if !is_valid_bucket_name(&bucket) {
            return Err(ConfigError::InvalidBucketName(bucket));
        }
        let file_name = base_name(&input).ok_or_else(|| ConfigError::NoFileName(input.clone()))?;

        Ok(Self {
            description: format!("AMI created from {file_name}"),
            input,
            bucket,
        })
    }

    pub fn input(&self) -> &Path {
        &self.input
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// `<prefix>-<unix seconds>-<8 hex chars>`.
pub fn bucket_name(prefix: &str, now: DateTime<Utc>, salt: Uuid) -> String {
    let salt = salt.simple().to_string();
    format!("{prefix}-{}-{}", now.timestamp(), &salt[..8])
}

pub fn is_valid_bucket_name(name: &str) -> bool {
    !name.contains("..")
        && Regex::new(BUCKET_NAME_PATTERN).is_ok_and(|re| re.is_match(name))
}
