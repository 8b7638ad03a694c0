use serde::Deserialize;
use std::time::Duration;

use super::ConfigError;

const MIB: u64 = 1024 * 1024;
/// S3 rejects multipart parts below 5 MiB (except the last) and above 5 GiB.
const MIN_PART_SIZE_MIB: u64 = 5;
const MAX_PART_SIZE_MIB: u64 = 5 * 1024;

/// Operator-tunable settings. Every field is optional in the settings file;
/// missing fields take the values VM Import documents as its defaults.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub(crate) role_name: String,
    pub(crate) policy_name: String,
    pub(crate) external_id: String,
    pub(crate) bucket_prefix: String,
    pub(crate) poll_interval_secs: u64,
    pub(crate) role_wait_attempts: u32,
    pub(crate) role_wait_delay_secs: u64,
    pub(crate) part_size_mib: u64,
    pub(crate) region: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            role_name: "vmimport".to_string(),
            policy_name: "vmimport".to_string(),
            external_id: "vmimport".to_string(),
            bucket_prefix: "ova-ami-import".to_string(),
            poll_interval_secs: 30,
            role_wait_attempts: 20,
            role_wait_delay_secs: 1,
            part_size_mib: 16,
            region: None,
        }
    }
}

impl Settings {
    pub fn role_name(&self) -> &str {
        &self.role_name
    }

    pub fn policy_name(&self) -> &str {
        &self.policy_name
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn bucket_prefix(&self) -> &str {
        &self.bucket_prefix
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn role_wait_attempts(&self) -> u32 {
        self.role_wait_attempts
    }

    pub fn role_wait_delay(&self) -> Duration {
        Duration::from_secs(self.role_wait_delay_secs)
    }

    /// Multipart part size in bytes.
    pub fn part_size(&self) -> u64 {
        self.part_size_mib * MIB
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("role_name", &self.role_name),
            ("policy_name", &self.policy_name),
            ("external_id", &self.external_id),
            ("bucket_prefix", &self.bucket_prefix),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::invalid(field, "must not be empty"));
            }
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::invalid("poll_interval_secs", "must be at least 1"));
        }
        if self.role_wait_attempts == 0 {
            return Err(ConfigError::invalid("role_wait_attempts", "must be at least 1"));
        }
        if !(MIN_PART_SIZE_MIB..=MAX_PART_SIZE_MIB).contains(&self.part_size_mib) {
            return Err(ConfigError::invalid(
                "part_size_mib",
                format!("must be between {MIN_PART_SIZE_MIB} and {MAX_PART_SIZE_MIB}"),
            ));
        }
        if self.region.as_deref().is_some_and(|r| r.trim().is_empty()) {
            return Err(ConfigError::invalid("region", "must not be empty when set"));
        }
        Ok(())
    }
}
