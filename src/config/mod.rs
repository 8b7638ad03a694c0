mod models;
mod run;

use std::{fs, path::Path, path::PathBuf};

pub use models::Settings;
pub use run::RunConfig;

/// Environment variable naming an optional JSON settings file.
pub const CONFIG_ENV: &str = "OVA_TO_AMI_CONFIG";

/// Load settings from a JSON file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
    let path = path.as_ref();
    let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_from_json_str(&data)
}

/// Load settings from a JSON string.
pub fn load_from_json_str(json: &str) -> Result<Settings, ConfigError> {
    let settings: Settings = serde_json::from_str(json)?;
    settings.validate()?;
    Ok(settings)
}

/// Load settings from the file named by `var`, or the defaults when the
/// variable is unset.
pub fn load_from_env(var: &str) -> Result<Settings, ConfigError> {
    match std::env::var_os(var) {
        Some(path) => load_from_file(PathBuf::from(path)),
        None => Ok(Settings::default()),
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading settings file '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
    #[error("'{0}' is not a valid S3 bucket name; check `bucket_prefix`")]
    InvalidBucketName(String),
    #[error("'{}' has no file name", .0.display())]
    NoFileName(PathBuf),
}

impl ConfigError {
    fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
