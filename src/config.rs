//! Runtime configuration.
//!
//! Values are resolved once at startup: explicitly set values win over the
//! process environment, then a `.env` file, then the built-in defaults.

use crate::error::{DocketStatsError, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// File read for variables missing from the process environment
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Environment variable holding the regulations.gov API key
pub const API_KEY_VAR: &str = "API_KEY";
/// Environment variable overriding the record API base URL
pub const API_URL_VAR: &str = "DOCKET_STATS_API_URL";
/// Environment variable overriding the archive bucket
pub const BUCKET_VAR: &str = "DOCKET_STATS_BUCKET";
/// Environment variable pointing at an S3-compatible endpoint (LocalStack, MinIO)
pub const S3_ENDPOINT_VAR: &str = "DOCKET_STATS_S3_ENDPOINT";
/// Environment variable for the bucket region
pub const REGION_VAR: &str = "AWS_REGION";
/// Environment variable for the HTTP request timeout in seconds
pub const TIMEOUT_VAR: &str = "DOCKET_STATS_TIMEOUT_SECS";

/// Default regulations.gov v4 API base URL
pub const DEFAULT_API_URL: &str = "https://api.regulations.gov/v4";
/// Public bucket holding the mirrulations archive
pub const DEFAULT_BUCKET: &str = "mirrulations";
/// Region of the public archive bucket
pub const DEFAULT_REGION: &str = "us-east-1";
/// Default HTTP request timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resolved configuration for one run.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    /// regulations.gov API key, sent as the `api_key` query parameter
    pub api_key: String,
    pub api_base_url: String,
    pub bucket: String,
    pub region: String,
    /// Custom S3 endpoint; enables path-style addressing
    pub s3_endpoint: Option<String>,
    pub request_timeout_secs: u64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("bucket", &self.bucket)
            .field("region", &self.region)
            .field("s3_endpoint", &self.s3_endpoint)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

impl Config {
    /// Start building a configuration.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve a configuration from the process environment and `./.env`.
    pub fn from_env() -> Result<Self> {
        Self::builder().build_from_env()
    }
}

/// Builder for [`Config`]. Unset fields fall back to the environment, then
/// to the env file, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    api_key: Option<String>,
    api_base_url: Option<String>,
    bucket: Option<String>,
    region: Option<String>,
    s3_endpoint: Option<String>,
    request_timeout_secs: Option<u64>,
    env_file: Option<PathBuf>,
}

impl ConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Set the record API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Set the archive bucket name.
    pub fn bucket(mut self, bucket: impl Into<String>) -> Self {
        self.bucket = Some(bucket.into());
        self
    }

    /// Set the bucket region.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Set a custom S3 endpoint URL.
    pub fn s3_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.s3_endpoint = Some(endpoint.into());
        self
    }

    /// Set the HTTP request timeout in seconds.
    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = Some(secs);
        self
    }

    /// Read fallback variables from `path` instead of `./.env`.
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Resolve against the process environment and `./.env` (or the file set
    /// with [`ConfigBuilder::env_file`]).
    pub fn build_from_env(mut self) -> Result<Config> {
        if self.env_file.is_none() {
            self.env_file = Some(PathBuf::from(DEFAULT_ENV_FILE));
        }
        self.build_with(|name| std::env::var(name).ok())
    }

    /// Resolve against an arbitrary variable lookup.
    ///
    /// Variables the lookup lacks are taken from the env file, if one was set
    /// and exists. Empty variables count as unset.
    pub fn build_with<F>(self, lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        let file_vars = match &self.env_file {
            Some(path) => read_env_file(path)?,
            None => HashMap::new(),
        };
        let var = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .or_else(|| file_vars.get(name).cloned())
                .filter(|value| !value.trim().is_empty())
        };

        let api_key = self
            .api_key
            .filter(|key| !key.trim().is_empty())
            .or_else(|| var(API_KEY_VAR))
            .ok_or_else(|| {
                DocketStatsError::Config(format!(
                    "{API_KEY_VAR} not found in environment or .env file."
                ))
            })?;

        let request_timeout_secs = match self.request_timeout_secs {
            Some(secs) => secs,
            None => match var(TIMEOUT_VAR) {
                Some(raw) => raw.trim().parse().map_err(|_| {
                    DocketStatsError::Config(format!(
                        "{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
                    ))
                })?,
                None => DEFAULT_TIMEOUT_SECS,
            },
        };
        if request_timeout_secs == 0 {
            return Err(DocketStatsError::Config(
                "request timeout must be at least one second".to_string(),
            ));
        }

        let api_base_url = self
            .api_base_url
            .or_else(|| var(API_URL_VAR))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            api_key,
            api_base_url,
            bucket: self
                .bucket
                .or_else(|| var(BUCKET_VAR))
                .unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            region: self
                .region
                .or_else(|| var(REGION_VAR))
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            s3_endpoint: self.s3_endpoint.or_else(|| var(S3_ENDPOINT_VAR)),
            request_timeout_secs,
        })
    }
}

/// Parse a dotenv file without touching the process environment.
///
/// A missing file yields no variables.
fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let iter = match dotenvy::from_path_iter(path) {
        Ok(iter) => iter,
        Err(e) if e.not_found() => return Ok(HashMap::new()),
        Err(e) => {
            return Err(DocketStatsError::Config(format!(
                "cannot read {}: {e}",
                path.display()
            )))
        }
    };

    iter.map(|item| {
        item.map_err(|e| DocketStatsError::Config(format!("invalid {}: {e}", path.display())))
    })
    .collect()
}
