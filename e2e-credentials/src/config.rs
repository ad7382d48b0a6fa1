//! Provider configuration
//!
//! Handles:
//! - IAM role path prefix and cluster tag used for activations
//! - Retry policy for `CreateActivation`
//! - Deregistration polling (interval, deadline, failure tolerance)
//!
//! Loaded from the YAML file named by `HYBRID_E2E_SSM_CONFIG` (default
//! `ssm-provider.yaml`), falling back to defaults when it does not exist.

use crate::error::ConfigError;
use crate::retry::RetryPolicy;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

pub const CONFIG_PATH_ENV: &str = "HYBRID_E2E_SSM_CONFIG";
pub const REGION_ENV: &str = "HYBRID_E2E_REGION";
const DEFAULT_CONFIG_PATH: &str = "ssm-provider.yaml";
const DEFAULT_ENV_FILE: &str = ".env";

pub const DEFAULT_ROLE_PATH_PREFIX: &str = "/hybrid-e2e/";
pub const DEFAULT_CLUSTER_TAG_KEY: &str = "Nodeadm-E2E-Tests-Cluster";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SsmProviderConfig {
    /// IAM path the test roles live under, e.g. `/hybrid-e2e/`
    pub role_path_prefix: String,
    pub cluster_tag_key: String,
    pub registration_limit: i32,
    /// Region for the SSM client; the AWS default chain applies when unset
    pub region: Option<String>,
    pub retry: RetryConfig,
    pub deregistration: DeregistrationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    pub retryable_error_codes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeregistrationConfig {
    pub poll_interval_secs: u64,
    pub timeout_secs: u64,
    pub max_consecutive_failures: u32,
}

impl Default for SsmProviderConfig {
    fn default() -> Self {
        Self {
            role_path_prefix: DEFAULT_ROLE_PATH_PREFIX.to_string(),
            cluster_tag_key: DEFAULT_CLUSTER_TAG_KEY.to_string(),
            registration_limit: 2,
            region: None,
            retry: RetryConfig::default(),
            deregistration: DeregistrationConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            max_delay_ms: 20_000,
            retryable_error_codes: vec!["ValidationException".to_string()],
        }
    }
}

impl Default for DeregistrationConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: 5,
            timeout_secs: 180,
            max_consecutive_failures: 3,
        }
    }
}

impl SsmProviderConfig {
    /// Load config from the path in `HYBRID_E2E_SSM_CONFIG` (after reading `./.env`)
    pub async fn load() -> Result<Self, ConfigError> {
        Self::load_with_env_file(DEFAULT_ENV_FILE).await
    }

    /// Same as `load`, reading variables from `env_file` first; variables
    /// already set in the process environment win over the file
    pub async fn load_with_env_file<P: AsRef<Path>>(env_file: P) -> Result<Self, ConfigError> {
        if dotenvy::from_path(env_file.as_ref()).is_ok() {
            debug!("Read environment from {}", env_file.as_ref().display());
        }

        let mut config = Self::load_from(Self::config_path()).await?;

        if let Ok(region) = std::env::var(REGION_ENV) {
            if !region.trim().is_empty() {
                config.region = Some(region);
            }
        }

        Ok(config)
    }

    /// Load config from an explicit path, defaults if the file is absent or empty
    pub async fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No provider config at {}, using defaults", path.display());
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })?;

        info!("Loaded SSM provider config from {}", path.display());
        Ok(config)
    }

    /// Role name as `CreateActivation` expects it: path prefix without the leading `/`
    pub fn iam_role(&self, role: &str) -> String {
        let prefix = self
            .role_path_prefix
            .strip_prefix('/')
            .unwrap_or(&self.role_path_prefix);
        format!("{}{}", prefix, role)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::exponential(
            self.retry.max_attempts,
            Duration::from_millis(self.retry.base_delay_ms),
        )
        .with_max_delay(Duration::from_millis(self.retry.max_delay_ms))
        .with_retryable_codes(self.retry.retryable_error_codes.iter().cloned())
    }

    pub fn config_path() -> PathBuf {
        std::env::var(CONFIG_PATH_ENV)
            .unwrap_or_else(|_| DEFAULT_CONFIG_PATH.into())
            .into()
    }
}

impl DeregistrationConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
