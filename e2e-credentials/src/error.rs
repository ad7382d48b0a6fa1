//! Error types for the credential providers
//!
//! - `ApiError`: failure reported by the managed-instance API (code + message)
//! - `SsmError`: activation and deregistration failures of the SSM provider
//! - `ConfigError`: provider configuration loading
//! - `NodeConfigError`: node configuration rendering/parsing
//! - `CredentialError`: umbrella returned by `CredentialProvider`

use std::path::PathBuf;
use std::time::Duration;

/// Error returned by the managed-instance API
///
/// `code` is the service error code (`ValidationException`, `ThrottlingException`...)
/// when the service provided one. Retry classification only looks at the code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}{}", code_prefix(.code), .message)]
pub struct ApiError {
    pub code: Option<String>,
    pub message: String,
}

impl ApiError {
    pub fn new<S: Into<String>>(message: S) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code<C: Into<String>, S: Into<String>>(code: C, message: S) -> Self {
        Self {
            code: Some(code.into()),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }
}

fn code_prefix(code: &Option<String>) -> String {
    code.as_deref()
        .map(|code| format!("{}: ", code))
        .unwrap_or_default()
}

/// Cause of a failed activation, before the node context is attached
#[derive(Debug, thiserror::Error)]
pub enum ActivationError {
    #[error("creating SSM activation: {0}")]
    Api(#[source] ApiError),
    #[error("SSM activation response is missing {0}")]
    MissingField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum SsmError {
    #[error("failed to create SSM activation for node {node}: {source}")]
    CreateActivation {
        node: String,
        #[source]
        source: ActivationError,
    },
    #[error("failed to describe instance information {instance_id}: {source}")]
    DescribeInstance {
        instance_id: String,
        #[source]
        source: ApiError,
    },
    #[error("timed out waiting for instance to unregister: {instance_id} (after {timeout:?})")]
    DeregistrationTimeout {
        instance_id: String,
        timeout: Duration,
    },
    #[error("deregistration poller for {instance_id} stopped without reporting")]
    PollerStopped { instance_id: String },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum NodeConfigError {
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors surfaced through the `CredentialProvider` interface
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    #[error(transparent)]
    Ssm(#[from] SsmError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    NodeConfig(#[from] NodeConfigError),
}
