//! Hybrid E2E Credentials - credential providers for hybrid-node end-to-end tests
//!
//! The e2e harness asks a provider for the node configuration of each node it
//! bootstraps, and after uninstall asks it to confirm the node is gone:
//! - `CredentialProvider`: named provider interface (`ssm`, `iam-ra`)
//! - `ssm::SsmProvider`: SSM hybrid activations + deregistration check
//! - `NodeConfig`: node configuration document filled by providers
//! - `SsmProviderConfig`: role prefix, tags, retry and polling settings

pub mod config;
pub mod error;
pub mod node;
pub mod node_config;
pub mod provider;
pub mod retry;
pub mod ssm;

pub use config::{DeregistrationConfig, RetryConfig, SsmProviderConfig};
pub use error::{ActivationError, ApiError, ConfigError, CredentialError, NodeConfigError, SsmError};
pub use node::{ClusterSpec, NodeFile, NodeSpec};
pub use node_config::NodeConfig;
pub use provider::{is_ssm, CredentialProvider, CredentialProviderName};
pub use retry::RetryPolicy;
pub use ssm::{Activation, SsmProvider};
