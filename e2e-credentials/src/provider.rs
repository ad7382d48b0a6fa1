//! Credential providers used by the e2e harness to register nodes
//!
//! A provider is identified by its `CredentialProviderName` and knows how to
//! produce the node configuration for a node, which files the node needs,
//! and how to verify that uninstall removed the node's registration.

use crate::error::CredentialError;
use crate::node::{NodeFile, NodeSpec};
use crate::node_config::NodeConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CredentialProviderName {
    #[serde(rename = "ssm")]
    Ssm,
    #[serde(rename = "iam-ra")]
    IamRolesAnywhere,
}

impl CredentialProviderName {
    pub fn as_str(&self) -> &'static str {
        match self {
            CredentialProviderName::Ssm => "ssm",
            CredentialProviderName::IamRolesAnywhere => "iam-ra",
        }
    }
}

impl fmt::Display for CredentialProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown credential provider: {0}")]
pub struct UnknownProvider(pub String);

impl FromStr for CredentialProviderName {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ssm" => Ok(CredentialProviderName::Ssm),
            "iam-ra" => Ok(CredentialProviderName::IamRolesAnywhere),
            other => Err(UnknownProvider(other.to_string())),
        }
    }
}

/// True if the given provider name is SSM
pub fn is_ssm(name: CredentialProviderName) -> bool {
    name == CredentialProviderName::Ssm
}

pub trait CredentialProvider {
    fn name(&self) -> CredentialProviderName;

    /// Node configuration carrying this provider's credentials for `node`
    fn node_config(
        &self,
        node: &NodeSpec,
    ) -> impl Future<Output = Result<NodeConfig, CredentialError>> + Send;

    /// Confirm the node's registration is gone after uninstall
    fn verify_uninstall(
        &self,
        instance_id: &str,
    ) -> impl Future<Output = Result<(), CredentialError>> + Send;

    fn files_for_node(&self, node: &NodeSpec) -> Result<Vec<NodeFile>, CredentialError>;
}
