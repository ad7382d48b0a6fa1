//! Node configuration document read by the hybrid-node bootstrap agent
//!
//! Only the parts filled by credential providers are modelled: cluster
//! details and the `hybrid` section.

use crate::error::NodeConfigError;
use crate::node::ClusterSpec;
use crate::ssm::Activation;
use serde::{Deserialize, Serialize};

pub const NODE_CONFIG_API_VERSION: &str = "node.eks.aws/v1alpha1";
pub const NODE_CONFIG_KIND: &str = "NodeConfig";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfig {
    pub api_version: String,
    pub kind: String,
    pub spec: NodeConfigSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeConfigSpec {
    pub cluster: ClusterDetails,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hybrid: Option<HybridOptions>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterDetails {
    pub name: String,
    pub region: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HybridOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ssm: Option<SsmOptions>,
    #[serde(default)]
    pub enable_credentials_file: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsmOptions {
    pub activation_id: String,
    pub activation_code: String,
}

impl NodeConfig {
    /// Node config registering through an SSM activation, credentials file enabled
    pub fn for_ssm(cluster: &ClusterSpec, activation: &Activation) -> Self {
        Self {
            api_version: NODE_CONFIG_API_VERSION.to_string(),
            kind: NODE_CONFIG_KIND.to_string(),
            spec: NodeConfigSpec {
                cluster: ClusterDetails {
                    name: cluster.name.clone(),
                    region: cluster.region.clone(),
                },
                hybrid: Some(HybridOptions {
                    ssm: Some(SsmOptions {
                        activation_id: activation.id.clone(),
                        activation_code: activation.code.clone(),
                    }),
                    enable_credentials_file: true,
                }),
            },
        }
    }

    pub fn ssm(&self) -> Option<&SsmOptions> {
        self.spec.hybrid.as_ref().and_then(|h| h.ssm.as_ref())
    }

    pub fn credentials_file_enabled(&self) -> bool {
        self.spec
            .hybrid
            .as_ref()
            .map(|h| h.enable_credentials_file)
            .unwrap_or(false)
    }

    pub fn to_yaml(&self) -> Result<String, NodeConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn from_yaml(content: &str) -> Result<Self, NodeConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn to_json_value(&self) -> Result<serde_json::Value, NodeConfigError> {
        Ok(serde_json::to_value(self)?)
    }
}
