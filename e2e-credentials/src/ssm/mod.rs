//! SSM credential provider
//!
//! Nodes register through a hybrid activation created for them, and uninstall
//! is verified by waiting for the managed instance to leave the inventory.

pub mod activation;
pub mod api;
pub mod aws;
pub mod deregistration;

pub use activation::{activation_request, create_activation, Activation};
pub use api::{ActivationRequest, ActivationResponse, ManagedInstance, ManagedInstanceApi, ResourceTag};
pub use aws::AwsSsmApi;
pub use deregistration::wait_for_managed_instance_unregistered;

use crate::config::SsmProviderConfig;
use crate::error::CredentialError;
use crate::node::{NodeFile, NodeSpec};
use crate::node_config::NodeConfig;
use crate::provider::{CredentialProvider, CredentialProviderName};
use std::sync::Arc;
use tracing::info;

#[derive(Debug)]
pub struct SsmProvider<A> {
    api: Arc<A>,
    role: String,
    config: SsmProviderConfig,
}

impl<A> Clone for SsmProvider<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            role: self.role.clone(),
            config: self.config.clone(),
        }
    }
}

impl<A: ManagedInstanceApi + 'static> SsmProvider<A> {
    pub fn new<R: Into<String>>(api: Arc<A>, role: R, config: SsmProviderConfig) -> Self {
        Self {
            api,
            role: role.into(),
            config,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn config(&self) -> &SsmProviderConfig {
        &self.config
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }
}

impl SsmProvider<AwsSsmApi> {
    /// Provider backed by the AWS SDK, config from `SsmProviderConfig::load`
    pub async fn from_env<R: Into<String>>(role: R) -> Result<Self, CredentialError> {
        let config = SsmProviderConfig::load().await?;
        let api = AwsSsmApi::from_env(config.region.clone()).await;
        Ok(Self::new(Arc::new(api), role, config))
    }
}

impl<A: ManagedInstanceApi + 'static> CredentialProvider for SsmProvider<A> {
    fn name(&self) -> CredentialProviderName {
        CredentialProviderName::Ssm
    }

    async fn node_config(&self, node: &NodeSpec) -> Result<NodeConfig, CredentialError> {
        let activation = create_activation(
            self.api.as_ref(),
            &self.config,
            &self.role,
            &node.cluster.name,
            &node.name,
        )
        .await?;

        Ok(NodeConfig::for_ssm(&node.cluster, &activation))
    }

    async fn verify_uninstall(&self, instance_id: &str) -> Result<(), CredentialError> {
        info!("Verifying instance {} deregistered from SSM", instance_id);
        wait_for_managed_instance_unregistered(
            Arc::clone(&self.api),
            instance_id,
            &self.config.deregistration,
        )
        .await?;
        Ok(())
    }

    fn files_for_node(&self, _node: &NodeSpec) -> Result<Vec<NodeFile>, CredentialError> {
        Ok(Vec::new())
    }
}
