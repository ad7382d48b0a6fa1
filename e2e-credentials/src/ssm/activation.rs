//! SSM activation creation
//!
//! Builds a `CreateActivation` request for one node (registration limit and
//! cluster tag from config) and submits it under the configured retry policy,
//! which retries `ValidationException` (IAM role not yet usable by SSM).

use crate::config::SsmProviderConfig;
use crate::error::{ActivationError, SsmError};
use crate::ssm::api::{ActivationRequest, ManagedInstanceApi, ResourceTag};
use tracing::{debug, info, warn};

/// Credentials a new instance uses to register itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Activation {
    pub id: String,
    pub code: String,
}

pub fn activation_request(
    config: &SsmProviderConfig,
    role: &str,
    cluster_name: &str,
    node_name: &str,
) -> ActivationRequest {
    ActivationRequest {
        default_instance_name: node_name.to_string(),
        iam_role: config.iam_role(role),
        registration_limit: config.registration_limit,
        tags: vec![ResourceTag {
            key: config.cluster_tag_key.clone(),
            value: cluster_name.to_string(),
        }],
    }
}

pub async fn create_activation<A: ManagedInstanceApi>(
    api: &A,
    config: &SsmProviderConfig,
    role: &str,
    cluster_name: &str,
    node_name: &str,
) -> Result<Activation, SsmError> {
    let request = activation_request(config, role, cluster_name, node_name);
    let wrap = |source: ActivationError| SsmError::CreateActivation {
        node: node_name.to_string(),
        source,
    };

    let policy = config.retry_policy();
    let mut retry = policy.handle();

    let response = loop {
        debug!(
            "Creating SSM activation for {} (role {}, attempt {})",
            node_name,
            request.iam_role,
            retry.retries() + 1
        );

        match api.create_activation(&request).await {
            Ok(response) => break response,
            Err(e) if policy.is_retryable(&e) => match retry.next_delay() {
                Some(delay) => {
                    warn!("CreateActivation for {} failed ({}), retrying in {:?}", node_name, e, delay);
                    tokio::time::sleep(delay).await;
                }
                None => return Err(wrap(ActivationError::Api(e))),
            },
            Err(e) => return Err(wrap(ActivationError::Api(e))),
        }
    };

    let id = response
        .activation_id
        .ok_or(ActivationError::MissingField("activation id"))
        .map_err(wrap)?;
    let code = response
        .activation_code
        .ok_or(ActivationError::MissingField("activation code"))
        .map_err(wrap)?;

    info!("Created SSM activation {} for node {}", id, node_name);
    Ok(Activation { id, code })
}
