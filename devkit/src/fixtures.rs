/*!
Fixtures pour les tests du provider SSM

- Construction de `NodeSpec` avec valeurs par défaut
- Réponses CreateActivation et instances d'inventaire prêtes à l'emploi
*/

use hybrid_e2e_credentials::ssm::{ActivationResponse, ManagedInstance};
use hybrid_e2e_credentials::{ApiError, NodeSpec};

pub const DEFAULT_CLUSTER: &str = "e2e-cluster";
pub const DEFAULT_REGION: &str = "us-west-2";
pub const DEFAULT_ROLE: &str = "ssm-hybrid-node";

/// Construction de NodeSpec pour les tests
#[derive(Debug, Clone)]
pub struct NodeSpecBuilder {
    name: String,
    cluster: String,
    region: String,
}

impl NodeSpecBuilder {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cluster: DEFAULT_CLUSTER.to_string(),
            region: DEFAULT_REGION.to_string(),
        }
    }

    pub fn cluster<S: Into<String>>(mut self, cluster: S) -> Self {
        self.cluster = cluster.into();
        self
    }

    pub fn region<S: Into<String>>(mut self, region: S) -> Self {
        self.region = region.into();
        self
    }

    pub fn build(self) -> NodeSpec {
        NodeSpec::new(self.name, self.cluster, self.region)
    }
}

pub fn activation_response(id: &str, code: &str) -> ActivationResponse {
    ActivationResponse {
        activation_id: Some(id.to_string()),
        activation_code: Some(code.to_string()),
    }
}

/// Activation avec id/code aléatoires
pub fn generated_activation() -> ActivationResponse {
    ActivationResponse {
        activation_id: Some(uuid::Uuid::new_v4().to_string()),
        activation_code: Some(uuid::Uuid::new_v4().simple().to_string()),
    }
}

pub fn online_instance(instance_id: &str) -> ManagedInstance {
    ManagedInstance {
        instance_id: instance_id.to_string(),
        ping_status: Some("Online".to_string()),
    }
}

pub fn validation_exception() -> ApiError {
    ApiError::with_code(
        "ValidationException",
        "Not existing role: arn:aws:iam::123456789012:role/hybrid-e2e/ssm-hybrid-node",
    )
}

pub fn throttling_exception() -> ApiError {
    ApiError::with_code("ThrottlingException", "Rate exceeded")
}
