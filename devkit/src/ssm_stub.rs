/*!
Mock SSM Client pour tests sans compte AWS

Implémente `ManagedInstanceApi` avec des réponses scriptées.
Enregistre toutes les requêtes reçues (avec leur instant tokio) pour les assertions.
*/

use hybrid_e2e_credentials::ssm::{
    ActivationRequest, ActivationResponse, ManagedInstance, ManagedInstanceApi,
};
use hybrid_e2e_credentials::ApiError;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::time::Instant;

/// Appel DescribeInstanceInformation reçu par le mock
#[derive(Debug, Clone)]
pub struct DescribeCall {
    pub instance_id: String,
    pub at: Instant,
}

#[derive(Debug, Clone)]
pub struct ActivationCall {
    pub request: ActivationRequest,
    pub at: Instant,
}

type DescribeResult = Result<Vec<ManagedInstance>, ApiError>;

#[derive(Debug, Default)]
struct MockState {
    activation_responses: VecDeque<Result<ActivationResponse, ApiError>>,
    describe_responses: VecDeque<DescribeResult>,
    describe_fallback: Option<DescribeResult>,
    activation_calls: Vec<ActivationCall>,
    describe_calls: Vec<DescribeCall>,
}

/// Mock SSM client qui simule CreateActivation / DescribeInstanceInformation
#[derive(Clone, Debug, Default)]
pub struct MockSsmClient {
    state: Arc<Mutex<MockState>>,
}

impl MockSsmClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ajoute une réponse CreateActivation (consommée dans l'ordre)
    pub fn push_activation(&self, response: Result<ActivationResponse, ApiError>) -> &Self {
        self.state.lock().activation_responses.push_back(response);
        self
    }

    /// Ajoute une réponse DescribeInstanceInformation (consommée dans l'ordre)
    pub fn push_describe(&self, response: DescribeResult) -> &Self {
        self.state.lock().describe_responses.push_back(response);
        self
    }

    /// Réponse utilisée une fois la file épuisée (liste vide par défaut)
    pub fn set_describe_fallback(&self, response: DescribeResult) -> &Self {
        self.state.lock().describe_fallback = Some(response);
        self
    }

    /// L'instance reste enregistrée indéfiniment
    pub fn keep_registered(&self, instance_id: &str) -> &Self {
        self.set_describe_fallback(Ok(vec![crate::fixtures::online_instance(instance_id)]))
    }

    pub fn activation_requests(&self) -> Vec<ActivationRequest> {
        self.state
            .lock()
            .activation_calls
            .iter()
            .map(|call| call.request.clone())
            .collect()
    }

    pub fn activation_calls(&self) -> Vec<ActivationCall> {
        self.state.lock().activation_calls.clone()
    }

    pub fn describe_calls(&self) -> Vec<DescribeCall> {
        self.state.lock().describe_calls.clone()
    }

    /// Reset toutes les réponses et appels enregistrés
    pub fn clear(&self) {
        *self.state.lock() = MockState::default();
    }
}

impl ManagedInstanceApi for MockSsmClient {
    async fn create_activation(
        &self,
        request: &ActivationRequest,
    ) -> Result<ActivationResponse, ApiError> {
        let mut state = self.state.lock();
        state.activation_calls.push(ActivationCall {
            request: request.clone(),
            at: Instant::now(),
        });

        let response = state
            .activation_responses
            .pop_front()
            .unwrap_or_else(|| Ok(crate::fixtures::generated_activation()));

        tracing::info!(
            "📤 [MOCK] CreateActivation {} -> {}",
            request.default_instance_name,
            if response.is_ok() { "ok" } else { "error" }
        );
        response
    }

    async fn describe_instance_information(
        &self,
        instance_id: &str,
    ) -> Result<Vec<ManagedInstance>, ApiError> {
        let mut state = self.state.lock();
        state.describe_calls.push(DescribeCall {
            instance_id: instance_id.to_string(),
            at: Instant::now(),
        });

        let response = match state.describe_responses.pop_front() {
            Some(response) => response,
            None => state.describe_fallback.clone().unwrap_or_else(|| Ok(Vec::new())),
        };

        tracing::info!("📥 [MOCK] DescribeInstanceInformation {}", instance_id);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{activation_response, online_instance};

    #[tokio::test]
    async fn test_scripted_activations_then_generated() {
        let client = MockSsmClient::new();
        client.push_activation(Ok(activation_response("id-1", "code-1")));

        let request = ActivationRequest {
            default_instance_name: "node".to_string(),
            iam_role: "role".to_string(),
            registration_limit: 2,
            tags: vec![],
        };

        let first = client.create_activation(&request).await.unwrap();
        assert_eq!(first.activation_id.as_deref(), Some("id-1"));

        let second = client.create_activation(&request).await.unwrap();
        assert!(second.activation_id.is_some());
        assert!(second.activation_code.is_some());

        assert_eq!(client.activation_requests().len(), 2);
    }

    #[tokio::test]
    async fn test_describe_queue_then_fallback() {
        let client = MockSsmClient::new();
        client
            .push_describe(Err(ApiError::with_code("ThrottlingException", "slow down")))
            .keep_registered("mi-1");

        assert!(client.describe_instance_information("mi-1").await.is_err());
        let instances = client.describe_instance_information("mi-1").await.unwrap();
        assert_eq!(instances, vec![online_instance("mi-1")]);

        client.clear();
        assert!(client.describe_instance_information("mi-1").await.unwrap().is_empty());
        assert_eq!(client.describe_calls().len(), 1);
    }
}
