/*!
Test Harness pour le provider SSM

Facilite l'écriture de tests avec:
- Setup automatique du mock SSM et du provider
- Assertions sur les appels SSM effectués
- Assertions sur les champs du NodeConfig généré
*/

use crate::fixtures::DEFAULT_ROLE;
use crate::ssm_stub::MockSsmClient;
use anyhow::Result;
use hybrid_e2e_credentials::{CredentialProvider, NodeConfig, NodeSpec, SsmProvider, SsmProviderConfig};
use serde_json::Value;
use std::sync::Arc;

/// Opération SSM observée par le harness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsmOperation {
    CreateActivation,
    DescribeInstanceInformation,
}

#[derive(Debug)]
struct Expectation {
    operation: SsmOperation,
    expected_count: usize,
}

/// Harness de test complet pour le provider SSM
pub struct TestHarness {
    pub ssm: MockSsmClient,
    pub provider: SsmProvider<MockSsmClient>,
    expectations: Vec<Expectation>,
}

impl TestHarness {
    /// Crée un nouveau harness avec la config par défaut
    pub fn new() -> Self {
        Self::with_config(SsmProviderConfig::default())
    }

    pub fn with_config(config: SsmProviderConfig) -> Self {
        init_tracing();

        let ssm = MockSsmClient::new();
        let provider = SsmProvider::new(Arc::new(ssm.clone()), DEFAULT_ROLE, config);

        Self {
            ssm,
            provider,
            expectations: Vec::new(),
        }
    }

    /// Ajoute une expectation: on s'attend à N appels pour une opération
    pub fn expect_calls(&mut self, operation: SsmOperation, count: usize) -> &mut Self {
        self.expectations.push(Expectation {
            operation,
            expected_count: count,
        });
        self
    }

    /// Génère le NodeConfig d'un nœud et le convertit en JSON pour assertions
    pub async fn node_config_json(&self, node: &NodeSpec) -> Result<Value> {
        let config: NodeConfig = self.provider.node_config(node).await?;
        Ok(config.to_json_value()?)
    }

    pub fn call_count(&self, operation: SsmOperation) -> usize {
        match operation {
            SsmOperation::CreateActivation => self.ssm.activation_calls().len(),
            SsmOperation::DescribeInstanceInformation => self.ssm.describe_calls().len(),
        }
    }

    /// Vérifie toutes les expectations configurées
    pub fn verify_expectations(&self) -> Result<()> {
        tracing::info!("🔍 Verifying {} expectations...", self.expectations.len());

        for expectation in &self.expectations {
            let actual_count = self.call_count(expectation.operation);

            if actual_count != expectation.expected_count {
                anyhow::bail!(
                    "Expectation failed for {:?}: expected {} calls, got {}",
                    expectation.operation,
                    expectation.expected_count,
                    actual_count
                );
            }
        }

        tracing::info!("🎉 All expectations verified successfully");
        Ok(())
    }

    /// Assert qu'un champ a une valeur spécifique (chemin pointé: "spec.hybrid.ssm.activationId")
    pub fn assert_field_equals(&self, config: &Value, field_path: &str, expected: &Value) -> Result<()> {
        match get_nested_field(config, field_path) {
            Some(actual) if actual == expected => Ok(()),
            Some(actual) => anyhow::bail!(
                "Field '{}' mismatch: expected {:?}, got {:?}",
                field_path,
                expected,
                actual
            ),
            None => anyhow::bail!("Field '{}' not found in node config", field_path),
        }
    }

    pub fn assert_field_exists(&self, config: &Value, field_path: &str) -> Result<()> {
        if get_nested_field(config, field_path).is_some() {
            return Ok(());
        }
        anyhow::bail!("Field '{}' not found in node config", field_path);
    }

    /// Stats sur les appels collectés
    pub fn get_stats(&self) -> TestStats {
        TestStats {
            activation_calls: self.call_count(SsmOperation::CreateActivation),
            describe_calls: self.call_count(SsmOperation::DescribeInstanceInformation),
        }
    }

    /// Reset le harness pour un nouveau test
    pub fn reset(&mut self) {
        self.ssm.clear();
        self.expectations.clear();
        tracing::info!("🧹 Test harness reset");
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestStats {
    pub activation_calls: usize,
    pub describe_calls: usize,
}

fn get_nested_field<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    let mut current = value;

    for part in path.split('.') {
        match current {
            Value::Object(obj) => current = obj.get(part)?,
            _ => return None,
        }
    }

    Some(current)
}

/// Init logging pour tests (idempotent)
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_test_writer()
        .try_init()
        .ok();
}
