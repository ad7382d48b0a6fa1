/*!
# Hybrid E2E DevKit - Stubs et Utilitaires pour tester les credential providers

Bibliothèque facilitant le test du provider SSM avec:
- Stub SSM scriptable (sans compte AWS)
- Harness de test (provider câblé sur le stub, assertions)
- Fixtures (NodeSpec, activations, instances)
*/

pub mod fixtures;
pub mod ssm_stub;
pub mod test_utils;

pub use fixtures::NodeSpecBuilder;
pub use ssm_stub::MockSsmClient;
pub use test_utils::{SsmOperation, TestHarness};
