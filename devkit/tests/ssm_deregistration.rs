use hybrid_e2e_credentials::ssm::wait_for_managed_instance_unregistered;
use hybrid_e2e_credentials::{
    CredentialError, CredentialProvider, DeregistrationConfig, SsmError, SsmProviderConfig,
};
use hybrid_e2e_devkit::fixtures::{online_instance, throttling_exception};
use hybrid_e2e_devkit::{MockSsmClient, SsmOperation, TestHarness};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

const INSTANCE: &str = "mi-0a1b2c3d4e5f60718";

#[tokio::test(start_paused = true)]
async fn succeeds_on_first_empty_result() {
    let harness = TestHarness::new();
    harness
        .ssm
        .push_describe(Ok(vec![online_instance(INSTANCE)]))
        .push_describe(Ok(vec![online_instance(INSTANCE)]));

    let start = Instant::now();
    harness.provider.verify_uninstall(INSTANCE).await.unwrap();

    let calls = harness.ssm.describe_calls();
    assert_eq!(calls.len(), 3);
    assert!(calls.iter().all(|c| c.instance_id == INSTANCE));
    assert_eq!(calls[1].at - calls[0].at, Duration::from_secs(5));
    assert_eq!(calls[2].at - calls[1].at, Duration::from_secs(5));
    assert_eq!(start.elapsed(), Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn already_unregistered_returns_immediately() {
    let harness = TestHarness::new();

    let start = Instant::now();
    harness.provider.verify_uninstall(INSTANCE).await.unwrap();

    assert_eq!(harness.call_count(SsmOperation::DescribeInstanceInformation), 1);
    assert_eq!(start.elapsed(), Duration::ZERO);
}

#[tokio::test(start_paused = true)]
async fn fourth_consecutive_failure_aborts_before_deadline() {
    let harness = TestHarness::new();
    harness.ssm.set_describe_fallback(Err(throttling_exception()));

    let start = Instant::now();
    let err = harness.provider.verify_uninstall(INSTANCE).await.unwrap_err();

    match err {
        CredentialError::Ssm(SsmError::DescribeInstance { instance_id, source }) => {
            assert_eq!(instance_id, INSTANCE);
            assert_eq!(source.code(), Some("ThrottlingException"));
        }
        other => panic!("unexpected error: {}", other),
    }
    assert_eq!(harness.call_count(SsmOperation::DescribeInstanceInformation), 4);
    assert_eq!(start.elapsed(), Duration::from_secs(15));
}

#[tokio::test(start_paused = true)]
async fn times_out_when_instance_stays_registered() {
    let harness = TestHarness::new();
    harness.ssm.keep_registered(INSTANCE);

    let start = Instant::now();
    let err = harness.provider.verify_uninstall(INSTANCE).await.unwrap_err();

    assert!(matches!(
        err,
        CredentialError::Ssm(SsmError::DeregistrationTimeout { ref instance_id, .. }) if instance_id == INSTANCE
    ));
    assert!(err
        .to_string()
        .contains("timed out waiting for instance to unregister"));
    assert_eq!(start.elapsed(), Duration::from_secs(180));
}

#[tokio::test(start_paused = true)]
async fn isolated_failure_then_empty_succeeds() {
    let harness = TestHarness::new();
    harness.ssm.push_describe(Err(throttling_exception()));

    harness.provider.verify_uninstall(INSTANCE).await.unwrap();
    assert_eq!(harness.call_count(SsmOperation::DescribeInstanceInformation), 2);
}

#[tokio::test(start_paused = true)]
async fn successful_query_resets_failure_count() {
    let ssm = MockSsmClient::new();
    for _ in 0..3 {
        ssm.push_describe(Err(throttling_exception()));
    }
    ssm.push_describe(Ok(vec![online_instance(INSTANCE)]));
    for _ in 0..3 {
        ssm.push_describe(Err(throttling_exception()));
    }

    let settings = DeregistrationConfig::default();
    wait_for_managed_instance_unregistered(Arc::new(ssm.clone()), INSTANCE, &settings)
        .await
        .unwrap();

    // 3 failures, 1 registered, 3 failures, then the empty fallback
    assert_eq!(ssm.describe_calls().len(), 8);
}

#[tokio::test(start_paused = true)]
async fn polling_settings_come_from_config() {
    let mut config = SsmProviderConfig::default();
    config.deregistration = DeregistrationConfig {
        poll_interval_secs: 1,
        timeout_secs: 10,
        max_consecutive_failures: 0,
    };

    let harness = TestHarness::with_config(config.clone());
    harness.ssm.keep_registered(INSTANCE);

    let start = Instant::now();
    let err = harness.provider.verify_uninstall(INSTANCE).await.unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Ssm(SsmError::DeregistrationTimeout { .. })
    ));
    assert_eq!(start.elapsed(), Duration::from_secs(10));

    // with no tolerance the first failure aborts
    let harness = TestHarness::with_config(config);
    harness.ssm.push_describe(Err(throttling_exception()));
    let err = harness.provider.verify_uninstall(INSTANCE).await.unwrap_err();
    assert!(matches!(
        err,
        CredentialError::Ssm(SsmError::DescribeInstance { .. })
    ));
    assert_eq!(harness.call_count(SsmOperation::DescribeInstanceInformation), 1);
}
