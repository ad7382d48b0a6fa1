//! Wait for a managed instance to drop out of the SSM inventory
//!
//! One background task polls `DescribeInstanceInformation` and reports its
//! outcome through a oneshot slot; the caller races that slot against the
//! overall deadline. Query failures are tolerated up to
//! `max_consecutive_failures` in a row; a successful query resets the count.

use crate::config::DeregistrationConfig;
use crate::error::SsmError;
use crate::ssm::api::ManagedInstanceApi;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::time::{sleep, sleep_until, Instant};
use tracing::{debug, info, warn};

pub async fn wait_for_managed_instance_unregistered<A>(
    api: Arc<A>,
    instance_id: &str,
    settings: &DeregistrationConfig,
) -> Result<(), SsmError>
where
    A: ManagedInstanceApi + 'static,
{
    let timeout = settings.timeout();
    let deadline = Instant::now() + timeout;
    let (outcome_tx, outcome_rx) = oneshot::channel();

    let poller = tokio::spawn(poll_until_unregistered(
        api,
        instance_id.to_string(),
        settings.poll_interval(),
        settings.max_consecutive_failures,
        deadline,
        outcome_tx,
    ));

    let result = tokio::select! {
        biased;
        outcome = outcome_rx => match outcome {
            Ok(result) => result,
            Err(_) => Err(SsmError::PollerStopped {
                instance_id: instance_id.to_string(),
            }),
        },
        _ = sleep_until(deadline) => Err(SsmError::DeregistrationTimeout {
            instance_id: instance_id.to_string(),
            timeout,
        }),
    };

    poller.abort();
    result
}

async fn poll_until_unregistered<A: ManagedInstanceApi>(
    api: Arc<A>,
    instance_id: String,
    poll_interval: Duration,
    max_consecutive_failures: u32,
    deadline: Instant,
    outcome: oneshot::Sender<Result<(), SsmError>>,
) {
    let mut consecutive_failures = 0u32;

    loop {
        match api.describe_instance_information(&instance_id).await {
            Ok(instances) if instances.is_empty() => {
                info!("Instance {} is no longer registered with SSM", instance_id);
                let _ = outcome.send(Ok(()));
                return;
            }
            Ok(instances) => {
                consecutive_failures = 0;
                debug!(
                    "Instance {} still registered ({} entries), waiting",
                    instance_id,
                    instances.len()
                );
            }
            Err(e) => {
                consecutive_failures += 1;
                if consecutive_failures > max_consecutive_failures || Instant::now() >= deadline {
                    let _ = outcome.send(Err(SsmError::DescribeInstance {
                        instance_id,
                        source: e,
                    }));
                    return;
                }
                warn!(
                    "DescribeInstanceInformation for {} failed ({}/{}): {}",
                    instance_id, consecutive_failures, max_consecutive_failures, e
                );
            }
        }

        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::ssm::api::{ActivationRequest, ActivationResponse, ManagedInstance};
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct AlwaysFailing {
        describe_calls: AtomicUsize,
    }

    impl ManagedInstanceApi for AlwaysFailing {
        async fn create_activation(
            &self,
            _request: &ActivationRequest,
        ) -> Result<ActivationResponse, ApiError> {
            Err(ApiError::new("unused"))
        }

        async fn describe_instance_information(
            &self,
            _instance_id: &str,
        ) -> Result<Vec<ManagedInstance>, ApiError> {
            self.describe_calls.fetch_add(1, Ordering::SeqCst);
            Err(ApiError::with_code("InternalServerError", "service unavailable"))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_past_deadline_aborts_within_tolerance() {
        let api = Arc::new(AlwaysFailing::default());
        let (tx, rx) = oneshot::channel();
        let start = Instant::now();

        // tolerance left, but the deadline has already passed
        poll_until_unregistered(
            api.clone(),
            "mi-1".to_string(),
            Duration::from_secs(5),
            3,
            start,
            tx,
        )
        .await;

        match rx.await.unwrap() {
            Err(SsmError::DescribeInstance {
                instance_id,
                source,
            }) => {
                assert_eq!(instance_id, "mi-1");
                assert_eq!(source.code(), Some("InternalServerError"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(api.describe_calls.load(Ordering::SeqCst), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_before_deadline_are_tolerated() {
        let api = Arc::new(AlwaysFailing::default());
        let (tx, rx) = oneshot::channel();
        let start = Instant::now();

        poll_until_unregistered(
            api.clone(),
            "mi-2".to_string(),
            Duration::from_secs(5),
            2,
            start + Duration::from_secs(60),
            tx,
        )
        .await;

        assert!(matches!(
            rx.await.unwrap(),
            Err(SsmError::DescribeInstance { .. })
        ));
        assert_eq!(api.describe_calls.load(Ordering::SeqCst), 3);
        assert_eq!(start.elapsed(), Duration::from_secs(10));
    }
}
