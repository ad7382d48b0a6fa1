//! Retry policy for API calls that fail with known transient error codes

use crate::error::ApiError;
use std::collections::HashSet;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    max_attempts: usize,
    base_delay: Duration,
    max_delay: Option<Duration>,
    retryable_codes: HashSet<String>,
}

impl RetryPolicy {
    /// Delays double from `base_delay`; `max_attempts` counts the first call
    pub fn exponential(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
            max_delay: None,
            retryable_codes: HashSet::new(),
        }
    }

    pub fn with_max_delay(mut self, max_delay: Duration) -> Self {
        self.max_delay = if max_delay.is_zero() {
            None
        } else {
            Some(max_delay)
        };
        self
    }

    pub fn with_retryable_codes<I, S>(mut self, codes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.retryable_codes.extend(codes.into_iter().map(Into::into));
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn is_retryable(&self, error: &ApiError) -> bool {
        error
            .code()
            .map(|code| self.retryable_codes.contains(code))
            .unwrap_or(false)
    }

    pub fn handle(&self) -> RetryHandle {
        RetryHandle {
            policy: self.clone(),
            attempts: 0,
        }
    }

    fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let shift = attempt.saturating_sub(1).min(31) as u32;
        let raw = self.base_delay.saturating_mul(1u32 << shift);
        match self.max_delay {
            Some(max) => raw.min(max),
            None => raw,
        }
    }
}

/// Per-call retry state
#[derive(Debug)]
pub struct RetryHandle {
    policy: RetryPolicy,
    attempts: usize,
}

impl RetryHandle {
    /// Delay before the next attempt, `None` once the attempt budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        if self.attempts + 1 >= self.policy.max_attempts {
            return None;
        }
        self.attempts += 1;
        Some(self.policy.delay_for_attempt(self.attempts))
    }

    /// Number of retries handed out so far
    pub fn retries(&self) -> usize {
        self.attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_delays_are_capped() {
        let policy = RetryPolicy::exponential(5, Duration::from_secs(1))
            .with_max_delay(Duration::from_secs(3));
        let mut handle = policy.handle();

        assert_eq!(handle.next_delay(), Some(Duration::from_secs(1)));
        assert_eq!(handle.next_delay(), Some(Duration::from_secs(2)));
        assert_eq!(handle.next_delay(), Some(Duration::from_secs(3)));
        assert_eq!(handle.next_delay(), Some(Duration::from_secs(3)));
        assert_eq!(handle.next_delay(), None);
        assert_eq!(handle.retries(), 4);
    }

    #[test]
    fn test_single_attempt_never_retries() {
        let mut handle = RetryPolicy::exponential(1, Duration::from_secs(1)).handle();
        assert_eq!(handle.next_delay(), None);
        assert_eq!(handle.retries(), 0);

        // zero attempts is clamped to one
        let policy = RetryPolicy::exponential(0, Duration::from_secs(1));
        assert_eq!(policy.max_attempts(), 1);
        assert_eq!(policy.handle().next_delay(), None);
    }

    #[test]
    fn test_retryable_codes() {
        let policy = RetryPolicy::exponential(3, Duration::from_millis(10))
            .with_retryable_codes(["ValidationException"]);

        assert!(policy.is_retryable(&ApiError::with_code("ValidationException", "x")));
        assert!(!policy.is_retryable(&ApiError::with_code("AccessDeniedException", "x")));
        assert!(!policy.is_retryable(&ApiError::new("no code")));
    }
}
