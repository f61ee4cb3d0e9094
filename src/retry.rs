use std::time::Duration;

use reqwest::{
    header::{HeaderMap, RETRY_AFTER},
    Method, StatusCode,
};

/// Decides whether and when a failed call is attempted again.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RetryPolicy {
    /// Total number of attempts, the first one included.
    pub max_attempts: usize,
    /// Wait before the second attempt; doubled for every further attempt.
    pub backoff_base_ms: u64,
    /// Status codes that trigger another attempt.
    pub retry_statuses: Vec<u16>,
    /// Methods that may be attempted more than once.
    pub retry_methods: Vec<Method>,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base_ms: 1_000,
            retry_statuses: vec![429, 500, 502, 503, 504],
            retry_methods: vec![Method::POST],
        }
    }
}

impl RetryPolicy {
    /// A policy that makes exactly one attempt.
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            ..Self::default()
        }
    }

    pub fn allows_method(&self, method: &Method) -> bool {
        self.retry_methods.contains(method)
    }

    pub fn should_retry_status(&self, status: StatusCode) -> bool {
        self.retry_statuses.contains(&status.as_u16())
    }

    /// Whether another attempt may follow the 1-based `attempt`.
    pub fn has_attempts_left(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// Wait after the 1-based `attempt` failed: `base * 2^(attempt - 1)`.
    pub fn backoff(&self, attempt: usize) -> Duration {
        let exp = attempt.saturating_sub(1).min(16) as u32;
        let multiplier = 1u64 << exp;
        Duration::from_millis(self.backoff_base_ms.saturating_mul(multiplier))
    }

    /// Backoff for `attempt`, raised to the server's `Retry-After` if longer.
    pub fn delay(&self, attempt: usize, retry_after: Option<Duration>) -> Duration {
        let backoff = self.backoff(attempt);
        retry_after.map_or(backoff, |floor| backoff.max(floor))
    }
}

/// `Retry-After` in its delay-seconds form. HTTP dates are ignored.
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

#[cfg(test)]
mod tests {
    use super::{parse_retry_after, RetryPolicy};
    use reqwest::{
        header::{HeaderMap, HeaderValue, RETRY_AFTER},
        Method, StatusCode,
    };
    use std::time::Duration;

    #[test]
    fn backoff_doubles_from_base() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_secs(1));
        assert_eq!(policy.backoff(2), Duration::from_secs(2));
        assert_eq!(policy.backoff(3), Duration::from_secs(4));
    }

    #[test]
    fn backoff_is_capped_for_huge_attempts() {
        let policy = RetryPolicy {
            backoff_base_ms: u64::MAX,
            ..RetryPolicy::default()
        };
        assert_eq!(policy.backoff(500), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn default_statuses_cover_rate_limit_and_gateway_errors() {
        let policy = RetryPolicy::default();
        for status in [429, 500, 502, 503, 504] {
            let status = StatusCode::from_u16(status).expect("valid status");
            assert!(policy.should_retry_status(status));
        }
        assert!(!policy.should_retry_status(StatusCode::NOT_FOUND));
        assert!(!policy.should_retry_status(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn only_post_is_retried_by_default() {
        let policy = RetryPolicy::default();
        assert!(policy.allows_method(&Method::POST));
        assert!(!policy.allows_method(&Method::HEAD));
    }

    #[test]
    fn attempt_budget_counts_first_attempt() {
        let policy = RetryPolicy::default();
        assert!(policy.has_attempts_left(1));
        assert!(policy.has_attempts_left(2));
        assert!(!policy.has_attempts_left(3));
        assert!(!RetryPolicy::none().has_attempts_left(1));
    }

    #[test]
    fn retry_after_raises_but_never_lowers_backoff() {
        let policy = RetryPolicy::default();
        assert_eq!(
            policy.delay(1, Some(Duration::from_secs(5))),
            Duration::from_secs(5)
        );
        assert_eq!(
            policy.delay(3, Some(Duration::from_secs(1))),
            Duration::from_secs(4)
        );
        assert_eq!(policy.delay(2, None), Duration::from_secs(2));
    }

    #[test]
    fn retry_after_accepts_seconds_only() {
        let mut headers = HeaderMap::new();
        assert_eq!(parse_retry_after(&headers), None);

        headers.insert(RETRY_AFTER, HeaderValue::from_static(" 7 "));
        assert_eq!(parse_retry_after(&headers), Some(Duration::from_secs(7)));

        headers.insert(
            RETRY_AFTER,
            HeaderValue::from_static("Wed, 21 Oct 2015 07:28:00 GMT"),
        );
        assert_eq!(parse_retry_after(&headers), None);
    }
}
