use std::fmt;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info, instrument::WithSubscriber, warn, Dispatch};

use crate::{
    error::ErrorKind,
    response::{preview, ResponseBody},
    retry::parse_retry_after,
    ClientOptions, Delivery, PageError, RequestDescriptor, Result, RetryPolicy,
};

#[derive(Clone)]
/// HTTP client that probes an endpoint and sends a request under a retry policy.
pub struct PageClient {
    http: reqwest::Client,
    options: ClientOptions,
    retry: RetryPolicy,
    dispatch: Option<Dispatch>,
}

impl fmt::Debug for PageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageClient")
            .field("options", &self.options)
            .field("retry", &self.retry)
            .field("dispatch", &self.dispatch.is_some())
            .finish()
    }
}

impl Default for PageClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PageClient {
    /// Creates a client with default timeouts and retry policy.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            options: ClientOptions::default(),
            retry: RetryPolicy::default(),
            dispatch: None,
        }
    }

    /// Applies timeout and preview options.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Replaces the retry policy used by [`PageClient::send`].
    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.retry = policy;
        self
    }

    /// Emits every event of this client into `dispatch` instead of the
    /// default subscriber.
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = Some(dispatch);
        self
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Checks with a HEAD request whether the endpoint answers at all.
    ///
    /// Any HTTP response counts as reachable. Failures are logged as
    /// warnings and reported as `false`; they never abort the caller.
    pub async fn probe(&self, request: &RequestDescriptor) -> bool {
        self.scoped(self.probe_once(request)).await
    }

    /// Sends the request, retrying as the policy allows.
    ///
    /// Returns the 2xx response, or the classified failure of the last
    /// attempt.
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Delivery> {
        self.scoped(self.send_with_retry(request)).await
    }

    pub(crate) async fn scoped<F: Future>(&self, fut: F) -> F::Output {
        match &self.dispatch {
            Some(dispatch) => fut.with_subscriber(dispatch.clone()).await,
            None => fut.await,
        }
    }

    async fn probe_once(&self, request: &RequestDescriptor) -> bool {
        let timeout = Duration::from_millis(self.options.probe_timeout_ms);
        info!(
            url = %request.url(),
            timeout_secs = timeout.as_secs_f64(),
            "checking whether endpoint is reachable"
        );

        let response = self
            .http
            .head(request.url())
            .headers(request.headers().clone())
            .timeout(timeout)
            .send()
            .await;

        match response {
            Ok(response) => {
                info!(
                    status = response.status().as_u16(),
                    "endpoint is reachable"
                );
                true
            }
            Err(err) => {
                let err = PageError::from_reqwest(err, timeout);
                warn!(error = %err, "HEAD request failed, continuing with main request");
                false
            }
        }
    }

    async fn send_with_retry(&self, request: &RequestDescriptor) -> Result<Delivery> {
        let timeout = Duration::from_millis(self.options.timeout_ms);
        let retryable_method = self.retry.allows_method(request.method());

        info!(
            method = %request.method(),
            url = %request.url(),
            timeout_secs = timeout.as_secs_f64(),
            max_attempts = self.retry.max_attempts,
            "sending request"
        );
        debug!(headers = ?request.redacted_headers(), "request headers");
        debug!(
            payload = %serde_json::to_string_pretty(request.body()).unwrap_or_default(),
            "request payload"
        );

        let mut attempt = 0usize;
        loop {
            attempt += 1;
            let can_retry = retryable_method && self.retry.has_attempts_left(attempt);

            let response = self
                .http
                .request(request.method().clone(), request.url())
                .headers(request.headers().clone())
                .timeout(timeout)
                .json(request.body())
                .send()
                .await;

            let response = match response {
                Ok(response) => response,
                Err(err) => {
                    let err = PageError::from_reqwest(err, timeout);
                    if can_retry && is_transient(&err) {
                        self.wait_before_retry(attempt, None, &err).await;
                        continue;
                    }
                    error!(attempt, kind = ?err.kind(), error = %err, "request failed");
                    return Err(err);
                }
            };

            let status = response.status();
            info!(attempt, status = status.as_u16(), "received response");
            debug!(headers = ?response.headers(), "response headers");
            let retry_after = parse_retry_after(response.headers());

            // Once a status is in hand the server has seen the request; only the
            // status decides whether it goes out again.
            let raw = match response.text().await {
                Ok(raw) => raw,
                Err(err) => {
                    let err = PageError::from_reqwest(err, timeout);
                    if status.is_success() {
                        error!(
                            attempt,
                            status = status.as_u16(),
                            kind = ?err.kind(),
                            error = %err,
                            "reading response body failed after success status"
                        );
                        return Err(err);
                    }
                    let err = PageError::Http {
                        status: status.as_u16(),
                        body: format!("<unreadable body: {err}>"),
                    };
                    if can_retry && self.retry.should_retry_status(status) {
                        self.wait_before_retry(attempt, retry_after, &err).await;
                        continue;
                    }
                    error!(attempt, status = status.as_u16(), error = %err, "request rejected");
                    return Err(err);
                }
            };

            let body = ResponseBody::parse(&raw, self.options.preview_chars);
            match &body {
                ResponseBody::Json(value) => debug!(body = %value, "response JSON"),
                ResponseBody::Text(text) => debug!(body = %text, "response text (not JSON)"),
            }

            if status.is_success() {
                info!(attempt, status = status.as_u16(), "request succeeded");
                return Ok(Delivery {
                    status: status.as_u16(),
                    body,
                });
            }

            let err = PageError::Http {
                status: status.as_u16(),
                body: preview(&raw, self.options.preview_chars).to_owned(),
            };
            if can_retry && self.retry.should_retry_status(status) {
                self.wait_before_retry(attempt, retry_after, &err).await;
                continue;
            }

            error!(
                attempt,
                status = status.as_u16(),
                body = %preview(&raw, self.options.preview_chars),
                "request rejected"
            );
            return Err(err);
        }
    }

    /// Sleeps `base * 2^(attempt - 1)` after a failed attempt, or longer when
    /// the server asked for it with `Retry-After`.
    async fn wait_before_retry(
        &self,
        attempt: usize,
        retry_after: Option<Duration>,
        cause: &PageError,
    ) {
        let delay = self.retry.delay(attempt, retry_after);
        warn!(
            attempt,
            max_attempts = self.retry.max_attempts,
            delay_ms = delay.as_millis() as u64,
            error = %cause,
            "attempt failed, retrying"
        );
        sleep(delay).await;
    }
}

fn is_transient(err: &PageError) -> bool {
    matches!(err.kind(), ErrorKind::Timeout | ErrorKind::Transport)
}
