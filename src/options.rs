/// Configures HTTP timeouts and response previews.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Timeout for the reachability probe in milliseconds.
    pub probe_timeout_ms: u64,
    /// Per-attempt timeout for the main request in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of characters of a response body kept for logs and
    /// non-JSON outcomes.
    pub preview_chars: usize,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            probe_timeout_ms: 10_000,
            timeout_ms: 120_000,
            preview_chars: 500,
        }
    }
}
