use std::time::Duration;

/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// Required configuration values were absent or empty.
    #[error("missing required configuration: {}", .0.join(", "))]
    MissingConfiguration(Vec<&'static str>),
    /// A configuration value was present but unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    /// The request did not complete within the configured timeout.
    #[error("request timed out after {}s", .timeout.as_secs_f64())]
    Timeout { timeout: Duration },
    /// DNS, connection, TLS or request-body failure from `reqwest`.
    #[error("transport error: {}", error_chain(.0))]
    Transport(reqwest::Error),
    /// Non-success HTTP status code with a body excerpt.
    #[error("http error {status}: {body}")]
    Http { status: u16, body: String },
    /// Anything else, with the full error chain flattened into the message.
    #[error("unexpected error: {0}")]
    Unknown(String),
}

/// Coarse classification of a [`PageError`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorKind {
    MissingConfiguration,
    InvalidConfiguration,
    Timeout,
    Transport,
    Http,
    Unknown,
}

impl PageError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingConfiguration(_) => ErrorKind::MissingConfiguration,
            Self::InvalidConfiguration(_) => ErrorKind::InvalidConfiguration,
            Self::Timeout { .. } => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Http { .. } => ErrorKind::Http,
            Self::Unknown(_) => ErrorKind::Unknown,
        }
    }

    /// HTTP status attached to the failure, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Classifies a `reqwest` failure for a call made with `timeout`.
    pub(crate) fn from_reqwest(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            return Self::Timeout { timeout };
        }
        if err.is_connect() || err.is_request() || err.is_body() || err.is_redirect() {
            return Self::Transport(err);
        }
        Self::Unknown(error_chain(&err))
    }
}

/// Joins an error and all of its sources into one line.
pub(crate) fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}
