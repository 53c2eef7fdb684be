//! Fetch error type returned once the retry loop gives up.

use std::fmt;
use std::time::Duration;

/// Error returned by [`crate::fetch::Fetcher`].
/// Kept typed so callers can treat "not found" as an answer rather than a failure.
#[derive(Debug)]
pub enum FetchError {
    /// Curl reported an error (timeout, connection, DNS, etc.).
    Transport { url: String, source: curl::Error },
    /// Response had a non-2xx status.
    Http { url: String, status: u32 },
    /// 404 Not Found. Never retried.
    NotFound { url: String },
    /// Rate-limit reset or `Retry-After` lies further out than the configured cap.
    RateLimitWaitTooLong {
        url: String,
        wait: Duration,
        cap: Duration,
    },
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport { url, source } => write!(f, "GET {}: {}", url, source),
            FetchError::Http { url, status } => write!(f, "GET {} returned HTTP {}", url, status),
            FetchError::NotFound { url } => write!(f, "GET {} returned HTTP 404", url),
            FetchError::RateLimitWaitTooLong { url, wait, cap } => write!(
                f,
                "GET {}: server asked to wait {}s, longer than the {}s cap",
                url,
                wait.as_secs(),
                cap.as_secs()
            ),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport { source, .. } => Some(source),
            _ => None,
        }
    }
}
