use std::time::Duration;

/// High-level classification of a failed request for retry purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network-level failure (DNS, connect, reset, timeout).
    Transport,
    /// API quota exhausted; `reset` is the Unix time at which it refills.
    RateLimited { reset: u64 },
    /// Server asked us to slow down (429, or 403 with `Retry-After`).
    Throttled { retry_after: Option<Duration> },
    /// 404: the resource does not exist. Asking again will not change that.
    NotFound,
    /// Any other non-2xx status.
    Http(u32),
}

/// Decision returned by the retry policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Do not retry this error.
    NoRetry,
    /// Retry after the given delay; counts against `max_attempts`.
    RetryAfter(Duration),
    /// Sleep until the rate-limit window resets, then retry without counting the attempt.
    WaitForReset(Duration),
}

/// Bounded retry with a fixed delay, plus uncounted rate-limit waits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FetchPolicy {
    /// Maximum number of attempts (including the first).
    pub max_attempts: u32,
    /// Delay between ordinary failed attempts.
    pub retry_delay: Duration,
    /// Added on top of the advertised reset time so we never wake up a hair early.
    pub rate_limit_padding: Duration,
    /// If set, a rate-limit wait longer than this fails the request instead of blocking.
    pub max_rate_limit_wait: Option<Duration>,
}

impl Default for FetchPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            rate_limit_padding: Duration::from_secs(1),
            max_rate_limit_wait: None,
        }
    }
}

impl FetchPolicy {
    /// How long to wait for a quota reset at Unix time `reset`, seen from `now`.
    pub fn rate_limit_wait(&self, reset: u64, now: u64) -> Duration {
        Duration::from_secs(reset.saturating_sub(now)) + self.rate_limit_padding
    }

    /// Decide what to do after attempt number `attempt` (1-based) failed with `kind`.
    pub fn decide(&self, attempt: u32, kind: ErrorKind, now: u64) -> RetryDecision {
        match kind {
            ErrorKind::NotFound => RetryDecision::NoRetry,
            ErrorKind::RateLimited { reset } => {
                RetryDecision::WaitForReset(self.rate_limit_wait(reset, now))
            }
            _ if attempt >= self.max_attempts => RetryDecision::NoRetry,
            ErrorKind::Throttled {
                retry_after: Some(d),
            } => RetryDecision::RetryAfter(d),
            ErrorKind::Throttled { retry_after: None }
            | ErrorKind::Transport
            | ErrorKind::Http(_) => RetryDecision::RetryAfter(self.retry_delay),
        }
    }
}
