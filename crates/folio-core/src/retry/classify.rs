//! Classify HTTP responses into retry policy error kinds.

use crate::http::Response;
use crate::retry::policy::ErrorKind;
use std::time::Duration;

/// Classify a non-2xx response.
///
/// A 403 only counts as a quota exhaustion when the API says so explicitly
/// (`X-RateLimit-Remaining: 0`) and tells us when the window resets;
/// without a reset time there is nothing sensible to wait for.
pub fn classify_response(resp: &Response) -> ErrorKind {
    match resp.status {
        404 => ErrorKind::NotFound,
        403 if quota_exhausted(resp) => match reset_time(resp) {
            Some(reset) => ErrorKind::RateLimited { reset },
            None => ErrorKind::Http(403),
        },
        403 | 429 => match retry_after(resp) {
            Some(d) => ErrorKind::Throttled {
                retry_after: Some(d),
            },
            None if resp.status == 429 => ErrorKind::Throttled { retry_after: None },
            None => ErrorKind::Http(403),
        },
        code => ErrorKind::Http(code),
    }
}

fn quota_exhausted(resp: &Response) -> bool {
    resp.header("x-ratelimit-remaining")
        .is_some_and(|v| v.trim() == "0")
}

/// `X-RateLimit-Reset` as Unix seconds.
pub fn reset_time(resp: &Response) -> Option<u64> {
    resp.header("x-ratelimit-reset")?.trim().parse().ok()
}

/// `Retry-After` in its delta-seconds form (the HTTP-date form is not used by the API).
pub fn retry_after(resp: &Response) -> Option<Duration> {
    resp.header("retry-after")?
        .trim()
        .parse()
        .ok()
        .map(Duration::from_secs)
}
