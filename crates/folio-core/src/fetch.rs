//! Authenticated GET with bounded retry and rate-limit back-off.
//!
//! Ordinary failures (transport errors, non-2xx) are retried up to
//! `max_attempts` with a fixed delay. An exhausted API quota is waited out
//! until the advertised reset time and does not consume an attempt, so that
//! path is bounded only by `max_rate_limit_wait` when one is configured. The
//! same cap applies to a server-supplied `Retry-After`.

use crate::clock::{Clock, SystemClock};
use crate::http::{CurlTransport, Response, Transport};
use crate::retry::{classify_response, ErrorKind, FetchError, FetchPolicy, RetryDecision};
use std::time::Duration;

const API_ACCEPT: &str = "application/vnd.github+json";

pub struct Fetcher<T = CurlTransport, C = SystemClock> {
    transport: T,
    clock: C,
    policy: FetchPolicy,
    api_base: Option<String>,
    token: Option<String>,
}

impl Fetcher {
    /// Production fetcher: libcurl transport, real clock.
    pub fn system(policy: FetchPolicy) -> Self {
        Fetcher::new(CurlTransport::default(), SystemClock, policy)
    }
}

impl<T: Transport, C: Clock> Fetcher<T, C> {
    pub fn new(transport: T, clock: C, policy: FetchPolicy) -> Self {
        Self {
            transport,
            clock,
            policy,
            api_base: None,
            token: None,
        }
    }

    /// Marks `api_base` as the API root. Requests under it get the API `Accept`
    /// header and, when `token` is set, a bearer `Authorization` header.
    /// Requests elsewhere (asset hosts) are sent without credentials.
    pub fn with_api(mut self, api_base: &str, token: Option<String>) -> Self {
        self.api_base = Some(api_base.trim_end_matches('/').to_string());
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    #[cfg(test)]
    pub(crate) fn transport(&self) -> &T {
        &self.transport
    }

    fn is_api_url(&self, url: &str) -> bool {
        match &self.api_base {
            Some(base) => url
                .strip_prefix(base.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/')),
            None => false,
        }
    }

    /// Fails when a server-imposed wait exceeds the configured cap.
    fn check_wait(&self, url: &str, wait: Duration) -> Result<(), FetchError> {
        match self.policy.max_rate_limit_wait {
            Some(cap) if wait > cap => Err(FetchError::RateLimitWaitTooLong {
                url: url.to_string(),
                wait,
                cap,
            }),
            _ => Ok(()),
        }
    }

    fn headers_for(&self, url: &str) -> Vec<(String, String)> {
        let mut headers = Vec::new();
        if self.is_api_url(url) {
            headers.push(("Accept".to_string(), API_ACCEPT.to_string()));
            if let Some(token) = &self.token {
                headers.push(("Authorization".to_string(), format!("Bearer {}", token)));
            }
        }
        headers
    }

    /// GET `url`, retrying per policy. Returns the first 2xx response, or the
    /// last failure once the policy says stop.
    pub fn get(&self, url: &str) -> Result<Response, FetchError> {
        let headers = self.headers_for(url);
        let mut attempt = 1u32;
        loop {
            tracing::debug!(url, attempt, "GET");
            let (kind, err) = match self.transport.get(url, &headers) {
                Ok(resp) if resp.is_success() => return Ok(resp),
                Ok(resp) => {
                    let kind = classify_response(&resp);
                    let err = if kind == ErrorKind::NotFound {
                        FetchError::NotFound {
                            url: url.to_string(),
                        }
                    } else {
                        FetchError::Http {
                            url: url.to_string(),
                            status: resp.status,
                        }
                    };
                    (kind, err)
                }
                Err(source) => (
                    ErrorKind::Transport,
                    FetchError::Transport {
                        url: url.to_string(),
                        source,
                    },
                ),
            };

            match self.policy.decide(attempt, kind, self.clock.now_unix()) {
                RetryDecision::NoRetry => return Err(err),
                RetryDecision::WaitForReset(wait) => {
                    self.check_wait(url, wait)?;
                    tracing::warn!("rate limit reached; waiting {}s before retrying", wait.as_secs());
                    self.clock.sleep(wait);
                }
                RetryDecision::RetryAfter(delay) => {
                    if let ErrorKind::Throttled {
                        retry_after: Some(_),
                    } = kind
                    {
                        self.check_wait(url, delay)?;
                    }
                    tracing::warn!("attempt {} failed: {}", attempt, err);
                    self.clock.sleep(delay);
                    attempt += 1;
                }
            }
        }
    }

    /// Like [`Fetcher::get`], but a 404 yields `Ok(None)`.
    pub fn get_optional(&self, url: &str) -> Result<Option<Response>, FetchError> {
        match self.get(url) {
            Ok(resp) => Ok(Some(resp)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{transport_error, FakeClock, FakeTransport};

    const URL: &str = "https://api.github.com/users/octo/repos";

    fn fetcher(transport: FakeTransport) -> Fetcher<FakeTransport, FakeClock> {
        Fetcher::new(transport, FakeClock::at(1_000), FetchPolicy::default())
    }

    #[test]
    fn returns_first_success() {
        let t = FakeTransport::new();
        t.push(URL, Ok(Response::new(200, vec![], "[]")));
        let f = fetcher(t);
        let resp = f.get(URL).unwrap();
        assert_eq!(resp.text(), "[]");
        assert!(f.clock().sleeps().is_empty());
    }

    #[test]
    fn rate_limited_waits_for_reset_and_returns_retried_response() {
        let t = FakeTransport::new();
        t.push(
            URL,
            Ok(Response::new(
                403,
                vec![
                    ("X-RateLimit-Remaining".into(), "0".into()),
                    ("X-RateLimit-Reset".into(), "1005".into()),
                ],
                "",
            )),
        );
        t.push(URL, Ok(Response::new(200, vec![], "ok")));
        let f = fetcher(t);
        let resp = f.get(URL).unwrap();
        assert_eq!(resp.text(), "ok");
        let sleeps = f.clock().sleeps();
        assert_eq!(sleeps.len(), 1);
        assert!(sleeps[0] >= Duration::from_secs(5) && sleeps[0] <= Duration::from_secs(6));
    }

    #[test]
    fn rate_limit_waits_do_not_consume_attempts() {
        let t = FakeTransport::new();
        let limited = Response::new(
            403,
            vec![
                ("X-RateLimit-Remaining".into(), "0".into()),
                ("X-RateLimit-Reset".into(), "1001".into()),
            ],
            "",
        );
        for _ in 0..4 {
            t.push(URL, Ok(limited.clone()));
        }
        t.push(URL, Err(transport_error()));
        t.push(URL, Err(transport_error()));
        t.push(URL, Ok(Response::new(200, vec![], "ok")));
        let f = fetcher(t);
        assert!(f.get(URL).is_ok());
    }

    #[test]
    fn gives_up_after_max_attempts_with_last_error() {
        let t = FakeTransport::new();
        for _ in 0..4 {
            t.push(URL, Err(transport_error()));
        }
        let f = fetcher(t);
        let err = f.get(URL).unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
        assert_eq!(f.transport.calls(URL), 3);
        assert_eq!(f.clock().sleeps(), vec![Duration::from_secs(1); 2]);
    }

    #[test]
    fn last_error_is_the_one_returned() {
        let t = FakeTransport::new();
        t.push(URL, Err(transport_error()));
        t.push(URL, Err(transport_error()));
        t.push(URL, Ok(Response::new(502, vec![], "")));
        let f = fetcher(t);
        match f.get(URL).unwrap_err() {
            FetchError::Http { status, .. } => assert_eq!(status, 502),
            other => panic!("expected HTTP 502, got {other}"),
        }
    }

    #[test]
    fn not_found_is_not_retried() {
        let t = FakeTransport::new();
        t.push(URL, Ok(Response::new(404, vec![], "")));
        let f = fetcher(t);
        assert!(f.get_optional(URL).unwrap().is_none());
        assert_eq!(f.transport.calls(URL), 1);
    }

    #[test]
    fn rate_limit_cap_fails_fast() {
        let t = FakeTransport::new();
        t.push(
            URL,
            Ok(Response::new(
                403,
                vec![
                    ("X-RateLimit-Remaining".into(), "0".into()),
                    ("X-RateLimit-Reset".into(), "4600".into()),
                ],
                "",
            )),
        );
        let policy = FetchPolicy {
            max_rate_limit_wait: Some(Duration::from_secs(60)),
            ..FetchPolicy::default()
        };
        let f = Fetcher::new(t, FakeClock::at(1_000), policy);
        let err = f.get(URL).unwrap_err();
        assert!(matches!(err, FetchError::RateLimitWaitTooLong { .. }));
        assert!(f.clock().sleeps().is_empty());
    }

    #[test]
    fn retry_after_beyond_cap_fails_fast() {
        let t = FakeTransport::new();
        t.push(
            URL,
            Ok(Response::new(429, vec![("Retry-After".into(), "3600".into())], "")),
        );
        let policy = FetchPolicy {
            max_rate_limit_wait: Some(Duration::from_secs(60)),
            ..FetchPolicy::default()
        };
        let f = Fetcher::new(t, FakeClock::at(1_000), policy);
        match f.get(URL).unwrap_err() {
            FetchError::RateLimitWaitTooLong { wait, cap, .. } => {
                assert_eq!(wait, Duration::from_secs(3600));
                assert_eq!(cap, Duration::from_secs(60));
            }
            other => panic!("expected capped wait, got {other}"),
        }
        assert!(f.clock().sleeps().is_empty());
        assert_eq!(f.transport.calls(URL), 1);
    }

    #[test]
    fn retry_after_within_cap_is_honored() {
        let t = FakeTransport::new();
        t.push(
            URL,
            Ok(Response::new(429, vec![("Retry-After".into(), "30".into())], "")),
        );
        t.push(URL, Ok(Response::new(200, vec![], "ok")));
        let policy = FetchPolicy {
            max_rate_limit_wait: Some(Duration::from_secs(60)),
            ..FetchPolicy::default()
        };
        let f = Fetcher::new(t, FakeClock::at(1_000), policy);
        assert_eq!(f.get(URL).unwrap().text(), "ok");
        assert_eq!(f.clock().sleeps(), vec![Duration::from_secs(30)]);
    }

    #[test]
    fn token_only_sent_to_api() {
        let t = FakeTransport::new();
        t.push(URL, Ok(Response::new(200, vec![], "")));
        t.push("https://cdn.example.com/a.png", Ok(Response::new(200, vec![], "")));
        t.push(
            "https://api.github.com.evil.example/x",
            Ok(Response::new(200, vec![], "")),
        );
        let f = fetcher(t).with_api("https://api.github.com/", Some("s3cret".into()));
        f.get(URL).unwrap();
        f.get("https://cdn.example.com/a.png").unwrap();
        f.get("https://api.github.com.evil.example/x").unwrap();

        let api_headers = f.transport.headers_sent(URL);
        assert!(api_headers
            .iter()
            .any(|(k, v)| k == "Authorization" && v == "Bearer s3cret"));
        assert!(f.transport.headers_sent("https://cdn.example.com/a.png").is_empty());
        assert!(f
            .transport
            .headers_sent("https://api.github.com.evil.example/x")
            .is_empty());
    }
}
