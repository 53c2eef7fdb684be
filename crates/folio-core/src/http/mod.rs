//! Blocking HTTP GET over libcurl.
//!
//! Every request gets a fresh `Easy` handle so connections are released as
//! soon as the call returns. Callers above this layer only see [`Transport`].

mod parse;

pub(crate) use parse::parse_headers;

use std::str;
use std::time::Duration;

/// A buffered HTTP response.
#[derive(Debug, Clone, Default)]
pub struct Response {
    pub status: u32,
    /// Header lines of the final response in the redirect chain, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(status: u32, headers: Vec<(String, String)>, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Case-insensitive header lookup; the last occurrence wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Media type without parameters, lower-cased (`text/css; charset=utf-8` -> `text/css`).
    pub fn content_type(&self) -> Option<String> {
        let raw = self.header("content-type")?;
        let mime = raw.split(';').next()?.trim().to_ascii_lowercase();
        if mime.is_empty() {
            None
        } else {
            Some(mime)
        }
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Something that can perform a GET. `CurlTransport` in production, fakes in tests.
pub trait Transport {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Response, curl::Error>;
}

/// libcurl-backed transport.
#[derive(Debug, Clone)]
pub struct CurlTransport {
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for CurlTransport {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(15),
            timeout: Duration::from_secs(120),
            user_agent: concat!("folio/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Transport for CurlTransport {
    fn get(&self, url: &str, custom_headers: &[(String, String)]) -> Result<Response, curl::Error> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut body: Vec<u8> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.accept_encoding("")?;

        let mut list = curl::easy::List::new();
        for (k, v) in custom_headers {
            list.append(&format!("{}: {}", k.trim(), v.trim()))?;
        }
        if !custom_headers.is_empty() {
            easy.http_headers(list)?;
        }

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    header_lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }

        let status = easy.response_code()?;
        Ok(Response {
            status,
            headers: parse_headers(&header_lines),
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resp(headers: &[(&str, &str)]) -> Response {
        Response::new(
            200,
            headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            Vec::new(),
        )
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let r = resp(&[("X-RateLimit-Remaining", "0")]);
        assert_eq!(r.header("x-ratelimit-remaining"), Some("0"));
        assert_eq!(r.header("x-ratelimit-reset"), None);
    }

    #[test]
    fn content_type_drops_parameters() {
        let r = resp(&[("Content-Type", "Text/CSS; charset=utf-8")]);
        assert_eq!(r.content_type().as_deref(), Some("text/css"));
        assert_eq!(resp(&[]).content_type(), None);
    }

    #[test]
    fn success_range() {
        assert!(Response::new(204, vec![], "").is_success());
        assert!(!Response::new(304, vec![], "").is_success());
        assert!(!Response::new(403, vec![], "").is_success());
    }
}
