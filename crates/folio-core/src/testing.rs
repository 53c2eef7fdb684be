//! Test doubles for the transport and the clock.

use crate::clock::Clock;
use crate::http::{Response, Transport};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

/// CURLE_COULDNT_CONNECT.
pub fn transport_error() -> curl::Error {
    curl::Error::new(7)
}

/// Serves queued responses per URL; the last queued response repeats.
/// Unknown URLs get a transport error.
#[derive(Default)]
pub struct FakeTransport {
    routes: RefCell<HashMap<String, VecDeque<Result<Response, curl::Error>>>>,
    calls: RefCell<Vec<(String, Vec<(String, String)>)>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, url: &str, result: Result<Response, curl::Error>) {
        self.routes
            .borrow_mut()
            .entry(url.to_string())
            .or_default()
            .push_back(result);
    }

    pub fn ok(&self, url: &str, status: u32, content_type: &str, body: &str) {
        let headers = if content_type.is_empty() {
            Vec::new()
        } else {
            vec![("Content-Type".to_string(), content_type.to_string())]
        };
        self.push(url, Ok(Response::new(status, headers, body)));
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.borrow().iter().filter(|(u, _)| u == url).count()
    }

    pub fn urls(&self) -> Vec<String> {
        self.calls.borrow().iter().map(|(u, _)| u.clone()).collect()
    }

    pub fn headers_sent(&self, url: &str) -> Vec<(String, String)> {
        self.calls
            .borrow()
            .iter()
            .rev()
            .find(|(u, _)| u == url)
            .map(|(_, h)| h.clone())
            .unwrap_or_default()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str, headers: &[(String, String)]) -> Result<Response, curl::Error> {
        self.calls
            .borrow_mut()
            .push((url.to_string(), headers.to_vec()));
        let mut routes = self.routes.borrow_mut();
        let queue = match routes.get_mut(url) {
            Some(q) => q,
            None => return Err(transport_error()),
        };
        if queue.len() > 1 {
            queue.pop_front().unwrap_or_else(|| Err(transport_error()))
        } else {
            match queue.front() {
                Some(Ok(resp)) => Ok(resp.clone()),
                Some(Err(e)) => Err(curl::Error::new(e.code())),
                None => Err(transport_error()),
            }
        }
    }
}

/// Records sleeps instead of blocking; sleeping advances the clock.
pub struct FakeClock {
    now: Cell<u64>,
    sleeps: RefCell<Vec<Duration>>,
}

impl FakeClock {
    pub fn at(now: u64) -> Self {
        Self {
            now: Cell::new(now),
            sleeps: RefCell::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for FakeClock {
    fn now_unix(&self) -> u64 {
        self.now.get()
    }

    fn sleep(&self, d: Duration) {
        self.sleeps.borrow_mut().push(d);
        self.now.set(self.now.get() + d.as_secs());
    }
}
