//! Retry and rate-limit policy.
//!
//! This module encapsulates response classification (quota exhaustion,
//! throttling, not found) and retry decisions so the fetcher loop stays a
//! thin driver around them.

mod classify;
mod error;
mod policy;

pub use classify::{classify_response, reset_time, retry_after};
pub use error::FetchError;
pub use policy::{ErrorKind, FetchPolicy, RetryDecision};
