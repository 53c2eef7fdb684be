//! Wall clock and sleeping.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

pub trait Clock {
    /// Current Unix time in whole seconds.
    fn now_unix(&self) -> u64;
    /// Block the current thread for `d`.
    fn sleep(&self, d: Duration);
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }

    fn sleep(&self, d: Duration) {
        if !d.is_zero() {
            std::thread::sleep(d);
        }
    }
}
