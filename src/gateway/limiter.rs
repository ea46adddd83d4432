//! Sliding-window rate limiter for outbound exchange calls.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::config::RateLimitConfig;

/// Sliding-window rate limiter.
///
/// Tracks the timestamp of every admitted call and refuses new calls while
/// the window already holds `max_requests` of them. Shared across all
/// gateway operations; safe for any number of concurrent callers.
/// Admission order is not FIFO — whichever waiter polls first after the
/// window frees a slot wins — but no caller ever bypasses the cap.
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per window.
    max_requests: u32,
    /// Window duration.
    window: Duration,
    /// Timestamps of admitted requests, oldest first.
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    /// Creates a new rate limiter.
    #[must_use]
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            timestamps: Mutex::new(VecDeque::with_capacity(max_requests as usize)),
        }
    }

    /// Creates a rate limiter for requests per second.
    #[must_use]
    pub fn per_second(max_requests: u32) -> Self {
        Self::new(max_requests, Duration::from_secs(1))
    }

    #[must_use]
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::per_second(config.requests_per_second)
    }

    /// Time to wait before the next request can be admitted.
    #[must_use]
    pub fn wait_time(&self) -> Duration {
        let mut timestamps = self.timestamps.lock();
        let now = Instant::now();
        Self::evict_expired(&mut timestamps, now, self.window);

        if timestamps.len() >= self.max_requests as usize {
            if let Some(&oldest) = timestamps.front() {
                let elapsed = now.duration_since(oldest);
                if elapsed < self.window {
                    return self.window - elapsed;
                }
            }
        }

        Duration::ZERO
    }

    /// Admit a request now if the window has room; record it and return
    /// `true`, or return `false` without recording.
    pub fn try_acquire(&self) -> bool {
        let mut timestamps = self.timestamps.lock();
        let now = Instant::now();
        Self::evict_expired(&mut timestamps, now, self.window);

        if timestamps.len() >= self.max_requests as usize {
            return false;
        }
        timestamps.push_back(now);
        true
    }

    /// Suspend until the window admits a request, then record it.
    pub async fn acquire(&self) {
        loop {
            if self.try_acquire() {
                return;
            }
            let wait = self.wait_time();
            if wait.is_zero() {
                // A slot freed between the two checks; try again immediately.
                continue;
            }
            tokio::time::sleep(wait).await;
        }
    }

    /// Requests currently inside the window.
    #[must_use]
    pub fn current_count(&self) -> usize {
        let mut timestamps = self.timestamps.lock();
        Self::evict_expired(&mut timestamps, Instant::now(), self.window);
        timestamps.len()
    }

    #[must_use]
    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    fn evict_expired(timestamps: &mut VecDeque<Instant>, now: Instant, window: Duration) {
        while let Some(&oldest) = timestamps.front() {
            if now.duration_since(oldest) >= window {
                timestamps.pop_front();
            } else {
                break;
            }
        }
    }
}
