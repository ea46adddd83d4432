//! Canonical test configurations.
//!
//! Single source of truth for config structs used across tests.
//! Avoids each test module defining its own slightly-different defaults.

use std::time::Duration;

use crate::config::{RateLimitConfig, RetryConfig};
use crate::gateway::GatewayConfig;

/// Retry config with zero backoff — no waiting in tests.
pub fn fast_retry() -> RetryConfig {
    RetryConfig {
        max_retries: 3,
        initial_backoff_ms: 0,
        backoff_multiplier: 1.0,
        max_backoff_ms: 0,
    }
}

/// Rate limit high enough to never throttle a test.
pub fn unthrottled() -> RateLimitConfig {
    RateLimitConfig {
        requests_per_second: 10_000,
    }
}

/// Gateway config with zero backoff and an effectively unlimited rate.
///
/// For tests that need specific pacing or retry behavior, override
/// individual fields on the returned struct.
pub fn gateway() -> GatewayConfig {
    GatewayConfig {
        rate_limit: unthrottled(),
        retry: fast_retry(),
        call_timeout: Duration::from_secs(5),
    }
}
