//! Rate-limit detection
//!
//! The API signals two kinds of throttling. Primary quota exhaustion carries
//! `x-ratelimit-remaining: 0` and a reset timestamp; it is worth one retry
//! once the window resets. Secondary limits (abuse detection) come as a 429
//! or a 403 with `retry-after` while quota remains; those are not retried.

use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use std::time::Duration;

/// Wait applied when quota is exhausted but the API gave no reset hint
const DEFAULT_RESET_WAIT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Throttle {
    None,
    RateLimited { retry_after: Duration },
    AbuseDetected { retry_after: Option<Duration> },
}

/// Classifies a response by its status and rate-limit headers
pub(crate) fn classify(status: StatusCode, headers: &HeaderMap, now: DateTime<Utc>) -> Throttle {
    if status != StatusCode::FORBIDDEN && status != StatusCode::TOO_MANY_REQUESTS {
        return Throttle::None;
    }

    let retry_after = header_i64(headers, "retry-after")
        .map(|secs| Duration::from_secs(secs.max(0) as u64));

    if header_i64(headers, "x-ratelimit-remaining") == Some(0) {
        let until_reset = header_i64(headers, "x-ratelimit-reset")
            .map(|reset| Duration::from_secs((reset - now.timestamp()).max(0) as u64));

        return Throttle::RateLimited {
            retry_after: retry_after.or(until_reset).unwrap_or(DEFAULT_RESET_WAIT),
        };
    }

    if status == StatusCode::TOO_MANY_REQUESTS || retry_after.is_some() {
        return Throttle::AbuseDetected { retry_after };
    }

    Throttle::None
}

fn header_i64(headers: &HeaderMap, name: &str) -> Option<i64> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
