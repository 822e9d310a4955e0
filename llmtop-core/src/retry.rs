//! Guarded fetching
//!
//! Wraps every source fetch so that no error and no panic path escapes into
//! the tick. Transient errors are retried with a doubling backoff; anything
//! else, or running out of attempts, comes back as a plain value the
//! scheduler records against the source's cache entry.

use std::time::Duration;

use crate::source::{fetch_payload, DataSource, FetchFailure, SourceKind, SourcePayload};

#[derive(Clone, Debug)]
pub struct RetryPolicy {
    /// Total attempts, first try included
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after every failure
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(1),
        }
    }
}

/// Fetch one source payload under the retry policy. Returns the terminal
/// error with its attempt count instead of ever propagating mid-tick.
pub async fn guarded_fetch(
    source: &dyn DataSource,
    kind: &SourceKind,
    policy: &RetryPolicy,
) -> Result<SourcePayload, FetchFailure> {
    let max_attempts = policy.max_attempts.max(1);
    let mut delay = policy.base_delay;
    let mut attempt = 0;

    loop {
        attempt += 1;
        match fetch_payload(source, kind).await {
            Ok(payload) => return Ok(payload),
            Err(error) => {
                if !error.is_transient() || attempt >= max_attempts {
                    return Err(FetchFailure {
                        error,
                        attempts: attempt,
                    });
                }
                tracing::debug!(
                    source = %kind,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "transient fetch error, retrying: {}",
                    error
                );
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
        }
    }
}
