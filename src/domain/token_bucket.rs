//! Token bucket used for per-client admission control.

use std::time::Instant;

/// Refill rate and capacity shared by every client bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateLimitPolicy {
    /// Tokens added per second.
    pub per_second: f64,
    /// Maximum number of tokens a bucket can hold.
    pub burst: u32,
}

impl Default for RateLimitPolicy {
    /// 2 requests per second with a burst of 4.
    fn default() -> Self {
        Self {
            per_second: 2.0,
            burst: 4,
        }
    }
}

/// A capacity-bounded, refillable token bucket for a single client.
///
/// The bucket holds a fractional token count. Every call to
/// [`try_acquire`](Self::try_acquire) first credits `elapsed * per_second`
/// tokens (capped at `burst`), then consumes one token if available.
///
/// The bucket never reads the clock itself; callers pass the current instant so
/// the owning registry controls time.
#[derive(Debug, Clone)]
pub struct TokenBucket {
    per_second: f64,
    burst: f64,
    tokens: f64,
    last_refill: Instant,
}

impl TokenBucket {
    /// Creates a full bucket.
    pub fn new(policy: RateLimitPolicy, now: Instant) -> Self {
        let burst = f64::from(policy.burst);
        Self {
            per_second: policy.per_second,
            burst,
            tokens: burst,
            last_refill: now,
        }
    }

    /// Takes one token if available. Never blocks.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        self.refill(now);

        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    /// Current token balance (fractional).
    pub fn available(&self) -> f64 {
        self.tokens
    }

    fn refill(&mut self, now: Instant) {
        // An earlier `now` than the last refill credits nothing.
        let elapsed = now.saturating_duration_since(self.last_refill);
        if elapsed.is_zero() {
            return;
        }

        self.tokens = (self.tokens + elapsed.as_secs_f64() * self.per_second).min(self.burst);
        self.last_refill = now;
    }
}
