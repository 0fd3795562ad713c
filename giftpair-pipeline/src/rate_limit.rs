//! Token-bucket limiter for calls to the judgment service.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

/// Allows bursts of up to `capacity` calls, refilling one permit every
/// `interval`.
pub struct RateLimiter {
    capacity: f64,
    interval: Duration,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    pub fn new(capacity: u32, interval: Duration) -> Self {
        let capacity = f64::from(capacity.max(1));
        Self {
            capacity,
            interval,
            bucket: Mutex::new(Bucket {
                tokens: capacity,
                last_refill: Instant::now(),
            }),
        }
    }

    /// One call per `interval`, no bursting.
    pub fn per_interval(interval: Duration) -> Self {
        Self::new(1, interval)
    }

    /// Never waits.
    pub fn unlimited() -> Self {
        Self::new(1, Duration::ZERO)
    }

    /// Wait until a permit is available and take it.
    pub async fn acquire(&self) {
        if self.interval.is_zero() {
            return;
        }
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill);
                let refilled = elapsed.as_secs_f64() / self.interval.as_secs_f64();
                bucket.tokens = (bucket.tokens + refilled).min(self.capacity);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                self.interval.mul_f64(1.0 - bucket.tokens)
            };
            tokio::time::sleep(wait).await;
        }
    }
}
