//! Token bucket rate limiter for API requests
//!
//! The bucket starts full with `burst` tokens and refills at `qps` tokens per
//! second. Each request takes one token, waiting for a refill when empty.
//! A negative `qps` disables limiting; zero falls back to `DEFAULT_CLIENT_QPS`.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

/// Rate used when `qps` is left at zero, matching client-go's default
pub const DEFAULT_CLIENT_QPS: f32 = 5.0;

#[derive(Debug)]
struct Bucket {
    tokens: f64,
    last_refill: Instant,
}

#[derive(Debug)]
pub struct RateLimiter {
    qps: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl RateLimiter {
    /// Limiter for the given rate, `None` when `qps` is negative
    pub fn new(qps: f32, burst: u32) -> Option<Self> {
        if qps < 0.0 {
            return None;
        }
        let qps = if qps == 0.0 { DEFAULT_CLIENT_QPS } else { qps };
        let burst = f64::from(burst.max(1));
        Some(Self {
            qps: f64::from(qps),
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last_refill: Instant::now(),
            }),
        })
    }

    /// Wait until a request may be sent
    pub async fn acquire(&self) {
        loop {
            let wait = {
                let mut bucket = self.bucket.lock().await;
                let now = Instant::now();
                let elapsed = now.duration_since(bucket.last_refill).as_secs_f64();
                bucket.tokens = (bucket.tokens + elapsed * self.qps).min(self.burst);
                bucket.last_refill = now;

                if bucket.tokens >= 1.0 {
                    bucket.tokens -= 1.0;
                    return;
                }
                Duration::from_secs_f64((1.0 - bucket.tokens) / self.qps)
            };
            tracing::trace!("Rate limited, waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_qps_disables() {
        assert!(RateLimiter::new(-1.0, 100).is_none());
        assert!(RateLimiter::new(25.0, 100).is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_qps_uses_client_default() {
        let limiter = RateLimiter::new(0.0, 1).unwrap();
        let start = Instant::now();

        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(199), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(300), "elapsed {:?}", elapsed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_then_steady_rate() {
        let limiter = RateLimiter::new(2.0, 3).unwrap();
        let start = Instant::now();

        for _ in 0..3 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(1));

        limiter.acquire().await;
        limiter.acquire().await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(999), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1100), "elapsed {:?}", elapsed);
    }
}
