use crate::traits::error::{FeedError, Result};
use std::time::Duration;

/// Exponential backoff policy for reconnection delays
///
/// Delays grow as `base * factor^retry_count`, capped at `max`:
/// pure and deterministic, no jitter. With the default parameters
/// (1s base, factor 2.0, 30s cap) the delay saturates after six
/// consecutive failures.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    base: Duration,
    max: Duration,
    factor: f64,
}

impl BackoffPolicy {
    /// Create a new backoff policy
    ///
    /// # Arguments
    /// * `base` - Delay before the first retry (retry_count == 0)
    /// * `max` - Cap applied to every computed delay
    /// * `factor` - Growth factor per retry, must be >= 1.0
    pub fn new(base: Duration, max: Duration, factor: f64) -> Result<Self> {
        if !factor.is_finite() || factor < 1.0 {
            return Err(FeedError::Configuration(format!(
                "growth factor must be >= 1.0, got {}",
                factor
            )));
        }
        if base > max {
            return Err(FeedError::Configuration(format!(
                "base delay {:?} exceeds max delay {:?}",
                base, max
            )));
        }
        Ok(Self { base, max, factor })
    }

    /// Compute the delay before the next reconnection attempt
    ///
    /// Monotonically non-decreasing in `retry_count` up to the cap,
    /// and overflow-safe for arbitrarily large counts.
    pub fn next_delay(&self, retry_count: u32) -> Duration {
        let max_ms = self.max.as_millis() as f64;
        // powi(inf) past ~1000 doublings; min() against the cap absorbs it
        let exponent = retry_count.min(1024) as i32;
        let ms = self.base.as_millis() as f64 * self.factor.powi(exponent);
        Duration::from_millis(ms.min(max_ms) as u64)
    }

    /// Delay before the first retry
    pub fn base_delay(&self) -> Duration {
        self.base
    }

    /// Cap applied to every computed delay
    pub fn max_delay(&self) -> Duration {
        self.max
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_retry_uses_base_delay() {
        let policy =
            BackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(10), 2.0).unwrap();
        assert_eq!(policy.next_delay(0), Duration::from_millis(100));
    }

    #[test]
    fn doubles_until_capped() {
        let policy =
            BackoffPolicy::new(Duration::from_millis(500), Duration::from_secs(2), 2.0).unwrap();

        let delays: Vec<u64> = (0..6)
            .map(|i| policy.next_delay(i).as_millis() as u64)
            .collect();

        assert_eq!(delays, vec![500, 1000, 2000, 2000, 2000, 2000]);
    }

    #[test]
    fn monotone_and_deterministic() {
        let policy =
            BackoffPolicy::new(Duration::from_millis(250), Duration::from_secs(30), 1.7).unwrap();

        for attempt in 0..20 {
            let delay = policy.next_delay(attempt);
            assert_eq!(delay, policy.next_delay(attempt), "must be deterministic");
            assert!(
                delay <= policy.next_delay(attempt + 1),
                "must be non-decreasing at attempt {}",
                attempt
            );
            assert!(delay <= policy.max_delay());
        }
    }

    #[test]
    fn overflow_safe_at_extreme_counts() {
        let policy =
            BackoffPolicy::new(Duration::from_millis(100), Duration::from_secs(3600), 2.0).unwrap();

        assert_eq!(policy.next_delay(64), Duration::from_secs(3600));
        assert_eq!(policy.next_delay(u32::MAX), Duration::from_secs(3600));
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert!(BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30), 0.5).is_err());
        assert!(BackoffPolicy::new(Duration::from_secs(1), Duration::from_secs(30), f64::NAN).is_err());
        assert!(BackoffPolicy::new(Duration::from_secs(60), Duration::from_secs(30), 2.0).is_err());
    }
}
