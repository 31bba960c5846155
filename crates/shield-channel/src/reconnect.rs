//! Connection retry policy
//!
//! Exponential backoff for establishing the channel socket. Applied only
//! while connecting; an established session that drops mid-stream fails the
//! session instead of silently resuming against fresh backend state.

use std::time::Duration;

/// Backoff policy for connection attempts.
#[derive(Debug, Clone)]
pub struct ReconnectConfig {
    /// Attempts before giving up.
    pub max_attempts: u32,
    /// Delay before the second attempt.
    pub base_delay: Duration,
    /// Cap on the delay between attempts.
    pub max_delay: Duration,
    /// Growth factor per attempt.
    pub backoff_multiplier: f64,
}

impl Default for ReconnectConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl ReconnectConfig {
    /// Delay to sleep before the given 1-based attempt. The first attempt
    /// runs immediately.
    pub fn delay_before(&self, attempt: u32) -> Duration {
        if attempt <= 1 {
            return Duration::ZERO;
        }
        let exponent = i32::try_from(attempt - 2).unwrap_or(i32::MAX);
        let exp = self.backoff_multiplier.powi(exponent);
        // Clamp as f64 first: the unclamped product overflows Duration for
        // large attempt numbers.
        let delay = (self.base_delay.as_secs_f64() * exp).min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(delay)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_attempt_is_immediate() {
        let config = ReconnectConfig::default();
        assert_eq!(config.delay_before(1), Duration::ZERO);
    }

    #[test]
    fn test_backoff_doubles_then_caps() {
        let config = ReconnectConfig {
            max_attempts: 10,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(6),
            backoff_multiplier: 2.0,
        };
        assert_eq!(config.delay_before(2), Duration::from_secs(1));
        assert_eq!(config.delay_before(3), Duration::from_secs(2));
        assert_eq!(config.delay_before(4), Duration::from_secs(4));
        assert_eq!(config.delay_before(5), Duration::from_secs(6));
        assert_eq!(config.delay_before(9), Duration::from_secs(6));
    }

    #[test]
    fn test_large_attempt_numbers_stay_at_the_cap() {
        let config = ReconnectConfig {
            max_attempts: 100,
            ..Default::default()
        };
        // The unclamped exponential exceeds what a Duration can hold well
        // before attempt 100; the cap must still apply.
        assert_eq!(config.delay_before(80), config.max_delay);
        assert_eq!(config.delay_before(u32::MAX), config.max_delay);
    }
}
