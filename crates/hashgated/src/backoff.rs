use crate::config::RelayConfig;
use rand::Rng;
use std::time::Duration;

/// Exponential backoff with randomized jitter, used between device
/// reconnection attempts.
#[derive(Debug)]
pub struct ExponentialBackoff {
    initial: Duration,
    max: Duration,
    factor: f64,
    current: Duration,
}

impl ExponentialBackoff {
    /// Creates a new `ExponentialBackoff` with the given parameters.
    #[must_use]
    pub const fn new(initial: Duration, max: Duration, factor: f64) -> Self {
        Self {
            initial,
            max,
            factor,
            current: initial,
        }
    }

    /// Creates a backoff from the relay's reconnect settings.
    #[must_use]
    pub const fn from_config(config: &RelayConfig) -> Self {
        Self::new(
            Duration::from_millis(config.reconnect_initial_ms),
            Duration::from_millis(config.reconnect_max_ms),
            config.reconnect_factor,
        )
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_precision_loss,
        clippy::cast_sign_loss
    )]
    /// Compute the next delay (with ±25% jitter) and advance the internal state.
    pub fn next_delay(&mut self) -> Duration {
        let current_ms = self.current.as_millis().min(u128::from(u64::MAX)) as u64;

        let jitter_factor = rand::thread_rng().gen_range(0.75..=1.25);
        let delay = Duration::from_millis((current_ms as f64 * jitter_factor) as u64);

        let next_ms = (current_ms as f64 * self.factor) as u64;
        let next = Duration::from_millis(next_ms.min(self.max.as_millis() as u64));
        self.current = next.min(self.max);

        delay
    }

    /// Reset the backoff to its initial delay, after a successful connection.
    pub fn reset(&mut self) {
        self.current = self.initial;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backoff() -> ExponentialBackoff {
        ExponentialBackoff::new(Duration::from_millis(100), Duration::from_millis(2000), 2.0)
    }

    #[test]
    fn first_delay_is_initial_with_jitter() {
        let mut b = backoff();
        let delay = b.next_delay();
        assert!(delay >= Duration::from_millis(75));
        assert!(delay <= Duration::from_millis(125));
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn delays_never_exceed_max_with_jitter() {
        let mut b = backoff();
        for _ in 0..20 {
            let delay = b.next_delay();
            assert!(delay.as_millis() as f64 <= 2000.0 * 1.25 + 1.0);
        }
    }

    #[test]
    fn delays_grow_toward_max() {
        let mut b = backoff();
        for _ in 0..10 {
            b.next_delay();
        }
        // After 10 doublings from 100ms the internal state is pinned at max
        let settled = b.next_delay();
        assert!(settled >= Duration::from_millis(1500));
    }

    #[test]
    fn reset_returns_to_initial_range() {
        let mut b = backoff();
        for _ in 0..10 {
            b.next_delay();
        }
        b.reset();
        let delay = b.next_delay();
        assert!(delay <= Duration::from_millis(125));
    }

    #[test]
    fn factor_one_never_grows() {
        let mut b =
            ExponentialBackoff::new(Duration::from_millis(100), Duration::from_millis(2000), 1.0);
        for _ in 0..5 {
            let delay = b.next_delay();
            assert!(delay >= Duration::from_millis(75));
            assert!(delay <= Duration::from_millis(125));
        }
    }

    #[test]
    fn from_config_uses_reconnect_settings() {
        let config = RelayConfig {
            device: "127.0.0.1:4000".parse().unwrap(),
            listen: "127.0.0.1:8080".parse().unwrap(),
            metrics_addr: "127.0.0.1:9090".parse().unwrap(),
            secret: "s".to_string(),
            reconnect_initial_ms: 10,
            reconnect_max_ms: 20,
            reconnect_factor: 2.0,
        };
        let mut b = ExponentialBackoff::from_config(&config);
        let delay = b.next_delay();
        assert!(delay <= Duration::from_millis(13));
    }
}
