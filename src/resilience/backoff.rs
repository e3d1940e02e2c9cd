//! Exponential backoff with jitter for failed refreshes.

use rand::Rng;
use std::time::Duration;

/// Delay before the next fetch after `consecutive_failures` failures.
///
/// Doubles from the refresh interval up to `max`, with up to 10% jitter so a
/// fleet of instances does not hammer a recovering provider in lockstep.
pub fn refresh_backoff(consecutive_failures: u32, base: Duration, max: Duration) -> Duration {
    if consecutive_failures == 0 {
        return base;
    }

    let exponent = consecutive_failures.saturating_sub(1).min(16);
    let delay_ms = base
        .as_millis()
        .min(u64::MAX as u128) as u64;
    let delay_ms = delay_ms
        .saturating_mul(2u64.saturating_pow(exponent))
        .min(max.as_millis().min(u64::MAX as u128) as u64);

    let jitter_range = delay_ms / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(delay_ms + jitter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_and_caps() {
        let base = Duration::from_secs(2);
        let max = Duration::from_secs(30);

        let first = refresh_backoff(1, base, max);
        assert!(first >= base);

        let second = refresh_backoff(2, base, max);
        assert!(second.as_millis() >= 4_000);

        let capped = refresh_backoff(10, base, max);
        assert!(capped.as_millis() >= 30_000);
        assert!(capped.as_millis() <= 33_000);
    }

    #[test]
    fn zero_failures_is_the_plain_interval() {
        let base = Duration::from_secs(2);
        assert_eq!(refresh_backoff(0, base, Duration::from_secs(30)), base);
    }
}
