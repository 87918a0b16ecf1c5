//! Deterministic observation-batch generation and test synchronization.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::{RngExt as _, SeedableRng};

use oppnet_selector::profile::ScanObservation;

/// Generates one observation per network id with signal levels jittered
/// around `base_level`. Seeded, so scenarios are reproducible.
pub fn jittered_observations(
    network_ids: &[&str],
    base_level: i32,
    jitter: i32,
    seed: u64,
) -> Vec<ScanObservation> {
    let mut rng = StdRng::seed_from_u64(seed);
    network_ids
        .iter()
        .map(|id| {
            let offset = if jitter > 0 {
                rng.random_range(-jitter..=jitter)
            } else {
                0
            };
            ScanObservation::new(*id, base_level + offset)
        })
        .collect()
}

/// Polls `condition` until it holds or `timeout` elapses. Returns whether
/// the condition was observed.
pub fn wait_until(timeout: Duration, condition: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(2));
    }
    condition()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jitter_is_reproducible_for_a_seed() {
        let a = jittered_observations(&["310210", "310211"], 3, 2, 42);
        let b = jittered_observations(&["310210", "310211"], 3, 2, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn jitter_stays_within_bounds() {
        for obs in jittered_observations(&["310210"; 50], 3, 2, 7) {
            assert!((1..=5).contains(&obs.signal_level));
        }
    }

    #[test]
    fn zero_jitter_is_exact() {
        let obs = jittered_observations(&["310210"], 4, 0, 0);
        assert_eq!(obs[0].signal_level, 4);
    }

    #[test]
    fn wait_until_observes_immediate_condition() {
        assert!(wait_until(Duration::from_millis(10), || true));
        assert!(!wait_until(Duration::from_millis(10), || false));
    }
}
