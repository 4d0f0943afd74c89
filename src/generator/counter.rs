use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

use super::NonceGenerator;
use crate::clock::{Clock, SystemClock};
use crate::types::Nonce;

/// Scale applied to the nanosecond seed. Kept for compatibility with nonces
/// already issued against long-lived API keys; the product wraps in `u64`.
const SEED_SCALE: u64 = 1_000_000;

static GLOBAL: OnceLock<CounterNonceGenerator> = OnceLock::new();

/// Lock-free counter seeded once from the clock.
///
/// Every call is a single atomic increment. Values wrap at `u64::MAX`; with a
/// seed drawn from the clock that is out of reach in practice.
#[derive(Debug)]
pub struct CounterNonceGenerator {
    counter: AtomicU64,
}

impl CounterNonceGenerator {
    pub fn new() -> Self {
        Self::with_clock(&SystemClock)
    }

    pub fn with_clock(clock: &impl Clock) -> Self {
        Self::starting_at(clock.now_nanos().wrapping_mul(SEED_SCALE))
    }

    pub const fn starting_at(seed: u64) -> Self {
        Self {
            counter: AtomicU64::new(seed),
        }
    }

    /// The process-wide instance behind [`get_nonce`], seeded on first use.
    pub fn global() -> &'static Self {
        GLOBAL.get_or_init(Self::new)
    }

    pub fn next_nonce(&self) -> Nonce {
        let previous = self.counter.fetch_add(1, Ordering::Relaxed);
        Nonce::new(previous.wrapping_add(1))
    }

    pub fn get_nonce(&self) -> String {
        self.next_nonce().to_string()
    }

    /// Last issued value, or the seed if nothing was issued yet.
    pub fn current(&self) -> Nonce {
        Nonce::new(self.counter.load(Ordering::Relaxed))
    }
}

impl Default for CounterNonceGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl NonceGenerator for CounterNonceGenerator {
    fn next_nonce(&self) -> Nonce {
        CounterNonceGenerator::next_nonce(self)
    }
}

/// Next value of the process-wide counter, in decimal.
pub fn get_nonce() -> String {
    CounterNonceGenerator::global().get_nonce()
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::thread;

    use super::{get_nonce, CounterNonceGenerator, SEED_SCALE};
    use crate::clock::{Clock, ManualClock, SystemClock};
    use crate::types::Nonce;

    #[test]
    fn first_call_returns_seed_plus_one() {
        let generator = CounterNonceGenerator::starting_at(41);
        assert_eq!(generator.current(), Nonce::new(41));
        assert_eq!(generator.get_nonce(), "42");
        assert_eq!(generator.get_nonce(), "43");
        assert_eq!(generator.current(), Nonce::new(43));
    }

    #[test]
    fn clock_seed_is_scaled_nanoseconds() {
        let nanos = 1_700_000_000_123_456_789_u64;
        let generator = CounterNonceGenerator::with_clock(&ManualClock::from_nanos(nanos));

        let seed = nanos.wrapping_mul(1_000_000);
        assert_eq!(generator.current(), Nonce::new(seed));
        assert_eq!(generator.next_nonce(), Nonce::new(seed.wrapping_add(1)));
    }

    #[test]
    fn system_seed_matches_a_reading_taken_during_construction() {
        let before = SystemClock.now_nanos();
        let generator = CounterNonceGenerator::new();
        let after = SystemClock.now_nanos();

        let seed = generator.current().value();
        assert!((before..=after).any(|nanos| nanos.wrapping_mul(SEED_SCALE) == seed));
        assert_eq!(generator.next_nonce().value(), seed.wrapping_add(1));
    }

    #[test]
    fn wraps_at_u64_max() {
        let generator = CounterNonceGenerator::starting_at(u64::MAX - 1);
        assert_eq!(generator.next_nonce(), Nonce::new(u64::MAX));
        assert_eq!(generator.next_nonce(), Nonce::new(0));
    }

    #[test]
    fn concurrent_callers_get_distinct_nonces() {
        let generator = Arc::new(CounterNonceGenerator::starting_at(1_000));

        let handles = (0..8)
            .map(|_| {
                let generator = Arc::clone(&generator);
                thread::spawn(move || {
                    (0..1_000)
                        .map(|_| generator.next_nonce())
                        .collect::<Vec<_>>()
                })
            })
            .collect::<Vec<_>>();

        let mut seen = HashSet::new();
        for handle in handles {
            let issued = handle.join().expect("worker thread panicked");
            assert!(issued.windows(2).all(|pair| pair[1] > pair[0]));
            seen.extend(issued);
        }

        assert_eq!(seen.len(), 8_000);
        assert_eq!(seen.iter().min(), Some(&Nonce::new(1_001)));
        assert_eq!(seen.iter().max(), Some(&Nonce::new(9_000)));
        assert_eq!(generator.current(), Nonce::new(9_000));
    }

    #[test]
    fn global_sequence_strictly_increases() {
        let mut previous = get_nonce()
            .parse::<Nonce>()
            .expect("global nonce should parse");
        for _ in 0..1_000 {
            let next = get_nonce()
                .parse::<Nonce>()
                .expect("global nonce should parse");
            assert!(next > previous, "{next} should exceed {previous}");
            previous = next;
        }
        assert!(CounterNonceGenerator::global().current() >= previous);
    }

    #[test]
    fn global_is_a_single_instance() {
        let first = CounterNonceGenerator::global() as *const CounterNonceGenerator;
        let second = CounterNonceGenerator::global() as *const CounterNonceGenerator;
        assert_eq!(first, second);
    }
}
