use std::sync::{Mutex, PoisonError};

use tracing::{debug, trace};

use super::NonceGenerator;
use crate::clock::{Clock, SystemClock};
use crate::types::Nonce;

#[derive(Debug)]
struct EpochState {
    seed: u64,
    last: Option<u64>,
}

impl EpochState {
    fn floor(&self) -> u64 {
        match self.last {
            Some(last) => last.saturating_add(1),
            None => self.seed,
        }
    }
}

/// Nonces in Unix microseconds, bumped by one whenever the clock stalls or
/// steps backward.
///
/// Each instance orders its own callers behind a lock; separate instances are
/// independent of each other.
#[derive(Debug)]
pub struct EpochNonceGenerator<C = SystemClock> {
    clock: C,
    state: Mutex<EpochState>,
}

impl EpochNonceGenerator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for EpochNonceGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> EpochNonceGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        let seed = clock.now_micros();
        Self {
            clock,
            state: Mutex::new(EpochState { seed, last: None }),
        }
    }

    pub fn next_nonce(&self) -> Nonce {
        // The guarded state is replaced in one assignment, so a poisoned lock
        // still holds a consistent value.
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let now = self.clock.now_micros();
        let floor = state.floor();
        let issued = if now < floor {
            if state.last == Some(now) {
                trace!(now, issued = floor, "clock stalled, bumping nonce");
            } else {
                debug!(
                    now,
                    issued = floor,
                    behind_micros = floor - now,
                    "clock behind last nonce, bumping nonce"
                );
            }
            floor
        } else {
            now
        };

        state.last = Some(issued);
        Nonce::new(issued)
    }

    pub fn get_nonce(&self) -> String {
        self.next_nonce().to_string()
    }

    pub fn seed(&self) -> Nonce {
        Nonce::new(self.lock_state().seed)
    }

    pub fn last_issued(&self) -> Option<Nonce> {
        self.lock_state().last.map(Nonce::new)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, EpochState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<C: Clock> NonceGenerator for EpochNonceGenerator<C> {
    fn next_nonce(&self) -> Nonce {
        EpochNonceGenerator::next_nonce(self)
    }
}
