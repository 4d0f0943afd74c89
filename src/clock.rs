use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

/// Source of Unix epoch time for nonce seeding.
pub trait Clock: Send + Sync {
    fn now_nanos(&self) -> u64;

    fn now_micros(&self) -> u64 {
        self.now_nanos() / 1_000
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }

    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }

    fn now_micros(&self) -> u64 {
        (**self).now_micros()
    }
}

/// Wall clock. Readings before the epoch (or past year 2262) come back as 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_nanos(&self) -> u64 {
        Utc::now()
            .timestamp_nanos_opt()
            .and_then(|nanos| u64::try_from(nanos).ok())
            .unwrap_or_default()
    }

    fn now_micros(&self) -> u64 {
        u64::try_from(Utc::now().timestamp_micros()).unwrap_or_default()
    }
}

/// Hand-driven clock for tests and simulations.
///
/// Cloning shares the reading, so a test can keep one handle and give the
/// other to a generator.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn from_nanos(nanos: u64) -> Self {
        Self {
            nanos: Arc::new(AtomicU64::new(nanos)),
        }
    }

    pub fn from_micros(micros: u64) -> Self {
        Self::from_nanos(micros.saturating_mul(1_000))
    }

    pub fn set_nanos(&self, nanos: u64) {
        self.nanos.store(nanos, Ordering::SeqCst);
    }

    pub fn set_micros(&self, micros: u64) {
        self.set_nanos(micros.saturating_mul(1_000));
    }

    pub fn advance_micros(&self, micros: u64) {
        let delta = micros.saturating_mul(1_000);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_add(delta))
            });
    }

    pub fn rewind_micros(&self, micros: u64) {
        let delta = micros.saturating_mul(1_000);
        let _ = self
            .nanos
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |now| {
                Some(now.saturating_sub(delta))
            });
    }
}

impl Clock for ManualClock {
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::SeqCst)
    }
}
