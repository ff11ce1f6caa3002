//! Environment seams consumed by the core
//!
//! The store needs two things from its surroundings: a clock to stamp
//! accepted statements and a source of fresh account identifiers. Both are
//! traits so tests can substitute deterministic implementations.

use crate::types::AccountId;
use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicI64, Ordering};

/// Timestamp source for accepted statements
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Source of fresh account identifiers
///
/// Collisions are treated as impossible.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> AccountId;
}

/// Wall clock that never runs backwards
///
/// Remembers the latest timestamp it handed out (microsecond precision) and
/// never returns an earlier one, even if the system clock is adjusted.
#[derive(Debug, Default)]
pub struct SystemClock {
    last_micros: AtomicI64,
}

impl SystemClock {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        let now = Utc::now();
        let micros = now.timestamp_micros();
        let previous = self.last_micros.fetch_max(micros, Ordering::SeqCst);

        DateTime::from_timestamp_micros(micros.max(previous)).unwrap_or(now)
    }
}

/// Deterministic clock that advances by a fixed step on every reading
///
/// Used for reproducible replays, tests and benchmarks.
#[derive(Debug)]
pub struct SteppingClock {
    start: DateTime<Utc>,
    step: Duration,
    ticks: AtomicI64,
}

impl SteppingClock {
    pub fn new(start: DateTime<Utc>, step: Duration) -> Self {
        SteppingClock {
            start,
            step,
            ticks: AtomicI64::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        // Saturates instead of wrapping once the tick count leaves i32
        let offset = i32::try_from(tick)
            .ok()
            .and_then(|tick| self.step.checked_mul(tick))
            .unwrap_or(Duration::MAX);
        self.start.checked_add_signed(offset).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Random UUID v4 identifiers
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> AccountId {
        AccountId::new_v4()
    }
}
