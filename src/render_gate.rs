//! Rate limiting for hardware pushes.
//!
//! The gate does not sleep. It answers "may we push now?" and the caller
//! skips the push when the answer is no, leaving the loop free to run the
//! other controllers during the cooldown.

use embassy_time::{Duration, Instant};

use crate::error::{Error, Result};

const MICROS_PER_SECOND: u64 = 1_000_000;

/// Leaky-bucket style gate allowing one push per interval.
///
/// The interval is measured from the last push that actually happened, so a
/// late tick pushes immediately and the next window starts from there. No
/// backlog of missed frames is ever replayed.
#[derive(Debug, Clone, Copy)]
pub struct RenderGate {
    interval: Duration,
    last_push: Option<Instant>,
}

impl RenderGate {
    /// Create a gate for the given target rate.
    ///
    /// Fails for a zero rate, or a rate above one push per microsecond.
    pub fn new(updates_per_second: u32) -> Result<Self> {
        if updates_per_second == 0 {
            return Err(Error::InvalidUpdateRate(updates_per_second));
        }
        let interval_us = MICROS_PER_SECOND / u64::from(updates_per_second);
        if interval_us == 0 {
            return Err(Error::InvalidUpdateRate(updates_per_second));
        }
        Ok(Self {
            interval: Duration::from_micros(interval_us),
            last_push: None,
        })
    }

    /// Minimum time between two pushes
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    pub const fn last_push(&self) -> Option<Instant> {
        self.last_push
    }

    /// Check whether a push is due at `now`
    ///
    /// The first call after construction or [`RenderGate::reset`] is always due.
    /// An instant earlier than the last push is treated as not due.
    pub fn is_due(&self, now: Instant) -> bool {
        let Some(last) = self.last_push else {
            return true;
        };
        now.checked_duration_since(last)
            .is_some_and(|elapsed| elapsed >= self.interval)
    }

    /// Record a push at `now`
    pub fn mark_pushed(&mut self, now: Instant) {
        self.last_push = Some(now);
    }

    /// Forget the last push so the next check is due
    pub fn reset(&mut self) {
        self.last_push = None;
    }

    /// Time left until the next push may happen
    pub fn remaining(&self, now: Instant) -> Duration {
        let Some(last) = self.last_push else {
            return Duration::from_ticks(0);
        };
        let next = last + self.interval;
        next.checked_duration_since(now)
            .unwrap_or(Duration::from_ticks(0))
    }
}
