//! Time source for the control loop.

use embassy_time::{Duration, Instant};

/// Source of timestamps for the control loop.
///
/// The loop reads the clock once per iteration and hands that instant to
/// every controller, so all controllers in one pass agree on "now".
pub trait Clock {
    /// Current instant
    fn now(&self) -> Instant;

    /// Block for `duration`. Only used once, before the loop starts.
    fn delay(&self, duration: Duration);
}

/// Clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn delay(&self, duration: Duration) {
        embassy_time::block_for(duration);
    }
}
