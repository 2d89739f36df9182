//! Cooperative, fixed-order control loop.
//!
//! The orchestrator owns nothing but the ordered list of controllers. It does
//! not sleep, does not retry and does not isolate faults: pacing belongs to
//! the controllers (see [`crate::renderer::Renderer`]) and an unhandled fault
//! halts the loop.

use core::convert::Infallible;

use embassy_time::Instant;
use log::{debug, error, info};

use crate::clock::Clock;
use crate::controller::Controller;
use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Lifecycle {
    Constructed,
    Ready,
    /// A setup failed; the controllers are left as they are
    Failed,
}

/// Drives `N` controllers in the order they were given.
pub struct Orchestrator<'a, const N: usize> {
    controllers: [&'a mut dyn Controller; N],
    lifecycle: Lifecycle,
    iterations: u64,
}

impl<'a, const N: usize> Orchestrator<'a, N> {
    /// The list order is fixed for the lifetime of the orchestrator.
    pub fn new(controllers: [&'a mut dyn Controller; N]) -> Self {
        Self {
            controllers,
            lifecycle: Lifecycle::Constructed,
            iterations: 0,
        }
    }

    /// Run every controller's `setup` in list order.
    ///
    /// The first failing controller aborts startup; the controllers after it
    /// are not set up and the orchestrator stays failed. Any later call is
    /// rejected without touching a controller.
    pub fn init(&mut self, now: Instant) -> Result<()> {
        if self.lifecycle != Lifecycle::Constructed {
            return Err(Error::AlreadyInitialized);
        }
        for controller in &mut self.controllers {
            debug!("orchestrator: setting up {}", controller.name());
            if let Err(err) = controller.setup(now) {
                error!("orchestrator: {} setup failed: {}", controller.name(), err);
                self.lifecycle = Lifecycle::Failed;
                return Err(err);
            }
        }
        self.lifecycle = Lifecycle::Ready;
        info!("orchestrator: {} controllers ready", N);
        Ok(())
    }

    /// Run one iteration: every controller's `tick`, in list order.
    pub fn tick(&mut self, now: Instant) -> Result<()> {
        if self.lifecycle != Lifecycle::Ready {
            return Err(Error::NotInitialized);
        }
        for controller in &mut self.controllers {
            if let Err(err) = controller.tick(now) {
                error!("orchestrator: {} tick failed: {}", controller.name(), err);
                return Err(err);
            }
        }
        self.iterations = self.iterations.wrapping_add(1);
        Ok(())
    }

    /// Iterate forever, reading `clock` once per pass.
    ///
    /// Only returns with the fault that halted the loop.
    pub fn run<C: Clock>(&mut self, clock: &C) -> Result<Infallible> {
        loop {
            self.tick(clock.now())?;
        }
    }

    pub const fn is_ready(&self) -> bool {
        matches!(self.lifecycle, Lifecycle::Ready)
    }

    /// Completed iterations since `init`
    pub const fn iterations(&self) -> u64 {
        self.iterations
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }
}
