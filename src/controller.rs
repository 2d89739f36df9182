//! The controller abstraction driven by the orchestrator.

use embassy_time::Instant;

use crate::error::Result;

/// A unit composed into the control loop.
///
/// `setup` is called exactly once, before the first `tick`. `tick` is called
/// once per loop iteration and must return promptly: waiting is expressed as
/// state checked on the next call, never as blocking inside the call.
///
/// An `Err` from either method is not caught by the orchestrator. Controllers
/// that can recover from a fault must do so internally and return `Ok`.
pub trait Controller {
    /// Short name used in log lines
    fn name(&self) -> &'static str;

    /// One-time initialization
    fn setup(&mut self, now: Instant) -> Result<()>;

    /// Non-blocking step
    fn tick(&mut self, now: Instant) -> Result<()>;
}

/// Number of slots in [`ControllerSet`]
pub const FIRMWARE_CONTROLLERS: usize = 5;

/// The firmware's controllers, one per slot.
///
/// The slot order is the execution order. The scene slot precedes the
/// renderer slot so the frame written in an iteration is the one pushed in
/// that same iteration.
pub struct ControllerSet<'a> {
    pub network: &'a mut dyn Controller,
    pub update: &'a mut dyn Controller,
    pub bus: &'a mut dyn Controller,
    pub scene: &'a mut dyn Controller,
    pub renderer: &'a mut dyn Controller,
}

impl<'a> ControllerSet<'a> {
    /// Flatten into execution order
    pub fn into_ordered(self) -> [&'a mut dyn Controller; FIRMWARE_CONTROLLERS] {
        [
            self.network,
            self.update,
            self.bus,
            self.scene,
            self.renderer,
        ]
    }
}
