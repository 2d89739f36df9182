use embassy_time::{Duration, Instant};
use log::{error, info};

use crate::OutputDriver;
use crate::chain::SharedChain;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::render_gate::RenderGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RendererState {
    Active,
    /// The driver failed; the last pushed frame stays on the strip
    Faulted,
}

/// Pushes the LED chain to hardware at a bounded rate.
///
/// Between pushes the strip keeps showing the last pushed frame, even when
/// the buffer has changed since.
pub struct Renderer<'a, D: OutputDriver, const N: usize> {
    chain: &'a SharedChain<N>,
    driver: D,
    gate: RenderGate,
    state: RendererState,
    frames_pushed: u32,
}

impl<'a, D: OutputDriver, const N: usize> Renderer<'a, D, N> {
    /// Create a renderer pushing at most `updates_per_second` frames.
    ///
    /// A zero rate is a configuration fault.
    pub fn new(chain: &'a SharedChain<N>, driver: D, updates_per_second: u32) -> Result<Self> {
        Ok(Self {
            chain,
            driver,
            gate: RenderGate::new(updates_per_second)?,
            state: RendererState::Active,
            frames_pushed: 0,
        })
    }

    pub const fn interval(&self) -> Duration {
        self.gate.interval()
    }

    /// Number of successful hardware pushes
    pub const fn frames_pushed(&self) -> u32 {
        self.frames_pushed
    }

    pub const fn is_faulted(&self) -> bool {
        matches!(self.state, RendererState::Faulted)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Push the current buffer if the gate allows it.
    ///
    /// Returns `true` when a frame reached the hardware.
    pub fn render(&mut self, now: Instant) -> Result<bool> {
        if self.is_faulted() || !self.gate.is_due(now) {
            return Ok(false);
        }

        let chain = self.chain.try_borrow().map_err(|_| Error::BufferBusy)?;
        if let Err(err) = self.driver.write(chain.pixels()) {
            error!("renderer: push failed, output disabled: {:?}", err);
            self.state = RendererState::Faulted;
            return Ok(false);
        }

        self.gate.mark_pushed(now);
        self.frames_pushed = self.frames_pushed.wrapping_add(1);
        Ok(true)
    }
}

impl<D: OutputDriver, const N: usize> Controller for Renderer<'_, D, N> {
    fn name(&self) -> &'static str {
        "renderer"
    }

    fn setup(&mut self, _now: Instant) -> Result<()> {
        let chain = self.chain.try_borrow().map_err(|_| Error::BufferBusy)?;
        let Some(pin) = chain.pin() else {
            return Err(Error::PinNotBound);
        };
        info!(
            "renderer: {} leds on gpio {}, frame interval {} us",
            N,
            pin.gpio(),
            self.gate.interval().as_micros()
        );
        self.gate.reset();
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        self.render(now).map(|_| ())
    }
}
