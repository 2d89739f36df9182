//! Process entry points.
//!
//! `boot` is called once after reset, `step` once per platform loop
//! iteration (or `run` to loop forever). All hardware handles are passed in
//! at construction; nothing here reaches for globals.

use core::convert::Infallible;

use log::info;

use crate::bus::BusSender;
use crate::chain::SharedChain;
use crate::clock::Clock;
use crate::config::DeviceConfig;
use crate::controller::{ControllerSet, FIRMWARE_CONTROLLERS};
use crate::error::{Error, Result};
use crate::orchestrator::Orchestrator;

/// Payload of the boot confirmation message
pub const SETUP_FINISHED: &str = "setup finished!";

pub struct Firmware<'a, C: Clock, const N: usize> {
    clock: C,
    config: DeviceConfig,
    chain: &'a SharedChain<N>,
    bus: BusSender<'a>,
    orchestrator: Orchestrator<'a, FIRMWARE_CONTROLLERS>,
}

impl<'a, C: Clock, const N: usize> Firmware<'a, C, N> {
    /// Assemble the firmware.
    ///
    /// Fails when the configuration is invalid or disagrees with the chain
    /// size.
    pub fn new(
        clock: C,
        config: DeviceConfig,
        chain: &'a SharedChain<N>,
        bus: BusSender<'a>,
        controllers: ControllerSet<'a>,
    ) -> Result<Self> {
        config.validate()?;
        if config.strip.led_count != N {
            return Err(Error::InvalidLedCount(config.strip.led_count));
        }
        Ok(Self {
            clock,
            config,
            chain,
            bus,
            orchestrator: Orchestrator::new(controllers.into_ordered()),
        })
    }

    /// One-time startup: pause, bind the strip, set up every controller and
    /// announce the result on the bus.
    pub fn boot(&mut self) -> Result<()> {
        self.clock.delay(self.config.startup_delay);

        let pin = self
            .chain
            .try_borrow_mut()
            .map_err(|_| Error::BufferBusy)?
            .bind(self.config.strip.data_pin)?;
        info!("{}: strip bound to gpio {}", self.config.device_name, pin.gpio());

        self.orchestrator.init(self.clock.now())?;

        info!("{}: {}", self.config.device_name, SETUP_FINISHED);
        self.bus.send(self.config.status_topic, SETUP_FINISHED);
        Ok(())
    }

    /// One pass over every controller
    pub fn step(&mut self) -> Result<()> {
        let now = self.clock.now();
        self.orchestrator.tick(now)
    }

    /// Loop until a controller fault halts the firmware
    pub fn run(&mut self) -> Result<Infallible> {
        self.orchestrator.run(&self.clock)
    }

    pub const fn config(&self) -> &DeviceConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub const fn orchestrator(&self) -> &Orchestrator<'a, FIRMWARE_CONTROLLERS> {
        &self.orchestrator
    }
}
