//! Build-time device configuration.
//!
//! Everything here is fixed when the firmware is compiled. Credentials can be
//! injected through environment variables at build time, otherwise the
//! defaults below are used.

use embassy_time::Duration;

use crate::chain::DataPin;
use crate::error::{Error, Result};

const fn env_or(value: Option<&'static str>, fallback: &'static str) -> &'static str {
    match value {
        Some(value) => value,
        None => fallback,
    }
}

pub const DEVICE_NAME: &str = env_or(option_env!("LED_DEVICE_NAME"), "ann-a-master");
pub const LED_COUNT: usize = 144;

/// How the radio joins the network
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkMode {
    /// Host our own access point
    AccessPoint,
    /// Join an existing network
    Station,
}

#[derive(Debug, Clone, Copy)]
pub struct NetworkConfig {
    pub hostname: &'static str,
    pub ssid: &'static str,
    pub password: &'static str,
    pub mode: NetworkMode,
}

#[derive(Debug, Clone, Copy)]
pub struct UpdateConfig {
    pub hostname: &'static str,
    pub password: &'static str,
    pub port: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct BusConfig {
    pub in_port: u16,
    pub out_port: u16,
}

#[derive(Debug, Clone, Copy)]
pub struct StripConfig {
    pub led_count: usize,
    pub data_pin: u8,
    pub updates_per_second: u32,
}

/// Complete device configuration
#[derive(Debug, Clone, Copy)]
pub struct DeviceConfig {
    pub device_name: &'static str,
    pub network: NetworkConfig,
    pub update: UpdateConfig,
    pub bus: BusConfig,
    pub strip: StripConfig,
    /// Pause before the strip is bound and controllers are set up.
    ///
    /// Gives a serial monitor time to attach after reset.
    pub startup_delay: Duration,
    /// Topic the boot confirmation is published to
    pub status_topic: &'static str,
}

impl DeviceConfig {
    pub const DEFAULT: Self = Self {
        device_name: DEVICE_NAME,
        network: NetworkConfig {
            hostname: DEVICE_NAME,
            ssid: env_or(option_env!("LED_WIFI_SSID"), "ann-a"),
            password: env_or(option_env!("LED_WIFI_PASSWORD"), ""),
            mode: NetworkMode::AccessPoint,
        },
        update: UpdateConfig {
            hostname: DEVICE_NAME,
            password: env_or(option_env!("LED_OTA_PASSWORD"), "ann-a"),
            port: 8266,
        },
        bus: BusConfig {
            in_port: 8000,
            out_port: 9000,
        },
        strip: StripConfig {
            led_count: LED_COUNT,
            data_pin: 2,
            updates_per_second: 100,
        },
        startup_delay: Duration::from_millis(3000),
        status_topic: "/ann-a/status",
    };

    /// Check the values that would otherwise fail deep inside a controller
    pub fn validate(&self) -> Result<()> {
        if self.strip.led_count == 0 {
            return Err(Error::InvalidLedCount(self.strip.led_count));
        }
        if self.strip.updates_per_second == 0 {
            return Err(Error::InvalidUpdateRate(self.strip.updates_per_second));
        }
        DataPin::new(self.strip.data_pin)?;
        Ok(())
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
