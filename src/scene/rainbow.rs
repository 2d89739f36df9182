//! Rainbow cycling scene
//!
//! Spreads one full turn of the hue wheel over the strip and rotates it.

use embassy_time::Instant;

use super::Scene;
use crate::color::{Hsv, Rgb, hsv2rgb};

/// Duration of one complete rotation
const CYCLE_MS: u64 = 12_000;

#[derive(Debug, Clone)]
pub struct RainbowScene {
    /// Brightness value (0-255)
    value: u8,
    /// Rotate towards the start of the strip
    reversed: bool,
}

impl Default for RainbowScene {
    fn default() -> Self {
        Self {
            value: 255,
            reversed: false,
        }
    }
}

impl RainbowScene {
    #[must_use]
    pub fn with_value(mut self, value: u8) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    /// Hue of the first LED at `now`
    #[allow(clippy::cast_possible_truncation)]
    fn base_hue(&self, now: Instant) -> u8 {
        let progress_ms = now.as_millis() % CYCLE_MS;
        let hue = ((progress_ms * 256) / CYCLE_MS) as u8;
        if self.reversed { hue.wrapping_neg() } else { hue }
    }
}

impl Scene for RainbowScene {
    #[allow(clippy::cast_possible_truncation)]
    fn advance(&mut self, now: Instant, leds: &mut [Rgb]) {
        if leds.is_empty() {
            return;
        }

        let base_hue = self.base_hue(now);
        let len = leds.len();
        for (i, led) in leds.iter_mut().enumerate() {
            let offset = ((i * 256) / len) as u8;
            *led = hsv2rgb(Hsv {
                hue: base_hue.wrapping_add(offset),
                sat: 255,
                val: self.value,
            });
        }
    }
}
