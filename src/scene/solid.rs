//! Single color fill

use embassy_time::Instant;

use super::Scene;
use crate::color::Rgb;

#[derive(Debug, Clone)]
pub struct SolidScene {
    color: Rgb,
}

impl SolidScene {
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Scene for SolidScene {
    fn setup(&mut self, leds: &mut [Rgb]) {
        leds.fill(self.color);
    }

    fn advance(&mut self, _now: Instant, leds: &mut [Rgb]) {
        leds.fill(self.color);
    }
}
