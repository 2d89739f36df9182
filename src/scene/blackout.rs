use embassy_time::Instant;

use super::Scene;
use crate::color::{BLACK, Rgb};

/// All LEDs off
#[derive(Debug, Clone, Copy, Default)]
pub struct BlackoutScene;

impl Scene for BlackoutScene {
    fn advance(&mut self, _now: Instant, leds: &mut [Rgb]) {
        leds.fill(BLACK);
    }
}
