//! Adapter from `smart-leds` writers to [`OutputDriver`].

use core::fmt::Debug;

use smart_leds::{RGB8, SmartLedsWrite};

use crate::OutputDriver;
use crate::color::Rgb;

/// Wraps any `smart-leds` writer, e.g. an RMT or SPI backed WS2812 driver.
pub struct SmartLedsDriver<W> {
    writer: W,
}

impl<W> SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite<Color = RGB8>,
    W::Error: Debug,
{
    type Error = W::Error;

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        self.writer.write(colors.iter().copied())
    }
}
