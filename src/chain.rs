//! LED chain - the single owner of the pixel buffer.

use core::cell::RefCell;

use crate::color::Rgb;
use crate::error::{Error, Result};

/// Highest GPIO number that can drive the strip
pub const MAX_DATA_PIN: u8 = 16;

// GPIOs wired to the SPI flash, never usable as outputs
const FLASH_PIN_FIRST: u8 = 6;
const FLASH_PIN_LAST: u8 = 11;

/// A validated strip data pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataPin(u8);

impl DataPin {
    pub const fn new(gpio: u8) -> Result<Self> {
        if gpio > MAX_DATA_PIN || (gpio >= FLASH_PIN_FIRST && gpio <= FLASH_PIN_LAST) {
            return Err(Error::InvalidDataPin(gpio));
        }
        Ok(Self(gpio))
    }

    pub const fn gpio(self) -> u8 {
        self.0
    }
}

/// Pixel buffer of `N` LEDs bound to one data pin.
#[derive(Debug)]
pub struct LedChain<const N: usize> {
    pixels: [Rgb; N],
    pin: Option<DataPin>,
}

/// The chain as shared between the scene controller and the renderer.
///
/// Both only borrow it inside their own `tick`, so a borrow never outlives
/// a tick boundary.
pub type SharedChain<const N: usize> = RefCell<LedChain<N>>;

impl<const N: usize> LedChain<N> {
    /// Create a dark chain.
    ///
    /// Fails for an empty chain.
    pub const fn new() -> Result<Self> {
        if N == 0 {
            return Err(Error::InvalidLedCount(N));
        }
        Ok(Self {
            pixels: [Rgb { r: 0, g: 0, b: 0 }; N],
            pin: None,
        })
    }

    /// Bind the chain to its data pin. Only allowed once.
    pub fn bind(&mut self, gpio: u8) -> Result<DataPin> {
        if self.pin.is_some() {
            return Err(Error::PinAlreadyBound);
        }
        let pin = DataPin::new(gpio)?;
        self.pin = Some(pin);
        Ok(pin)
    }

    pub const fn pin(&self) -> Option<DataPin> {
        self.pin
    }

    pub const fn is_bound(&self) -> bool {
        self.pin.is_some()
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut [Rgb] {
        &mut self.pixels
    }
}
