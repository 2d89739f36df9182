use core::fmt;

/// Crate-wide result alias
pub type Result<T> = core::result::Result<T, Error>;

/// Faults surfaced to the orchestrator or to the boot sequence.
///
/// Configuration faults are detected at construction and abort startup.
/// Transient network faults never show up here, the adapters absorb them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Updates-per-second is zero or too high to express as an interval
    InvalidUpdateRate(u32),
    /// LED count is zero or does not match the chain size
    InvalidLedCount(usize),
    /// Data pin is not a usable output
    InvalidDataPin(u8),
    /// The LED chain was already bound to a pin
    PinAlreadyBound,
    /// The LED chain has not been bound to a pin yet
    PinNotBound,
    /// `init` was called more than once
    AlreadyInitialized,
    /// `tick` was called before `init`
    NotInitialized,
    /// The pixel buffer was borrowed across a tick boundary
    BufferBusy,
    /// A fixed-capacity table is full
    CapacityExceeded,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidUpdateRate(rate) => write!(f, "invalid update rate: {rate} per second"),
            Self::InvalidLedCount(count) => write!(f, "invalid LED count: {count}"),
            Self::InvalidDataPin(pin) => write!(f, "invalid data pin: {pin}"),
            Self::PinAlreadyBound => f.write_str("LED chain is already bound"),
            Self::PinNotBound => f.write_str("LED chain is not bound"),
            Self::AlreadyInitialized => f.write_str("controllers are already initialized"),
            Self::NotInitialized => f.write_str("controllers are not initialized"),
            Self::BufferBusy => f.write_str("pixel buffer is busy"),
            Self::CapacityExceeded => f.write_str("capacity exceeded"),
        }
    }
}
