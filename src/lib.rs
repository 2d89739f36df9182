#![no_std]

pub mod bus;
pub mod chain;
pub mod clock;
pub mod color;
pub mod config;
pub mod controller;
pub mod driver;
pub mod error;
pub mod firmware;
pub mod mailbox;
pub mod network;
pub mod orchestrator;
pub mod render_gate;
pub mod renderer;
pub mod scene;
pub mod scene_controller;
pub mod update;

pub use bus::{BusSender, CommandSink, Message, MessageBusController, MessageTransport, Outbox};
pub use chain::{DataPin, LedChain, SharedChain};
pub use clock::{Clock, SystemClock};
pub use config::DeviceConfig;
pub use controller::{Controller, ControllerSet};
pub use driver::SmartLedsDriver;
pub use error::{Error, Result};
pub use firmware::Firmware;
pub use network::{LinkState, NetworkManager, WifiLink};
pub use orchestrator::Orchestrator;
pub use render_gate::RenderGate;
pub use renderer::Renderer;
pub use scene::{Scene, SceneId, SceneSlot};
pub use scene_controller::{SceneCommand, SceneController, SceneMailbox};
pub use update::{UpdateServer, UpdateService};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The renderer is generic over this trait.
pub trait OutputDriver {
    type Error: core::fmt::Debug;

    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]) -> core::result::Result<(), Self::Error>;
}

/// Install the `esp-println` console logger, honouring `ESP_LOG`
#[cfg(feature = "esp32-log")]
pub fn init_logger() {
    esp_println::logger::init_logger_from_env();
}
