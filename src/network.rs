//! Network manager - keeps the wireless link up.
//!
//! The radio itself is behind [`WifiLink`]. Every call into it is expected to
//! return immediately; association progress is observed by polling on each
//! tick, and retries are scheduled as deadlines rather than waited for.

use core::cell::Cell;
use core::fmt::Debug;

use critical_section::Mutex;
use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, info, warn};

use crate::config::{NetworkConfig, NetworkMode};
use crate::controller::Controller;
use crate::error::{Error, Result};

/// Wait after losing an established link
pub const RECONNECT_DELAY: Duration = Duration::from_millis(2000);
/// Wait after a failed connection attempt
pub const RETRY_DELAY: Duration = Duration::from_millis(5000);
/// Give up on a connection attempt after this long
pub const JOIN_TIMEOUT: Duration = Duration::from_millis(15_000);

const MAX_SERVICES: usize = 4;

/// Association state reported by the radio
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Association {
    Idle,
    Connecting,
    Connected,
    Failed,
}

/// A service announced over mDNS once the link is up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Service {
    pub name: &'static str,
    pub protocol: &'static str,
    pub port: u16,
}

/// Non-blocking radio interface
pub trait WifiLink {
    type Error: Debug;

    /// Power up the radio in the configured mode
    fn start(&mut self, config: &NetworkConfig) -> core::result::Result<(), Self::Error>;

    /// Kick off a station association attempt and return
    fn begin_connect(&mut self) -> core::result::Result<(), Self::Error>;

    /// Current association state. In access point mode, `Connected` means
    /// the access point is up.
    fn poll(&mut self) -> Association;

    /// Announce a service on the local network
    fn advertise(&mut self, service: &Service) -> core::result::Result<(), Self::Error>;
}

/// Link status as seen by the rest of the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Down,
    Connecting,
    Up,
}

/// Shared view of the link, written by the network manager only.
pub struct LinkState {
    status: Mutex<Cell<LinkStatus>>,
}

impl LinkState {
    pub const fn new() -> Self {
        Self {
            status: Mutex::new(Cell::new(LinkStatus::Down)),
        }
    }

    pub fn status(&self) -> LinkStatus {
        critical_section::with(|cs| self.status.borrow(cs).get())
    }

    pub fn is_up(&self) -> bool {
        self.status() == LinkStatus::Up
    }

    pub(crate) fn set(&self, status: LinkStatus) {
        critical_section::with(|cs| self.status.borrow(cs).set(status));
    }
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NetworkState {
    /// Radio not started; retry at the deadline
    RadioOff { retry_at: Instant },
    Joining { since: Instant },
    Up,
    Waiting { retry_at: Instant },
}

pub struct NetworkManager<'a, L: WifiLink> {
    link: L,
    config: NetworkConfig,
    shared: &'a LinkState,
    services: Vec<Service, MAX_SERVICES>,
    state: NetworkState,
    reconnects: u32,
}

impl<'a, L: WifiLink> NetworkManager<'a, L> {
    pub fn new(link: L, config: NetworkConfig, shared: &'a LinkState) -> Self {
        Self {
            link,
            config,
            shared,
            services: Vec::new(),
            state: NetworkState::RadioOff {
                retry_at: Instant::from_ticks(0),
            },
            reconnects: 0,
        }
    }

    /// Announce `service` every time the link comes up
    pub fn advertise(&mut self, service: Service) -> Result<()> {
        self.services
            .push(service)
            .map_err(|_| Error::CapacityExceeded)
    }

    pub fn status(&self) -> LinkStatus {
        self.shared.status()
    }

    /// Number of times an established link was lost
    pub const fn reconnects(&self) -> u32 {
        self.reconnects
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    fn start_radio(&mut self, now: Instant) {
        if let Err(err) = self.link.start(&self.config) {
            warn!("network: radio start failed: {:?}", err);
            self.state = NetworkState::RadioOff {
                retry_at: now + RETRY_DELAY,
            };
            return;
        }
        match self.config.mode {
            NetworkMode::AccessPoint => {
                info!("network: access point {} starting", self.config.ssid);
                self.state = NetworkState::Joining { since: now };
                self.shared.set(LinkStatus::Connecting);
            }
            NetworkMode::Station => self.connect(now),
        }
    }

    fn connect(&mut self, now: Instant) {
        info!("network: connecting to {}", self.config.ssid);
        match self.link.begin_connect() {
            Ok(()) => {
                self.state = NetworkState::Joining { since: now };
                self.shared.set(LinkStatus::Connecting);
            }
            Err(err) => {
                warn!("network: error connecting: {:?}", err);
                self.wait(now, RETRY_DELAY);
            }
        }
    }

    fn wait(&mut self, now: Instant, delay: Duration) {
        self.state = NetworkState::Waiting {
            retry_at: now + delay,
        };
        self.shared.set(LinkStatus::Down);
    }

    fn on_up(&mut self) {
        info!("network: link up as {}", self.config.hostname);
        self.state = NetworkState::Up;
        self.shared.set(LinkStatus::Up);
        for service in &self.services {
            if let Err(err) = self.link.advertise(service) {
                warn!("network: failed to advertise {}: {:?}", service.name, err);
            }
        }
    }
}

impl<L: WifiLink> Controller for NetworkManager<'_, L> {
    fn name(&self) -> &'static str {
        "network"
    }

    fn setup(&mut self, now: Instant) -> Result<()> {
        self.shared.set(LinkStatus::Down);
        self.start_radio(now);
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        match self.state {
            NetworkState::RadioOff { retry_at } => {
                if now >= retry_at {
                    self.start_radio(now);
                }
            }
            NetworkState::Joining { since } => match self.link.poll() {
                Association::Connected => self.on_up(),
                Association::Failed => {
                    warn!("network: connection attempt failed");
                    self.wait(now, RETRY_DELAY);
                }
                Association::Idle | Association::Connecting => {
                    if now.checked_duration_since(since).is_some_and(|d| d >= JOIN_TIMEOUT) {
                        warn!("network: connection attempt timed out");
                        self.wait(now, RETRY_DELAY);
                    }
                }
            },
            NetworkState::Up => {
                let association = self.link.poll();
                if association != Association::Connected {
                    warn!("network: link lost ({:?})", association);
                    self.reconnects = self.reconnects.wrapping_add(1);
                    self.wait(now, RECONNECT_DELAY);
                }
            }
            NetworkState::Waiting { retry_at } => {
                if now >= retry_at {
                    debug!("network: retrying");
                    match self.config.mode {
                        NetworkMode::AccessPoint => self.start_radio(now),
                        NetworkMode::Station => self.connect(now),
                    }
                }
            }
        }
        Ok(())
    }
}
