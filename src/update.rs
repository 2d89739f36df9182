//! Over-the-air update service.
//!
//! The transfer itself is handled by an [`UpdateServer`]. This controller
//! only starts the server once the link is up, drains its events without
//! blocking and reports progress.

use core::fmt::Debug;

use embassy_time::{Duration, Instant};
use log::{info, warn};

use crate::config::UpdateConfig;
use crate::controller::Controller;
use crate::error::Result;
use crate::network::LinkState;

/// Upper bound on server events handled in one tick
const MAX_EVENTS_PER_TICK: usize = 8;
/// Wait before restarting a server that failed to start
pub const RESTART_DELAY: Duration = Duration::from_millis(5000);

/// Why an update was abandoned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateFailure {
    Auth,
    Begin,
    Connect,
    Receive,
    End,
}

/// Events reported by the update server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateEvent {
    Started { size: u32 },
    Progress { written: u32, total: u32 },
    Completed,
    Aborted(UpdateFailure),
}

/// Non-blocking update server
pub trait UpdateServer {
    type Error: Debug;

    /// Start listening for update requests
    fn begin(&mut self, config: &UpdateConfig) -> core::result::Result<(), Self::Error>;

    /// Stop listening
    fn end(&mut self);

    /// Next pending event, if any. Never waits for the network.
    fn poll(&mut self) -> Option<UpdateEvent>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateState {
    /// Waiting for the network to come up
    Offline,
    Listening,
    Receiving { written: u32, total: u32 },
    /// Image accepted; the server reboots into it
    Completed,
}

pub struct UpdateService<'a, S: UpdateServer> {
    server: S,
    config: UpdateConfig,
    link: &'a LinkState,
    state: UpdateState,
    /// Earliest time the server may be started while offline
    retry_at: Instant,
}

impl<'a, S: UpdateServer> UpdateService<'a, S> {
    pub fn new(server: S, config: UpdateConfig, link: &'a LinkState) -> Self {
        Self {
            server,
            config,
            link,
            state: UpdateState::Offline,
            retry_at: Instant::from_ticks(0),
        }
    }

    pub const fn state(&self) -> UpdateState {
        self.state
    }

    pub const fn is_updating(&self) -> bool {
        matches!(self.state, UpdateState::Receiving { .. })
    }

    pub fn server(&self) -> &S {
        &self.server
    }

    fn listen(&mut self, now: Instant) {
        match self.server.begin(&self.config) {
            Ok(()) => {
                info!(
                    "ota: listening as {} on port {}",
                    self.config.hostname, self.config.port
                );
                self.state = UpdateState::Listening;
            }
            Err(err) => {
                warn!("ota: failed to start server: {:?}", err);
                self.retry_at = now + RESTART_DELAY;
            }
        }
    }

    fn on_event(&mut self, event: UpdateEvent) {
        match event {
            UpdateEvent::Started { size } => {
                info!("ota: starting update, size={} bytes", size);
                self.state = UpdateState::Receiving {
                    written: 0,
                    total: size,
                };
            }
            UpdateEvent::Progress { written, total } => {
                info!(
                    "ota: progress {}% ({}/{} bytes)",
                    progress_percent(written, total),
                    written,
                    total
                );
                self.state = UpdateState::Receiving { written, total };
            }
            UpdateEvent::Completed => {
                info!("ota: update successful, rebooting...");
                self.state = UpdateState::Completed;
            }
            UpdateEvent::Aborted(reason) => {
                warn!("ota: aborting update: {:?}", reason);
                self.state = UpdateState::Listening;
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn progress_percent(written: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }
    (u64::from(written.min(total)) * 100 / u64::from(total)) as u8
}

impl<S: UpdateServer> Controller for UpdateService<'_, S> {
    fn name(&self) -> &'static str {
        "ota"
    }

    fn setup(&mut self, now: Instant) -> Result<()> {
        if self.link.is_up() {
            self.listen(now);
        } else {
            info!("ota: waiting for network");
        }
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        match self.state {
            UpdateState::Completed => return Ok(()),
            UpdateState::Offline => {
                if self.link.is_up() && now >= self.retry_at {
                    self.listen(now);
                }
                return Ok(());
            }
            UpdateState::Listening | UpdateState::Receiving { .. } => {
                if !self.link.is_up() {
                    warn!("ota: network lost, stopping server");
                    self.server.end();
                    self.state = UpdateState::Offline;
                    self.retry_at = now;
                    return Ok(());
                }
            }
        }

        for _ in 0..MAX_EVENTS_PER_TICK {
            let Some(event) = self.server.poll() else {
                break;
            };
            self.on_event(event);
            if self.state == UpdateState::Completed {
                break;
            }
        }
        Ok(())
    }
}
