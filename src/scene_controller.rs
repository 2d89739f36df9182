//! Scene controller - runs the active scene against the LED chain.
//!
//! Switch requests arrive through a [`SceneMailbox`], typically posted by the
//! message bus. A switch is always completed inside one `tick`: teardown of
//! the old scene, setup of the new one, and its first frame all happen under
//! the same buffer borrow, so the renderer only ever sees whole frames.

use embassy_time::Instant;
use log::{info, warn};

use crate::bus::{CommandSink, DispatchError};
use crate::chain::SharedChain;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::mailbox::Mailbox;
use crate::scene::{SceneId, SceneSlot};

/// Commands accepted by the scene controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneCommand {
    Switch(SceneId),
}

/// Default depth of the scene command queue
pub const SCENE_QUEUE_SIZE: usize = 4;

pub type SceneMailbox<const SIZE: usize = SCENE_QUEUE_SIZE> = Mailbox<SceneCommand, SIZE>;

pub struct SceneController<'a, const N: usize, const Q: usize = SCENE_QUEUE_SIZE> {
    chain: &'a SharedChain<N>,
    commands: &'a SceneMailbox<Q>,
    active: SceneSlot,
    switches: u32,
}

impl<'a, const N: usize, const Q: usize> SceneController<'a, N, Q> {
    pub fn new(chain: &'a SharedChain<N>, commands: &'a SceneMailbox<Q>, initial: SceneId) -> Self {
        Self {
            chain,
            commands,
            active: initial.to_slot(),
            switches: 0,
        }
    }

    /// Id of the scene currently driving the strip
    pub fn active(&self) -> SceneId {
        self.active.id()
    }

    /// Number of completed scene switches
    pub const fn switches(&self) -> u32 {
        self.switches
    }
}

impl<const N: usize, const Q: usize> Controller for SceneController<'_, N, Q> {
    fn name(&self) -> &'static str {
        "scene"
    }

    fn setup(&mut self, _now: Instant) -> Result<()> {
        let mut chain = self.chain.try_borrow_mut().map_err(|_| Error::BufferBusy)?;
        self.active.setup(chain.pixels_mut());
        info!("scene: starting with {}", self.active.id().as_str());
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        let mut chain = self.chain.try_borrow_mut().map_err(|_| Error::BufferBusy)?;
        let leds = chain.pixels_mut();

        while let Some(command) = self.commands.take() {
            match command {
                SceneCommand::Switch(id) => {
                    self.active.teardown(leds);
                    self.active = id.to_slot();
                    self.active.setup(leds);
                    self.switches = self.switches.wrapping_add(1);
                    info!("scene: switched to {}", id.as_str());
                }
            }
        }

        self.active.advance(now, leds);
        Ok(())
    }
}

impl<const Q: usize> CommandSink for SceneMailbox<Q> {
    fn deliver(&self, payload: &str) -> core::result::Result<(), DispatchError> {
        let Some(id) = SceneId::parse_from_str(payload) else {
            warn!("scene: unknown scene request {:?}", payload);
            return Err(DispatchError::Rejected);
        };
        self.post(SceneCommand::Switch(id))
            .map_err(|_| DispatchError::Full)
    }
}
