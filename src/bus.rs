//! Message bus controller - remote control intake and status output.
//!
//! Outgoing messages are queued in an [`Outbox`] through a [`BusSender`] and
//! flushed on the next ticks; sending never waits for the network. Incoming
//! messages are routed by exact address match to subscribed
//! [`CommandSink`]s.

use core::fmt::Debug;

use embassy_time::{Duration, Instant};
use heapless::{String, Vec};
use log::{debug, info, warn};

use crate::config::BusConfig;
use crate::controller::Controller;
use crate::error::{Error, Result};
use crate::mailbox::Mailbox;
use crate::network::LinkState;

pub const TOPIC_LEN: usize = 64;
pub const PAYLOAD_LEN: usize = 64;
pub const OUTBOX_SIZE: usize = 8;
pub const MAX_SUBSCRIPTIONS: usize = 4;

/// Bounded work per tick in each direction
const MAX_MESSAGES_PER_TICK: usize = 4;
/// Wait before reopening the endpoint after a failure
const REOPEN_DELAY: Duration = Duration::from_millis(5000);

/// A bus message with bounded topic and payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub topic: String<TOPIC_LEN>,
    pub payload: String<PAYLOAD_LEN>,
}

impl Message {
    /// Returns `None` when either part does not fit
    pub fn new(topic: &str, payload: &str) -> Option<Self> {
        let mut message = Self {
            topic: String::new(),
            payload: String::new(),
        };
        message.topic.push_str(topic).ok()?;
        message.payload.push_str(payload).ok()?;
        Some(message)
    }
}

/// Outgoing message queue
pub type Outbox<const SIZE: usize = OUTBOX_SIZE> = Mailbox<Message, SIZE>;

/// Fire-and-forget sending handle
#[derive(Clone, Copy)]
pub struct BusSender<'a, const SIZE: usize = OUTBOX_SIZE> {
    outbox: &'a Outbox<SIZE>,
}

impl<'a, const SIZE: usize> BusSender<'a, SIZE> {
    pub const fn new(outbox: &'a Outbox<SIZE>) -> Self {
        Self { outbox }
    }

    /// Queue a message. Returns `false` if it was dropped.
    pub fn send(&self, topic: &str, payload: &str) -> bool {
        let Some(message) = Message::new(topic, payload) else {
            warn!("bus: message for {} is too long, dropped", topic);
            return false;
        };
        if self.outbox.post(message).is_err() {
            warn!("bus: outbox full, dropped message for {}", topic);
            return false;
        }
        true
    }
}

/// Why a command could not be delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchError {
    /// The payload was not understood
    Rejected,
    /// The receiver has no room for another command
    Full,
}

/// Receiver of commands routed from the bus
pub trait CommandSink {
    fn deliver(&self, payload: &str) -> core::result::Result<(), DispatchError>;
}

/// Non-blocking message transport
pub trait MessageTransport {
    type Error: Debug;

    /// Bind the listening port and set the outgoing port
    fn open(&mut self, in_port: u16, out_port: u16) -> core::result::Result<(), Self::Error>;

    fn close(&mut self);

    /// Try to hand one message to the network.
    ///
    /// `Ok(false)` means the transport is busy and the message should be
    /// retried later.
    fn try_send(&mut self, message: &Message) -> core::result::Result<bool, Self::Error>;

    /// Next received message, if any
    fn try_receive(&mut self) -> Option<Message>;
}

struct Subscription<'a> {
    address: &'static str,
    sink: &'a dyn CommandSink,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BusState {
    Closed { retry_at: Instant },
    Open,
}

pub struct MessageBusController<'a, T: MessageTransport, const OUT: usize = OUTBOX_SIZE> {
    transport: T,
    config: BusConfig,
    link: &'a LinkState,
    outbox: &'a Outbox<OUT>,
    subscriptions: Vec<Subscription<'a>, MAX_SUBSCRIPTIONS>,
    state: BusState,
    delivered: u32,
}

impl<'a, T: MessageTransport, const OUT: usize> MessageBusController<'a, T, OUT> {
    pub fn new(transport: T, config: BusConfig, link: &'a LinkState, outbox: &'a Outbox<OUT>) -> Self {
        Self {
            transport,
            config,
            link,
            outbox,
            subscriptions: Vec::new(),
            state: BusState::Closed {
                retry_at: Instant::from_ticks(0),
            },
            delivered: 0,
        }
    }

    /// Route messages addressed to `address` into `sink`
    pub fn subscribe(&mut self, address: &'static str, sink: &'a dyn CommandSink) -> Result<()> {
        self.subscriptions
            .push(Subscription { address, sink })
            .map_err(|_| Error::CapacityExceeded)
    }

    pub const fn sender(&self) -> BusSender<'a, OUT> {
        BusSender::new(self.outbox)
    }

    pub const fn is_open(&self) -> bool {
        matches!(self.state, BusState::Open)
    }

    /// Commands accepted by a subscriber
    pub const fn delivered(&self) -> u32 {
        self.delivered
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn open(&mut self, now: Instant) {
        match self.transport.open(self.config.in_port, self.config.out_port) {
            Ok(()) => {
                info!(
                    "bus: listening on {}, sending to {}",
                    self.config.in_port, self.config.out_port
                );
                self.state = BusState::Open;
            }
            Err(err) => {
                warn!("bus: failed to open: {:?}", err);
                self.state = BusState::Closed {
                    retry_at: now + REOPEN_DELAY,
                };
            }
        }
    }

    fn dispatch(&mut self, message: &Message) {
        let Some(subscription) = self
            .subscriptions
            .iter()
            .find(|s| s.address == message.topic.as_str())
        else {
            debug!("bus: no subscriber for {}", message.topic.as_str());
            return;
        };
        match subscription.sink.deliver(message.payload.as_str()) {
            Ok(()) => self.delivered = self.delivered.wrapping_add(1),
            Err(err) => warn!("bus: {} not delivered: {:?}", message.topic.as_str(), err),
        }
    }

    fn receive(&mut self) {
        for _ in 0..MAX_MESSAGES_PER_TICK {
            let Some(message) = self.transport.try_receive() else {
                break;
            };
            self.dispatch(&message);
        }
    }

    fn flush(&mut self) {
        for _ in 0..MAX_MESSAGES_PER_TICK {
            let Some(message) = self.outbox.take() else {
                break;
            };
            match self.transport.try_send(&message) {
                Ok(true) => {}
                Ok(false) => {
                    // Transport busy, keep the message at the head
                    if let Err(lost) = self.outbox.requeue(message) {
                        warn!(
                            "bus: outbox refilled while busy, dropped message for {}",
                            lost.0.topic.as_str()
                        );
                    }
                    break;
                }
                Err(err) => {
                    warn!("bus: send to {} failed: {:?}", message.topic.as_str(), err);
                }
            }
        }
    }
}

impl<T: MessageTransport, const OUT: usize> Controller for MessageBusController<'_, T, OUT> {
    fn name(&self) -> &'static str {
        "bus"
    }

    fn setup(&mut self, now: Instant) -> Result<()> {
        if self.link.is_up() {
            self.open(now);
        } else {
            info!("bus: waiting for network");
        }
        Ok(())
    }

    fn tick(&mut self, now: Instant) -> Result<()> {
        match self.state {
            BusState::Closed { retry_at } => {
                if self.link.is_up() && now >= retry_at {
                    self.open(now);
                }
            }
            BusState::Open => {
                if !self.link.is_up() {
                    warn!("bus: network lost, closing");
                    self.transport.close();
                    self.state = BusState::Closed { retry_at: now };
                }
            }
        }

        if self.is_open() {
            self.receive();
            self.flush();
        }
        Ok(())
    }
}
