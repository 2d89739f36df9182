#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use embassy_time::{Duration, Instant};
use ledchain_conductor::bus::{Message, MessageTransport};
use ledchain_conductor::config::{NetworkConfig, UpdateConfig};
use ledchain_conductor::network::{Association, Service, WifiLink};
use ledchain_conductor::update::{UpdateEvent, UpdateServer};
use ledchain_conductor::{Clock, Controller, Error, OutputDriver, Rgb};

/// Clock driven by the test
#[derive(Default)]
pub struct ManualClock {
    now_ms: Cell<u64>,
    delayed_ms: Cell<u64>,
}

impl ManualClock {
    pub fn at(ms: u64) -> Self {
        let clock = Self::default();
        clock.set(ms);
        clock
    }

    pub fn set(&self, ms: u64) {
        self.now_ms.set(ms);
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn delayed(&self) -> Duration {
        Duration::from_millis(self.delayed_ms.get())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now_ms.get())
    }

    fn delay(&self, duration: Duration) {
        self.delayed_ms.set(self.delayed_ms.get() + duration.as_millis());
        self.advance(duration.as_millis());
    }
}

impl Clock for &ManualClock {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn delay(&self, duration: Duration) {
        (**self).delay(duration);
    }
}

/// Lets a test keep inspecting a fake after handing it to a controller
pub struct Shared<'a, T>(pub &'a RefCell<T>);

pub type CallLog = Rc<RefCell<Vec<String>>>;

pub fn call_log() -> CallLog {
    Rc::new(RefCell::new(Vec::new()))
}

/// Controller that records every call into a shared log
pub struct Probe {
    pub name: &'static str,
    pub log: CallLog,
    pub fail_setup: bool,
    pub fail_tick_at: Option<usize>,
    pub ticks: usize,
}

impl Probe {
    pub fn new(name: &'static str, log: &CallLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            fail_setup: false,
            fail_tick_at: None,
            ticks: 0,
        }
    }
}

impl Controller for Probe {
    fn name(&self) -> &'static str {
        self.name
    }

    fn setup(&mut self, _now: Instant) -> ledchain_conductor::Result<()> {
        self.log.borrow_mut().push(format!("setup({})", self.name));
        if self.fail_setup {
            return Err(Error::InvalidDataPin(99));
        }
        Ok(())
    }

    fn tick(&mut self, _now: Instant) -> ledchain_conductor::Result<()> {
        self.log.borrow_mut().push(format!("tick({})", self.name));
        self.ticks += 1;
        if self.fail_tick_at == Some(self.ticks) {
            return Err(Error::BufferBusy);
        }
        Ok(())
    }
}

/// Driver keeping a copy of every pushed frame
#[derive(Default)]
pub struct RecordingDriver {
    pub frames: Vec<Vec<Rgb>>,
    pub fail: bool,
}

#[derive(Debug)]
pub struct BusTimeout;

impl OutputDriver for RecordingDriver {
    type Error = BusTimeout;

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        if self.fail {
            return Err(BusTimeout);
        }
        self.frames.push(colors.to_vec());
        Ok(())
    }
}

#[derive(Debug)]
pub struct RadioError;

/// Scripted radio
pub struct FakeLink {
    pub association: Association,
    pub fail_start: bool,
    pub fail_connect: bool,
    pub starts: usize,
    pub connects: usize,
    pub polls: usize,
    pub advertised: Vec<Service>,
}

impl FakeLink {
    pub fn new(association: Association) -> Self {
        Self {
            association,
            fail_start: false,
            fail_connect: false,
            starts: 0,
            connects: 0,
            polls: 0,
            advertised: Vec::new(),
        }
    }
}

impl WifiLink for FakeLink {
    type Error = RadioError;

    fn start(&mut self, _config: &NetworkConfig) -> Result<(), Self::Error> {
        self.starts += 1;
        if self.fail_start {
            return Err(RadioError);
        }
        Ok(())
    }

    fn begin_connect(&mut self) -> Result<(), Self::Error> {
        self.connects += 1;
        if self.fail_connect {
            return Err(RadioError);
        }
        Ok(())
    }

    fn poll(&mut self) -> Association {
        self.polls += 1;
        self.association
    }

    fn advertise(&mut self, service: &Service) -> Result<(), Self::Error> {
        self.advertised.push(*service);
        Ok(())
    }
}

impl WifiLink for Shared<'_, FakeLink> {
    type Error = RadioError;

    fn start(&mut self, config: &NetworkConfig) -> Result<(), Self::Error> {
        self.0.borrow_mut().start(config)
    }

    fn begin_connect(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().begin_connect()
    }

    fn poll(&mut self) -> Association {
        self.0.borrow_mut().poll()
    }

    fn advertise(&mut self, service: &Service) -> Result<(), Self::Error> {
        self.0.borrow_mut().advertise(service)
    }
}

#[derive(Debug)]
pub struct ServerError;

/// Update server replaying queued events
#[derive(Default)]
pub struct FakeServer {
    pub events: VecDeque<UpdateEvent>,
    pub begins: usize,
    pub ends: usize,
    pub fail_begin: bool,
}

impl UpdateServer for FakeServer {
    type Error = ServerError;

    fn begin(&mut self, _config: &UpdateConfig) -> Result<(), Self::Error> {
        self.begins += 1;
        if self.fail_begin {
            return Err(ServerError);
        }
        Ok(())
    }

    fn end(&mut self) {
        self.ends += 1;
    }

    fn poll(&mut self) -> Option<UpdateEvent> {
        self.events.pop_front()
    }
}

#[derive(Debug)]
pub struct SocketError;

/// In-memory transport
#[derive(Default)]
pub struct FakeTransport {
    pub inbound: VecDeque<Message>,
    pub sent: Vec<(String, String)>,
    pub busy: bool,
    pub opens: usize,
    pub closes: usize,
    pub fail_open: bool,
}

impl FakeTransport {
    pub fn push_inbound(&mut self, topic: &str, payload: &str) {
        self.inbound
            .push_back(Message::new(topic, payload).expect("message fits"));
    }
}

impl MessageTransport for FakeTransport {
    type Error = SocketError;

    fn open(&mut self, _in_port: u16, _out_port: u16) -> Result<(), Self::Error> {
        self.opens += 1;
        if self.fail_open {
            return Err(SocketError);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.closes += 1;
    }

    fn try_send(&mut self, message: &Message) -> Result<bool, Self::Error> {
        if self.busy {
            return Ok(false);
        }
        self.sent.push((
            message.topic.as_str().to_string(),
            message.payload.as_str().to_string(),
        ));
        Ok(true)
    }

    fn try_receive(&mut self) -> Option<Message> {
        self.inbound.pop_front()
    }
}

impl MessageTransport for Shared<'_, FakeTransport> {
    type Error = SocketError;

    fn open(&mut self, in_port: u16, out_port: u16) -> Result<(), Self::Error> {
        self.0.borrow_mut().open(in_port, out_port)
    }

    fn close(&mut self) {
        self.0.borrow_mut().close();
    }

    fn try_send(&mut self, message: &Message) -> Result<bool, Self::Error> {
        self.0.borrow_mut().try_send(message)
    }

    fn try_receive(&mut self) -> Option<Message> {
        self.0.borrow_mut().try_receive()
    }
}

impl OutputDriver for Shared<'_, RecordingDriver> {
    type Error = BusTimeout;

    fn write(&mut self, colors: &[Rgb]) -> Result<(), Self::Error> {
        self.0.borrow_mut().write(colors)
    }
}

pub fn ms(value: u64) -> Instant {
    Instant::from_millis(value)
}
