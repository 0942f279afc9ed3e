use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum ReciteEvent {
    Key(KeyEvent),
    Resize,
    Tick(Instant),
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait ReciteEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<ReciteEvent, RecvTimeoutError>;
}

/// Event source fed through a channel. Tests push events directly; the
/// terminal source is a reader thread feeding one of these.
pub struct ChannelEventSource {
    rx: Receiver<ReciteEvent>,
}

impl ChannelEventSource {
    pub fn new(rx: Receiver<ReciteEvent>) -> Self {
        Self { rx }
    }

    pub fn pair() -> (Sender<ReciteEvent>, Self) {
        let (tx, rx) = mpsc::channel();
        (tx, Self::new(rx))
    }
}

impl ReciteEventSource for ChannelEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<ReciteEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Spawn a thread reading crossterm events into a channel source.
pub fn crossterm_events() -> ChannelEventSource {
    let (tx, source) = ChannelEventSource::pair();

    std::thread::spawn(move || loop {
        let evt = match event::read() {
            // key release events only show up on some platforms
            Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => ReciteEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => ReciteEvent::Resize,
            Ok(_) => continue,
            Err(_) => break,
        };
        if tx.send(evt).is_err() {
            break;
        }
    });

    source
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Runner that advances the application one event/tick at a time
pub struct Runner<E: ReciteEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
}

impl<E: ReciteEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
        }
    }

    /// Blocks up to tick interval and returns the next event, or Tick on timeout
    pub fn step(&self) -> ReciteEvent {
        match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                ReciteEvent::Tick(Instant::now())
            }
        }
    }
}
