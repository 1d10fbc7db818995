use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Countdown period.
pub const TICK_RATE: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    /// One countdown period elapsed.
    Tick,
    /// A caller supplied wake-up deadline passed.
    Wake,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // some platforms report releases too; only presses are input
                Ok(CtEvent::Key(key)) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
                Ok(_) => continue,
                Err(err) => {
                    tracing::error!("terminal event reader stopped: {err}");
                    break;
                }
            };
            if tx.send(evt).is_err() {
                break;
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
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

/// Test event source for unit tests
pub struct TestEventSource {
    rx: Receiver<AppEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<AppEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Multiplexes input events with a fixed-period tick. Ticks are scheduled on
/// absolute deadlines so a steady stream of keystrokes never delays them.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Instant::now() + ticker.interval();
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Re-align the tick schedule so the first tick lands one interval after `now`.
    pub fn restart_ticks(&mut self, now: Instant) {
        self.next_tick = now + self.ticker.interval();
    }

    pub fn next_tick(&self) -> Instant {
        self.next_tick
    }

    fn take_tick(&mut self) -> AppEvent {
        self.next_tick += self.ticker.interval();
        AppEvent::Tick
    }

    /// Blocks until the next event, tick, or `wakeup`, whichever comes first.
    pub fn step(&mut self, wakeup: Option<Instant>) -> AppEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.take_tick();
        }
        if wakeup.is_some_and(|w| now >= w) {
            return AppEvent::Wake;
        }

        let deadline = wakeup.map_or(self.next_tick, |w| w.min(self.next_tick));
        match self
            .event_source
            .recv_timeout(deadline.saturating_duration_since(now))
        {
            Ok(ev) => ev,
            Err(err) => {
                if err == RecvTimeoutError::Disconnected {
                    std::thread::sleep(deadline.saturating_duration_since(Instant::now()));
                }
                if Instant::now() >= self.next_tick {
                    self.take_tick()
                } else {
                    AppEvent::Wake
                }
            }
        }
    }
}
