//! Session driver
//!
//! Runs one `RoundEngine` on a single task: player intents arrive over an mpsc
//! channel and the multiplier tick comes from a `Ticker` owned by the session.
//! Both are polled from one `select!`, so the engine is never mutated from two
//! places at once.

use crate::{
    errors::CrashSimResult,
    games::{RoundEngine, RoundEvent},
    presentation::Presenter,
};
use std::time::Duration;
use tokio::{
    sync::mpsc,
    time::{self, Instant, Interval, MissedTickBehavior},
};
use tracing::{debug, info};

/// Player intents forwarded by presentation
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Start a round; `None` uses the current bet
    Start(Option<f64>),
    CashOut,
    SetBet(f64),
    Quit,
}

/// Parse one line of terminal input. `None` for blank or unknown input.
pub fn parse_command(line: &str) -> Option<Intent> {
    let mut parts = line.split_whitespace();
    let command = parts.next()?.to_ascii_lowercase();
    let argument = parts.next();

    if parts.next().is_some() {
        return None;
    }

    match (command.as_str(), argument) {
        ("start" | "s" | "play", None) => Some(Intent::Start(None)),
        ("start" | "s" | "play", Some(amount)) => {
            amount.parse().ok().map(|a| Intent::Start(Some(a)))
        }
        ("cash" | "c" | "cashout", None) => Some(Intent::CashOut),
        // Unparseable amounts go through so the engine can apply its default
        ("bet" | "b", Some(amount)) => {
            Some(Intent::SetBet(amount.parse().unwrap_or(f64::NAN)))
        }
        ("quit" | "q" | "exit", None) => Some(Intent::Quit),
        _ => None,
    }
}

/// Cancelable periodic timer. Starting always replaces the previous interval;
/// cancelling is idempotent.
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self {
            period,
            interval: None,
        }
    }

    pub fn start(&mut self) {
        self.cancel();
        let mut interval = time::interval(self.period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        self.interval = Some(interval);
    }

    pub fn cancel(&mut self) {
        if self.interval.take().is_some() {
            debug!("Ticker cancelled");
        }
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Resolves on the next tick; never resolves while cancelled
    pub async fn tick(&mut self) -> Instant {
        match self.interval.as_mut() {
            Some(interval) => interval.tick().await,
            None => std::future::pending().await,
        }
    }
}

pub struct Session<P: Presenter> {
    engine: RoundEngine,
    presenter: P,
    ticker: Ticker,
}

impl<P: Presenter> Session<P> {
    pub fn new(engine: RoundEngine, presenter: P, tick_interval: Duration) -> Self {
        Self {
            engine,
            presenter,
            ticker: Ticker::new(tick_interval),
        }
    }

    /// Process intents and ticks until `Quit` arrives or every sender is dropped
    pub async fn run(&mut self, intents: &mut mpsc::Receiver<Intent>) -> CrashSimResult<()> {
        self.render()?;

        loop {
            tokio::select! {
                intent = intents.recv() => match intent {
                    Some(Intent::Quit) | None => break,
                    Some(intent) => self.handle_intent(intent)?,
                },
                _ = self.ticker.tick(), if self.ticker.is_active() => self.handle_tick()?,
            }
        }

        self.ticker.cancel();
        info!(
            rounds = self.engine.stats().rounds_played,
            balance = self.engine.balance(),
            "Session ended"
        );
        Ok(())
    }

    pub fn handle_intent(&mut self, intent: Intent) -> CrashSimResult<()> {
        match intent {
            Intent::Start(amount) => {
                let bet = amount.unwrap_or_else(|| self.engine.bet());
                let now = Instant::now().into_std();
                if self.engine.start_round(bet, now).is_ok() {
                    self.ticker.start();
                }
            }
            Intent::CashOut => {
                if self.engine.cash_out().is_ok() {
                    self.ticker.cancel();
                }
            }
            Intent::SetBet(amount) => {
                if let Err(err) = self.engine.set_bet(amount) {
                    debug!("Rejected bet change: {}", err);
                }
            }
            Intent::Quit => {}
        }
        self.render()
    }

    pub fn handle_tick(&mut self) -> CrashSimResult<()> {
        let now = Instant::now().into_std();
        match self.engine.tick(now) {
            Some(RoundEvent::Climbing { .. }) => {}
            // Crashed, or a straggler tick with no round playing
            _ => self.ticker.cancel(),
        }
        self.render()
    }

    fn render(&mut self) -> CrashSimResult<()> {
        let snapshot = self.engine.snapshot();
        self.presenter.render(&snapshot)?;
        Ok(())
    }

    pub fn engine(&self) -> &RoundEngine {
        &self.engine
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_active()
    }
}
