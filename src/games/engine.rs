//! Round engine
//!
//! Owns the single `RoundState` for a session and drives it through
//! `Idle -> Playing -> {Crashed | CashedOut}`. The engine never touches a timer
//! or a clock of its own: callers pass `now` in, which keeps crash detection tied
//! to elapsed time rather than to how often `tick` happens to run.

use crate::{
    config::GameConfig,
    errors::RoundError,
    games::{
        crash_generator::CrashPointSource,
        curve::MultiplierCurve,
        history::HistoryLog,
        types::{
            HistoryEntry, Message, MessageKind, Phase, RoundEvent, RoundSnapshot, SessionStats,
        },
    },
};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Mutable state of the session's current round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub balance: f64,
    pub bet: f64,
    pub multiplier: f64,
    pub crash_point: Option<f64>,
    pub phase: Phase,
    pub start_time: Option<Instant>,
}

impl RoundState {
    pub fn new(initial_balance: f64, default_bet: f64) -> Self {
        Self {
            balance: initial_balance,
            bet: default_bet,
            multiplier: 1.0,
            crash_point: None,
            phase: Phase::Idle,
            start_time: None,
        }
    }

    pub fn potential_win(&self) -> f64 {
        self.bet * self.multiplier
    }
}

/// Table limits the engine enforces
#[derive(Debug, Clone, Copy)]
pub struct TableRules {
    pub min_bet: f64,
    pub default_bet: f64,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            min_bet: 1.0,
            default_bet: 10.0,
        }
    }
}

pub struct RoundEngine {
    state: RoundState,
    rules: TableRules,
    source: Box<dyn CrashPointSource>,
    curve: MultiplierCurve,
    history: HistoryLog,
    message: Message,
    stats: SessionStats,
}

impl RoundEngine {
    pub fn new(
        initial_balance: f64,
        rules: TableRules,
        source: Box<dyn CrashPointSource>,
        history: HistoryLog,
    ) -> Self {
        Self {
            state: RoundState::new(initial_balance, rules.default_bet),
            rules,
            source,
            curve: MultiplierCurve::default(),
            history,
            message: Message::hidden(),
            stats: SessionStats::default(),
        }
    }

    pub fn from_config(config: &GameConfig, source: Box<dyn CrashPointSource>) -> Self {
        let rules = TableRules {
            min_bet: config.min_bet,
            default_bet: config.default_bet,
        };
        Self::new(
            config.initial_balance,
            rules,
            source,
            HistoryLog::with_capacity(config.history_capacity),
        )
    }

    /// Begin a round, deducting the stake up front
    pub fn start_round(&mut self, bet_amount: f64, now: Instant) -> Result<RoundEvent, RoundError> {
        if let Err(err) = self.validate_start(bet_amount) {
            warn!("Rejected round start: {}", err);
            self.message = Message::new(err.user_message(), MessageKind::Error);
            return Err(err);
        }

        let crash_point = self.source.next_crash_point();

        self.state.balance -= bet_amount;
        self.state.bet = bet_amount;
        self.state.multiplier = 1.0;
        self.state.crash_point = Some(crash_point);
        self.state.phase = Phase::Playing;
        self.state.start_time = Some(now);
        self.message = Message::hidden();

        self.stats.rounds_played += 1;
        self.stats.total_wagered += bet_amount;

        info!(bet = bet_amount, balance = self.state.balance, "Round started");
        debug!(crash_point, "Crash point drawn");

        Ok(RoundEvent::Started { bet: bet_amount })
    }

    fn validate_start(&self, bet_amount: f64) -> Result<(), RoundError> {
        if self.state.phase == Phase::Playing {
            return Err(RoundError::InvalidOperation(
                "A round is already in progress".to_string(),
            ));
        }

        // NaN slips past both comparisons below
        if bet_amount.is_nan() {
            return Err(RoundError::BelowMinimumBet {
                bet: bet_amount,
                minimum: self.rules.min_bet,
            });
        }

        if bet_amount > self.state.balance {
            return Err(RoundError::InsufficientBalance {
                bet: bet_amount,
                balance: self.state.balance,
            });
        }

        if bet_amount < self.rules.min_bet {
            return Err(RoundError::BelowMinimumBet {
                bet: bet_amount,
                minimum: self.rules.min_bet,
            });
        }

        Ok(())
    }

    /// Advance the multiplier to `now`; `None` when no round is playing
    pub fn tick(&mut self, now: Instant) -> Option<RoundEvent> {
        if self.state.phase != Phase::Playing {
            return None;
        }
        let (Some(start_time), Some(crash_point)) = (self.state.start_time, self.state.crash_point)
        else {
            return None;
        };

        let elapsed = now.saturating_duration_since(start_time);
        let current = self.curve.value_after(elapsed);

        if current >= crash_point {
            return Some(self.resolve_crash(crash_point));
        }

        self.state.multiplier = current;
        Some(RoundEvent::Climbing {
            multiplier: current,
        })
    }

    fn resolve_crash(&mut self, crash_point: f64) -> RoundEvent {
        let lost = self.state.bet;

        self.state.multiplier = crash_point;
        self.state.phase = Phase::Crashed;
        self.history.record(HistoryEntry::loss(crash_point));
        self.stats.losses += 1;
        self.message = Message::new(
            format!("Crashed at {:.2}x! You lost ${:.2}", crash_point, lost),
            MessageKind::Loss,
        );

        info!(crash_point, lost, balance = self.state.balance, "Round crashed");

        RoundEvent::Crashed { crash_point, lost }
    }

    /// Lock in the current multiplier; returns stake plus profit
    pub fn cash_out(&mut self) -> Result<RoundEvent, RoundError> {
        if self.state.phase != Phase::Playing {
            let err = RoundError::InvalidOperation("No active round to cash out".to_string());
            debug!("Rejected cash out in phase {}", self.state.phase);
            self.message = Message::new(err.user_message(), MessageKind::Error);
            return Err(err);
        }

        let multiplier = self.state.multiplier;
        let winnings = self.state.bet * multiplier;

        self.state.balance += self.state.bet + winnings;
        self.state.phase = Phase::CashedOut;
        self.history.record(HistoryEntry::win(multiplier));

        self.stats.wins += 1;
        self.stats.total_returned += self.state.bet + winnings;
        self.stats.best_cash_out = Some(
            self.stats
                .best_cash_out
                .map_or(multiplier, |best| best.max(multiplier)),
        );
        self.message = Message::new(
            format!("Cashed out at {:.2}x! Won ${:.2}", multiplier, winnings),
            MessageKind::Win,
        );

        info!(multiplier, winnings, balance = self.state.balance, "Cashed out");

        Ok(RoundEvent::CashedOut {
            multiplier,
            winnings,
        })
    }

    /// Change the wager for the next round. Unparseable, non-finite or zero
    /// amounts fall back to the table default.
    pub fn set_bet(&mut self, amount: f64) -> Result<f64, RoundError> {
        if self.state.phase == Phase::Playing {
            let err = RoundError::InvalidOperation(
                "Cannot change the bet during a round".to_string(),
            );
            self.message = Message::new(err.user_message(), MessageKind::Error);
            return Err(err);
        }

        let bet = if amount.is_finite() && amount != 0.0 {
            amount
        } else {
            self.rules.default_bet
        };
        self.state.bet = bet;
        Ok(bet)
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        let playing = self.state.phase == Phase::Playing;
        RoundSnapshot {
            balance: self.state.balance,
            bet: self.state.bet,
            multiplier: self.state.multiplier,
            phase: self.state.phase,
            potential_win: self.state.potential_win(),
            can_start: !playing,
            can_cash_out: playing,
            message: self.message.clone(),
            history: self.history.to_vec(),
        }
    }

    pub fn state(&self) -> &RoundState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn balance(&self) -> f64 {
        self.state.balance
    }

    pub fn bet(&self) -> f64 {
        self.state.bet
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }
}
