use serde::{Deserialize, Serialize};
use std::fmt;

/// Round state machine position
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Idle,
    Playing,
    Crashed,
    #[serde(rename = "cashed-out")]
    CashedOut,
}

impl Phase {
    /// Style hint for presentation; `None` while idle
    pub fn style_class(&self) -> Option<&'static str> {
        match self {
            Phase::Idle => None,
            Phase::Playing => Some("playing"),
            Phase::Crashed => Some("crashed"),
            Phase::CashedOut => Some("cashed-out"),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Phase::Crashed | Phase::CashedOut)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Idle => write!(f, "idle"),
            Phase::Playing => write!(f, "playing"),
            Phase::Crashed => write!(f, "crashed"),
            Phase::CashedOut => write!(f, "cashed-out"),
        }
    }
}

/// Outcome of one resolved round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    /// Rounded to two decimals, as displayed
    pub multiplier: f64,
    pub is_win: bool,
}

impl HistoryEntry {
    pub fn win(multiplier: f64) -> Self {
        Self {
            multiplier: round_cents(multiplier),
            is_win: true,
        }
    }

    pub fn loss(multiplier: f64) -> Self {
        Self {
            multiplier: round_cents(multiplier),
            is_win: false,
        }
    }
}

pub(crate) fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Info,
    Win,
    Loss,
    Error,
}

/// Status line shown to the player
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Message {
    pub text: String,
    pub kind: MessageKind,
}

impl Message {
    /// Empty info message; presentation hides it
    pub fn hidden() -> Self {
        Self {
            text: String::new(),
            kind: MessageKind::Info,
        }
    }

    pub fn new(text: impl Into<String>, kind: MessageKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn is_hidden(&self) -> bool {
        self.text.is_empty()
    }
}

/// What a transition did, returned by the engine operations
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RoundEvent {
    Started { bet: f64 },
    Climbing { multiplier: f64 },
    Crashed { crash_point: f64, lost: f64 },
    CashedOut { multiplier: f64, winnings: f64 },
}

/// State pushed to presentation after every transition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RoundSnapshot {
    pub balance: f64,
    pub bet: f64,
    pub multiplier: f64,
    pub phase: Phase,
    pub potential_win: f64,
    pub can_start: bool,
    pub can_cash_out: bool,
    pub message: Message,
    pub history: Vec<HistoryEntry>,
}

/// Running totals for the session
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionStats {
    pub rounds_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub total_wagered: f64,
    pub total_returned: f64,
    pub best_cash_out: Option<f64>,
}

impl SessionStats {
    /// Returned minus wagered over resolved rounds
    pub fn net(&self) -> f64 {
        self.total_returned - self.total_wagered
    }

    pub fn win_rate(&self) -> f64 {
        let resolved = self.wins + self.losses;
        if resolved == 0 {
            return 0.0;
        }
        self.wins as f64 / resolved as f64
    }

    /// Totals accumulated after `earlier` was taken. The best cash-out is
    /// only kept when it was set or improved in that window.
    pub fn since(&self, earlier: &SessionStats) -> SessionStats {
        SessionStats {
            rounds_played: self.rounds_played - earlier.rounds_played,
            wins: self.wins - earlier.wins,
            losses: self.losses - earlier.losses,
            total_wagered: self.total_wagered - earlier.total_wagered,
            total_returned: self.total_returned - earlier.total_returned,
            best_cash_out: self
                .best_cash_out
                .filter(|_| self.best_cash_out != earlier.best_cash_out),
        }
    }
}
