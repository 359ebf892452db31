//! Error types for the crash simulator
//!
//! Round errors are always recoverable: they become a user-visible message and
//! leave the round state untouched. Configuration and I/O errors surface from
//! the binary and the session driver.

use thiserror::Error;

/// Root error type for all crash-sim operations
#[derive(Debug, Error)]
pub enum CrashSimError {
    /// Configuration loading or validation failed
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A player intent was rejected by the round engine
    #[error("Round error: {0}")]
    Round(#[from] RoundError),

    /// Terminal or stdin failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Snapshot serialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Rejected player intents
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RoundError {
    /// Bet exceeds the current balance
    #[error("Insufficient balance: bet {bet:.2} exceeds balance {balance:.2}")]
    InsufficientBalance { bet: f64, balance: f64 },

    /// Bet is below the table minimum
    #[error("Bet {bet:.2} is below the minimum of {minimum:.2}")]
    BelowMinimumBet { bet: f64, minimum: f64 },

    /// Intent not valid in the current phase
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

impl RoundError {
    /// Short text shown to the player
    pub fn user_message(&self) -> String {
        match self {
            RoundError::InsufficientBalance { .. } => "Insufficient balance!".to_string(),
            RoundError::BelowMinimumBet { minimum, .. } => {
                format!("Minimum bet is ${}", format_amount(*minimum))
            }
            RoundError::InvalidOperation(reason) => reason.clone(),
        }
    }
}

/// Drops the cents when the amount is whole, so a 1.0 minimum reads "$1".
fn format_amount(amount: f64) -> String {
    if amount.fract() == 0.0 {
        format!("{:.0}", amount)
    } else {
        format!("{:.2}", amount)
    }
}

/// Configuration loading and validation errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}: {source}")]
    LoadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration: {0}")]
    ParseFailed(#[from] toml::de::Error),

    #[error("Invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// Convenience type alias for Results
pub type CrashSimResult<T> = Result<T, CrashSimError>;
