//! Configuration management with validation and defaults
//!
//! Loaded from TOML; every section falls back to its defaults when omitted.

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::{path::Path, time::Duration};

/// Complete simulator configuration
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashSimConfig {
    pub game: GameConfig,
    pub timing: TimingConfig,
    pub logging: LoggingConfig,
}

/// Table rules and starting stake
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub initial_balance: f64,
    pub default_bet: f64,
    pub min_bet: f64,
    pub max_crash_point: f64,
    pub history_capacity: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            initial_balance: 1000.0,
            default_bet: 10.0,
            min_bet: 1.0,
            max_crash_point: 100.0,
            history_capacity: 10,
        }
    }
}

/// Tick cadence for the multiplier loop
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Only affects how smooth the display is; crash detection uses elapsed time
    pub tick_interval_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 50,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub log_level: LogLevel,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: LogLevel::Info,
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Directive string understood by `tracing_subscriber::EnvFilter`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl CrashSimConfig {
    /// Finer ticks and quieter logs for autoplay on a simulated clock
    pub fn quick_rounds() -> Self {
        Self {
            timing: TimingConfig {
                tick_interval_ms: 10,
            },
            logging: LoggingConfig {
                log_level: LogLevel::Warn,
            },
            ..Default::default()
        }
    }

    /// Read a TOML file and validate it
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path.display().to_string(),
            source,
        })?;

        let config: CrashSimConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for logical consistency
    pub fn validate(&self) -> Result<(), ConfigError> {
        let game = &self.game;

        if !game.initial_balance.is_finite() || game.initial_balance <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "game.initial_balance",
                reason: "must be a positive amount".to_string(),
            });
        }

        if !game.min_bet.is_finite() || game.min_bet <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "game.min_bet",
                reason: "must be a positive amount".to_string(),
            });
        }

        if game.min_bet > game.initial_balance {
            return Err(ConfigError::InvalidValue {
                field: "game.min_bet",
                reason: format!(
                    "{} exceeds the initial balance of {}",
                    game.min_bet, game.initial_balance
                ),
            });
        }

        if !game.default_bet.is_finite() || game.default_bet <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: "game.default_bet",
                reason: "must be a positive amount".to_string(),
            });
        }

        if game.default_bet < game.min_bet || game.default_bet > game.initial_balance {
            return Err(ConfigError::InvalidValue {
                field: "game.default_bet",
                reason: format!(
                    "{} is outside the range {} to {}",
                    game.default_bet, game.min_bet, game.initial_balance
                ),
            });
        }

        if !game.max_crash_point.is_finite() || game.max_crash_point < 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "game.max_crash_point",
                reason: "must be at least 1.0".to_string(),
            });
        }

        if game.history_capacity == 0 {
            return Err(ConfigError::InvalidValue {
                field: "game.history_capacity",
                reason: "must be > 0".to_string(),
            });
        }

        if self.timing.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timing.tick_interval_ms",
                reason: "must be > 0".to_string(),
            });
        }

        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.timing.tick_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config_is_valid() {
        let config = CrashSimConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.game.initial_balance, 1000.0);
        assert_eq!(config.game.history_capacity, 10);
    }

    #[test]
    fn test_quick_rounds_config_is_valid() {
        let config = CrashSimConfig::quick_rounds();
        assert!(config.validate().is_ok());
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn test_invalid_config_validation() {
        let mut config = CrashSimConfig::default();
        config.game.min_bet = 0.0;
        assert!(config.validate().is_err());

        let mut config = CrashSimConfig::default();
        config.game.min_bet = 5000.0;
        assert!(config.validate().is_err());

        let mut config = CrashSimConfig::default();
        config.game.default_bet = 0.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "game.default_bet",
                ..
            })
        ));

        let mut config = CrashSimConfig::default();
        config.game.default_bet = 5000.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue {
                field: "game.default_bet",
                ..
            })
        ));

        let mut config = CrashSimConfig::default();
        config.game.max_crash_point = 0.5;
        assert!(config.validate().is_err());

        let mut config = CrashSimConfig::default();
        config.timing.tick_interval_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        writeln!(
            file,
            "[game]\ninitial_balance = 250.0\n\n[logging]\nlog_level = \"debug\""
        )
        .expect("write config");

        let config = CrashSimConfig::load_from_file(file.path()).expect("load config");
        assert_eq!(config.game.initial_balance, 250.0);
        assert_eq!(config.game.default_bet, 10.0);
        assert_eq!(config.logging.log_level, LogLevel::Debug);
        assert_eq!(config.tick_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp config");
        writeln!(file, "[timing]\ntick_interval_ms = 0").expect("write config");

        match CrashSimConfig::load_from_file(file.path()) {
            Err(ConfigError::InvalidValue { field, .. }) => {
                assert_eq!(field, "timing.tick_interval_ms")
            }
            other => panic!("Expected invalid value, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let result = CrashSimConfig::load_from_file("/definitely/not/here.toml");
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
    }
}
