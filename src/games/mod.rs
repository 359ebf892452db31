pub mod types;
pub mod crash_generator;
pub mod curve;
pub mod history;
pub mod engine;

pub use types::*;
pub use crash_generator::{CrashPointSource, RandomCrashGenerator, ScriptedCrashPoints};
pub use curve::MultiplierCurve;
pub use history::HistoryLog;
pub use engine::{RoundEngine, RoundState, TableRules};
