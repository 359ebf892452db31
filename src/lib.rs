//! crash-sim - single-player crash betting simulator
//!
//! A wager rides a multiplier that climbs over time; cash out before the
//! predetermined crash point or lose the stake. The engine is synchronous and
//! clock-agnostic, the session driver runs it on tokio, and presentation sits
//! behind the `Presenter` trait.

pub mod config;
pub mod errors;
pub mod games;
pub mod presentation;
pub mod session;
pub mod simulation;

pub use config::CrashSimConfig;
pub use errors::{CrashSimError, CrashSimResult, RoundError};
pub use games::{Phase, RoundEngine, RoundSnapshot};
pub use session::{Intent, Session};

use games::{CrashPointSource, RandomCrashGenerator};

/// Build an engine from configuration, seeding the crash points when asked
pub fn build_engine(config: &CrashSimConfig, seed: Option<u64>) -> RoundEngine {
    let max = config.game.max_crash_point;
    let source: Box<dyn CrashPointSource> = match seed {
        Some(seed) => Box::new(RandomCrashGenerator::seeded(seed, max)),
        None => Box::new(RandomCrashGenerator::from_entropy(max)),
    };
    RoundEngine::from_config(&config.game, source)
}
