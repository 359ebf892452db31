//! Autoplay on a simulated clock
//!
//! Drives the same engine operations the interactive session uses, but advances
//! a virtual clock by one tick interval per step instead of sleeping.

use crate::games::{RoundEngine, RoundEvent};
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Clone, Debug)]
pub struct SimulationConfig {
    pub rounds: u64,
    /// `None` keeps the engine's current bet
    pub bet: Option<f64>,
    /// Cash out as soon as the multiplier reaches this value
    pub cash_out_at: f64,
    pub tick_interval: Duration,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            bet: None,
            cash_out_at: 2.0,
            tick_interval: Duration::from_millis(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub rounds_played: u64,
    pub wins: u64,
    pub losses: u64,
    pub win_rate: f64,
    /// Set when a win during the run raised the engine's best cash-out
    pub best_cash_out: Option<f64>,
    pub starting_balance: f64,
    pub final_balance: f64,
    pub highest_crash: f64,
    /// Set when a round could not start, usually because the balance ran out
    pub stopped_early: Option<String>,
}

impl SimulationReport {
    pub fn net(&self) -> f64 {
        self.final_balance - self.starting_balance
    }

    pub fn print_summary(&self) {
        println!("\nSimulation Results:");
        println!("Rounds played: {}", self.rounds_played);
        println!("Wins / losses: {} / {}", self.wins, self.losses);
        println!("Win rate: {:.1}%", self.win_rate * 100.0);
        match self.best_cash_out {
            Some(best) => println!("Best cash-out: {:.2}x", best),
            None => println!("Best cash-out: none"),
        }
        println!("Highest crash point: {:.2}x", self.highest_crash);
        println!(
            "Balance: ${:.2} -> ${:.2} (net {:+.2})",
            self.starting_balance,
            self.final_balance,
            self.net()
        );
        if let Some(reason) = &self.stopped_early {
            println!("Stopped early: {}", reason);
        }
    }
}

pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, engine: &mut RoundEngine) -> SimulationReport {
        let starting_balance = engine.balance();
        let stats_before = engine.stats().clone();
        let mut highest_crash: f64 = 0.0;
        let mut stopped_early = None;

        let mut clock = Instant::now();
        let bet = self.config.bet.unwrap_or_else(|| engine.bet());

        for round in 0..self.config.rounds {
            if let Err(err) = engine.start_round(bet, clock) {
                info!("Simulation stopped after {} rounds: {}", round, err);
                stopped_early = Some(err.user_message());
                break;
            }

            loop {
                clock += self.config.tick_interval;
                match engine.tick(clock) {
                    Some(RoundEvent::Crashed { crash_point, .. }) => {
                        highest_crash = highest_crash.max(crash_point);
                        break;
                    }
                    Some(RoundEvent::Climbing { multiplier })
                        if multiplier >= self.config.cash_out_at =>
                    {
                        if let Err(err) = engine.cash_out() {
                            debug!("Cash-out refused: {}", err);
                        }
                        break;
                    }
                    Some(_) => {}
                    None => break,
                }
            }

            debug!(round, balance = engine.balance(), "Simulated round finished");
        }

        let played = engine.stats().since(&stats_before);
        SimulationReport {
            rounds_played: played.rounds_played,
            wins: played.wins,
            losses: played.losses,
            win_rate: played.win_rate(),
            best_cash_out: played.best_cash_out,
            starting_balance,
            final_balance: engine.balance(),
            highest_crash,
            stopped_early,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{HistoryLog, Phase, RandomCrashGenerator, ScriptedCrashPoints, TableRules};

    fn engine_with(balance: f64, source: Box<dyn crate::games::CrashPointSource>) -> RoundEngine {
        RoundEngine::new(balance, TableRules::default(), source, HistoryLog::default())
    }

    #[test]
    fn test_scripted_rounds() {
        let mut engine = engine_with(1000.0, Box::new(ScriptedCrashPoints::new(vec![1.5, 3.0])));
        let runner = SimulationRunner::new(SimulationConfig {
            rounds: 2,
            bet: Some(10.0),
            cash_out_at: 2.0,
            tick_interval: Duration::from_millis(10),
        });

        let report = runner.run(&mut engine);
        assert_eq!(report.rounds_played, 2);
        assert_eq!(report.losses, 1);
        assert_eq!(report.wins, 1);
        assert_eq!(report.highest_crash, 1.5);
        assert_eq!(report.win_rate, 0.5);
        assert!(report.stopped_early.is_none());
        assert_eq!(engine.phase(), Phase::CashedOut);

        let stats = engine.stats();
        assert_eq!(report.wins, stats.wins);
        assert_eq!(report.losses, stats.losses);
        assert_eq!(report.best_cash_out, stats.best_cash_out);

        // Lost 10, then won roughly 10 * 2.0 on top of the returned stake
        let cashed = engine.history().latest().unwrap().multiplier;
        assert!(cashed >= 2.0 && cashed < 2.02);
        assert!(report.net() > 9.0);
    }

    #[test]
    fn test_stops_when_balance_runs_out() {
        let mut engine = engine_with(30.0, Box::new(ScriptedCrashPoints::new(vec![1.0])));
        let runner = SimulationRunner::new(SimulationConfig {
            rounds: 10,
            bet: Some(10.0),
            ..Default::default()
        });

        let report = runner.run(&mut engine);
        assert_eq!(report.rounds_played, 3);
        assert_eq!(report.losses, 3);
        assert_eq!(report.final_balance, 0.0);
        assert_eq!(report.win_rate, 0.0);
        assert_eq!(report.best_cash_out, None);
        assert_eq!(report.stopped_early.as_deref(), Some("Insufficient balance!"));
    }

    #[test]
    fn test_report_counts_only_this_run() {
        let mut engine = engine_with(
            1000.0,
            Box::new(ScriptedCrashPoints::new(vec![5.0, 1.2, 5.0])),
        );
        let runner = |rounds| {
            SimulationRunner::new(SimulationConfig {
                rounds,
                bet: Some(10.0),
                cash_out_at: 1.5,
                tick_interval: Duration::from_millis(10),
            })
        };

        let first = runner(1).run(&mut engine);
        assert_eq!((first.wins, first.losses), (1, 0));
        assert!(first.best_cash_out.is_some());

        let second = runner(2).run(&mut engine);
        assert_eq!(second.rounds_played, 2);
        assert_eq!((second.wins, second.losses), (1, 1));
        assert_eq!(second.win_rate, 0.5);
        assert_eq!(second.highest_crash, 1.2);
        assert_eq!(engine.stats().rounds_played, 3);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let run = |seed| {
            let mut engine = engine_with(
                1000.0,
                Box::new(RandomCrashGenerator::seeded(seed, 100.0)),
            );
            SimulationRunner::new(SimulationConfig::default()).run(&mut engine)
        };

        let a = run(9);
        let b = run(9);
        assert_eq!(a.final_balance, b.final_balance);
        assert_eq!(a.wins, b.wins);
        assert_eq!(a.wins + a.losses, a.rounds_played);
    }
}
