//! crash-sim CLI
//!
//! `play` runs an interactive round loop on the terminal; `simulate` autoplays
//! a fixed cash-out strategy on a simulated clock.

use clap::{Parser, Subcommand};
use crash_sim::{
    build_engine,
    config::CrashSimConfig,
    errors::{ConfigError, CrashSimResult},
    presentation::{JsonPresenter, Presenter, TerminalPresenter},
    session::{parse_command, Intent, Session},
    simulation::{SimulationConfig, SimulationRunner},
};
use std::{io, path::PathBuf};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, BufReader},
    sync::mpsc,
};
use tracing::warn;
use tracing_subscriber::EnvFilter;

const HELP: &str = "Commands: start [amount] | cash | bet <amount> | quit";

/// Crash betting simulator
#[derive(Parser)]
#[command(name = "crash-sim")]
#[command(about = "Single-player crash betting simulator", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Configuration file path (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Seed for reproducible crash points
    #[arg(long, global = true)]
    seed: Option<u64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Play interactively on the terminal
    Play {
        /// Emit one JSON snapshot per line instead of text
        #[arg(long)]
        json: bool,
    },

    /// Autoplay rounds with a fixed cash-out target
    Simulate {
        /// Number of rounds to play
        #[arg(short, long, default_value = "100")]
        rounds: u64,

        /// Cash out once the multiplier reaches this value
        #[arg(short = 'x', long, default_value = "2.0")]
        cash_out_at: f64,

        /// Bet per round (defaults to the configured bet)
        #[arg(short, long)]
        bet: Option<f64>,
    },
}

#[tokio::main]
async fn main() -> CrashSimResult<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => CrashSimConfig::load_from_file(path)?,
        None => match &cli.command {
            Some(Commands::Simulate { .. }) => CrashSimConfig::quick_rounds(),
            _ => CrashSimConfig::default(),
        },
    };

    init_tracing(&config, cli.verbose);

    match cli.command.unwrap_or(Commands::Play { json: false }) {
        Commands::Play { json } => run_play(config, cli.seed, json).await,
        Commands::Simulate {
            rounds,
            cash_out_at,
            bet,
        } => run_simulation(config, cli.seed, rounds, cash_out_at, bet),
    }
}

/// Logs go to stderr so they never interleave with the game on stdout
fn init_tracing(config: &CrashSimConfig, verbose: bool) {
    let level = if verbose {
        "debug"
    } else {
        config.logging.log_level.as_filter()
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("crash_sim={}", level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_play(config: CrashSimConfig, seed: Option<u64>, json: bool) -> CrashSimResult<()> {
    let engine = build_engine(&config, seed);
    let (tx, mut rx) = mpsc::channel(32);
    let reader = tokio::spawn(async move {
        if let Err(err) = read_commands(BufReader::new(tokio::io::stdin()), tx).await {
            warn!("Command reader stopped: {}", err);
        }
    });

    if !json {
        println!("💥 crash-sim");
        println!("{}", HELP);
    }

    let stats = if json {
        play_with(engine, JsonPresenter::new(io::stdout()), &config, &mut rx).await?
    } else {
        play_with(engine, TerminalPresenter::new(io::stdout()), &config, &mut rx).await?
    };
    reader.abort();

    if !json {
        println!(
            "\nRounds: {} | Wins: {} | Losses: {} | Win rate: {:.1}% | Net: {:+.2}",
            stats.rounds_played,
            stats.wins,
            stats.losses,
            stats.win_rate() * 100.0,
            stats.net()
        );
        if let Some(best) = stats.best_cash_out {
            println!("Best cash-out: {:.2}x", best);
        }
    }
    Ok(())
}

async fn play_with<P: Presenter>(
    engine: crash_sim::RoundEngine,
    presenter: P,
    config: &CrashSimConfig,
    rx: &mut mpsc::Receiver<Intent>,
) -> CrashSimResult<crash_sim::games::SessionStats> {
    let mut session = Session::new(engine, presenter, config.tick_interval());
    session.run(rx).await?;
    Ok(session.engine().stats().clone())
}

/// Forward parsed commands until `quit`, end of input, or the session hangs up
async fn read_commands<R>(input: R, tx: mpsc::Sender<Intent>) -> CrashSimResult<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_command(trimmed) {
            Some(intent) => {
                let quit = intent == Intent::Quit;
                if tx.send(intent).await.is_err() || quit {
                    break;
                }
            }
            None => eprintln!("Unknown command: {}\n{}", trimmed, HELP),
        }
    }
    Ok(())
}

fn run_simulation(
    config: CrashSimConfig,
    seed: Option<u64>,
    rounds: u64,
    cash_out_at: f64,
    bet: Option<f64>,
) -> CrashSimResult<()> {
    if !cash_out_at.is_finite() || cash_out_at < 1.0 {
        return Err(ConfigError::InvalidValue {
            field: "cash_out_at",
            reason: "must be at least 1.0".to_string(),
        }
        .into());
    }

    println!("🎲 Simulating {} rounds, cashing out at {:.2}x", rounds, cash_out_at);

    let mut engine = build_engine(&config, seed);
    let runner = SimulationRunner::new(SimulationConfig {
        rounds,
        bet,
        cash_out_at,
        tick_interval: config.tick_interval(),
    });

    let report = runner.run(&mut engine);
    report.print_summary();
    Ok(())
}
