//! goban-bot: Go matches played through chat reactions.
//!
//! ## Usage
//!
//! - `goban-bot` - Run the console driver on stdin/stdout
//! - `goban-bot console` - Same as above
//! - `goban-bot demo [scenario]` - Replay a scripted scenario (all of them by default)

use std::io;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::filter::{LevelFilter, Targets};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use goban_bot::board::{Board, PlayerId};
use goban_bot::config::{EngineConfig, FirstMove};
use goban_bot::console::ConsoleBot;
use goban_bot::cosmetics::{MemoryPlayerStore, Skins};
use goban_bot::game::Match;
use goban_bot::reactions::label;
use goban_bot::registry::SessionId;
use goban_bot::render::{Renderer, TextRenderer};
use goban_bot::rules::PlacementOutcome;
use goban_bot::scenarios::{self, SCENARIOS, Scenario};

/// goban-bot: Go matches played through chat reactions
#[derive(Parser)]
#[command(name = "goban-bot")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// JSON config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Board size (1-9)
    #[arg(long, global = true)]
    board_size: Option<usize>,

    /// Who places the first stone
    #[arg(long, global = true, value_enum)]
    first_move: Option<FirstMove>,

    /// RNG seed for the first-move coin flip
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Print the board after every selection event
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    /// Write replays of finished matches into this directory
    #[arg(long, global = true)]
    replay_dir: Option<PathBuf>,

    /// A log level among "off", "error", "warn", "info", "debug", "trace"
    #[arg(short, long, global = true, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Subcommand)]
enum Commands {
    /// Read platform events as commands from stdin
    Console,
    /// Replay a scripted scenario
    Demo {
        /// Scenario name; all scenarios when omitted
        scenario: Option<String>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    initialize_logging(cli.log_level);

    let config = build_config(&cli)?;
    info!(board_size = config.board_size, first_move = ?config.first_move, "Starting");

    match cli.command {
        Some(Commands::Demo { scenario }) => run_demo(&config, scenario.as_deref()),
        Some(Commands::Console) | None => {
            let mut bot = ConsoleBot::new(config)?;
            bot.run(io::stdin().lock(), io::stdout())
        }
    }
}

fn build_config(cli: &Cli) -> anyhow::Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    if let Some(size) = cli.board_size {
        config.board_size = size;
    }
    if let Some(first_move) = cli.first_move {
        config.first_move = first_move;
    }
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.verbose {
        config.verbose = true;
    }
    if cli.replay_dir.is_some() {
        config.replay_dir = cli.replay_dir.clone();
    }
    config.validate()?;
    Ok(config)
}

fn run_demo(config: &EngineConfig, name: Option<&str>) -> anyhow::Result<()> {
    let selected: Vec<&Scenario> = match name {
        Some(name) => {
            let Some(scenario) = scenarios::find(name) else {
                let names: Vec<&str> = SCENARIOS.iter().map(|s| s.name).collect();
                anyhow::bail!("invalid scenario name. options are {}", names.join(", "));
            };
            vec![scenario]
        }
        None => SCENARIOS.iter().collect(),
    };

    let (black, white) = (PlayerId(1), PlayerId(2));
    for scenario in selected {
        println!("=== {} ===", scenario.name);
        let mut game = Match::new(
            SessionId::new(black, white),
            black,
            white,
            black,
            Board::square(config.board_size),
        );
        for step in scenarios::replay(scenario, &mut game)? {
            let side = if step.player == black { "Black" } else { "White" };
            match step.outcome {
                PlacementOutcome::Accepted { captured } if captured.is_empty() => {
                    println!("{side} at {}: accepted", label(step.position));
                }
                PlacementOutcome::Accepted { captured } => {
                    let points: Vec<String> = captured.into_iter().map(label).collect();
                    println!(
                        "{side} at {}: accepted, captured {}",
                        label(step.position),
                        points.join(", ")
                    );
                }
                PlacementOutcome::Rejected(reason) => {
                    println!("{side} at {}: {reason}", label(step.position));
                }
            }
        }
        let skins = Skins::resolve(&MemoryPlayerStore::new(), &game);
        println!("{}", TextRenderer.render(&game.snapshot(), &skins)?);
    }
    Ok(())
}

fn initialize_logging(level: LevelFilter) {
    let format = tracing_subscriber::fmt::format()
        .with_target(false)
        .compact();

    let filter = Targets::new().with_default(level);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .event_format(format)
                .with_writer(io::stderr),
        )
        .with(filter)
        .init();
}
