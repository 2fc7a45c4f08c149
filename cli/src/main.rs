use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;

mod play;

#[derive(Parser, Debug)]
#[command(version, about = "Plays grid minigames headlessly", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Force a seed instead of random
    #[arg(short, long, global = true)]
    seed: Option<u64>,

    /// JSON settings for the selected game, missing fields keep their defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Stop after this many simulated seconds
    #[arg(long, global = true, default_value_t = 600)]
    max_seconds: u32,

    #[command(subcommand)]
    game: Command,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Spin the lottery until a line completes
    Bingo,
    /// Run a number of generations
    Life {
        #[arg(long, default_value_t = 20)]
        steps: i32,
    },
    /// Sweep the board with a naive player
    Minesweeper,
    /// Greedy human against the greedy opponent
    Reversi,
}

fn load_settings<T: DeserializeOwned + Default>(path: Option<&Path>) -> Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("Could not read settings from {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Could not parse settings in {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(log_level) = args.verbose.log_level() {
        simple_logger::init_with_level(log_level).context("Error initializing logger")?;
    }

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {seed}");
    let limit = play::Limit::from_seconds(args.max_seconds);
    let config = args.config.as_deref();

    let summary = match args.game {
        Command::Bingo => play::bingo(load_settings(config)?, seed, limit),
        Command::Life { steps } => play::life(load_settings(config)?, seed, steps, limit),
        Command::Minesweeper => play::minesweeper(load_settings(config)?, seed, limit),
        Command::Reversi => play::reversi(load_settings(config)?, limit),
    };
    println!("{summary}");
    Ok(())
}
