use std::{path::PathBuf, process::ExitCode};

use backend::{load_game, save_history, Backend};
use board::Game;
use clap::{Parser, ValueEnum};
use engines::Engine;
use monke::MonkeEngine;
use terminal_ui::TerminalUIPlayer;
use tracing_subscriber::EnvFilter;

/// Play a game of chess in the terminal
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Who plays white
    #[arg(long, value_enum, default_value_t = Side::Human)]
    white: Side,
    /// Who plays black
    #[arg(long, value_enum, default_value_t = Side::Random)]
    black: Side,
    /// Seed for the random players, for reproducible games
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many more moves
    #[arg(long, default_value_t = 1000)]
    max_plies: usize,
    /// Continue the game saved in this file
    #[arg(long)]
    load: Option<PathBuf>,
    /// Save the game to this file when it ends
    #[arg(long)]
    save: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Side {
    /// Type moves into the terminal
    Human,
    /// Pick uniformly random legal moves
    Random,
}

fn engine(side: Side, seed: Option<u64>) -> Box<dyn Engine> {
    match (side, seed) {
        (Side::Human, _) => Box::new(TerminalUIPlayer::stdio()),
        (Side::Random, Some(seed)) => Box::new(MonkeEngine::with_seed(seed)),
        (Side::Random, None) => Box::new(MonkeEngine::new()),
    }
}

fn run(args: Args) -> backend::Result<()> {
    let game = match &args.load {
        Some(path) => load_game(path)?,
        None => Game::new(),
    };
    let white = engine(args.white, args.seed);
    let black = engine(args.black, args.seed.map(|seed| seed.wrapping_add(1)));
    let mut backend = Backend::with_game(game, white, black);

    let report = backend.play_game(args.max_plies)?;
    println!("{}", backend.game());
    println!("{report}");
    if let Some(path) = &args.save {
        save_history(path, backend.game())?;
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "game failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
