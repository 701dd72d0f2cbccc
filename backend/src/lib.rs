//! Runs games between two engines

use core::fmt;
use std::{fs, io, path::Path};

use board::{Color, Game, GameOutcome, Move};
use engines::Engine;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{engine} played {mv}, which isn't legal")]
    EngineMoveRejected {
        engine: String,
        mv: Move,
        #[source]
        source: board::Error,
    },
    #[error(transparent)]
    Board(#[from] board::Error),
    #[error("can't access the history file")]
    Io(#[from] io::Error),
    #[error("the history file is malformed")]
    Json(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Why a game stopped
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Termination {
    Checkmate { winner: Color },
    Stalemate,
    /// The engine for this side gave up instead of moving
    Resignation { loser: Color },
    /// The game hit the limit on its length
    Unfinished,
}

/// How a game went
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct GameReport {
    pub termination: Termination,
    /// The number of moves on the board when the game stopped
    pub plies: usize,
}
impl fmt::Display for GameReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.termination {
            Termination::Checkmate { winner } => write!(f, "Checkmate, {winner:?} wins")?,
            Termination::Stalemate => f.write_str("Stalemate")?,
            Termination::Resignation { loser } => write!(f, "{loser:?} resigned")?,
            Termination::Unfinished => f.write_str("Stopped early")?,
        }
        write!(f, " after {} plies", self.plies)
    }
}

/// A backend which queries moves from the two engines until the game is done
pub struct Backend<White, Black> {
    /// The current state of the game
    game: Game,
    /// The white engine
    white: White,
    /// The black engine
    black: Black,
    /// The side whose engine gave up, if one did
    resigned: Option<Color>,
}

impl<White: Engine, Black: Engine> Backend<White, Black> {
    /// Create a new instance with the chess starting board
    pub fn new(white: White, black: Black) -> Self {
        Self::with_game(Game::new(), white, black)
    }

    /// Continue the given game
    pub fn with_game(game: Game, white: White, black: Black) -> Self {
        Self {
            game,
            white,
            black,
            resigned: None,
        }
    }

    /// Query whoever's turn it is to make a move
    ///
    /// Returns whether a move was made, which it isn't once the game is over.
    pub fn play_half_move(&mut self) -> Result<bool> {
        if self.resigned.is_some() || self.game.outcome() != GameOutcome::InProgress {
            return Ok(false);
        }
        let side = self.game.side_to_move();
        let selected = match side {
            Color::White => self.white.select(&self.game),
            Color::Black => self.black.select(&self.game),
        };
        let Some(mv) = selected else {
            tracing::info!(?side, engine = self.engine_name(side), "resigned");
            self.resigned = Some(side);
            return Ok(false);
        };
        self.game
            .try_make(mv)
            .map_err(|source| Error::EngineMoveRejected {
                engine: self.engine_name(side).to_owned(),
                mv,
                source,
            })?;
        tracing::debug!(?side, %mv, ply = self.game.turn(), "played move");
        Ok(true)
    }

    /// Play the game until it ends or `max_plies` more moves have been made
    pub fn play_game(&mut self, max_plies: usize) -> Result<GameReport> {
        let mut played = 0;
        while played < max_plies && self.play_half_move()? {
            played += 1;
        }
        let report = self.report();
        tracing::info!(termination = ?report.termination, plies = report.plies, "game over");
        Ok(report)
    }

    /// Where the game stands right now
    pub fn report(&self) -> GameReport {
        let termination = match (self.resigned, self.game.outcome()) {
            (Some(loser), _) => Termination::Resignation { loser },
            (None, GameOutcome::Checkmate { winner }) => Termination::Checkmate { winner },
            (None, GameOutcome::Stalemate) => Termination::Stalemate,
            (None, GameOutcome::InProgress) => Termination::Unfinished,
        };
        GameReport {
            termination,
            plies: self.game.turn(),
        }
    }

    fn engine_name(&self, side: Color) -> &str {
        match side {
            Color::White => self.white.name(),
            Color::Black => self.black.name(),
        }
    }

    /// Get the state of the game right now
    pub const fn game(&self) -> &Game {
        &self.game
    }
}

/// Read a history saved by [`save_history`]
pub fn load_history(path: &Path) -> Result<Vec<Move>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Load a game saved by [`save_history`], checking that every move in it is legal
pub fn load_game(path: &Path) -> Result<Game> {
    Ok(Game::replay(&load_history(path)?)?)
}

/// Save the moves on the board as a JSON array of `[type, cur.x, cur.y, nxt.x, nxt.y]` arrays
pub fn save_history(path: &Path, game: &Game) -> Result<()> {
    let played = &game.history()[..game.turn()];
    fs::write(path, serde_json::to_string(played)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;

    use monke::MonkeEngine;

    use super::*;

    /// Plays the given moves in order, then resigns
    struct Scripted(VecDeque<&'static str>);
    impl Scripted {
        fn new(moves: &[&'static str]) -> Self {
            Self(moves.iter().copied().collect())
        }
    }
    impl Engine for Scripted {
        fn name(&self) -> &str {
            "scripted"
        }

        fn select(&mut self, game: &Game) -> Option<Move> {
            let text = self.0.pop_front()?;
            Some(game.resolve(text).unwrap_or_else(|_| {
                let cur = text[..2].parse().unwrap();
                let nxt = text[2..].parse().unwrap();
                Move::default(cur, nxt)
            }))
        }
    }

    fn temp_path(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("backend-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn test_fools_mate() {
        let white = Scripted::new(&["f3", "g4"]);
        let black = Scripted::new(&["e5", "Qh4"]);
        let mut backend = Backend::new(white, black);
        let report = backend.play_game(100).unwrap();
        assert_eq!(
            report,
            GameReport {
                termination: Termination::Checkmate {
                    winner: Color::Black
                },
                plies: 4,
            }
        );
        assert_eq!(report.to_string(), "Checkmate, Black wins after 4 plies");
        assert!(!backend.play_half_move().unwrap());
    }

    #[test]
    fn test_resignation() {
        let mut backend = Backend::new(Scripted::new(&["e4"]), Scripted::new(&["e5"]));
        let report = backend.play_game(100).unwrap();
        assert_eq!(
            report.termination,
            Termination::Resignation {
                loser: Color::White
            }
        );
        assert_eq!(report.plies, 2);
    }

    #[test]
    fn test_illegal_engine_move() {
        let mut backend = Backend::new(Scripted::new(&["e2e5"]), MonkeEngine::with_seed(0));
        let err = backend.play_half_move().unwrap_err();
        assert!(matches!(
            err,
            Error::EngineMoveRejected { ref engine, .. } if engine == "scripted"
        ));
        assert_eq!(backend.game().turn(), 0);
    }

    #[test]
    fn test_ply_limit() {
        let mut backend = Backend::new(MonkeEngine::with_seed(3), MonkeEngine::with_seed(4));
        let report = backend.play_game(10).unwrap();
        assert_eq!(report.plies, 10);
        assert_eq!(report.termination, Termination::Unfinished);
    }

    #[test]
    fn test_random_games_finish() {
        for seed in 0..4 {
            let mut backend =
                Backend::new(MonkeEngine::with_seed(seed), MonkeEngine::with_seed(seed + 100));
            let report = backend.play_game(400).unwrap();
            assert!(report.plies <= 400);
            if report.plies < 400 {
                assert_ne!(report.termination, Termination::Unfinished);
            }
        }
    }

    #[test]
    fn test_save_and_load() {
        let mut backend = Backend::new(MonkeEngine::with_seed(9), MonkeEngine::with_seed(10));
        backend.play_game(30).unwrap();
        let path = temp_path("history");
        save_history(&path, backend.game()).unwrap();
        let history = load_history(&path).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(history, backend.game().history());
        let replayed = Game::from_history(history).unwrap();
        assert_eq!(replayed.to_string(), backend.game().to_string());
        let path = temp_path("game");
        save_history(&path, backend.game()).unwrap();
        let loaded = load_game(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.unwrap().to_string(), backend.game().to_string());
    }

    #[test]
    fn test_load_game_rejects_illegal_history() {
        let path = temp_path("illegal");
        // The white king onto its own pawn
        fs::write(&path, "[[0, 7, 4, 6, 4]]").unwrap();
        let loaded = load_history(&path).unwrap();
        let result = load_game(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(matches!(
            result,
            Err(Error::Board(board::Error::Replay { ply: 0, .. }))
        ));
    }

    #[test]
    fn test_load_rejects_garbage() {
        let path = temp_path("garbage");
        fs::write(&path, "[[9, 0, 0, 0, 0]]").unwrap();
        let result = load_history(&path);
        fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Json(_))));
        assert!(matches!(
            load_history(Path::new("/nonexistent/history.json")),
            Err(Error::Io(_))
        ));
    }
}
