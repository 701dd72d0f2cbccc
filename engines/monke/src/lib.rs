//! An engine which makes purely random moves

use board::{Game, Move};
use engines::Engine;
use rand::{rngs::SmallRng, seq::IteratorRandom, SeedableRng};

/// An engine which makes purely random moves
///
/// The name is pronounced like "Monkey"
#[derive(Debug, Clone)]
pub struct MonkeEngine {
    /// How we decide what to do
    rng: SmallRng,
}

impl MonkeEngine {
    /// Create a new engine seeded from the operating system
    pub fn new() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    /// Create an engine which makes the same choices every time it sees the same games
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl Engine for MonkeEngine {
    fn name(&self) -> &str {
        "monke"
    }

    fn select(&mut self, game: &Game) -> Option<Move> {
        let mv = game.moves().iter().copied().choose(&mut self.rng);
        tracing::trace!(?mv, "monke picked a move");
        mv
    }
}

impl Default for MonkeEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picks_legal_moves() {
        let mut engine = MonkeEngine::with_seed(1);
        let mut game = Game::new();
        for _ in 0..30 {
            let Some(mv) = engine.select(&game) else {
                break;
            };
            assert!(game.moves().contains(&mv));
            assert!(game.make(mv));
        }
    }

    #[test]
    fn test_same_seed_same_game() {
        let play = |seed| {
            let mut engine = MonkeEngine::with_seed(seed);
            let mut game = Game::new();
            while let Some(mv) = engine.select(&game) {
                game.make(mv);
                if game.turn() == 40 {
                    break;
                }
            }
            game.history().to_vec()
        };
        assert_eq!(play(42), play(42));
    }

    #[test]
    fn test_resigns_without_moves() {
        let mut game = Game::new();
        for mv in ["f3", "e5", "g4", "Qh4"] {
            game.make_notation(mv).unwrap();
        }
        assert_eq!(MonkeEngine::with_seed(0).select(&game), None);
    }
}
