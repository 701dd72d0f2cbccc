//! Traits for an arbitrary engine

use board::{Game, Move};

/// Something that decides which moves to make
///
/// This trait is generic over how the engine decides what to do, so human and computer players
/// can both implement this.
pub trait Engine {
    /// A short name to show in logs and reports
    fn name(&self) -> &str;

    /// Decide on a move to make for the side to move
    ///
    /// The move should be one of [`Game::moves`]. Returning `None` resigns the game.
    fn select(&mut self, game: &Game) -> Option<Move>;
}

impl<E: Engine + ?Sized> Engine for Box<E> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn select(&mut self, game: &Game) -> Option<Move> {
        (**self).select(game)
    }
}
