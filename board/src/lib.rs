//! The rules of chess: pieces, their moves, and a game with undo and replay
//!
//! ```
//! use board::{Game, GameOutcome};
//! let mut game = Game::new();
//! for mv in ["f3", "e5", "g4", "Qh4#"] {
//!     game.make_notation(mv).unwrap();
//! }
//! assert!(matches!(game.outcome(), GameOutcome::Checkmate { .. }));
//! ```

mod board;
mod chess_move;
mod game;
mod movegen;
mod notation;
mod piece;
mod player;
mod position;

pub use crate::{
    board::{Board, INITIAL_PLACEMENT},
    chess_move::{Move, MoveDecodeError, MoveType},
    game::{Game, GameOutcome},
    notation::{
        AlgebraicNotationMove, AlgebraicNotationMoveType, AlgebraicNotationNormalMove,
        CheckStatus, LongAlgebraicNotationMove, NotationError,
    },
    piece::{Color, Piece, PieceId, PieceKind},
    player::Player,
    position::{Position, PositionParseError},
};

/// Ways an operation on the board or game can fail
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("{0:?} has no piece at {1}")]
    NoPieceAt(Color, Position),
    #[error("the piece at {pos} doesn't belong to {color:?}")]
    WrongSide { color: Color, pos: Position },
    #[error("{0:?} has no moves to undo")]
    NothingToUndo(Color),
    #[error("the piece can't make the move {0}")]
    MoveNeverLegal(Move),
    #[error("the move {0} leaves the king in check")]
    MovingIntoCheck(Move),
    #[error(transparent)]
    Notation(#[from] NotationError),
    #[error("invalid piece placement: {0}")]
    InvalidPlacement(String),
    #[error("can't replay ply {ply} of the history")]
    Replay {
        ply: usize,
        #[source]
        source: Box<Error>,
    },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
