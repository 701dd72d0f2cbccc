//! A game of chess: whose turn it is, which moves are legal, and the history of moves made

use core::fmt;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::{notation, Board, Color, Error, Move, Piece, Player, Position, Result};

/// Where a game stands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    /// The side to move has no legal moves and is in check
    Checkmate { winner: Color },
    /// The side to move has no legal moves but isn't in check
    Stalemate,
}

/// A game of chess, which can be stepped back and forth through its history
///
/// Every move made through [`Self::make`] is checked for legality. Replaying a history, with
/// [`Self::from_history`] or [`Self::step`], skips those checks.
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    /// Every move made, including ones after `turn` which have been stepped back over
    history: Vec<Move>,
    /// How many moves of `history` are on the board
    turn: usize,
    /// The legal moves for the side to move
    legal: BTreeSet<Move>,
}

impl Game {
    /// A game from the standard starting position
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// A game starting from the given FEN piece placement, with `first` to move
    pub fn from_placement(placement: &str, first: Color) -> Result<Self> {
        Board::from_placement(placement, first).map(Self::from_board)
    }

    fn from_board(board: Board) -> Self {
        let mut game = Self {
            board,
            history: Vec::new(),
            turn: 0,
            legal: BTreeSet::new(),
        };
        game.refresh();
        game
    }

    /// Play the given moves from the standard starting position
    ///
    /// The moves aren't checked for legality, only that each one moves a piece of the side whose
    /// turn it is.
    pub fn from_history(history: Vec<Move>) -> Result<Self> {
        let mut board = Board::new();
        for (ply, &mv) in history.iter().enumerate() {
            let color = side_at(board.first(), ply);
            board.make(color, mv).map_err(|source| {
                tracing::error!(ply, %mv, %source, "history can't be replayed");
                Error::Replay {
                    ply,
                    source: Box::new(source),
                }
            })?;
        }
        let mut game = Self {
            board,
            turn: history.len(),
            history,
            legal: BTreeSet::new(),
        };
        game.refresh();
        Ok(game)
    }

    /// Play the given moves from the standard starting position, checking that each is legal
    ///
    /// Use this instead of [`Self::from_history`] for histories from outside the program.
    pub fn replay(history: &[Move]) -> Result<Self> {
        let mut game = Self::new();
        for (ply, &mv) in history.iter().enumerate() {
            game.try_make(mv).map_err(|source| Error::Replay {
                ply,
                source: Box::new(source),
            })?;
        }
        Ok(game)
    }

    /// Make the move if it is legal, returning why not if it isn't
    ///
    /// Any moves after the current turn, left over from stepping back, are discarded.
    pub fn try_make(&mut self, mv: Move) -> Result<()> {
        if !self.legal.contains(&mv) {
            let err = self.rejection(mv);
            tracing::debug!(%mv, %err, "rejected move");
            return Err(err);
        }
        let color = self.side_to_move();
        self.board.make(color, mv)?;
        self.history.truncate(self.turn);
        self.history.push(mv);
        self.turn += 1;
        self.refresh();
        Ok(())
    }

    /// Make the move if it is legal, returning whether it was
    pub fn make(&mut self, mv: Move) -> bool {
        self.try_make(mv).is_ok()
    }

    /// Work out why an illegal move isn't legal
    fn rejection(&mut self, mv: Move) -> Error {
        let color = self.side_to_move();
        let Some(id) = self.board.piece_at(color, mv.cur) else {
            return match self.board.piece_at(color.other(), mv.cur) {
                Some(_) => Error::WrongSide { color, pos: mv.cur },
                None => Error::NoPieceAt(color, mv.cur),
            };
        };
        if self.board.moves(id).contains(&mv) {
            Error::MovingIntoCheck(mv)
        } else {
            Error::MoveNeverLegal(mv)
        }
    }

    /// Find the legal move written in algebraic notation
    ///
    /// Both the standard form (`Nf3`, `O-O`, `exd8=N+`) and the long form (`g1f3`, `e1-g1`) work.
    /// A promotion which doesn't say what to promote to is taken to be a queen.
    pub fn resolve(&self, text: &str) -> Result<Move> {
        Ok(notation::resolve(text, &self.board, &self.legal)?)
    }

    /// Make the move written in algebraic notation
    pub fn make_notation(&mut self, text: &str) -> Result<()> {
        let mv = self.resolve(text)?;
        self.try_make(mv)
    }

    /// Redo up to `n` moves from the history, returning how many were redone
    pub fn step(&mut self, n: usize) -> usize {
        let start = self.turn;
        let end = self.history.len().min(start.saturating_add(n));
        while self.turn < end {
            let mv = self.history[self.turn];
            let color = self.side_to_move();
            if let Err(err) = self.board.make(color, mv) {
                tracing::error!(ply = self.turn, %mv, %err, "history can't be replayed");
                break;
            }
            self.turn += 1;
        }
        self.refresh();
        self.turn - start
    }

    /// Undo up to `n` moves, returning how many were undone
    ///
    /// The undone moves stay in the history, so [`Self::step`] can redo them.
    pub fn back(&mut self, n: usize) -> usize {
        let start = self.turn;
        let end = start.saturating_sub(n);
        while self.turn > end {
            let color = side_at(self.board.first(), self.turn - 1);
            if let Err(err) = self.board.undo(color) {
                tracing::error!(ply = self.turn - 1, %err, "can't undo move");
                break;
            }
            self.turn -= 1;
        }
        self.refresh();
        start - self.turn
    }

    fn refresh(&mut self) {
        self.legal = self.board.legal_moves(self.side_to_move());
    }

    /// The legal moves for the side to move
    pub fn moves(&self) -> &BTreeSet<Move> {
        &self.legal
    }

    /// The legal moves of the piece on the given square
    pub fn piece_moves(&self, pos: Position) -> BTreeSet<Move> {
        self.legal
            .iter()
            .copied()
            .filter(|mv| mv.cur == pos)
            .collect()
    }

    /// Every move made, including ones stepped back over
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    /// How many moves have been made to reach the current board
    pub const fn turn(&self) -> usize {
        self.turn
    }

    pub fn side_to_move(&self) -> Color {
        side_at(self.board.first(), self.turn)
    }

    pub fn player(&self, color: Color) -> &Player {
        self.board.player(color)
    }

    /// The piece on the given square, of either side
    pub fn piece_at(&self, pos: Position) -> Option<&Piece> {
        self.board.occupant(pos).map(|id| self.board.piece(id))
    }

    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Returns if the side to move is in check
    pub fn is_check(&self) -> bool {
        self.board.in_check(self.side_to_move())
    }

    pub fn outcome(&self) -> GameOutcome {
        if !self.legal.is_empty() {
            GameOutcome::InProgress
        } else if self.is_check() {
            GameOutcome::Checkmate {
                winner: self.side_to_move().other(),
            }
        } else {
            GameOutcome::Stalemate
        }
    }
}

/// Which side makes the move with the given index
fn side_at(first: Color, ply: usize) -> Color {
    if ply % 2 == 0 {
        first
    } else {
        first.other()
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.board, f)
    }
}
