//! One side of the game: its pieces, its move log, and making and undoing its moves

use core::ops::Deref;
use std::collections::BTreeSet;

use crate::{piece::PieceId, Board, Color, Error, Move, MoveType, PieceKind, Position, Result};

/// A move a player made, along with what it captured so it can be undone exactly
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Ply {
    pub mv: Move,
    pub captured: Option<PieceId>,
}

/// The pieces and move log of one side
///
/// `live` and `dead` together always hold every piece the side started with. Capturing moves a
/// piece from `live` to `dead`, undoing the capture moves it back.
#[derive(Clone, Debug)]
pub struct Player {
    color: Color,
    live: Vec<PieceId>,
    /// Captured pieces, most recently captured last
    dead: Vec<PieceId>,
    king: PieceId,
    log: Vec<Ply>,
}
impl Player {
    pub(crate) fn new(color: Color, live: Vec<PieceId>, king: PieceId) -> Self {
        Self {
            color,
            live,
            dead: Vec::new(),
            king,
            log: Vec::new(),
        }
    }

    pub const fn color(&self) -> Color {
        self.color
    }

    /// The pieces still on the board
    pub fn live(&self) -> &[PieceId] {
        &self.live
    }

    /// The pieces the opponent has captured
    pub fn dead(&self) -> &[PieceId] {
        &self.dead
    }

    pub const fn king(&self) -> PieceId {
        self.king
    }

    /// The number of moves this player has made
    pub fn turns(&self) -> usize {
        self.log.len()
    }

    /// The last move this player made
    pub fn last(&self) -> Option<Move> {
        self.log.last().map(|ply| ply.mv)
    }

    /// The moves this player made, oldest first
    pub fn moves(&self) -> impl DoubleEndedIterator<Item = Move> + '_ {
        self.log.iter().map(|ply| ply.mv)
    }
}

/// Where the rook goes when castling: `(from, to)`
fn castle_rook_squares(mv: Move) -> Option<(Position, Position)> {
    match mv.ty {
        MoveType::CastleKingside => Some((mv.nxt + Position::RIGHT, mv.nxt - Position::RIGHT)),
        MoveType::CastleQueenside => {
            Some((mv.nxt - 2 * Position::RIGHT, mv.nxt + Position::RIGHT))
        }
        _ => None,
    }
}

impl Board {
    /// Mark the given side's piece at `pos` as captured
    pub fn capture(&mut self, color: Color, pos: Position) -> Option<PieceId> {
        let idx = self
            .player(color)
            .live
            .iter()
            .position(|&id| self.piece(id).loc() == pos)?;
        let player = self.player_mut(color);
        let id = player.live.remove(idx);
        player.dead.push(id);
        Some(id)
    }

    /// Bring back the piece of the given side most recently captured at `pos`
    pub fn uncapture(&mut self, color: Color, pos: Position) -> Option<PieceId> {
        let idx = self
            .player(color)
            .dead
            .iter()
            .rposition(|&id| self.piece(id).loc() == pos)?;
        let player = self.player_mut(color);
        let id = player.dead.remove(idx);
        player.live.push(id);
        Some(id)
    }

    /// Make the move for the given side without checking that it is legal
    ///
    /// This is the fast path for replaying trusted histories, so the only check done is that the
    /// pieces the move relocates exist. If they don't, the board is left unchanged.
    pub fn make(&mut self, color: Color, mv: Move) -> Result<()> {
        let id = self
            .piece_at(color, mv.cur)
            .ok_or(Error::NoPieceAt(color, mv.cur))?;
        let rook = match castle_rook_squares(mv) {
            Some((from, to)) => Some((
                self.piece_at(color, from)
                    .ok_or(Error::NoPieceAt(color, from))?,
                to,
            )),
            None => None,
        };

        let opponent = color.other();
        let mut captured = self.capture(opponent, mv.nxt);
        self.piece_mut(id).relocate(mv.nxt);
        if let Some((rook, to)) = rook {
            self.piece_mut(rook).relocate(to);
        }
        if mv.ty == MoveType::EnPassant {
            let beside = Position::new(mv.cur.x, mv.nxt.y);
            captured = captured.or_else(|| self.capture(opponent, beside));
        }
        if let Some(kind) = mv.ty.promotion() {
            self.piece_mut(id).kind = kind;
        }
        self.player_mut(color).log.push(Ply { mv, captured });
        tracing::trace!(?color, %mv, "made move");
        Ok(())
    }

    /// Undo the given side's last move, returning it
    ///
    /// Moves must be undone in the reverse of the order they were made, alternating sides.
    pub fn undo(&mut self, color: Color) -> Result<Move> {
        let Some(&Ply { mv, captured }) = self.player(color).log.last() else {
            return Err(Error::NothingToUndo(color));
        };
        let id = self
            .piece_at(color, mv.nxt)
            .ok_or(Error::NoPieceAt(color, mv.nxt))?;
        let rook = match castle_rook_squares(mv) {
            Some((from, to)) => Some((
                self.piece_at(color, to).ok_or(Error::NoPieceAt(color, to))?,
                from,
            )),
            None => None,
        };

        self.player_mut(color).log.pop();
        if let Some((rook, home)) = rook {
            self.piece_mut(rook).unlocate(home);
        }
        if mv.ty.promotion().is_some() {
            self.piece_mut(id).kind = PieceKind::Pawn;
        }
        self.piece_mut(id).unlocate(mv.cur);
        if let Some(captured) = captured {
            let pos = self.piece(captured).loc();
            let revived = self.uncapture(color.other(), pos);
            debug_assert_eq!(revived, Some(captured), "undo out of order");
        }
        tracing::trace!(?color, %mv, "undid move");
        Ok(mv)
    }

    /// Returns if any of the opponent's live pieces attacks the given side's king
    pub fn in_check(&self, color: Color) -> bool {
        let king = self.piece(self.player(color).king()).loc();
        let mut reach = BTreeSet::new();
        self.player(color.other()).live().iter().any(|&id| {
            reach.clear();
            self.reach(id, &mut reach);
            reach.iter().any(|mv| mv.nxt == king)
        })
    }

    /// Returns if the given side would be in check after making the move
    ///
    /// The move is made and then undone, leaving the board as it was. A move which can't be
    /// made at all counts as leaving the king in check.
    pub fn in_check_after(&mut self, color: Color, mv: Move) -> bool {
        match Speculation::make(self, color, mv) {
            Ok(board) => board.in_check(color),
            Err(_) => true,
        }
    }
}

/// A move made only to look at the resulting board
///
/// Dropping this undoes the move, however the scope is left.
struct Speculation<'a> {
    board: &'a mut Board,
    color: Color,
}
impl<'a> Speculation<'a> {
    fn make(board: &'a mut Board, color: Color, mv: Move) -> Result<Self> {
        board.make(color, mv)?;
        Ok(Self { board, color })
    }
}
impl Deref for Speculation<'_> {
    type Target = Board;
    fn deref(&self) -> &Board {
        self.board
    }
}
impl Drop for Speculation<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.board.undo(self.color) {
            tracing::error!(%err, "failed to revert speculative move");
            debug_assert!(false, "failed to revert speculative move: {err}");
        }
    }
}
