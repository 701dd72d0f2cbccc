//! Moves, as plain data passed between the game, engines, and saved histories

use core::fmt;

use serde::{Deserialize, Serialize};

use crate::{PieceKind, Position};

/// What the move does beyond relocating the moving piece
///
/// The discriminants are part of the saved-history format, so don't reorder these.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MoveType {
    Default = 0,
    /// The rook on the h-file jumps over the king
    CastleKingside = 1,
    /// The rook on the a-file jumps over the king
    CastleQueenside = 2,
    /// The pawn beside the target square is captured
    EnPassant = 3,
    PromoteQueen = 4,
    PromoteKnight = 5,
    PromoteBishop = 6,
    PromoteRook = 7,
}
impl MoveType {
    /// The promotions, in the order move generation produces them
    pub const PROMOTIONS: [MoveType; 4] = [
        Self::PromoteQueen,
        Self::PromoteKnight,
        Self::PromoteBishop,
        Self::PromoteRook,
    ];

    /// The kind of piece a pawn becomes, if this is a promotion
    pub const fn promotion(self) -> Option<PieceKind> {
        match self {
            Self::PromoteQueen => Some(PieceKind::Queen),
            Self::PromoteKnight => Some(PieceKind::Knight),
            Self::PromoteBishop => Some(PieceKind::Bishop),
            Self::PromoteRook => Some(PieceKind::Rook),
            Self::Default | Self::CastleKingside | Self::CastleQueenside | Self::EnPassant => None,
        }
    }

    /// The promotion move type producing the given kind, if a pawn can become it
    pub const fn promoting_to(kind: PieceKind) -> Option<Self> {
        match kind {
            PieceKind::Queen => Some(Self::PromoteQueen),
            PieceKind::Knight => Some(Self::PromoteKnight),
            PieceKind::Bishop => Some(Self::PromoteBishop),
            PieceKind::Rook => Some(Self::PromoteRook),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub const fn is_castle(self) -> bool {
        matches!(self, Self::CastleKingside | Self::CastleQueenside)
    }
}
impl TryFrom<u8> for MoveType {
    type Error = MoveDecodeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0 => Self::Default,
            1 => Self::CastleKingside,
            2 => Self::CastleQueenside,
            3 => Self::EnPassant,
            4 => Self::PromoteQueen,
            5 => Self::PromoteKnight,
            6 => Self::PromoteBishop,
            7 => Self::PromoteRook,
            _ => return Err(MoveDecodeError::UnknownMoveType(value)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveDecodeError {
    #[error("unknown move type {0}")]
    UnknownMoveType(u8),
    #[error("move type {0} is negative")]
    NegativeMoveType(i8),
    #[error("move square {0} is off the board")]
    OffBoard(Position),
}

/// A piece moving from `cur` to `nxt`
///
/// This never refers to a piece or player directly, so it can be logged, saved, and replayed
/// against any game. Moves compare by `(ty, cur, nxt)`, in that order.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "[i8; 5]", into = "[i8; 5]")]
pub struct Move {
    pub ty: MoveType,
    pub cur: Position,
    pub nxt: Position,
}
impl Move {
    pub const fn new(ty: MoveType, cur: Position, nxt: Position) -> Self {
        Self { ty, cur, nxt }
    }

    /// A move with no special handling
    pub const fn default(cur: Position, nxt: Position) -> Self {
        Self::new(MoveType::Default, cur, nxt)
    }

    /// The compact encoding `[type, cur.x, cur.y, nxt.x, nxt.y]` used for saved histories
    ///
    /// ```
    /// use board::{Move, MoveType, Position};
    /// let mv = Move::new(MoveType::EnPassant, Position::new(3, 4), Position::new(2, 3));
    /// assert_eq!(mv.to_raw(), [3, 3, 4, 2, 3]);
    /// assert_eq!(Move::from_raw(mv.to_raw()), Ok(mv));
    /// ```
    pub const fn to_raw(self) -> [i8; 5] {
        [
            self.ty as i8,
            self.cur.x,
            self.cur.y,
            self.nxt.x,
            self.nxt.y,
        ]
    }

    /// Inverse of [`Self::to_raw`], rejecting unknown types and off-board squares
    pub fn from_raw([ty, cx, cy, nx, ny]: [i8; 5]) -> Result<Self, MoveDecodeError> {
        let ty = u8::try_from(ty).map_err(|_| MoveDecodeError::NegativeMoveType(ty))?;
        let cur = Position::new(cx, cy);
        let nxt = Position::new(nx, ny);
        for square in [cur, nxt] {
            if !square.is_valid() {
                return Err(MoveDecodeError::OffBoard(square));
            }
        }
        Ok(Self::new(MoveType::try_from(ty)?, cur, nxt))
    }
}
impl TryFrom<[i8; 5]> for Move {
    type Error = MoveDecodeError;
    fn try_from(raw: [i8; 5]) -> Result<Self, Self::Error> {
        Self::from_raw(raw)
    }
}
impl From<Move> for [i8; 5] {
    fn from(mv: Move) -> Self {
        mv.to_raw()
    }
}
impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({:?}, {}, {})", self.ty, self.cur, self.nxt)
    }
}
/// Long algebraic notation, e.g. `e2e4` or `e7e8q`
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.cur, self.nxt)?;
        if let Some(kind) = self.ty.promotion() {
            write!(f, "{}", kind.fen_letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
