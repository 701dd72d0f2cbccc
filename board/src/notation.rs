//! Parsing moves written by people
//!
//! Two forms are understood: standard algebraic notation (`Nbd7`, `exd6`, `e8=Q`, `O-O`) and
//! long algebraic notation (`e2e4`, `e2-e4`, `e7e8q`). Either one is matched against the legal
//! moves of a game to find the [`Move`] it describes.

use core::{fmt, str::FromStr};
use std::collections::BTreeSet;

use crate::{Board, Move, MoveType, PieceKind, Position};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("can't parse {0:?} as a move")]
    InvalidAlgebraicNotation(String),
    #[error("no legal move matches {0:?}")]
    NoSourcePiece(String),
    #[error("{0:?} matches more than one legal move")]
    AmbiguousSourcePiece(String),
}

/// The data parsed out from a move in algebraic notation
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AlgebraicNotationMove {
    /// What move happened on the board
    pub move_type: AlgebraicNotationMoveType,
    /// Whether the move leaves the opponent in check(mate)
    pub check: CheckStatus,
}
impl AlgebraicNotationMove {
    /// Returns if this describes the given move on the board before it is made
    ///
    /// The capture and check markers aren't compared against the board.
    pub fn matches(&self, board: &Board, mv: Move) -> bool {
        match self.move_type {
            AlgebraicNotationMoveType::CastleKingside => mv.ty == MoveType::CastleKingside,
            AlgebraicNotationMoveType::CastleQueenside => mv.ty == MoveType::CastleQueenside,
            AlgebraicNotationMoveType::Normal(normal) => normal.matches(board, mv),
        }
    }
}
impl fmt::Display for AlgebraicNotationMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.move_type, self.check)
    }
}
impl FromStr for AlgebraicNotationMove {
    type Err = NotationError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (check, rest) = if let Some(rest) = s.strip_suffix('#') {
            (CheckStatus::Checkmate, rest)
        } else if let Some(rest) = s.strip_suffix('+') {
            (CheckStatus::Check, rest)
        } else {
            (CheckStatus::None, s)
        };
        Ok(Self {
            move_type: rest.parse()?,
            check,
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum AlgebraicNotationMoveType {
    /// A move which isn't a castle (because those are notated entirely unrelatedly)
    Normal(AlgebraicNotationNormalMove),
    CastleKingside,
    CastleQueenside,
}
impl fmt::Display for AlgebraicNotationMoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Normal(mv) => mv.fmt(f),
            Self::CastleKingside => f.write_str("O-O"),
            Self::CastleQueenside => f.write_str("O-O-O"),
        }
    }
}
impl FromStr for AlgebraicNotationMoveType {
    type Err = NotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "O-O" | "0-0" => Self::CastleKingside,
            "O-O-O" | "0-0-0" => Self::CastleQueenside,
            _ => Self::Normal(s.parse()?),
        })
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum CheckStatus {
    None,
    Check,
    Checkmate,
}
/// Returns the status as appended to a move in algebraic notation
impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "",
            Self::Check => "+",
            Self::Checkmate => "#",
        })
    }
}

/// All the data from a move that isn't a castle
///
/// This doesn't include the check status after the move, because that is shared with castling in
/// the [`AlgebraicNotationMove`] struct.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AlgebraicNotationNormalMove {
    pub kind: PieceKind,
    pub from_file: Option<char>,
    pub from_rank: Option<i8>,
    pub capture: bool,
    pub to_square: Position,
    pub promotion: Option<PieceKind>,
}
impl AlgebraicNotationNormalMove {
    fn matches(&self, board: &Board, mv: Move) -> bool {
        let Some(id) = board.occupant(mv.cur) else {
            return false;
        };
        !mv.ty.is_castle()
            && board.piece(id).kind == self.kind
            && mv.nxt == self.to_square
            && self.from_file.map_or(true, |file| file == mv.cur.file())
            && self.from_rank.map_or(true, |rank| rank == mv.cur.rank())
            && promotion_matches(self.promotion, mv.ty)
    }
}
impl fmt::Display for AlgebraicNotationNormalMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.kind != PieceKind::Pawn {
            write!(f, "{}", self.kind.fen_letter())?;
        }
        if let Some(file) = self.from_file {
            write!(f, "{file}")?;
        }
        if let Some(rank) = self.from_rank {
            write!(f, "{rank}")?;
        }
        if self.capture {
            f.write_str("x")?;
        }
        write!(f, "{}", self.to_square)?;
        if let Some(promotion) = self.promotion {
            write!(f, "={}", promotion.fen_letter())?;
        }
        Ok(())
    }
}
impl FromStr for AlgebraicNotationNormalMove {
    type Err = NotationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidAlgebraicNotation(text.to_owned());
        if !text.is_ascii() {
            return Err(invalid());
        }
        let mut s = text;

        let piece_letter = s.chars().next().filter(char::is_ascii_uppercase);
        let kind = match piece_letter.and_then(PieceKind::from_letter) {
            Some(kind) if kind != PieceKind::Pawn => {
                s = &s[1..];
                kind
            }
            _ => PieceKind::Pawn,
        };

        let promotion = match s.chars().next_back() {
            Some(c) if c.is_ascii_uppercase() => {
                let kind = PieceKind::from_letter(c)
                    .filter(|kind| kind.is_promotable())
                    .ok_or_else(invalid)?;
                s = &s[..s.len() - 1];
                s = s.strip_suffix('=').unwrap_or(s);
                Some(kind)
            }
            _ => None,
        };

        if s.len() < 2 {
            return Err(invalid());
        }
        let to_square: Position = s[s.len() - 2..].parse().map_err(|_| invalid())?;
        s = &s[..s.len() - 2];

        let from_file = match s.chars().next() {
            Some(c @ 'a'..='h') => {
                s = &s[1..];
                Some(c)
            }
            _ => None,
        };
        let from_rank = match s.chars().next() {
            Some(c @ '1'..='8') => {
                s = &s[1..];
                Some((c as u8 - b'0') as i8)
            }
            _ => None,
        };
        let capture = match s.strip_prefix('x') {
            Some(rest) => {
                s = rest;
                true
            }
            None => false,
        };
        if !s.is_empty() {
            return Err(invalid());
        }
        if promotion.is_some() && kind != PieceKind::Pawn {
            return Err(invalid());
        }
        Ok(Self {
            kind,
            from_file,
            from_rank,
            capture,
            to_square,
            promotion,
        })
    }
}

/// A move written as its source and target squares, like `e2e4` or `e7e8q`
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct LongAlgebraicNotationMove {
    pub from: Position,
    pub to: Position,
    pub promotion: Option<PieceKind>,
}
impl LongAlgebraicNotationMove {
    /// Returns if this describes the given move
    ///
    /// Castles match as the king's two-square move.
    pub fn matches(&self, mv: Move) -> bool {
        mv.cur == self.from && mv.nxt == self.to && promotion_matches(self.promotion, mv.ty)
    }
}
impl fmt::Display for LongAlgebraicNotationMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{}", promotion.fen_letter().to_ascii_lowercase())?;
        }
        Ok(())
    }
}
impl FromStr for LongAlgebraicNotationMove {
    type Err = NotationError;

    /// Accepts `e2e4`, `e2 e4` and `e2-e4`, with an optional promotion letter after
    ///
    /// ```
    /// use board::{LongAlgebraicNotationMove, PieceKind};
    /// let mv: LongAlgebraicNotationMove = "e7-e8=N".parse().unwrap();
    /// assert_eq!(mv.to_string(), "e7e8n");
    /// assert_eq!(mv.promotion, Some(PieceKind::Knight));
    /// ```
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let invalid = || NotationError::InvalidAlgebraicNotation(text.to_owned());
        let s = text.trim();
        if !s.is_ascii() || s.len() < 4 {
            return Err(invalid());
        }
        let from: Position = s[..2].parse().map_err(|_| invalid())?;
        let rest = s[2..].trim_start_matches([' ', '-']);
        if rest.len() < 2 {
            return Err(invalid());
        }
        let to: Position = rest[..2].parse().map_err(|_| invalid())?;
        let promotion = match rest[2..].trim_start_matches('=').as_bytes() {
            [] => None,
            &[letter] => Some(
                PieceKind::from_letter(letter as char)
                    .filter(|kind| kind.is_promotable())
                    .ok_or_else(invalid)?,
            ),
            _ => return Err(invalid()),
        };
        Ok(Self {
            from,
            to,
            promotion,
        })
    }
}

/// An omitted promotion piece stands for a queen
fn promotion_matches(written: Option<PieceKind>, ty: MoveType) -> bool {
    match ty.promotion() {
        Some(kind) => kind == written.unwrap_or(PieceKind::Queen),
        None => written.is_none(),
    }
}

/// Find the one move among `legal` that the text describes
pub(crate) fn resolve(
    text: &str,
    board: &Board,
    legal: &BTreeSet<Move>,
) -> Result<Move, NotationError> {
    let text = text.trim();
    let candidates: Vec<Move> = match text.parse::<LongAlgebraicNotationMove>() {
        Ok(long) => legal.iter().copied().filter(|&mv| long.matches(mv)).collect(),
        Err(_) => {
            let short: AlgebraicNotationMove = text.parse()?;
            legal
                .iter()
                .copied()
                .filter(|&mv| short.matches(board, mv))
                .collect()
        }
    };
    match candidates.as_slice() {
        &[mv] => Ok(mv),
        [] => Err(NotationError::NoSourcePiece(text.to_owned())),
        _ => Err(NotationError::AmbiguousSourcePiece(text.to_owned())),
    }
}
