//! Pieces and the rules for how each kind of piece moves

use serde::{Deserialize, Serialize};

use crate::Position;

/// The types of pieces there are
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
impl PieceKind {
    /// All the kinds of pieces there are
    pub const KINDS: [PieceKind; 6] = [
        Self::Pawn,
        Self::Knight,
        Self::Bishop,
        Self::Rook,
        Self::Queen,
        Self::King,
    ];

    /// The pieces on the back rank, from the a-file to the h-file
    pub const BACK_RANK: [PieceKind; 8] = [
        Self::Rook,
        Self::Knight,
        Self::Bishop,
        Self::Queen,
        Self::King,
        Self::Bishop,
        Self::Knight,
        Self::Rook,
    ];

    /// The capitalized version of the letter used for this piece in FEN
    pub const fn fen_letter(self) -> char {
        match self {
            Self::Pawn => 'P',
            Self::Knight => 'N',
            Self::Bishop => 'B',
            Self::Rook => 'R',
            Self::Queen => 'Q',
            Self::King => 'K',
        }
    }

    /// Parse a piece letter, in either case
    pub const fn from_letter(letter: char) -> Option<Self> {
        match letter.to_ascii_uppercase() {
            'P' => Some(Self::Pawn),
            'N' => Some(Self::Knight),
            'B' => Some(Self::Bishop),
            'R' => Some(Self::Rook),
            'Q' => Some(Self::Queen),
            'K' => Some(Self::King),
            _ => None,
        }
    }

    /// Whether a pawn can promote into this kind of piece
    pub const fn is_promotable(self) -> bool {
        match self {
            PieceKind::Pawn | PieceKind::King => false,
            PieceKind::Rook | PieceKind::Queen | PieceKind::Knight | PieceKind::Bishop => true,
        }
    }
}

/// The colors a piece can have
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}
impl Color {
    pub const fn other(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The direction this side's pawns move in
    pub const fn forward(self) -> Position {
        match self {
            Color::White => Position::new(-1, 0),
            Color::Black => Position::new(1, 0),
        }
    }

    /// The row this side's back rank pieces start on
    pub const fn home_row(self) -> i8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// The row this side's pawns start on
    pub const fn pawn_row(self) -> i8 {
        match self {
            Color::White => 6,
            Color::Black => 1,
        }
    }

    /// The row on which this side's pawns promote
    pub const fn promotion_row(self) -> i8 {
        self.other().home_row()
    }

    /// Index used to store per-side data in arrays
    pub(crate) const fn idx(self) -> usize {
        self as usize
    }
}

/// Index of a piece in the arena owned by a [`Board`](crate::Board)
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(pub(crate) u8);
impl PieceId {
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// A piece on the board
///
/// The owner never changes, even when the piece gets captured. Only the location, the move
/// count, and (for a promoting pawn) the kind change over a game.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
    loc: Position,
    moved: u16,
}
impl Piece {
    pub(crate) const fn new(kind: PieceKind, color: Color, loc: Position) -> Self {
        Self {
            kind,
            color,
            loc,
            moved: 0,
        }
    }

    /// The square this piece is on (or was captured on)
    pub const fn loc(&self) -> Position {
        self.loc
    }

    /// Whether the piece has left its starting square at some point
    ///
    /// Returning to the starting square doesn't reset this.
    pub const fn has_moved(&self) -> bool {
        self.moved > 0
    }

    /// Move to the given square
    pub(crate) fn relocate(&mut self, nxt: Position) {
        self.loc = nxt;
        self.moved += 1;
    }

    /// Exact inverse of [`Self::relocate`]
    pub(crate) fn unlocate(&mut self, prev: Position) {
        debug_assert!(self.moved > 0, "unlocating a piece which never moved");
        self.loc = prev;
        self.moved = self.moved.saturating_sub(1);
    }

    /// The letter for this piece in FEN (uppercase for white)
    pub const fn fen_letter(&self) -> char {
        match self.color {
            Color::White => self.kind.fen_letter().to_ascii_uppercase(),
            Color::Black => self.kind.fen_letter().to_ascii_lowercase(),
        }
    }

    /// The chess glyph for this piece, as shown on the text board
    pub const fn symbol(&self) -> char {
        match (self.color, self.kind) {
            (Color::White, PieceKind::Pawn) => '♙',
            (Color::White, PieceKind::Knight) => '♘',
            (Color::White, PieceKind::Bishop) => '♗',
            (Color::White, PieceKind::Rook) => '♖',
            (Color::White, PieceKind::Queen) => '♕',
            (Color::White, PieceKind::King) => '♔',
            (Color::Black, PieceKind::Pawn) => '♟',
            (Color::Black, PieceKind::Knight) => '♞',
            (Color::Black, PieceKind::Bishop) => '♝',
            (Color::Black, PieceKind::Rook) => '♜',
            (Color::Black, PieceKind::Queen) => '♛',
            (Color::Black, PieceKind::King) => '♚',
        }
    }
}

/// Offsets for the eight knight jumps
pub(crate) const KNIGHT_OFFSETS: [Position; 8] = [
    Position::new(2, 1),
    Position::new(2, -1),
    Position::new(-2, 1),
    Position::new(-2, -1),
    Position::new(1, 2),
    Position::new(1, -2),
    Position::new(-1, 2),
    Position::new(-1, -2),
];

/// Offsets for the eight squares adjacent to a king
pub(crate) const KING_OFFSETS: [Position; 8] = [
    Position::new(1, 1),
    Position::new(1, 0),
    Position::new(1, -1),
    Position::new(0, 1),
    Position::new(0, -1),
    Position::new(-1, 1),
    Position::new(-1, 0),
    Position::new(-1, -1),
];

/// Directions a rook slides in
pub(crate) const STRAIGHT_DIRECTIONS: [Position; 4] = [
    Position::new(1, 0),
    Position::new(-1, 0),
    Position::new(0, 1),
    Position::new(0, -1),
];

/// Directions a bishop slides in
pub(crate) const DIAGONAL_DIRECTIONS: [Position; 4] = [
    Position::new(1, 1),
    Position::new(1, -1),
    Position::new(-1, 1),
    Position::new(-1, -1),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_letters_round_trip() {
        for kind in PieceKind::KINDS {
            assert_eq!(Some(kind), PieceKind::from_letter(kind.fen_letter()));
            assert_eq!(
                Some(kind),
                PieceKind::from_letter(kind.fen_letter().to_ascii_lowercase())
            );
        }
        assert_eq!(PieceKind::from_letter('x'), None);
    }

    #[test]
    fn test_knight_offsets_are_l_shaped() {
        let origin = Position::new(0, 0);
        for offset in KNIGHT_OFFSETS {
            assert_eq!(origin.dist(offset), 3);
            assert!(offset.x != 0 && offset.y != 0);
        }
    }

    #[test]
    fn test_has_moved_survives_returning_home() {
        let home = Position::new(7, 7);
        let mut rook = Piece::new(PieceKind::Rook, Color::White, home);
        assert!(!rook.has_moved());
        rook.relocate(Position::new(5, 7));
        rook.relocate(home);
        assert!(rook.has_moved());
        rook.unlocate(Position::new(5, 7));
        rook.unlocate(home);
        assert!(!rook.has_moved());
        assert_eq!(rook.loc(), home);
    }

    #[test]
    fn test_directions() {
        assert_eq!(Color::White.forward(), Position::UP);
        assert_eq!(Color::Black.forward(), -Position::UP);
        assert_eq!(Color::White.promotion_row(), 0);
        assert_eq!(Color::Black.promotion_row(), 7);
    }
}
