//! The pieces of both players, stored in one arena

use core::fmt;

use crate::{
    piece::{Piece, PieceId},
    player::Player,
    Color, Error, PieceKind, Position, Result,
};

/// FEN piece placement of the standard starting position
pub const INITIAL_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// Both players and every piece that has been in the game
///
/// Pieces are owned here and referred to by [`PieceId`] everywhere else, so captured pieces stay
/// around (in their player's dead list) until the capture gets undone.
#[derive(Clone, Debug)]
pub struct Board {
    pieces: Vec<Piece>,
    players: [Player; 2],
    /// Which side made the first move from this setup
    first: Color,
}

impl Board {
    /// The standard starting position, with white to move
    pub fn new() -> Self {
        let mut pieces = Vec::with_capacity(32);
        let players = [Color::White, Color::Black].map(|color| {
            let mut live = Vec::with_capacity(16);
            let mut king = PieceId(0);
            let back_rank = PieceKind::BACK_RANK.into_iter().zip(0..).map(|(kind, y)| {
                (kind, Position::new(color.home_row(), y))
            });
            let pawns = (0..8).map(|y| (PieceKind::Pawn, Position::new(color.pawn_row(), y)));
            for (kind, loc) in back_rank.chain(pawns) {
                let id = PieceId(pieces.len() as u8);
                if kind == PieceKind::King {
                    king = id;
                }
                pieces.push(Piece::new(kind, color, loc));
                live.push(id);
            }
            Player::new(color, live, king)
        });
        Self {
            pieces,
            players,
            first: Color::White,
        }
    }

    /// Set up the pieces from the placement field of a FEN string
    ///
    /// Every piece starts out as never having moved, so kings and rooks on their home squares
    /// may castle and pawns on their starting row may advance two squares. `first` is the side
    /// which moves next, so the other side's king must not be in check.
    ///
    /// ```
    /// use board::{Board, Color, Position};
    /// let board = Board::from_placement("4k3/8/8/8/8/8/4P3/4K3", Color::White).unwrap();
    /// assert_eq!(board.player(Color::White).live().len(), 2);
    /// assert!(board.piece_at(Color::Black, "e8".parse().unwrap()).is_some());
    /// ```
    pub fn from_placement(placement: &str, first: Color) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidPlacement(format!("{reason} in {placement:?}"));
        let rows: Vec<&str> = placement.split('/').collect();
        if rows.len() != 8 {
            return Err(invalid("expected 8 ranks"));
        }
        let mut pieces = Vec::new();
        for (x, row) in (0..).zip(rows) {
            let mut y = 0i8;
            for c in row.chars() {
                if let Some(skip) = c.to_digit(10) {
                    if !(1..=8).contains(&skip) {
                        return Err(invalid("empty run outside 1-8"));
                    }
                    y += skip as i8;
                    if y > 8 {
                        return Err(invalid("too many files"));
                    }
                    continue;
                }
                let kind = PieceKind::from_letter(c).ok_or_else(|| invalid("unknown piece"))?;
                let color = if c.is_ascii_uppercase() {
                    Color::White
                } else {
                    Color::Black
                };
                let loc = Position::new(x, y);
                if !loc.is_valid() {
                    return Err(invalid("too many files"));
                }
                if kind == PieceKind::Pawn && (x == 0 || x == 7) {
                    return Err(invalid("pawn on a promotion row"));
                }
                pieces.push(Piece::new(kind, color, loc));
                y += 1;
            }
            if y != 8 {
                return Err(invalid("wrong number of files"));
            }
        }

        let mut players = Vec::with_capacity(2);
        for color in [Color::White, Color::Black] {
            let live: Vec<PieceId> = (0..pieces.len())
                .filter(|&idx| pieces[idx].color == color)
                .map(|idx| PieceId(idx as u8))
                .collect();
            if live.len() > 16 {
                return Err(invalid("more than 16 pieces for one side"));
            }
            let kings: Vec<PieceId> = live
                .iter()
                .copied()
                .filter(|id| pieces[id.idx()].kind == PieceKind::King)
                .collect();
            let &[king] = kings.as_slice() else {
                return Err(invalid("each side needs exactly one king"));
            };
            players.push(Player::new(color, live, king));
        }
        let [white, black]: [Player; 2] = players
            .try_into()
            .map_err(|_| invalid("each side needs exactly one king"))?;
        let board = Self {
            pieces,
            players: [white, black],
            first,
        };
        if board.in_check(first.other()) {
            return Err(invalid("the side not to move is in check"));
        }
        Ok(board)
    }

    /// The side that moved first from this setup
    pub const fn first(&self) -> Color {
        self.first
    }

    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.idx()]
    }

    pub(crate) fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.idx()]
    }

    /// Look up a piece in the arena
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.idx()]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut Piece {
        &mut self.pieces[id.idx()]
    }

    /// The live piece of the given side at the given square
    pub fn piece_at(&self, color: Color, pos: Position) -> Option<PieceId> {
        self.player(color)
            .live()
            .iter()
            .copied()
            .find(|&id| self.piece(id).loc() == pos)
    }

    /// The live piece of either side at the given square
    pub fn occupant(&self, pos: Position) -> Option<PieceId> {
        self.piece_at(Color::White, pos)
            .or_else(|| self.piece_at(Color::Black, pos))
    }

    /// Returns if a piece of the given side could end a move on the square
    ///
    /// That is, the square is on the board and holds no allied piece.
    pub fn valid(&self, color: Color, pos: Position) -> bool {
        pos.is_valid() && self.piece_at(color, pos).is_none()
    }

    /// Which side made the most recent move, if any move has been made
    ///
    /// Sides alternate starting from [`Self::first`], so this follows from the log lengths.
    pub fn last_mover(&self) -> Option<Color> {
        let first = self.player(self.first).turns();
        let second = self.player(self.first.other()).turns();
        match (first, second) {
            (0, 0) => None,
            (first, second) if first > second => Some(self.first),
            _ => Some(self.first.other()),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Renders the board from white's side, with ranks down the left and files along the bottom
impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for x in 0..8 {
            write!(f, "{}", 8 - x)?;
            for y in 0..8 {
                match self.occupant(Position::new(x, y)) {
                    Some(id) => write!(f, " {}", self.piece(id).symbol())?,
                    None => f.write_str(" ·")?,
                }
            }
            writeln!(f)?;
        }
        f.write_str(" ")?;
        for file in 'a'..='h' {
            write!(f, " {file}")?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_board_matches_initial_placement() {
        let built = Board::new();
        let parsed = Board::from_placement(INITIAL_PLACEMENT, Color::White).unwrap();
        assert_eq!(built.to_string(), parsed.to_string());
        for color in [Color::White, Color::Black] {
            assert_eq!(built.player(color).live().len(), 16);
            assert!(built.player(color).dead().is_empty());
            let king = built.piece(built.player(color).king());
            assert_eq!(king.kind, PieceKind::King);
            assert_eq!(king.loc(), Position::new(color.home_row(), 4));
        }
    }

    #[test]
    fn test_rendering() {
        let expected = "\
8 ♜ ♞ ♝ ♛ ♚ ♝ ♞ ♜
7 ♟ ♟ ♟ ♟ ♟ ♟ ♟ ♟
6 · · · · · · · ·
5 · · · · · · · ·
4 · · · · · · · ·
3 · · · · · · · ·
2 ♙ ♙ ♙ ♙ ♙ ♙ ♙ ♙
1 ♖ ♘ ♗ ♕ ♔ ♗ ♘ ♖
  a b c d e f g h
";
        assert_eq!(Board::new().to_string(), expected);
    }

    #[test]
    fn test_lookup() {
        let board = Board::new();
        let e2 = "e2".parse().unwrap();
        let id = board.piece_at(Color::White, e2).unwrap();
        assert_eq!(board.piece(id).kind, PieceKind::Pawn);
        assert_eq!(board.piece_at(Color::Black, e2), None);
        assert_eq!(board.occupant(e2), Some(id));
        assert_eq!(board.occupant("e4".parse().unwrap()), None);
        assert!(!board.valid(Color::White, e2));
        assert!(board.valid(Color::Black, e2));
        assert!(!board.valid(Color::Black, Position::new(8, 0)));
    }

    #[test]
    fn test_bad_placements() {
        for placement in [
            "8/8/8/8/8/8/8/8",
            "4k3/8/8/8/8/8/8/4KK2",
            "4k3/8/8/8/8/8/8",
            "4k3/8/8/8/8/8/8/4K4",
            "4k3/8/8/8/8/8/8/4X3",
            "P3k3/8/8/8/8/8/8/4K3",
            "4k3/8/8/8/8/8/8/4K2",
            "99999999999999999/8/8/8/8/8/8/4K2k",
            "4k3/8/8/8/8/8/8/4K0003",
            "4k3/8/8/8/8/8/8/4K5",
            "4k2R/8/8/8/8/8/8/4K3",
            "8/8/8/8/8/8/8/3kK3",
        ] {
            assert!(
                Board::from_placement(placement, Color::White).is_err(),
                "{placement} accepted"
            );
        }
    }

    #[test]
    fn test_placement_can_leave_side_to_move_in_check() {
        let board = Board::from_placement("4k2R/8/8/8/8/8/8/4K3", Color::Black).unwrap();
        assert!(board.in_check(Color::Black));
        assert!(matches!(
            Board::from_placement("4k2R/8/8/8/8/8/8/4K3", Color::White),
            Err(Error::InvalidPlacement(_))
        ));
    }
}
