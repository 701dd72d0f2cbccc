//! Coordinates on the board

use core::{
    fmt,
    ops::{Add, Mul, Neg, Sub},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

/// A square on the board, or an offset between two squares
///
/// `x` is the row and `y` is the column, so the board reads like a 2D array printed from
/// white's side:
/// ```text
///     y: 0 1 2 3 4 5 6 7
/// x: 0   a8 .. .. .. h8
///    7   a1 .. .. .. h1
/// ```
///
/// Positions off the board are representable, since move generation steps off the edge all the
/// time, but no piece ever rests on one. Use [`Position::is_valid`] to tell them apart.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct Position {
    pub x: i8,
    pub y: i8,
}
impl Position {
    /// The offset of one step along a row towards the h-file
    pub const RIGHT: Self = Self::new(0, 1);
    /// The offset of one step along a column towards rank 8
    pub const UP: Self = Self::new(-1, 0);

    /// Specify a position in row, column coordinates
    pub const fn new(x: i8, y: i8) -> Self {
        Self { x, y }
    }

    /// Specify a position from a file letter and a rank number
    ///
    /// ```
    /// use board::Position;
    /// assert_eq!(Position::from_algebraic('a', 8), Position::new(0, 0));
    /// assert_eq!(Position::from_algebraic('e', 4), Position::new(4, 4));
    /// assert_eq!(Position::from_algebraic('h', 1), Position::new(7, 7));
    /// assert!(!Position::from_algebraic('z', 1).is_valid());
    /// ```
    pub fn from_algebraic(file: char, rank: i8) -> Self {
        let y = u8::try_from(file).map_or(i8::MIN, |file| file.wrapping_sub(b'a') as i8);
        Self::new(8i8.wrapping_sub(rank), y)
    }

    /// Returns if this position lies on the board
    pub const fn is_valid(self) -> bool {
        0 <= self.x && self.x < 8 && 0 <= self.y && self.y < 8
    }

    /// The rank number (1 through 8 on the board)
    pub const fn rank(self) -> i8 {
        8 - self.x
    }

    /// The file letter ('a' through 'h' on the board)
    ///
    /// Off-board columns map to `'?'`.
    pub fn file(self) -> char {
        if (0..8).contains(&self.y) {
            char::from(b'a' + self.y as u8)
        } else {
            '?'
        }
    }

    /// Manhattan distance between two positions
    pub const fn dist(self, other: Self) -> u8 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Component-wise sign, turning an offset into a unit step
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// An iterator over all 64 squares, row by row from a8 to h1
    ///
    /// ```
    /// assert_eq!(board::Position::all().count(), 64);
    /// ```
    pub fn all() -> impl Iterator<Item = Self> {
        (0..8).flat_map(|x| (0..8).map(move |y| Self::new(x, y)))
    }

    /// The algebraic name of this square, if it is on the board
    pub fn as_algebraic(self) -> Option<String> {
        self.is_valid()
            .then(|| format!("{}{}", self.file(), self.rank()))
    }
}

impl Add for Position {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}
impl Sub for Position {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}
impl Mul<i8> for Position {
    type Output = Self;
    fn mul(self, rhs: i8) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}
impl Mul<Position> for i8 {
    type Output = Position;
    fn mul(self, rhs: Position) -> Position {
        rhs * self
    }
}
impl Neg for Position {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i8, i8)> for Position {
    fn from((x, y): (i8, i8)) -> Self {
        Self::new(x, y)
    }
}
impl From<Position> for (i8, i8) {
    fn from(pos: Position) -> Self {
        (pos.x, pos.y)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("x", &self.x)
            .field("y", &self.y)
            .field("readable", &format_args!("{self}"))
            .finish()
    }
}
/// Prints the algebraic name, or `"XX"` if the position is off the board
impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}{}", self.file(), self.rank())
        } else {
            f.write_str("XX")
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid board position {0:?}, expected a file a-h followed by a rank 1-8")]
pub struct PositionParseError(pub String);

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || PositionParseError(s.to_string());
        let &[file @ b'a'..=b'h', rank @ b'1'..=b'8'] = s.as_bytes() else {
            return Err(err());
        };
        Ok(Self::from_algebraic(char::from(file), (rank - b'0') as i8))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algebraic_round_trip() {
        for pos in Position::all() {
            let name = pos.to_string();
            assert_eq!(pos, name.parse().unwrap(), "{name}");
            assert_eq!(Some(name), pos.as_algebraic());
        }
    }

    #[test]
    fn test_rank_and_file() {
        let pos: Position = "e4".parse().unwrap();
        assert_eq!(pos, Position::new(4, 4));
        assert_eq!(pos.rank(), 4);
        assert_eq!(pos.file(), 'e');
        assert_eq!(Position::new(7, 0).to_string(), "a1");
        assert_eq!(Position::new(0, 7).to_string(), "h8");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "e", "e9", "i1", "e44", "E4", "4e"] {
            assert!(s.parse::<Position>().is_err(), "{s:?} parsed");
        }
    }

    #[test]
    fn test_dist() {
        let origin = Position::new(0, 0);
        assert_eq!(origin.dist(origin), 0);
        assert_eq!(origin.dist(Position::new(0, 1)), 1);
        assert_eq!(origin.dist(Position::new(1, 1)), 2);
        assert_eq!(origin.dist(Position::new(-1, 1)), 2);
        assert_eq!(origin.dist(Position::new(2, 1)), 3);
    }

    #[test]
    fn test_arithmetic() {
        let a = Position::new(3, 2);
        let b = Position::new(-1, 4);
        assert_eq!(a + b, Position::new(2, 6));
        assert_eq!(a - b, Position::new(4, -2));
        assert_eq!(2 * b, Position::new(-2, 8));
        assert_eq!(a + 2 * Position::UP, Position::new(1, 2));
        assert_eq!(-a, Position::new(-3, -2));
        assert_eq!((a - b).signum(), Position::new(1, -1));
    }

    #[test]
    fn test_off_board_is_representable() {
        let pos = Position::new(0, 0) + Position::UP;
        assert!(!pos.is_valid());
        assert_eq!(pos.to_string(), "XX");
        assert_eq!(pos.as_algebraic(), None);
    }

    #[test]
    fn test_ordering_is_row_major() {
        assert!(Position::new(0, 7) < Position::new(1, 0));
        assert!(Position::new(1, 0) < Position::new(1, 1));
    }

    #[test]
    fn test_serializes_as_pair() {
        let json = serde_json::to_string(&Position::new(6, 4)).unwrap();
        assert_eq!(json, "[6,4]");
        assert_eq!(serde_json::from_str::<Position>(&json).unwrap(), Position::new(6, 4));
    }
}
