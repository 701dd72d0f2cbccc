//! Move generation for each kind of piece
//!
//! Generation happens in two stages. [`Board::moves`] produces the pseudo-legal moves of a
//! piece, following how the piece moves and what occupies the board. [`Board::legal_moves`] then
//! drops every move that leaves the mover's king in check, using [`Board::in_check_after`] for
//! all kinds of pieces alike.

use std::collections::BTreeSet;

use crate::{
    piece::{
        Piece, PieceId, DIAGONAL_DIRECTIONS, KING_OFFSETS, KNIGHT_OFFSETS, STRAIGHT_DIRECTIONS,
    },
    Board, Color, Move, MoveType, PieceKind, Position,
};

impl Board {
    /// The pseudo-legal moves of the piece, including castles
    pub fn moves(&mut self, id: PieceId) -> BTreeSet<Move> {
        let mut moves = BTreeSet::new();
        self.reach(id, &mut moves);
        if self.piece(id).kind == PieceKind::King {
            self.castles(id, &mut moves);
        }
        moves
    }

    /// The moves of the piece which don't leave its own king in check
    pub fn legal_piece_moves(&mut self, id: PieceId) -> BTreeSet<Move> {
        let color = self.piece(id).color;
        let pseudo_legal = self.moves(id);
        pseudo_legal
            .into_iter()
            .filter(|&mv| !self.in_check_after(color, mv))
            .collect()
    }

    /// Every move the given side can make
    pub fn legal_moves(&mut self, color: Color) -> BTreeSet<Move> {
        let mut moves = BTreeSet::new();
        for id in self.player(color).live().to_vec() {
            moves.extend(self.legal_piece_moves(id));
        }
        moves
    }

    /// The pseudo-legal moves of the piece other than castles
    ///
    /// Castles never capture, so these are also the moves that decide which squares the piece
    /// attacks.
    pub(crate) fn reach(&self, id: PieceId, out: &mut BTreeSet<Move>) {
        let piece = self.piece(id);
        match piece.kind {
            PieceKind::Pawn => self.pawn_moves(piece, out),
            PieceKind::Knight => self.jumps(piece, &KNIGHT_OFFSETS, out),
            PieceKind::Bishop => self.slides(piece, &DIAGONAL_DIRECTIONS, out),
            PieceKind::Rook => self.slides(piece, &STRAIGHT_DIRECTIONS, out),
            PieceKind::Queen => {
                self.slides(piece, &STRAIGHT_DIRECTIONS, out);
                self.slides(piece, &DIAGONAL_DIRECTIONS, out);
            }
            PieceKind::King => self.jumps(piece, &KING_OFFSETS, out),
        }
    }

    /// Moves to each of the offsets that are open
    fn jumps(&self, piece: &Piece, offsets: &[Position], out: &mut BTreeSet<Move>) {
        let loc = piece.loc();
        for &offset in offsets {
            let nxt = loc + offset;
            if self.valid(piece.color, nxt) {
                out.insert(Move::default(loc, nxt));
            }
        }
    }

    /// Moves along each direction, up to and including the first occupied square if it holds an
    /// enemy piece
    fn slides(&self, piece: &Piece, directions: &[Position], out: &mut BTreeSet<Move>) {
        let loc = piece.loc();
        for &dir in directions {
            let mut nxt = loc + dir;
            while self.valid(piece.color, nxt) {
                out.insert(Move::default(loc, nxt));
                if self.occupant(nxt).is_some() {
                    break;
                }
                nxt = nxt + dir;
            }
        }
    }

    fn pawn_moves(&self, piece: &Piece, out: &mut BTreeSet<Move>) {
        let loc = piece.loc();
        let forward = piece.color.forward();
        let enemy = piece.color.other();

        let one = loc + forward;
        if one.is_valid() && self.occupant(one).is_none() {
            Self::pawn_advance(piece, one, out);
            let two = one + forward;
            if !piece.has_moved()
                && loc.x == piece.color.pawn_row()
                && self.occupant(two).is_none()
            {
                out.insert(Move::default(loc, two));
            }
        }

        for side in [Position::RIGHT, -Position::RIGHT] {
            let nxt = one + side;
            if !nxt.is_valid() {
                continue;
            }
            if self.piece_at(enemy, nxt).is_some() {
                Self::pawn_advance(piece, nxt, out);
            } else if self.occupant(nxt).is_none()
                && self.en_passant_victim(piece.color, loc + side).is_some()
            {
                out.insert(Move::new(MoveType::EnPassant, loc, nxt));
            }
        }
    }

    /// A pawn stepping to `nxt`, which is four promotions on the last row
    fn pawn_advance(piece: &Piece, nxt: Position, out: &mut BTreeSet<Move>) {
        let loc = piece.loc();
        if nxt.x == piece.color.promotion_row() {
            out.extend(
                MoveType::PROMOTIONS
                    .into_iter()
                    .map(|ty| Move::new(ty, loc, nxt)),
            );
        } else {
            out.insert(Move::default(loc, nxt));
        }
    }

    /// The enemy pawn at `beside` which a pawn of `color` could capture en passant
    ///
    /// That pawn must have got there by advancing two squares in the most recent move of the
    /// game.
    pub fn en_passant_victim(&self, color: Color, beside: Position) -> Option<PieceId> {
        let enemy = color.other();
        let victim = self.piece_at(enemy, beside)?;
        if self.piece(victim).kind != PieceKind::Pawn || self.last_mover() != Some(enemy) {
            return None;
        }
        let last = self.player(enemy).last()?;
        let double_step = last.ty == MoveType::Default
            && last.nxt == beside
            && last.cur == beside - 2 * enemy.forward();
        double_step.then_some(victim)
    }

    /// Adds the castles the king can make
    ///
    /// Neither the king nor the rook may have moved, the squares between them must be empty, and
    /// the king may not be in check, pass through check, or land in check.
    fn castles(&mut self, id: PieceId, out: &mut BTreeSet<Move>) {
        let king = *self.piece(id);
        let color = king.color;
        let home = Position::new(color.home_row(), 4);
        if king.has_moved() || king.loc() != home || self.in_check(color) {
            return;
        }
        for (ty, rook_y, dir) in [
            (MoveType::CastleKingside, 7, Position::RIGHT),
            (MoveType::CastleQueenside, 0, -Position::RIGHT),
        ] {
            let rook_home = Position::new(home.x, rook_y);
            let rook_ready = self
                .piece_at(color, rook_home)
                .map(|rook| *self.piece(rook))
                .is_some_and(|rook| rook.kind == PieceKind::Rook && !rook.has_moved());
            if !rook_ready {
                continue;
            }
            let mut between = home + dir;
            let mut clear = true;
            while between != rook_home {
                clear &= self.occupant(between).is_none();
                between = between + dir;
            }
            if !clear {
                continue;
            }
            let transit = home + dir;
            let castle = Move::new(ty, home, transit + dir);
            if self.in_check_after(color, Move::default(home, transit))
                || self.in_check_after(color, castle)
            {
                continue;
            }
            out.insert(castle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(s: &str) -> Position {
        s.parse().unwrap()
    }

    fn targets(moves: &BTreeSet<Move>) -> BTreeSet<String> {
        moves.iter().map(|mv| mv.nxt.to_string()).collect()
    }

    fn set(squares: &[&str]) -> BTreeSet<String> {
        squares.iter().map(|s| s.to_string()).collect()
    }

    fn board(placement: &str) -> Board {
        Board::from_placement(placement, Color::White).unwrap()
    }

    fn moves_at(board: &mut Board, color: Color, square: &str) -> BTreeSet<Move> {
        let id = board.piece_at(color, pos(square)).unwrap();
        board.moves(id)
    }

    #[test]
    fn test_pawn_forward_from_start() {
        let mut board = Board::new();
        let white = moves_at(&mut board, Color::White, "e2");
        assert_eq!(
            white,
            BTreeSet::from([
                Move::default(pos("e2"), pos("e3")),
                Move::default(pos("e2"), pos("e4")),
            ])
        );
        let black = moves_at(&mut board, Color::Black, "e7");
        assert_eq!(targets(&black), set(&["e6", "e5"]));
    }

    #[test]
    fn test_pawn_blocked() {
        let mut board = board("4k3/8/8/8/8/4n3/4P3/4K3");
        assert!(moves_at(&mut board, Color::White, "e2").is_empty());
        let mut board = board_two_blocked();
        assert_eq!(targets(&moves_at(&mut board, Color::White, "e2")), set(&["e3"]));
    }

    fn board_two_blocked() -> Board {
        board("4k3/8/8/8/4n3/8/4P3/4K3")
    }

    #[test]
    fn test_pawn_single_step_after_moving() {
        let mut board = board("4k3/8/8/8/8/4P3/8/4K3");
        assert_eq!(targets(&moves_at(&mut board, Color::White, "e3")), set(&["e4"]));
    }

    #[test]
    fn test_pawn_captures_diagonally_only_onto_enemies() {
        let mut board = board("4k3/8/8/8/8/3p1N2/4P3/4K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "e2")),
            set(&["e3", "e4", "d3"])
        );
    }

    #[test]
    fn test_pawn_promotion_produces_four_moves() {
        let mut board = board("4k3/1P6/8/8/8/8/8/4K3");
        let moves = moves_at(&mut board, Color::White, "b7");
        let expected: BTreeSet<Move> = MoveType::PROMOTIONS
            .into_iter()
            .map(|ty| Move::new(ty, pos("b7"), pos("b8")))
            .collect();
        assert_eq!(moves, expected);
        assert!(moves.iter().all(|mv| mv.ty != MoveType::Default));
    }

    #[test]
    fn test_pawn_capture_promotion() {
        let mut board = board("r3k3/1P6/8/8/8/8/8/4K3");
        let moves = moves_at(&mut board, Color::White, "b7");
        assert_eq!(moves.len(), 8);
        assert_eq!(targets(&moves), set(&["a8", "b8"]));
    }

    #[test]
    fn test_knight_moves() {
        let mut start = Board::new();
        assert_eq!(
            targets(&moves_at(&mut start, Color::White, "g1")),
            set(&["f3", "h3"])
        );
        let mut board = board("4k3/8/8/8/3N4/8/8/4K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "d4")),
            set(&["b3", "b5", "c2", "c6", "e2", "e6", "f3", "f5"])
        );
    }

    #[test]
    fn test_knight_in_corner() {
        let mut board = board("4k3/8/8/8/8/8/8/N3K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "a1")),
            set(&["b3", "c2"])
        );
    }

    #[test]
    fn test_bishop_stops_at_pieces() {
        let mut board = board("4k3/8/5p2/8/3B4/8/1P6/4K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "d4")),
            set(&["c3", "c5", "b6", "a7", "e5", "f6", "e3", "f2", "g1"])
        );
    }

    #[test]
    fn test_rook_stops_at_pieces() {
        let mut board = board("3rk3/8/8/8/3R1P2/8/8/4K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "d4")),
            set(&["d1", "d2", "d3", "d5", "d6", "d7", "d8", "a4", "b4", "c4", "e4"])
        );
    }

    #[test]
    fn test_queen_is_rook_and_bishop() {
        let mut queen = board("4k3/8/8/8/3Q4/8/8/7K");
        let mut rook = board("4k3/8/8/8/3R4/8/8/7K");
        let mut bishop = board("4k3/8/8/8/3B4/8/8/7K");
        let queen = targets(&moves_at(&mut queen, Color::White, "d4"));
        let rook = targets(&moves_at(&mut rook, Color::White, "d4"));
        let bishop = targets(&moves_at(&mut bishop, Color::White, "d4"));
        assert_eq!(queen, rook.union(&bishop).cloned().collect());
        assert_eq!(queen.len(), 27);
    }

    #[test]
    fn test_king_moves() {
        let mut board = board("4k3/8/8/8/8/8/3P4/4K3");
        assert_eq!(
            targets(&moves_at(&mut board, Color::White, "e1")),
            set(&["d1", "e2", "f1", "f2"])
        );
    }

    #[test]
    fn test_initial_position_has_twenty_moves() {
        let mut board = Board::new();
        assert_eq!(board.legal_moves(Color::White).len(), 20);
        assert_eq!(board.legal_moves(Color::Black).len(), 20);
    }

    #[test]
    fn test_pinned_piece_has_no_legal_moves() {
        let mut board = board("4r1k1/8/8/8/8/8/4N3/4K3");
        let knight = board.piece_at(Color::White, pos("e2")).unwrap();
        assert!(!board.moves(knight).is_empty());
        assert!(board.legal_piece_moves(knight).is_empty());
    }

    #[test]
    fn test_castling_both_sides() {
        let mut board = board("4k3/8/8/8/8/8/8/R3K2R");
        let moves = moves_at(&mut board, Color::White, "e1");
        assert!(moves.contains(&Move::new(MoveType::CastleKingside, pos("e1"), pos("g1"))));
        assert!(moves.contains(&Move::new(MoveType::CastleQueenside, pos("e1"), pos("c1"))));
    }

    fn has_kingside_castle(board: &mut Board) -> bool {
        let castle = Move::new(MoveType::CastleKingside, pos("e1"), pos("g1"));
        board.legal_moves(Color::White).contains(&castle)
    }

    #[test]
    fn test_castling_prerequisites() {
        assert!(has_kingside_castle(&mut board("4k3/8/8/8/8/8/8/4K2R")));
        // Path occupied
        assert!(!has_kingside_castle(&mut board("4k3/8/8/8/8/8/8/4KN1R")));
        // Path attacked
        assert!(!has_kingside_castle(&mut board("4kr2/8/8/8/8/8/8/4K2R")));
        // Destination attacked
        assert!(!has_kingside_castle(&mut board("4k1r1/8/8/8/8/8/8/4K2R")));
        // In check
        assert!(!has_kingside_castle(&mut board("4r1k1/8/8/8/8/8/8/4K2R")));
        // Rook attacked is fine
        assert!(has_kingside_castle(&mut board("4k2r/8/8/8/8/8/8/4K2R")));
    }

    #[test]
    fn test_castling_after_king_or_rook_moved() {
        let mut moved_king = board("4k3/8/8/8/8/8/8/4K2R");
        moved_king
            .make(Color::White, Move::default(pos("e1"), pos("f1")))
            .unwrap();
        moved_king
            .make(Color::Black, Move::default(pos("e8"), pos("d8")))
            .unwrap();
        moved_king
            .make(Color::White, Move::default(pos("f1"), pos("e1")))
            .unwrap();
        assert!(!has_kingside_castle(&mut moved_king));

        let mut moved_rook = board("4k3/8/8/8/8/8/8/4K2R");
        moved_rook
            .make(Color::White, Move::default(pos("h1"), pos("h2")))
            .unwrap();
        moved_rook
            .make(Color::Black, Move::default(pos("e8"), pos("d8")))
            .unwrap();
        moved_rook
            .make(Color::White, Move::default(pos("h2"), pos("h1")))
            .unwrap();
        assert!(!has_kingside_castle(&mut moved_rook));
    }

    #[test]
    fn test_queenside_castle_needs_b_file_empty() {
        let mut board = board("4k3/8/8/8/8/8/8/RN2K3");
        let castle = Move::new(MoveType::CastleQueenside, pos("e1"), pos("c1"));
        assert!(!board.legal_moves(Color::White).contains(&castle));
    }

    #[test]
    fn test_en_passant_only_right_after_double_step() {
        let mut board = board("4k3/3p4/8/4P3/8/8/8/4K3");
        board
            .make(Color::White, Move::default(pos("e1"), pos("e2")))
            .unwrap();
        board
            .make(Color::Black, Move::default(pos("d7"), pos("d5")))
            .unwrap();
        let ep = Move::new(MoveType::EnPassant, pos("e5"), pos("d6"));
        assert!(moves_at(&mut board, Color::White, "e5").contains(&ep));

        board
            .make(Color::White, Move::default(pos("e2"), pos("e1")))
            .unwrap();
        board
            .make(Color::Black, Move::default(pos("e8"), pos("f8")))
            .unwrap();
        assert!(!moves_at(&mut board, Color::White, "e5").contains(&ep));
    }

    #[test]
    fn test_no_en_passant_after_two_single_steps() {
        let mut board = board("4k3/3p4/8/4P3/8/8/8/4K3");
        board
            .make(Color::White, Move::default(pos("e1"), pos("e2")))
            .unwrap();
        board
            .make(Color::Black, Move::default(pos("d7"), pos("d6")))
            .unwrap();
        board
            .make(Color::White, Move::default(pos("e2"), pos("e1")))
            .unwrap();
        board
            .make(Color::Black, Move::default(pos("d6"), pos("d5")))
            .unwrap();
        assert!(moves_at(&mut board, Color::White, "e5")
            .iter()
            .all(|mv| mv.ty != MoveType::EnPassant));
    }
}
