//! Legality filter
//!
//! A pseudo-legal move is legal if it doesn't leave the own king under attack. Moves are tried
//! on a copy of the position, so the position being checked is never modified.

use crate::castling;
use crate::movegen::{self, semilegal, MoveList};
use crate::moves::{self, Move, PromotePiece};
use crate::piece::PieceId;
use crate::position::Position;
use crate::square_set::SquareSet;
use crate::types::Square;

use log::trace;

/// Checks legality of pseudo-legal moves in a given position
#[derive(Clone, Debug)]
pub struct Checker<'a> {
    pos: &'a Position,
}

impl<'a> Checker<'a> {
    #[inline]
    pub fn new(pos: &'a Position) -> Checker<'a> {
        Checker { pos }
    }

    // Castling also requires the king not to cross an attacked square.
    fn is_castling_path_safe(&self, mv: &Move) -> bool {
        let s = match mv.kind().castling_side() {
            Some(s) => s,
            None => return true,
        };
        let c = mv.side();
        if movegen::is_square_attacked(self.pos, mv.src(), c.inv()) {
            return false;
        }
        let mut probe = self.pos.clone();
        probe.move_piece(mv.piece(), castling::king_via(c, s));
        !probe.is_king_attacked(c)
    }

    /// Returns `true` if the pseudo-legal move `mv` doesn't leave the own king under attack
    pub fn is_legal(&self, mv: &Move) -> bool {
        if !self.is_castling_path_safe(mv) {
            trace!("probe {}: castling path is attacked", mv);
            return false;
        }
        let mut sim = self.pos.clone();
        moves::make_move_unchecked(&mut sim, mv);
        let res = !sim.is_king_attacked(mv.side());
        trace!(
            "probe {}: {}",
            mv,
            if res { "legal" } else { "king attacked" }
        );
        res
    }
}

/// Returns `true` if the pseudo-legal move `mv` is legal in `pos`
#[inline]
pub fn is_move_legal(pos: &Position, mv: &Move) -> bool {
    Checker::new(pos).is_legal(mv)
}

/// Returns `true` if moving the piece `id` to `dst` is legal
///
/// Returns `false` for captured pieces, pieces of the side not to move and ids out of range.
pub fn is_legal(pos: &Position, id: PieceId, dst: Square) -> bool {
    match Move::new(pos, id, dst, PromotePiece::Queen) {
        Ok(mv) => is_move_legal(pos, &mv),
        Err(_) => false,
    }
}

/// Returns the legal destinations of the piece `id`
pub fn legal_moves(pos: &Position, id: PieceId) -> SquareSet {
    movegen::pseudo_legal(pos, id)
        .into_iter()
        .filter(|&dst| is_legal(pos, id, dst))
        .collect()
}

/// Returns `true` if the side to move has at least one legal move
pub fn has_legal_moves(pos: &Position) -> bool {
    pos.iter_color(pos.side()).any(|(id, _, _)| {
        movegen::pseudo_legal(pos, id)
            .into_iter()
            .any(|dst| is_legal(pos, id, dst))
    })
}

/// Generates all the legal moves of the side to move
///
/// Promotions are expanded into one move per target piece.
pub fn gen_all(pos: &Position) -> MoveList {
    let checker = Checker::new(pos);
    let mut res = semilegal::gen_all(pos);
    res.retain(|mv| checker.is_legal(mv));
    res
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::position::Setup;
    use crate::types::{CastlingRights, Color, File, PieceKind, Rank};
    use std::str::FromStr;

    fn sq(s: &str) -> Square {
        Square::from_str(s).unwrap()
    }

    fn set(squares: &[&str]) -> SquareSet {
        squares.iter().map(|s| sq(s)).collect()
    }

    fn position(side: Color, castling: CastlingRights, pieces: &[(&str, char)]) -> Position {
        let mut setup = Setup::empty();
        setup.side = side;
        setup.castling = castling;
        for &(s, ch) in pieces {
            let (color, kind) = PieceKind::from_char(ch).unwrap();
            setup.put(sq(s), color, kind);
        }
        setup.try_into().unwrap()
    }

    #[test]
    fn test_initial() {
        let mut pos = Position::initial();
        assert_eq!(gen_all(&pos).len(), 20);
        let g1 = pos.piece_at(sq("g1")).unwrap();
        assert_eq!(legal_moves(&pos, g1), set(&["f3", "h3"]));
        assert!(has_legal_moves(&pos));

        // Black has the same 20 replies
        pos.try_move(g1, sq("f3")).unwrap();
        assert_eq!(pos.side(), Color::Black);
        assert_eq!(gen_all(&pos).len(), 20);
        for file in File::iter() {
            let pawn = pos.piece_at(Square::from_parts(file, Rank::R7)).unwrap();
            assert_eq!(legal_moves(&pos, pawn).len(), 2);
        }
        let b8 = pos.piece_at(sq("b8")).unwrap();
        assert_eq!(legal_moves(&pos, b8), set(&["a6", "c6"]));
    }

    #[test]
    fn test_pinned() {
        let pos = position(
            Color::White,
            CastlingRights::EMPTY,
            &[
                ("e1", 'K'),
                ("e3", 'N'),
                ("d2", 'B'),
                ("e8", 'k'),
                ("e6", 'q'),
                ("a5", 'b'),
            ],
        );
        let knight = pos.piece_at(sq("e3")).unwrap();
        assert!(movegen::pseudo_legal(&pos, knight).is_nonempty());
        assert!(legal_moves(&pos, knight).is_empty());
        let bishop = pos.piece_at(sq("d2")).unwrap();
        assert_eq!(legal_moves(&pos, bishop), set(&["c3", "b4", "a5"]));
        let king = pos.piece_at(sq("e1")).unwrap();
        assert_eq!(legal_moves(&pos, king), set(&["d1", "e2", "f1", "f2"]));
    }

    #[test]
    fn test_king_cannot_hide_behind_itself() {
        let pos = position(
            Color::White,
            CastlingRights::EMPTY,
            &[("e4", 'K'), ("a4", 'r'), ("h8", 'k')],
        );
        assert!(pos.is_check());
        let king = pos.piece_at(sq("e4")).unwrap();
        let moves = legal_moves(&pos, king);
        assert!(!moves.has(sq("f4")));
        assert!(!moves.has(sq("d4")));
        assert_eq!(moves, set(&["d5", "e5", "f5", "d3", "e3", "f3"]));
    }

    #[test]
    fn test_no_drift() {
        let pos = position(
            Color::White,
            CastlingRights::EMPTY,
            &[("e1", 'K'), ("e2", 'R'), ("e8", 'k'), ("e7", 'r')],
        );
        let before = pos.clone();
        let rook = pos.piece_at(sq("e2")).unwrap();
        for _ in 0..100 {
            assert!(!is_legal(&pos, rook, sq("d2")));
            assert!(is_legal(&pos, rook, sq("e7")));
        }
        assert_eq!(pos, before);
    }

    #[test]
    fn test_castling_through_attack() {
        let pieces = [
            ("e1", 'K'),
            ("a1", 'R'),
            ("h1", 'R'),
            ("e8", 'k'),
            ("f8", 'r'),
        ];
        let pos = position(Color::White, CastlingRights::FULL, &pieces);
        let king = pos.piece_at(sq("e1")).unwrap();
        // g1 is pseudo-legal, but the king crosses f1 attacked by the rook
        assert!(movegen::pseudo_legal(&pos, king).has(sq("g1")));
        assert!(!is_legal(&pos, king, sq("g1")));
        assert!(is_legal(&pos, king, sq("c1")));

        // Attacked destination
        let pos = position(
            Color::White,
            CastlingRights::FULL,
            &[("e1", 'K'), ("a1", 'R'), ("h1", 'R'), ("e8", 'k'), ("c8", 'r')],
        );
        let king = pos.piece_at(sq("e1")).unwrap();
        assert!(!is_legal(&pos, king, sq("c1")));
        assert!(is_legal(&pos, king, sq("g1")));

        // b1 may be attacked on the queenside
        let pos = position(
            Color::White,
            CastlingRights::FULL,
            &[("e1", 'K'), ("a1", 'R'), ("h1", 'R'), ("e8", 'k'), ("b8", 'r')],
        );
        let king = pos.piece_at(sq("e1")).unwrap();
        assert!(is_legal(&pos, king, sq("c1")));
    }

    #[test]
    fn test_enpassant_discovered_check() {
        let mut setup = Setup::empty();
        setup.side = Color::White;
        for (s, color, kind) in [
            ("a5", Color::White, PieceKind::King),
            ("d5", Color::White, PieceKind::Pawn),
            ("e5", Color::Black, PieceKind::Pawn),
            ("h5", Color::Black, PieceKind::Rook),
            ("e8", Color::Black, PieceKind::King),
        ] {
            setup.put(sq(s), color, kind);
        }
        setup.ep_target = Some(sq("e6"));
        let pos: Position = setup.try_into().unwrap();
        let pawn = pos.piece_at(sq("d5")).unwrap();
        assert!(movegen::pseudo_legal(&pos, pawn).has(sq("e6")));
        assert!(!is_legal(&pos, pawn, sq("e6")));
        assert!(is_legal(&pos, pawn, sq("d6")));
    }

    #[test]
    fn test_rejects_foreign_pieces() {
        let pos = Position::initial();
        let black_knight = pos.piece_at(sq("g8")).unwrap();
        assert!(!is_legal(&pos, black_knight, sq("f6")));
        assert!(legal_moves(&pos, black_knight).is_empty());
        assert!(!is_legal(&pos, PieceId::from_index(31), sq("h3")));
    }
}
