//! Pseudo-legal move generation and attack detection

use crate::castling;
use crate::geometry;
use crate::moves::{Move, PromotePiece};
use crate::piece::{Piece, PieceId};
use crate::position::Position;
use crate::square_set::SquareSet;
use crate::types::{CastlingSide, Color, PieceKind, Square};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

const KNIGHT_DELTAS: [(isize, isize); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

const KING_DELTAS: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

const DIAG_DIRS: [(isize, isize); 4] = [(-1, -1), (-1, 1), (1, -1), (1, 1)];

const LINE_DIRS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

/// Squares occupied by the moving side and by its opponent
#[derive(Debug, Copy, Clone)]
struct Occupancy {
    ours: SquareSet,
    theirs: SquareSet,
}

impl Occupancy {
    fn new(pos: &Position, c: Color) -> Occupancy {
        Occupancy {
            ours: pos.occupied(c),
            theirs: pos.occupied(c.inv()),
        }
    }

    fn all(&self) -> SquareSet {
        self.ours | self.theirs
    }
}

fn leaper(src: Square, deltas: &[(isize, isize)], occ: &Occupancy) -> SquareSet {
    deltas
        .iter()
        .filter_map(|&(dr, dc)| src.try_shift(dr, dc))
        .filter(|&dst| !occ.ours.has(dst))
        .collect()
}

// Each ray stops at the first occupied square, which is included only if it holds an opponent.
fn rays(src: Square, dirs: &[(isize, isize)], occ: &Occupancy) -> SquareSet {
    let mut res = SquareSet::EMPTY;
    for &(dr, dc) in dirs {
        let mut cur = src;
        while let Some(next) = cur.try_shift(dr, dc) {
            if occ.ours.has(next) {
                break;
            }
            res.set(next);
            if occ.theirs.has(next) {
                break;
            }
            cur = next;
        }
    }
    res
}

fn pawn_captures(c: Color, src: Square) -> SquareSet {
    let fwd = geometry::pawn_forward_delta(c);
    [-1, 1]
        .into_iter()
        .filter_map(|dc| src.try_shift(fwd, dc))
        .collect()
}

fn pawn_moves(pos: &Position, c: Color, src: Square, occ: &Occupancy) -> SquareSet {
    let fwd = geometry::pawn_forward_delta(c);
    let mut res = SquareSet::EMPTY;

    if let Some(one) = src.try_shift(fwd, 0) {
        if !occ.all().has(one) {
            res.set(one);
            if src.rank() == geometry::double_move_src_rank(c) {
                if let Some(two) = one.try_shift(fwd, 0) {
                    if !occ.all().has(two) {
                        res.set(two);
                    }
                }
            }
        }
    }

    res |= pawn_captures(c, src) & occ.theirs;

    if let Some(target) = pos.ep_target() {
        if pawn_captures(c, src).has(target) && !occ.all().has(target) {
            // The pawn which made the double step stands beside us, on the file of the target.
            let passed = Square::from_parts(target.file(), src.rank());
            if let Some(victim) = pos.get(passed) {
                if victim.color() == c.inv() && victim.kind() == PieceKind::Pawn {
                    res.set(target);
                }
            }
        }
    }

    res
}

fn castling_moves(pos: &Position, c: Color, src: Square, occ: &Occupancy) -> SquareSet {
    let mut res = SquareSet::EMPTY;
    if src != castling::king_src(c) || !pos.castling().has_color(c) {
        return res;
    }
    if is_square_attacked(pos, src, c.inv()) {
        return res;
    }
    for s in CastlingSide::ALL {
        if !pos.castling().has(c, s) {
            continue;
        }
        let rook = pos.get(castling::rook_src(c, s));
        let has_rook = matches!(rook, Some(p) if p.color() == c && p.kind() == PieceKind::Rook);
        if has_rook && (castling::pass(c, s) & occ.all()).is_empty() {
            res.set(castling::king_dst(c, s));
        }
    }
    res
}

fn piece_moves(pos: &Position, piece: &Piece, src: Square) -> SquareSet {
    let c = piece.color();
    let occ = Occupancy::new(pos, c);
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(pos, c, src, &occ),
        PieceKind::Knight => leaper(src, &KNIGHT_DELTAS, &occ),
        PieceKind::Bishop => rays(src, &DIAG_DIRS, &occ),
        PieceKind::Rook => rays(src, &LINE_DIRS, &occ),
        PieceKind::Queen => rays(src, &DIAG_DIRS, &occ) | rays(src, &LINE_DIRS, &occ),
        PieceKind::King => leaper(src, &KING_DELTAS, &occ) | castling_moves(pos, c, src, &occ),
    }
}

fn piece_attacks(pos: &Position, piece: &Piece, src: Square) -> SquareSet {
    let c = piece.color();
    // Own pieces are not excluded: a defended piece is still attacked.
    let occ = Occupancy {
        ours: SquareSet::EMPTY,
        theirs: pos.all(),
    };
    match piece.kind() {
        PieceKind::Pawn => pawn_captures(c, src),
        PieceKind::Knight => leaper(src, &KNIGHT_DELTAS, &occ),
        PieceKind::Bishop => rays(src, &DIAG_DIRS, &occ),
        PieceKind::Rook => rays(src, &LINE_DIRS, &occ),
        PieceKind::Queen => rays(src, &DIAG_DIRS, &occ) | rays(src, &LINE_DIRS, &occ),
        PieceKind::King => leaper(src, &KING_DELTAS, &occ),
    }
}

/// Returns the pseudo-legal destinations of the piece `id`
///
/// Pseudo-legal moves follow the movement pattern of the piece and the occupancy rules, but
/// may leave the own king in check. Castling is included if the king is not in check, the
/// castling right is held and the squares between the king and the rook are empty.
///
/// Returns an empty set if `id` doesn't refer to a piece on the board.
pub fn pseudo_legal(pos: &Position, id: PieceId) -> SquareSet {
    match pos.piece(id) {
        Some(piece) => match piece.square() {
            Some(src) => piece_moves(pos, piece, src),
            None => SquareSet::EMPTY,
        },
        None => SquareSet::EMPTY,
    }
}

/// Returns the squares attacked by the piece `id`
///
/// Unlike [`pseudo_legal()`], pawns attack both forward diagonals regardless of their contents,
/// pawn pushes are not attacks, and castling never attacks anything.
pub fn attacks(pos: &Position, id: PieceId) -> SquareSet {
    match pos.piece(id) {
        Some(piece) => match piece.square() {
            Some(src) => piece_attacks(pos, piece, src),
            None => SquareSet::EMPTY,
        },
        None => SquareSet::EMPTY,
    }
}

/// Returns `true` if any piece of color `by` attacks `sq`
pub fn is_square_attacked(pos: &Position, sq: Square, by: Color) -> bool {
    pos.iter_color(by)
        .any(|(_, piece, src)| piece_attacks(pos, piece, src).has(sq))
}

/// Returns all the pieces of color `by` attacking `sq`
pub fn square_attackers(pos: &Position, sq: Square, by: Color) -> ArrayVec<PieceId, 16> {
    pos.iter_color(by)
        .filter(|(_, piece, src)| piece_attacks(pos, piece, *src).has(sq))
        .map(|(id, _, _)| id)
        .collect()
}

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, 256>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, 256>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

pub mod semilegal {
    use super::{pseudo_legal, MoveList, PromotePiece};
    use crate::moves::Move;
    use crate::position::Position;

    /// Generates all the pseudo-legal moves of the side to move
    ///
    /// Promotions are expanded into one move per target piece.
    pub fn gen_all(pos: &Position) -> MoveList {
        let mut res = MoveList::new();
        for (id, _, _) in pos.iter_color(pos.side()) {
            for dst in pseudo_legal(pos, id) {
                if let Ok(mv) = Move::new(pos, id, dst, PromotePiece::Queen) {
                    if mv.kind().promote().is_some() {
                        for p in PromotePiece::ALL {
                            if let Ok(mv) = Move::new(pos, id, dst, p) {
                                res.push(mv);
                            }
                        }
                    } else {
                        res.push(mv);
                    }
                }
            }
        }
        res
    }
}
