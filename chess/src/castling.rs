//! Castling geometry

use crate::geometry;
use crate::square_set::SquareSet;
use crate::types::{CastlingSide, Color, File, Square};

/// Squares strictly between the king and the rook, which must be empty to castle
#[inline]
pub const fn pass(c: Color, s: CastlingSide) -> SquareSet {
    let x: u64 = match s {
        CastlingSide::King => 0x60,
        CastlingSide::Queen => 0x0e,
    };
    SquareSet::from_raw(match c {
        Color::White => x << 56,
        Color::Black => x,
    })
}

#[inline]
pub const fn king_src(c: Color) -> Square {
    Square::from_parts(File::E, geometry::castling_rank(c))
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

/// Square the king crosses on its way, which must not be attacked
#[inline]
pub const fn king_via(c: Color, s: CastlingSide) -> Square {
    rook_dst(c, s)
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Square {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Square::from_parts(file, geometry::castling_rank(c))
}

/// Returns the castling right tied to a rook starting on `sq`
pub fn right_of_rook_src(sq: Square) -> Option<(Color, CastlingSide)> {
    [Color::White, Color::Black]
        .into_iter()
        .flat_map(|c| CastlingSide::ALL.into_iter().map(move |s| (c, s)))
        .find(|&(c, s)| rook_src(c, s) == sq)
}

/// Returns the castling side if moving the king from `src` to `dst` is a castling shift
pub fn side_of_king_move(c: Color, src: Square, dst: Square) -> Option<CastlingSide> {
    if src != king_src(c) {
        return None;
    }
    CastlingSide::ALL
        .into_iter()
        .find(|&s| king_dst(c, s) == dst)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    #[test]
    fn test_pass() {
        assert_eq!(
            pass(Color::White, CastlingSide::King),
            SquareSet::EMPTY
                .with(Square::from_parts(File::F, Rank::R1))
                .with(Square::from_parts(File::G, Rank::R1))
        );
        assert_eq!(
            pass(Color::Black, CastlingSide::Queen),
            SquareSet::EMPTY
                .with(Square::from_parts(File::B, Rank::R8))
                .with(Square::from_parts(File::C, Rank::R8))
                .with(Square::from_parts(File::D, Rank::R8))
        );
    }

    #[test]
    fn test_squares() {
        for c in [Color::White, Color::Black] {
            for s in CastlingSide::ALL {
                assert!(pass(c, s).has(king_via(c, s)));
                assert!(pass(c, s).has(king_dst(c, s)));
                assert!(!pass(c, s).has(rook_src(c, s)));
                assert_eq!(right_of_rook_src(rook_src(c, s)), Some((c, s)));
                assert_eq!(side_of_king_move(c, king_src(c), king_dst(c, s)), Some(s));
            }
        }
        assert_eq!(
            king_dst(Color::White, CastlingSide::King),
            Square::from_parts(File::G, Rank::R1)
        );
        assert_eq!(
            rook_dst(Color::Black, CastlingSide::Queen),
            Square::from_parts(File::D, Rank::R8)
        );
        assert_eq!(right_of_rook_src(Square::from_parts(File::B, Rank::R1)), None);
    }
}
