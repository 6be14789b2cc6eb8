use crate::types::{Color, Rank};

pub const fn castling_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn double_move_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

pub const fn promote_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank on which a pawn of color `c` stands when it may capture en passant
pub const fn enpassant_src_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R5,
        Color::Black => Rank::R4,
    }
}

/// Rank of the square passed over by a double pawn step which a pawn of color `c`
/// may capture on
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

/// Row delta of one pawn step forward. White moves toward row 0.
pub const fn pawn_forward_delta(c: Color) -> isize {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Square};

    #[test]
    fn test_forward() {
        for c in [Color::White, Color::Black] {
            let src = Square::from_parts(File::D, double_move_src_rank(c));
            let one = src.try_shift(pawn_forward_delta(c), 0).unwrap();
            let two = one.try_shift(pawn_forward_delta(c), 0).unwrap();
            assert_eq!(two.rank(), enpassant_src_rank(c.inv()));
            assert_eq!(one.rank(), enpassant_dst_rank(c.inv()));
            assert_ne!(castling_rank(c), promote_dst_rank(c));
        }
    }
}
