use crate::types::Square;
use derive_more::{BitAnd, BitAndAssign, BitOr, BitOrAssign, BitXor, BitXorAssign, Not};
use std::fmt;
use std::iter::{FromIterator, IntoIterator};

/// Set of squares, stored as one bit per square
///
/// Bit `i` corresponds to the square with index `i`, so iteration yields squares row by row,
/// starting from row 0 (rank 8).
#[derive(
    Default,
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    BitAnd,
    BitAndAssign,
    BitOr,
    BitOrAssign,
    BitXor,
    BitXorAssign,
    Not,
)]
pub struct SquareSet(u64);

impl SquareSet {
    pub const EMPTY: SquareSet = SquareSet(0);

    pub const fn from_raw(val: u64) -> SquareSet {
        SquareSet(val)
    }

    pub const fn from_square(sq: Square) -> SquareSet {
        SquareSet(1_u64 << sq.index())
    }

    pub const fn with(self, sq: Square) -> SquareSet {
        SquareSet(self.0 | (1_u64 << sq.index()))
    }

    pub const fn without(self, sq: Square) -> SquareSet {
        SquareSet(self.0 & !(1_u64 << sq.index()))
    }

    pub fn set(&mut self, sq: Square) {
        *self = self.with(sq);
    }

    pub const fn has(&self, sq: Square) -> bool {
        ((self.0 >> sq.index()) & 1) != 0
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn is_nonempty(&self) -> bool {
        self.0 != 0
    }

    pub fn iter(&self) -> Iter {
        Iter(self.0)
    }
}

impl fmt::Debug for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for (i, sq) in self.iter().enumerate() {
            if i != 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", sq)?;
        }
        Ok(())
    }
}

pub struct Iter(u64);

impl Iterator for Iter {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.0 == 0 {
            return None;
        }
        let bit = self.0.trailing_zeros();
        self.0 &= self.0.wrapping_sub(1_u64);
        Some(Square::from_index(bit as usize))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.0.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for Iter {}

impl IntoIterator for SquareSet {
    type Item = Square;
    type IntoIter = Iter;

    fn into_iter(self) -> Iter {
        Iter(self.0)
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Self {
        iter.into_iter().fold(SquareSet::EMPTY, SquareSet::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank, Square};

    #[test]
    fn test_iter() {
        let set = SquareSet::EMPTY
            .with(Square::from_parts(File::A, Rank::R4))
            .with(Square::from_parts(File::E, Rank::R2))
            .with(Square::from_parts(File::F, Rank::R3));
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![
                Square::from_parts(File::A, Rank::R4),
                Square::from_parts(File::F, Rank::R3),
                Square::from_parts(File::E, Rank::R2)
            ],
        );
        assert_eq!(set.iter().len(), 3);
        assert_eq!(set.into_iter().collect::<SquareSet>(), set);
    }

    #[test]
    fn test_bitops() {
        let sa = Square::from_parts(File::A, Rank::R4);
        let sb = Square::from_parts(File::E, Rank::R2);
        let sc = Square::from_parts(File::F, Rank::R3);

        let set1 = SquareSet::EMPTY.with(sa).with(sb);
        let set2 = SquareSet::EMPTY.with(sb).with(sc);
        assert_eq!(set1 & set2, SquareSet::from_square(sb));
        assert_eq!(set1 | set2, SquareSet::EMPTY.with(sa).with(sb).with(sc));
        assert_eq!(set1 ^ set2, SquareSet::EMPTY.with(sa).with(sc));

        assert_eq!((!set1).into_iter().count(), 62);
        assert_eq!((!set1).len(), 62);
        assert!(set1.without(sa).without(sb).is_empty());
    }

    #[test]
    fn test_format() {
        let set = SquareSet::EMPTY
            .with(Square::from_parts(File::A, Rank::R4))
            .with(Square::from_parts(File::H, Rank::R8));
        assert_eq!(set.to_string(), "h8 a4");
        assert_eq!(format!("{:?}", set), "{Square(h8), Square(a4)}");
    }
}
