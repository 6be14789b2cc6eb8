//! Piece records

use crate::types::{Color, PieceKind, Square};

use std::fmt;

/// Maximum number of pieces a position can hold
pub const MAX_PIECES: usize = 32;

/// Stable identifier of a piece within a position
///
/// A piece keeps its identifier for the whole game, including after it has been captured.
/// Identifiers are indices into [`Position::pieces()`](crate::Position::pieces).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u8);

impl PieceId {
    /// Returns `None` if `val` cannot identify a piece
    #[inline]
    pub const fn new(val: usize) -> Option<PieceId> {
        if val < MAX_PIECES {
            Some(PieceId(val as u8))
        } else {
            None
        }
    }

    #[inline]
    pub const fn from_index(val: usize) -> PieceId {
        assert!(val < MAX_PIECES, "piece id must be between 0 and 31");
        PieceId(val as u8)
    }

    #[inline]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "#{}", self.0)
    }
}

/// Piece record
///
/// A piece is either on the board, or captured. Captured pieces keep their record, so their
/// [`PieceId`] stays valid, but they have no square and never occupy one.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    square: Option<Square>,
}

impl Piece {
    #[inline]
    pub const fn new(color: Color, kind: PieceKind, square: Square) -> Piece {
        Piece {
            kind,
            color,
            square: Some(square),
        }
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    /// Returns the current square of the piece, or `None` if it is captured
    #[inline]
    pub const fn square(&self) -> Option<Square> {
        self.square
    }

    #[inline]
    pub const fn is_captured(&self) -> bool {
        self.square.is_none()
    }

    #[inline]
    pub const fn is_king(&self) -> bool {
        matches!(self.kind, PieceKind::King)
    }

    /// Returns the piece letter, uppercase for White and lowercase for Black
    #[inline]
    pub fn as_char(&self) -> char {
        self.kind.as_char(self.color)
    }

    #[inline]
    pub fn as_utf8_char(&self) -> char {
        self.kind.as_utf8_char(self.color)
    }

    #[inline]
    pub(crate) fn put(&mut self, square: Square) {
        self.square = Some(square);
    }

    #[inline]
    pub(crate) fn capture(&mut self) {
        self.square = None;
    }

    #[inline]
    pub(crate) fn promote(&mut self, kind: PieceKind) {
        self.kind = kind;
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{} {}", self.color.name(), self.kind.name())?;
        match self.square {
            Some(sq) => write!(f, " on {}", sq),
            None => write!(f, " (captured)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{File, Rank};

    #[test]
    fn test_id() {
        assert_eq!(PieceId::new(0), Some(PieceId::from_index(0)));
        assert_eq!(PieceId::new(31).map(|id| id.index()), Some(31));
        assert_eq!(PieceId::new(32), None);
        assert_eq!(PieceId::from_index(7).to_string(), "#7");
    }

    #[test]
    fn test_capture() {
        let g1 = Square::from_parts(File::G, Rank::R1);
        let mut p = Piece::new(Color::White, PieceKind::Knight, g1);
        assert_eq!(p.square(), Some(g1));
        assert!(!p.is_captured());
        assert!(!p.is_king());
        assert_eq!(p.as_char(), 'N');
        assert_eq!(p.to_string(), "White knight on g1");

        p.capture();
        assert_eq!(p.square(), None);
        assert!(p.is_captured());
        assert_eq!(p.color(), Color::White);
        assert_eq!(p.kind(), PieceKind::Knight);
        assert_eq!(p.to_string(), "White knight (captured)");
    }

    #[test]
    fn test_identity() {
        let e8 = Square::from_parts(File::E, Rank::R8);
        let mut p = Piece::new(Color::Black, PieceKind::King, e8);
        assert!(p.is_king());
        assert_eq!(p.as_char(), 'k');
        assert_eq!(p.as_utf8_char(), '♚');

        p.promote(PieceKind::Queen);
        assert!(!p.is_king());
        assert_eq!(p.as_char(), 'q');
    }
}
