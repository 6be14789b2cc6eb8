//! Moves and the move executor

use crate::piece::PieceId;
use crate::position::Position;
use crate::types::{CastlingSide, Color, PieceKind, Square};
use crate::{castling, geometry, legal, movegen};

use std::fmt;

use thiserror::Error;

/// Move kind
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Non-pawn move or capture (except castling)
    Simple = 1,
    /// Kingside castling
    CastlingKingside = 2,
    /// Queenside castling
    CastlingQueenside = 3,
    /// Single pawn move (either non-capture or capture)
    PawnSimple = 4,
    /// Double pawn move
    PawnDouble = 5,
    /// Enpassant
    Enpassant = 6,
    /// Pawn promote to knight (either non-capture or capture)
    PromoteKnight = 7,
    /// Pawn promote to bishop (either non-capture or capture)
    PromoteBishop = 8,
    /// Pawn promote to rook (either non-capture or capture)
    PromoteRook = 9,
    /// Pawn promote to queen (either non-capture or capture)
    PromoteQueen = 10,
}

/// Target piece for promotion
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 2,
    Bishop = 3,
    Rook = 4,
    #[default]
    Queen = 5,
}

impl PromotePiece {
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Knight,
        PromotePiece::Bishop,
        PromotePiece::Rook,
        PromotePiece::Queen,
    ];
}

impl From<PromotePiece> for PieceKind {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => PieceKind::Knight,
            PromotePiece::Bishop => PieceKind::Bishop,
            PromotePiece::Rook => PieceKind::Rook,
            PromotePiece::Queen => PieceKind::Queen,
        }
    }
}

impl TryFrom<PieceKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: PieceKind) -> Result<Self, Self::Error> {
        match p {
            PieceKind::Knight => Ok(PromotePiece::Knight),
            PieceKind::Bishop => Ok(PromotePiece::Bishop),
            PieceKind::Rook => Ok(PromotePiece::Rook),
            PieceKind::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl From<PromotePiece> for MoveKind {
    #[inline]
    fn from(kind: PromotePiece) -> Self {
        match kind {
            PromotePiece::Knight => Self::PromoteKnight,
            PromotePiece::Bishop => Self::PromoteBishop,
            PromotePiece::Rook => Self::PromoteRook,
            PromotePiece::Queen => Self::PromoteQueen,
        }
    }
}

impl TryFrom<MoveKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::PromoteKnight => Ok(Self::Knight),
            MoveKind::PromoteBishop => Ok(Self::Bishop),
            MoveKind::PromoteRook => Ok(Self::Rook),
            MoveKind::PromoteQueen => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

impl MoveKind {
    /// Returns the piece after promote if this move kind represents a promote
    ///
    /// Otherwise, returns `None`.
    #[inline]
    pub fn promote(self) -> Option<PromotePiece> {
        self.try_into().ok()
    }

    #[inline]
    pub fn castling_side(self) -> Option<CastlingSide> {
        self.try_into().ok()
    }
}

/// Error indicating that a move is rejected
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// There is no piece with such id
    #[error("no piece {0}")]
    NoSuchPiece(PieceId),
    /// The piece is already captured
    #[error("piece {0} is captured")]
    Captured(PieceId),
    /// The piece doesn't belong to the side to move
    #[error("piece {0} doesn't belong to the side to move")]
    WrongSide(PieceId),
    /// The piece cannot reach the destination square
    #[error("move is not pseudo-legal")]
    NotPseudoLegal,
    /// The move leaves the own king in check
    #[error("move is not legal")]
    NotLegal,
    /// The game is already finished
    #[error("game is over")]
    GameOver,
}

/// Chess move
///
/// A move is always created against a position, and is pseudo-legal in it: the piece follows its
/// movement pattern, but the move may still leave the own king in check. Such moves are rejected
/// by [`make_move()`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    kind: MoveKind,
    piece: PieceId,
    src: Square,
    dst: Square,
    side: Color,
    captured: Option<PieceId>,
}

impl Move {
    /// Creates a move of the piece `id` to `dst`
    ///
    /// `promote` is used only if a pawn reaches the last rank.
    pub fn new(
        pos: &Position,
        id: PieceId,
        dst: Square,
        promote: PromotePiece,
    ) -> Result<Move, MoveError> {
        let piece = pos.piece(id).ok_or(MoveError::NoSuchPiece(id))?;
        let src = piece.square().ok_or(MoveError::Captured(id))?;
        let side = piece.color();
        if side != pos.side() {
            return Err(MoveError::WrongSide(id));
        }
        if !movegen::pseudo_legal(pos, id).has(dst) {
            return Err(MoveError::NotPseudoLegal);
        }

        let kind = match piece.kind() {
            PieceKind::Pawn => {
                if dst.rank() == geometry::promote_dst_rank(side) {
                    promote.into()
                } else if src.file() != dst.file() && pos.piece_at(dst).is_none() {
                    MoveKind::Enpassant
                } else if src.rank() == geometry::double_move_src_rank(side)
                    && dst.rank() == geometry::enpassant_src_rank(side.inv())
                {
                    MoveKind::PawnDouble
                } else {
                    MoveKind::PawnSimple
                }
            }
            PieceKind::King => match castling::side_of_king_move(side, src, dst) {
                Some(s) => s.into(),
                None => MoveKind::Simple,
            },
            _ => MoveKind::Simple,
        };

        let captured = match kind {
            MoveKind::Enpassant => pos.piece_at(Square::from_parts(dst.file(), src.rank())),
            MoveKind::CastlingKingside | MoveKind::CastlingQueenside => None,
            _ => pos.piece_at(dst),
        };

        Ok(Move {
            kind,
            piece: id,
            src,
            dst,
            side,
            captured,
        })
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    /// Returns the moving piece
    #[inline]
    pub const fn piece(&self) -> PieceId {
        self.piece
    }

    #[inline]
    pub const fn src(&self) -> Square {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Square {
        self.dst
    }

    #[inline]
    pub const fn side(&self) -> Color {
        self.side
    }

    /// Returns the piece captured by this move
    ///
    /// For enpassant, it is the pawn beside the source square, not the piece on `dst()`.
    #[inline]
    pub const fn captured(&self) -> Option<PieceId> {
        self.captured
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.kind.promote() {
            write!(f, "{}", PieceKind::from(p).as_char(Color::Black))?;
        }
        Ok(())
    }
}

fn update_castling(pos: &mut Position, mv: &Move) {
    if pos.pieces[mv.piece.index()].is_king() {
        pos.castling.unset_color(mv.side);
    }
    // Rooks leaving their corner, or captured on it
    for sq in [mv.src, mv.dst] {
        if let Some((c, s)) = castling::right_of_rook_src(sq) {
            pos.castling.unset(c, s);
        }
    }
}

/// Applies the pseudo-legal move `mv` to `pos` without checking whether it is legal
///
/// The own king may remain under attack after such move, so the resulting position must be either
/// checked with [`Position::is_opponent_king_attacked()`] or dropped.
pub(crate) fn make_move_unchecked(pos: &mut Position, mv: &Move) {
    let c = mv.side;
    if let Some(victim) = mv.captured {
        pos.capture_piece(victim);
    }
    pos.move_piece(mv.piece, mv.dst);
    if let Some(s) = mv.kind.castling_side() {
        if let Some(rook) = pos.piece_at(castling::rook_src(c, s)) {
            pos.move_piece(rook, castling::rook_dst(c, s));
        }
    }
    if let Some(p) = mv.kind.promote() {
        pos.promote_piece(mv.piece, p.into());
    }
    update_castling(pos, mv);
    pos.ep_target = match mv.kind {
        MoveKind::PawnDouble => Some(Square::from_parts(
            mv.src.file(),
            geometry::enpassant_dst_rank(c.inv()),
        )),
        _ => None,
    };
    pos.side = c.inv();
    pos.in_check = pos.is_king_attacked(pos.side);
}

/// Applies `mv` to `pos` if it is legal
///
/// On error, `pos` is left unchanged.
pub fn make_move(pos: &mut Position, mv: &Move) -> Result<(), MoveError> {
    if !legal::is_move_legal(pos, mv) {
        return Err(MoveError::NotLegal);
    }
    make_move_unchecked(pos, mv);
    #[cfg(any(test, feature = "selftest"))]
    pos.self_check();
    Ok(())
}
