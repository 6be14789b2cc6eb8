//! Position and related things

use crate::moves::{self, Move, MoveError, PromotePiece};
use crate::piece::{Piece, PieceId, MAX_PIECES};
use crate::square_set::SquareSet;
use crate::types::{
    CastlingRights, CastlingSide, Color, DrawReason, File, Outcome, PieceKind, Rank, Square,
    WinReason,
};
use crate::{castling, geometry, legal, movegen};

use std::fmt::{self, Display};

use arrayvec::ArrayVec;
use log::debug;
use thiserror::Error;

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Invalid enpassant target specified (i.e. it is located on an invalid rank)
    #[error("invalid enpassant target {0}")]
    InvalidEnpassant(Square),
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// Two pieces are put on the same square
    #[error("square {0} is taken by more than one piece")]
    SquareTaken(Square),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Square),
    /// Opponent's king is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// Unvalidated description of a position
///
/// Pieces receive their [`PieceId`]s in the order they are listed in `pieces`. Use
/// `Position::try_from()` to validate the setup and turn it into a [`Position`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Setup {
    pub pieces: Vec<(Square, Color, PieceKind)>,
    pub side: Color,
    pub castling: CastlingRights,
    pub ep_target: Option<Square>,
}

impl Setup {
    /// Returns a setup without pieces, with White to move and no castling rights
    pub fn empty() -> Setup {
        Setup {
            pieces: Vec::new(),
            side: Color::White,
            castling: CastlingRights::EMPTY,
            ep_target: None,
        }
    }

    /// Returns the setup of the initial position
    ///
    /// Black pieces come first, starting from the back rank, then White pawns and White back rank.
    pub fn initial() -> Setup {
        let mut res = Setup::empty();
        for (file, kind) in File::iter().zip(BACK_RANK) {
            res.put(Square::from_parts(file, Rank::R8), Color::Black, kind);
        }
        for file in File::iter() {
            res.put(Square::from_parts(file, Rank::R7), Color::Black, PieceKind::Pawn);
        }
        for file in File::iter() {
            res.put(Square::from_parts(file, Rank::R2), Color::White, PieceKind::Pawn);
        }
        for (file, kind) in File::iter().zip(BACK_RANK) {
            res.put(Square::from_parts(file, Rank::R1), Color::White, kind);
        }
        res.castling = CastlingRights::FULL;
        res
    }

    pub fn put(&mut self, sq: Square, color: Color, kind: PieceKind) {
        self.pieces.push((sq, color, kind));
    }

    /// Returns the first piece listed on `sq`
    pub fn get(&self, sq: Square) -> Option<(Color, PieceKind)> {
        self.pieces
            .iter()
            .find(|&&(s, _, _)| s == sq)
            .map(|&(_, color, kind)| (color, kind))
    }

    fn count(&self, color: Color, kind: Option<PieceKind>) -> usize {
        self.pieces
            .iter()
            .filter(|&&(_, c, k)| c == color && kind.map_or(true, |kind| kind == k))
            .count()
    }
}

/// Chess position
///
/// Holds the arena of pieces, including the captured ones, together with the side to move,
/// castling rights and enpassant target. The position is always valid: each side has exactly one
/// king, no two pieces share a square, and the side which just moved is not in check.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub(crate) pieces: ArrayVec<Piece, MAX_PIECES>,
    pub(crate) cells: [Option<PieceId>; 64],
    pub(crate) side: Color,
    pub(crate) in_check: bool,
    pub(crate) castling: CastlingRights,
    pub(crate) ep_target: Option<Square>,
}

impl Position {
    /// Returns the initial position
    pub fn initial() -> Position {
        Position::from_setup_unchecked(&Setup::initial())
    }

    // The setup must hold no more than `MAX_PIECES` pieces on distinct squares.
    fn from_setup_unchecked(setup: &Setup) -> Position {
        let mut res = Position {
            pieces: ArrayVec::new(),
            cells: [None; 64],
            side: setup.side,
            in_check: false,
            castling: setup.castling,
            ep_target: setup.ep_target,
        };
        for &(sq, color, kind) in &setup.pieces {
            let id = PieceId::from_index(res.pieces.len());
            res.pieces.push(Piece::new(color, kind, sq));
            res.cells[sq.index()] = Some(id);
        }
        res.in_check = res.is_king_attacked(res.side);
        res
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.in_check
    }

    /// Returns the castling rights still held by both sides
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square passed over by the last double pawn move, if the last move was such one
    #[inline]
    pub fn ep_target(&self) -> Option<Square> {
        self.ep_target
    }

    /// Returns all the pieces, including the captured ones, indexed by [`PieceId`]
    #[inline]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    /// Returns the piece `id`, captured or not, or `None` if there is no such piece
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    /// Returns the piece standing on `sq`
    #[inline]
    pub fn piece_at(&self, sq: Square) -> Option<PieceId> {
        self.cells[sq.index()]
    }

    /// Returns the piece standing on `sq`, by reference
    #[inline]
    pub fn get(&self, sq: Square) -> Option<&Piece> {
        self.piece_at(sq).and_then(|id| self.piece(id))
    }

    /// Iterates over the pieces which are still on the board
    pub fn iter(&self) -> impl Iterator<Item = (PieceId, &Piece, Square)> + '_ {
        self.pieces
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.square().map(|sq| (PieceId::from_index(i), p, sq)))
    }

    pub fn iter_color(&self, c: Color) -> impl Iterator<Item = (PieceId, &Piece, Square)> + '_ {
        self.iter().filter(move |(_, p, _)| p.color() == c)
    }

    /// Returns the squares occupied by the pieces of color `c`
    pub fn occupied(&self, c: Color) -> SquareSet {
        self.iter_color(c).map(|(_, _, sq)| sq).collect()
    }

    /// Returns all the occupied squares
    pub fn all(&self) -> SquareSet {
        self.iter().map(|(_, _, sq)| sq).collect()
    }

    /// Returns the king of color `c`
    pub fn king(&self, c: Color) -> Option<PieceId> {
        self.iter_color(c)
            .find(|(_, p, _)| p.is_king())
            .map(|(id, _, _)| id)
    }

    /// Returns the square of the king of color `c`
    pub fn king_square(&self, c: Color) -> Option<Square> {
        self.iter_color(c)
            .find(|(_, p, _)| p.is_king())
            .map(|(_, _, sq)| sq)
    }

    /// Returns `true` if the king of color `c` is attacked by the opponent
    pub fn is_king_attacked(&self, c: Color) -> bool {
        self.king_square(c)
            .map_or(false, |sq| movegen::is_square_attacked(self, sq, c.inv()))
    }

    /// Returns `true` if the king of the side which just moved is attacked
    #[inline]
    pub fn is_opponent_king_attacked(&self) -> bool {
        self.is_king_attacked(self.side.inv())
    }

    /// Returns the opponent pieces which give check to the side to move
    pub fn checkers(&self) -> ArrayVec<PieceId, 16> {
        match self.king_square(self.side) {
            Some(sq) => movegen::square_attackers(self, sq, self.side.inv()),
            None => ArrayVec::new(),
        }
    }

    /// Returns `true` if the side to move has at least one legal move
    pub fn has_legal_moves(&self) -> bool {
        legal::has_legal_moves(self)
    }

    /// Returns `true` if the side to move is in check and has no legal moves
    pub fn is_checkmate(&self) -> bool {
        self.in_check && !self.has_legal_moves()
    }

    /// Returns `true` if the side to move is not in check and has no legal moves
    pub fn is_stalemate(&self) -> bool {
        !self.in_check && !self.has_legal_moves()
    }

    /// Calculates the outcome of the game
    ///
    /// Returns `None` if the side to move still has legal moves.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        if self.has_legal_moves() {
            return None;
        }
        if self.in_check {
            Some(Outcome::Win {
                side: self.side.inv(),
                reason: WinReason::Checkmate,
            })
        } else {
            Some(Outcome::Draw(DrawReason::Stalemate))
        }
    }

    /// Moves the piece `id` to `dst`, promoting pawns to queen
    ///
    /// On error, the position is left unchanged.
    pub fn try_move(&mut self, id: PieceId, dst: Square) -> Result<Move, MoveError> {
        self.try_move_promote(id, dst, PromotePiece::Queen)
    }

    /// Moves the piece `id` to `dst`
    ///
    /// `promote` is used only if the move is a pawn promotion. On error, the position is left
    /// unchanged.
    pub fn try_move_promote(
        &mut self,
        id: PieceId,
        dst: Square,
        promote: PromotePiece,
    ) -> Result<Move, MoveError> {
        let res = Move::new(self, id, dst, promote).and_then(|mv| {
            moves::make_move(self, &mv)?;
            Ok(mv)
        });
        match &res {
            Ok(mv) => debug!("made move {} with piece {}", mv, id),
            Err(e) => debug!("rejected move of piece {} to {}: {}", id, dst, e),
        }
        res
    }

    /// Wraps the position to allow pretty-printing with the given style `Style`
    ///
    /// # Example
    ///
    /// ```
    /// # use hotseat::{Position, position::PrettyStyle};
    /// #
    /// let pos = Position::initial();
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|abcdefgh
    /// "#;
    /// assert_eq!(pos.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { pos: self, style }
    }

    pub(crate) fn move_piece(&mut self, id: PieceId, dst: Square) {
        let piece = &mut self.pieces[id.index()];
        if let Some(src) = piece.square() {
            self.cells[src.index()] = None;
        }
        piece.put(dst);
        self.cells[dst.index()] = Some(id);
    }

    pub(crate) fn capture_piece(&mut self, id: PieceId) {
        let piece = &mut self.pieces[id.index()];
        if let Some(sq) = piece.square() {
            self.cells[sq.index()] = None;
        }
        piece.capture();
    }

    pub(crate) fn promote_piece(&mut self, id: PieceId, kind: PieceKind) {
        self.pieces[id.index()].promote(kind);
    }

    /// Verifies the internal consistency of the position, panicking on violation
    #[cfg(any(test, feature = "selftest"))]
    pub fn self_check(&self) {
        for (i, p) in self.pieces.iter().enumerate() {
            if let Some(sq) = p.square() {
                assert_eq!(
                    self.cells[sq.index()],
                    Some(PieceId::from_index(i)),
                    "square {} doesn't refer to piece #{}",
                    sq,
                    i
                );
                if p.kind() == PieceKind::Pawn {
                    assert!(
                        sq.rank() != Rank::R1 && sq.rank() != Rank::R8,
                        "pawn on {}",
                        sq
                    );
                }
            }
        }
        for sq in Square::iter() {
            if let Some(id) = self.cells[sq.index()] {
                assert_eq!(self.pieces[id.index()].square(), Some(sq));
            }
        }
        for c in [Color::White, Color::Black] {
            let kings = self.iter_color(c).filter(|(_, p, _)| p.is_king()).count();
            assert_eq!(kings, 1, "{} has {} kings", c.name(), kings);
            for s in CastlingSide::ALL {
                if !self.castling.has(c, s) {
                    continue;
                }
                let king = self.get(castling::king_src(c));
                assert!(matches!(king, Some(p) if p.is_king() && p.color() == c));
                let rook = self.get(castling::rook_src(c, s));
                assert!(
                    matches!(rook, Some(p) if p.kind() == PieceKind::Rook && p.color() == c)
                );
            }
        }
        if let Some(sq) = self.ep_target {
            assert_eq!(sq.rank(), geometry::enpassant_dst_rank(self.side));
        }
        assert_eq!(self.in_check, self.is_king_attacked(self.side));
        assert!(!self.is_opponent_king_attacked());
    }
}

impl TryFrom<Setup> for Position {
    type Error = ValidateError;

    fn try_from(mut setup: Setup) -> Result<Position, ValidateError> {
        // Check SquareTaken
        let mut taken = SquareSet::EMPTY;
        for &(sq, _, _) in &setup.pieces {
            if taken.has(sq) {
                return Err(ValidateError::SquareTaken(sq));
            }
            taken.set(sq);
        }

        // Check TooManyPieces, NoKing, TooManyKings
        for color in [Color::White, Color::Black] {
            if setup.count(color, None) > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
        }
        for color in [Color::White, Color::Black] {
            match setup.count(color, Some(PieceKind::King)) {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        // Check InvalidPawn
        if let Some(&(sq, _, _)) = setup.pieces.iter().find(|&&(sq, _, kind)| {
            kind == PieceKind::Pawn && (sq.rank() == Rank::R1 || sq.rank() == Rank::R8)
        }) {
            return Err(ValidateError::InvalidPawn(sq));
        }

        // Check enpassant
        if let Some(p) = setup.ep_target {
            if p.rank() != geometry::enpassant_dst_rank(setup.side) {
                return Err(ValidateError::InvalidEnpassant(p));
            }

            // Reset enpassant if there is no pawn which has just passed over the target square
            let fwd = geometry::pawn_forward_delta(setup.side);
            let pawn = p
                .try_shift(-fwd, 0)
                .and_then(|sq| setup.get(sq))
                .filter(|&(c, kind)| c == setup.side.inv() && kind == PieceKind::Pawn);
            let origin_free = p.try_shift(fwd, 0).map_or(false, |sq| !taken.has(sq));
            if pawn.is_none() || taken.has(p) || !origin_free {
                setup.ep_target = None;
            }
        }

        // Reset bad castling flags
        for color in [Color::White, Color::Black] {
            if setup.get(castling::king_src(color)) != Some((color, PieceKind::King)) {
                setup.castling.unset_color(color);
            }
            for s in CastlingSide::ALL {
                if setup.get(castling::rook_src(color, s)) != Some((color, PieceKind::Rook)) {
                    setup.castling.unset(color, s);
                }
            }
        }

        // Check OpponentKingAttacked
        let res = Position::from_setup_unchecked(&setup);
        if res.is_opponent_king_attacked() {
            return Err(ValidateError::OpponentKingAttacked);
        }

        Ok(res)
    }
}

impl TryFrom<&Setup> for Position {
    type Error = ValidateError;

    fn try_from(setup: &Setup) -> Result<Position, ValidateError> {
        setup.clone().try_into()
    }
}

impl Default for Position {
    fn default() -> Position {
        Position::initial()
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        self.pretty(PrettyStyle::Ascii).fmt(f)
    }
}

/// Style for [`Position::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the position
///
/// See docs for [`Position::pretty()`] for more details.
pub struct Pretty<'a> {
    pos: &'a Position,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const WHITE_INDICATOR: char;
    const BLACK_INDICATOR: char;
    const EMPTY: char = '.';

    fn piece(p: &Piece) -> char;

    fn indicator(c: Color) -> char {
        match c {
            Color::White => Self::WHITE_INDICATOR,
            Color::Black => Self::BLACK_INDICATOR,
        }
    }

    fn fmt(pos: &Position, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for rank in Rank::iter() {
            write!(f, "{}{}", rank, Self::VERT_FRAME)?;
            for file in File::iter() {
                let ch = pos
                    .get(Square::from_parts(file, rank))
                    .map_or(Self::EMPTY, Self::piece);
                write!(f, "{}", ch)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in File::iter() {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(pos.side), Self::VERT_FRAME)?;
        for file in File::iter() {
            write!(f, "{}", file)?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const WHITE_INDICATOR: char = 'W';
    const BLACK_INDICATOR: char = 'B';

    fn piece(p: &Piece) -> char {
        p.as_char()
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const WHITE_INDICATOR: char = '○';
    const BLACK_INDICATOR: char = '●';

    fn piece(p: &Piece) -> char {
        p.as_utf8_char()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.pos, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.pos, f),
        }
    }
}
