//! # hotseat
//!
//! Rules engine for a chess game between two players sharing one screen.
//!
//! The engine keeps every piece in a stable arena: a piece is addressed by its [`PieceId`] for
//! the whole game, and captured pieces stay in the arena without a square. [`Position`] holds
//! the board state, [`movegen`] and [`legal`] produce pseudo-legal and legal destinations, and
//! [`Game`] drives the game from the first move to checkmate or stalemate.
//!
//! # Example
//!
//! ```
//! use hotseat::{Color, Game, Outcome, Square, WinReason};
//! use std::str::FromStr;
//!
//! let mut game = Game::new();
//! for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     let src = Square::from_str(&mv[0..2]).unwrap();
//!     let dst = Square::from_str(&mv[2..4]).unwrap();
//!     let id = game.position().piece_at(src).unwrap();
//!     game.try_move_to(id, dst).unwrap();
//! }
//! assert_eq!(
//!     game.outcome(),
//!     Some(Outcome::Win {
//!         side: Color::Black,
//!         reason: WinReason::Checkmate,
//!     })
//! );
//! ```

pub mod castling;
pub mod game;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod position;

pub use hotseat_base::{geometry, square_set, types};

pub use game::{Game, GameStatus};
pub use movegen::MoveList;
pub use moves::{Move, MoveError, MoveKind, PromotePiece};
pub use piece::{Piece, PieceId};
pub use position::{Position, Setup, ValidateError};
pub use square_set::SquareSet;
pub use types::{
    CastlingRights, CastlingSide, Color, DrawReason, File, Outcome, PieceKind, Rank, Square,
    WinReason,
};
