//! # Base types for hotseat
//!
//! This is an auxiliary crate for `hotseat`, which contains the plain value types of the board:
//! squares, colors, piece kinds, castling rights, square sets and game outcomes.
//!
//! Normally you don't want to use this crate directly. Use `hotseat` instead, which re-exports
//! everything declared here.

pub mod geometry;
pub mod square_set;
pub mod types;
